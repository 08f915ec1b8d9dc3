use super::assembly::{NamedSeries, SeriesPoint, assemble};
use super::labels::{StepUnit, TimeLabel, generate_labels};
use super::random::RandomScheme;
use super::regime::RegimeSchedule;
use super::rescale::{FlatPathPolicy, RescaledPath, rescale};
use super::walk::{RawPath, WalkParams, walk};
use crate::domain::errors::{CatalogueError, GenerationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Everything needed to reproduce one synthetic series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    pub name: String,
    pub label: String,
    pub random: RandomScheme,
    pub walk: WalkParams,
    pub target: f64,
    pub decimals: u32,
    pub regimes: RegimeSchedule,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSeries {
    pub raw: RawPath,
    pub rescaled: RescaledPath,
}

impl SeriesSpec {
    /// Walk `steps` steps with a fresh generator, then rescale.
    pub fn generate(
        &self,
        steps: usize,
        policy: FlatPathPolicy,
    ) -> Result<GeneratedSeries, GenerationError> {
        let table = self.regimes.expand(steps)?;
        if table.horizon() != steps {
            return Err(GenerationError::HorizonMismatch {
                expected: steps,
                actual: table.horizon(),
            });
        }

        let mut source = self.random.source();
        let raw = walk(&table, &self.walk, source.as_mut());
        if let Some(step) = raw.first_non_finite() {
            return Err(GenerationError::NonFinite {
                series: self.name.clone(),
                step,
            });
        }
        debug!(
            "Series {}: raw endpoint {:.4} -> target {}",
            self.name,
            raw.last(),
            self.target
        );

        let rescaled = rescale(&self.name, &raw, self.target, self.decimals, policy)?;
        Ok(GeneratedSeries { raw, rescaled })
    }
}

/// A chart: a shared time axis and the series plotted on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub start: NaiveDate,
    pub unit: StepUnit,
    /// Number of plotted points including the baseline.
    pub points: usize,
    pub series: Vec<SeriesSpec>,
}

/// Generated chart data, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub id: String,
    pub title: String,
    pub unit: StepUnit,
    /// Series keys in display order.
    pub series: Vec<String>,
    pub points: Vec<SeriesPoint>,
    #[serde(skip)]
    pub raw: Vec<(String, RawPath)>,
}

impl Chart {
    pub fn labels(&self) -> impl Iterator<Item = &TimeLabel> {
        self.points.iter().map(|p| &p.label)
    }

    /// One series' values in label order
    pub fn values(&self, series: &str) -> Option<Vec<f64>> {
        self.points.iter().map(|p| p.value(series)).collect()
    }

    pub fn raw(&self, series: &str) -> Option<&RawPath> {
        self.raw
            .iter()
            .find(|(name, _)| name == series)
            .map(|(_, path)| path)
    }
}

impl ChartSpec {
    pub fn steps(&self) -> usize {
        self.points.saturating_sub(1)
    }

    pub fn build(&self, policy: FlatPathPolicy) -> Result<Chart, CatalogueError> {
        let wrap = |source| CatalogueError::Generation {
            chart: self.id.clone(),
            source,
        };

        if self.points < 2 {
            return Err(wrap(GenerationError::TooShort {
                points: self.points,
            }));
        }

        let mut seen = HashSet::new();
        for s in &self.series {
            if !seen.insert(s.name.as_str()) {
                return Err(CatalogueError::DuplicateSeries {
                    chart: self.id.clone(),
                    series: s.name.clone(),
                });
            }
        }

        let labels = generate_labels(self.start, self.unit, self.points).map_err(wrap)?;

        let mut named = Vec::with_capacity(self.series.len());
        let mut raw = Vec::with_capacity(self.series.len());
        for spec in &self.series {
            let generated = spec.generate(self.steps(), policy).map_err(wrap)?;
            raw.push((spec.name.clone(), generated.raw));
            named.push(NamedSeries {
                name: spec.name.clone(),
                path: generated.rescaled,
            });
        }

        let points = assemble(&named, &labels).map_err(wrap)?;

        Ok(Chart {
            id: self.id.clone(),
            title: self.title.clone(),
            unit: self.unit,
            series: self.series.iter().map(|s| s.name.clone()).collect(),
            points,
            raw,
        })
    }
}
