//! Live chart data with a synthetic fallback.
//!
//! The performance sheet is the preferred source. Anything short of a usable
//! set of rows (missing endpoint, transport error, bad status, unreadable
//! body, `ok: false`, no complete rows, or a fetch slower than the live
//! timeout) shows the cached synthetic chart instead, values untouched.

use crate::application::chart_cache::ChartCache;
use crate::domain::errors::{CatalogueError, SheetError};
use crate::domain::fund_returns::PerformanceRow;
use crate::domain::ports::PerformanceSource;
use crate::domain::series::{BASELINE, Chart};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ChartSource {
    Live,
    Fallback { reason: String },
}

impl ChartSource {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPoint {
    pub label: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

/// What a chart view actually plots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayedChart {
    pub chart_id: String,
    pub source: ChartSource,
    pub series: Vec<String>,
    pub points: Vec<DisplayPoint>,
}

impl DisplayedChart {
    pub fn fallback(chart: &Chart, reason: String) -> Self {
        Self {
            chart_id: chart.id.clone(),
            source: ChartSource::Fallback { reason },
            series: chart.series.clone(),
            points: chart
                .points
                .iter()
                .map(|p| DisplayPoint {
                    label: p.label.to_string(),
                    values: p.values.clone(),
                })
                .collect(),
        }
    }

    pub fn values(&self, series: &str) -> Option<Vec<f64>> {
        self.points
            .iter()
            .map(|p| p.values.get(series).copied())
            .collect()
    }
}

/// Keep rows carrying a finite value for every series, then rebase each
/// series so its first kept row reads 100.
pub fn rebase_rows(rows: &[PerformanceRow], series: &[String]) -> Result<Vec<DisplayPoint>, SheetError> {
    let complete: Vec<(&PerformanceRow, Vec<f64>)> = rows
        .iter()
        .filter_map(|row| {
            let values: Option<Vec<f64>> = series.iter().map(|s| row.value(s)).collect();
            values.map(|v| (row, v))
        })
        .collect();

    let Some((_, bases)) = complete.first() else {
        return Err(SheetError::NoData);
    };
    if bases.iter().any(|b| *b == 0.0) {
        return Err(SheetError::Rejected {
            message: "first complete row has a zero value, cannot rebase".to_string(),
        });
    }
    let bases = bases.clone();

    Ok(complete
        .into_iter()
        .map(|(row, values)| DisplayPoint {
            label: row.label.clone(),
            values: series
                .iter()
                .zip(values.iter().zip(&bases))
                .map(|(name, (v, base))| (name.clone(), v / base * BASELINE))
                .collect(),
        })
        .collect())
}

/// Owned by a mounted chart view. Dropping it unmounts the view and any
/// result still in flight for it is discarded.
#[derive(Debug)]
pub struct ViewHandle {
    mounted: Arc<AtomicBool>,
}

/// Cheap observer of a [`ViewHandle`], moved into the fetch.
#[derive(Debug, Clone)]
pub struct ViewToken {
    mounted: Arc<AtomicBool>,
}

impl ViewHandle {
    pub fn mount() -> Self {
        Self {
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn token(&self) -> ViewToken {
        ViewToken {
            mounted: self.mounted.clone(),
        }
    }
}

impl Drop for ViewHandle {
    fn drop(&mut self) {
        self.mounted.store(false, Ordering::SeqCst);
    }
}

impl ViewToken {
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }
}

pub struct LiveSeriesService {
    cache: Arc<ChartCache>,
    source: Arc<dyn PerformanceSource>,
    timeout: Duration,
}

impl LiveSeriesService {
    pub fn new(cache: Arc<ChartCache>, source: Arc<dyn PerformanceSource>, timeout: Duration) -> Self {
        Self {
            cache,
            source,
            timeout,
        }
    }

    /// Live rows for `chart_id` if usable, the synthetic chart otherwise.
    /// Only an unknown chart id is an error.
    pub async fn resolve(&self, chart_id: &str) -> Result<DisplayedChart, CatalogueError> {
        let chart = self.cache.get(chart_id)?;

        let fetched = match tokio::time::timeout(self.timeout, self.source.fetch_rows(chart_id)).await {
            Ok(result) => result,
            Err(_) => Err(SheetError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        };

        match fetched.and_then(|rows| rebase_rows(&rows, &chart.series)) {
            Ok(points) => {
                info!("Chart {}: showing {} live points", chart_id, points.len());
                Ok(DisplayedChart {
                    chart_id: chart.id.clone(),
                    source: ChartSource::Live,
                    series: chart.series.clone(),
                    points,
                })
            }
            Err(e) => {
                warn!("Chart {}: live data unavailable ({}), using simulated series", chart_id, e);
                Ok(DisplayedChart::fallback(&chart, e.to_string()))
            }
        }
    }

    /// As [`resolve`](Self::resolve), but `None` when the view went away
    /// before the result arrived.
    pub async fn resolve_for_view(
        &self,
        chart_id: &str,
        view: ViewToken,
    ) -> Option<Result<DisplayedChart, CatalogueError>> {
        let result = self.resolve(chart_id).await;
        if view.is_mounted() {
            Some(result)
        } else {
            info!("Chart {}: view unmounted, dropping late result", chart_id);
            None
        }
    }
}
