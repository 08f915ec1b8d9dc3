use super::labels::TimeLabel;
use super::rescale::RescaledPath;
use crate::domain::errors::GenerationError;
use serde::Serialize;
use std::collections::BTreeMap;

/// A rescaled path tagged with the key the chart layer plots it under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSeries {
    pub name: String,
    pub path: RescaledPath,
}

/// One x-axis position with a value for every series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: TimeLabel,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl SeriesPoint {
    pub fn value(&self, series: &str) -> Option<f64> {
        self.values.get(series).copied()
    }
}

/// Zip equally long series onto the label axis, in label order.
pub fn assemble(
    series: &[NamedSeries],
    labels: &[TimeLabel],
) -> Result<Vec<SeriesPoint>, GenerationError> {
    for s in series {
        if s.path.len() != labels.len() {
            return Err(GenerationError::LengthMismatch {
                series: s.name.clone(),
                expected: labels.len(),
                actual: s.path.len(),
            });
        }
    }

    Ok(labels
        .iter()
        .enumerate()
        .map(|(i, label)| SeriesPoint {
            label: *label,
            values: series
                .iter()
                .map(|s| (s.name.clone(), s.path.values()[i]))
                .collect(),
        })
        .collect())
}
