use super::walk::{BASELINE, RawPath};
use crate::domain::errors::GenerationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do when a raw path ends exactly on the baseline, where the
/// endpoint scale `(target - 100) / (last - 100)` is undefined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlatPathPolicy {
    /// Refuse to rescale and report the series.
    #[default]
    Fail,
    /// Keep the raw shape (scale 1); the endpoint target is not met.
    UnitScale,
}

impl FromStr for FlatPathPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail" => Ok(Self::Fail),
            "unit-scale" | "unit_scale" => Ok(Self::UnitScale),
            _ => anyhow::bail!(
                "Invalid FLAT_PATH_POLICY: {}. Must be 'fail' or 'unit-scale'",
                s
            ),
        }
    }
}

/// A walk mapped affinely so it starts at 100 and ends on its target.
#[derive(Debug, Clone, PartialEq)]
pub struct RescaledPath {
    values: Vec<f64>,
    scale: f64,
}

impl RescaledPath {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.values.first().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Factor applied to each point's distance from the baseline
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Rescale `raw` so its last point lands on `target`.
pub fn rescale(
    series: &str,
    raw: &RawPath,
    target: f64,
    decimals: u32,
    policy: FlatPathPolicy,
) -> Result<RescaledPath, GenerationError> {
    let delta = raw.last() - BASELINE;
    let scale = if delta == 0.0 {
        match policy {
            FlatPathPolicy::Fail => {
                return Err(GenerationError::FlatRawPath {
                    series: series.to_string(),
                    target,
                });
            }
            FlatPathPolicy::UnitScale => 1.0,
        }
    } else {
        (target - BASELINE) / delta
    };

    let values = raw
        .values()
        .iter()
        .map(|v| round_to(BASELINE + (v - BASELINE) * scale, decimals))
        .collect::<Vec<_>>();

    if let Some(step) = values.iter().position(|v| !v.is_finite()) {
        return Err(GenerationError::NonFinite {
            series: series.to_string(),
            step,
        });
    }

    Ok(RescaledPath { values, scale })
}
