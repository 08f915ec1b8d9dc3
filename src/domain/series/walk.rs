use super::random::UniformSource;
use super::regime::{NoiseModel, RegimeTable};
use serde::{Deserialize, Serialize};

/// Every synthetic series starts here.
pub const BASELINE: f64 = 100.0;

/// Per-series shape of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WalkParams {
    pub noise: NoiseModel,
    /// Compresses the raw move into a plausible per-step change.
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<f64>,
}

fn default_damping() -> f64 {
    1.0
}

/// Unscaled walk output; `values[0]` is always [`BASELINE`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawPath {
    values: Vec<f64>,
}

impl RawPath {
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> f64 {
        self.values.last().copied().unwrap_or(BASELINE)
    }

    /// Index of the first NaN or infinite value, if any
    pub fn first_non_finite(&self) -> Option<usize> {
        self.values.iter().position(|v| !v.is_finite())
    }
}

/// Run a regime-driven multiplicative walk.
///
/// For each step `i`:
/// `v[i] = v[i-1] + v[i-1] * (drift + volatility * noise / 100 + shock / 100) * damping`,
/// clamped to the floor when one is set.
pub fn walk(table: &RegimeTable, params: &WalkParams, source: &mut dyn UniformSource) -> RawPath {
    let mut values = Vec::with_capacity(table.horizon() + 1);
    values.push(BASELINE);

    let mut prev = BASELINE;
    for entry in table.entries() {
        let noise = params.noise.sample(source);
        let change =
            prev * (entry.drift + entry.volatility * noise / 100.0 + entry.shock / 100.0);
        let mut next = prev + change * params.damping;
        if let Some(floor) = params.floor {
            next = next.max(floor);
        }
        values.push(next);
        prev = next;
    }

    RawPath { values }
}
