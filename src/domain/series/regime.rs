use super::random::UniformSource;
use crate::domain::errors::GenerationError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Offset added to the first Box–Muller draw so `ln` never sees zero.
pub const BOX_MULLER_EPSILON: f64 = 1e-4;

/// Stochastic parameters for a single step of a walk.
///
/// `period_index` is zero-based: entry `k` drives the move from point `k`
/// to point `k + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeEntry {
    pub period_index: usize,
    pub drift: f64,
    pub volatility: f64,
    pub shock: f64,
    pub defaults_to_zero_shock: bool,
}

/// One entry per step, contiguous from period 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeTable {
    entries: Vec<RegimeEntry>,
}

impl RegimeTable {
    pub fn from_entries(entries: Vec<RegimeEntry>) -> Result<Self, GenerationError> {
        for (expected, entry) in entries.iter().enumerate() {
            if entry.period_index != expected {
                return Err(GenerationError::NonContiguousRegime {
                    expected,
                    found: entry.period_index,
                });
            }
            if !(entry.volatility >= 0.0) {
                return Err(GenerationError::NegativeVolatility {
                    period: entry.period_index,
                    volatility: entry.volatility,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Number of steps covered (the walk produces `horizon + 1` points).
    pub fn horizon(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[RegimeEntry] {
        &self.entries
    }
}

/// A contiguous range of points sharing drift and volatility.
///
/// `from` and `to` are inclusive point indices; point 0 is the baseline and
/// is never covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSpan {
    pub from: usize,
    pub to: usize,
    pub drift: f64,
    pub volatility: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A one-off percentage move landing on a given point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shock {
    pub point: usize,
    pub size: f64,
}

/// Compact, config-friendly description of a regime table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegimeSchedule {
    pub spans: Vec<RegimeSpan>,
    #[serde(default)]
    pub shocks: Vec<Shock>,
}

impl RegimeSchedule {
    /// A single regime covering the whole horizon
    pub fn constant(steps: usize, drift: f64, volatility: f64) -> Self {
        Self {
            spans: vec![RegimeSpan {
                from: 1,
                to: steps,
                drift,
                volatility,
                note: None,
            }],
            shocks: Vec::new(),
        }
    }

    pub fn with_shocks(mut self, shocks: &[(usize, f64)]) -> Self {
        self.shocks
            .extend(shocks.iter().map(|&(point, size)| Shock { point, size }));
        self
    }

    /// Expand into one entry per step. The first span covering a point
    /// wins; a later shock for the same point replaces an earlier one.
    pub fn expand(&self, steps: usize) -> Result<RegimeTable, GenerationError> {
        let mut entries = Vec::with_capacity(steps);
        for point in 1..=steps {
            let span = self
                .spans
                .iter()
                .find(|s| s.from <= point && point <= s.to)
                .ok_or(GenerationError::UncoveredStep { step: point })?;
            let shock = self.shocks.iter().rev().find(|s| s.point == point);

            entries.push(RegimeEntry {
                period_index: point - 1,
                drift: span.drift,
                volatility: span.volatility,
                shock: shock.map(|s| s.size).unwrap_or(0.0),
                defaults_to_zero_shock: shock.is_none(),
            });
        }
        RegimeTable::from_entries(entries)
    }
}

/// How the per-step noise term is drawn from the uniform source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NoiseModel {
    /// `draw() - bias`; a bias off 0.5 skews the walk up or down.
    Uniform { bias: f64 },
    /// Gaussian-shaped noise from two draws.
    BoxMuller,
}

impl NoiseModel {
    pub fn sample(&self, source: &mut dyn UniformSource) -> f64 {
        match *self {
            Self::Uniform { bias } => source.next_uniform() - bias,
            Self::BoxMuller => {
                let u1 = source.next_uniform();
                let u2 = source.next_uniform();
                (-2.0 * (u1 + BOX_MULLER_EPSILON).ln()).sqrt() * (2.0 * PI * u2).cos()
            }
        }
    }
}
