//! Built-in chart definitions and TOML overrides.
//!
//! Every regime table, seed and endpoint target the site plots lives here as
//! data. A TOML file with the same shape (see `edgecap catalogue`) can replace
//! the built-in set without recompiling.

use crate::domain::errors::CatalogueError;
use crate::domain::series::{
    ChartSpec, NoiseModel, RandomScheme, RegimeSchedule, RegimeSpan, SeriesSpec, StepUnit,
    WalkParams,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

pub const NAV_CHART: &str = "nav";
pub const STRESS_CHART: &str = "stress-2022";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartCatalogue {
    pub charts: Vec<ChartSpec>,
}

impl ChartCatalogue {
    pub fn builtin() -> Self {
        Self {
            charts: vec![nav_chart(), stress_chart()],
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, CatalogueError> {
        let catalogue: Self = toml::from_str(text)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chart catalogue {:?}", path))?;
        let catalogue = Self::from_toml_str(&text)
            .with_context(|| format!("Failed to load chart catalogue {:?}", path))?;
        info!(
            "Loaded {} charts from {:?}",
            catalogue.charts.len(),
            path
        );
        Ok(catalogue)
    }

    /// The built-in set unless an override path is given.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize chart catalogue")
    }

    pub fn get(&self, id: &str) -> Result<&ChartSpec, CatalogueError> {
        self.charts
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CatalogueError::UnknownChart { id: id.to_string() })
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.charts.iter().map(|c| c.id.as_str())
    }

    fn validate(&self) -> Result<(), CatalogueError> {
        let mut seen = HashSet::new();
        for chart in &self.charts {
            if !seen.insert(chart.id.as_str()) {
                return Err(CatalogueError::DuplicateChart {
                    id: chart.id.clone(),
                });
            }
        }
        Ok(())
    }
}

impl Default for ChartCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

fn span(from: usize, to: usize, drift: f64, volatility: f64, note: &str) -> RegimeSpan {
    RegimeSpan {
        from,
        to,
        drift,
        volatility,
        note: Some(note.to_string()),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Monthly NAV of both strategies against the MSCI World, Jan 2020 to Dec 2025.
fn nav_chart() -> ChartSpec {
    let walk = WalkParams {
        noise: NoiseModel::BoxMuller,
        damping: 1.0,
        floor: None,
    };
    let series = |name: &str, label: &str, seed: i32, target: f64, spans: Vec<RegimeSpan>| {
        SeriesSpec {
            name: name.to_string(),
            label: label.to_string(),
            random: RandomScheme::Mulberry32 { seed },
            walk,
            target,
            decimals: 1,
            regimes: RegimeSchedule {
                spans,
                shocks: Vec::new(),
            },
        }
    };

    ChartSpec {
        id: NAV_CHART.to_string(),
        title: "Net asset value".to_string(),
        start: date(2020, 1, 1),
        unit: StepUnit::Month,
        points: 72,
        series: vec![
            series(
                "correlationArbitrage",
                "Correlation Arbitrage",
                42,
                225.0,
                vec![
                    span(1, 2, 0.005, 2.0, "covid crash, hedged"),
                    span(3, 11, 0.018, 2.5, "recovery"),
                    span(12, 23, 0.016, 2.5, "2021"),
                    span(24, 29, 0.01, 2.0, "2022 bear market"),
                    span(30, 35, 0.014, 2.0, "2022 chop"),
                    span(36, 47, 0.01, 1.8, "2023"),
                    span(48, 59, 0.008, 1.5, "2024"),
                    span(60, 71, 0.007, 1.5, "2025"),
                ],
            ),
            series(
                "volPremiumRisk",
                "Volatility Premium Risk",
                4242,
                270.0,
                vec![
                    span(1, 2, -0.01, 3.0, "covid crash"),
                    span(3, 11, 0.012, 3.0, "recovery"),
                    span(12, 23, 0.014, 3.0, "2021"),
                    span(24, 35, 0.022, 3.5, "2022 high volatility"),
                    span(36, 41, 0.018, 3.0, "2023 first half"),
                    span(42, 47, 0.012, 2.5, "2023 second half"),
                    span(48, 59, 0.01, 2.0, "2024"),
                    span(60, 71, 0.009, 2.0, "2025"),
                ],
            ),
            series(
                "msciWorld",
                "MSCI World",
                4211,
                190.0,
                vec![
                    span(1, 1, -0.03, 6.0, "covid sell-off"),
                    span(2, 2, -0.12, 6.0, "covid crash"),
                    span(3, 11, 0.035, 4.0, "recovery"),
                    span(12, 23, 0.015, 2.5, "2021"),
                    span(24, 29, -0.02, 3.5, "2022 bear market"),
                    span(30, 35, 0.005, 3.0, "2022 chop"),
                    span(36, 47, 0.012, 2.5, "2023"),
                    span(48, 59, 0.01, 2.0, "2024"),
                    span(60, 71, 0.008, 2.0, "2025"),
                ],
            ),
        ],
    }
}

/// Weekly 2022 stress test: both strategies through the bear market.
fn stress_chart() -> ChartSpec {
    const WEEKS: usize = 51;

    let series = |name: &str,
                  label: &str,
                  seed: i32,
                  walk: WalkParams,
                  target: f64,
                  regimes: RegimeSchedule| SeriesSpec {
        name: name.to_string(),
        label: label.to_string(),
        random: RandomScheme::ParkMiller { seed },
        walk,
        target,
        decimals: 2,
        regimes,
    };

    ChartSpec {
        id: STRESS_CHART.to_string(),
        title: "2022 stress test".to_string(),
        start: date(2022, 1, 1),
        unit: StepUnit::Week,
        points: WEEKS + 1,
        series: vec![
            series(
                "volPrem",
                "Volatility Premium",
                2020,
                WalkParams {
                    noise: NoiseModel::Uniform { bias: 0.48 },
                    damping: 0.3,
                    floor: Some(96.0),
                },
                124.6,
                RegimeSchedule::constant(WEEKS, 0.0045, 3.2).with_shocks(&[
                    (8, -3.5),
                    (9, 4.2),
                    (18, -2.8),
                    (19, 3.6),
                    (26, -4.1),
                    (27, 2.8),
                    (28, 2.5),
                    (35, -2.2),
                    (36, 3.1),
                    (42, -1.8),
                    (43, 2.9),
                ]),
            ),
            series(
                "corr",
                "Correlation Arbitrage",
                2021,
                WalkParams {
                    noise: NoiseModel::Uniform { bias: 0.5 },
                    damping: 1.0,
                    floor: Some(98.0),
                },
                118.6,
                RegimeSchedule::constant(WEEKS, 0.0035, 1.2),
            ),
            series(
                "msci",
                "MSCI World",
                2022,
                WalkParams {
                    noise: NoiseModel::Uniform { bias: 0.52 },
                    damping: 0.35,
                    floor: None,
                },
                81.3,
                RegimeSchedule::constant(WEEKS, -0.0042, 3.5).with_shocks(&[
                    (6, 2.5),
                    (7, -4.2),
                    (14, 3.0),
                    (15, -3.8),
                    (22, -4.5),
                    (23, 2.2),
                    (30, 2.8),
                    (31, -3.5),
                    (38, -3.2),
                    (39, 2.0),
                    (40, -2.8),
                    (46, 2.4),
                    (47, -2.1),
                ]),
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::FlatPathPolicy;

    #[test]
    fn test_builtin_charts_build() {
        let catalogue = ChartCatalogue::builtin();
        assert_eq!(catalogue.ids().collect::<Vec<_>>(), vec![NAV_CHART, STRESS_CHART]);

        for spec in &catalogue.charts {
            let chart = spec.build(FlatPathPolicy::Fail).unwrap();
            assert_eq!(chart.points.len(), spec.points);
            for s in &spec.series {
                let values = chart.values(&s.name).unwrap();
                assert_eq!(values[0], 100.0);
                assert!((values[values.len() - 1] - s.target).abs() <= 0.05);
            }
        }
    }

    #[test]
    fn test_stress_floors_hold_on_raw_paths() {
        let chart = ChartCatalogue::builtin()
            .get(STRESS_CHART)
            .unwrap()
            .build(FlatPathPolicy::Fail)
            .unwrap();

        assert!(chart.raw("volPrem").unwrap().values().iter().all(|&v| v >= 96.0));
        assert!(chart.raw("corr").unwrap().values().iter().all(|&v| v >= 98.0));
    }

    #[test]
    fn test_nav_msci_shows_covid_crash() {
        let chart = ChartCatalogue::builtin()
            .get(NAV_CHART)
            .unwrap()
            .build(FlatPathPolicy::Fail)
            .unwrap();
        let msci = chart.values("msciWorld").unwrap();

        // Mar 2020 is the low of the whole chart
        assert_eq!(chart.points[2].label.to_string(), "Mar 2020");
        assert!(msci[2] < 90.0);
        assert!(msci.iter().all(|&v| v >= msci[2]));
    }

    #[test]
    fn test_unknown_chart() {
        let err = ChartCatalogue::builtin().get("quarterly").unwrap_err();
        assert!(matches!(err, CatalogueError::UnknownChart { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let builtin = ChartCatalogue::builtin();
        let text = builtin.to_toml().unwrap();
        assert_eq!(ChartCatalogue::from_toml_str(&text).unwrap(), builtin);
    }

    #[test]
    fn test_hand_written_toml_override() {
        let text = r#"
            [[charts]]
            id = "demo"
            title = "Demo"
            start = "2024-01-01"
            unit = "month"
            points = 4

            [[charts.series]]
            name = "fund"
            label = "Fund"
            target = 110.0
            decimals = 1
            random = { kind = "park-miller", seed = 9 }
            walk = { noise = { kind = "uniform", bias = 0.5 } }

            [[charts.series.regimes.spans]]
            from = 1
            to = 3
            drift = 0.01
            volatility = 1.0
        "#;

        let catalogue = ChartCatalogue::from_toml_str(text).unwrap();
        let spec = catalogue.get("demo").unwrap();
        assert_eq!(spec.series[0].walk.damping, 1.0);
        assert!(spec.series[0].regimes.shocks.is_empty());

        let chart = spec.build(FlatPathPolicy::Fail).unwrap();
        assert_eq!(chart.values("fund").unwrap().last(), Some(&110.0));
    }

    #[test]
    fn test_duplicate_chart_ids_rejected() {
        let text = r#"
            [[charts]]
            id = "a"
            title = "A"
            start = "2024-01-01"
            unit = "week"
            points = 3
            series = []

            [[charts]]
            id = "a"
            title = "A again"
            start = "2024-01-01"
            unit = "week"
            points = 3
            series = []
        "#;
        let err = ChartCatalogue::from_toml_str(text).unwrap_err();
        assert!(matches!(err, CatalogueError::DuplicateChart { .. }));
    }
}
