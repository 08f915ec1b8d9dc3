//! Summary figures shown above and beside the charts.

use super::assembly::SeriesPoint;
use super::chart::Chart;
use super::labels::StepUnit;
use super::walk::BASELINE;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub series: String,
    /// Percentage gain over the baseline at the last point.
    pub to_date_pct: f64,
    /// Mean point-over-point percentage change.
    pub average_step_pct: f64,
}

/// Percent change from the first to last point, measured from the 100 baseline.
pub fn to_date_return(values: &[f64]) -> Option<f64> {
    values.last().map(|last| last - BASELINE)
}

/// Mean of `(cur - prev) / prev * 100` over consecutive points.
pub fn average_step_return(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let total: f64 = values
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0] * 100.0)
        .sum();
    Some(total / (values.len() - 1) as f64)
}

pub fn chart_stats(chart: &Chart) -> Vec<SeriesStats> {
    chart
        .series
        .iter()
        .filter_map(|name| {
            let values = chart.values(name)?;
            Some(SeriesStats {
                series: name.clone(),
                to_date_pct: to_date_return(&values)?,
                average_step_pct: average_step_return(&values)?,
            })
        })
        .collect()
}

/// "31.12.2025": last day of the final point's period.
pub fn as_of_date(chart: &Chart) -> Option<String> {
    chart
        .points
        .last()
        .map(|p| p.label.period_end().format("%d.%m.%Y").to_string())
}

/// Visible range selector of the NAV chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodWindow {
    #[default]
    All,
    OneYear,
    ThreeMonths,
}

impl PeriodWindow {
    /// Steps covered by the window, `None` for the whole chart.
    pub fn steps(&self, unit: StepUnit) -> Option<usize> {
        match (self, unit) {
            (Self::All, _) => None,
            (Self::OneYear, unit) => Some(unit.per_year()),
            (Self::ThreeMonths, StepUnit::Month) => Some(3),
            (Self::ThreeMonths, StepUnit::Week) => Some(13),
        }
    }

    /// Trailing slice of `points` covering the window, including the
    /// point the window's first step starts from.
    pub fn slice<'a>(&self, points: &'a [SeriesPoint], unit: StepUnit) -> &'a [SeriesPoint] {
        match self.steps(unit) {
            Some(steps) if steps + 1 < points.len() => &points[points.len() - steps - 1..],
            _ => points,
        }
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "ALL"),
            Self::OneYear => write!(f, "1 YEAR"),
            Self::ThreeMonths => write!(f, "3 MONTHS"),
        }
    }
}

impl FromStr for PeriodWindow {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_'], "-").as_str() {
            "all" => Ok(Self::All),
            "1-year" | "one-year" | "1y" => Ok(Self::OneYear),
            "3-months" | "three-months" | "3m" => Ok(Self::ThreeMonths),
            _ => anyhow::bail!("Invalid period: {}. Must be 'all', '1y' or '3m'", s),
        }
    }
}

/// Minimum bar height, as a percentage of the plot area.
pub const MIN_BAR_PCT: f64 = 15.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    pub height_pct: f64,
    pub highlight: bool,
}

/// Monthly performance bars: the largest value fills the plot, every other
/// bar keeps at least [`MIN_BAR_PCT`] so its label stays readable.
pub fn scale_bars(items: &[(String, f64)]) -> Vec<Bar> {
    let max = items.iter().map(|(_, v)| *v).fold(f64::NEG_INFINITY, f64::max);
    items
        .iter()
        .map(|(label, value)| {
            let height_pct = if max > 0.0 {
                (value / max).max(0.0) * (100.0 - MIN_BAR_PCT) + MIN_BAR_PCT
            } else {
                MIN_BAR_PCT
            };
            Bar {
                label: label.clone(),
                value: *value,
                height_pct,
                highlight: *value == max,
            }
        })
        .collect()
}

/// Heights relative to the tallest bar (tallest = 100).
pub fn relative_heights(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values
        .iter()
        .map(|v| if max > 0.0 { v / max * 100.0 } else { 0.0 })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::labels::{TimeLabel, generate_labels};
    use approx::assert_abs_diff_eq;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn chart_from(values: &[f64]) -> Chart {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let labels = generate_labels(start, StepUnit::Month, values.len()).unwrap();
        Chart {
            id: "t".to_string(),
            title: "T".to_string(),
            unit: StepUnit::Month,
            series: vec!["x".to_string()],
            points: labels
                .into_iter()
                .zip(values)
                .map(|(label, v): (TimeLabel, &f64)| SeriesPoint {
                    label,
                    values: BTreeMap::from([("x".to_string(), *v)]),
                })
                .collect(),
            raw: Vec::new(),
        }
    }

    #[test]
    fn test_to_date_and_average() {
        let values = [100.0, 110.0, 99.0];
        assert_abs_diff_eq!(to_date_return(&values).unwrap(), -1.0, epsilon = 1e-12);
        // (+10% then -10%) / 2
        assert_abs_diff_eq!(average_step_return(&values).unwrap(), 0.0, epsilon = 1e-12);
        assert_eq!(average_step_return(&[100.0]), None);
    }

    #[test]
    fn test_chart_stats_and_as_of() {
        let chart = chart_from(&[100.0, 102.0, 104.04]);
        let stats = chart_stats(&chart);

        assert_eq!(stats.len(), 1);
        assert_abs_diff_eq!(stats[0].to_date_pct, 4.04, epsilon = 1e-9);
        assert_abs_diff_eq!(stats[0].average_step_pct, 2.0, epsilon = 1e-9);
        assert_eq!(as_of_date(&chart).as_deref(), Some("31.03.2025"));
    }

    #[test]
    fn test_period_window_slices() {
        let chart = chart_from(&[100.0; 20]);
        assert_eq!(PeriodWindow::All.slice(&chart.points, chart.unit).len(), 20);
        assert_eq!(PeriodWindow::OneYear.slice(&chart.points, chart.unit).len(), 13);
        assert_eq!(PeriodWindow::ThreeMonths.slice(&chart.points, chart.unit).len(), 4);

        let short = chart_from(&[100.0; 3]);
        assert_eq!(PeriodWindow::OneYear.slice(&short.points, short.unit).len(), 3);
    }

    #[test]
    fn test_period_parsing() {
        assert_eq!("1 YEAR".parse::<PeriodWindow>().unwrap(), PeriodWindow::OneYear);
        assert_eq!("3m".parse::<PeriodWindow>().unwrap(), PeriodWindow::ThreeMonths);
        assert!("decade".parse::<PeriodWindow>().is_err());
    }

    #[test]
    fn test_scale_bars() {
        let items = vec![
            ("January".to_string(), 2.14),
            ("April".to_string(), 7.63),
            ("June".to_string(), 3.28),
        ];
        let bars = scale_bars(&items);

        assert_abs_diff_eq!(bars[1].height_pct, 100.0, epsilon = 1e-12);
        assert!(bars[1].highlight);
        assert!(!bars[0].highlight);
        assert_abs_diff_eq!(bars[0].height_pct, 2.14 / 7.63 * 85.0 + 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_bars_all_negative() {
        let bars = scale_bars(&[("a".to_string(), -1.0), ("b".to_string(), -2.0)]);
        assert!(bars.iter().all(|b| b.height_pct == MIN_BAR_PCT));
    }

    #[test]
    fn test_relative_heights() {
        let heights = relative_heights(&[180.9, 65.4]);
        assert_eq!(heights[0], 100.0);
        assert_abs_diff_eq!(heights[1], 65.4 / 180.9 * 100.0, epsilon = 1e-12);
        assert_eq!(relative_heights(&[0.0, 0.0]), vec![0.0, 0.0]);
    }
}
