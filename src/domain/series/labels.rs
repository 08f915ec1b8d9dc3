use crate::domain::errors::GenerationError;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Spacing between consecutive chart points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepUnit {
    Month,
    Week,
}

impl StepUnit {
    /// Steps per year, used for period windows
    pub fn per_year(&self) -> usize {
        match self {
            Self::Month => 12,
            Self::Week => 52,
        }
    }
}

/// Display key for one chart point ("Jan 2020" monthly, "Mar 5" weekly).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeLabel {
    pub date: NaiveDate,
    pub unit: StepUnit,
}

impl TimeLabel {
    /// Last calendar day the label stands for.
    pub fn period_end(&self) -> NaiveDate {
        match self.unit {
            StepUnit::Month => self
                .date
                .with_day(1)
                .and_then(|first| first.checked_add_months(Months::new(1)))
                .and_then(|next| next.pred_opt())
                .unwrap_or(self.date),
            StepUnit::Week => self.date,
        }
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            StepUnit::Month => write!(f, "{}", self.date.format("%b %Y")),
            StepUnit::Week => write!(f, "{}", self.date.format("%b %-d")),
        }
    }
}

impl Serialize for TimeLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// `count` labels starting at `start`, one `unit` apart.
pub fn generate_labels(
    start: NaiveDate,
    unit: StepUnit,
    count: usize,
) -> Result<Vec<TimeLabel>, GenerationError> {
    (0..count)
        .map(|step| {
            let date = match unit {
                StepUnit::Month => start.checked_add_months(Months::new(step as u32)),
                StepUnit::Week => start.checked_add_days(Days::new(7 * step as u64)),
            };
            date.map(|date| TimeLabel { date, unit })
                .ok_or(GenerationError::LabelOverflow { step })
        })
        .collect()
}
