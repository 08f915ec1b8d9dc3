use crate::domain::language::Language;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Published share classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FundClass {
    #[serde(rename = "EC_Class_I")]
    ClassI,
    #[serde(rename = "EC_Class_II")]
    ClassII,
    #[serde(rename = "EC_Class_III")]
    ClassIII,
}

impl FundClass {
    pub const ALL: [FundClass; 3] = [Self::ClassI, Self::ClassII, Self::ClassIII];
}

impl fmt::Display for FundClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClassI => write!(f, "Class I"),
            Self::ClassII => write!(f, "Class II"),
            Self::ClassIII => write!(f, "Class III"),
        }
    }
}

/// Reporting month, named in both site languages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundMonth {
    pub nl: String,
    pub en: String,
    pub key: String,
}

impl FundMonth {
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Nl => &self.nl,
        }
    }
}

/// Percent returns as published
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundReturns {
    pub monthly: Decimal,
    pub ytd: Decimal,
    pub since_inception: Decimal,
    pub cagr: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundClassData {
    pub month: FundMonth,
    pub returns: FundReturns,
}

/// Latest published month per share class; a class may be unpublished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundReturnsSnapshot {
    #[serde(rename = "EC_Class_I", default)]
    pub class_i: Option<FundClassData>,
    #[serde(rename = "EC_Class_II", default)]
    pub class_ii: Option<FundClassData>,
    #[serde(rename = "EC_Class_III", default)]
    pub class_iii: Option<FundClassData>,
}

impl FundReturnsSnapshot {
    pub fn get(&self, class: FundClass) -> Option<&FundClassData> {
        match class {
            FundClass::ClassI => self.class_i.as_ref(),
            FundClass::ClassII => self.class_ii.as_ref(),
            FundClass::ClassIII => self.class_iii.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        FundClass::ALL.iter().all(|c| self.get(*c).is_none())
    }
}

/// One row of the live performance sheet: a display label plus one cell
/// per series. Cells may arrive as numbers or numeric strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    #[serde(alias = "date", alias = "week", alias = "month")]
    pub label: String,
    #[serde(flatten)]
    pub cells: BTreeMap<String, serde_json::Value>,
}

impl PerformanceRow {
    pub fn value(&self, series: &str) -> Option<f64> {
        let v = match self.cells.get(series)? {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().trim_end_matches('%').parse().ok()?,
            _ => return None,
        };
        v.is_finite().then_some(v)
    }
}
