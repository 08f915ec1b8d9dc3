use crate::domain::errors::SheetError;
use crate::domain::fund_returns::{FundClass, FundReturnsSnapshot};
use crate::domain::ports::FundReturnsSource;
use crate::domain::series::stats::{Bar, relative_heights, scale_bars};
use rust_decimal::prelude::ToPrimitive;
use std::sync::Arc;
use tracing::{info, warn};

pub struct FundReturnsService {
    source: Arc<dyn FundReturnsSource>,
}

impl FundReturnsService {
    pub fn new(source: Arc<dyn FundReturnsSource>) -> Self {
        Self { source }
    }

    pub async fn latest(&self) -> Result<FundReturnsSnapshot, SheetError> {
        match self.source.fetch_fund_returns().await {
            Ok(snapshot) => {
                if snapshot.is_empty() {
                    info!("No fund class has published returns yet");
                }
                Ok(snapshot)
            }
            Err(e) => {
                warn!("Failed to fetch fund returns: {}", e);
                Err(e)
            }
        }
    }
}

/// Latest monthly return per published class, scaled for the bar chart.
pub fn monthly_bars(snapshot: &FundReturnsSnapshot) -> Vec<Bar> {
    let items: Vec<(String, f64)> = FundClass::ALL
        .iter()
        .filter_map(|class| {
            let data = snapshot.get(*class)?;
            Some((class.to_string(), data.returns.monthly.to_f64()?))
        })
        .collect();
    scale_bars(&items)
}

/// Since-inception comparison bars, tallest class = 100.
pub fn since_inception_bars(snapshot: &FundReturnsSnapshot) -> Vec<Bar> {
    let published: Vec<(FundClass, f64)> = FundClass::ALL
        .iter()
        .filter_map(|class| {
            let data = snapshot.get(*class)?;
            Some((*class, data.returns.since_inception.to_f64()?))
        })
        .collect();

    let values: Vec<f64> = published.iter().map(|(_, v)| *v).collect();
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    published
        .iter()
        .zip(relative_heights(&values))
        .map(|((class, value), height_pct)| Bar {
            label: class.to_string(),
            value: *value,
            height_pct,
            highlight: *value == max,
        })
        .collect()
}
