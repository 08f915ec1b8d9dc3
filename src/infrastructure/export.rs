//! Chart exports: JSON for the site bundle, CSV for spreadsheets.

use crate::domain::series::Chart;
use anyhow::{Context, Result};
use std::io::Write;

pub fn write_json<W: Write>(chart: &Chart, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, chart).context("Failed to write chart JSON")?;
    writer.flush().context("Failed to flush chart JSON")
}

/// One row per label: `label,<series...>`
pub fn write_csv<W: Write>(chart: &Chart, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["label".to_string()];
    header.extend(chart.series.iter().cloned());
    csv.write_record(&header).context("Failed to write CSV header")?;

    for point in &chart.points {
        let mut record = vec![point.label.to_string()];
        for name in &chart.series {
            record.push(point.value(name).map(|v| v.to_string()).unwrap_or_default());
        }
        csv.write_record(&record)
            .with_context(|| format!("Failed to write CSV row {}", point.label))?;
    }

    csv.flush().context("Failed to flush CSV")?;
    Ok(())
}
