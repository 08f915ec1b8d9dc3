use super::{snippet, transport};
use crate::domain::errors::SheetError;
use crate::domain::fund_returns::{FundClass, FundReturnsSnapshot, PerformanceRow};
use crate::domain::ports::{FundReturnsSource, PerformanceSource};
use crate::infrastructure::core::build_url_with_query;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::ACCEPT;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

/// `{ok, data, error}` reply of the performance endpoint
#[derive(Debug, Deserialize)]
struct RowsEnvelope {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    data: Option<Vec<PerformanceRow>>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Message carried by a reply's `error` field, if it signals a failure.
///
/// Only truthy values count: `null`, `false`, `0` and blank strings are ignored.
fn rejection_message(error: Option<&Value>) -> Option<String> {
    match error? {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.trim().is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Read side of the sheet web apps: performance rows and fund returns.
pub struct SheetsReadClient {
    client: ClientWithMiddleware,
    performance_url: Option<String>,
    fund_returns_url: Option<String>,
}

impl SheetsReadClient {
    pub fn new(
        client: ClientWithMiddleware,
        performance_url: Option<String>,
        fund_returns_url: Option<String>,
    ) -> Self {
        Self {
            client,
            performance_url,
            fund_returns_url,
        }
    }

    async fn get_text(&self, url: url::Url) -> Result<String, SheetError> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SheetError::Status {
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

#[async_trait]
impl PerformanceSource for SheetsReadClient {
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<PerformanceRow>, SheetError> {
        let Some(base) = self.performance_url.as_deref() else {
            warn!("PERFORMANCE_SCRIPT_URL not set, live data for {} unavailable", sheet);
            return Err(SheetError::MissingEndpoint {
                name: "PERFORMANCE_SCRIPT_URL",
            });
        };

        // Cache-busting timestamp: the web app sits behind an aggressive CDN
        let stamp = Utc::now().timestamp_millis().to_string();
        let url = build_url_with_query(base, &[("sheet", sheet), ("t", stamp.as_str())])
            .map_err(transport)?;

        let body = self.get_text(url).await?;
        let envelope: RowsEnvelope =
            serde_json::from_str(&body).map_err(|_| SheetError::MalformedBody {
                snippet: snippet(&body),
            })?;

        if let Some(message) = rejection_message(envelope.error.as_ref()) {
            return Err(SheetError::Rejected { message });
        }
        if !envelope.ok {
            return Err(SheetError::Rejected {
                message: envelope
                    .message
                    .unwrap_or_else(|| "ok flag not set".to_string()),
            });
        }

        let rows = envelope.data.unwrap_or_default();
        if rows.is_empty() {
            return Err(SheetError::NoData);
        }

        info!("Fetched {} performance rows for {}", rows.len(), sheet);
        Ok(rows)
    }
}

#[async_trait]
impl FundReturnsSource for SheetsReadClient {
    async fn fetch_fund_returns(&self) -> Result<FundReturnsSnapshot, SheetError> {
        let Some(base) = self.fund_returns_url.as_deref() else {
            warn!("FUND_RETURNS_SCRIPT_URL not set, fund returns will use fallback data");
            return Err(SheetError::MissingEndpoint {
                name: "FUND_RETURNS_SCRIPT_URL",
            });
        };

        let empty: [(&str, &str); 0] = [];
        let url = build_url_with_query(base, &empty).map_err(transport)?;
        let body = self.get_text(url).await?;

        let value: Value = serde_json::from_str(&body).map_err(|_| SheetError::MalformedBody {
            snippet: snippet(&body),
        })?;

        if let Some(message) = rejection_message(value.get("error")) {
            return Err(SheetError::Rejected { message });
        }

        let snapshot: FundReturnsSnapshot =
            serde_json::from_value(value).map_err(|_| SheetError::MalformedBody {
                snippet: snippet(&body),
            })?;

        info!(
            "Fetched fund returns ({} classes published)",
            FundClass::ALL
                .iter()
                .filter(|c| snapshot.get(**c).is_some())
                .count()
        );
        Ok(snapshot)
    }
}
