use super::{snippet, transport};
use crate::domain::contact::{FormSubmission, SubmitReceipt};
use crate::domain::errors::SheetError;
use crate::domain::ports::FormSink;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use tracing::{info, warn};

/// Posts form submissions to the sheet web app.
pub struct SheetsFormClient {
    client: ClientWithMiddleware,
    url: Option<String>,
}

impl SheetsFormClient {
    pub fn new(client: ClientWithMiddleware, url: Option<String>) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl FormSink for SheetsFormClient {
    async fn submit(&self, submission: &FormSubmission) -> Result<SubmitReceipt, SheetError> {
        let Some(url) = self.url.as_deref() else {
            warn!("FORM_SCRIPT_URL not set, cannot submit {}", submission.form_slug);
            return Err(SheetError::MissingEndpoint {
                name: "FORM_SCRIPT_URL",
            });
        };

        let body = serde_json::to_string(submission).map_err(|e| SheetError::MalformedBody {
            snippet: e.to_string(),
        })?;

        // text/plain keeps the request "simple": the web app rejects preflights
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let raw = response.text().await.map_err(transport)?;
        let receipt: SubmitReceipt =
            serde_json::from_str(&raw).map_err(|_| SheetError::MalformedBody {
                snippet: snippet(&raw),
            })?;

        if !status.is_success() || !receipt.ok {
            warn!(
                "Form {} rejected (HTTP {}): {:?}",
                submission.form_slug,
                status.as_u16(),
                receipt.message
            );
            return Err(match receipt.message.filter(|m| !m.trim().is_empty()) {
                Some(message) => SheetError::Rejected { message },
                None => SheetError::Status {
                    status: status.as_u16(),
                },
            });
        }

        info!("Form {} submitted", submission.form_slug);
        Ok(receipt)
    }
}
