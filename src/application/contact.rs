use crate::domain::contact::ContactForm;
use crate::domain::errors::{FormError, SheetError};
use crate::domain::ports::FormSink;
use crate::infrastructure::i18n::I18nService;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

/// Transient message shown after a submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NotificationKind::Success
    }
}

pub struct ContactService {
    sink: Arc<dyn FormSink>,
}

impl ContactService {
    pub fn new(sink: Arc<dyn FormSink>) -> Self {
        Self { sink }
    }

    /// Validate, submit and turn the outcome into a notification in the
    /// visitor's language. Invalid input never reaches the network.
    pub async fn submit(&self, form: ContactForm, i18n: &I18nService) -> Notification {
        if let Err(e) = form.validate() {
            info!("Contact form rejected locally: {}", e);
            return Notification::error(form_error_message(&e, i18n));
        }

        let submission = form.into_submission();
        match self.sink.submit(&submission).await {
            Ok(_) => Notification::success(i18n.t("contact.success")),
            Err(e) => {
                warn!("Contact form submission failed: {}", e);
                Notification::error(sheet_error_message(&e, i18n))
            }
        }
    }
}

fn form_error_message(error: &FormError, i18n: &I18nService) -> String {
    match error {
        FormError::MissingField { field } => {
            let key = format!("contact.field.{}", field);
            i18n.tf("contact.missing_field", &[("field", i18n.t(&key))])
        }
        FormError::InvalidEmail { .. } => i18n.t("contact.invalid_email").to_string(),
    }
}

/// The server's own message wins over the localized fallback.
fn sheet_error_message(error: &SheetError, i18n: &I18nService) -> String {
    if let Some(message) = error.server_message() {
        return message.to_string();
    }
    match error {
        SheetError::Status { status } => {
            i18n.tf("contact.error_status", &[("status", status.to_string().as_str())])
        }
        SheetError::MalformedBody { snippet } => {
            i18n.tf("contact.error_unreadable", &[("snippet", snippet.as_str())])
        }
        _ => i18n.t("contact.error_fallback").to_string(),
    }
}
