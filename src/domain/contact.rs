use crate::domain::errors::FormError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Slug the form endpoint files landing-page contact requests under
pub const CONTACT_FORM_SLUG: &str = "landing-contact";

/// Fields of the "request information" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub mail: String,
    pub message: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub subscribe_newsletter: bool,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FormError> {
        for (field, value) in [
            ("name", &self.name),
            ("mail", &self.mail),
            ("message", &self.message),
        ] {
            if value.trim().is_empty() {
                return Err(FormError::MissingField { field });
            }
        }

        let mail = self.mail.trim();
        let valid = mail
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.'))
            .unwrap_or(false);
        if !valid {
            return Err(FormError::InvalidEmail {
                value: mail.to_string(),
            });
        }
        Ok(())
    }

    pub fn into_submission(self) -> FormSubmission {
        let fields = match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        FormSubmission {
            form_slug: CONTACT_FORM_SLUG.to_string(),
            fields,
        }
    }
}

/// Body posted to the form endpoint: `{"formSlug": .., ...fields}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmission {
    #[serde(rename = "formSlug")]
    pub form_slug: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Parsed reply of the form endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
