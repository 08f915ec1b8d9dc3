//! Clients for the spreadsheet-backed web app endpoints.
//!
//! The endpoints answer with JSON envelopes but do not always honour HTTP
//! semantics, so both clients read the raw body first and decide on the
//! outcome from status, parse result and the envelope's own flags.

pub mod form_client;
pub mod read_client;

pub use form_client::SheetsFormClient;
pub use read_client::SheetsReadClient;

use crate::domain::errors::SheetError;

/// Longest excerpt of an unreadable body kept in the error.
const SNIPPET_CHARS: usize = 300;

pub(crate) fn snippet(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "(empty)".to_string();
    }
    trimmed.chars().take(SNIPPET_CHARS).collect()
}

pub(crate) fn transport<E: std::fmt::Display>(err: E) -> SheetError {
    SheetError::Transport {
        reason: err.to_string(),
    }
}
