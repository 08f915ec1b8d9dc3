use crate::domain::contact::{FormSubmission, SubmitReceipt};
use crate::domain::errors::SheetError;
use crate::domain::fund_returns::{FundReturnsSnapshot, PerformanceRow};
use crate::domain::language::Language;
use anyhow::Result;
use async_trait::async_trait;

/// Read side of the spreadsheet backend
#[async_trait]
pub trait PerformanceSource: Send + Sync {
    /// Rows of one logical sheet (one strategy or chart)
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<PerformanceRow>, SheetError>;
}

#[async_trait]
pub trait FundReturnsSource: Send + Sync {
    async fn fetch_fund_returns(&self) -> Result<FundReturnsSnapshot, SheetError>;
}

/// Write side of the spreadsheet backend
#[async_trait]
pub trait FormSink: Send + Sync {
    async fn submit(&self, submission: &FormSubmission) -> Result<SubmitReceipt, SheetError>;
}

/// Where the visitor's language choice is remembered
pub trait LanguageStore: Send + Sync {
    fn load(&self) -> Result<Option<Language>>;
    fn save(&self, language: Language) -> Result<()>;
}
