use crate::domain::contact::{FormSubmission, SubmitReceipt};
use crate::domain::errors::SheetError;
use crate::domain::fund_returns::{FundReturnsSnapshot, PerformanceRow};
use crate::domain::language::Language;
use crate::domain::ports::{FormSink, FundReturnsSource, LanguageStore, PerformanceSource};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Serves canned rows (or a canned error), optionally after a delay.
#[derive(Clone)]
pub struct MockPerformanceSource {
    response: Result<Vec<PerformanceRow>, SheetError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockPerformanceSource {
    pub fn with_rows(rows: Vec<PerformanceRow>) -> Self {
        Self {
            response: Ok(rows),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: SheetError) -> Self {
        Self {
            response: Err(error),
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PerformanceSource for MockPerformanceSource {
    async fn fetch_rows(&self, sheet: &str) -> Result<Vec<PerformanceRow>, SheetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        info!("MockPerformanceSource: serving {}", sheet);
        self.response.clone()
    }
}

#[derive(Clone)]
pub struct MockFundReturnsSource {
    response: Result<FundReturnsSnapshot, SheetError>,
}

impl MockFundReturnsSource {
    pub fn new(response: Result<FundReturnsSnapshot, SheetError>) -> Self {
        Self { response }
    }
}

#[async_trait]
impl FundReturnsSource for MockFundReturnsSource {
    async fn fetch_fund_returns(&self) -> Result<FundReturnsSnapshot, SheetError> {
        self.response.clone()
    }
}

/// Records every submission and answers with a canned outcome.
#[derive(Clone)]
pub struct MockFormSink {
    response: Result<SubmitReceipt, SheetError>,
    submissions: Arc<Mutex<Vec<FormSubmission>>>,
}

impl MockFormSink {
    pub fn accepting() -> Self {
        Self::new(Ok(SubmitReceipt {
            ok: true,
            message: None,
            extra: Default::default(),
        }))
    }

    pub fn new(response: Result<SubmitReceipt, SheetError>) -> Self {
        Self {
            response,
            submissions: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.submissions
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FormSink for MockFormSink {
    async fn submit(&self, submission: &FormSubmission) -> Result<SubmitReceipt, SheetError> {
        if let Ok(mut submissions) = self.submissions.lock() {
            submissions.push(submission.clone());
        }
        self.response.clone()
    }
}

#[derive(Default)]
pub struct InMemoryLanguageStore {
    stored: Mutex<Option<Language>>,
}

impl InMemoryLanguageStore {
    pub fn new(stored: Option<Language>) -> Self {
        Self {
            stored: Mutex::new(stored),
        }
    }
}

impl LanguageStore for InMemoryLanguageStore {
    fn load(&self) -> Result<Option<Language>> {
        let stored = self
            .stored
            .lock()
            .map_err(|_| anyhow::anyhow!("Language store lock poisoned"))?;
        Ok(*stored)
    }

    fn save(&self, language: Language) -> Result<()> {
        let mut stored = self
            .stored
            .lock()
            .map_err(|_| anyhow::anyhow!("Language store lock poisoned"))?;
        *stored = Some(language);
        Ok(())
    }
}
