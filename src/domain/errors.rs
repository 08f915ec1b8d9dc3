use thiserror::Error;

/// Errors raised while building a synthetic series
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    #[error("Series {series}: raw path ends at the 100 baseline, rescaling to {target} is undefined")]
    FlatRawPath { series: String, target: f64 },

    #[error("Series {series}: raw path produced a non-finite value at step {step}")]
    NonFinite { series: String, step: usize },

    #[error("Regime table is not contiguous: expected period {expected}, found {found}")]
    NonContiguousRegime { expected: usize, found: usize },

    #[error("Regime table covers {actual} steps but the horizon needs {expected}")]
    HorizonMismatch { expected: usize, actual: usize },

    #[error("No regime span covers step {step}")]
    UncoveredStep { step: usize },

    #[error("Negative volatility {volatility} at period {period}")]
    NegativeVolatility { period: usize, volatility: f64 },

    #[error("Series {series} has {actual} points, labels have {expected}")]
    LengthMismatch {
        series: String,
        expected: usize,
        actual: usize,
    },

    #[error("Calendar overflow while labelling step {step}")]
    LabelOverflow { step: usize },

    #[error("A chart needs at least two points, got {points}")]
    TooShort { points: usize },
}

/// Errors returned by the spreadsheet-backed HTTP endpoints
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SheetError {
    #[error("Endpoint {name} is not configured")]
    MissingEndpoint { name: &'static str },

    #[error("Transport failure: {reason}")]
    Transport { reason: String },

    #[error("Endpoint returned HTTP {status}")]
    Status { status: u16 },

    #[error("Unreadable response body: {snippet}")]
    MalformedBody { snippet: String },

    #[error("Endpoint rejected the request: {message}")]
    Rejected { message: String },

    #[error("Endpoint returned no rows")]
    NoData,

    #[error("Request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl SheetError {
    /// Message suitable for a user-facing notification, if the server sent one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => Some(message),
            _ => None,
        }
    }
}

/// Contact form input rejected before submission
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field {field} is required")]
    MissingField { field: &'static str },

    #[error("Invalid e-mail address: {value}")]
    InvalidEmail { value: String },
}

/// Errors loading or validating a chart catalogue
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("Unknown chart: {id}")]
    UnknownChart { id: String },

    #[error("Duplicate chart id: {id}")]
    DuplicateChart { id: String },

    #[error("Chart {chart}: duplicate series name {series}")]
    DuplicateSeries { chart: String, series: String },

    #[error("Chart {chart}: {source}")]
    Generation {
        chart: String,
        #[source]
        source: GenerationError,
    },

    #[error("Invalid catalogue TOML: {0}")]
    Parse(#[from] toml::de::Error),
}
