// Chart definitions and the generated-chart cache
pub mod catalogue;
pub mod chart_cache;

// Live data with synthetic fallback
pub mod live_series;

// Visitor-facing services
pub mod contact;
pub mod fund_returns;
pub mod language;
