// Synthetic chart series
pub mod series;

// Published fund figures and live sheet rows
pub mod fund_returns;

// Contact form payloads
pub mod contact;

// Site language
pub mod language;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
