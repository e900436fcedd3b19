// Prediction request/response model
pub mod prediction;

// Model catalog and status
pub mod models;

// Service-produced chart specification
pub mod chart_spec;

// Chart engine assets and theming
pub mod chart_assets;

// Port interfaces
pub mod ports;

// Domain-specific error types
pub mod errors;
