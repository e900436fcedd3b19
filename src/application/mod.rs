// Chart engine gate and render surfaces
pub mod chart_engine;

// UI-facing client over the worker channels
pub mod client;

// Comparison table derivation
pub mod comparison;

// Desk state driven by worker events
pub mod desk;

// Prediction fetcher with the one-slot cache
pub mod fetcher;

// Response classification into a render plan
pub mod outcome;

// Request parameter store
pub mod params;

// Plot instance lifecycle
pub mod plot;

// Background worker hosting the async side
pub mod worker;
