//! Weld pass calculation module.
//!
//! Resolves groove areas from the fitted formula table, converts electrode
//! currents into deposited area per pass, and exposes the result over HTTP.

pub mod groove;
pub mod melting;
mod models;
mod normalizer;
mod pipeline;
mod routes;

pub use models::{
    CalculateRequest, Calculated, CalculationResult, ConfigurationInfo, ErrorResponse, Preset,
    WeldingInput,
};
pub use normalizer::{normalize, ValidationError};
pub use pipeline::{calculate, compute, ComputationError};
pub use routes::router;
