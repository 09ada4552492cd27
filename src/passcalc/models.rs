//! Data types for the pass calculation API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request payload for a pass calculation.
///
/// Fields stay loosely typed: callers send numbers or numeric strings, and
/// the normalizer decides what counts as missing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateRequest {
    /// Inside groove angle in degrees
    #[serde(default)]
    pub inside_angle: Option<Value>,
    /// Outside groove angle in degrees
    #[serde(default)]
    pub outside_angle: Option<Value>,
    /// Root gap in mm
    #[serde(default)]
    pub root_gap: Option<Value>,
    /// Older clients send the root dimension under this name
    #[serde(default)]
    pub root_face: Option<Value>,
    /// Plate thickness in mm
    #[serde(default)]
    pub thickness: Option<Value>,
    /// Travel speed in cpm
    #[serde(default)]
    pub welding_speed: Option<Value>,
    /// Lead electrode current in A
    #[serde(default)]
    pub dc_current: Option<Value>,
    /// Trail electrode current in A
    #[serde(default)]
    pub ac_current: Option<Value>,
    /// Select the sealed "(In)" formula variant
    #[serde(default)]
    pub use_seal_config: Option<Value>,
}

impl CalculateRequest {
    /// Root dimension as sent, preferring `rootGap` over `rootFace`.
    pub fn root_dimension(&self) -> Option<&Value> {
        self.root_gap
            .as_ref()
            .filter(|v| !v.is_null())
            .or(self.root_face.as_ref())
    }
}

/// Normalized, fully typed calculation input.
///
/// Also echoed back as the `input` block of the response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeldingInput {
    pub inside_angle: f64,
    pub outside_angle: f64,
    pub root_gap: f64,
    pub thickness: f64,
    pub welding_speed: f64,
    pub dc_current: f64,
    pub ac_current: f64,
    pub use_seal_config: bool,
}

/// Computed values, rounded for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Calculated {
    /// Table key used, or a nearest-neighbor annotation
    pub matched_config: String,
    /// False when the nearest-neighbor fallback was used
    pub exact_match: bool,
    /// Inside groove area in mm²
    pub inside_area: f64,
    /// Outside groove area in mm²
    pub outside_area: f64,
    /// DC melting rate in kg/h
    pub dc_melting_rate: f64,
    /// AC melting rate in kg/h
    pub ac_melting_rate: f64,
    /// Tandem area deposited per pass in mm²
    pub area_per_pass: f64,
    pub inside_required_pass: f64,
    pub outside_required_pass: f64,
    pub inside_pass_count: u32,
    pub outside_pass_count: u32,
    pub total_pass_count: u32,
}

/// Response payload from a pass calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    pub input: WeldingInput,
    pub calculated: Calculated,
}

/// Table entry as exposed by the configurations endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationInfo {
    pub label: String,
    pub inside_angle: i32,
    pub outside_angle: i32,
    pub root_gap: i32,
    pub seal: bool,
    /// `[a, b, c]` for `a·t² + b·t + c`
    pub inside_coefficients: [f64; 3],
    pub outside_coefficients: [f64; 3],
}

/// Common joint setup offered to clients as a starting point.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub label: &'static str,
    pub inside_angle: f64,
    pub outside_angle: f64,
    pub root_gap: f64,
    pub thickness: f64,
}

/// Error body returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
