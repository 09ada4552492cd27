//! Request normalization: required-field checks, numeric coercion, defaults.

use serde_json::Value;
use thiserror::Error;

use super::models::{CalculateRequest, WeldingInput};

pub const DEFAULT_THICKNESS_MM: f64 = 40.0;
pub const DEFAULT_WELDING_SPEED_CPM: f64 = 90.0;
pub const DEFAULT_DC_CURRENT_A: f64 = 1000.0;
pub const DEFAULT_AC_CURRENT_A: f64 = 900.0;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are absent, empty, false, or zero.
    #[error("all required inputs must be provided (missing: {})", .missing.join(", "))]
    MissingFields { missing: Vec<&'static str> },
    /// Joint dimensions were given but do not read as numbers.
    #[error("joint dimensions must be numeric (invalid: {})", .fields.join(", "))]
    NonNumeric { fields: Vec<&'static str> },
    #[error("request body must be a JSON object")]
    MalformedBody,
}

/// Turn a loosely typed request into a [`WeldingInput`].
///
/// Zero counts as missing for the required fields, so a request with
/// `rootGap: 0` is rejected. A thickness that is present but unreadable
/// (`"abc"`, `true`) passes the check and falls back to 40 mm.
pub fn normalize(request: &CalculateRequest) -> Result<WeldingInput, ValidationError> {
    let root_gap_field = request.root_dimension();
    let required = [
        ("insideAngle", request.inside_angle.as_ref()),
        ("outsideAngle", request.outside_angle.as_ref()),
        ("rootGap", root_gap_field),
        ("thickness", request.thickness.as_ref()),
    ];

    let missing: Vec<&'static str> = required
        .iter()
        .filter(|(_, value)| is_falsy(*value))
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields { missing });
    }

    let inside_angle = truthy_number(request.inside_angle.as_ref());
    let outside_angle = truthy_number(request.outside_angle.as_ref());
    let root_gap = truthy_number(root_gap_field);

    let (Some(inside_angle), Some(outside_angle), Some(root_gap)) =
        (inside_angle, outside_angle, root_gap)
    else {
        let fields = [
            ("insideAngle", inside_angle),
            ("outsideAngle", outside_angle),
            ("rootGap", root_gap),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| name)
        .collect();
        return Err(ValidationError::NonNumeric { fields });
    };

    Ok(WeldingInput {
        inside_angle,
        outside_angle,
        root_gap,
        thickness: number_or(request.thickness.as_ref(), DEFAULT_THICKNESS_MM),
        welding_speed: number_or(request.welding_speed.as_ref(), DEFAULT_WELDING_SPEED_CPM),
        dc_current: number_or(request.dc_current.as_ref(), DEFAULT_DC_CURRENT_A),
        ac_current: number_or(request.ac_current.as_ref(), DEFAULT_AC_CURRENT_A),
        use_seal_config: flag(request.use_seal_config.as_ref()),
    })
}

/// Whether a required field counts as not provided: absent, null, `false`,
/// blank, or zero (including strings that read as zero).
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::Number(n)) => n.as_f64().map_or(true, |v| v == 0.0 || v.is_nan()),
        Some(Value::String(s)) => s.trim().is_empty() || leading_float(s) == Some(0.0),
        Some(_) => false,
    }
}

fn number_or(value: Option<&Value>, default: f64) -> f64 {
    truthy_number(value).unwrap_or(default)
}

/// Numeric value of a field, or `None` if it is falsy (absent, null, zero, NaN,
/// or not numeric).
fn truthy_number(value: Option<&Value>) -> Option<f64> {
    let number = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => leading_float(s)?,
        _ => return None,
    };
    if number == 0.0 || number.is_nan() {
        None
    } else {
        Some(number)
    }
}

fn flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true") || s == "1"
        }
        _ => false,
    }
}

/// Parse the longest numeric prefix of `s` ("40mm" -> 40.0).
fn leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();

    let mut end = 0;
    let mut sign = 1.0;
    if let Some(&c) = bytes.first() {
        if c == b'+' || c == b'-' {
            if c == b'-' {
                sign = -1.0;
            }
            end = 1;
        }
    }
    if s[end..].starts_with("Infinity") {
        return Some(sign * f64::INFINITY);
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > frac_start {
            digits += j - frac_start;
            end = j;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut j = end + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }

    s[..end].parse().ok()
}
