//! HTTP route handlers for the pass calculation API.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};

use crate::error::CalcError;

use super::groove::AREA_FORMULAS;
use super::models::{CalculateRequest, CalculationResult, ConfigurationInfo, ErrorResponse, Preset};
use super::normalizer::ValidationError;
use super::pipeline::compute;

/// Joint setups offered to clients as starting points.
const PRESETS: [Preset; 4] = [
    Preset { label: "80-80-8", inside_angle: 80.0, outside_angle: 80.0, root_gap: 8.0, thickness: 40.0 },
    Preset { label: "80-80-10", inside_angle: 80.0, outside_angle: 80.0, root_gap: 10.0, thickness: 50.0 },
    Preset { label: "60-70-5", inside_angle: 60.0, outside_angle: 70.0, root_gap: 5.0, thickness: 50.0 },
    Preset { label: "60-70-4", inside_angle: 60.0, outside_angle: 70.0, root_gap: 4.0, thickness: 31.4 },
];

/// Create the calculator router with all endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/calculate-pass", post(calculate_pass))
        .route("/configurations", get(configurations))
        .route("/presets", get(presets))
}

/// Compute the pass count for one joint.
async fn calculate_pass(
    payload: Result<Json<CalculateRequest>, JsonRejection>,
) -> Result<Json<CalculationResult>, (StatusCode, Json<ErrorResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!("unreadable calculation request: {}", rejection.body_text());
        calc_error_to_response(ValidationError::MalformedBody.into())
    })?;

    compute(&request).map(Json).map_err(calc_error_to_response)
}

/// List the fitted area formulas in table order.
async fn configurations() -> Json<Vec<ConfigurationInfo>> {
    let entries = AREA_FORMULAS
        .iter()
        .map(|entry| ConfigurationInfo {
            label: entry.key.to_string(),
            inside_angle: entry.key.inside_angle,
            outside_angle: entry.key.outside_angle,
            root_gap: entry.key.root_gap,
            seal: entry.key.seal,
            inside_coefficients: entry.inside.coefficients(),
            outside_coefficients: entry.outside.coefficients(),
        })
        .collect();

    Json(entries)
}

async fn presets() -> Json<[Preset; 4]> {
    Json(PRESETS)
}

/// Convert CalcError to HTTP error response
fn calc_error_to_response(error: CalcError) -> (StatusCode, Json<ErrorResponse>) {
    match error {
        CalcError::Validation(e) => {
            tracing::warn!("rejected calculation request: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse { error: e.to_string() }),
            )
        }
        CalcError::Computation(e) => {
            tracing::error!("pass calculation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("calculation failed: {}", e),
                }),
            )
        }
    }
}
