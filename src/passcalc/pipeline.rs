//! Pass count pipeline: groove areas and melting rates in, pass counts out.

use thiserror::Error;

use crate::error::Result;

use super::groove;
use super::melting::{ac_melting_rate, dc_melting_rate};
use super::models::{CalculateRequest, Calculated, CalculationResult, WeldingInput};
use super::normalizer::normalize;

/// cpm to mm/h.
pub const CPM_TO_MM_PER_HOUR: f64 = 600.0;

/// Steel density in g/mm³.
pub const STEEL_SPECIFIC_GRAVITY: f64 = 0.00785;

/// Deposition gain of running both electrodes in one puddle.
pub const TANDEM_EFFICIENCY: f64 = 1.15;

/// Numeric failure while evaluating the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputationError {
    #[error("{quantity} is not a finite number")]
    NonFinite { quantity: &'static str },
    #[error("{quantity} must be positive (got {value})")]
    NonPositive { quantity: &'static str, value: f64 },
    #[error("{quantity} is out of range (got {value})")]
    OutOfRange { quantity: &'static str, value: f64 },
    /// The electrode currents melt no wire, so no pass count exists.
    #[error(
        "currents deposit no metal: DC {dc_current} A melts {dc_melting_rate:.2} kg/h, \
         AC {ac_current} A melts {ac_melting_rate:.2} kg/h, area per pass {area_per_pass:.2} mm²"
    )]
    NoDeposition {
        dc_current: f64,
        ac_current: f64,
        dc_melting_rate: f64,
        ac_melting_rate: f64,
        area_per_pass: f64,
    },
}

/// Normalize a raw request and run the pipeline on it.
pub fn compute(request: &CalculateRequest) -> Result<CalculationResult> {
    let input = normalize(request)?;
    Ok(calculate(&input)?)
}

/// Run the pipeline on normalized input.
pub fn calculate(input: &WeldingInput) -> std::result::Result<CalculationResult, ComputationError> {
    let areas = groove::resolve(
        input.inside_angle,
        input.outside_angle,
        input.root_gap,
        input.thickness,
        input.use_seal_config,
    );
    let inside_area = finite("insideArea", areas.inside)?;
    let outside_area = finite("outsideArea", areas.outside)?;

    let dc_rate = finite("dcMeltingRate", dc_melting_rate(input.dc_current))?;
    let ac_rate = finite("acMeltingRate", ac_melting_rate(input.ac_current))?;

    let speed_mm_per_hour = input.welding_speed * CPM_TO_MM_PER_HOUR;
    let dc_area = area_per_pass(dc_rate, speed_mm_per_hour);
    let ac_area = area_per_pass(ac_rate, speed_mm_per_hour);
    let tandem_area = finite("areaPerPass", (dc_area + ac_area) * TANDEM_EFFICIENCY)?;
    if tandem_area <= 0.0 {
        return Err(ComputationError::NoDeposition {
            dc_current: input.dc_current,
            ac_current: input.ac_current,
            dc_melting_rate: dc_rate,
            ac_melting_rate: ac_rate,
            area_per_pass: tandem_area,
        });
    }

    let inside_required = inside_area / tandem_area;
    let outside_required = outside_area / tandem_area;
    let inside_passes = pass_count("insideRequiredPass", inside_required)?;
    let outside_passes = pass_count("outsideRequiredPass", outside_required)?;
    let total_passes = inside_passes
        .checked_add(outside_passes)
        .ok_or(ComputationError::OutOfRange {
            quantity: "totalPassCount",
            value: f64::from(inside_passes) + f64::from(outside_passes),
        })?;

    tracing::debug!(
        config = %areas.matched.selected(),
        inside_area,
        outside_area,
        tandem_area,
        total_passes,
        "pass count computed"
    );

    Ok(CalculationResult {
        input: *input,
        calculated: Calculated {
            matched_config: areas.matched.label(),
            exact_match: areas.matched.is_exact(),
            inside_area: round2(inside_area),
            outside_area: round2(outside_area),
            dc_melting_rate: round2(dc_rate),
            ac_melting_rate: round2(ac_rate),
            area_per_pass: round2(tandem_area),
            inside_required_pass: round2(inside_required),
            outside_required_pass: round2(outside_required),
            inside_pass_count: inside_passes,
            outside_pass_count: outside_passes,
            total_pass_count: total_passes,
        },
    })
}

/// Cross-section filled per mm of travel by one electrode, in mm².
fn area_per_pass(melting_rate_kg_h: f64, speed_mm_per_hour: f64) -> f64 {
    let grams_per_mm = melting_rate_kg_h * 1000.0 / speed_mm_per_hour;
    grams_per_mm / STEEL_SPECIFIC_GRAVITY
}

fn pass_count(quantity: &'static str, required: f64) -> std::result::Result<u32, ComputationError> {
    let required = finite(quantity, required)?;
    if required < 0.0 {
        return Err(ComputationError::NonPositive {
            quantity,
            value: required,
        });
    }
    let passes = required.ceil();
    if passes > f64::from(u32::MAX) {
        return Err(ComputationError::OutOfRange {
            quantity,
            value: required,
        });
    }
    Ok(passes as u32)
}

fn finite(quantity: &'static str, value: f64) -> std::result::Result<f64, ComputationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ComputationError::NonFinite { quantity })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalcError;
    use crate::passcalc::melting::{
        ac_melting_rate as ac_melting_rate_at, dc_melting_rate as dc_melting_rate_at,
    };
    use crate::passcalc::normalizer::ValidationError;
    use serde_json::json;

    fn input(inside: f64, outside: f64, gap: f64, thickness: f64) -> WeldingInput {
        WeldingInput {
            inside_angle: inside,
            outside_angle: outside,
            root_gap: gap,
            thickness,
            welding_speed: 90.0,
            dc_current: 1000.0,
            ac_current: 900.0,
            use_seal_config: false,
        }
    }

    #[test]
    fn test_default_joint() {
        let result = calculate(&input(80.0, 80.0, 8.0, 40.0)).unwrap();
        let calc = &result.calculated;

        assert_eq!(calc.matched_config, "80-80-8");
        assert!(calc.exact_match);
        assert_eq!(calc.inside_area, 288.55);
        assert_eq!(calc.outside_area, 288.55);
        assert_eq!(calc.dc_melting_rate, 13.1);
        assert_eq!(calc.ac_melting_rate, 15.29);
        assert_eq!(calc.area_per_pass, 77.04);
        assert_eq!(calc.inside_required_pass, 3.75);
        assert_eq!(calc.inside_pass_count, 4);
        assert_eq!(calc.outside_pass_count, 4);
        assert_eq!(calc.total_pass_count, 8);
    }

    #[test]
    fn test_slower_travel_deposits_more_per_pass() {
        let mut slow = input(80.0, 80.0, 8.0, 40.0);
        slow.welding_speed = 30.0;
        let result = calculate(&slow).unwrap();

        // Three times the per-pass area of the 90 cpm case.
        assert_eq!(result.calculated.area_per_pass, 231.11);
        assert_eq!(result.calculated.inside_pass_count, 2);
        assert_eq!(result.calculated.total_pass_count, 4);
    }

    #[test]
    fn test_pass_counts_are_ceiling_of_required() {
        let joints = [
            (50.0, 60.0, 3.0, 12.0),
            (60.0, 70.0, 4.0, 31.4),
            (75.0, 75.0, 8.0, 40.0),
            (90.0, 90.0, 10.0, 80.0),
            (62.0, 71.0, 2.6, 20.0),
        ];
        for (inside, outside, gap, t) in joints {
            let welding = input(inside, outside, gap, t);
            let areas = groove::resolve(inside, outside, gap, t, false);
            let result = calculate(&welding).unwrap();
            let calc = &result.calculated;

            let tandem = (area_per_pass(dc_melting_rate(1000.0), 54_000.0)
                + area_per_pass(ac_melting_rate(900.0), 54_000.0))
                * TANDEM_EFFICIENCY;
            assert_eq!(calc.inside_pass_count, (areas.inside / tandem).ceil() as u32);
            assert_eq!(calc.outside_pass_count, (areas.outside / tandem).ceil() as u32);
            assert_eq!(
                calc.total_pass_count,
                calc.inside_pass_count + calc.outside_pass_count
            );
        }
    }

    #[test]
    fn test_seal_config_reduces_inside_only() {
        let plain = calculate(&input(60.0, 70.0, 3.0, 31.4)).unwrap();
        let mut sealed_input = input(60.0, 70.0, 3.0, 31.4);
        sealed_input.use_seal_config = true;
        let sealed = calculate(&sealed_input).unwrap();

        assert_eq!(sealed.calculated.matched_config, "60-70-3-in");
        assert_eq!(plain.calculated.inside_area, 141.52);
        assert_eq!(sealed.calculated.inside_area, 126.52);
        assert_eq!(plain.calculated.outside_area, sealed.calculated.outside_area);
    }

    #[test]
    fn test_nearest_label_in_result() {
        let result = calculate(&input(75.0, 75.0, 8.0, 40.0)).unwrap();

        assert!(!result.calculated.exact_match);
        assert_eq!(result.calculated.matched_config, "80-80-8 (nearest to 75-75-8)");
    }

    #[test]
    fn test_low_current_fails_computation() {
        let mut weak = input(80.0, 80.0, 8.0, 40.0);
        weak.dc_current = 10.0;
        weak.ac_current = 10.0;

        let err = calculate(&weak).unwrap_err();
        match &err {
            ComputationError::NoDeposition { dc_melting_rate, ac_melting_rate, area_per_pass, .. } => {
                // Reported as computed, not clamped.
                assert!((*dc_melting_rate - dc_melting_rate_at(10.0)).abs() < 1e-12);
                assert!((*ac_melting_rate - ac_melting_rate_at(10.0)).abs() < 1e-12);
                assert!(*area_per_pass < 0.0);
            }
            other => panic!("expected no-deposition error, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "currents deposit no metal: DC 10 A melts -0.87 kg/h, \
             AC 10 A melts -0.35 kg/h, area per pass -3.31 mm²"
        );
    }

    #[test]
    fn test_infinite_thickness_fails_computation() {
        let err = calculate(&input(80.0, 80.0, 8.0, f64::INFINITY)).unwrap_err();
        assert_eq!(err, ComputationError::NonFinite { quantity: "insideArea" });
    }

    #[test]
    fn test_compute_rejects_missing_fields() {
        let request: CalculateRequest =
            serde_json::from_value(json!({ "insideAngle": 80, "outsideAngle": 80, "rootGap": 8 }))
                .unwrap();

        let err = compute(&request).unwrap_err();
        assert!(matches!(
            err,
            CalcError::Validation(ValidationError::MissingFields { .. })
        ));
    }

    #[test]
    fn test_compute_is_deterministic() {
        let request: CalculateRequest = serde_json::from_value(json!({
            "insideAngle": "73",
            "outsideAngle": 77,
            "rootGap": 6.4,
            "thickness": 36,
            "dcCurrent": 1100
        }))
        .unwrap();

        let first = serde_json::to_vec(&compute(&request).unwrap()).unwrap();
        let second = serde_json::to_vec(&compute(&request).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
