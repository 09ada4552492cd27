//! Wire melting rate regressions for the tandem submerged-arc electrodes.
//!
//! Both curves are fitted in amperes and return kilograms per hour. Low
//! currents give negative rates; those are passed through as-is.

/// DC lead electrode melting rate.
///
/// MR = 0.000001·I² + 0.0131·I − 0.998
pub fn dc_melting_rate(current_a: f64) -> f64 {
    0.000001 * current_a.powi(2) + 0.0131 * current_a - 0.998
}

/// AC trail electrode melting rate.
///
/// MR = 0.000008·I² + 0.0103·I − 0.4557
pub fn ac_melting_rate(current_a: f64) -> f64 {
    0.000008 * current_a.powi(2) + 0.0103 * current_a - 0.4557
}
