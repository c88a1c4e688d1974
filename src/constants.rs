// ABOUTME: Kinematic sign conventions, power model values, and scoring constants
// ABOUTME: Centralizes every tunable the detection and scoring pipeline hardcodes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Named constants used throughout the detection and scoring pipeline.
//!
//! Several of these are calibration constants: they were tuned against
//! synthetic motion fixtures, not derived from physical first principles.
//! Each such constant is flagged in its doc comment so re-tuning against
//! real capture data has a single place to start from.

/// Sign conventions and sampling bounds for the phase state machine
pub mod kinematics {
    /// Direction of concentric (force-producing) movement on the velocity
    /// axis: the upstream motion tracker reports the loading phase as
    /// negative velocity, and callers must orient their velocity sign to
    /// match.
    ///
    /// Calibration constant: this polarity matches the capture pipeline
    /// the engine was tuned against and has not been validated against
    /// other sensors.
    pub const CONCENTRIC_VELOCITY_SIGN: f64 = -1.0;

    /// Fastest sample cadence the engine budgets memory for (ms).
    ///
    /// History hard caps are `max_rep_duration_ms` divided by this value,
    /// so buffers stay bounded even on malformed streams that never close
    /// a repetition.
    pub const MIN_EXPECTED_SAMPLE_INTERVAL_MS: f64 = 10.0;
}

/// Fixed power-output model
pub mod power {
    /// Assumed lifter mass in kilograms. Documented simplification: power
    /// output is not calibrated per user.
    pub const ASSUMED_BODY_MASS_KG: f64 = 70.0;

    /// Standard gravity in m/s²
    pub const GRAVITY_MS2: f64 = 9.81;

    /// Velocity samples arrive in cm/s; the power model works in m/s.
    pub const CM_PER_M: f64 = 100.0;
}

/// Confidence scoring weights and full-score reference values.
///
/// Calibration constants: the weights and reference values were tuned to
/// rank synthetic fixtures sensibly and should be re-tuned against real
/// motion data before being treated as authoritative.
pub mod scoring {
    /// Repetition duration scored as ideal (ms)
    pub const IDEAL_REP_DURATION_MS: f64 = 1500.0;

    /// Peak velocity (cm/s) earning a full velocity sub-score
    pub const EXPECTED_PEAK_VELOCITY: f64 = 20.0;

    /// Combined |acceleration| + |deceleration| (cm/s²) earning a full
    /// velocity-profile sub-score
    pub const FULL_PROFILE_ACCEL: f64 = 20.0;

    /// Weight of duration closeness to ideal
    pub const DURATION_WEIGHT: f64 = 0.10;
    /// Weight of peak-velocity adequacy
    pub const VELOCITY_WEIGHT: f64 = 0.25;
    /// Weight of range-of-motion adequacy
    pub const ROM_WEIGHT: f64 = 0.25;
    /// Weight of movement smoothness
    pub const SMOOTHNESS_WEIGHT: f64 = 0.35;
    /// Weight of velocity-profile magnitude
    pub const PROFILE_WEIGHT: f64 = 0.05;
}

/// Fallback tempo targets applied when no ideal tempo is configured
pub mod tempo {
    /// Default ideal concentric phase duration (ms)
    pub const DEFAULT_CONCENTRIC_MS: f64 = 1500.0;
    /// Default ideal eccentric phase duration (ms)
    pub const DEFAULT_ECCENTRIC_MS: f64 = 2000.0;
    /// Default ideal hold duration (ms)
    pub const DEFAULT_HOLD_MS: f64 = 500.0;
}

/// Time unit conversions
pub mod time {
    /// Milliseconds per second
    pub const MS_PER_SECOND: f64 = 1000.0;
}

#[cfg(test)]
mod tests {
    use super::scoring;

    #[test]
    fn confidence_weights_sum_to_one() {
        let total = scoring::DURATION_WEIGHT
            + scoring::VELOCITY_WEIGHT
            + scoring::ROM_WEIGHT
            + scoring::SMOOTHNESS_WEIGHT
            + scoring::PROFILE_WEIGHT;
        assert!((total - 1.0).abs() < f64::EPSILON);
    }
}
