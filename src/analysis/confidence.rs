// ABOUTME: Smoothness scoring and the weighted rep confidence score
// ABOUTME: Both scores are clamped to the unit interval for any finite input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Confidence and smoothness scoring.

use crate::analysis::statistics::{max_abs, std_dev};
use crate::constants::scoring::{
    DURATION_WEIGHT, EXPECTED_PEAK_VELOCITY, FULL_PROFILE_ACCEL, IDEAL_REP_DURATION_MS,
    PROFILE_WEIGHT, ROM_WEIGHT, SMOOTHNESS_WEIGHT, VELOCITY_WEIGHT,
};
use crate::models::RepMetrics;

/// Velocity smoothness in [0, 1]: penalizes velocity scatter relative to
/// the series peak. Fewer than two samples score a perfect 1.
pub(crate) fn smoothness(velocities: &[f64]) -> f64 {
    if velocities.len() < 2 {
        return 1.0;
    }
    let peak = max_abs(velocities).max(1.0);
    (1.0 - std_dev(velocities) / (peak + 1.0)).max(0.0)
}

/// Weighted rep confidence in [0, 1].
///
/// Sub-scores: duration closeness to ideal, peak-velocity adequacy, ROM
/// adequacy, smoothness, and velocity-profile magnitude, combined with the
/// weights in [`crate::constants::scoring`]. Missing duration, peak
/// velocity, or ROM scores 0 outright.
pub(crate) fn compute(metrics: &RepMetrics, min_rom: f64) -> f64 {
    if metrics.duration_ms <= 0.0 || metrics.peak_velocity <= 0.0 || metrics.rom.total <= 0.0 {
        return 0.0;
    }

    let duration_score = (1.0
        - (metrics.duration_ms - IDEAL_REP_DURATION_MS).abs() / IDEAL_REP_DURATION_MS)
        .clamp(0.0, 1.0);
    let velocity_score = (metrics.peak_velocity / EXPECTED_PEAK_VELOCITY).min(1.0);
    let rom_score = (metrics.rom.total / min_rom).min(1.0);
    let smoothness_score = metrics.smoothness.clamp(0.0, 1.0);
    let profile_score = ((metrics.velocity_profile.acceleration.abs()
        + metrics.velocity_profile.deceleration.abs())
        / FULL_PROFILE_ACCEL)
        .min(1.0);

    duration_score * DURATION_WEIGHT
        + velocity_score * VELOCITY_WEIGHT
        + rom_score * ROM_WEIGHT
        + smoothness_score * SMOOTHNESS_WEIGHT
        + profile_score * PROFILE_WEIGHT
}
