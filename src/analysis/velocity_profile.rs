// ABOUTME: Acceleration shape, time-to-peak-velocity, and power output for one rep
// ABOUTME: Falls back to smoothed-velocity deltas when the acceleration history is empty
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Velocity-profile calculator.

use crate::analysis::statistics::mean;
use crate::constants::power::{ASSUMED_BODY_MASS_KG, CM_PER_M, GRAVITY_MS2};
use crate::constants::time::MS_PER_SECOND;
use crate::history::SampleHistory;
use crate::models::VelocityProfile;

/// Estimated power output for an average |velocity| in cm/s.
///
/// Fixed-mass model: force = assumed body mass × gravity, velocity
/// converted to m/s. Not calibrated per user.
pub(crate) fn power_output(avg_abs_velocity: f64) -> f64 {
    ASSUMED_BODY_MASS_KG * GRAVITY_MS2 * (avg_abs_velocity / CM_PER_M)
}

/// Compute the velocity profile over the rep-scoped histories.
pub(crate) fn compute(
    velocities: &SampleHistory,
    smoothed_velocities: &SampleHistory,
    timestamps: &SampleHistory,
    accelerations: &SampleHistory,
) -> VelocityProfile {
    if velocities.is_empty() {
        return VelocityProfile::default();
    }

    let mut accels: Vec<f64> = accelerations.iter().filter(|a| *a > 0.0).collect();
    let mut decels: Vec<f64> = accelerations.iter().filter(|a| *a < 0.0).collect();

    // Fallback: derive accelerations from the smoothed velocity series when
    // no smoothed-acceleration samples were recorded for this rep yet.
    if accels.is_empty() && decels.is_empty() && smoothed_velocities.len() > 1 {
        for i in 1..smoothed_velocities.len() {
            let dt_s = match (timestamps.get(i), timestamps.get(i - 1)) {
                (Some(now), Some(prev)) => (now - prev) / MS_PER_SECOND,
                _ => 0.0,
            };
            if dt_s > 0.0 {
                let delta = match (smoothed_velocities.get(i), smoothed_velocities.get(i - 1)) {
                    (Some(now), Some(prev)) => (now - prev) / dt_s,
                    _ => 0.0,
                };
                if delta > 0.0 {
                    accels.push(delta);
                } else if delta < 0.0 {
                    decels.push(delta);
                }
            }
        }
    }

    let mut peak_abs = 0.0_f64;
    let mut peak_index = 0_usize;
    for (i, v) in velocities.iter().enumerate() {
        if v.abs() > peak_abs {
            peak_abs = v.abs();
            peak_index = i;
        }
    }
    let time_to_max_velocity_ms = if peak_index > 0 {
        match (timestamps.get(peak_index), timestamps.first()) {
            (Some(at_peak), Some(first)) => at_peak - first,
            _ => 0.0,
        }
    } else {
        0.0
    };

    let abs_velocities: Vec<f64> = velocities.iter().map(f64::abs).collect();
    let avg_velocity = mean(&abs_velocities);

    VelocityProfile {
        acceleration: mean(&accels),
        deceleration: mean(&decels),
        peak_accel: accels.iter().fold(0.0_f64, |acc, a| acc.max(*a)),
        peak_decel: decels.iter().fold(0.0_f64, |acc, a| acc.min(*a)),
        time_to_max_velocity_ms,
        power_output_watts: power_output(avg_velocity),
    }
}
