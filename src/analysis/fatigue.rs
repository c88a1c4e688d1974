// ABOUTME: Fatigue indicators for the current rep relative to the set so far
// ABOUTME: Baselines come from the first completed rep; no baseline means no decay
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Fatigue calculator.

use crate::analysis::statistics::variance;
use crate::models::{FatigueMetrics, RepMetrics};

/// Measurements of the repetition currently being scored
#[derive(Debug, Clone, Copy)]
pub(crate) struct CurrentRep {
    /// Peak |velocity| so far (cm/s)
    pub peak_velocity: f64,
    /// ROM total so far
    pub rom_total: f64,
    /// Estimated power output (watts)
    pub power_watts: f64,
    /// Elapsed time under load (ms)
    pub time_under_tension_ms: f64,
}

/// Compute fatigue indicators against the completed reps of this set.
///
/// `idle_ms`/`active_ms` are the cumulative out-of-rep and in-rep times
/// accounted per-sample since the set started.
pub(crate) fn compute(
    completed: &[RepMetrics],
    current: &CurrentRep,
    idle_ms: f64,
    active_ms: f64,
) -> FatigueMetrics {
    let velocity_decay = decay_rate(
        completed.first().map(|r| r.peak_velocity),
        current.peak_velocity,
    );
    let rom_decay = decay_rate(completed.first().map(|r| r.rom.total), current.rom_total);

    let form_deviation = if completed.len() < 2 {
        0.0
    } else {
        let roms: Vec<f64> = completed.iter().map(|r| r.rom.total).collect();
        let peaks: Vec<f64> = completed.iter().map(|r| r.peak_velocity).collect();
        ((variance(&roms) + variance(&peaks)) / 2.0).min(1.0)
    };

    let total_ms = idle_ms + active_ms;
    let rest_ratio = if total_ms > 0.0 { idle_ms / total_ms } else { 0.0 };

    let power_endurance = completed.first().map_or(1.0, |first| {
        let baseline = first.velocity_profile.power_output_watts;
        if baseline > 0.0 {
            current.power_watts / baseline
        } else {
            1.0
        }
    });

    FatigueMetrics {
        velocity_decay,
        rom_decay,
        form_deviation,
        time_under_tension_ms: current.time_under_tension_ms,
        rest_ratio,
        power_endurance,
    }
}

/// Fractional drop from a baseline; 0 without a positive baseline
fn decay_rate(baseline: Option<f64>, current: f64) -> f64 {
    baseline.map_or(0.0, |b| if b > 0.0 { (b - current) / b } else { 0.0 })
}
