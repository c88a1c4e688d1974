// ABOUTME: Range-of-motion metrics from a repetition's position history
// ABOUTME: Fewer than two positions yields the neutral all-zero ROM
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Range-of-motion calculator.

use crate::constants::time::MS_PER_SECOND;
use crate::history::SampleHistory;
use crate::models::{MovementPhase, PhaseDistribution, RomMetrics};

/// Compute ROM metrics over the rep-scoped position history.
///
/// `current_phase` and `previous_rep_duration_ms` feed the phase-timing
/// approximation: the whole-history elapsed time is attributed to the phase
/// currently in progress, and the previous rep's duration stands in for the
/// loading phases not currently active.
pub(crate) fn compute(
    positions: &SampleHistory,
    timestamps: &SampleHistory,
    current_phase: MovementPhase,
    previous_rep_duration_ms: f64,
    target_depth: Option<f64>,
) -> RomMetrics {
    if positions.len() < 2 {
        return RomMetrics {
            target_depth,
            ..RomMetrics::default()
        };
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in positions.iter() {
        min = min.min(p);
        max = max.max(p);
    }
    let total = (max - min).abs();

    let duration_ms = match (timestamps.first(), timestamps.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    };
    let duration_s = duration_ms / MS_PER_SECOND;

    let midpoint = (max + min) / 2.0;
    let above = positions.iter().filter(|p| *p > midpoint).count();
    let below = positions.iter().filter(|p| *p < midpoint).count();
    let symmetry = if above.max(below) == 0 {
        // Flat trace: nothing leaves the midpoint
        1.0
    } else {
        above.min(below) as f64 / above.max(below) as f64
    };

    let phase_distribution = PhaseDistribution {
        concentric_ms: if current_phase == MovementPhase::Concentric {
            duration_ms
        } else {
            previous_rep_duration_ms
        },
        eccentric_ms: if current_phase == MovementPhase::Eccentric {
            duration_ms
        } else {
            previous_rep_duration_ms
        },
        hold_ms: if current_phase == MovementPhase::Hold {
            duration_ms
        } else {
            0.0
        },
    };

    let depth_accuracy =
        target_depth.map_or(1.0, |target| 1.0 - (target - min).abs() / target);

    RomMetrics {
        start: positions.first().unwrap_or(0.0),
        end: positions.last().unwrap_or(0.0),
        min,
        max,
        total,
        velocity: if duration_s > 0.0 { total / duration_s } else { 0.0 },
        symmetry,
        phase_distribution,
        depth_accuracy,
        target_depth,
    }
}
