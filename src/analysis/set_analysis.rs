// ABOUTME: Cross-rep aggregation: consistency scores, trends, breakdown, volume
// ABOUTME: An empty set returns documented neutral defaults, never NaN
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Set-level aggregation.
//!
//! Derived entirely from the completed-rep list: the detector recomputes
//! these aggregates on demand and never caches them.

use crate::analysis::statistics::{mean, std_dev, variance};
use crate::config::RepDetectorConfig;
use crate::constants::tempo::{DEFAULT_CONCENTRIC_MS, DEFAULT_ECCENTRIC_MS};
use crate::constants::time::MS_PER_SECOND;
use crate::models::{RepMetrics, SetMetrics, SetTrends, TechnicalBreakdown, VolumeMetrics};

/// Aggregate the completed repetitions of a set.
pub(crate) fn compute(completed: &[RepMetrics], config: &RepDetectorConfig) -> SetMetrics {
    if completed.is_empty() {
        return SetMetrics::default();
    }

    let confidences: Vec<f64> = completed.iter().map(|r| r.confidence).collect();
    let smoothness: Vec<f64> = completed.iter().map(|r| r.smoothness).collect();
    let durations: Vec<f64> = completed.iter().map(|r| r.duration_ms).collect();
    let roms: Vec<f64> = completed.iter().map(|r| r.rom.total).collect();

    SetMetrics {
        rep_count: completed.len(),
        avg_confidence: mean(&confidences),
        consistency: consistency_score(&durations),
        avg_smoothness: mean(&smoothness),
        rom_consistency: consistency_score(&roms),
        reps: completed.to_vec(),
        trends: compute_trends(completed, config),
        volume: compute_volume(completed, config),
    }
}

/// Relative-scatter consistency in [0, 1]: 1 means identical values.
/// A non-positive mean scores 0.
fn consistency_score(values: &[f64]) -> f64 {
    let m = mean(values);
    if m <= 0.0 {
        return 0.0;
    }
    (1.0 - std_dev(values) / m).max(0.0)
}

fn compute_trends(completed: &[RepMetrics], config: &RepDetectorConfig) -> SetTrends {
    let (Some(first), Some(last)) = (completed.first(), completed.last()) else {
        return SetTrends::default();
    };
    if completed.len() < 2 {
        return SetTrends::default();
    }

    let rom_progression =
        ((last.rom.total - first.rom.total) / first.rom.total.max(1.0)).clamp(-1.0, 1.0);
    let speed_progression =
        ((last.peak_velocity - first.peak_velocity) / first.peak_velocity.max(1.0))
            .clamp(-1.0, 1.0);

    // A zero-confidence first rep would make degradation undefined; treat
    // the baseline as perfect instead.
    let first_confidence = if first.confidence > 0.0 {
        first.confidence
    } else {
        1.0
    };
    let fatigue_index = ((first_confidence - last.confidence) / first_confidence).clamp(0.0, 1.0);

    SetTrends {
        rom_progression,
        speed_progression,
        fatigue_index,
        power_endurance: last.fatigue.power_endurance,
        technical_breakdown: technical_breakdown(completed, config),
    }
}

fn technical_breakdown(completed: &[RepMetrics], config: &RepDetectorConfig) -> TechnicalBreakdown {
    let (Some(first), Some(last)) = (completed.first(), completed.last()) else {
        return TechnicalBreakdown::default();
    };
    if completed.len() < 2 {
        return TechnicalBreakdown::default();
    }

    // Depth scatter normalized by the ROM floor and the configured
    // tolerated-variance fraction
    let depths: Vec<f64> = completed.iter().map(|r| r.rom.min).collect();
    let tolerated = config.min_rom.powi(2) * config.max_rom_variance;
    let depth_loss = if tolerated > 0.0 {
        (variance(&depths) / tolerated).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let asymmetry = if first.rom.symmetry > 0.0 {
        (1.0 - last.rom.symmetry / first.rom.symmetry).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (ideal_concentric, ideal_eccentric) = config.ideal_tempo.map_or(
        (DEFAULT_CONCENTRIC_MS, DEFAULT_ECCENTRIC_MS),
        |tempo| (tempo.concentric_ms, tempo.eccentric_ms),
    );
    let tempo_deviation = |rep: &RepMetrics| {
        (rep.rom.phase_distribution.concentric_ms - ideal_concentric).abs() / ideal_concentric
            + (rep.rom.phase_distribution.eccentric_ms - ideal_eccentric).abs() / ideal_eccentric
    };
    let timing = ((tempo_deviation(last) - tempo_deviation(first)) / 2.0).clamp(0.0, 1.0);

    TechnicalBreakdown {
        depth_loss,
        asymmetry,
        timing,
    }
}

fn compute_volume(completed: &[RepMetrics], config: &RepDetectorConfig) -> VolumeMetrics {
    let total_work_joules: f64 = completed
        .iter()
        .map(|r| r.velocity_profile.power_output_watts * (r.duration_ms / MS_PER_SECOND))
        .sum();
    let time_under_tension_ms: f64 = completed.iter().map(|r| r.duration_ms).sum();

    let average_power_watts = if time_under_tension_ms > 0.0 {
        total_work_joules / (time_under_tension_ms / MS_PER_SECOND)
    } else {
        0.0
    };
    let density = if time_under_tension_ms > 0.0 {
        total_work_joules / time_under_tension_ms
    } else {
        0.0
    };

    VolumeMetrics {
        total_work_joules,
        time_under_tension_ms,
        average_power_watts,
        density,
        power_rating: config.power_thresholds.classify(average_power_watts),
    }
}
