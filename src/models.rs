// ABOUTME: Serializable data model for phases, per-rep metrics, and set aggregates
// ABOUTME: Snapshots returned to callers are owned copies of these types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Data model shared by the detector and the metric calculators.
//!
//! Everything here is plain data: owned, cloneable, serde-capable. The
//! engine hands out copies of these types, never live references into its
//! own state.

use serde::{Deserialize, Serialize};

/// Movement phase classified from the smoothed velocity signal.
///
/// Serialized as the lowercase strings downstream consumers expect on the
/// wire (`"rest"`, `"concentric"`, `"eccentric"`, `"hold"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementPhase {
    /// No motion observed yet
    #[default]
    Rest,
    /// Force-producing (loading) phase
    Concentric,
    /// Lengthening (unloading) phase
    Eccentric,
    /// Near-zero velocity between phases
    Hold,
}

/// Approximate time spent in each movement phase within one repetition (ms)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseDistribution {
    /// Time attributed to the concentric phase (ms)
    pub concentric_ms: f64,
    /// Time attributed to the eccentric phase (ms)
    pub eccentric_ms: f64,
    /// Time attributed to holds (ms)
    pub hold_ms: f64,
}

/// Range-of-motion metrics for one repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RomMetrics {
    /// First recorded position of the repetition
    pub start: f64,
    /// Last recorded position of the repetition
    pub end: f64,
    /// Lowest recorded position
    pub min: f64,
    /// Highest recorded position
    pub max: f64,
    /// Displacement magnitude, `|max - min|`
    pub total: f64,
    /// ROM covered per second
    pub velocity: f64,
    /// Sample balance above/below the min-max midpoint, 0-1
    pub symmetry: f64,
    /// Approximate per-phase timing
    pub phase_distribution: PhaseDistribution,
    /// Depth consistency relative to the configured target, 0-1
    pub depth_accuracy: f64,
    /// Target depth the repetition was scored against, when configured
    pub target_depth: Option<f64>,
}

impl Default for RomMetrics {
    /// Neutral ROM: all-zero extents with symmetry and depth accuracy at
    /// their no-degradation identity of 1.
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            min: 0.0,
            max: 0.0,
            total: 0.0,
            velocity: 0.0,
            symmetry: 1.0,
            phase_distribution: PhaseDistribution::default(),
            depth_accuracy: 1.0,
            target_depth: None,
        }
    }
}

/// Acceleration shape of one repetition
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VelocityProfile {
    /// Mean positive acceleration (cm/s²)
    pub acceleration: f64,
    /// Mean negative acceleration (cm/s²)
    pub deceleration: f64,
    /// Peak positive acceleration (cm/s²)
    pub peak_accel: f64,
    /// Peak negative acceleration (cm/s²)
    pub peak_decel: f64,
    /// Elapsed time from rep start to the max-|velocity| sample (ms)
    pub time_to_max_velocity_ms: f64,
    /// Estimated power output in watts (fixed-mass model)
    pub power_output_watts: f64,
}

/// Fatigue indicators for one repetition relative to the set so far
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueMetrics {
    /// Peak-velocity drop versus the first completed rep, `(first - current) / first`
    pub velocity_decay: f64,
    /// ROM drop versus the first completed rep
    pub rom_decay: f64,
    /// Combined ROM/velocity variability across completed reps, 0-1
    pub form_deviation: f64,
    /// Time under load for the current repetition (ms)
    pub time_under_tension_ms: f64,
    /// Idle time over total elapsed time since the set started, 0-1
    pub rest_ratio: f64,
    /// Power maintenance versus the first completed rep, 1 = no loss
    pub power_endurance: f64,
}

impl Default for FatigueMetrics {
    fn default() -> Self {
        Self {
            velocity_decay: 0.0,
            rom_decay: 0.0,
            form_deviation: 0.0,
            time_under_tension_ms: 0.0,
            rest_ratio: 0.0,
            power_endurance: 1.0,
        }
    }
}

/// Metrics for one repetition.
///
/// While a repetition is open this doubles as the live in-progress
/// snapshot, recomputed on every sample; once the rep validates on close it
/// is frozen and appended to the completed list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepMetrics {
    /// Repetition duration (ms)
    pub duration_ms: f64,
    /// Peak |velocity| over the repetition (cm/s)
    pub peak_velocity: f64,
    /// Average |velocity| over the repetition (cm/s)
    pub avg_velocity: f64,
    /// Phase the repetition was last observed in
    pub phase: MovementPhase,
    /// Velocity smoothness, 0-1
    pub smoothness: f64,
    /// Range-of-motion metrics
    pub rom: RomMetrics,
    /// Acceleration shape
    pub velocity_profile: VelocityProfile,
    /// Fatigue indicators
    pub fatigue: FatigueMetrics,
    /// Overall quality score, 0-1
    pub confidence: f64,
}

impl Default for RepMetrics {
    fn default() -> Self {
        Self {
            duration_ms: 0.0,
            peak_velocity: 0.0,
            avg_velocity: 0.0,
            phase: MovementPhase::Rest,
            smoothness: 1.0,
            rom: RomMetrics::default(),
            velocity_profile: VelocityProfile::default(),
            fatigue: FatigueMetrics::default(),
            confidence: 0.0,
        }
    }
}

/// Why an otherwise-closed repetition was discarded.
///
/// Diagnostic only: rejected reps are absent from the completed list and
/// `process_sample` still returns `false` for them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RepRejection {
    /// Rep closed faster than the configured minimum duration
    TooShort {
        /// Measured duration (ms)
        duration_ms: f64,
        /// Configured minimum (ms)
        min_ms: f64,
    },
    /// Rep stayed open longer than the configured maximum duration
    TooLong {
        /// Measured duration (ms)
        duration_ms: f64,
        /// Configured maximum (ms)
        max_ms: f64,
    },
    /// Rep covered less range of motion than the configured minimum
    InsufficientRom {
        /// Measured ROM total
        rom: f64,
        /// Configured minimum ROM
        min_rom: f64,
    },
}

/// Read-only snapshot of the engine state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorState {
    /// Current movement phase
    pub phase: MovementPhase,
    /// Last calibrated velocity sample (cm/s)
    pub last_velocity: f64,
    /// Current EMA-smoothed velocity (cm/s)
    pub smoothed_velocity: f64,
    /// Last raw finite-difference acceleration (cm/s²)
    pub last_acceleration: f64,
    /// Number of validated repetitions completed this set
    pub rep_count: usize,
    /// Whether a repetition is currently open
    pub rep_in_progress: bool,
    /// Live in-progress metrics when a repetition is open
    pub current_rep: Option<RepMetrics>,
    /// Most recent discarded-rep diagnostic, if any
    pub last_rejection: Option<RepRejection>,
    /// Target depth reps are scored against, when configured
    pub target_depth: Option<f64>,
}

/// Form-breakdown indicators across a set, each 0-1
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalBreakdown {
    /// Increasing depth inconsistency
    pub depth_loss: f64,
    /// Increasing movement asymmetry
    pub asymmetry: f64,
    /// Degradation in tempo consistency versus the ideal tempo
    pub timing: f64,
}

/// Cross-rep trend indicators for a set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetTrends {
    /// ROM change first-to-last rep, clamped to [-1, 1]
    pub rom_progression: f64,
    /// Peak-velocity change first-to-last rep, clamped to [-1, 1]
    pub speed_progression: f64,
    /// Confidence degradation first-to-last rep, 0-1
    pub fatigue_index: f64,
    /// Power maintenance across the set, 1 = no loss
    pub power_endurance: f64,
    /// Form-breakdown indicators
    pub technical_breakdown: TechnicalBreakdown,
}

impl Default for SetTrends {
    fn default() -> Self {
        Self {
            rom_progression: 0.0,
            speed_progression: 0.0,
            fatigue_index: 0.0,
            power_endurance: 1.0,
            technical_breakdown: TechnicalBreakdown::default(),
        }
    }
}

/// Coarse rating of a set's average power output against configured
/// thresholds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerRating {
    /// Above the excellent threshold
    Excellent,
    /// Between the good and excellent thresholds
    Good,
    /// Between the average and good thresholds
    Average,
    /// Below the average threshold (also the empty-set default)
    #[default]
    Low,
}

/// Work and density accounting for a set
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeMetrics {
    /// Estimated total work done (joules)
    pub total_work_joules: f64,
    /// Summed rep durations (ms)
    pub time_under_tension_ms: f64,
    /// Average power output across the set (watts)
    pub average_power_watts: f64,
    /// Work per unit time under tension
    pub density: f64,
    /// Average power classified against the configured thresholds
    pub power_rating: PowerRating,
}

/// Aggregate metrics for a set of completed repetitions.
///
/// Recomputed from the completed-rep list on every call; never cached or
/// persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetMetrics {
    /// Number of validated repetitions
    pub rep_count: usize,
    /// Mean rep confidence, 0-1
    pub avg_confidence: f64,
    /// Rep-duration consistency, 0-1
    pub consistency: f64,
    /// Mean rep smoothness, 0-1
    pub avg_smoothness: f64,
    /// ROM-total consistency, 0-1
    pub rom_consistency: f64,
    /// The completed repetitions, in completion order
    pub reps: Vec<RepMetrics>,
    /// Cross-rep trend indicators
    pub trends: SetTrends,
    /// Work and density accounting
    pub volume: VolumeMetrics,
}

impl Default for SetMetrics {
    /// Neutral aggregates for an empty set: zeros everywhere except the
    /// ratio-style `power_endurance`, whose no-degradation identity is 1.
    fn default() -> Self {
        Self {
            rep_count: 0,
            avg_confidence: 0.0,
            consistency: 0.0,
            avg_smoothness: 0.0,
            rom_consistency: 0.0,
            reps: Vec::new(),
            trends: SetTrends::default(),
            volume: VolumeMetrics::default(),
        }
    }
}
