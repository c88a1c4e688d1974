// ABOUTME: Configuration validation errors raised at detector construction
// ABOUTME: The streaming path itself is infallible; only construction can reject input
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Error types for detector construction.
//!
//! Sample processing never fails: numeric edge cases resolve to documented
//! neutral values instead. The only fallible operation is building a
//! detector from caller-supplied tunables.

use thiserror::Error;

/// A configuration bound violated when constructing a [`crate::RepDetector`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Minimum rep duration exceeds the maximum
    #[error("min_rep_duration_ms ({min_ms}) exceeds max_rep_duration_ms ({max_ms})")]
    InvertedDurationBounds {
        /// Configured minimum rep duration (ms)
        min_ms: f64,
        /// Configured maximum rep duration (ms)
        max_ms: f64,
    },

    /// Rep duration bounds must be positive
    #[error("rep duration bounds must be positive, got min {min_ms} / max {max_ms}")]
    NonPositiveDurationBound {
        /// Configured minimum rep duration (ms)
        min_ms: f64,
        /// Configured maximum rep duration (ms)
        max_ms: f64,
    },

    /// An EMA factor is outside the half-open unit interval
    #[error("{name} must be within (0, 1], got {value}")]
    SmoothingFactorOutOfRange {
        /// Which factor was rejected
        name: &'static str,
        /// The rejected value
        value: f64,
    },

    /// The phase-classification velocity threshold must be positive
    #[error("velocity_threshold must be positive, got {0}")]
    NonPositiveVelocityThreshold(f64),

    /// The debounce window cannot be negative
    #[error("debounce_window_ms must be non-negative, got {0}")]
    NegativeDebounceWindow(f64),

    /// The idle smoothing window needs at least one sample
    #[error("history_window must be at least 1 sample")]
    EmptyHistoryWindow,

    /// The minimum range of motion must be positive
    #[error("min_rom must be positive, got {0}")]
    NonPositiveMinRom(f64),

    /// The tolerated ROM variance fraction is outside the unit interval
    #[error("max_rom_variance must be within (0, 1], got {0}")]
    RomVarianceOutOfRange(f64),

    /// A configured target depth must be positive
    #[error("target_depth must be positive when set, got {0}")]
    NonPositiveTargetDepth(f64),

    /// Ideal tempo phases must be positive durations
    #[error("ideal tempo phases must be positive, got concentric {concentric_ms} / eccentric {eccentric_ms} / hold {hold_ms}")]
    NonPositiveTempoPhase {
        /// Configured ideal concentric duration (ms)
        concentric_ms: f64,
        /// Configured ideal eccentric duration (ms)
        eccentric_ms: f64,
        /// Configured ideal hold duration (ms)
        hold_ms: f64,
    },
}
