// ABOUTME: Detector tunables with documented defaults and construction-time validation
// ABOUTME: Callers override fields via struct-update syntax over the Default impl
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Detector configuration.
//!
//! All tunables are merged once at construction and never mutated
//! afterwards; the only mutable knob on a live detector is calibration.
//! Overrides use struct-update syntax:
//!
//! ```
//! use repsense::RepDetectorConfig;
//!
//! let config = RepDetectorConfig {
//!     velocity_threshold: 5.0,
//!     ..RepDetectorConfig::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::kinematics::MIN_EXPECTED_SAMPLE_INTERVAL_MS;
use crate::errors::ConfigError;
use crate::models::PowerRating;

/// Ideal tempo targets for a movement, used to score timing drift
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdealTempo {
    /// Ideal concentric phase duration (ms)
    pub concentric_ms: f64,
    /// Ideal eccentric phase duration (ms)
    pub eccentric_ms: f64,
    /// Ideal hold duration (ms)
    pub hold_ms: f64,
}

impl Default for IdealTempo {
    fn default() -> Self {
        Self {
            concentric_ms: 1500.0,
            eccentric_ms: 2000.0,
            hold_ms: 500.0,
        }
    }
}

/// Power-output thresholds used to rate a set's average power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerThresholds {
    /// Watts at or above which output rates excellent
    pub excellent_watts: f64,
    /// Watts at or above which output rates good
    pub good_watts: f64,
    /// Watts at or above which output rates average
    pub average_watts: f64,
}

impl Default for PowerThresholds {
    fn default() -> Self {
        Self {
            excellent_watts: 500.0,
            good_watts: 300.0,
            average_watts: 200.0,
        }
    }
}

impl PowerThresholds {
    /// Classify an average power output against these thresholds
    #[must_use]
    pub fn classify(&self, watts: f64) -> PowerRating {
        if watts >= self.excellent_watts {
            PowerRating::Excellent
        } else if watts >= self.good_watts {
            PowerRating::Good
        } else if watts >= self.average_watts {
            PowerRating::Average
        } else {
            PowerRating::Low
        }
    }
}

/// Tunables for repetition detection and scoring
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepDetectorConfig {
    /// Smoothed velocities below this magnitude classify as a hold (cm/s)
    pub velocity_threshold: f64,
    /// Minimum elapsed time before accepting a new phase classification (ms)
    pub debounce_window_ms: f64,
    /// Shortest duration accepted as a valid repetition (ms)
    pub min_rep_duration_ms: f64,
    /// Longest duration accepted as a valid repetition (ms)
    pub max_rep_duration_ms: f64,
    /// History window kept while no repetition is open (samples)
    pub history_window: usize,
    /// EMA factor applied to velocity smoothing, in (0, 1]
    pub velocity_ema: f64,
    /// EMA factor applied to acceleration smoothing, in (0, 1]
    pub accel_ema: f64,
    /// Minimum range of motion accepted as a valid repetition
    pub min_rom: f64,
    /// Fraction of ROM scatter tolerated before depth loss scores maximal,
    /// in (0, 1]
    pub max_rom_variance: f64,
    /// Target depth reps are scored against, when the movement has one
    pub target_depth: Option<f64>,
    /// Ideal tempo used to score timing drift; falls back to built-in
    /// defaults when absent
    pub ideal_tempo: Option<IdealTempo>,
    /// Thresholds used to rate the set's average power output
    pub power_thresholds: PowerThresholds,
}

impl Default for RepDetectorConfig {
    fn default() -> Self {
        Self {
            // Ignore movements below 3 cm/s
            velocity_threshold: 3.0,
            // Suppress phase flapping at 25-50ms sample cadence
            debounce_window_ms: 80.0,
            min_rep_duration_ms: 300.0,
            max_rep_duration_ms: 5000.0,
            history_window: 20,
            velocity_ema: 0.15,
            accel_ema: 0.2,
            min_rom: 20.0,
            max_rom_variance: 0.25,
            target_depth: None,
            ideal_tempo: Some(IdealTempo::default()),
            power_thresholds: PowerThresholds::default(),
        }
    }
}

impl RepDetectorConfig {
    /// Check every configuration bound.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rep_duration_ms <= 0.0 || self.max_rep_duration_ms <= 0.0 {
            return Err(ConfigError::NonPositiveDurationBound {
                min_ms: self.min_rep_duration_ms,
                max_ms: self.max_rep_duration_ms,
            });
        }
        if self.min_rep_duration_ms > self.max_rep_duration_ms {
            return Err(ConfigError::InvertedDurationBounds {
                min_ms: self.min_rep_duration_ms,
                max_ms: self.max_rep_duration_ms,
            });
        }
        for (name, value) in [
            ("velocity_ema", self.velocity_ema),
            ("accel_ema", self.accel_ema),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::SmoothingFactorOutOfRange { name, value });
            }
        }
        if self.velocity_threshold <= 0.0 {
            return Err(ConfigError::NonPositiveVelocityThreshold(
                self.velocity_threshold,
            ));
        }
        if self.debounce_window_ms < 0.0 {
            return Err(ConfigError::NegativeDebounceWindow(self.debounce_window_ms));
        }
        if self.history_window == 0 {
            return Err(ConfigError::EmptyHistoryWindow);
        }
        if self.min_rom <= 0.0 {
            return Err(ConfigError::NonPositiveMinRom(self.min_rom));
        }
        if !(self.max_rom_variance > 0.0 && self.max_rom_variance <= 1.0) {
            return Err(ConfigError::RomVarianceOutOfRange(self.max_rom_variance));
        }
        if let Some(depth) = self.target_depth {
            if depth <= 0.0 {
                return Err(ConfigError::NonPositiveTargetDepth(depth));
            }
        }
        if let Some(tempo) = self.ideal_tempo {
            if tempo.concentric_ms <= 0.0 || tempo.eccentric_ms <= 0.0 || tempo.hold_ms <= 0.0 {
                return Err(ConfigError::NonPositiveTempoPhase {
                    concentric_ms: tempo.concentric_ms,
                    eccentric_ms: tempo.eccentric_ms,
                    hold_ms: tempo.hold_ms,
                });
            }
        }
        Ok(())
    }

    /// Hard cap for rep-scoped history buffers: the sample count a
    /// maximum-length repetition produces at the fastest supported cadence.
    pub(crate) fn rep_history_capacity(&self) -> usize {
        (self.max_rep_duration_ms / MIN_EXPECTED_SAMPLE_INTERVAL_MS).ceil() as usize
    }
}
