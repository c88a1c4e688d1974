// ABOUTME: Velocity-based repetition detection and set analytics engine
// ABOUTME: Streams motion samples in, produces rep events and biomechanical metrics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! # repsense
//!
//! Streaming repetition detection for lift tracking: feed `(velocity,
//! timestamp, position)` samples from a motion tracker into a
//! [`RepDetector`] and read back discrete repetition events, dense per-rep
//! biomechanical metrics (range of motion, velocity profile, smoothness,
//! fatigue, confidence), and set-level aggregates (consistency, trends,
//! volume).
//!
//! The engine is single-pass and low-latency: every sample is smoothed,
//! classified into a movement phase with debounced transitions, and folded
//! into the live metrics of the open repetition. Rep boundaries are guarded
//! against noise-induced false positives (sustained-movement onset guard,
//! duration and range-of-motion validation, silent discard of invalid
//! reps).
//!
//! ```
//! use repsense::RepDetector;
//!
//! let mut detector = RepDetector::new();
//! detector.set_calibration(10.0); // 10 raw units per cm
//!
//! let mut reps = 0;
//! for (i, velocity) in [-200.0_f64; 20].iter().enumerate() {
//!     if detector.process_sample(*velocity, i as f64 * 50.0, Some(0.0)) {
//!         reps += 1;
//!     }
//! }
//! // A lone concentric push never completes: no eccentric return yet
//! assert_eq!(reps, 0);
//! assert_eq!(detector.state().rep_count, 0);
//! ```
//!
//! Sign convention: concentric (force-producing) movement is the
//! negative-velocity direction — see
//! [`constants::kinematics::CONCENTRIC_VELOCITY_SIGN`]. Callers must orient
//! their velocity axis accordingly.

mod analysis;
mod calibration;
pub mod config;
pub mod constants;
mod detector;
pub mod errors;
mod history;
pub mod models;
mod signal;

pub use config::{IdealTempo, PowerThresholds, RepDetectorConfig};
pub use detector::RepDetector;
pub use errors::ConfigError;
pub use models::{
    DetectorState, FatigueMetrics, MovementPhase, PhaseDistribution, PowerRating, RepMetrics,
    RepRejection, RomMetrics, SetMetrics, SetTrends, TechnicalBreakdown, VelocityProfile,
    VolumeMetrics,
};
