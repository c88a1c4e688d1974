// ABOUTME: Streaming rep detector: phase state machine, rep lifecycle, public API
// ABOUTME: One sample in, one boolean out; all metrics snapshots are owned copies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! The streaming repetition detector.
//!
//! Feed calibrated or raw velocity samples through
//! [`RepDetector::process_sample`] at whatever cadence the upstream motion
//! tracker produces; the detector classifies each sample into a movement
//! phase, opens a repetition on a validated concentric onset, keeps a live
//! metrics snapshot current, and closes the repetition on the matching
//! eccentric transition. The return value is `true` exactly on the sample
//! that completes a valid repetition.
//!
//! The detector is single-threaded and synchronous: `&mut self` enforces
//! single-consumer access, and it performs no I/O, pacing, or locking of
//! its own.

use tracing::debug;

use crate::analysis::confidence::{self, smoothness};
use crate::analysis::fatigue::{self, CurrentRep};
use crate::analysis::{rom, set_analysis, velocity_profile};
use crate::calibration::Calibration;
use crate::config::RepDetectorConfig;
use crate::constants::kinematics::CONCENTRIC_VELOCITY_SIGN;
use crate::errors::ConfigError;
use crate::models::{
    DetectorState, FatigueMetrics, MovementPhase, RepMetrics, RepRejection, SetMetrics,
};
use crate::signal::SignalConditioner;

/// Streaming repetition detector and set analyzer
#[derive(Debug)]
pub struct RepDetector {
    config: RepDetectorConfig,
    calibration: Calibration,
    signal: SignalConditioner,
    phase: MovementPhase,
    last_stable_phase: MovementPhase,
    last_phase_change_ms: f64,
    rep_open: bool,
    rep_opened_at_ms: f64,
    current_rep: Option<RepMetrics>,
    completed: Vec<RepMetrics>,
    previous_rep_duration_ms: f64,
    last_rejection: Option<RepRejection>,
    last_velocity: f64,
    last_timestamp_ms: Option<f64>,
    idle_ms: f64,
    active_ms: f64,
}

impl Default for RepDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl RepDetector {
    /// Create a detector with the documented default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(RepDetectorConfig::default())
    }

    /// Create a detector from caller-supplied tunables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a configuration bound is violated,
    /// e.g. `min_rep_duration_ms > max_rep_duration_ms`.
    pub fn with_config(config: RepDetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RepDetectorConfig) -> Self {
        let signal = SignalConditioner::new(&config);
        Self {
            config,
            calibration: Calibration::default(),
            signal,
            phase: MovementPhase::Rest,
            last_stable_phase: MovementPhase::Rest,
            last_phase_change_ms: 0.0,
            rep_open: false,
            rep_opened_at_ms: 0.0,
            current_rep: None,
            completed: Vec::new(),
            previous_rep_duration_ms: 0.0,
            last_rejection: None,
            last_velocity: 0.0,
            last_timestamp_ms: None,
            idle_ms: 0.0,
            active_ms: 0.0,
        }
    }

    /// The configuration this detector was built with
    #[must_use]
    pub fn config(&self) -> &RepDetectorConfig {
        &self.config
    }

    /// Store a raw-units-per-physical-unit calibration ratio.
    ///
    /// Subsequent samples are converted before smoothing; history already
    /// recorded is not rescaled. A ratio of zero reverts to identity
    /// conversion. Calibration survives [`Self::reset`].
    pub fn set_calibration(&mut self, units_per_raw_unit: f64) {
        self.calibration.set(units_per_raw_unit);
    }

    /// Consume one motion sample.
    ///
    /// `timestamp_ms` must be non-decreasing across calls; the detector
    /// does not reorder, deduplicate, or validate input (NaN/∞ guarding is
    /// the caller's responsibility). Returns `true` exactly on the sample
    /// that completes a valid repetition; an invalid repetition is
    /// discarded silently and also returns `false`.
    pub fn process_sample(
        &mut self,
        velocity: f64,
        timestamp_ms: f64,
        position: Option<f64>,
    ) -> bool {
        let velocity = self.calibration.convert(velocity);

        // Idle/active accounting feeds the rest ratio
        if let Some(prev) = self.last_timestamp_ms {
            let dt = timestamp_ms - prev;
            if dt > 0.0 {
                if self.rep_open {
                    self.active_ms += dt;
                } else {
                    self.idle_ms += dt;
                }
            }
        }
        self.last_timestamp_ms = Some(timestamp_ms);

        self.signal
            .record(velocity, timestamp_ms, position, self.rep_open);

        let new_phase = self.classify(self.signal.smoothed_velocity());

        if self.rep_open {
            self.refresh_live_snapshot(velocity, timestamp_ms, new_phase);
        }

        let mut completed = false;
        if new_phase != self.phase
            && timestamp_ms - self.last_phase_change_ms > self.config.debounce_window_ms
        {
            match new_phase {
                MovementPhase::Concentric if !self.rep_open => {
                    if self.sustained_concentric() {
                        self.open_rep(velocity, timestamp_ms, position, new_phase);
                    }
                }
                MovementPhase::Eccentric
                    if self.rep_open && self.last_stable_phase == MovementPhase::Concentric =>
                {
                    completed = self.close_rep(timestamp_ms);
                }
                _ => {}
            }

            if new_phase != MovementPhase::Hold {
                self.last_stable_phase = new_phase;
            }
            self.phase = new_phase;
            self.last_phase_change_ms = timestamp_ms;
        }

        self.last_velocity = velocity;
        completed
    }

    /// Read-only snapshot of the engine state, including the live
    /// in-progress metrics when a repetition is open
    #[must_use]
    pub fn state(&self) -> DetectorState {
        DetectorState {
            phase: self.phase,
            last_velocity: self.last_velocity,
            smoothed_velocity: self.signal.smoothed_velocity(),
            last_acceleration: self.signal.last_acceleration(),
            rep_count: self.completed.len(),
            rep_in_progress: self.rep_open,
            current_rep: self.current_rep.clone(),
            last_rejection: self.last_rejection,
            target_depth: self.config.target_depth,
        }
    }

    /// Aggregate metrics for the set so far, recomputed from the completed
    /// repetitions on every call (mid-set safe)
    #[must_use]
    pub fn set_metrics(&self) -> SetMetrics {
        set_analysis::compute(&self.completed, &self.config)
    }

    /// Clear all histories, counters, and completed repetitions.
    /// Configuration and calibration are retained.
    pub fn reset(&mut self) {
        self.signal.reset();
        self.phase = MovementPhase::Rest;
        self.last_stable_phase = MovementPhase::Rest;
        self.last_phase_change_ms = 0.0;
        self.rep_open = false;
        self.rep_opened_at_ms = 0.0;
        self.current_rep = None;
        self.completed.clear();
        self.previous_rep_duration_ms = 0.0;
        self.last_rejection = None;
        self.last_velocity = 0.0;
        self.last_timestamp_ms = None;
        self.idle_ms = 0.0;
        self.active_ms = 0.0;
    }

    /// Classify a smoothed velocity into a movement phase
    fn classify(&self, smoothed_velocity: f64) -> MovementPhase {
        if smoothed_velocity.abs() < self.config.velocity_threshold {
            MovementPhase::Hold
        } else if smoothed_velocity * CONCENTRIC_VELOCITY_SIGN > 0.0 {
            MovementPhase::Concentric
        } else {
            MovementPhase::Eccentric
        }
    }

    /// Sustained-movement guard: the two most recent raw velocities must
    /// both exceed the threshold in the concentric direction, suppressing
    /// single-sample spikes.
    fn sustained_concentric(&self) -> bool {
        let velocities = self.signal.velocities();
        let n = velocities.len();
        if n < 2 {
            return false;
        }
        (n - 2..n).all(|i| {
            velocities
                .get(i)
                .is_some_and(|v| v * CONCENTRIC_VELOCITY_SIGN > self.config.velocity_threshold)
        })
    }

    fn open_rep(
        &mut self,
        velocity: f64,
        timestamp_ms: f64,
        position: Option<f64>,
        phase: MovementPhase,
    ) {
        self.signal.begin_rep(velocity, timestamp_ms, position);
        self.rep_open = true;
        self.rep_opened_at_ms = timestamp_ms;

        let rom = rom::compute(
            self.signal.positions(),
            self.signal.timestamps(),
            phase,
            self.previous_rep_duration_ms,
            self.config.target_depth,
        );
        let profile = velocity_profile::compute(
            self.signal.velocities(),
            self.signal.smoothed_velocities(),
            self.signal.timestamps(),
            self.signal.accelerations(),
        );
        self.current_rep = Some(RepMetrics {
            duration_ms: 0.0,
            peak_velocity: velocity.abs(),
            avg_velocity: self.signal.smoothed_velocity().abs(),
            phase,
            smoothness: 1.0,
            rom,
            velocity_profile: profile,
            fatigue: FatigueMetrics::default(),
            confidence: 0.0,
        });

        debug!(
            rep = self.completed.len() + 1,
            timestamp_ms, "repetition opened"
        );
    }

    /// Recompute the live in-progress snapshot from the rep-scoped
    /// histories. Idempotent; no side effects beyond the snapshot itself.
    fn refresh_live_snapshot(&mut self, velocity: f64, timestamp_ms: f64, phase: MovementPhase) {
        let rom = rom::compute(
            self.signal.positions(),
            self.signal.timestamps(),
            self.phase,
            self.previous_rep_duration_ms,
            self.config.target_depth,
        );
        let profile = velocity_profile::compute(
            self.signal.velocities(),
            self.signal.smoothed_velocities(),
            self.signal.timestamps(),
            self.signal.accelerations(),
        );
        let duration_ms = timestamp_ms - self.rep_opened_at_ms;
        let peak_velocity = self
            .current_rep
            .as_ref()
            .map_or(velocity.abs(), |m| m.peak_velocity.max(velocity.abs()));
        let fatigue = fatigue::compute(
            &self.completed,
            &CurrentRep {
                peak_velocity,
                rom_total: rom.total,
                power_watts: profile.power_output_watts,
                time_under_tension_ms: duration_ms,
            },
            self.idle_ms,
            self.active_ms,
        );
        let velocities: Vec<f64> = self.signal.velocities().iter().collect();
        let smoothness_score = smoothness(&velocities);
        let avg_velocity = self.signal.smoothed_velocity().abs();
        let min_rom = self.config.min_rom;

        if let Some(snapshot) = self.current_rep.as_mut() {
            snapshot.duration_ms = duration_ms;
            snapshot.peak_velocity = peak_velocity;
            snapshot.avg_velocity = avg_velocity;
            snapshot.phase = phase;
            snapshot.smoothness = smoothness_score;
            snapshot.rom = rom;
            snapshot.velocity_profile = profile;
            snapshot.fatigue = fatigue;
            let scored = confidence::compute(&*snapshot, min_rom);
            snapshot.confidence = scored;
        }
    }

    /// Validate and finalize the open repetition at an eccentric
    /// transition, or discard it. Returns `true` when the rep validated.
    fn close_rep(&mut self, timestamp_ms: f64) -> bool {
        let duration_ms = timestamp_ms - self.rep_opened_at_ms;
        let rom = rom::compute(
            self.signal.positions(),
            self.signal.timestamps(),
            self.phase,
            self.previous_rep_duration_ms,
            self.config.target_depth,
        );

        let rejection = if duration_ms < self.config.min_rep_duration_ms {
            Some(RepRejection::TooShort {
                duration_ms,
                min_ms: self.config.min_rep_duration_ms,
            })
        } else if duration_ms > self.config.max_rep_duration_ms {
            Some(RepRejection::TooLong {
                duration_ms,
                max_ms: self.config.max_rep_duration_ms,
            })
        } else if rom.total < self.config.min_rom {
            Some(RepRejection::InsufficientRom {
                rom: rom.total,
                min_rom: self.config.min_rom,
            })
        } else {
            None
        };

        if let Some(rejection) = rejection {
            debug!(
                ?rejection,
                duration_ms,
                rom_total = rom.total,
                "repetition discarded"
            );
            self.last_rejection = Some(rejection);
            self.return_to_idle();
            return false;
        }

        let profile = velocity_profile::compute(
            self.signal.velocities(),
            self.signal.smoothed_velocities(),
            self.signal.timestamps(),
            self.signal.accelerations(),
        );

        // Final velocity statistics come from the smoothed series so a
        // single raw spike cannot dominate the frozen metrics
        let smoothed: Vec<f64> = self.signal.smoothed_velocities().iter().collect();
        let (peak_velocity, avg_velocity) = if smoothed.is_empty() {
            self.current_rep
                .as_ref()
                .map_or((0.0, 0.0), |m| (m.peak_velocity, m.avg_velocity))
        } else {
            let peak = smoothed.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            let avg = smoothed.iter().map(|v| v.abs()).sum::<f64>() / smoothed.len() as f64;
            (peak, avg)
        };
        let smoothness_score = smoothness(&smoothed);

        let fatigue = fatigue::compute(
            &self.completed,
            &CurrentRep {
                peak_velocity,
                rom_total: rom.total,
                power_watts: profile.power_output_watts,
                time_under_tension_ms: duration_ms,
            },
            self.idle_ms,
            self.active_ms,
        );

        let phase_at_close = self
            .current_rep
            .as_ref()
            .map_or(MovementPhase::Rest, |m| m.phase);
        let mut rep = RepMetrics {
            duration_ms,
            peak_velocity,
            avg_velocity,
            phase: phase_at_close,
            smoothness: smoothness_score,
            rom,
            velocity_profile: profile,
            fatigue,
            confidence: 0.0,
        };
        rep.confidence = confidence::compute(&rep, self.config.min_rom);

        debug!(
            rep = self.completed.len() + 1,
            duration_ms,
            rom_total = rep.rom.total,
            confidence = rep.confidence,
            "repetition completed"
        );

        self.previous_rep_duration_ms = duration_ms;
        self.completed.push(rep);
        self.return_to_idle();
        true
    }

    /// Close out the rep-scoped histories and snapshot
    fn return_to_idle(&mut self) {
        self.rep_open = false;
        self.current_rep = None;
        self.signal.end_rep();
    }
}
