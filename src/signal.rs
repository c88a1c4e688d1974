// ABOUTME: EMA smoothing of velocity and acceleration plus rep-scoped history ownership
// ABOUTME: Buffers trim to an idle window between reps and grow (hard-capped) within one
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Signal conditioning.
//!
//! Every calibrated sample passes through here before phase
//! classification: velocity is EMA-smoothed, acceleration is derived as a
//! finite difference against the previous sample and EMA-smoothed with its
//! own factor. The conditioner also owns the five history buffers the
//! metric calculators read.

use crate::config::RepDetectorConfig;
use crate::constants::time::MS_PER_SECOND;
use crate::history::SampleHistory;

/// Smoothing state and rep-scoped histories
#[derive(Debug, Clone)]
pub(crate) struct SignalConditioner {
    velocity_ema: f64,
    accel_ema: f64,
    idle_window: usize,
    smoothed_velocity: f64,
    smoothed_acceleration: f64,
    last_velocity: f64,
    last_acceleration: f64,
    last_position: f64,
    last_timestamp_ms: Option<f64>,
    velocities: SampleHistory,
    smoothed_velocities: SampleHistory,
    positions: SampleHistory,
    accelerations: SampleHistory,
    timestamps: SampleHistory,
}

impl SignalConditioner {
    pub fn new(config: &RepDetectorConfig) -> Self {
        let capacity = config.rep_history_capacity();
        Self {
            velocity_ema: config.velocity_ema,
            accel_ema: config.accel_ema,
            idle_window: config.history_window,
            smoothed_velocity: 0.0,
            smoothed_acceleration: 0.0,
            last_velocity: 0.0,
            last_acceleration: 0.0,
            last_position: 0.0,
            last_timestamp_ms: None,
            velocities: SampleHistory::with_capacity(capacity),
            smoothed_velocities: SampleHistory::with_capacity(capacity),
            positions: SampleHistory::with_capacity(capacity),
            accelerations: SampleHistory::with_capacity(capacity),
            timestamps: SampleHistory::with_capacity(capacity),
        }
    }

    /// Record one calibrated sample. `rep_open` decides whether histories
    /// trim to the idle window or keep growing rep-scoped.
    pub fn record(&mut self, velocity: f64, timestamp_ms: f64, position: Option<f64>, rep_open: bool) {
        let dt_ms = self
            .last_timestamp_ms
            .map_or(0.0, |prev| timestamp_ms - prev);

        self.velocities.push(velocity);
        self.timestamps.push(timestamp_ms);
        if !rep_open {
            self.velocities.trim_to(self.idle_window);
            self.timestamps.trim_to(self.idle_window);
        }

        if let Some(position) = position {
            self.positions.push(position);
            if !rep_open {
                // Positions keep a wider idle window than the velocity
                // buffers so a rep opening mid-descent still sees its start.
                self.positions.trim_to(self.idle_window * 2);
            }
            self.last_position = position;
        }

        self.smoothed_velocity =
            self.velocity_ema * velocity + (1.0 - self.velocity_ema) * self.smoothed_velocity;
        self.smoothed_velocities.push(self.smoothed_velocity);
        if !rep_open {
            self.smoothed_velocities.trim_to(self.idle_window);
        }

        if dt_ms > 0.0 {
            let acceleration = (velocity - self.last_velocity) / (dt_ms / MS_PER_SECOND);
            self.smoothed_acceleration = self.accel_ema * acceleration
                + (1.0 - self.accel_ema) * self.smoothed_acceleration;
            self.accelerations.push(self.smoothed_acceleration);
            if !rep_open {
                self.accelerations.trim_to(self.idle_window);
            }
            self.last_acceleration = acceleration;
        }

        self.last_velocity = velocity;
        self.last_timestamp_ms = Some(timestamp_ms);
    }

    /// Restart the histories at the sample that opened a repetition, so the
    /// rep's metrics are scoped to samples from this instant on.
    pub fn begin_rep(&mut self, velocity: f64, timestamp_ms: f64, position: Option<f64>) {
        self.velocities.restart_with(velocity);
        self.timestamps.restart_with(timestamp_ms);
        self.smoothed_velocities.restart_with(self.smoothed_velocity);
        self.positions
            .restart_with(position.unwrap_or(self.last_position));
        self.accelerations.clear();
    }

    /// Drop rep-scoped histories after a close or a discard
    pub fn end_rep(&mut self) {
        self.velocities.clear();
        self.smoothed_velocities.clear();
        self.positions.clear();
        self.accelerations.clear();
        self.timestamps.clear();
    }

    /// Clear all smoothing state and histories
    pub fn reset(&mut self) {
        self.smoothed_velocity = 0.0;
        self.smoothed_acceleration = 0.0;
        self.last_velocity = 0.0;
        self.last_acceleration = 0.0;
        self.last_position = 0.0;
        self.last_timestamp_ms = None;
        self.end_rep();
    }

    pub fn smoothed_velocity(&self) -> f64 {
        self.smoothed_velocity
    }

    pub fn last_acceleration(&self) -> f64 {
        self.last_acceleration
    }

    pub fn velocities(&self) -> &SampleHistory {
        &self.velocities
    }

    pub fn smoothed_velocities(&self) -> &SampleHistory {
        &self.smoothed_velocities
    }

    pub fn positions(&self) -> &SampleHistory {
        &self.positions
    }

    pub fn accelerations(&self) -> &SampleHistory {
        &self.accelerations
    }

    pub fn timestamps(&self) -> &SampleHistory {
        &self.timestamps
    }
}
