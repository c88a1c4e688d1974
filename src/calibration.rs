// ABOUTME: Raw-to-physical velocity conversion via a caller-supplied ratio
// ABOUTME: Unset or zero ratio leaves samples in raw units (identity conversion)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Device calibration.
//!
//! The upstream tracker reports velocity in raw units (typically pixels per
//! second); callers supply a raw-units-per-physical-unit ratio once they
//! know it. Changing the ratio mid-stream does not rescale history already
//! recorded — a documented limitation, not an error.

/// Optional raw-to-physical conversion ratio
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Calibration {
    units_per_raw_unit: Option<f64>,
}

impl Calibration {
    /// Store a new ratio. A ratio of exactly zero clears calibration back
    /// to identity, which also keeps the conversion division-safe.
    pub fn set(&mut self, units_per_raw_unit: f64) {
        self.units_per_raw_unit = if units_per_raw_unit == 0.0 {
            None
        } else {
            Some(units_per_raw_unit)
        };
    }

    /// Convert a raw velocity sample to physical units
    #[inline]
    pub fn convert(&self, raw: f64) -> f64 {
        self.units_per_raw_unit.map_or(raw, |ratio| raw / ratio)
    }
}
