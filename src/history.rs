// ABOUTME: Ring-backed sample buffer with a hard capacity and idle-window trimming
// ABOUTME: Grows rep-scoped while a repetition is open, bounded either way
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

//! Bounded sample history.
//!
//! While no repetition is open, callers trim the buffer to a small idle
//! window after each push. While a repetition is open the buffer grows so
//! final metrics see the whole rep — but never past the hard capacity,
//! which bounds memory on streams that never close a repetition.

use std::collections::VecDeque;

/// Bounded FIFO of `f64` samples
#[derive(Debug, Clone)]
pub(crate) struct SampleHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl SampleHistory {
    /// Create an empty history with the given hard capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append a sample, evicting the oldest if at capacity
    pub fn push(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Drop oldest samples until at most `window` remain
    pub fn trim_to(&mut self, window: usize) {
        while self.samples.len() > window {
            self.samples.pop_front();
        }
    }

    /// Clear and seed with a single sample
    pub fn restart_with(&mut self, value: f64) {
        self.samples.clear();
        self.samples.push_back(value);
    }

    /// Drop all samples
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<f64> {
        self.samples.front().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.samples.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}
