// ABOUTME: Lifecycle tests for the streaming rep detector
// ABOUTME: Covers clean/noisy detection, false-positive rejection, calibration, reset
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repsense Contributors

use std::f64::consts::PI;

use repsense::{MovementPhase, RepDetector, RepRejection};

/// Velocity trace of one clean repetition: concentric push, bottom pause,
/// eccentric return, top pause.
fn clean_rep_velocities() -> Vec<f64> {
    let mut velocities = Vec::new();
    velocities.extend(std::iter::repeat(-20.0).take(15));
    velocities.extend(std::iter::repeat(-2.0).take(5));
    velocities.extend(std::iter::repeat(20.0).take(15));
    velocities.extend(std::iter::repeat(2.0).take(5));
    velocities
}

fn sine_positions(count: usize, period_samples: f64, amplitude: f64) -> Vec<f64> {
    (0..count)
        .map(|i| (i as f64 * PI / period_samples).sin() * amplitude)
        .collect()
}

/// Feed a full stream and collect the indices of completing samples
fn drive(
    detector: &mut RepDetector,
    velocities: &[f64],
    interval_ms: f64,
    positions: Option<&[f64]>,
) -> Vec<usize> {
    let mut completions = Vec::new();
    for (i, velocity) in velocities.iter().enumerate() {
        let position = positions.map(|p| p[i]);
        if detector.process_sample(*velocity, i as f64 * interval_ms, position) {
            completions.push(i);
        }
    }
    completions
}

#[test]
fn single_clean_rep_completes_exactly_once() {
    let mut detector = RepDetector::new();
    let velocities = clean_rep_velocities();
    let positions = sine_positions(velocities.len(), 20.0, 50.0);

    let completions = drive(&mut detector, &velocities, 50.0, Some(&positions));

    assert_eq!(completions.len(), 1);
    let state = detector.state();
    assert_eq!(state.rep_count, 1);
    assert!(!state.rep_in_progress);

    let metrics = detector.set_metrics();
    assert_eq!(metrics.reps.len(), 1);
    let rep = &metrics.reps[0];
    assert!(rep.rom.total > 35.0);
    assert!(rep.confidence > 0.7);
    assert!((300.0..=5000.0).contains(&rep.duration_ms));
}

#[test]
fn clean_cycles_count_once_per_rep() {
    let mut detector = RepDetector::new();
    let mut velocities = clean_rep_velocities();
    velocities.extend(clean_rep_velocities());
    let positions = sine_positions(velocities.len(), 20.0, 50.0);

    let completions = drive(&mut detector, &velocities, 50.0, Some(&positions));

    assert_eq!(completions.len(), 2);
    assert_eq!(detector.state().rep_count, 2);
    assert_eq!(detector.state().phase, MovementPhase::Eccentric);

    let metrics = detector.set_metrics();
    assert_eq!(metrics.rep_count, 2);
    assert!(metrics.avg_confidence > 0.75);
    assert!(metrics.consistency > 0.9);
    assert!(metrics.avg_smoothness > 0.6);
    assert!(metrics.rom_consistency > 0.95);

    for rep in &metrics.reps {
        assert!(rep.smoothness > 0.6);
        assert!(rep.rom.total > 60.0);
        assert!(rep.peak_velocity > 15.0);
        assert!(rep.velocity_profile.acceleration > 0.0);
        assert!((900.0..=1100.0).contains(&rep.duration_ms));
    }

    // Steady reps: flat ROM trend, negligible fatigue
    assert!(metrics.trends.rom_progression.abs() < 0.1);
    assert!(metrics.trends.fatigue_index < 0.1);
}

#[test]
fn sub_threshold_jitter_never_opens_a_rep() {
    let mut detector = RepDetector::new();
    let mut lcg = Lcg(42);
    for i in 0..200 {
        // Jitter strictly inside the +/-3 cm/s threshold
        let velocity = (lcg.next() >> 33) as f64 % 500.0 / 100.0 - 2.5;
        let position = (lcg.next() >> 33) as f64 % 100.0 / 10.0;
        let completed = detector.process_sample(velocity, f64::from(i) * 30.0, Some(position));
        assert!(!completed);
        assert_eq!(detector.state().rep_count, 0);
    }
    assert!(!detector.state().rep_in_progress);
}

#[test]
fn spikes_and_short_movements_are_rejected() {
    let mut detector = RepDetector::new();
    let mut velocities = Vec::new();
    velocities.extend(std::iter::repeat(3.0).take(20)); // tiny up
    velocities.extend(std::iter::repeat(-3.0).take(20)); // tiny down
    velocities.extend(std::iter::repeat(10.0).take(3)); // brief spike up
    velocities.extend(std::iter::repeat(-10.0).take(3)); // brief spike down
    velocities.extend(std::iter::repeat(-15.0).take(4)); // fast, too-short descent
    velocities.extend(std::iter::repeat(0.0).take(2));
    velocities.extend(std::iter::repeat(15.0).take(4)); // fast return
    velocities.extend(std::iter::repeat(2.0).take(44)); // slow drift
    let positions = sine_positions(velocities.len(), 10.0, 10.0);

    let completions = drive(&mut detector, &velocities, 30.0, Some(&positions));

    assert!(completions.is_empty());
    let state = detector.state();
    assert_eq!(state.rep_count, 0);
    // The too-short descent reached a close attempt and was discarded
    assert!(matches!(
        state.last_rejection,
        Some(RepRejection::TooShort { .. })
    ));

    let metrics = detector.set_metrics();
    assert_eq!(metrics.rep_count, 0);
    assert!(metrics.avg_confidence.abs() < f64::EPSILON);
}

#[test]
fn overlong_rep_is_rejected_as_too_long() {
    let mut detector = RepDetector::new();
    let mut velocities = Vec::new();
    velocities.extend(std::iter::repeat(-20.0).take(15));
    velocities.extend(std::iter::repeat(20.0).take(10));
    let positions = sine_positions(velocities.len(), 12.0, 60.0);

    // 400 ms between samples: the rep stays open past max_rep_duration_ms
    let completions = drive(&mut detector, &velocities, 400.0, Some(&positions));

    assert!(completions.is_empty());
    assert_eq!(detector.state().rep_count, 0);
    assert!(matches!(
        detector.state().last_rejection,
        Some(RepRejection::TooLong { .. })
    ));
}

#[test]
fn flat_position_trace_is_rejected_for_rom() {
    let mut detector = RepDetector::new();
    let velocities = clean_rep_velocities();
    let positions = vec![1.0; velocities.len()];

    let completions = drive(&mut detector, &velocities, 50.0, Some(&positions));

    assert!(completions.is_empty());
    assert_eq!(detector.state().rep_count, 0);
    assert!(matches!(
        detector.state().last_rejection,
        Some(RepRejection::InsufficientRom { .. })
    ));
}

#[test]
fn calibration_divides_raw_velocity_exactly() {
    let mut detector = RepDetector::new();
    detector.set_calibration(10.0);
    detector.process_sample(50.0, 0.0, Some(0.0));
    assert!((detector.state().last_velocity - 5.0).abs() < f64::EPSILON);

    detector.process_sample(-50.0, 100.0, Some(50.0));
    assert!((detector.state().last_velocity + 5.0).abs() < f64::EPSILON);
}

#[test]
fn noisy_reps_are_still_detected() {
    // Deterministic pseudo-noise from index math keeps the fixture stable
    let noise = |i: usize, scale: f64| (i as f64 * 12.989_8).sin() * scale;

    let mut base: Vec<f64> = Vec::new();
    base.extend(std::iter::repeat(-15.0).take(20));
    base.extend(std::iter::repeat(-2.0).take(10));
    base.extend(std::iter::repeat(15.0).take(20));
    base.extend(std::iter::repeat(2.0).take(10));

    let mut velocities = Vec::new();
    for rep in 0..2 {
        for (j, b) in base.iter().enumerate() {
            let i = rep * base.len() + j;
            let scale = if b.abs() > 10.0 { 2.0 } else { 1.0 };
            velocities.push(b + noise(i, scale));
        }
    }
    let positions: Vec<f64> = (0..velocities.len())
        .map(|i| (i as f64 * PI / 20.0).sin() * 50.0 + noise(i, 2.5))
        .collect();

    let mut detector = RepDetector::new();
    let completions = drive(&mut detector, &velocities, 25.0, Some(&positions));

    assert_eq!(completions.len(), 2);
    let metrics = detector.set_metrics();
    assert_eq!(metrics.rep_count, 2);
    assert!(metrics.avg_confidence > 0.7);
    assert!(metrics.avg_smoothness > 0.5);
    assert!(metrics.rom_consistency > 0.9);
    for rep in &metrics.reps {
        assert!(rep.smoothness > 0.5);
        assert!(rep.rom.total > 70.0);
    }
}

#[test]
fn shrinking_reps_register_fatigue() {
    let mut detector = RepDetector::new();
    let velocity_amplitudes = [-20.0, -15.0, -10.0];
    let position_amplitudes = [50.0, 40.0, 30.0];

    let mut velocities = Vec::new();
    let mut positions = Vec::new();
    for rep in 0..3 {
        let a = velocity_amplitudes[rep];
        velocities.extend(std::iter::repeat(a).take(15));
        velocities.extend(std::iter::repeat(-2.0).take(5));
        velocities.extend(std::iter::repeat(-a).take(15));
        velocities.extend(std::iter::repeat(2.0).take(5));
        for j in 0..40 {
            positions.push((f64::from(j) * PI / 20.0).sin() * position_amplitudes[rep]);
        }
    }

    let completions = drive(&mut detector, &velocities, 40.0, Some(&positions));

    assert_eq!(completions.len(), 3);
    let metrics = detector.set_metrics();

    // ROM shrinks across the set: the weakest rep is the last, not the first
    let roms: Vec<f64> = metrics.reps.iter().map(|r| r.rom.total).collect();
    let min_rom = roms.iter().copied().fold(f64::INFINITY, f64::min);
    assert!((roms[2] - min_rom).abs() < f64::EPSILON);
    assert!(roms[0] > roms[2]);

    assert!(metrics.trends.fatigue_index > 0.1);
    assert!(metrics.trends.rom_progression < -0.3);
    assert!(metrics.trends.speed_progression < -0.4);

    let last = &metrics.reps[2];
    assert!(last.fatigue.velocity_decay > 0.4);
    assert!(last.fatigue.rom_decay > 0.3);
    assert!(last.fatigue.power_endurance < 0.7);
}

#[test]
fn live_snapshot_updates_while_rep_is_open() {
    let mut detector = RepDetector::new();
    let velocities = clean_rep_velocities();
    let positions = sine_positions(velocities.len(), 20.0, 50.0);

    for i in 0..11 {
        detector.process_sample(velocities[i], i as f64 * 50.0, Some(positions[i]));
    }

    let state = detector.state();
    assert!(state.rep_in_progress);
    let snapshot = state.current_rep.as_ref().unwrap();
    assert!(snapshot.duration_ms > 0.0);
    assert!(snapshot.peak_velocity >= 20.0);
    assert!(snapshot.rom.total > 0.0);
    assert!((0.0..=1.0).contains(&snapshot.confidence));
    // No rep has completed yet
    assert_eq!(detector.set_metrics().rep_count, 0);

    for i in 11..velocities.len() {
        detector.process_sample(velocities[i], i as f64 * 50.0, Some(positions[i]));
    }
    assert_eq!(detector.state().rep_count, 1);
    assert!(detector.state().current_rep.is_none());
}

#[test]
fn reset_clears_state_but_keeps_calibration() {
    let mut detector = RepDetector::new();
    detector.set_calibration(2.0);
    let velocities = clean_rep_velocities();
    let positions = sine_positions(velocities.len(), 20.0, 50.0);
    // Raw velocities doubled so the calibrated stream matches the fixture
    let raw: Vec<f64> = velocities.iter().map(|v| v * 2.0).collect();
    drive(&mut detector, &raw, 50.0, Some(&positions));
    assert_eq!(detector.state().rep_count, 1);

    detector.reset();

    let state = detector.state();
    assert_eq!(state.rep_count, 0);
    assert_eq!(state.phase, MovementPhase::Rest);
    assert!(state.current_rep.is_none());
    assert!(state.last_rejection.is_none());
    assert!(state.last_velocity.abs() < f64::EPSILON);
    assert_eq!(detector.set_metrics(), repsense::SetMetrics::default());

    // Calibration survives the reset
    detector.process_sample(50.0, 0.0, None);
    assert!((detector.state().last_velocity - 25.0).abs() < f64::EPSILON);
}

#[test]
fn scores_stay_bounded_for_arbitrary_finite_input() {
    let mut detector = RepDetector::new();
    let mut lcg = Lcg(0x243F_6A88_85A3_08D3);
    for i in 0..2000 {
        let velocity = (lcg.next() >> 33) as f64 % 8001.0 / 100.0 - 40.0;
        let position = (lcg.next() >> 33) as f64 % 12001.0 / 100.0 - 60.0;
        detector.process_sample(velocity, f64::from(i) * 25.0, Some(position));

        let state = detector.state();
        if let Some(snapshot) = &state.current_rep {
            assert!((0.0..=1.0).contains(&snapshot.confidence));
            assert!((0.0..=1.0).contains(&snapshot.smoothness));
        }
        // Counter invariant holds on every sample
        assert_eq!(state.rep_count, detector.set_metrics().reps.len());
    }

    let metrics = detector.set_metrics();
    for rep in &metrics.reps {
        assert!((0.0..=1.0).contains(&rep.confidence));
        assert!((0.0..=1.0).contains(&rep.smoothness));
    }
}

/// Deterministic 64-bit LCG (same constants as `rand`'s `Lcg64`)
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0
    }
}
