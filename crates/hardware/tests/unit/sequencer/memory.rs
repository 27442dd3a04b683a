//! # SRAM Sweep Tests
//!
//! Runs the memory exerciser against healthy and defective SRAM models.

use chipex_core::common::BusValue;
use chipex_core::config::ExerciseConfig;
use chipex_core::devices::SramModel;
use chipex_core::exercise_sram;
use chipex_core::fixture::{Lamp, SimFixture};
use chipex_core::profile::{SramControl, SramSize, SramStatus};
use chipex_core::protocol::ControlSet;
use chipex_core::sequencer::Session;
use chipex_core::vector::FrameOrder;
use chipex_core::verifier::Expectation;
use rstest::rstest;

use crate::common::harness::{AccessCounter, init_tracing};

fn fixture(size: SramSize) -> SimFixture<SramModel> {
    SimFixture::new(SramModel::new(size).unwrap())
}

fn phases(sizing: bool, read_write: bool) -> ExerciseConfig {
    ExerciseConfig {
        sizing,
        read_write,
        ..ExerciseConfig::default()
    }
}

fn labels(verdict: &chipex_core::Verdict) -> Vec<&str> {
    let mut labels: Vec<_> = verdict
        .failures()
        .iter()
        .map(|failure| failure.label.as_str())
        .collect();
    labels.dedup();
    labels
}

// ─── Single Transactions ─────────────────────────────────────────────────────

#[test]
fn test_write_then_read_one_cell() {
    let mut fixture = fixture(SramSize::K8);
    let profile = SramSize::K8.profile().unwrap();
    let mut session = Session::new(&mut fixture, profile);

    let write = ControlSet::new()
        .assert(SramControl::Cs1)
        .assert(SramControl::Cs2)
        .release(SramControl::Oe)
        .assert(SramControl::We);
    let read = write
        .clone()
        .assert(SramControl::Oe)
        .release(SramControl::We);

    let _ = session.transact(&write, 0x0000, 0xFF).unwrap();
    let response = session.transact(&read, 0x0000, 0).unwrap();
    assert_eq!(
        response.field(SramStatus::Data).unwrap(),
        BusValue::driven(0xFF, 8)
    );
    assert!(session
        .check(
            &response,
            SramStatus::Data,
            Expectation::value(0xFF, 8),
            "Reading data works",
            Some(0),
        )
        .unwrap());

    let verdict = session.finish();
    assert!(verdict.passed());
    assert_eq!(verdict.checks(), 1);
}

// ─── Full Runs ───────────────────────────────────────────────────────────────

#[rstest]
#[case(SramSize::K8)]
#[case(SramSize::K32)]
fn test_every_address_sees_every_pattern(#[case] size: SramSize) {
    init_tracing();
    let mut counter = AccessCounter::new(fixture(size), size);
    let verdict = exercise_sram(&mut counter, size, &ExerciseConfig::default()).unwrap();

    assert!(verdict.passed(), "{:?}", verdict.failures().first());
    assert_eq!(counter.resets, 1);
    assert!(counter.writes.iter().all(|&n| n == 8));
    assert!(counter.reads.iter().all(|&n| n == 8));
    assert!(counter.disables.iter().all(|&n| n == 8));
    assert_eq!(counter.inner.reports(), &[Lamp::Pass]);
}

#[test]
#[ignore = "sweeps up to 512k addresses"]
fn test_large_variants_see_every_pattern() {
    for size in [SramSize::K128, SramSize::K256, SramSize::K512] {
        let mut counter = AccessCounter::new(fixture(size), size);
        let verdict = exercise_sram(&mut counter, size, &ExerciseConfig::default()).unwrap();
        assert!(verdict.passed(), "{size}");
        assert!(counter.writes.iter().all(|&n| n == 8), "{size}");
        assert!(counter.reads.iter().all(|&n| n == 8), "{size}");
        assert!(counter.disables.iter().all(|&n| n == 8), "{size}");
    }
}

#[rstest]
#[case(SramSize::K128, 17)]
#[case(SramSize::K256, 18)]
#[case(SramSize::K512, 19)]
fn test_sizing_reaches_every_address_of_wide_variants(
    #[case] size: SramSize,
    #[case] lines: u32,
) {
    let mut counter = AccessCounter::new(fixture(size), size);
    let verdict = exercise_sram(&mut counter, size, &phases(true, false)).unwrap();

    assert!(verdict.passed(), "{:?}", verdict.failures().first());
    assert_eq!(counter.writes.len(), 1 << lines);
    // Address 0 also receives the needle and is never read back.
    assert_eq!(counter.writes[0], 2);
    assert_eq!(counter.reads[0], 0);
    assert!(counter.writes[1..].iter().all(|&n| n == 1));
    assert!(counter.reads[1..].iter().all(|&n| n == 1));
}

#[test]
fn test_lsb_first_firmware_passes() {
    let mut fixture = fixture(SramSize::K8).with_frame_order(FrameOrder::LsbFirst);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &ExerciseConfig::default()).unwrap();
    assert!(verdict.passed(), "{:?}", verdict.failures().first());
    assert_eq!(fixture.reports(), &[Lamp::Pass]);
}

#[test]
fn test_retention_rereads_every_address() {
    let config = ExerciseConfig {
        retention: true,
        ..ExerciseConfig::default()
    };
    let mut counter = AccessCounter::new(fixture(SramSize::K8), SramSize::K8);
    let verdict = exercise_sram(&mut counter, SramSize::K8, &config).unwrap();
    assert!(verdict.passed());
    assert!(counter.reads.iter().all(|&n| n == 16));
    assert!(counter.disables.iter().all(|&n| n == 16));
}

#[test]
fn test_phases_can_be_skipped() {
    let mut fixture8 = fixture(SramSize::K8);
    let verdict = exercise_sram(&mut fixture8, SramSize::K8, &phases(false, false)).unwrap();
    assert!(verdict.passed());
    assert_eq!(verdict.checks(), 3);
    assert_eq!(fixture8.vectors_applied(), 3);

    let mut fixture32 = fixture(SramSize::K32);
    let verdict = exercise_sram(&mut fixture32, SramSize::K32, &phases(false, false)).unwrap();
    assert!(verdict.passed());
    assert_eq!(fixture32.vectors_applied(), 1);
}

#[test]
fn test_indicator_bar() {
    let mut fixture = fixture(SramSize::K8);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &ExerciseConfig::default()).unwrap();
    assert!(verdict.passed());

    let history = fixture.indicator_history();
    // Per pattern: the bar, then one toggle every 128 of 8192 addresses.
    assert_eq!(history.len(), 8 * 65);
    assert_eq!(&history[..3], &[1, 0, 1]);
    assert_eq!(history[65], 3);
    assert_eq!(history[66], 1);
    assert_eq!(history[7 * 65], 0xFF);
}

#[test]
fn test_indicator_toggles_during_sizing() {
    let mut fixture = fixture(SramSize::K8);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &phases(true, false)).unwrap();
    assert!(verdict.passed());

    // 64 toggles while zeroing, 63 while searching from address 1.
    let history = fixture.indicator_history();
    assert_eq!(history.len(), 127);
    assert!(history.iter().step_by(2).all(|&bar| bar == 0));
    assert!(history.iter().skip(1).step_by(2).all(|&bar| bar == 1));
}

#[test]
fn test_indicator_toggles_during_retention() {
    let config = ExerciseConfig {
        retention: true,
        ..ExerciseConfig::default()
    };
    let mut fixture = fixture(SramSize::K8);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &config).unwrap();
    assert!(verdict.passed());

    // Per pattern: the bar, 64 toggles while sweeping and 64 while re-reading.
    let history = fixture.indicator_history();
    assert_eq!(history.len(), 8 * 129);
    assert_eq!(&history[64..67], &[1, 0, 1]);
    assert_eq!(history[129], 3);
    assert_eq!(history[7 * 129 + 65], 0x7F);
}

// ─── Defective Chips ─────────────────────────────────────────────────────────

#[test]
fn test_sizing_catches_aliasing() {
    let chip = SramModel::new(SramSize::K32).unwrap().with_address_lines(13);
    let mut fixture = SimFixture::new(chip);
    let verdict = exercise_sram(&mut fixture, SramSize::K32, &phases(true, false)).unwrap();

    assert!(!verdict.passed());
    let addresses: Vec<_> = verdict.failures().iter().map(|f| f.address).collect();
    assert_eq!(addresses, vec![Some(0x2000), Some(0x4000), Some(0x6000)]);
    assert_eq!(labels(&verdict), vec!["Needle not in haystack"]);
    assert_eq!(fixture.reports(), &[Lamp::Fail]);
}

#[test]
fn test_sizing_passes_on_full_chip() {
    let mut fixture = fixture(SramSize::K8);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &phases(true, false)).unwrap();
    assert!(verdict.passed());
}

#[test]
fn test_leaky_outputs_fail_floating_checks() {
    let chip = SramModel::new(SramSize::K8).unwrap().with_leaky_outputs();
    let mut fixture = SimFixture::new(chip);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &phases(false, false)).unwrap();
    assert_eq!(
        labels(&verdict),
        vec![
            "Outputs floating when no CS1",
            "Outputs floating when no CS",
            "Outputs floating when no CS2",
        ]
    );
    assert_eq!(verdict.failures()[0].actual, BusValue::driven(0, 8));
}

#[test]
fn test_stuck_bit_reported_per_address() {
    init_tracing();
    let chip = SramModel::new(SramSize::K8).unwrap().with_stuck_bit(7, true).unwrap();
    let mut fixture = SimFixture::new(chip);
    let verdict = exercise_sram(&mut fixture, SramSize::K8, &ExerciseConfig::default()).unwrap();

    // Half of the patterns have bit 7 clear.
    assert_eq!(verdict.failure_count(), 4 * 8192);
    assert_eq!(labels(&verdict), vec!["Reading data works"]);
    let first = &verdict.failures()[0];
    assert_eq!(first.address, Some(0));
    assert_eq!(first.expected, Expectation::value(0x55, 8));
    assert_eq!(first.actual, BusValue::driven(0xD5, 8));
    assert_eq!(fixture.reports(), &[Lamp::Fail]);
}
