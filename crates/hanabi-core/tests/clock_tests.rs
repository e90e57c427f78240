// Host-side tests for per-group pause accounting.

use hanabi_core::*;

#[test]
fn pausing_twice_counts_once() {
    let mut once = ClockGroupRegistry::new();
    once.pause("timeline", 100.0);
    once.resume("timeline", 400.0);

    let mut twice = ClockGroupRegistry::new();
    assert!(twice.pause("timeline", 100.0));
    assert!(!twice.pause("timeline", 250.0)); // ignored, keeps the first start
    twice.resume("timeline", 400.0);

    assert_eq!(once.paused_offset("timeline", 1_000.0), 300.0);
    assert_eq!(twice.paused_offset("timeline", 1_000.0), 300.0);
}

#[test]
fn resume_folds_the_pause_into_the_accumulator() {
    let mut clocks = ClockGroupRegistry::new();
    clocks.pause("g", 50.0);
    clocks.resume("g", 80.0);
    let t0 = 200.0;
    let t1 = 650.0;
    clocks.pause("g", t0);
    let before = clocks.paused_offset("g", t0);
    let accumulated_before = clocks.group("g").unwrap().accumulated_pause_ms();
    assert!(clocks.resume("g", t1));
    // continuous across the resume instant
    assert_eq!(clocks.paused_offset("g", t1), before + (t1 - t0));
    assert_eq!(
        clocks.group("g").unwrap().accumulated_pause_ms(),
        accumulated_before + (t1 - t0)
    );
    // and no further accrual while running
    assert_eq!(clocks.paused_offset("g", t1 + 5_000.0), clocks.paused_offset("g", t1));
}

#[test]
fn resume_without_pause_is_a_no_op() {
    let mut clocks = ClockGroupRegistry::new();
    assert!(!clocks.resume("g", 10.0));
    assert_eq!(clocks.paused_offset("g", 10.0), 0.0);
}

#[test]
fn offset_grows_during_a_pause_and_never_goes_negative() {
    let mut clocks = ClockGroupRegistry::new();
    clocks.pause("g", 1_000.0);
    assert_eq!(clocks.paused_offset("g", 1_250.0), 250.0);
    assert_eq!(clocks.paused_offset("g", 900.0), 0.0); // query from before the pause
}

#[test]
fn groups_are_independent() {
    let mut clocks = ClockGroupRegistry::with_groups(["ambient", "timeline"]);
    clocks.pause("timeline", 0.0);
    assert!(clocks.is_paused("timeline"));
    assert!(!clocks.is_paused("ambient"));
    assert_eq!(clocks.paused_offset("ambient", 500.0), 0.0);
    assert_eq!(clocks.paused_offset("timeline", 500.0), 500.0);
}

#[test]
fn reset_clears_flag_and_accumulator() {
    let mut clocks = ClockGroupRegistry::new();
    clocks.pause("g", 0.0);
    clocks.resume("g", 100.0);
    clocks.pause("g", 200.0);
    clocks.reset("g");
    assert!(!clocks.is_paused("g"));
    assert_eq!(clocks.paused_offset("g", 10_000.0), 0.0);
}

#[test]
fn pause_all_reaches_every_known_group() {
    let mut clocks = ClockGroupRegistry::with_groups(["ambient", "timeline"]);
    clocks.pause("timeline", 0.0); // already paused groups keep their start
    clocks.pause_all(100.0);
    assert!(clocks.group_names().all(|g| clocks.is_paused(g)));
    clocks.resume_all(300.0);
    assert_eq!(clocks.paused_offset("ambient", 300.0), 200.0);
    assert_eq!(clocks.paused_offset("timeline", 300.0), 300.0);
}
