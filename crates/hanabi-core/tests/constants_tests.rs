// Host-side tests for tuning constants and their relationships.

use hanabi_core::constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn playback_duration_bounds_are_ordered() {
    assert!(PLAYBACK_BASE_DURATION_MS > 0.0);
    assert!(PLAYBACK_MIN_DURATION_MS <= PLAYBACK_MAX_DURATION_MS);
    // a full playlist should reach the cap
    assert!(PLAYBACK_BASE_DURATION_MS * MAX_TIMELINE_SELECTIONS as f64 >= PLAYBACK_MAX_DURATION_MS);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn staggered_burst_fits_inside_one_selection_slot() {
    // slot 4 of a staggered burst must not spill into the next selection
    let slot_ms = PLAYBACK_MAX_DURATION_MS / MAX_TIMELINE_SELECTIONS as f64;
    assert!(STAGGER_SUB_DELAY_MS * (BURST_COUNT as f64 - 1.0) < slot_ms);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn motion_defaults_are_positive() {
    assert!(DEFAULT_LAUNCH_DURATION_S > DURATION_EPSILON_S);
    assert!(DEFAULT_BLOOM_DURATION_S > DURATION_EPSILON_S);
    assert!(DEFAULT_COOLDOWN_DURATION_S >= 0.0);
    assert!(LAUNCH_SPREAD_METERS > 0.0);
    assert!(DEFAULT_LAUNCH_HEIGHT_METERS > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn paired_layers_nest() {
    assert!(PAIRED_INNER_RADIUS_SCALE < PAIRED_OUTER_RADIUS_SCALE);
    assert!(PAIRED_INNER_RADIUS_SCALE > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn ambient_tuning_is_sane() {
    assert!(AMBIENT_INITIAL_COUNT > 0);
    assert!(AMBIENT_INTERVAL_S > 0.0);
    assert!(AMBIENT_SPACING_FACTOR >= 1.0);
    assert!(AMBIENT_MIN_LOOP_MS > 0.0);
    assert!(RANDOM_PALETTE_SIZE <= BURST_COUNT);
    assert_ne!(AMBIENT_GROUP, TIMELINE_GROUP);
}
