// Host-side tests for the playback duration policy.

use hanabi_core::constants::*;
use hanabi_core::*;

#[test]
fn empty_playlist_takes_the_single_selection_duration() {
    let policy = DurationPolicy::default();
    assert_eq!(policy.duration_ms(0), policy.duration_ms(1));
    assert_eq!(policy.duration_ms(1), PLAYBACK_MIN_DURATION_MS);
}

#[test]
fn long_playlists_clamp_to_the_maximum() {
    let policy = DurationPolicy::default();
    assert_eq!(policy.duration_ms(MAX_TIMELINE_SELECTIONS), PLAYBACK_MAX_DURATION_MS);
    assert_eq!(policy.duration_ms(1_000), PLAYBACK_MAX_DURATION_MS);
}

#[test]
fn duration_is_monotonic_in_count() {
    let policy = DurationPolicy::default();
    let mut last = policy.duration_ms(0);
    for n in 1..=20 {
        let d = policy.duration_ms(n);
        assert!(d >= last, "duration dropped at {n}");
        assert!((PLAYBACK_MIN_DURATION_MS..=PLAYBACK_MAX_DURATION_MS).contains(&d));
        last = d;
    }
}

#[test]
fn mid_range_counts_scale_with_the_base() {
    let policy = DurationPolicy::default();
    assert_eq!(policy.duration_ms(3), 12_000.0);
    assert_eq!(policy.duration_ms(5), 20_000.0);
}
