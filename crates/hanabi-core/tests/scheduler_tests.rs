// Host-side tests for the polling launch scheduler.

use glam::{Mat4, Vec3};
use hanabi_core::constants::*;
use hanabi_core::*;

/// Hands out a different translation on every call and counts the calls.
#[derive(Default)]
struct CountingPlacement {
    calls: usize,
}

impl PlacementProvider for CountingPlacement {
    fn place(&mut self, base: &Mat4, _spread_m: f32) -> Mat4 {
        self.calls += 1;
        *base * Mat4::from_translation(Vec3::new(self.calls as f32, 0.0, 0.0))
    }
}

fn solo() -> Selection {
    Selection::new(FireworkCategory::Kiku)
}

fn scheduler_with(selections: impl IntoIterator<Item = Selection>) -> LaunchScheduler {
    let mut s = LaunchScheduler::new(&ShowConfig::default());
    for sel in selections {
        s.push_selection(sel).unwrap();
    }
    s
}

#[test]
fn empty_playlist_polls_as_a_no_op() {
    let mut s = scheduler_with(Vec::new());
    let mut placement = CountingPlacement::default();
    assert_eq!(s.poll_and_launch(1e9, &mut placement), 0);
    assert_eq!(placement.calls, 0);
}

#[test]
fn three_solos_launch_on_thirds_of_the_duration() {
    let mut s = scheduler_with([solo(), solo(), solo()]);
    let d = s.total_duration_ms();
    assert_eq!(d, DurationPolicy::default().duration_ms(3));
    let mut placement = CountingPlacement::default();

    assert_eq!(s.poll_and_launch(d * 2.0 / 3.0 - 1.0, &mut placement), 2);
    assert!(s.is_launched(0, 0));
    assert!(s.is_launched(1, 0));
    assert!(!s.is_launched(2, 0));

    // a unit is due once offset <= elapsed, so C launches at exactly 2d/3
    assert_eq!(s.poll_and_launch(d * 2.0 / 3.0, &mut placement), 1);
    assert!(s.is_launched(2, 0));
    assert_eq!(s.launched_count(), 3);
}

#[test]
fn launched_units_are_not_launched_again() {
    let mut s = scheduler_with([solo(), solo()]);
    let mut placement = CountingPlacement::default();
    assert_eq!(s.poll_and_launch(0.0, &mut placement), 1);
    assert_eq!(s.poll_and_launch(0.0, &mut placement), 0);
    assert_eq!(s.poll_and_launch(100.0, &mut placement), 0);
    assert_eq!(placement.calls, 1);
}

#[test]
fn staggered_burst_launches_one_slot_per_sub_delay() {
    let sel = solo().with_mode(LaunchMode::Burst(BurstType::Staggered));
    let mut s = scheduler_with([sel]);
    let mut placement = CountingPlacement::default();

    assert_eq!(s.poll_and_launch(399.0, &mut placement), 2);
    let launched: Vec<bool> = (0..BURST_COUNT).map(|k| s.is_launched(0, k)).collect();
    assert_eq!(launched, vec![true, true, false, false, false]);

    // slots are due at 0, 200, 400.. and offset <= elapsed is inclusive,
    // so 450ms has fired slot 2 as well
    assert_eq!(s.poll_and_launch(450.0, &mut placement), 1);
    let launched: Vec<bool> = (0..BURST_COUNT).map(|k| s.is_launched(0, k)).collect();
    assert_eq!(launched, vec![true, true, true, false, false]);

    assert_eq!(s.poll_and_launch(10_000.0, &mut placement), 2);
    assert_eq!(s.launched_count(), BURST_COUNT);
}

#[test]
fn late_poll_still_uses_the_exact_offset() {
    let mut s = scheduler_with([solo(), solo(), solo()]);
    s.set_playback_origin(1_000.0, 0.0);
    let mut placement = CountingPlacement::default();
    s.poll_and_launch(5_500.0, &mut placement);

    let second = s.units(1).unwrap()[0];
    let LaunchUnit::Single(id) = second else {
        panic!("solo selection should be a single unit");
    };
    let e = s.entity(id).unwrap();
    assert_eq!(e.start_time_ms, Some(1_000.0 + s.delay_ms()));
    assert!(e.visible);
    assert!(e.has_launched);
}

#[test]
fn pairs_share_placement_and_start_time() {
    let sel = Selection::new(FireworkCategory::Botan)
        .with_mode(LaunchMode::Burst(BurstType::Staggered));
    let mut s = scheduler_with([solo(), sel]);
    assert_eq!(s.arena().len(), 1 + 2 * BURST_COUNT);
    s.set_playback_origin(250.0, 0.0);
    let mut placement = CountingPlacement::default();
    let launched = s.poll_and_launch(1e9, &mut placement);
    assert_eq!(launched, 1 + BURST_COUNT);
    // one placement per launch unit, not per entity
    assert_eq!(placement.calls, 1 + BURST_COUNT);

    for unit in s.units(1).unwrap() {
        let LaunchUnit::Pair { inner, outer } = *unit else {
            panic!("dual-color selection should launch pairs");
        };
        let (inner, outer) = (s.entity(inner).unwrap(), s.entity(outer).unwrap());
        assert_eq!(inner.start_time_ms, outer.start_time_ms);
        assert_eq!(inner.pause_offset_at_start_ms, outer.pause_offset_at_start_ms);
        assert_eq!(inner.placement, outer.placement);
        assert!(inner.motion.radius_m < outer.motion.radius_m);
    }
}

#[test]
fn orphaned_pair_half_is_never_launched() {
    let mut s = scheduler_with([Selection::new(FireworkCategory::Meshibe)]);
    let LaunchUnit::Pair { inner, outer } = s.units(0).unwrap()[0] else {
        panic!("meshibe launches as a pair");
    };
    s.detach_entity(inner);
    assert!(s.entity(outer).unwrap().is_orphaned());

    let mut placement = CountingPlacement::default();
    assert_eq!(s.poll_and_launch(1e9, &mut placement), 0);
    let survivor = s.entity(outer).unwrap();
    assert!(!survivor.has_launched);
    assert!(!survivor.visible);
    // and it is not removed either
    assert_eq!(s.arena().len(), 1);
}

#[test]
fn removal_keeps_indices_dense_and_recomputes_duration() {
    let mut s = scheduler_with((0..5).map(|_| solo()));
    assert_eq!(s.total_duration_ms(), 20_000.0);
    let removed = s.remove_selection(0).unwrap();
    assert_eq!(removed.category, FireworkCategory::Kiku);
    assert_eq!(s.len(), 4);
    assert_eq!(s.total_duration_ms(), 16_000.0);
    assert_eq!(s.launch_offset_ms(3, 0), Some(12_000.0));
    assert_eq!(
        s.remove_selection(4),
        Err(ShowError::IndexOutOfRange { index: 4, len: 4 })
    );
}

#[test]
fn full_playlist_rejects_more_selections() {
    let mut s = scheduler_with((0..MAX_TIMELINE_SELECTIONS).map(|_| solo()));
    assert!(s.is_full());
    assert_eq!(
        s.push_selection(solo()),
        Err(ShowError::PlaylistFull {
            max: MAX_TIMELINE_SELECTIONS
        })
    );
    assert_eq!(s.len(), MAX_TIMELINE_SELECTIONS);
}

#[test]
fn reset_hides_everything_for_a_fresh_run() {
    let mut s = scheduler_with([solo(), solo()]);
    let mut placement = CountingPlacement::default();
    s.poll_and_launch(1e9, &mut placement);
    assert_eq!(s.render_items().count(), 2);
    s.reset_launches();
    assert_eq!(s.render_items().count(), 0);
    assert_eq!(s.launched_count(), 0);
    assert!(s.arena().iter().all(|(_, e)| e.start_time_ms.is_none()));
}

#[test]
fn random_palette_colors_each_burst_slot() {
    let palette: Palette = [ColorPreset::Red, ColorPreset::Green].into_iter().collect();
    let sel = solo()
        .with_mode(LaunchMode::Burst(BurstType::Simultaneous))
        .with_color(FireworkColor::Random(palette));
    let s = scheduler_with([sel]);
    let colors: Vec<Rgba> = s
        .units(0)
        .unwrap()
        .iter()
        .map(|u| s.entity(u.ids()[0]).unwrap().motion.color)
        .collect();
    assert_eq!(colors[0], ColorPreset::Red.primary());
    assert_eq!(colors[1], ColorPreset::Green.primary());
    assert_eq!(colors[2], ColorPreset::Red.primary());
}
