// Host-side tests for the background idle show.

use glam::Mat4;
use hanabi_core::constants::*;
use hanabi_core::*;
use rand::prelude::*;

struct Fixed;

impl PlacementProvider for Fixed {
    fn place(&mut self, base: &Mat4, _spread_m: f32) -> Mat4 {
        *base
    }
}

fn ambient(seed: u64) -> AmbientShow {
    AmbientShow::new(&ShowConfig::default(), StdRng::seed_from_u64(seed))
}

#[test]
fn initial_show_spawns_and_starts_cycling() {
    let clocks = ClockGroupRegistry::new();
    let mut show = ambient(1);
    assert!(show.start_initial(&clocks, 0.0, &mut Fixed));
    assert_eq!(show.len(), AMBIENT_INITIAL_COUNT);
    assert!(show.is_looping());
    assert!(show.arena().iter().all(|(_, e)| e.visible && e.group == AMBIENT_GROUP));
    assert!(show
        .arena()
        .iter()
        .all(|(_, e)| e.start_mode == StartMode::Lazy && e.start_time_ms.is_none()));
}

#[test]
fn sequential_schedule_spaces_start_delays() {
    let clocks = ClockGroupRegistry::new();
    let mut show = ambient(2);
    show.start_initial(&clocks, 0.0, &mut Fixed);
    let delays: Vec<f64> = show.arena().iter().map(|(_, e)| e.start_delay_ms).collect();
    assert_eq!(delays, vec![0.0, 1_500.0, 3_000.0, 4_500.0, 6_000.0]);
}

#[test]
fn loop_duration_covers_the_span_and_one_lifecycle() {
    let mut show = ambient(3);
    // empty: just the lifecycle
    assert_eq!(show.loop_duration_ms(), 6_000.0);
    show.spawn_random(5, &mut Fixed);
    assert_eq!(show.loop_duration_ms(), 4_000.0 + 6_000.0);

    let mut config = ShowConfig::default();
    config.ambient.launch_duration_s = 0.0;
    config.ambient.bloom_duration_s = 0.0;
    config.ambient.cooldown_duration_s = 0.0;
    let tiny = AmbientShow::new(&config, StdRng::seed_from_u64(3));
    assert_eq!(tiny.loop_duration_ms(), AMBIENT_MIN_LOOP_MS);
}

#[test]
fn random_shells_skip_model_driven_shapes() {
    let mut show = ambient(4);
    show.spawn_random(200, &mut Fixed);
    let model_radius = FireworkCategory::Heart.preset().radius_m;
    assert!(show.arena().iter().all(|(_, e)| e.motion.radius_m != model_radius));
}

#[test]
fn first_frame_starts_shells_lazily() {
    let clocks = ClockGroupRegistry::new();
    let mut show = ambient(5);
    show.start_initial(&clocks, 0.0, &mut Fixed);
    let mut pending = 0;
    show.animate(&clocks, 250.0, &mut |ev| {
        if ev.stage == Stage::Pending {
            pending += 1;
        }
    });
    assert!(show.arena().iter().all(|(_, e)| e.start_time_ms == Some(250.0)));
    // only the first shell has no start delay
    assert_eq!(pending, AMBIENT_INITIAL_COUNT - 1);
}

#[test]
fn cycle_restarts_after_the_loop_duration() {
    let clocks = ClockGroupRegistry::new();
    let mut show = ambient(6);
    show.start_initial(&clocks, 0.0, &mut Fixed);
    show.animate(&clocks, 0.0, &mut |_| {});
    let cycle = show.loop_duration_ms();
    assert!(!show.tick(&clocks, cycle - 1.0));
    assert!(show.tick(&clocks, cycle));
    // the new cycle re-arms the lazy start
    assert!(show.arena().iter().all(|(_, e)| e.start_time_ms.is_none()));
    assert!(!show.tick(&clocks, cycle + 1.0));
}

#[test]
fn freezing_the_group_holds_the_cycle() {
    let mut clocks = ClockGroupRegistry::new();
    let mut show = ambient(7);
    show.start_initial(&clocks, 0.0, &mut Fixed);
    let cycle = show.loop_duration_ms();
    clocks.pause(AMBIENT_GROUP, 2_000.0);
    clocks.resume(AMBIENT_GROUP, 5_000.0);
    assert!(!show.tick(&clocks, cycle + 2_999.0));
    assert!(show.tick(&clocks, cycle + 3_000.0));
}

#[test]
fn stopping_hides_and_stops_cycling() {
    let clocks = ClockGroupRegistry::new();
    let mut show = ambient(8);
    assert!(!show.start_idle_loop(&clocks, 0.0));
    show.start_initial(&clocks, 0.0, &mut Fixed);
    show.stop_idle_loop();
    assert!(!show.is_looping());
    assert_eq!(show.render_items().count(), 0);
    assert!(!show.tick(&clocks, 1e9));

    assert!(show.start_idle_loop(&clocks, 50.0));
    assert_eq!(show.render_items().count(), AMBIENT_INITIAL_COUNT);
}
