use crate::constants::*;
use crate::duration::DurationPolicy;
use glam::Mat4;

/// Tuning for the background idle show.
///
/// - `initial_count`: shells spawned by `start_initial`
/// - `interval_s`: base spacing between shells
/// - `spacing_factor`: sequential start delay is `interval_s * spacing_factor`
/// - `launch_duration_s`, `bloom_duration_s`, `cooldown_duration_s`: the
///   lifecycle length used to size one idle cycle
/// - `min_loop_ms`: lower bound on one idle cycle
#[derive(Clone, Debug, PartialEq)]
pub struct AmbientConfig {
    pub initial_count: usize,
    pub interval_s: f64,
    pub spacing_factor: f64,
    pub launch_duration_s: f32,
    pub bloom_duration_s: f32,
    pub cooldown_duration_s: f32,
    pub min_loop_ms: f64,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            initial_count: AMBIENT_INITIAL_COUNT,
            interval_s: AMBIENT_INTERVAL_S,
            spacing_factor: AMBIENT_SPACING_FACTOR,
            launch_duration_s: DEFAULT_LAUNCH_DURATION_S,
            bloom_duration_s: DEFAULT_BLOOM_DURATION_S,
            cooldown_duration_s: DEFAULT_COOLDOWN_DURATION_S,
            min_loop_ms: AMBIENT_MIN_LOOP_MS,
        }
    }
}

/// Engine-wide configuration. `Default` uses the values in `constants.rs`.
#[derive(Clone, Debug, PartialEq)]
pub struct ShowConfig {
    pub durations: DurationPolicy,
    pub max_selections: usize,
    pub stagger_sub_delay_ms: f64,
    pub launch_spread_m: f32,
    /// Launch site; placements are random offsets around it.
    pub base_placement: Mat4,
    pub timeline_group: String,
    pub ambient_group: String,
    /// Whether a new timeline session loops at the end.
    pub loop_playback: bool,
    pub ambient: AmbientConfig,
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            durations: DurationPolicy::default(),
            max_selections: MAX_TIMELINE_SELECTIONS,
            stagger_sub_delay_ms: STAGGER_SUB_DELAY_MS,
            launch_spread_m: LAUNCH_SPREAD_METERS,
            base_placement: Mat4::IDENTITY,
            timeline_group: TIMELINE_GROUP.to_owned(),
            ambient_group: AMBIENT_GROUP.to_owned(),
            loop_playback: true,
            ambient: AmbientConfig::default(),
        }
    }
}
