// Shared timing and layout tuning constants used by the engine and both frontends.

// Clock groups
pub const AMBIENT_GROUP: &str = "ambient"; // background idle show
pub const TIMELINE_GROUP: &str = "timeline"; // user-edited playlist

// Playlist
pub const MAX_TIMELINE_SELECTIONS: usize = 9;
pub const BURST_COUNT: usize = 5; // launch slots in a burst selection
pub const STAGGER_SUB_DELAY_MS: f64 = 200.0; // gap between staggered burst slots

// Playback duration policy: base per selection, clamped to [min, max]
pub const PLAYBACK_BASE_DURATION_MS: f64 = 4_000.0;
pub const PLAYBACK_MIN_DURATION_MS: f64 = 10_000.0;
pub const PLAYBACK_MAX_DURATION_MS: f64 = 30_000.0;

// Motion defaults (seconds)
pub const DEFAULT_LAUNCH_DURATION_S: f32 = 2.0;
pub const DEFAULT_BLOOM_DURATION_S: f32 = 2.0;
// tail after bloom before an ambient cycle restarts
pub const DEFAULT_COOLDOWN_DURATION_S: f32 = 2.0;
pub const DURATION_EPSILON_S: f32 = 1e-6; // floor for every duration used as a denominator

// Placement
pub const LAUNCH_SPREAD_METERS: f32 = 100.0; // random x/y offset range around the base transform
pub const DEFAULT_LAUNCH_HEIGHT_METERS: f32 = 200.0;

// Dual-color (paired) bursts
pub const PAIRED_INNER_RADIUS_SCALE: f32 = 0.6;
pub const PAIRED_OUTER_RADIUS_SCALE: f32 = 1.2;

// Ambient idle show
pub const AMBIENT_INITIAL_COUNT: usize = 5;
pub const AMBIENT_INTERVAL_S: f64 = 1.0;
pub const AMBIENT_SPACING_FACTOR: f64 = 1.5; // sequential start delay = interval * factor
pub const AMBIENT_MIN_LOOP_MS: f64 = 1_000.0;

// Random palette size for burst selections
pub const RANDOM_PALETTE_SIZE: usize = 5;
