use crate::constants::{
    PLAYBACK_BASE_DURATION_MS, PLAYBACK_MAX_DURATION_MS, PLAYBACK_MIN_DURATION_MS,
};

/// Maps the number of scheduled selections to a total playback duration.
///
/// `duration_ms(n) = clamp(base_ms * max(n, 1), min_ms, max_ms)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DurationPolicy {
    pub base_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

impl Default for DurationPolicy {
    fn default() -> Self {
        Self {
            base_ms: PLAYBACK_BASE_DURATION_MS,
            min_ms: PLAYBACK_MIN_DURATION_MS,
            max_ms: PLAYBACK_MAX_DURATION_MS,
        }
    }
}

impl DurationPolicy {
    pub fn duration_ms(&self, selection_count: usize) -> f64 {
        let n = selection_count.max(1) as f64;
        // min(max) then max(min): an inverted range degrades to min_ms instead of panicking
        (self.base_ms * n).min(self.max_ms).max(self.min_ms)
    }
}
