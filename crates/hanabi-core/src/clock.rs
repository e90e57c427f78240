//! Per-group pause accounting.
//!
//! Each named group (ambient, timeline, ...) can be paused and resumed
//! independently. Pausing does not stop anything from running: it only makes
//! the elapsed-time arithmetic of the group's members stand still, so other
//! groups keep animating while one is frozen.

use fnv::FnvHashMap;
use instant::Instant;

/// Pause state of one group.
///
/// `paused_since` doubles as the pause flag: it is `Some` exactly while the
/// group is paused.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClockGroup {
    paused_since: Option<f64>,
    accumulated_pause_ms: f64,
}

impl ClockGroup {
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    #[inline]
    pub fn paused_since(&self) -> Option<f64> {
        self.paused_since
    }

    #[inline]
    pub fn accumulated_pause_ms(&self) -> f64 {
        self.accumulated_pause_ms
    }

    /// Total pause time accrued up to `now_ms`, including a pause in progress.
    pub fn paused_offset(&self, now_ms: f64) -> f64 {
        let running = self
            .paused_since
            .map(|since| (now_ms - since).max(0.0))
            .unwrap_or(0.0);
        self.accumulated_pause_ms + running
    }

    fn pause(&mut self, now_ms: f64) -> bool {
        if self.is_paused() {
            return false;
        }
        self.paused_since = Some(now_ms);
        true
    }

    fn resume(&mut self, now_ms: f64) -> bool {
        let Some(since) = self.paused_since.take() else {
            return false;
        };
        self.accumulated_pause_ms += (now_ms - since).max(0.0);
        true
    }
}

/// Registry of clock groups keyed by name. Groups are created on first
/// mutable reference and live until the registry is dropped.
#[derive(Clone, Debug, Default)]
pub struct ClockGroupRegistry {
    groups: FnvHashMap<String, ClockGroup>,
}

impl ClockGroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the given groups already known, so `pause_all` reaches
    /// them before they are first paused individually.
    pub fn with_groups<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut registry = Self::new();
        for name in names {
            registry.ensure(name);
        }
        registry
    }

    fn ensure(&mut self, group: &str) -> &mut ClockGroup {
        self.groups.entry(group.to_owned()).or_default()
    }

    pub fn group(&self, group: &str) -> Option<&ClockGroup> {
        self.groups.get(group)
    }

    /// Returns `true` when the group transitioned to paused.
    pub fn pause(&mut self, group: &str, now_ms: f64) -> bool {
        let changed = self.ensure(group).pause(now_ms);
        if changed {
            log::debug!("[clock] pause {group} at {now_ms:.1}ms");
        }
        changed
    }

    /// Returns `true` when the group transitioned to running.
    pub fn resume(&mut self, group: &str, now_ms: f64) -> bool {
        let changed = self.ensure(group).resume(now_ms);
        if changed {
            log::debug!(
                "[clock] resume {group} at {now_ms:.1}ms (accumulated {:.1}ms)",
                self.paused_offset(group, now_ms)
            );
        }
        changed
    }

    /// Clears the pause flag and zeroes the accumulator.
    pub fn reset(&mut self, group: &str) {
        *self.ensure(group) = ClockGroup::default();
        log::debug!("[clock] reset {group}");
    }

    pub fn is_paused(&self, group: &str) -> bool {
        self.groups.get(group).is_some_and(ClockGroup::is_paused)
    }

    /// Pause time a member of `group` has accrued up to `now_ms`. Unknown
    /// groups have never been paused.
    pub fn paused_offset(&self, group: &str, now_ms: f64) -> f64 {
        self.groups
            .get(group)
            .map(|g| g.paused_offset(now_ms))
            .unwrap_or(0.0)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn pause_all(&mut self, now_ms: f64) {
        for state in self.groups.values_mut() {
            state.pause(now_ms);
        }
        log::info!("[clock] pause all groups");
    }

    pub fn resume_all(&mut self, now_ms: f64) {
        for state in self.groups.values_mut() {
            state.resume(now_ms);
        }
        log::info!("[clock] resume all groups");
    }
}

/// Monotonic millisecond clock for hosts that do not receive a timestamp
/// from their frame driver.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    origin: Instant,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1_000.0
    }
}
