//! Timeline launch scheduling.
//!
//! The scheduler owns the playlist and the entities derived from it. Every
//! animation frame the session asks it to launch whatever has come due at the
//! current playback elapsed time. Launches are polled against absolute
//! offsets rather than armed as timers, so pausing and resuming never drifts.
//!
//! Offsets: selection `i` is due at `i * total / n`; slot `k` of a staggered
//! burst is due `k * sub_delay` later, slots of a simultaneous burst share the
//! selection offset.

use crate::clock::ClockGroupRegistry;
use crate::config::ShowConfig;
use crate::constants::{BURST_COUNT, PAIRED_INNER_RADIUS_SCALE, PAIRED_OUTER_RADIUS_SCALE};
use crate::duration::DurationPolicy;
use crate::entity::{AnimatedEntity, EntityArena, EntityId, MotionParams, StartMode};
use crate::error::{ShowError, ShowResult};
use crate::motion::{self, RenderItem, StageEvent};
use crate::placement::PlacementProvider;
use crate::selection::{Rgba, Selection};
use glam::Mat4;
use smallvec::SmallVec;

/// What launches together at one offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchUnit {
    Single(EntityId),
    /// Inner and outer layers share one placement and one start instant.
    Pair { inner: EntityId, outer: EntityId },
}

impl LaunchUnit {
    pub fn ids(self) -> SmallVec<[EntityId; 2]> {
        match self {
            LaunchUnit::Single(id) => smallvec::smallvec![id],
            LaunchUnit::Pair { inner, outer } => smallvec::smallvec![inner, outer],
        }
    }

    /// The entity whose flags stand for the whole unit.
    #[inline]
    fn lead(self) -> EntityId {
        match self {
            LaunchUnit::Single(id) => id,
            LaunchUnit::Pair { inner, .. } => inner,
        }
    }
}

type Units = SmallVec<[LaunchUnit; BURST_COUNT]>;

pub struct LaunchScheduler {
    selections: Vec<Selection>,
    units: Vec<Units>,
    arena: EntityArena,
    playback_start_ms: f64,
    /// Group pause offset when `playback_start_ms` was fixed.
    playback_pause_offset_ms: f64,
    total_duration_ms: f64,
    policy: DurationPolicy,
    max_selections: usize,
    stagger_sub_delay_ms: f64,
    base_placement: Mat4,
    spread_m: f32,
    group: String,
}

impl LaunchScheduler {
    pub fn new(config: &ShowConfig) -> Self {
        Self {
            selections: Vec::new(),
            units: Vec::new(),
            arena: EntityArena::new(),
            playback_start_ms: 0.0,
            playback_pause_offset_ms: 0.0,
            total_duration_ms: config.durations.duration_ms(0),
            policy: config.durations,
            max_selections: config.max_selections,
            stagger_sub_delay_ms: config.stagger_sub_delay_ms,
            base_placement: config.base_placement,
            spread_m: config.launch_spread_m,
            group: config.timeline_group.clone(),
        }
    }

    // ---------------- playlist ----------------

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.selections.len() >= self.max_selections
    }

    /// Append a selection; returns its index.
    pub fn push_selection(&mut self, selection: Selection) -> ShowResult<usize> {
        if self.is_full() {
            log::warn!("[timeline] rejecting selection: playlist is full");
            return Err(ShowError::PlaylistFull {
                max: self.max_selections,
            });
        }
        let units = self.build_units(&selection);
        self.selections.push(selection);
        self.units.push(units);
        self.refresh_duration();
        self.refresh_offsets();
        Ok(self.selections.len() - 1)
    }

    /// Swap the selection at `index` for a new one, rebuilding its entities.
    /// The playlist length is unchanged, so the total duration is kept.
    pub fn replace_selection(&mut self, index: usize, selection: Selection) -> ShowResult<()> {
        self.check_index(index)?;
        self.remove_units(index);
        let units = self.build_units(&selection);
        self.units[index] = units;
        self.selections[index] = selection;
        self.refresh_offsets();
        Ok(())
    }

    /// Remove the selection at `index`. Later selections shift down so
    /// indices stay dense.
    pub fn remove_selection(&mut self, index: usize) -> ShowResult<Selection> {
        self.check_index(index)?;
        self.remove_units(index);
        self.units.remove(index);
        let removed = self.selections.remove(index);
        self.refresh_duration();
        self.refresh_offsets();
        Ok(removed)
    }

    pub fn clear(&mut self) {
        self.selections.clear();
        self.units.clear();
        self.arena.clear();
        self.refresh_duration();
    }

    fn check_index(&self, index: usize) -> ShowResult<()> {
        if index >= self.selections.len() {
            return Err(ShowError::IndexOutOfRange {
                index,
                len: self.selections.len(),
            });
        }
        Ok(())
    }

    fn remove_units(&mut self, index: usize) {
        for unit in std::mem::take(&mut self.units[index]) {
            for id in unit.ids() {
                self.arena.remove(id);
            }
        }
    }

    fn build_units(&mut self, selection: &Selection) -> Units {
        let motion = |color: Rgba, radius_m: f32| MotionParams {
            color,
            point_size: selection.point_size,
            radius_m,
            launch_duration_s: selection.launch_duration_s,
            bloom_duration_s: selection.bloom_duration_s,
            launch_height_m: selection.launch_height_m,
            gravity_strength: selection.gravity_strength,
        };
        // offsets are filled in by refresh_offsets once the playlist settles
        let start = StartMode::Scheduled { offset_ms: 0.0 };
        (0..selection.slot_count())
            .map(|slot| {
                let (primary, secondary) = selection.color.for_slot(slot);
                if selection.category.is_paired() {
                    let inner = AnimatedEntity::new(
                        self.group.clone(),
                        start,
                        motion(primary, selection.radius_m * PAIRED_INNER_RADIUS_SCALE),
                    );
                    let outer = AnimatedEntity::new(
                        self.group.clone(),
                        start,
                        motion(secondary, selection.radius_m * PAIRED_OUTER_RADIUS_SCALE),
                    );
                    let (inner, outer) = self.arena.insert_pair(inner, outer);
                    LaunchUnit::Pair { inner, outer }
                } else {
                    let params = motion(primary, selection.radius_m);
                    let entity = AnimatedEntity::new(self.group.clone(), start, params);
                    LaunchUnit::Single(self.arena.insert(entity))
                }
            })
            .collect()
    }

    /// Remove exactly one entity. If it was half of a pair, the other half
    /// is left orphaned and is never launched.
    pub fn detach_entity(&mut self, id: EntityId) -> Option<AnimatedEntity> {
        self.arena.remove(id)
    }

    // ---------------- timing ----------------

    #[inline]
    pub fn total_duration_ms(&self) -> f64 {
        self.total_duration_ms
    }

    fn refresh_duration(&mut self) {
        self.total_duration_ms = self.policy.duration_ms(self.selections.len());
    }

    /// Spacing between consecutive selections.
    #[inline]
    pub fn delay_ms(&self) -> f64 {
        self.total_duration_ms / self.selections.len().max(1) as f64
    }

    #[inline]
    pub fn playback_start_ms(&self) -> f64 {
        self.playback_start_ms
    }

    /// Fix the playback time origin together with the timeline group's pause
    /// offset at that instant.
    pub fn set_playback_origin(&mut self, start_ms: f64, pause_offset_ms: f64) {
        self.playback_start_ms = start_ms;
        self.playback_pause_offset_ms = pause_offset_ms;
    }

    /// Playback time elapsed at `now_ms`, not counting time the timeline
    /// group spent paused since the origin was fixed.
    pub fn elapsed_ms(&self, clocks: &ClockGroupRegistry, now_ms: f64) -> f64 {
        let paused =
            (clocks.paused_offset(&self.group, now_ms) - self.playback_pause_offset_ms).max(0.0);
        (now_ms - self.playback_start_ms - paused).max(0.0)
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Nominal offset of launch slot `slot` of selection `index`.
    pub fn launch_offset_ms(&self, index: usize, slot: usize) -> Option<f64> {
        let selection = self.selections.get(index)?;
        if slot >= self.units.get(index)?.len() {
            return None;
        }
        Some(self.offset_for(index, slot, selection))
    }

    fn offset_for(&self, index: usize, slot: usize, selection: &Selection) -> f64 {
        let stagger = if selection.mode.is_staggered() {
            slot as f64 * self.stagger_sub_delay_ms
        } else {
            0.0
        };
        index as f64 * self.delay_ms() + stagger
    }

    /// Re-derive every entity's scheduled offset from the current playlist.
    fn refresh_offsets(&mut self) {
        for index in 0..self.selections.len() {
            for slot in 0..self.units[index].len() {
                let offset_ms = self.offset_for(index, slot, &self.selections[index]);
                for id in self.units[index][slot].ids() {
                    if let Some(e) = self.arena.get_mut(id) {
                        e.start_mode = StartMode::Scheduled { offset_ms };
                    }
                }
            }
        }
    }

    // ---------------- launching ----------------

    /// Launch every unit whose offset is at or before `elapsed_ms` and that
    /// has not launched yet. Returns the number of units launched.
    ///
    /// Start times are set to `playback start + offset`, not to the poll
    /// instant, so a late frame still shows the exact scheduled progress. The
    /// pause snapshot is the origin's, so pauses taken since the origin are
    /// discounted from the entity as well.
    pub fn poll_and_launch(
        &mut self,
        elapsed_ms: f64,
        placement: &mut dyn PlacementProvider,
    ) -> usize {
        if self.selections.is_empty() {
            return 0;
        }
        let mut launched = 0;
        for index in 0..self.selections.len() {
            for slot in 0..self.units[index].len() {
                let unit = self.units[index][slot];
                if !self.is_launchable(unit) {
                    continue;
                }
                let offset_ms = self.offset_for(index, slot, &self.selections[index]);
                if offset_ms > elapsed_ms {
                    continue;
                }
                let start_ms = self.playback_start_ms + offset_ms;
                let pause_offset_ms = self.playback_pause_offset_ms;
                let transform = placement.place(&self.base_placement, self.spread_m);
                for id in unit.ids() {
                    if let Some(e) = self.arena.get_mut(id) {
                        e.start_at(start_ms, pause_offset_ms);
                        e.has_launched = true;
                        e.reset_progress();
                        e.visible = true;
                        e.placement = transform;
                    }
                }
                log::debug!("[timeline] launch selection {index} slot {slot} at +{offset_ms:.0}ms");
                launched += 1;
            }
        }
        launched
    }

    /// Not yet launched, and not missing a pair half.
    fn is_launchable(&self, unit: LaunchUnit) -> bool {
        let present = |id: EntityId| self.arena.get(id).filter(|e| !e.is_orphaned());
        match unit {
            LaunchUnit::Single(id) => present(id).is_some_and(|e| !e.has_launched),
            LaunchUnit::Pair { inner, outer } => {
                present(outer).is_some() && present(inner).is_some_and(|e| !e.has_launched)
            }
        }
    }

    pub fn is_launched(&self, index: usize, slot: usize) -> bool {
        self.units
            .get(index)
            .and_then(|u| u.get(slot))
            .and_then(|unit| self.arena.get(unit.lead()))
            .is_some_and(|e| e.has_launched)
    }

    /// Number of launched units across the playlist.
    pub fn launched_count(&self) -> usize {
        self.units
            .iter()
            .flatten()
            .filter(|unit| self.arena.get(unit.lead()).is_some_and(|e| e.has_launched))
            .count()
    }

    /// Hide every entity and forget launches, ready for a fresh run.
    pub fn reset_launches(&mut self) {
        for (_, e) in self.arena.iter_mut() {
            e.has_launched = false;
            e.visible = false;
            e.start_time_ms = None;
            e.reset_progress();
        }
    }

    /// Re-derive the start time of every launched entity from the current
    /// playback origin and its (possibly edited) offset.
    ///
    /// Call after `set_playback_origin`: the new origin already absorbs all
    /// earlier pause time, so entities take the origin's pause snapshot too;
    /// otherwise the same pause would be subtracted twice.
    pub fn retime_launched(&mut self) {
        let pause_offset_ms = self.playback_pause_offset_ms;
        let playback_start_ms = self.playback_start_ms;
        for (_, e) in self.arena.iter_mut() {
            if !e.has_launched {
                continue;
            }
            if let StartMode::Scheduled { offset_ms } = e.start_mode {
                e.start_at(playback_start_ms + offset_ms, pause_offset_ms);
            }
        }
    }

    // ---------------- entities ----------------

    pub fn arena(&self) -> &EntityArena {
        &self.arena
    }

    pub fn units(&self, index: usize) -> Option<&[LaunchUnit]> {
        self.units.get(index).map(|u| u.as_slice())
    }

    pub fn entity(&self, id: EntityId) -> Option<&AnimatedEntity> {
        self.arena.get(id)
    }

    pub fn animate(
        &mut self,
        clocks: &ClockGroupRegistry,
        now_ms: f64,
        on_stage: &mut dyn FnMut(&StageEvent),
    ) -> usize {
        motion::animate(&mut self.arena, clocks, now_ms, on_stage)
    }

    pub fn render_items(&self) -> impl Iterator<Item = RenderItem> + '_ {
        motion::render_items(&self.arena)
    }
}
