//! Background idle show.
//!
//! A handful of random shells in the ambient clock group, started lazily on
//! first touch with increasing start delays and restarted as a cycle. The
//! cycle timer is polled against ambient-group active time, so freezing the
//! group also holds the cycle.

use crate::clock::ClockGroupRegistry;
use crate::config::{AmbientConfig, ShowConfig};
use crate::entity::{AnimatedEntity, EntityArena, MotionParams, StartMode};
use crate::motion::{self, RenderItem, StageEvent};
use crate::placement::PlacementProvider;
use crate::selection::{ColorPreset, FireworkCategory};
use glam::Mat4;
use rand::prelude::*;

pub struct AmbientShow {
    arena: EntityArena,
    config: AmbientConfig,
    group: String,
    base_placement: Mat4,
    spread_m: f32,
    rng: StdRng,
    looping: bool,
    cycle_start_ms: f64,
    cycle_pause_offset_ms: f64,
}

impl AmbientShow {
    pub fn new(config: &ShowConfig, rng: StdRng) -> Self {
        Self {
            arena: EntityArena::new(),
            config: config.ambient.clone(),
            group: config.ambient_group.clone(),
            base_placement: config.base_placement,
            spread_m: config.launch_spread_m,
            rng,
            looping: false,
            cycle_start_ms: 0.0,
            cycle_pause_offset_ms: 0.0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn arena(&self) -> &EntityArena {
        &self.arena
    }

    /// Add `count` shells of random catalogue shapes and colors. Shapes that
    /// need external model positions are left out.
    pub fn spawn_random(&mut self, count: usize, placement: &mut dyn PlacementProvider) -> usize {
        let categories: Vec<FireworkCategory> = FireworkCategory::ALL
            .into_iter()
            .filter(|c| !c.uses_model_positions())
            .collect();
        let spacing_ms = (self.config.interval_s * 1_000.0).max(0.0);
        for i in 0..count {
            let category = categories
                .choose(&mut self.rng)
                .copied()
                .unwrap_or(FireworkCategory::Kiku);
            let color = ColorPreset::random(&mut self.rng);
            let preset = category.preset();
            let entity = AnimatedEntity::new(
                self.group.clone(),
                StartMode::Lazy,
                MotionParams {
                    color: color.primary(),
                    point_size: preset.point_size,
                    radius_m: preset.radius_m,
                    launch_duration_s: self.config.launch_duration_s,
                    bloom_duration_s: preset.bloom_duration_s,
                    launch_height_m: crate::constants::DEFAULT_LAUNCH_HEIGHT_METERS,
                    gravity_strength: preset.gravity_strength,
                },
            )
            .with_start_delay(i as f64 * spacing_ms)
            .with_placement(placement.place(&self.base_placement, self.spread_m));
            let id = self.arena.insert(entity);
            if let Some(e) = self.arena.get_mut(id) {
                e.visible = self.looping;
            }
            log::debug!("[ambient] spawned {} in {}", category.key(), color.key());
        }
        count
    }

    /// Space shells out by `interval * spacing_factor` and clear their start
    /// times so each starts on its next evaluated frame.
    pub fn schedule_sequentially(&mut self) {
        let spacing_ms = (self.config.interval_s * self.config.spacing_factor * 1_000.0).max(0.0);
        for (i, (_, e)) in self.arena.iter_mut().enumerate() {
            e.start_delay_ms = i as f64 * spacing_ms;
            e.start_time_ms = None;
            e.reset_progress();
        }
    }

    /// Length of one idle cycle.
    pub fn loop_duration_ms(&self) -> f64 {
        let c = &self.config;
        let spacing_ms = (c.interval_s * 1_000.0).max(0.0);
        let span_ms = spacing_ms * self.arena.len().saturating_sub(1) as f64;
        let lifecycle_s = c.launch_duration_s + c.bloom_duration_s + c.cooldown_duration_s;
        let lifecycle_ms = lifecycle_s as f64 * 1_000.0;
        (span_ms + lifecycle_ms).max(c.min_loop_ms)
    }

    /// Show the shells and start cycling. No-op without shells.
    pub fn start_idle_loop(&mut self, clocks: &ClockGroupRegistry, now_ms: f64) -> bool {
        if self.arena.is_empty() {
            return false;
        }
        self.looping = true;
        for (_, e) in self.arena.iter_mut() {
            e.visible = true;
        }
        self.begin_cycle(clocks, now_ms);
        log::info!(
            "[ambient] idle loop started: {} shells, {:.0}ms cycle",
            self.arena.len(),
            self.loop_duration_ms()
        );
        true
    }

    pub fn stop_idle_loop(&mut self) {
        if !self.looping {
            return;
        }
        self.looping = false;
        for (_, e) in self.arena.iter_mut() {
            e.visible = false;
        }
        log::info!("[ambient] idle loop stopped");
    }

    /// Spawn the initial shells and start cycling them.
    pub fn start_initial(
        &mut self,
        clocks: &ClockGroupRegistry,
        now_ms: f64,
        placement: &mut dyn PlacementProvider,
    ) -> bool {
        self.spawn_random(self.config.initial_count, placement);
        self.schedule_sequentially();
        self.start_idle_loop(clocks, now_ms)
    }

    fn begin_cycle(&mut self, clocks: &ClockGroupRegistry, now_ms: f64) {
        self.schedule_sequentially();
        self.cycle_start_ms = now_ms;
        self.cycle_pause_offset_ms = clocks.paused_offset(&self.group, now_ms);
    }

    /// Restart the cycle once its active time reaches the loop duration.
    /// Returns `true` on the frame a new cycle begins.
    pub fn tick(&mut self, clocks: &ClockGroupRegistry, now_ms: f64) -> bool {
        if !self.looping {
            return false;
        }
        let paused =
            (clocks.paused_offset(&self.group, now_ms) - self.cycle_pause_offset_ms).max(0.0);
        let active_ms = now_ms - self.cycle_start_ms - paused;
        if active_ms < self.loop_duration_ms() {
            return false;
        }
        self.begin_cycle(clocks, now_ms);
        log::debug!("[ambient] cycle restart at {now_ms:.0}ms");
        true
    }

    pub fn clear(&mut self) {
        self.looping = false;
        self.arena.clear();
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
