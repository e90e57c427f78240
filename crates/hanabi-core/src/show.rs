//! Whole-show orchestration: clocks, the ambient show and the timeline
//! session advanced together once per animation frame.

use crate::ambient::AmbientShow;
use crate::clock::ClockGroupRegistry;
use crate::config::ShowConfig;
use crate::error::ShowResult;
use crate::motion::{RenderItem, StageEvent};
use crate::placement::PlacementProvider;
use crate::selection::Selection;
use crate::session::{card_progress, CardProgress, PlaybackState, TickReport, TimelineSession};
use rand::prelude::*;

/// Summary of one frame, for UI and logging.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    pub timeline: TickReport,
    pub card: Option<CardProgress>,
    pub ambient_cycled: bool,
    /// Entities evaluated across both collections.
    pub animated: usize,
}

pub struct FireworkShow<P: PlacementProvider> {
    config: ShowConfig,
    clocks: ClockGroupRegistry,
    ambient: AmbientShow,
    timeline: TimelineSession,
    placement: P,
    ambient_enabled: bool,
    frozen: bool,
}

impl<P: PlacementProvider> FireworkShow<P> {
    pub fn new(config: ShowConfig, placement: P) -> Self {
        Self::with_rng(config, placement, StdRng::from_entropy())
    }

    /// Deterministic ambient shapes and colors.
    pub fn with_seed(config: ShowConfig, placement: P, seed: u64) -> Self {
        Self::with_rng(config, placement, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: ShowConfig, placement: P, rng: StdRng) -> Self {
        let clocks = ClockGroupRegistry::with_groups([
            config.ambient_group.as_str(),
            config.timeline_group.as_str(),
        ]);
        Self {
            ambient: AmbientShow::new(&config, rng),
            timeline: TimelineSession::new(&config),
            config,
            clocks,
            placement,
            ambient_enabled: false,
            frozen: false,
        }
    }

    pub fn config(&self) -> &ShowConfig {
        &self.config
    }

    pub fn clocks(&self) -> &ClockGroupRegistry {
        &self.clocks
    }

    pub fn ambient(&self) -> &AmbientShow {
        &self.ambient
    }

    pub fn timeline(&self) -> &TimelineSession {
        &self.timeline
    }

    #[inline]
    pub fn playback_state(&self) -> PlaybackState {
        self.timeline.state()
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Spawn the idle shells and start cycling them whenever the timeline is
    /// not playing.
    pub fn start_ambient(&mut self, now_ms: f64) -> bool {
        self.ambient_enabled = true;
        if !self.ambient.is_empty() {
            self.settle(now_ms);
            return false;
        }
        let started = self
            .ambient
            .start_initial(&self.clocks, now_ms, &mut self.placement);
        self.settle(now_ms);
        started
    }

    /// Run after every timeline transition. A frozen show keeps the timeline
    /// group paused whatever the session did to it.
    fn settle(&mut self, now_ms: f64) {
        if self.frozen {
            // resume and stop release the timeline group
            self.clocks.pause(&self.config.timeline_group, now_ms);
        }
        self.sync_ambient(now_ms);
    }

    /// The idle loop runs exactly when the timeline is not playing.
    fn sync_ambient(&mut self, now_ms: f64) {
        if self.timeline.is_playing() {
            self.ambient.stop_idle_loop();
        } else if self.ambient_enabled && !self.ambient.is_looping() {
            self.ambient.start_idle_loop(&self.clocks, now_ms);
        }
    }

    /// Advance one frame. Launches happen before any entity is animated, so
    /// a launch and its first stage are seen in the same frame.
    pub fn frame(&mut self, now_ms: f64, on_stage: &mut dyn FnMut(&StageEvent)) -> FrameReport {
        let ambient_cycled = self.ambient.tick(&self.clocks, now_ms);
        let timeline = self
            .timeline
            .tick(&mut self.clocks, now_ms, &mut self.placement);
        if timeline.finished {
            log::info!("[show] timeline finished");
        }
        self.settle(now_ms);
        let mut animated = self.ambient.animate(&self.clocks, now_ms, on_stage);
        animated += self.timeline.animate(&self.clocks, now_ms, on_stage);
        let card = match self.timeline.state() {
            PlaybackState::Stopped => None,
            _ => card_progress(timeline.progress_ratio, self.timeline.scheduler().len()),
        };
        FrameReport {
            timeline,
            card,
            ambient_cycled,
            animated,
        }
    }

    // ---------------- playback ----------------

    pub fn toggle_playback(&mut self, now_ms: f64) -> bool {
        let changed = self.timeline.toggle(&mut self.clocks, now_ms);
        self.settle(now_ms);
        changed
    }

    pub fn play(&mut self, now_ms: f64) -> bool {
        let changed = self.timeline.start(&self.clocks, now_ms);
        self.settle(now_ms);
        changed
    }

    pub fn pause(&mut self, now_ms: f64) -> bool {
        let changed = self.timeline.pause(&mut self.clocks, now_ms);
        self.settle(now_ms);
        changed
    }

    pub fn resume(&mut self, now_ms: f64) -> bool {
        let changed = self.timeline.resume(&mut self.clocks, now_ms);
        self.settle(now_ms);
        changed
    }

    pub fn stop(&mut self, now_ms: f64) -> bool {
        let changed = self.timeline.stop(&mut self.clocks);
        self.settle(now_ms);
        changed
    }

    pub fn clear_timeline(&mut self, now_ms: f64) {
        self.timeline.clear(&mut self.clocks);
        self.settle(now_ms);
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.timeline.set_looping(looping);
    }

    // ---------------- edits ----------------

    pub fn add_selection(&mut self, selection: Selection, now_ms: f64) -> ShowResult<usize> {
        let index = self
            .timeline
            .add_selection(selection, &mut self.clocks, now_ms, &mut self.placement)?;
        self.settle(now_ms);
        Ok(index)
    }

    pub fn update_selection(
        &mut self,
        index: usize,
        selection: Selection,
        now_ms: f64,
    ) -> ShowResult<()> {
        self.timeline
            .update_selection(index, selection, &mut self.clocks, now_ms)?;
        self.settle(now_ms);
        Ok(())
    }

    pub fn delete_selection(&mut self, index: usize, now_ms: f64) -> ShowResult<Selection> {
        let removed = self
            .timeline
            .delete_selection(index, &mut self.clocks, now_ms)?;
        self.settle(now_ms);
        Ok(removed)
    }

    // ---------------- global freeze ----------------

    /// Pause every clock group at once.
    pub fn freeze_all(&mut self, now_ms: f64) {
        self.clocks.pause_all(now_ms);
        self.frozen = true;
    }

    /// Undo `freeze_all`. A paused timeline stays paused. Until then every
    /// playback transition leaves the timeline group paused.
    pub fn thaw_all(&mut self, now_ms: f64) {
        self.clocks.resume_all(now_ms);
        if self.timeline.is_paused() {
            self.clocks.pause(&self.config.timeline_group, now_ms);
        }
        self.frozen = false;
    }

    pub fn toggle_freeze(&mut self, now_ms: f64) {
        if self.frozen {
            self.thaw_all(now_ms);
        } else {
            self.freeze_all(now_ms);
        }
    }

    /// Renderer intake for every visible entity, ambient first.
    pub fn render_list(&self) -> Vec<RenderItem> {
        self.ambient
            .render_items()
            .chain(self.timeline.render_items())
            .collect()
    }
}
