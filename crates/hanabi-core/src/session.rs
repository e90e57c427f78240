//! Playback session over the launch scheduler.
//!
//! States: Stopped -> Playing <-> Paused -> Stopped, plus a looping flag.
//! Transitions that do not apply in the current state are no-ops and return
//! `false`.

use crate::clock::ClockGroupRegistry;
use crate::config::ShowConfig;
use crate::error::ShowResult;
use crate::motion::{RenderItem, StageEvent};
use crate::placement::PlacementProvider;
use crate::scheduler::LaunchScheduler;
use crate::selection::Selection;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    /// Playback time at the pause; resume continues from here.
    Paused { elapsed_ms: f64 },
}

/// What one timeline frame did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickReport {
    pub progress_ratio: f64,
    /// Launch units fired this frame (a pair counts once).
    pub launched: usize,
    pub looped: bool,
    /// Playback reached the end without looping and stopped.
    pub finished: bool,
}

/// Position of the progress bar within the playlist cards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardProgress {
    pub index: usize,
    pub slot_progress: f64,
}

/// Map the overall progress ratio onto the card it falls in and the
/// progress within that card. `None` for an empty playlist.
pub fn card_progress(ratio: f64, count: usize) -> Option<CardProgress> {
    if count == 0 {
        return None;
    }
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let slot = 1.0 / count as f64;
    let index = ((ratio * count as f64).floor() as usize).min(count - 1);
    let slot_progress = ((ratio - slot * index as f64) / slot).clamp(0.0, 1.0);
    Some(CardProgress { index, slot_progress })
}

pub struct TimelineSession {
    scheduler: LaunchScheduler,
    state: PlaybackState,
    looping: bool,
}

impl TimelineSession {
    pub fn new(config: &ShowConfig) -> Self {
        Self {
            scheduler: LaunchScheduler::new(config),
            state: PlaybackState::Stopped,
            looping: config.loop_playback,
        }
    }

    #[inline]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        matches!(self.state, PlaybackState::Paused { .. })
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
        log::info!("[timeline] looping {}", if looping { "on" } else { "off" });
    }

    pub fn scheduler(&self) -> &LaunchScheduler {
        &self.scheduler
    }

    /// Playback progress in `[0, 1]`. Frozen while paused, zero when stopped.
    pub fn progress_ratio(&self, clocks: &ClockGroupRegistry, now_ms: f64) -> f64 {
        match self.state {
            PlaybackState::Stopped => 0.0,
            PlaybackState::Paused { elapsed_ms } => self.ratio_of(elapsed_ms),
            PlaybackState::Playing => self.ratio_of(self.scheduler.elapsed_ms(clocks, now_ms)),
        }
    }

    fn ratio_of(&self, elapsed_ms: f64) -> f64 {
        let total = self.scheduler.total_duration_ms();
        if total <= 0.0 {
            return 1.0;
        }
        (elapsed_ms / total).clamp(0.0, 1.0)
    }

    // ---------------- transitions ----------------

    /// Stopped -> Playing. Needs a non-empty playlist.
    pub fn start(&mut self, clocks: &ClockGroupRegistry, now_ms: f64) -> bool {
        if self.state != PlaybackState::Stopped || self.scheduler.is_empty() {
            return false;
        }
        self.begin_run(clocks, now_ms);
        self.state = PlaybackState::Playing;
        log::info!(
            "[timeline] start: {} selections over {:.0}ms",
            self.scheduler.len(),
            self.scheduler.total_duration_ms()
        );
        true
    }

    /// Playing -> Paused. Entities freeze because their group is paused.
    pub fn pause(&mut self, clocks: &mut ClockGroupRegistry, now_ms: f64) -> bool {
        if self.state != PlaybackState::Playing {
            return false;
        }
        let elapsed_ms = self.scheduler.elapsed_ms(clocks, now_ms);
        clocks.pause(self.scheduler.group(), now_ms);
        self.state = PlaybackState::Paused { elapsed_ms };
        log::info!("[timeline] pause at {:.1}%", self.ratio_of(elapsed_ms) * 100.0);
        true
    }

    /// Paused -> Playing from the saved position. Launched entities are
    /// re-timed against the new origin and their current offsets, so an
    /// entity whose offset survived the edits continues without a jump.
    pub fn resume(&mut self, clocks: &mut ClockGroupRegistry, now_ms: f64) -> bool {
        let PlaybackState::Paused { elapsed_ms } = self.state else {
            return false;
        };
        clocks.resume(self.scheduler.group(), now_ms);
        self.place_origin_at(clocks, now_ms, elapsed_ms);
        self.scheduler.retime_launched();
        self.state = PlaybackState::Playing;
        log::info!("[timeline] resume at {:.1}%", self.ratio_of(elapsed_ms) * 100.0);
        true
    }

    /// Stopped -> start, Playing -> pause, Paused -> resume.
    pub fn toggle(&mut self, clocks: &mut ClockGroupRegistry, now_ms: f64) -> bool {
        match self.state {
            PlaybackState::Stopped => self.start(clocks, now_ms),
            PlaybackState::Playing => self.pause(clocks, now_ms),
            PlaybackState::Paused { .. } => self.resume(clocks, now_ms),
        }
    }

    /// Any state -> Stopped: hide everything and zero the timeline group.
    pub fn stop(&mut self, clocks: &mut ClockGroupRegistry) -> bool {
        if self.state == PlaybackState::Stopped {
            return false;
        }
        self.scheduler.reset_launches();
        clocks.reset(self.scheduler.group());
        self.state = PlaybackState::Stopped;
        log::info!("[timeline] stop");
        true
    }

    /// Stop and empty the playlist.
    pub fn clear(&mut self, clocks: &mut ClockGroupRegistry) {
        self.stop(clocks);
        self.scheduler.clear();
        clocks.reset(self.scheduler.group());
        log::info!("[timeline] cleared");
    }

    fn begin_run(&mut self, clocks: &ClockGroupRegistry, now_ms: f64) {
        let group = self.scheduler.group();
        let pause_offset_ms = clocks.paused_offset(group, now_ms);
        self.scheduler.reset_launches();
        self.scheduler.set_playback_origin(now_ms, pause_offset_ms);
    }

    fn place_origin_at(&mut self, clocks: &ClockGroupRegistry, now_ms: f64, elapsed_ms: f64) {
        let pause_offset_ms = clocks.paused_offset(self.scheduler.group(), now_ms);
        self.scheduler
            .set_playback_origin(now_ms - elapsed_ms, pause_offset_ms);
    }

    /// Advance one frame: launch what is due, then loop or finish at the end.
    pub fn tick(
        &mut self,
        clocks: &mut ClockGroupRegistry,
        now_ms: f64,
        placement: &mut dyn PlacementProvider,
    ) -> TickReport {
        if self.state != PlaybackState::Playing {
            return TickReport {
                progress_ratio: self.progress_ratio(clocks, now_ms),
                ..TickReport::default()
            };
        }
        let elapsed_ms = self.scheduler.elapsed_ms(clocks, now_ms);
        let mut launched = self.scheduler.poll_and_launch(elapsed_ms, placement);
        let progress_ratio = self.ratio_of(elapsed_ms);
        if progress_ratio < 1.0 {
            return TickReport {
                progress_ratio,
                launched,
                ..TickReport::default()
            };
        }
        if self.looping {
            log::debug!("[timeline] loop");
            self.begin_run(clocks, now_ms);
            launched += self.scheduler.poll_and_launch(0.0, placement);
            return TickReport {
                progress_ratio: 0.0,
                launched,
                looped: true,
                finished: false,
            };
        }
        self.stop(clocks);
        TickReport {
            progress_ratio: 1.0,
            launched,
            looped: false,
            finished: true,
        }
    }

    // ---------------- playlist edits ----------------

    /// Append a selection. While playing, playback restarts from the top.
    /// While paused, anything already due at the paused position launches
    /// now so it is visible at the right progress.
    pub fn add_selection(
        &mut self,
        selection: Selection,
        clocks: &mut ClockGroupRegistry,
        now_ms: f64,
        placement: &mut dyn PlacementProvider,
    ) -> ShowResult<usize> {
        let index = self.scheduler.push_selection(selection)?;
        match self.state {
            PlaybackState::Playing => self.restart(clocks, now_ms),
            PlaybackState::Paused { elapsed_ms } => {
                // Launched entities keep their own origin until resume
                // re-times them; the new origin only places fresh launches.
                self.place_origin_at(clocks, now_ms, elapsed_ms);
                self.scheduler.poll_and_launch(elapsed_ms, placement);
            }
            PlaybackState::Stopped => {}
        }
        log::info!("[timeline] added selection {index}");
        Ok(index)
    }

    /// Replace the selection at `index`. Restarts while playing; while paused
    /// the change takes effect on resume.
    pub fn update_selection(
        &mut self,
        index: usize,
        selection: Selection,
        clocks: &mut ClockGroupRegistry,
        now_ms: f64,
    ) -> ShowResult<()> {
        self.scheduler.replace_selection(index, selection)?;
        if self.is_playing() {
            self.restart(clocks, now_ms);
        }
        log::info!("[timeline] updated selection {index}");
        Ok(())
    }

    /// Remove the selection at `index`. Restarts while playing; while paused
    /// the new offsets take effect on resume. Removing the last selection
    /// stops playback.
    pub fn delete_selection(
        &mut self,
        index: usize,
        clocks: &mut ClockGroupRegistry,
        now_ms: f64,
    ) -> ShowResult<Selection> {
        let removed = self.scheduler.remove_selection(index)?;
        if self.scheduler.is_empty() {
            self.stop(clocks);
        } else if self.is_playing() {
            self.restart(clocks, now_ms);
        }
        log::info!("[timeline] deleted selection {index}");
        Ok(removed)
    }

    fn restart(&mut self, clocks: &mut ClockGroupRegistry, now_ms: f64) {
        self.stop(clocks);
        self.start(clocks, now_ms);
    }

    // ---------------- per-frame animation ----------------

    pub fn animate(
        &mut self,
        clocks: &ClockGroupRegistry,
        now_ms: f64,
        on_stage: &mut dyn FnMut(&StageEvent),
    ) -> usize {
        self.scheduler.animate(clocks, now_ms, on_stage)
    }

    pub fn render_items(&self) -> impl Iterator<Item = RenderItem> + '_ {
        self.scheduler.render_items()
    }
}
