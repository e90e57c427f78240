//! Entity time base and motion progress.
//!
//! Given an entity and the current frame time, derive how long the entity has
//! actually been *active* (wall time minus the pause time its group accrued
//! since the entity started), then map that onto launch progress, bloom time
//! and a lifecycle stage. All of this is pure arithmetic; the only mutation is
//! the first-touch start of lazily started entities and the cached progress.

use crate::clock::ClockGroupRegistry;
use crate::constants::DURATION_EPSILON_S;
use crate::entity::{AnimatedEntity, EntityArena, EntityId};
use glam::Mat4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Pending,
    Launch,
    Bloom,
    Cooldown,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Pending => "pending",
            Stage::Launch => "launch",
            Stage::Bloom => "bloom",
            Stage::Cooldown => "cooldown",
        }
    }
}

/// Result of evaluating one entity at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluation {
    pub stage: Stage,
    pub has_started: bool,
    pub launch_progress: f32,
    pub bloom_elapsed_s: f32,
    pub launch_duration_s: f32,
    pub bloom_duration_s: f32,
    /// Active time past the start delay, in milliseconds.
    pub active_elapsed_ms: f64,
    /// Group pause time accrued since the entity started.
    pub pause_accrued_ms: f64,
}

/// Sound or effect a collaborator may fire on a stage transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageCue {
    Whizz,
    Bloom,
}

/// Per-entity, per-frame egress for audio/VFX collaborators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageEvent {
    pub entity: EntityId,
    pub now_ms: f64,
    pub stage: Stage,
    pub previous_stage: Option<Stage>,
    pub has_started: bool,
    pub launch_progress: f32,
    pub bloom_elapsed_s: f32,
}

impl StageEvent {
    /// A cue fires once, on the frame a started entity enters launch or bloom.
    pub fn cue(&self) -> Option<StageCue> {
        if !self.has_started || self.previous_stage == Some(self.stage) {
            return None;
        }
        match self.stage {
            Stage::Launch => Some(StageCue::Whizz),
            Stage::Bloom => Some(StageCue::Bloom),
            Stage::Pending | Stage::Cooldown => None,
        }
    }
}

/// Parameter block consumed by the renderer once per frame per visible entity.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RenderParams {
    pub color_rgba: [f32; 4],
    pub point_size: f32,
    pub launch_progress: f32,
    pub bloom_elapsed_s: f32,
    pub bloom_duration_s: f32,
    pub launch_height_m: f32,
    pub radius_m: f32,
    pub gravity_strength: f32,
    pub _pad: f32,
}

impl RenderParams {
    pub fn for_entity(entity: &AnimatedEntity) -> Self {
        let m = &entity.motion;
        Self {
            color_rgba: m.color.0,
            point_size: m.point_size,
            launch_progress: entity.progress.launch_progress,
            bloom_elapsed_s: entity.progress.bloom_elapsed_s,
            bloom_duration_s: m.bloom_duration_s.max(DURATION_EPSILON_S),
            launch_height_m: m.launch_height_m,
            radius_m: m.radius_m,
            gravity_strength: m.gravity_strength,
            _pad: 0.0,
        }
    }
}

/// One drawable instance: where to draw and with which parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    pub entity: EntityId,
    pub placement: Mat4,
    pub params: RenderParams,
}

/// Evaluate the time base of `entity` at `now_ms`.
///
/// An entity without a start time is started here (first touch) and
/// snapshots its group's pause offset. Nothing else is mutated.
pub fn evaluate(
    entity: &mut AnimatedEntity,
    clocks: &ClockGroupRegistry,
    now_ms: f64,
) -> Evaluation {
    let paused_offset_now = clocks.paused_offset(&entity.group, now_ms);
    let start_ms = match entity.start_time_ms {
        Some(start) => start,
        None => {
            entity.start_at(now_ms, paused_offset_now);
            now_ms
        }
    };
    let delay_ms = entity.start_delay_ms.max(0.0);
    let pause_accrued_ms = (paused_offset_now - entity.pause_offset_at_start_ms).max(0.0);
    let since_start_ms = now_ms - start_ms - pause_accrued_ms;
    let active_elapsed_ms = (since_start_ms - delay_ms).max(0.0);
    let active_elapsed_s = (active_elapsed_ms * 0.001) as f32;

    let launch_duration_s = entity.motion.launch_duration_s.max(DURATION_EPSILON_S);
    let bloom_duration_s = entity.motion.bloom_duration_s.max(DURATION_EPSILON_S);
    let launch_progress = (active_elapsed_s / launch_duration_s).clamp(0.0, 1.0);
    let bloom_elapsed_s = (active_elapsed_s - launch_duration_s).max(0.0);

    let has_started = since_start_ms >= delay_ms;
    let stage = if !has_started {
        Stage::Pending
    } else if launch_progress < 1.0 {
        Stage::Launch
    } else if bloom_elapsed_s <= bloom_duration_s {
        Stage::Bloom
    } else {
        Stage::Cooldown
    };

    Evaluation {
        stage,
        has_started,
        launch_progress,
        bloom_elapsed_s,
        launch_duration_s,
        bloom_duration_s,
        active_elapsed_ms,
        pause_accrued_ms,
    }
}

/// Advance every visible entity of a collection by one frame.
///
/// Hidden entities are skipped without touching their time base, so pooled
/// entities do not silently start while invisible. Returns the number of
/// entities evaluated.
pub fn animate(
    arena: &mut EntityArena,
    clocks: &ClockGroupRegistry,
    now_ms: f64,
    on_stage: &mut dyn FnMut(&StageEvent),
) -> usize {
    let mut evaluated = 0;
    for (id, entity) in arena.iter_mut() {
        if !entity.visible {
            continue;
        }
        let eval = evaluate(entity, clocks, now_ms);
        entity.progress.launch_progress = eval.launch_progress;
        entity.progress.bloom_elapsed_s = eval.bloom_elapsed_s;
        let previous_stage = entity.last_stage.replace(eval.stage);
        on_stage(&StageEvent {
            entity: id,
            now_ms,
            stage: eval.stage,
            previous_stage,
            has_started: eval.has_started,
            launch_progress: eval.launch_progress,
            bloom_elapsed_s: eval.bloom_elapsed_s,
        });
        evaluated += 1;
    }
    evaluated
}

/// Renderer intake for every visible entity of a collection.
pub fn render_items(arena: &EntityArena) -> impl Iterator<Item = RenderItem> + '_ {
    arena
        .iter()
        .filter(|(_, e)| e.visible)
        .map(|(id, e)| RenderItem {
            entity: id,
            placement: e.placement,
            params: RenderParams::for_entity(e),
        })
}
