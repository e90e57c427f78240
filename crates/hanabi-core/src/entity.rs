//! Flat arena of animated particle-burst instances.
//!
//! Pairs (inner/outer layers of a dual-color shell) link to each other by
//! `EntityId` instead of holding references, so removing one side is a single
//! operation on the arena.

use crate::selection::Rgba;
use glam::Mat4;

/// Generational handle into an [`EntityArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// How an entity's start time gets fixed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StartMode {
    /// Start on the first frame the entity is evaluated while visible.
    Lazy,
    /// Start at `playback start + offset_ms`, assigned by the scheduler.
    Scheduled { offset_ms: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PairRole {
    /// Leads the pair: launching it launches the partner too.
    Inner,
    Outer,
}

/// Link to the other half of a dual-color shell. `partner` becomes `None`
/// when the other half is removed; the survivor keeps its role and is then
/// an orphan that the scheduler never launches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pairing {
    pub role: PairRole,
    pub partner: Option<EntityId>,
}

/// Static look and motion parameters, fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionParams {
    pub color: Rgba,
    pub point_size: f32,
    pub radius_m: f32,
    pub launch_duration_s: f32,
    pub bloom_duration_s: f32,
    pub launch_height_m: f32,
    pub gravity_strength: f32,
}

/// Values last computed by the motion evaluator; zero before launch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Progress {
    pub launch_progress: f32,
    pub bloom_elapsed_s: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedEntity {
    pub group: String,
    pub start_mode: StartMode,
    pub start_time_ms: Option<f64>,
    /// Group pause offset captured when `start_time_ms` was fixed.
    pub pause_offset_at_start_ms: f64,
    pub start_delay_ms: f64,
    pub motion: MotionParams,
    pub has_launched: bool,
    pub pairing: Option<Pairing>,
    pub visible: bool,
    pub placement: Mat4,
    pub progress: Progress,
    /// Stage seen on the previous evaluation, used to detect transitions.
    pub last_stage: Option<crate::motion::Stage>,
}

impl AnimatedEntity {
    pub fn new(group: impl Into<String>, start_mode: StartMode, motion: MotionParams) -> Self {
        Self {
            group: group.into(),
            start_mode,
            start_time_ms: None,
            pause_offset_at_start_ms: 0.0,
            start_delay_ms: 0.0,
            motion,
            has_launched: false,
            pairing: None,
            visible: false,
            placement: Mat4::IDENTITY,
            progress: Progress::default(),
            last_stage: None,
        }
    }

    pub fn with_start_delay(mut self, delay_ms: f64) -> Self {
        self.start_delay_ms = delay_ms.max(0.0);
        self
    }

    pub fn with_placement(mut self, placement: Mat4) -> Self {
        self.placement = placement;
        self
    }

    /// Fix the start instant and snapshot the group's pause offset at it.
    #[inline]
    pub fn start_at(&mut self, start_ms: f64, pause_offset_ms: f64) {
        self.start_time_ms = Some(start_ms);
        self.pause_offset_at_start_ms = pause_offset_ms;
    }

    /// Back to the never-evaluated state: no progress, no stage memory.
    pub fn reset_progress(&mut self) {
        self.progress = Progress::default();
        self.last_stage = None;
    }

    #[inline]
    pub fn is_orphaned(&self) -> bool {
        matches!(self.pairing, Some(Pairing { partner: None, .. }))
    }
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    entity: Option<AnimatedEntity>,
}

#[derive(Clone, Debug, Default)]
pub struct EntityArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl EntityArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: AnimatedEntity) -> EntityId {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entity = Some(entity);
            return EntityId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entity: Some(entity),
        });
        EntityId {
            index,
            generation: 0,
        }
    }

    /// Insert an inner/outer pair already linked to each other.
    pub fn insert_pair(
        &mut self,
        inner: AnimatedEntity,
        outer: AnimatedEntity,
    ) -> (EntityId, EntityId) {
        let inner_id = self.insert(inner);
        let outer_id = self.insert(outer);
        if let Some(e) = self.get_mut(inner_id) {
            e.pairing = Some(Pairing {
                role: PairRole::Inner,
                partner: Some(outer_id),
            });
        }
        if let Some(e) = self.get_mut(outer_id) {
            e.pairing = Some(Pairing {
                role: PairRole::Outer,
                partner: Some(inner_id),
            });
        }
        (inner_id, outer_id)
    }

    pub fn get(&self, id: EntityId) -> Option<&AnimatedEntity> {
        self.slots
            .get(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_ref())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut AnimatedEntity> {
        self.slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.entity.as_mut())
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Remove one entity. A surviving partner keeps its role but loses the
    /// link, which marks it orphaned.
    pub fn remove(&mut self, id: EntityId) -> Option<AnimatedEntity> {
        let slot = self
            .slots
            .get_mut(id.index())
            .filter(|s| s.generation == id.generation)?;
        let entity = slot.entity.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        if let Some(partner) = entity.pairing.and_then(|p| p.partner) {
            if let Some(Pairing { partner: link, .. }) =
                self.get_mut(partner).and_then(|e| e.pairing.as_mut())
            {
                *link = None;
            }
        }
        Some(entity)
    }

    /// Remove an entity together with its partner, if it has one.
    pub fn remove_pair(&mut self, id: EntityId) {
        let partner = self
            .get(id)
            .and_then(|e| e.pairing)
            .and_then(|p| p.partner);
        self.remove(id);
        if let Some(partner) = partner {
            self.remove(partner);
        }
    }

    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.entity.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &AnimatedEntity)> {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.entity.as_ref().map(|e| {
                (
                    EntityId {
                        index: i as u32,
                        generation: s.generation,
                    },
                    e,
                )
            })
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut AnimatedEntity)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, s)| {
            let generation = s.generation;
            s.entity.as_mut().map(|e| {
                (
                    EntityId {
                        index: i as u32,
                        generation,
                    },
                    e,
                )
            })
        })
    }
}
