//! Per-tick entity movement
//!
//! Fall speeds are recomputed from the effects snapshot on every call, so a
//! modifier change reaches every live hazard on the very next tick.

use super::effects::EffectState;
use super::state::{Entity, EntityKind, HazardBehavior, Player};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct MovementController {
    /// Units per second at modifier 1.0
    hazard_fall_speed: f32,
    power_up_fall_speed: f32,
    seeker_step: f32,
}

impl MovementController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            hazard_fall_speed: tuning.scene_height / tuning.hazard_fall_secs,
            power_up_fall_speed: tuning.scene_height / tuning.power_up_fall_secs,
            seeker_step: tuning.seeker_step,
        }
    }

    /// Move every entity by one tick of `dt` seconds.
    /// Returns the ids of entities that left the screen; the caller evicts them.
    pub fn advance(
        &self,
        entities: &mut [Entity],
        player: &Player,
        effects: &EffectState,
        dt: f32,
    ) -> Vec<u32> {
        let hazard_drop = self.hazard_fall_speed * effects.enemy_speed_modifier * dt;
        let power_up_drop = self.power_up_fall_speed * dt;

        let mut culled = Vec::new();
        for entity in entities.iter_mut() {
            entity.prev_pos = entity.pos;
            match entity.kind {
                EntityKind::Hazard { behavior } => {
                    if behavior == HazardBehavior::Seeker {
                        entity.pos.x = step_toward(entity.pos.x, player.pos.x, self.seeker_step);
                    }
                    entity.pos.y -= hazard_drop;
                }
                EntityKind::PowerUp { .. } => {
                    entity.pos.y -= power_up_drop;
                }
            }
            if entity.is_off_screen() {
                culled.push(entity.id);
            }
        }
        culled
    }
}

/// Move `from` toward `to` by at most `step`
#[inline]
pub fn step_toward(from: f32, to: f32, step: f32) -> f32 {
    let delta = to - from;
    if delta.abs() <= step {
        to
    } else {
        from + step * delta.signum()
    }
}
