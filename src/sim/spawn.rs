//! Hazard and power-up spawning
//!
//! The controller owns its cadence: each `try_spawn_*` call yields an entity
//! only once the next due time has been reached, so a duplicate wake-up at
//! the same instant spawns nothing.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::clock::Millis;
use super::state::{Entity, HazardBehavior, PowerUpKind};
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct SpawnController {
    rng: Pcg32,
    next_id: u32,
    next_hazard_at: Millis,
    next_power_up_at: Millis,
    hazard_interval: Millis,
    power_up_interval: Millis,
    x_range: (f32, f32),
    size_range: (f32, f32),
    spawn_y: f32,
    seeker_odds: u32,
    power_up_size: f32,
}

impl SpawnController {
    /// Create a controller whose first hazard is due one tick after `now`
    pub fn new(tuning: &Tuning, seed: u64, now: Millis) -> Self {
        let mut spawner = Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            next_hazard_at: 0,
            next_power_up_at: 0,
            hazard_interval: tuning.tick_interval_ms,
            power_up_interval: tuning.power_up_interval_ms,
            x_range: (
                tuning.spawn_margin,
                tuning.scene_width - tuning.spawn_margin,
            ),
            size_range: (tuning.hazard_min_size, tuning.hazard_max_size),
            spawn_y: tuning.scene_height,
            seeker_odds: tuning.seeker_odds,
            power_up_size: tuning.power_up_size,
        };
        spawner.reset(now);
        spawner
    }

    /// Restart both cadences from `now`. Ids keep counting so they stay unique.
    pub fn reset(&mut self, now: Millis) {
        self.next_hazard_at = now + self.hazard_interval;
        self.next_power_up_at = now + self.power_up_interval;
    }

    pub fn try_spawn_hazard(&mut self, now: Millis) -> Option<Entity> {
        if now < self.next_hazard_at {
            return None;
        }
        self.next_hazard_at = now + self.hazard_interval;

        let x = self.random_x();
        let size = self.rng.random_range(self.size_range.0..=self.size_range.1);
        let behavior = if self.rng.random_range(1..=self.seeker_odds) == 1 {
            HazardBehavior::Seeker
        } else {
            HazardBehavior::Straight
        };

        let id = self.allocate_id();
        log::debug!("spawn hazard {} {:?} at x={:.1} size={:.1}", id, behavior, x, size);
        Some(Entity::hazard(id, Vec2::new(x, self.spawn_y), size, behavior))
    }

    pub fn try_spawn_power_up(&mut self, now: Millis) -> Option<Entity> {
        if now < self.next_power_up_at {
            return None;
        }
        self.next_power_up_at = now + self.power_up_interval;

        let x = self.random_x();
        let kind = match self.rng.random_range(1..=3) {
            1 => PowerUpKind::SpeedBoost,
            2 => PowerUpKind::SlowEnemies,
            _ => PowerUpKind::Shield,
        };

        let id = self.allocate_id();
        log::debug!("spawn power-up {} {:?} at x={:.1}", id, kind, x);
        Some(Entity::power_up(
            id,
            Vec2::new(x, self.spawn_y),
            self.power_up_size,
            kind,
        ))
    }

    fn random_x(&mut self) -> f32 {
        self.rng.random_range(self.x_range.0..=self.x_range.1)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
