//! Game state and core simulation types

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::highscores::HighScores;
use crate::settings::ShipColor;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, waiting for restart or exit
    GameOver,
    /// Returned to menu; the core does nothing further
    Exited,
}

/// Broad entity category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Player,
    Hazard,
    PowerUp,
}

/// How a hazard moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardBehavior {
    /// Falls straight down
    Straight,
    /// Drifts toward the player's x while falling
    Seeker,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    SpeedBoost,
    SlowEnemies,
    Shield,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::SlowEnemies,
        PowerUpKind::Shield,
    ];
}

/// Variant data for a falling entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Hazard { behavior: HazardBehavior },
    PowerUp { kind: PowerUpKind },
}

/// A falling entity (hazard or power-up)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Position before the most recent movement step
    pub prev_pos: Vec2,
    pub size: f32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn hazard(id: u32, pos: Vec2, size: f32, behavior: HazardBehavior) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            size,
            kind: EntityKind::Hazard { behavior },
        }
    }

    pub fn power_up(id: u32, pos: Vec2, size: f32, kind: PowerUpKind) -> Self {
        Self {
            id,
            pos,
            prev_pos: pos,
            size,
            kind: EntityKind::PowerUp { kind },
        }
    }

    pub fn category(&self) -> Category {
        match self.kind {
            EntityKind::Hazard { .. } => Category::Hazard,
            EntityKind::PowerUp { .. } => Category::PowerUp,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Below the bottom edge by at least its own size
    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -self.size
    }
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub shield_active: bool,
}

impl Player {
    /// Player centered at the bottom of the scene
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(tuning.scene_width / 2.0, tuning.player_y),
            size: tuning.player_size,
            shield_active: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Follow the pointer horizontally, keeping the ship on screen
    pub fn set_x(&mut self, x: f32, scene_width: f32) {
        let half = self.size / 2.0;
        self.pos.x = x.clamp(half, (scene_width - half).max(half));
    }
}

/// Mutable world owned by the game loop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Whole seconds survived
    pub score: u32,
    pub phase: GamePhase,
    /// Gameplay ticks since the run started
    pub elapsed_ticks: u64,
    pub player: Player,
    /// Live entities (sorted by id for determinism)
    pub entities: Vec<Entity>,
}

impl GameState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            phase: GamePhase::Playing,
            elapsed_ticks: 0,
            player: Player::new(tuning),
            entities: Vec::new(),
        }
    }

    /// Insert a spawned entity, keeping id order
    pub fn insert(&mut self, entity: Entity) {
        let pos = self.entities.partition_point(|e| e.id < entity.id);
        self.entities.insert(pos, entity);
    }

    /// Remove an entity by id, returning it if it was live
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let idx = self.entities.binary_search_by_key(&id, |e| e.id).ok()?;
        Some(self.entities.remove(idx))
    }

    /// Remove every entity whose id is listed
    pub fn evict(&mut self, ids: &[u32]) {
        if !ids.is_empty() {
            self.entities.retain(|e| !ids.contains(&e.id));
        }
    }

    pub fn count(&self, category: Category) -> usize {
        self.entities
            .iter()
            .filter(|e| e.category() == category)
            .count()
    }
}

/// Notifications for the presentation layer, drained after each advance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A gameplay tick finished (entities moved, collisions resolved)
    Ticked { tick: u64 },
    Spawned { id: u32, category: Category },
    ScoreChanged { score: u32 },
    /// Power-up picked up; collection flash at `at`
    Collected { id: u32, kind: PowerUpKind, at: Vec2 },
    ShieldAbsorbed { hazard_id: u32, at: Vec2 },
    EffectStarted { kind: PowerUpKind, expires_at: u64 },
    EffectEnded { kind: PowerUpKind },
    /// Explosion visual at `at`
    Explosion { at: Vec2 },
    GameOver {
        final_score: u32,
        rank: Option<usize>,
        high_scores: HighScores,
    },
    Restarted,
    /// Core has torn down; host should return to its menu
    Exited,
}

/// Pull-style view of the world for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub score: u32,
    pub phase: GamePhase,
    pub player: Vec2,
    pub shield_active: bool,
    pub ship_color: ShipColor,
    pub enemy_speed_modifier: f32,
    pub entities: Vec<Entity>,
}
