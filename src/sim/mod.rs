//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `advance_to`, never read from the wall clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod collision;
pub mod effects;
pub mod game_loop;
pub mod movement;
pub mod scheduler;
pub mod spawn;
pub mod state;

pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use collision::{CollisionEvent, CollisionResolver, Contact};
pub use effects::{EffectChange, EffectEngine, EffectState, Transition};
pub use game_loop::{GameLoop, TimerKind};
pub use movement::MovementController;
pub use scheduler::{Fired, Scheduler, TimerId};
pub use spawn::SpawnController;
pub use state::{
    Category, Entity, EntityKind, GameEvent, GamePhase, GameState, HazardBehavior, Player,
    PowerUpKind, Snapshot,
};
