//! Bullet Storm - An arcade survival game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, movement, collisions, effects, game loop)
//! - `audio`: Audio collaborator interface (cues only, playback lives in the host)
//! - `persistence`: Settings and high score storage
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use highscores::HighScores;
pub use settings::{Settings, ShipColor};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Gameplay tick (spawn, move, collide) in milliseconds
    pub const TICK_INTERVAL_MS: u64 = 300;
    /// Base score interval, scaled by the score rate modifier
    pub const SCORE_INTERVAL_MS: u64 = 1_000;
    /// Power-up spawn interval
    pub const POWER_UP_INTERVAL_MS: u64 = 20_000;

    /// Nominal scene dimensions
    pub const SCENE_WIDTH: f32 = 390.0;
    pub const SCENE_HEIGHT: f32 = 844.0;
    /// Spawn x range is [margin, width - margin]
    pub const SPAWN_MARGIN: f32 = 50.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_Y: f32 = 120.0;

    /// Hazard defaults
    pub const HAZARD_MIN_SIZE: f32 = 20.0;
    pub const HAZARD_MAX_SIZE: f32 = 35.0;
    /// Seconds for a hazard to fall the full scene height at modifier 1.0
    pub const HAZARD_FALL_SECS: f32 = 3.0;
    /// Horizontal homing step per tick
    pub const SEEKER_STEP: f32 = 5.0;
    /// One in N hazards is a seeker
    pub const SEEKER_ODDS: u32 = 10;

    /// Power-up defaults
    pub const POWER_UP_SIZE: f32 = 30.0;
    pub const POWER_UP_FALL_SECS: f32 = 4.0;

    /// Effect durations
    pub const SPEED_BOOST_MS: u64 = 5_000;
    pub const SLOW_ENEMIES_MS: u64 = 5_000;
    pub const SHIELD_MS: u64 = 10_000;

    /// Effect magnitudes
    pub const SPEED_BOOST_ENEMY_MODIFIER: f32 = 2.0;
    pub const SPEED_BOOST_SCORE_RATE: f32 = 0.5;
    pub const SLOW_ENEMIES_MODIFIER: f32 = 0.5;

    /// Leaderboard size
    pub const MAX_HIGH_SCORES: usize = 5;
}

/// Distance from point `p` to the segment `a..b`
#[inline]
pub fn segment_point_distance(a: glam::Vec2, b: glam::Vec2, p: glam::Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}
