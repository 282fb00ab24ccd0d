//! Data-driven game balance
//!
//! Every field defaults to the matching value in [`crate::consts`], so a
//! tuning file only needs the keys it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Balance and timing values for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scene ===
    pub scene_width: f32,
    pub scene_height: f32,
    pub spawn_margin: f32,

    // === Cadences (ms) ===
    pub tick_interval_ms: u64,
    pub score_interval_ms: u64,
    pub power_up_interval_ms: u64,

    // === Player ===
    pub player_size: f32,
    pub player_y: f32,

    // === Hazards ===
    pub hazard_min_size: f32,
    pub hazard_max_size: f32,
    pub hazard_fall_secs: f32,
    pub seeker_step: f32,
    pub seeker_odds: u32,

    // === Power-ups ===
    pub power_up_size: f32,
    pub power_up_fall_secs: f32,

    // === Effects ===
    pub speed_boost_ms: u64,
    pub slow_enemies_ms: u64,
    pub shield_ms: u64,
    pub speed_boost_enemy_modifier: f32,
    pub speed_boost_score_rate: f32,
    pub slow_enemies_modifier: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,
            spawn_margin: SPAWN_MARGIN,

            tick_interval_ms: TICK_INTERVAL_MS,
            score_interval_ms: SCORE_INTERVAL_MS,
            power_up_interval_ms: POWER_UP_INTERVAL_MS,

            player_size: PLAYER_SIZE,
            player_y: PLAYER_Y,

            hazard_min_size: HAZARD_MIN_SIZE,
            hazard_max_size: HAZARD_MAX_SIZE,
            hazard_fall_secs: HAZARD_FALL_SECS,
            seeker_step: SEEKER_STEP,
            seeker_odds: SEEKER_ODDS,

            power_up_size: POWER_UP_SIZE,
            power_up_fall_secs: POWER_UP_FALL_SECS,

            speed_boost_ms: SPEED_BOOST_MS,
            slow_enemies_ms: SLOW_ENEMIES_MS,
            shield_ms: SHIELD_MS,
            speed_boost_enemy_modifier: SPEED_BOOST_ENEMY_MODIFIER,
            speed_boost_score_rate: SPEED_BOOST_SCORE_RATE,
            slow_enemies_modifier: SLOW_ENEMIES_MODIFIER,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)
            .map_err(|e| GameError::invalid_tuning(format!("malformed tuning document: {e}")))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> GameResult<()> {
        if self.spawn_margin.is_nan() || self.spawn_margin < 0.0 {
            return Err(GameError::invalid_tuning(format!(
                "spawn margin {} must not be negative",
                self.spawn_margin
            )));
        }
        if self.scene_width <= 2.0 * self.spawn_margin {
            return Err(GameError::invalid_tuning(format!(
                "scene width {} leaves no spawn range with margin {}",
                self.scene_width, self.spawn_margin
            )));
        }
        if self.player_size.is_nan() || self.player_size <= 0.0 {
            return Err(GameError::invalid_tuning("player size must be positive"));
        }
        if self.power_up_size.is_nan() || self.power_up_size <= 0.0 {
            return Err(GameError::invalid_tuning("power-up size must be positive"));
        }
        if self.scene_width < self.player_size || self.scene_height <= 0.0 {
            return Err(GameError::invalid_tuning("scene smaller than the player"));
        }
        if self.tick_interval_ms == 0 || self.score_interval_ms == 0 || self.power_up_interval_ms == 0
        {
            return Err(GameError::invalid_tuning("cadence intervals must be non-zero"));
        }
        if self.hazard_min_size <= 0.0 || self.hazard_min_size > self.hazard_max_size {
            return Err(GameError::invalid_tuning(format!(
                "hazard size range [{}, {}] is empty",
                self.hazard_min_size, self.hazard_max_size
            )));
        }
        if self.hazard_fall_secs <= 0.0 || self.power_up_fall_secs <= 0.0 {
            return Err(GameError::invalid_tuning("fall times must be positive"));
        }
        if self.seeker_step.is_nan() || self.seeker_step < 0.0 {
            return Err(GameError::invalid_tuning(format!(
                "seeker step {} must not be negative",
                self.seeker_step
            )));
        }
        if self.seeker_odds == 0 {
            return Err(GameError::invalid_tuning("seeker odds must be at least 1"));
        }
        let modifiers = [
            self.speed_boost_enemy_modifier,
            self.speed_boost_score_rate,
            self.slow_enemies_modifier,
        ];
        if modifiers.iter().any(|m| !m.is_finite() || *m <= 0.0) {
            return Err(GameError::invalid_tuning("effect modifiers must be positive"));
        }
        Ok(())
    }

    pub fn tick_secs(&self) -> f32 {
        self.tick_interval_ms as f32 / 1000.0
    }

    pub fn player_half_width(&self) -> f32 {
        self.player_size / 2.0
    }

    /// Score interval for a given score rate modifier
    pub fn score_interval_for(&self, score_rate_modifier: f32) -> u64 {
        ((self.score_interval_ms as f32 * score_rate_modifier).round() as u64).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "scene_width": 500.0, "seeker_odds": 4 }"#).unwrap();
        assert_eq!(tuning.scene_width, 500.0);
        assert_eq!(tuning.seeker_odds, 4);
        assert_eq!(tuning.tick_interval_ms, TICK_INTERVAL_MS);
    }

    #[test]
    fn test_narrow_scene_rejected() {
        let tuning = Tuning {
            scene_width: 90.0,
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(GameError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let result = Tuning::from_json(r#"{ "tick_interval_ms": 0 }"#);
        assert!(matches!(result, Err(GameError::InvalidTuning { .. })));
    }

    #[test]
    fn test_malformed_json_is_invalid_tuning() {
        let result = Tuning::from_json("{ not json");
        assert!(matches!(result, Err(GameError::InvalidTuning { .. })));
        let result = Tuning::from_json(r#"{ "seeker_odds": "often" }"#);
        assert!(matches!(result, Err(GameError::InvalidTuning { .. })));
    }

    fn assert_rejected(tuning: Tuning) {
        assert!(matches!(
            tuning.validate(),
            Err(GameError::InvalidTuning { .. })
        ));
    }

    #[test]
    fn test_negative_seeker_step_rejected() {
        assert_rejected(Tuning {
            seeker_step: -5.0,
            ..Default::default()
        });
        // Zero just disables homing
        let still = Tuning {
            seeker_step: 0.0,
            ..Default::default()
        };
        assert!(still.validate().is_ok());
    }

    #[test]
    fn test_non_positive_player_size_rejected() {
        assert_rejected(Tuning {
            player_size: 0.0,
            ..Default::default()
        });
        assert_rejected(Tuning {
            player_size: -40.0,
            ..Default::default()
        });
    }

    #[test]
    fn test_non_positive_power_up_size_rejected() {
        assert_rejected(Tuning {
            power_up_size: 0.0,
            ..Default::default()
        });
        assert_rejected(Tuning {
            power_up_size: f32::NAN,
            ..Default::default()
        });
    }

    #[test]
    fn test_negative_spawn_margin_rejected() {
        assert_rejected(Tuning {
            spawn_margin: -1.0,
            ..Default::default()
        });
    }

    #[test]
    fn test_score_interval_scales() {
        let tuning = Tuning::default();
        assert_eq!(tuning.score_interval_for(1.0), 1_000);
        assert_eq!(tuning.score_interval_for(0.5), 500);
    }
}
