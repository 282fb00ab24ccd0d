//! Time-bounded power-up effects
//!
//! SpeedBoost and SlowEnemies both write `enemy_speed_modifier`. Whichever was
//! applied last owns it, and only the owner's expiry puts it back to 1.0.
//! SpeedBoost alone drives `score_rate_modifier`. The shield flag lives on the
//! [`Player`]; the engine only tracks its deadline.

use serde::{Deserialize, Serialize};

use super::clock::Millis;
use super::state::{Player, PowerUpKind};
use crate::tuning::Tuning;

/// Modifiers read by movement and the score cadence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectState {
    /// Multiplies hazard fall speed
    pub enemy_speed_modifier: f32,
    /// Multiplies the score interval (0.5 = twice as fast)
    pub score_rate_modifier: f32,
}

impl Default for EffectState {
    fn default() -> Self {
        Self {
            enemy_speed_modifier: 1.0,
            score_rate_modifier: 1.0,
        }
    }
}

/// What happened to an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started { expires_at: Millis },
    Ended,
}

/// Result of applying or expiring an effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectChange {
    pub kind: PowerUpKind,
    pub transition: Transition,
    /// Score cadence must be restarted at the new interval
    pub score_rate_changed: bool,
}

#[derive(Debug, Clone)]
pub struct EffectEngine {
    state: EffectState,
    speed_boost_until: Option<Millis>,
    slow_until: Option<Millis>,
    shield_until: Option<Millis>,
    /// Which effect currently owns `enemy_speed_modifier`
    speed_owner: Option<PowerUpKind>,

    speed_boost_ms: Millis,
    slow_ms: Millis,
    shield_ms: Millis,
    boost_enemy_modifier: f32,
    boost_score_rate: f32,
    slow_modifier: f32,
}

impl EffectEngine {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            state: EffectState::default(),
            speed_boost_until: None,
            slow_until: None,
            shield_until: None,
            speed_owner: None,
            speed_boost_ms: tuning.speed_boost_ms,
            slow_ms: tuning.slow_enemies_ms,
            shield_ms: tuning.shield_ms,
            boost_enemy_modifier: tuning.speed_boost_enemy_modifier,
            boost_score_rate: tuning.speed_boost_score_rate,
            slow_modifier: tuning.slow_enemies_modifier,
        }
    }

    /// Current modifiers
    pub fn state(&self) -> EffectState {
        self.state
    }

    /// Deadline of an active effect
    pub fn expires_at(&self, kind: PowerUpKind) -> Option<Millis> {
        match kind {
            PowerUpKind::SpeedBoost => self.speed_boost_until,
            PowerUpKind::SlowEnemies => self.slow_until,
            PowerUpKind::Shield => self.shield_until,
        }
    }

    /// Activate an effect, restarting its window if already active
    pub fn apply(&mut self, kind: PowerUpKind, now: Millis, player: &mut Player) -> EffectChange {
        let old_rate = self.state.score_rate_modifier;
        let expires_at = match kind {
            PowerUpKind::SpeedBoost => {
                self.state.score_rate_modifier = self.boost_score_rate;
                self.state.enemy_speed_modifier = self.boost_enemy_modifier;
                self.speed_owner = Some(kind);
                let until = now + self.speed_boost_ms;
                self.speed_boost_until = Some(until);
                until
            }
            PowerUpKind::SlowEnemies => {
                self.state.enemy_speed_modifier = self.slow_modifier;
                self.speed_owner = Some(kind);
                let until = now + self.slow_ms;
                self.slow_until = Some(until);
                until
            }
            PowerUpKind::Shield => {
                player.shield_active = true;
                let until = now + self.shield_ms;
                self.shield_until = Some(until);
                until
            }
        };
        log::debug!("effect {:?} active until {}", kind, expires_at);

        EffectChange {
            kind,
            transition: Transition::Started { expires_at },
            score_rate_changed: self.state.score_rate_modifier != old_rate,
        }
    }

    /// Revert every effect whose deadline is at or before `now`.
    /// Each expiry is reported exactly once.
    pub fn tick(&mut self, now: Millis, player: &mut Player) -> Vec<EffectChange> {
        let mut changes = Vec::new();

        if self.speed_boost_until.is_some_and(|t| t <= now) {
            self.speed_boost_until = None;
            let old_rate = self.state.score_rate_modifier;
            self.state.score_rate_modifier = 1.0;
            self.release_speed(PowerUpKind::SpeedBoost);
            changes.push(ended(
                PowerUpKind::SpeedBoost,
                old_rate != self.state.score_rate_modifier,
            ));
        }

        if self.slow_until.is_some_and(|t| t <= now) {
            self.slow_until = None;
            self.release_speed(PowerUpKind::SlowEnemies);
            changes.push(ended(PowerUpKind::SlowEnemies, false));
        }

        if self.shield_until.is_some_and(|t| t <= now) {
            self.shield_until = None;
            player.shield_active = false;
            changes.push(ended(PowerUpKind::Shield, false));
        }

        for change in &changes {
            log::debug!("effect {:?} expired at {}", change.kind, now);
        }
        changes
    }

    /// Spend the shield on a hazard hit. Returns false if there was none.
    pub fn consume_shield(&mut self, player: &mut Player) -> bool {
        if !player.shield_active {
            return false;
        }
        player.shield_active = false;
        self.shield_until = None;
        true
    }

    /// Back to defaults with nothing pending
    pub fn reset(&mut self, player: &mut Player) {
        self.state = EffectState::default();
        self.speed_boost_until = None;
        self.slow_until = None;
        self.shield_until = None;
        self.speed_owner = None;
        player.shield_active = false;
    }

    fn release_speed(&mut self, kind: PowerUpKind) {
        if self.speed_owner == Some(kind) {
            self.speed_owner = None;
            self.state.enemy_speed_modifier = 1.0;
        }
    }
}

fn ended(kind: PowerUpKind, score_rate_changed: bool) -> EffectChange {
    EffectChange {
        kind,
        transition: Transition::Ended,
        score_rate_changed,
    }
}
