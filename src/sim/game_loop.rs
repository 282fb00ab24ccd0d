//! Game loop state machine
//!
//! Owns the world, the timer queue and the collaborators. Everything happens
//! inside [`GameLoop::advance_to`]: due timers are popped in time order and
//! handled synchronously, so the world is only ever touched by one handler at
//! a time.
//!
//! Cadences:
//! - gameplay tick (spawn -> move -> collide), repeating
//! - score tick, repeating at `score_interval * score_rate_modifier`
//! - power-up spawn, repeating
//! - one-shot expiry per active effect

use super::clock::Millis;
use super::collision::{CollisionEvent, CollisionResolver};
use super::effects::{EffectChange, EffectEngine, EffectState, Transition};
use super::movement::MovementController;
use super::scheduler::{Fired, Scheduler, TimerId};
use super::spawn::SpawnController;
use super::state::{Category, GameEvent, GamePhase, GameState, Player, PowerUpKind, Snapshot};
use crate::audio::{AudioCue, AudioSink};
use crate::error::GameResult;
use crate::highscores::HighScores;
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Timer payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    GameTick,
    ScoreTick,
    PowerUpSpawn,
    EffectExpiry(PowerUpKind),
}

/// Live timer handles, so individual cadences can be restarted
#[derive(Debug, Clone, Default)]
struct Cadences {
    game_tick: Option<TimerId>,
    score_tick: Option<TimerId>,
    power_up_spawn: Option<TimerId>,
    speed_boost_expiry: Option<TimerId>,
    slow_expiry: Option<TimerId>,
    shield_expiry: Option<TimerId>,
}

impl Cadences {
    fn expiry_slot(&mut self, kind: PowerUpKind) -> &mut Option<TimerId> {
        match kind {
            PowerUpKind::SpeedBoost => &mut self.speed_boost_expiry,
            PowerUpKind::SlowEnemies => &mut self.slow_expiry,
            PowerUpKind::Shield => &mut self.shield_expiry,
        }
    }
}

pub struct GameLoop<A: AudioSink, S: ScoreStore> {
    tuning: Tuning,
    state: GameState,
    spawner: SpawnController,
    movement: MovementController,
    collisions: CollisionResolver,
    effects: EffectEngine,
    scheduler: Scheduler<TimerKind>,
    cadences: Cadences,
    high_scores: HighScores,
    settings: Settings,
    audio: A,
    store: S,
    now: Millis,
    events: Vec<GameEvent>,
}

impl<A: AudioSink, S: ScoreStore> GameLoop<A, S> {
    /// Start a run at `now`.
    ///
    /// Invalid tuning is rejected here. Settings and high scores that fail to
    /// load fall back to defaults.
    pub fn new(tuning: Tuning, seed: u64, now: Millis, mut audio: A, mut store: S) -> GameResult<Self> {
        tuning.validate()?;

        let settings = match store.load_settings() {
            Ok(Some(settings)) => settings,
            Ok(None) => Settings::default(),
            Err(e) => {
                log::error!("Failed to load settings: {}. Using defaults.", e);
                Settings::default()
            }
        };
        let high_scores = store.load_high_scores().unwrap_or_else(|e| {
            log::error!("Failed to load high scores: {}. Starting fresh.", e);
            HighScores::new()
        });

        let (music, sfx) = settings.clamped_volumes();
        audio.set_volumes(music, sfx);

        let mut game = Self {
            state: GameState::new(&tuning),
            spawner: SpawnController::new(&tuning, seed, now),
            movement: MovementController::new(&tuning),
            collisions: CollisionResolver::new(),
            effects: EffectEngine::new(&tuning),
            scheduler: Scheduler::new(),
            cadences: Cadences::default(),
            high_scores,
            settings,
            audio,
            store,
            now,
            events: Vec::new(),
            tuning,
        };
        log::info!(
            "Starting run (seed {}, ship {})",
            seed,
            game.settings.ship_color.as_str()
        );
        game.begin_run();
        Ok(game)
    }

    // === Queries ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn effects(&self) -> EffectState {
        self.effects.state()
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Number of live timers
    pub fn pending_timers(&self) -> usize {
        self.scheduler.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            score: self.state.score,
            phase: self.state.phase,
            player: self.state.player.pos,
            shield_active: self.state.player.shield_active,
            ship_color: self.settings.ship_color,
            enemy_speed_modifier: self.effects.state().enemy_speed_modifier,
            entities: self.state.entities.clone(),
        }
    }

    // === Input ===

    /// Horizontal pointer position; applied immediately while playing
    pub fn set_pointer_x(&mut self, x: f32) {
        if !x.is_finite() {
            log::warn!("Ignoring non-finite pointer x {}", x);
            return;
        }
        if self.state.phase == GamePhase::Playing {
            self.state.player.set_x(x, self.tuning.scene_width);
        }
    }

    // === Driving ===

    /// Run every timer due up to `now` and return the resulting events
    pub fn advance_to(&mut self, now: Millis) -> Vec<GameEvent> {
        while let Some(fired) = self.scheduler.pop_due(now) {
            self.now = fired.at;
            self.on_timer(fired);
        }
        self.now = self.now.max(now);
        std::mem::take(&mut self.events)
    }

    /// GameOver -> Playing. Returns false in any other phase.
    pub fn restart(&mut self) -> bool {
        if self.state.phase != GamePhase::GameOver {
            log::warn!("Ignoring restart in phase {:?}", self.state.phase);
            return false;
        }
        self.clear_world();
        self.state.score = 0;
        self.state.elapsed_ticks = 0;
        self.state.player = Player::new(&self.tuning);
        self.state.phase = GamePhase::Playing;

        log::info!("Restarting run");
        self.events.push(GameEvent::Restarted);
        self.events.push(GameEvent::ScoreChanged { score: 0 });
        self.begin_run();
        true
    }

    /// Tear everything down and hand control back to the host menu
    pub fn exit_to_menu(&mut self) -> bool {
        if self.state.phase == GamePhase::Exited {
            return false;
        }
        let was_playing = self.state.phase == GamePhase::Playing;
        self.clear_world();
        self.state.phase = GamePhase::Exited;
        if was_playing {
            self.cue(AudioCue::MusicStop);
        }

        log::info!("Exited to menu");
        self.events.push(GameEvent::Exited);
        true
    }

    // === Internals ===

    fn begin_run(&mut self) {
        self.scheduler.cancel_all();
        self.cadences = Cadences::default();

        let now = self.now;
        self.spawner.reset(now);
        self.cadences.game_tick = Some(self.scheduler.schedule_repeating(
            now + self.tuning.tick_interval_ms,
            self.tuning.tick_interval_ms,
            TimerKind::GameTick,
        ));
        self.cadences.power_up_spawn = Some(self.scheduler.schedule_repeating(
            now + self.tuning.power_up_interval_ms,
            self.tuning.power_up_interval_ms,
            TimerKind::PowerUpSpawn,
        ));
        self.restart_score_cadence();

        self.cue(AudioCue::MusicStart);
    }

    /// Cancel every timer and drop all entities and effects
    fn clear_world(&mut self) {
        self.scheduler.cancel_all();
        self.cadences = Cadences::default();
        self.state.entities.clear();
        self.effects.reset(&mut self.state.player);
    }

    /// Start the score cadence over at the current rate; the score is untouched
    fn restart_score_cadence(&mut self) {
        if let Some(id) = self.cadences.score_tick.take() {
            self.scheduler.cancel(id);
        }
        let interval = self
            .tuning
            .score_interval_for(self.effects.state().score_rate_modifier);
        let timer = self.scheduler.schedule_repeating(
            self.now + interval,
            interval,
            TimerKind::ScoreTick,
        );
        self.cadences.score_tick = Some(timer);
        log::debug!(
            "score cadence every {} ms, next at {:?}",
            interval,
            self.scheduler.due(timer)
        );
    }

    fn on_timer(&mut self, fired: Fired<TimerKind>) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        match fired.kind {
            TimerKind::GameTick => self.game_tick(),
            TimerKind::ScoreTick => {
                self.state.score += 1;
                self.events.push(GameEvent::ScoreChanged {
                    score: self.state.score,
                });
            }
            TimerKind::PowerUpSpawn => {
                if let Some(power_up) = self.spawner.try_spawn_power_up(self.now) {
                    self.events.push(GameEvent::Spawned {
                        id: power_up.id,
                        category: Category::PowerUp,
                    });
                    self.state.insert(power_up);
                }
            }
            TimerKind::EffectExpiry(kind) => {
                let slot = self.cadences.expiry_slot(kind);
                if *slot == Some(fired.id) {
                    *slot = None;
                }
                let changes = self.effects.tick(self.now, &mut self.state.player);
                self.handle_effect_changes(changes);
            }
        }
    }

    /// Spawn, then move, then collide
    fn game_tick(&mut self) {
        self.state.elapsed_ticks += 1;

        if let Some(hazard) = self.spawner.try_spawn_hazard(self.now) {
            self.events.push(GameEvent::Spawned {
                id: hazard.id,
                category: Category::Hazard,
            });
            self.state.insert(hazard);
        }

        let effects = self.effects.state();
        let culled = self.movement.advance(
            &mut self.state.entities,
            &self.state.player,
            &effects,
            self.tuning.tick_secs(),
        );

        // Culled entities still get their last segment swept
        let contacts = self.collisions.resolve(&self.state.player, &self.state.entities);
        let mut collected = Vec::new();
        let mut hit = false;
        for contact in contacts {
            match contact {
                CollisionEvent::Collected { id, kind } => {
                    self.state.remove(id);
                    self.events.push(GameEvent::Collected {
                        id,
                        kind,
                        at: self.state.player.pos,
                    });
                    collected.push(kind);
                }
                CollisionEvent::ShieldAbsorbed { id, at } => {
                    self.state.remove(id);
                    self.effects.consume_shield(&mut self.state.player);
                    if let Some(timer) = self.cadences.shield_expiry.take() {
                        self.scheduler.cancel(timer);
                    }
                    log::info!("Shield absorbed hazard {}", id);
                    self.events.push(GameEvent::ShieldAbsorbed { hazard_id: id, at });
                }
                CollisionEvent::PlayerHit { id, contact } => {
                    log::info!("Player hit by hazard {} ({:?})", id, contact);
                    hit = true;
                }
            }
        }
        self.state.evict(&culled);

        self.events.push(GameEvent::Ticked {
            tick: self.state.elapsed_ticks,
        });

        if hit {
            self.game_over();
            return;
        }
        // Collected effects start after hazards were judged
        for kind in collected {
            self.apply_power_up(kind);
        }
    }

    fn apply_power_up(&mut self, kind: PowerUpKind) {
        let change = self.effects.apply(kind, self.now, &mut self.state.player);

        let cue = match kind {
            PowerUpKind::SpeedBoost => AudioCue::SpeedBoost,
            PowerUpKind::SlowEnemies => AudioCue::SlowPowerUp,
            PowerUpKind::Shield => AudioCue::ShieldPowerUp,
        };
        self.cue(cue);

        if let Transition::Started { expires_at } = change.transition {
            if let Some(old) = self.cadences.expiry_slot(kind).take() {
                self.scheduler.cancel(old);
            }
            let timer = self
                .scheduler
                .schedule_once(expires_at, TimerKind::EffectExpiry(kind));
            *self.cadences.expiry_slot(kind) = Some(timer);
        }
        self.handle_effect_changes(vec![change]);
    }

    fn handle_effect_changes(&mut self, changes: Vec<EffectChange>) {
        let mut restart_score = false;
        for change in changes {
            restart_score |= change.score_rate_changed;
            match change.transition {
                Transition::Started { expires_at } => {
                    log::info!("{:?} active until {}", change.kind, expires_at);
                    self.events.push(GameEvent::EffectStarted {
                        kind: change.kind,
                        expires_at,
                    });
                }
                Transition::Ended => {
                    log::info!("{:?} ended", change.kind);
                    self.events.push(GameEvent::EffectEnded { kind: change.kind });
                }
            }
        }
        if restart_score {
            self.restart_score_cadence();
        }
    }

    /// Playing -> GameOver
    fn game_over(&mut self) {
        self.state.phase = GamePhase::GameOver;
        self.scheduler.cancel_all();
        self.cadences = Cadences::default();

        let at = self.state.player.pos;
        self.events.push(GameEvent::Explosion { at });
        self.cue(AudioCue::Explosion);
        self.cue(AudioCue::GameOver);
        self.cue(AudioCue::MusicStop);

        let final_score = self.state.score;
        if self.high_scores.qualifies(final_score) {
            log::info!("{} seconds makes the high score board", final_score);
        }
        let rank = self.high_scores.add_score(final_score);
        if let Err(e) = self.store.save_high_scores(&self.high_scores) {
            log::error!("Failed to save high scores: {}", e);
        }

        log::info!("Game over: {} seconds (rank {:?})", final_score, rank);
        self.events.push(GameEvent::GameOver {
            final_score,
            rank,
            high_scores: self.high_scores.clone(),
        });
    }

    fn cue(&mut self, cue: AudioCue) {
        if let Err(e) = self.audio.play(cue) {
            log::warn!("Audio cue {:?} failed: {}", cue, e);
        }
    }
}
