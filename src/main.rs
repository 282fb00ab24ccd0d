//! Bullet Storm entry point
//!
//! Native builds run a headless session: an autopilot steers the ship, events
//! are logged, and the final board is printed when the run ends.
//!
//! Environment:
//! - `BULLET_STORM_TUNING`: path to a JSON tuning file
//! - `BULLET_STORM_DATA`: directory for settings and high scores

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;
    use std::time::Duration;

    use bullet_storm::audio::LogAudio;
    use bullet_storm::persistence::{JsonFileStore, MemoryStore, ScoreStore};
    use bullet_storm::sim::{
        Category, Clock, GameEvent, GameLoop, GamePhase, ManualClock, Millis, Snapshot,
        SystemClock,
    };
    use bullet_storm::{GameResult, ShipColor, Tuning};
    use clap::Parser;
    use directories::ProjectDirs;

    /// Wall-clock step between frames
    const FRAME_MS: Millis = 16;
    /// Hazards this far above the ship are worth dodging
    const LOOKAHEAD: f32 = 260.0;
    /// Data directory when no platform directory can be resolved
    const FALLBACK_DATA_DIR: &str = "bullet-storm-data";

    #[derive(Parser, Debug)]
    #[command(name = "bullet-storm")]
    #[command(about = "Headless Bullet Storm run steered by a dodging autopilot")]
    pub struct Cli {
        /// RNG seed (defaults to the current time)
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many seconds of game time
        #[arg(long, default_value_t = 120)]
        seconds: u64,
        /// Save this ship color before the run
        #[arg(long, value_parser = parse_ship_color)]
        ship: Option<ShipColor>,
        /// Follow the wall clock instead of fast-forwarding
        #[arg(long)]
        realtime: bool,
        #[arg(long)]
        mute: bool,
        /// Keep settings and scores in memory only
        #[arg(long)]
        ephemeral: bool,
        /// Directory holding the `.mp3` sound files
        #[arg(long)]
        assets: Option<PathBuf>,
    }

    fn parse_ship_color(s: &str) -> Result<ShipColor, String> {
        s.parse()
    }

    fn default_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0x5eed)
    }

    fn load_tuning() -> GameResult<Tuning> {
        match std::env::var_os("BULLET_STORM_TUNING") {
            Some(path) => {
                let json = std::fs::read_to_string(&path)?;
                log::info!("Loaded tuning from {}", PathBuf::from(path).display());
                Tuning::from_json(&json)
            }
            None => Ok(Tuning::default()),
        }
    }

    /// `BULLET_STORM_DATA`, else the platform data dir, else a local folder
    fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os("BULLET_STORM_DATA") {
            return PathBuf::from(dir);
        }
        if let Some(proj_dirs) = ProjectDirs::from("com", "bullet-storm", "BulletStorm") {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(FALLBACK_DATA_DIR)
        }
    }

    pub fn run(cli: Cli) -> GameResult<()> {
        let tuning = load_tuning()?;
        if cli.ephemeral {
            session(tuning, cli, MemoryStore::new())
        } else {
            let store = JsonFileStore::new(data_dir());
            log::info!("Using data directory {}", store.dir().display());
            session(tuning, cli, store)
        }
    }

    fn session<S: ScoreStore>(tuning: Tuning, cli: Cli, mut store: S) -> GameResult<()> {
        if let Some(color) = cli.ship {
            let mut settings = match store.load_settings() {
                Ok(settings) => settings.unwrap_or_default(),
                Err(e) => {
                    log::error!("Failed to load settings: {}. Using defaults.", e);
                    Default::default()
                }
            };
            settings.ship_color = color;
            if let Err(e) = store.save_settings(&settings) {
                log::warn!("Could not save ship color: {}", e);
            }
        }

        let mut audio = LogAudio::new();
        if let Some(dir) = &cli.assets {
            audio = audio.with_asset_dir(dir);
        }
        audio.set_muted(cli.mute);

        let mut manual = ManualClock::new(0);
        let system = SystemClock::new();
        let start = if cli.realtime { system.now() } else { manual.now() };

        let seed = cli.seed.unwrap_or_else(default_seed);
        let mut game = GameLoop::new(tuning, seed, start, audio, store)?;
        log::info!(
            "Bullet Storm (headless) seed {}, ship {}",
            seed,
            game.settings().ship_color.texture_key()
        );

        let deadline = start + cli.seconds * 1_000;
        loop {
            let now = if cli.realtime {
                std::thread::sleep(Duration::from_millis(FRAME_MS));
                system.now()
            } else {
                manual.advance(FRAME_MS)
            };

            let snapshot = game.snapshot();
            game.set_pointer_x(autopilot_x(&snapshot, game.tuning()));

            for event in game.advance_to(now) {
                report(&event);
            }

            if game.phase() == GamePhase::GameOver || now >= deadline {
                break;
            }
        }

        let snapshot = game.snapshot();
        println!("Final score: {}", game.score());
        println!("Best: {:?}", game.high_scores().top_score());
        println!("High scores: {:?}", game.high_scores().scores());
        println!(
            "Hazards on screen: {}",
            game.state().count(Category::Hazard)
        );
        println!(
            "{}",
            serde_json::to_string_pretty(&snapshot).unwrap_or_default()
        );
        log::debug!("music playing at exit: {}", game.audio().music_playing());

        game.exit_to_menu();
        Ok(())
    }

    fn report(event: &GameEvent) {
        match event {
            GameEvent::Ticked { .. } | GameEvent::ScoreChanged { .. } => {
                log::trace!("{:?}", event)
            }
            GameEvent::Spawned { .. } => log::debug!("{:?}", event),
            _ => log::info!("{:?}", event),
        }
    }

    /// Pick the x furthest from every hazard about to reach the ship,
    /// preferring to stay close to the current position and to pick up
    /// power-ups when nothing threatens.
    fn autopilot_x(snapshot: &Snapshot, tuning: &Tuning) -> f32 {
        let ship = snapshot.player;
        let half = tuning.player_half_width();
        let threats: Vec<f32> = snapshot
            .entities
            .iter()
            .filter(|e| e.category() == Category::Hazard)
            .filter(|e| e.pos.y > ship.y - half && e.pos.y < ship.y + LOOKAHEAD)
            .map(|e| e.pos.x)
            .collect();

        if threats.is_empty() {
            let target = snapshot
                .entities
                .iter()
                .filter(|e| e.category() == Category::PowerUp && e.pos.y < ship.y + LOOKAHEAD)
                .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
            return target.map_or(ship.x, |p| p.pos.x);
        }

        let mut best = (ship.x, f32::MIN);
        let mut x = half;
        while x <= tuning.scene_width - half {
            let clearance = threats
                .iter()
                .map(|t| (t - x).abs())
                .fold(f32::MAX, f32::min);
            let score = clearance - 0.05 * (x - ship.x).abs();
            if score > best.1 {
                best = (x, score);
            }
            x += 5.0;
        }
        best.0
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    log::info!("Bullet Storm (native) starting...");

    let cli = headless::Cli::parse();
    if let Err(e) = headless::run(cli) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on the web
}
