//! Water Rush entry point
//!
//! Native builds play one headless, seeded round with a simple auto-clicker
//! and log what happens. The browser build is driven through `web::WebGame`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use water_rush::audio::{ToneLog, ToneSink};
    use water_rush::sim::{EntityId, EntityKind, GameEvent, GamePhase, GameSession};
    use water_rush::Settings;

    /// Simulation step between frames
    const FRAME_MS: u64 = 50;

    /// Clicks entities after a human-ish reaction delay; sometimes too slow, sometimes careless
    struct AutoPlayer {
        rng: Pcg32,
        /// (click time, target)
        queued: Vec<(u64, EntityId)>,
    }

    impl AutoPlayer {
        fn new(seed: u64) -> Self {
            Self {
                rng: Pcg32::seed_from_u64(seed ^ 0x5eed),
                queued: Vec::new(),
            }
        }

        fn observe(&mut self, now_ms: u64, id: EntityId, kind: EntityKind) {
            let (chance, reaction): (f64, std::ops::Range<u64>) = match kind {
                EntityKind::Drop => (0.85, 250..2600),
                EntityKind::Hazard => (0.04, 300..900),
                EntityKind::PowerUp(_) => (0.7, 300..1500),
            };
            if self.rng.random_bool(chance) {
                let delay = self.rng.random_range(reaction);
                self.queued.push((now_ms + delay, id));
            }
        }

        /// Targets whose click time has come
        fn due(&mut self, now_ms: u64) -> Vec<EntityId> {
            let (due, later): (Vec<_>, Vec<_>) =
                self.queued.drain(..).partition(|(at, _)| *at <= now_ms);
            self.queued = later;
            due.into_iter().map(|(_, id)| id).collect()
        }
    }

    fn load_settings(path: Option<String>) -> Settings {
        let Some(path) = path else {
            return Settings::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Settings::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {path}");
                    settings
                }
                Err(e) => {
                    log::warn!("Invalid settings in {path}: {e}; using defaults");
                    Settings::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {path}: {e}; using defaults");
                Settings::default()
            }
        }
    }

    pub fn run() {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let settings = load_settings(std::env::args().nth(1));
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Water Rush (headless) starting, seed {seed}");

        let tones = ToneLog::new(settings.effective_volume());
        let mut player = AutoPlayer::new(seed);
        let mut session = GameSession::new(settings.difficulty, seed);
        session.set_bounds(settings.board_width, settings.board_height);
        session.start();

        while session.phase() != GamePhase::Ended {
            session.advance(FRAME_MS);
            let now = session.now_ms();
            for id in player.due(now) {
                session.interact(id);
            }
            for event in session.drain_events() {
                match event {
                    GameEvent::EntitySpawned { id, kind, .. } => player.observe(now, id, kind),
                    GameEvent::Sound { tone, .. } => tones.play(&tone),
                    GameEvent::Milestone { message, .. } => log::info!("{message}"),
                    GameEvent::Ended { outcome } => {
                        println!("\n{}", outcome.title());
                        println!("{}", outcome.message());
                    }
                    GameEvent::Hud { .. } | GameEvent::EntityRemoved { .. } => {}
                }
            }
        }

        let hud = session.state().hud();
        log::info!(
            "Finished after {}s: score {}, lives {}, multiplier x{}",
            session.now_ms() / 1000,
            hud.score,
            hud.lives,
            hud.multiplier
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::init, this is just to satisfy the compiler
}
