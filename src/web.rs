//! Browser bindings
//!
//! Thin wasm-bindgen wrapper around [`GameSession`]. The page's JS drives time
//! from `requestAnimationFrame`, forwards clicks and buttons, and renders the
//! JSON event batches every call returns. Sound events are played here.

use wasm_bindgen::prelude::*;

use crate::audio::{AudioManager, ToneSink};
use crate::settings::Settings;
use crate::sim::{Command, EntityId, GameEvent, GameSession};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Water Rush (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
    audio: AudioManager,
}

#[wasm_bindgen]
impl WebGame {
    /// `settings_json` may be empty for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, seed: u32) -> WebGame {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).unwrap_or_else(|e| {
                log::warn!("Invalid settings: {e}; using defaults");
                Settings::default()
            })
        };
        let seed = settings.seed.unwrap_or(u64::from(seed));

        let mut audio = AudioManager::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);

        let mut session = GameSession::new(settings.difficulty, seed);
        session.set_bounds(settings.board_width, settings.board_height);
        WebGame { session, audio }
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.session.set_bounds(width, height);
    }

    pub fn start(&mut self) -> String {
        self.session.apply(Command::Start);
        self.flush()
    }

    pub fn toggle_pause(&mut self) -> String {
        self.session.apply(Command::TogglePause);
        self.flush()
    }

    pub fn reset(&mut self) -> String {
        self.session.apply(Command::Reset);
        self.flush()
    }

    pub fn set_difficulty(&mut self, name: &str) -> String {
        self.session.set_difficulty(name);
        self.flush()
    }

    pub fn dismiss_modal(&mut self) {
        self.session.apply(Command::DismissModal);
    }

    /// Keyboard shortcut (`KeyboardEvent.key`); returns events, or "[]" if unmapped
    pub fn key(&mut self, key: &str) -> String {
        if let Some(command) = Command::from_key(key) {
            self.session.apply(command);
        }
        self.flush()
    }

    pub fn interact(&mut self, id: u32) -> String {
        self.session.apply(Command::Interact(EntityId(id)));
        self.flush()
    }

    /// Advance simulated time by the frame delta
    pub fn advance(&mut self, dt_ms: f64) -> String {
        // Cap long gaps (background tabs) the same way a frame accumulator would
        let dt = dt_ms.clamp(0.0, 1000.0) as u64;
        self.session.advance(dt);
        self.flush()
    }

    pub fn pause_label(&self) -> String {
        self.session.pause_label().to_string()
    }

    pub fn is_hard(&self) -> bool {
        self.session.active_difficulty().is_hard()
    }
}

impl WebGame {
    /// Play queued sounds and hand the rest to JS
    fn flush(&mut self) -> String {
        let events = self.session.drain_events();
        for event in &events {
            if let GameEvent::Sound { tone, .. } = event {
                self.audio.play(tone);
            }
        }
        serde_json::to_string(&events).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {e}");
            "[]".to_string()
        })
    }
}
