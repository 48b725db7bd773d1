//! Water Rush - A timed clean-water reaction game
//!
//! Core modules:
//! - `sim`: Deterministic game engine (spawning, scoring, countdown, session state machine)
//! - `audio`: Procedural tone cues and the sinks that play them
//! - `settings`: Player-facing configuration
//! - `web`: Browser glue (wasm32 only)

pub mod audio;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use audio::{Cue, ToneSink, ToneSpec, Waveform};
pub use settings::Settings;
pub use sim::{Difficulty, GameEvent, GamePhase, GameSession, GameState};

/// Game configuration constants
pub mod consts {
    /// Starting lives
    pub const START_LIVES: u8 = 3;

    /// Base points for a collected drop (before multiplier and bucket)
    pub const DROP_POINTS: u64 = 10;
    /// Consecutive collections needed per multiplier step
    pub const STREAK_STEP: u32 = 4;
    /// Multiplier cap
    pub const MAX_MULTIPLIER: u32 = 5;

    /// Countdown tick period
    pub const CLOCK_TICK_MS: u64 = 1000;
    /// How long a bucket power-up doubles drop points
    pub const BUCKET_DURATION_MS: u64 = 5000;

    /// Entity lifetimes before they expire
    pub const DROP_TTL_MS: u64 = 2200;
    pub const HAZARD_TTL_MS: u64 = 3000;
    pub const POWER_TTL_MS: u64 = 4500;

    /// Entity footprint on the board (square, pixels)
    pub const DROP_SIZE: f32 = 36.0;
    pub const HAZARD_SIZE: f32 = 44.0;
    pub const POWER_SIZE: f32 = 80.0;

    /// Default board dimensions when the surface hasn't reported its bounds
    pub const DEFAULT_BOARD_WIDTH: f32 = 720.0;
    pub const DEFAULT_BOARD_HEIGHT: f32 = 420.0;
}
