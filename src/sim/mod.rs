//! Deterministic game engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Simulated time only (no platform timers)
//! - Seeded RNG only
//! - Stable iteration order (by entity and timer ID)
//! - No rendering or platform dependencies

pub mod clock;
pub mod difficulty;
pub mod events;
pub mod milestones;
pub mod resolver;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod timers;

pub use difficulty::{Difficulty, DifficultyProfile};
pub use events::{GameEvent, Outcome};
pub use milestones::{MILESTONES, Milestone};
pub use session::{Command, GameSession};
pub use state::{Entity, EntityId, EntityKind, GamePhase, GameState, HudSnapshot, PowerKind};
pub use timers::{TimerId, TimerKind, TimerQueue};
