//! Game state and core simulation types
//!
//! `GameState` is the single source of truth for a session; the board's
//! entities live next to it in the session because they own timers.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::Serialize;

use super::difficulty::DifficultyProfile;
use super::timers::TimerId;
use crate::consts::*;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// Reset, waiting for start
    Idle,
    /// Clock and spawner live
    Running,
    /// Running, but spawn attempts and countdown are suppressed
    Paused,
    /// Finished; outcome surfaced
    Ended,
}

/// Power-up flavours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerKind {
    /// Doubles drop points for a few seconds
    Bucket,
    /// Clears every contaminant on the board
    Filter,
}

/// Entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Drop,
    Hazard,
    PowerUp(PowerKind),
}

impl EntityKind {
    /// Footprint on the board
    pub fn size(&self) -> f32 {
        match self {
            EntityKind::Drop => DROP_SIZE,
            EntityKind::Hazard => HAZARD_SIZE,
            EntityKind::PowerUp(_) => POWER_SIZE,
        }
    }

    /// Lifetime before expiry
    pub fn ttl_ms(&self) -> u64 {
        match self {
            EntityKind::Drop => DROP_TTL_MS,
            EntityKind::Hazard => HAZARD_TTL_MS,
            EntityKind::PowerUp(_) => POWER_TTL_MS,
        }
    }

    /// Label the surface shows on the entity
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Drop => "Clean water drop, 10 points",
            EntityKind::Hazard => "Contaminant, avoid",
            EntityKind::PowerUp(PowerKind::Bucket) => "Bucket x2",
            EntityKind::PowerUp(PowerKind::Filter) => "Filter",
        }
    }
}

/// Handle the render surface uses to refer back to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u32);

/// An entity on the board
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Top-left corner in board pixels
    pub pos: Vec2,
    pub size: f32,
    pub created_ms: u64,
    pub ttl_ms: u64,
    /// Pending expiry timer
    pub expiry: TimerId,
}

/// What the HUD shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    pub lives: u8,
    pub time_left: u32,
    pub multiplier: u32,
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    /// Seconds remaining
    pub time_left: u32,
    /// Consecutive successful collections
    pub streak: u32,
    /// Score multiplier (1..=MAX_MULTIPLIER)
    pub multiplier: u32,
    /// Bucket power-up doubling drop points
    pub bucket_active: bool,
    /// Milestone thresholds already announced
    pub milestones_shown: BTreeSet<u64>,
    /// Copied from the active difficulty
    pub spawn_rate_ms: u64,
    pub hazard_rate: f32,
    pub power_rate: f32,
}

impl GameState {
    /// Fresh idle state configured from a difficulty profile
    pub fn new(profile: &DifficultyProfile) -> Self {
        let mut state = Self {
            phase: GamePhase::Idle,
            score: 0,
            lives: START_LIVES,
            time_left: 0,
            streak: 0,
            multiplier: 1,
            bucket_active: false,
            milestones_shown: BTreeSet::new(),
            spawn_rate_ms: 0,
            hazard_rate: 0.0,
            power_rate: 0.0,
        };
        state.apply_profile(profile);
        state
    }

    /// Load clock and spawn tuning from a profile
    pub fn apply_profile(&mut self, profile: &DifficultyProfile) {
        self.time_left = profile.time_budget;
        self.spawn_rate_ms = profile.spawn_interval_ms;
        self.hazard_rate = profile.hazard_probability;
        self.power_rate = profile.power_probability;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, GamePhase::Running | GamePhase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Player actions and periodic ticks only count while running and not paused
    pub fn accepts_input(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Reset the combo after a miss or a hazard
    pub fn break_streak(&mut self) {
        self.streak = 0;
        self.multiplier = 1;
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.score,
            lives: self.lives,
            time_left: self.time_left,
            multiplier: self.multiplier,
        }
    }
}
