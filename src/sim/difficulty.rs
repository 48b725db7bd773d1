//! Difficulty presets
//!
//! Each difficulty maps to a fixed profile: round length, spawn cadence,
//! spawn mix, and the score needed to win when the clock runs out.

use serde::{Deserialize, Serialize};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Tuning for one difficulty
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyProfile {
    /// Round length in seconds
    pub time_budget: u32,
    /// Milliseconds between spawn attempts
    pub spawn_interval_ms: u64,
    /// Share of spawns that are hazards
    pub hazard_probability: f32,
    /// Share of spawns that are power-ups
    pub power_probability: f32,
    /// Score needed to win at time-out
    pub score_goal: u64,
}

const EASY: DifficultyProfile = DifficultyProfile {
    time_budget: 70,
    spawn_interval_ms: 950,
    hazard_probability: 0.18,
    power_probability: 0.12,
    score_goal: 220,
};

const NORMAL: DifficultyProfile = DifficultyProfile {
    time_budget: 60,
    spawn_interval_ms: 850,
    hazard_probability: 0.22,
    power_probability: 0.10,
    score_goal: 300,
};

const HARD: DifficultyProfile = DifficultyProfile {
    time_budget: 55,
    spawn_interval_ms: 650,
    hazard_probability: 0.30,
    power_probability: 0.08,
    score_goal: 360,
};

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Parse a selector value, falling back to `Normal` for anything unknown
    pub fn from_name_or_default(s: &str) -> Self {
        Self::from_name(s).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {s:?}, using normal");
            Difficulty::Normal
        })
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        match self {
            Difficulty::Easy => &EASY,
            Difficulty::Normal => &NORMAL,
            Difficulty::Hard => &HARD,
        }
    }

    /// Hard mode gets its own board styling
    pub fn is_hard(&self) -> bool {
        *self == Difficulty::Hard
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        Self::from_name_or_default(&s)
    }
}
