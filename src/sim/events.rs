//! Events the engine emits for its collaborators
//!
//! The session never touches the board, speakers or HUD directly. It queues
//! events in order; the host drains them after every call and forwards them.

use glam::Vec2;
use serde::Serialize;

use super::state::{EntityId, EntityKind, HudSnapshot};
use crate::audio::{Cue, ToneSpec};

/// Final result of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub won: bool,
    pub score: u64,
    /// Why it ended ("Goal: 300 points. You scored 310.")
    pub detail: String,
}

impl Outcome {
    pub fn title(&self) -> &'static str {
        if self.won { "You did it! 💧" } else { "Game Over" }
    }

    /// Full modal text
    pub fn message(&self) -> String {
        if self.won {
            format!(
                "You reached the clean water goal! Final score: {}. {}",
                self.score, self.detail
            )
        } else {
            format!(
                "You didn't reach the goal. Final score: {}. {}",
                self.score, self.detail
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    /// Draw an entity
    EntitySpawned {
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        size: f32,
    },
    /// Remove an entity's visual
    EntityRemoved { id: EntityId },
    /// Play a tone
    Sound { cue: Cue, tone: ToneSpec },
    /// Score/lives/time/multiplier changed
    Hud { hud: HudSnapshot },
    /// A score milestone was crossed
    Milestone { threshold: u64, message: &'static str },
    /// Session over; show the modal
    Ended { outcome: Outcome },
}

impl GameEvent {
    pub fn sound(cue: Cue) -> Self {
        GameEvent::Sound {
            cue,
            tone: cue.tone(),
        }
    }
}
