//! Score milestones
//!
//! One-shot notifications as the score climbs. Independent of difficulty.

use super::state::GameState;

/// A score threshold and its announcement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub threshold: u64,
    pub message: &'static str,
}

/// Ordered by threshold
pub const MILESTONES: &[Milestone] = &[
    Milestone {
        threshold: 60,
        message: "Halfway to the first jerry can! Keep going.",
    },
    Milestone {
        threshold: 150,
        message: "Great work, you're filling the tank fast.",
    },
    Milestone {
        threshold: 220,
        message: "Milestone reached: a family's daily water!",
    },
    Milestone {
        threshold: 300,
        message: "Community is close to its goal today!",
    },
];

/// Mark and return every milestone the current score has reached for the first time.
///
/// Returned in list order; a single big collection can cross several at once.
pub fn check(state: &mut GameState) -> Vec<&'static Milestone> {
    let mut reached = Vec::new();
    for milestone in MILESTONES {
        if state.score >= milestone.threshold && state.milestones_shown.insert(milestone.threshold) {
            reached.push(milestone);
        }
    }
    reached
}
