//! Countdown clock
//!
//! One tick per second while running and not paused. When time runs out the
//! round is judged against the difficulty's score goal.

use super::events::GameEvent;
use super::state::GameState;

/// Result of a clock tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClockTick {
    /// Not running, or paused
    Suppressed,
    /// One second gone, time remains
    Counting,
    /// Time is up; the session should end with this result
    Expired { won: bool, detail: String },
}

/// Goal text shown when the clock runs out
pub fn goal_detail(goal: u64, score: u64) -> String {
    format!("Goal: {goal} points. You scored {score}.")
}

pub fn tick(state: &mut GameState, goal: u64, events: &mut Vec<GameEvent>) -> ClockTick {
    if !state.accepts_input() {
        return ClockTick::Suppressed;
    }
    state.time_left = state.time_left.saturating_sub(1);
    events.push(GameEvent::Hud { hud: state.hud() });

    if state.time_left == 0 {
        ClockTick::Expired {
            won: state.score >= goal,
            detail: goal_detail(goal, state.score),
        }
    } else {
        ClockTick::Counting
    }
}
