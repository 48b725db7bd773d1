//! Interaction resolution
//!
//! Turns a player interaction (or a drop expiring) into a state change plus
//! feedback events. Board-level follow-ups (removing hazards, scheduling the
//! bucket clear, ending the game) are reported back as an [`Effect`] for the
//! session to carry out.

use super::events::GameEvent;
use super::milestones;
use super::state::{EntityKind, GameState, PowerKind};
use crate::audio::Cue;
use crate::consts::*;

/// What an interaction did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Drop collected for this many points
    Scored(u64),
    /// Hazard touched; lives left afterwards
    LifeLost { remaining: u8 },
    /// Filter: every hazard on the board must go
    ClearHazards,
    /// Bucket: doubling started; the session schedules its end
    BucketStarted,
}

/// Points a drop is worth right now
pub fn drop_points(multiplier: u32, bucket_active: bool) -> u64 {
    let bucket = if bucket_active { 2 } else { 1 };
    DROP_POINTS * u64::from(multiplier) * bucket
}

/// Resolve a player interaction with an entity.
///
/// Returns None when the session isn't accepting input; the entity stays on the board.
pub fn interact(state: &mut GameState, kind: EntityKind, events: &mut Vec<GameEvent>) -> Option<Effect> {
    if !state.accepts_input() {
        return None;
    }
    let effect = match kind {
        EntityKind::Drop => collect_drop(state, events),
        EntityKind::Hazard => hit_hazard(state, events),
        EntityKind::PowerUp(power) => activate_power(state, power, events),
    };
    Some(effect)
}

fn collect_drop(state: &mut GameState, events: &mut Vec<GameEvent>) -> Effect {
    state.streak += 1;
    if state.streak % STREAK_STEP == 0 && state.multiplier < MAX_MULTIPLIER {
        state.multiplier += 1;
    }
    let points = drop_points(state.multiplier, state.bucket_active);
    state.score += points;

    events.push(GameEvent::sound(Cue::Collect));
    events.push(GameEvent::Hud { hud: state.hud() });
    for milestone in milestones::check(state) {
        log::info!("Milestone {} reached", milestone.threshold);
        events.push(GameEvent::Milestone {
            threshold: milestone.threshold,
            message: milestone.message,
        });
    }
    Effect::Scored(points)
}

fn hit_hazard(state: &mut GameState, events: &mut Vec<GameEvent>) -> Effect {
    state.lives = state.lives.saturating_sub(1);
    state.break_streak();
    events.push(GameEvent::sound(Cue::HazardHit));
    events.push(GameEvent::Hud { hud: state.hud() });
    Effect::LifeLost {
        remaining: state.lives,
    }
}

fn activate_power(state: &mut GameState, power: PowerKind, events: &mut Vec<GameEvent>) -> Effect {
    match power {
        PowerKind::Filter => {
            events.push(GameEvent::sound(Cue::Filter));
            Effect::ClearHazards
        }
        PowerKind::Bucket => {
            state.bucket_active = true;
            events.push(GameEvent::sound(Cue::Bucket));
            Effect::BucketStarted
        }
    }
}

/// A drop expired uncollected. Not gated: expiry timers keep running while paused.
pub fn miss(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.break_streak();
    events.push(GameEvent::sound(Cue::Miss));
    events.push(GameEvent::Hud { hud: state.hud() });
}

/// A bucket window closed
pub fn clear_bucket(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.bucket_active = false;
    events.push(GameEvent::Hud { hud: state.hud() });
}
