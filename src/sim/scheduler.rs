//! Spawn decisions
//!
//! Each spawn tick draws one value in [0, 1) and maps it onto three bands:
//! power-up, hazard, drop. Placement keeps the whole entity on the board.

use glam::Vec2;
use rand::Rng;

use super::state::{EntityKind, GameState, PowerKind};

/// A spawn the session should carry out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: f32,
    pub ttl_ms: u64,
}

/// Map a roll onto the entity bands.
///
/// `coin` picks the power-up flavour (true = Bucket) and is only consulted
/// when the roll lands in the power-up band.
pub fn kind_for_roll(roll: f32, power_rate: f32, hazard_rate: f32, coin: bool) -> EntityKind {
    if roll < power_rate {
        EntityKind::PowerUp(if coin {
            PowerKind::Bucket
        } else {
            PowerKind::Filter
        })
    } else if roll < power_rate + hazard_rate {
        EntityKind::Hazard
    } else {
        EntityKind::Drop
    }
}

/// Draw an entity kind using the state's spawn mix
pub fn choose_kind<R: Rng + ?Sized>(rng: &mut R, state: &GameState) -> EntityKind {
    let roll: f32 = rng.random();
    if roll < state.power_rate {
        let coin = rng.random_bool(0.5);
        kind_for_roll(roll, state.power_rate, state.hazard_rate, coin)
    } else {
        kind_for_roll(roll, state.power_rate, state.hazard_rate, false)
    }
}

/// Uniform top-left corner so the entity stays fully inside `bounds`
pub fn random_position<R: Rng + ?Sized>(rng: &mut R, bounds: Vec2, size: f32) -> Vec2 {
    let max = (bounds - Vec2::splat(size)).max(Vec2::ZERO);
    Vec2::new(rng.random::<f32>() * max.x, rng.random::<f32>() * max.y)
}

/// Decide this tick's spawn, or None while the session isn't accepting ticks
pub fn plan_spawn<R: Rng + ?Sized>(rng: &mut R, state: &GameState, bounds: Vec2) -> Option<SpawnPlan> {
    if !state.accepts_input() {
        return None;
    }
    let kind = choose_kind(rng, state);
    let size = kind.size();
    Some(SpawnPlan {
        kind,
        pos: random_position(rng, bounds, size),
        size,
        ttl_ms: kind.ttl_ms(),
    })
}
