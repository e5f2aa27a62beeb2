//! Superpower charge earned by resolved shots.

use tanx_core::{Impact, ShotResult, TankId};
use tanx_system_ballistics::Game;

const BASE_GAIN: f32 = 0.08;
const DIRECT_HIT_GAIN: f32 = 0.75;
const NEAR_MISS_GAIN: f32 = 0.6;
const NEAR_MISS_DISTANCE: f32 = 0.5;
const PROXIMITY_GAIN: f32 = 0.45;
const PROXIMITY_RANGE: f32 = 6.0;

/// Charge credited to the shooter for `result`.
///
/// Every resolved shot earns a small base amount. Direct hits on an opponent
/// earn the most; otherwise the bonus shrinks quadratically with the distance
/// between the impact and the closest living opponent.
pub(crate) fn shot_gain(game: &Game, result: &ShotResult) -> f32 {
    BASE_GAIN + accuracy_bonus(game, result)
}

fn accuracy_bonus(game: &Game, result: &ShotResult) -> f32 {
    if let Impact::Tank { tank, .. } = result.impact {
        if tank != result.shooter {
            return DIRECT_HIT_GAIN;
        }
    }
    let Some(point) = result.impact.point() else {
        return 0.0;
    };
    let Some(distance) = nearest_opponent(game, result.shooter, point) else {
        return 0.0;
    };
    if distance <= NEAR_MISS_DISTANCE {
        return NEAR_MISS_GAIN;
    }
    let closeness = ((PROXIMITY_RANGE - distance) / PROXIMITY_RANGE).max(0.0);
    PROXIMITY_GAIN * closeness * closeness
}

fn nearest_opponent(game: &Game, shooter: TankId, point: glam::Vec2) -> Option<f32> {
    game.tanks()
        .iter()
        .filter(|tank| tank.id() != shooter && tank.is_alive())
        .map(|tank| tank.center().distance(point))
        .reduce(f32::min)
}
