#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Computer opponent that searches launch parameters with side-effect free
//! shot simulation.

use glam::Vec2;
use tanx_core::{Aim, Impact, ShotResult, TankId};
use tanx_system_ballistics::{Game, GameError};
use tanx_world::{POWER_MAX, POWER_MIN, TURRET_MAX, TURRET_MIN};
use tracing::debug;

const NEAR_MISS_DISTANCE: f32 = 0.5;
const NEAR_MISS_SCORE: f32 = 0.95;
const SELF_SPLASH_PENALTY: f32 = 0.25;

/// Launch parameters chosen by the planner together with their predicted outcome.
#[derive(Clone, Debug, PartialEq)]
pub struct ShotPlan {
    /// Turret angle and power to fire with.
    pub aim: Aim,
    /// Quality of the predicted impact in `0.0..=1.0`.
    pub score: f32,
    /// Simulated shot for `aim`.
    pub prediction: ShotResult,
}

/// Exhaustive grid search over turret angle and shot power.
#[derive(Clone, Debug)]
pub struct ShotPlanner {
    angle_step: i32,
    power_step: f32,
    candidates: Vec<Aim>,
}

impl Default for ShotPlanner {
    fn default() -> Self {
        Self::new(5, 0.1)
    }
}

impl ShotPlanner {
    /// Creates a planner sampling every `angle_step` degrees and every
    /// `power_step` of power.
    #[must_use]
    pub fn new(angle_step: i32, power_step: f32) -> Self {
        Self {
            angle_step: angle_step.max(1),
            power_step: power_step.max(0.01),
            candidates: Vec::new(),
        }
    }

    /// Finds the aim whose predicted impact lands best against `targets`.
    ///
    /// Shots leaving the world are never proposed and impacts that would
    /// splash the shooter are heavily discounted. Ties keep the first
    /// candidate in search order, so identical games yield identical plans.
    /// Returns `None` when no living target is given or every candidate
    /// flies out of the world.
    pub fn find_best_shot(
        &mut self,
        game: &Game,
        shooter: TankId,
        targets: &[TankId],
    ) -> Result<Option<ShotPlan>, GameError> {
        let origin = game
            .tank(shooter)
            .ok_or(GameError::UnknownTank(shooter))?
            .center();
        let living: Vec<(TankId, Vec2)> = targets
            .iter()
            .filter_map(|&id| game.tank(id))
            .filter(|tank| tank.is_alive() && tank.id() != shooter)
            .map(|tank| (tank.id(), tank.center()))
            .collect();
        if living.is_empty() {
            return Ok(None);
        }

        self.prepare_candidates();
        let splash = game.config().splash_radius;
        let mut best: Option<ShotPlan> = None;
        for &aim in &self.candidates {
            let prediction = game.simulate_shot_with(shooter, aim)?;
            let Some(score) = score_impact(&prediction.impact, &living, origin, splash) else {
                continue;
            };
            if best.as_ref().map_or(true, |plan| score > plan.score) {
                best = Some(ShotPlan {
                    aim,
                    score,
                    prediction,
                });
            }
        }

        if let Some(plan) = &best {
            debug!(
                shooter = shooter.get(),
                angle = plan.aim.angle,
                power = plan.aim.power,
                score = plan.score,
                "planned shot"
            );
        }
        Ok(best)
    }

    fn prepare_candidates(&mut self) {
        self.candidates.clear();
        let powers = power_samples(self.power_step);
        let mut angle = TURRET_MIN;
        loop {
            self.candidates
                .extend(powers.iter().map(|&power| Aim::new(angle, power)));
            if angle >= TURRET_MAX {
                break;
            }
            angle = (angle + self.angle_step).min(TURRET_MAX);
        }
    }
}

fn power_samples(step: f32) -> Vec<f32> {
    let mut powers = Vec::new();
    let mut index = 0_u32;
    loop {
        let power = ((POWER_MIN + step * index as f32) * 100.0).round() / 100.0;
        if power >= POWER_MAX {
            break;
        }
        powers.push(power);
        index += 1;
    }
    powers.push(POWER_MAX);
    powers
}

/// Scores an impact against living targets; `None` for shells that leave the world.
fn score_impact(
    impact: &Impact,
    targets: &[(TankId, Vec2)],
    shooter_center: Vec2,
    splash_radius: f32,
) -> Option<f32> {
    let point = impact.point()?;
    let score = match impact {
        Impact::Tank { tank, .. } if targets.iter().any(|(id, _)| id == tank) => 1.0,
        _ => {
            let closest = targets
                .iter()
                .map(|(_, center)| center.distance(point))
                .fold(f32::INFINITY, f32::min);
            if closest <= NEAR_MISS_DISTANCE {
                NEAR_MISS_SCORE
            } else {
                1.0 / (1.0 + closest)
            }
        }
    };
    if shooter_center.distance(point) <= splash_radius {
        Some(score * SELF_SPLASH_PENALTY)
    } else {
        Some(score)
    }
}
