//! Kinematic and health state of a single combatant.

use glam::Vec2;
use tanx_core::{Aim, Direction, TankId, TankSnapshot};

use crate::World;

/// Lowest turret elevation in degrees.
pub const TURRET_MIN: i32 = -75;
/// Highest turret elevation in degrees.
pub const TURRET_MAX: i32 = 75;
/// Turret change applied by one aiming step.
pub const TURRET_STEP: i32 = 5;
/// Weakest shot power multiplier.
pub const POWER_MIN: f32 = 0.4;
/// Strongest shot power multiplier.
pub const POWER_MAX: f32 = 1.8;
/// Power change applied by one aiming step.
pub const POWER_STEP: f32 = 0.1;
/// Hit points a tank starts with.
pub const MAX_HP: u32 = 100;
/// Largest rise a tank can climb in a single step.
pub const CLIMB_LIMIT: f32 = 1.0;
/// Height of a tank's body above the surface it rests on.
pub const TANK_HEIGHT: f32 = 1.0;
/// Horizontal distance from the body center to the turret tip.
pub const MUZZLE_OFFSET: f32 = 0.6;

const DEFAULT_TURRET_ANGLE: i32 = 45;
const DEFAULT_SHOT_POWER: f32 = 1.0;

/// A tank standing in one world column.
///
/// The tank always rests on [`World::surface_y`] under its column center; the
/// world re-seats it after moves and after destructive events.
#[derive(Clone, Debug, PartialEq)]
pub struct Tank {
    id: TankId,
    name: String,
    column: i32,
    y: f32,
    facing: Direction,
    turret_angle: i32,
    shot_power: f32,
    hp: u32,
}

impl Tank {
    /// Creates a tank seated on the surface of the provided column.
    #[must_use]
    pub fn spawn(
        id: TankId,
        name: impl Into<String>,
        world: &World,
        column: i32,
        facing: Direction,
    ) -> Self {
        let mut tank = Self {
            id,
            name: name.into(),
            column,
            y: 0.0,
            facing,
            turret_angle: DEFAULT_TURRET_ANGLE,
            shot_power: DEFAULT_SHOT_POWER,
            hp: MAX_HP,
        };
        tank.settle(world);
        tank
    }

    /// Identifier of the tank.
    #[must_use]
    pub const fn id(&self) -> TankId {
        self.id
    }

    /// Display name of the tank's commander.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Column the tank stands in.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Horizontal center of the tank.
    #[must_use]
    pub fn x(&self) -> f32 {
        self.column as f32 + 0.5
    }

    /// Elevation of the surface the tank rests on.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Center of the tank's body.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x(), self.y + TANK_HEIGHT * 0.5)
    }

    /// Turret tip the shell leaves from.
    #[must_use]
    pub fn muzzle(&self) -> Vec2 {
        self.center() + Vec2::new(self.facing.sign() as f32 * MUZZLE_OFFSET, 0.0)
    }

    /// Direction the turret faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Turns the turret to face `facing`.
    pub fn set_facing(&mut self, facing: Direction) {
        self.facing = facing;
    }

    /// Turret elevation in degrees relative to facing.
    #[must_use]
    pub const fn turret_angle(&self) -> i32 {
        self.turret_angle
    }

    /// Current shot power multiplier.
    #[must_use]
    pub const fn shot_power(&self) -> f32 {
        self.shot_power
    }

    /// Launch parameters the tank would fire with.
    #[must_use]
    pub const fn aim(&self) -> Aim {
        Aim::new(self.turret_angle, self.shot_power)
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Whether the tank still has hit points.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Attempts to drive one column in `direction`.
    ///
    /// Rejected without any state change when the tank is destroyed, the
    /// destination lies outside the world, a building floor blocks the body,
    /// or the destination surface rises by more than [`CLIMB_LIMIT`].
    pub fn try_move(&mut self, world: &World, direction: Direction) -> bool {
        if !self.is_alive() {
            return false;
        }
        let destination = self.column + direction.sign();
        if destination < 0 || destination >= world.width() as i32 {
            return false;
        }
        let x = destination as f32 + 0.5;
        let surface = world.surface_y(x);
        if surface - self.y > CLIMB_LIMIT {
            return false;
        }
        if world.is_column_blocked(x, self.y..self.y + TANK_HEIGHT) {
            return false;
        }
        self.column = destination;
        self.y = surface;
        true
    }

    /// Rotates the turret, clamping to the legal range.
    pub fn adjust_turret(&mut self, delta: i32) {
        self.turret_angle = self
            .turret_angle
            .saturating_add(delta)
            .clamp(TURRET_MIN, TURRET_MAX);
    }

    /// Changes shot power, clamping to the legal range.
    pub fn adjust_power(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        let power = (self.shot_power + delta).clamp(POWER_MIN, POWER_MAX);
        self.shot_power = (power * 100.0).round() / 100.0;
    }

    /// Removes hit points, flooring at zero, and returns the hit points left.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }

    /// Re-seats the tank on the surface under its column.
    pub fn settle(&mut self, world: &World) {
        self.y = world.surface_y(self.x());
    }

    /// Moves the tank to `column` and seats it on the surface there.
    pub fn place(&mut self, world: &World, column: i32) {
        self.column = column.clamp(0, world.width() as i32 - 1);
        self.settle(world);
    }

    /// Captures a read-only snapshot of the tank.
    #[must_use]
    pub fn snapshot(&self) -> TankSnapshot {
        TankSnapshot {
            id: self.id,
            name: self.name.clone(),
            column: self.column,
            center: self.center(),
            y: self.y,
            facing: self.facing,
            turret_angle: self.turret_angle,
            shot_power: self.shot_power,
            hp: self.hp,
            alive: self.is_alive(),
        }
    }
}
