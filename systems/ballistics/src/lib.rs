#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ballistics engine that owns the world and both tanks.
//!
//! The engine integrates shells under constant gravity, classifies the first
//! thing they touch, and applies the resulting damage to tanks, buildings,
//! rubble, and terrain. Simulation never mutates state; only the explicit
//! damage-application entry points do.

mod damage;

use glam::Vec2;
use tanx_core::{
    Aim, BuildingCollapse, CollapseOutcome, Crater, Direction, Impact, SettingsError, ShotResult,
    TankDamage, TankId, TankSnapshot, TerrainSettings,
};
use tanx_world::{Tank, World, TANK_HEIGHT};
use thiserror::Error;
use tracing::{debug, info, warn};

pub use damage::{falloff_damage, DamageProfile, FULL_DAMAGE_RADIUS};

const PLAYER_NAMES: [&str; 2] = ["Player 1", "Player 2"];
const LEFT_SPAWN_COLUMN: i32 = 2;
const RIGHT_SPAWN_INSET: i32 = 3;
const COLLAPSE_INFLUENCE_MARGIN: f32 = 1.5;

/// Fixed simulation constants used by the engine.
#[derive(Clone, Debug, PartialEq)]
pub struct BallisticsConfig {
    /// Downward acceleration applied to shells.
    pub gravity: f32,
    /// Launch speed at a power multiplier of one.
    pub projectile_speed: f32,
    /// Simulation time between path samples.
    pub time_step: f32,
    /// Path samples taken before a shell times out.
    pub max_steps: u32,
    /// Hit points removed by a direct hit.
    pub base_damage: u32,
    /// Radius of splash damage and ground craters.
    pub splash_radius: f32,
    /// Half extent of the box around a tank's center that counts as a direct hit.
    pub direct_hit_radius: f32,
    /// Crater radius for structure hits relative to the splash radius.
    pub structure_crater_scale: f32,
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.35,
            projectile_speed: 6.5,
            time_step: 0.1,
            max_steps: 360,
            base_damage: 25,
            splash_radius: 1.8,
            direct_hit_radius: 0.6,
            structure_crater_scale: 0.6,
        }
    }
}

impl BallisticsConfig {
    /// Damage profile of a regular shell.
    #[must_use]
    pub fn shell_profile(&self) -> DamageProfile {
        DamageProfile::new(self.base_damage, self.splash_radius)
    }
}

/// Errors raised by the ballistics engine.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GameError {
    /// The terrain settings were rejected.
    #[error(transparent)]
    Settings(#[from] SettingsError),
    /// No column was free to place a tank in.
    #[error("no free column to spawn {name}")]
    NoSpawnPosition {
        /// Name of the tank that could not be placed.
        name: String,
    },
    /// The referenced tank does not exist.
    #[error("unknown tank {0:?}")]
    UnknownTank(TankId),
}

/// World plus the tanks fighting over it.
#[derive(Clone, Debug)]
pub struct Game {
    world: World,
    tanks: Vec<Tank>,
    config: BallisticsConfig,
}

impl Game {
    /// Generates a world and spawns both tanks using the default constants.
    pub fn new(settings: &TerrainSettings) -> Result<Self, GameError> {
        Self::with_config(settings, BallisticsConfig::default())
    }

    /// Generates a world and spawns both tanks using the provided constants.
    ///
    /// The left tank takes the first free column scanning right from column
    /// two; the right tank takes the first free column scanning left from
    /// three columns before the right edge.
    pub fn with_config(
        settings: &TerrainSettings,
        config: BallisticsConfig,
    ) -> Result<Self, GameError> {
        let world = World::generate(settings)?;
        let width = world.width() as i32;

        let left = find_spawn(&world, LEFT_SPAWN_COLUMN, 1, PLAYER_NAMES[0])?;
        let right = find_spawn(&world, width - RIGHT_SPAWN_INSET, -1, PLAYER_NAMES[1])?;
        let tanks = vec![
            Tank::spawn(TankId::new(0), PLAYER_NAMES[0], &world, left, Direction::Right),
            Tank::spawn(TankId::new(1), PLAYER_NAMES[1], &world, right, Direction::Left),
        ];
        debug!(seed = world.seed(), left, right, "spawned tanks");

        Ok(Self {
            world,
            tanks,
            config,
        })
    }

    /// Authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world for scenario setup.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Simulation constants in use.
    #[must_use]
    pub fn config(&self) -> &BallisticsConfig {
        &self.config
    }

    /// Every tank in turn order.
    #[must_use]
    pub fn tanks(&self) -> &[Tank] {
        &self.tanks
    }

    /// Looks up a tank by identifier.
    #[must_use]
    pub fn tank(&self, id: TankId) -> Option<&Tank> {
        self.tanks.iter().find(|tank| tank.id() == id)
    }

    /// Mutable access to a tank for aiming and scenario setup.
    pub fn tank_mut(&mut self, id: TankId) -> Option<&mut Tank> {
        self.tanks.iter_mut().find(|tank| tank.id() == id)
    }

    /// Identifiers of every tank that still has hit points.
    #[must_use]
    pub fn alive_tanks(&self) -> Vec<TankId> {
        self.tanks
            .iter()
            .filter(|tank| tank.is_alive())
            .map(Tank::id)
            .collect()
    }

    /// Snapshots of every tank in turn order.
    #[must_use]
    pub fn snapshots(&self) -> Vec<TankSnapshot> {
        self.tanks.iter().map(Tank::snapshot).collect()
    }

    /// Moves a tank to `column` and seats it on the surface there.
    pub fn place_tank(&mut self, id: TankId, column: i32) -> Result<(), GameError> {
        let index = self.index_of(id)?;
        let world = &self.world;
        self.tanks[index].place(world, column);
        Ok(())
    }

    /// Drives a tank one column, returning whether the move was accepted.
    pub fn move_tank(&mut self, id: TankId, direction: Direction) -> Result<bool, GameError> {
        let index = self.index_of(id)?;
        let world = &self.world;
        Ok(self.tanks[index].try_move(world, direction))
    }

    /// Traces the shell `shooter` would fire with its current aim.
    pub fn simulate_shot(&self, shooter: TankId) -> Result<ShotResult, GameError> {
        let index = self.index_of(shooter)?;
        Ok(self.trace(index, self.tanks[index].aim()))
    }

    /// Traces a shell from `shooter` using arbitrary launch parameters.
    ///
    /// Nothing is mutated, which makes this the entry point for previews and
    /// search.
    pub fn simulate_shot_with(&self, shooter: TankId, aim: Aim) -> Result<ShotResult, GameError> {
        let index = self.index_of(shooter)?;
        Ok(self.trace(index, aim))
    }

    /// Fires a shell from `shooter`, optionally applying its effects at once.
    pub fn step_projectile(
        &mut self,
        shooter: TankId,
        apply_effects: bool,
    ) -> Result<ShotResult, GameError> {
        let result = self.simulate_shot(shooter)?;
        if apply_effects {
            Ok(self.apply_shot_effects(result))
        } else {
            Ok(result)
        }
    }

    /// Applies a regular shell's effects to the world and tanks.
    pub fn apply_shot_effects(&mut self, result: ShotResult) -> ShotResult {
        let profile = self.config.shell_profile();
        self.apply_shot_effects_with(result, profile)
    }

    /// Applies an impact's effects using a custom damage profile.
    ///
    /// A direct hit removes the profile's base damage from the struck tank,
    /// and every other tank near the impact takes splash damage. Ground hits
    /// carve a crater of the splash radius; structure hits damage the struck
    /// floor or rubble and carve a smaller crater. Afterwards every tank is
    /// re-seated on the surface. Results that were already applied are
    /// returned unchanged.
    pub fn apply_shot_effects_with(
        &mut self,
        mut result: ShotResult,
        profile: DamageProfile,
    ) -> ShotResult {
        if result.effects_applied {
            warn!(
                shooter = result.shooter.get(),
                "shot effects were already applied"
            );
            return result;
        }
        result.effects_applied = true;

        let structure_radius = profile.splash_radius * self.config.structure_crater_scale;
        let mut direct = None;
        let point = match result.impact {
            Impact::OutOfBounds => None,
            Impact::Tank { tank, point } => {
                direct = Some(tank);
                if let Ok(index) = self.index_of(tank) {
                    self.damage_tank(
                        index,
                        profile.base_damage,
                        &mut result.damage,
                        &mut result.fatalities,
                    );
                }
                Some(point)
            }
            Impact::Building {
                building,
                floor,
                point,
            } => {
                if let Some(damage) = self
                    .world
                    .damage_floor(building, floor, profile.base_damage)
                {
                    result.structures.push(damage);
                }
                result.crater = Some(self.carve(point, structure_radius));
                Some(point)
            }
            Impact::Rubble { segment, point } => {
                if let Some(damage) = self.world.damage_rubble(segment, profile.base_damage) {
                    result.structures.push(damage);
                }
                result.crater = Some(self.carve(point, structure_radius));
                Some(point)
            }
            Impact::Ground { point } => {
                result.crater = Some(self.carve(point, profile.splash_radius));
                Some(point)
            }
        };

        if let Some(point) = point {
            for index in 0..self.tanks.len() {
                if Some(self.tanks[index].id()) == direct {
                    continue;
                }
                let distance = self.tanks[index].center().distance(point);
                let amount = profile.splash_at(distance);
                if amount > 0 {
                    self.damage_tank(index, amount, &mut result.damage, &mut result.fatalities);
                }
            }
        }
        self.settle_tanks();

        debug!(
            shooter = result.shooter.get(),
            impact = ?result.impact.kind(),
            damage = result.total_damage(),
            fatalities = result.fatalities.len(),
            "applied shot effects"
        );
        result
    }

    /// Resolves an externally computed strike at `point`.
    ///
    /// The point is classified against the world as if a shell had arrived
    /// there; a point in open air drops onto whatever lies beneath it. Damage
    /// uses `profile` and is credited to `owner`.
    pub fn strike(
        &mut self,
        owner: TankId,
        point: Vec2,
        profile: DamageProfile,
    ) -> Result<ShotResult, GameError> {
        let _ = self.index_of(owner)?;
        let impact = if point.x < 0.0 || point.x >= self.world.width() as f32 {
            Impact::OutOfBounds
        } else {
            self.classify(point, None).unwrap_or_else(|| {
                let grounded = Vec2::new(point.x, self.world.surface_y(point.x) - 0.01);
                self.classify(grounded, None).unwrap_or(Impact::Ground {
                    point: Vec2::new(point.x, self.world.terrain_height(point.x)),
                })
            })
        };
        let result = ShotResult::new(owner, vec![point], impact);
        Ok(self.apply_shot_effects_with(result, profile))
    }

    /// Applies the damage pulse of a finalized building collapse.
    ///
    /// Tanks within half the footprint width plus a margin of its center take
    /// falloff damage based on their horizontal distance. Taller collapses hit
    /// harder.
    pub fn handle_building_collapse(&mut self, collapse: BuildingCollapse) -> CollapseOutcome {
        let base = self.config.base_damage;
        let scaled = (base as f32 * (1.1 + 0.15 * collapse.floors as f32)) as u32;
        let pulse = base.max(scaled);
        let influence = collapse.width() * 0.5 + COLLAPSE_INFLUENCE_MARGIN;
        let center = collapse.center_x();

        let mut damage = Vec::new();
        let mut fatalities = Vec::new();
        for index in 0..self.tanks.len() {
            let horizontal = (self.tanks[index].x() - center).abs();
            let amount = falloff_damage(pulse, influence, horizontal);
            if amount > 0 {
                self.damage_tank(index, amount, &mut damage, &mut fatalities);
            }
        }
        self.settle_tanks();

        info!(
            building = collapse.building.get(),
            floors = collapse.floors,
            casualties = fatalities.len(),
            "building collapsed"
        );
        CollapseOutcome {
            collapse,
            damage,
            fatalities,
        }
    }

    /// Advances collapse countdowns and finalizes every building that became ready.
    pub fn update_collapses(&mut self, dt: f32) -> Vec<CollapseOutcome> {
        let ready = self.world.update_collapsing_buildings(dt);
        let mut outcomes = Vec::with_capacity(ready.len());
        for id in ready {
            if let Some(collapse) = self.world.finalize_building_collapse(id) {
                outcomes.push(self.handle_building_collapse(collapse));
            }
        }
        outcomes
    }

    fn index_of(&self, id: TankId) -> Result<usize, GameError> {
        self.tanks
            .iter()
            .position(|tank| tank.id() == id)
            .ok_or(GameError::UnknownTank(id))
    }

    fn trace(&self, shooter: usize, aim: Aim) -> ShotResult {
        let tank = &self.tanks[shooter];
        let angle = (aim.angle as f32).to_radians();
        let speed = self.config.projectile_speed * aim.power;
        let facing = tank.facing().sign() as f32;
        let mut position = tank.muzzle();
        let mut velocity = Vec2::new(angle.cos() * speed * facing, angle.sin() * speed);
        let dt = self.config.time_step;
        let width = self.world.width() as f32;

        let mut path = Vec::with_capacity(self.config.max_steps as usize);
        let mut impact = Impact::OutOfBounds;
        for _ in 0..self.config.max_steps {
            position += velocity * dt;
            velocity.y -= self.config.gravity * dt;
            path.push(position);

            if position.x < 0.0 || position.x >= width || position.y < 0.0 {
                break;
            }
            if let Some(found) = self.classify(position, Some(tank.id())) {
                impact = found;
                break;
            }
        }

        ShotResult::new(tank.id(), path, impact)
    }

    /// First thing occupying `point`, tested as tank, building, rubble, ground.
    fn classify(&self, point: Vec2, exclude: Option<TankId>) -> Option<Impact> {
        let reach = self.config.direct_hit_radius;
        let struck = self.tanks.iter().find(|tank| {
            let offset = tank.center() - point;
            tank.is_alive()
                && Some(tank.id()) != exclude
                && offset.x.abs() <= reach
                && offset.y.abs() <= reach
        });
        if let Some(tank) = struck {
            return Some(Impact::Tank {
                tank: tank.id(),
                point,
            });
        }
        if let Some(hit) = self.world.building_hit_test(point) {
            return Some(Impact::Building {
                building: hit.building,
                floor: hit.floor,
                point,
            });
        }
        if let Some(segment) = self.world.rubble_hit_test(point) {
            return Some(Impact::Rubble { segment, point });
        }
        let ground = self.world.terrain_height(point.x);
        (point.y <= ground).then(|| Impact::Ground {
            point: Vec2::new(point.x, ground),
        })
    }

    fn carve(&mut self, center: Vec2, radius: f32) -> Crater {
        let _ = self.world.carve_circle(center, radius);
        Crater { center, radius }
    }

    fn damage_tank(
        &mut self,
        index: usize,
        amount: u32,
        damage: &mut Vec<TankDamage>,
        fatalities: &mut Vec<TankId>,
    ) {
        let tank = &mut self.tanks[index];
        if !tank.is_alive() {
            return;
        }
        let before = tank.hp();
        let after = tank.apply_damage(amount);
        if before > after {
            damage.push(TankDamage {
                tank: tank.id(),
                amount: before - after,
                hp_after: after,
            });
        }
        if after == 0 {
            debug!(tank = tank.id().get(), "tank destroyed");
            fatalities.push(tank.id());
        }
    }

    fn settle_tanks(&mut self) {
        let world = &self.world;
        for tank in &mut self.tanks {
            tank.settle(world);
        }
    }
}

fn find_spawn(world: &World, start: i32, step: i32, name: &str) -> Result<i32, GameError> {
    let width = world.width() as i32;
    let mut column = start;
    while (0..width).contains(&column) {
        let x = column as f32 + 0.5;
        let band = world.terrain_height(x)..world.surface_y(x) + TANK_HEIGHT;
        if !world.is_column_blocked(x, band) {
            return Ok(column);
        }
        column += step;
    }
    Err(GameError::NoSpawnPosition {
        name: name.to_owned(),
    })
}
