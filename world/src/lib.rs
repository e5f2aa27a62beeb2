#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Tanx: destructible terrain, buildings,
//! rubble, and the tanks that drive across them.

mod generation;
mod structures;
mod tank;
mod terrain;

use std::ops::Range;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tanx_core::{
    BuildingCollapse, BuildingId, Crater, RubbleId, SettingsError, StructureDamage,
    TerrainSettings, TerrainStyle,
};
use tracing::debug;

pub use generation::SPAWN_MARGIN;
pub use structures::{
    Building, CollapseStage, Floor, RubbleSegment, COLLAPSE_DELAY, EMPTY_COLLAPSE_DELAY,
    FLOOR_HEIGHT, FLOOR_HP, MAX_GENERATED_FLOORS, RUBBLE_SEGMENT_WIDTH,
};
pub use tank::{
    Tank, CLIMB_LIMIT, MAX_HP, MUZZLE_OFFSET, POWER_MAX, POWER_MIN, POWER_STEP, TANK_HEIGHT,
    TURRET_MAX, TURRET_MIN, TURRET_STEP,
};
pub use terrain::{TerrainField, MAX_SLOPE};

/// Floor struck by a point query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildingHit {
    /// Building owning the floor.
    pub building: BuildingId,
    /// Index of the floor within the building's current stack.
    pub floor: usize,
}

/// Terrain plus every structure standing on it.
///
/// A `World` only exists once generation succeeded, so every query below
/// operates on a fully built landscape.
#[derive(Clone, Debug)]
pub struct World {
    width: u32,
    height: u32,
    seed: u64,
    style: TerrainStyle,
    terrain: TerrainField,
    structures: structures::StructureRegistry,
}

impl World {
    /// Builds a world from the provided settings.
    ///
    /// Generation is a pure function of the settings and their seed. A missing
    /// seed is drawn once here and kept in [`World::seed`] so the landscape can
    /// be reproduced later.
    pub fn generate(settings: &TerrainSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut structures = structures::StructureRegistry::default();

        let terrain = match settings.style {
            TerrainStyle::Classic => generation::classic(settings, &mut rng),
            TerrainStyle::Urban => {
                let (terrain, lots) = generation::urban(settings, &mut rng);
                for lot in lots.iter().filter(|lot| lot.floors > 0) {
                    let _ = structures.insert_building(lot.left, lot.width, lot.level, lot.floors);
                }
                terrain
            }
        };

        debug!(
            seed,
            style = ?settings.style,
            width = settings.width,
            height = settings.height,
            buildings = structures.buildings().count(),
            "generated world"
        );

        Ok(Self {
            width: settings.width,
            height: settings.height,
            seed,
            style: settings.style,
            terrain,
            structures,
        })
    }

    /// Number of cells spanning the world horizontally.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells spanning the world vertically.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Seed the landscape was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Style the landscape was generated with.
    #[must_use]
    pub const fn style(&self) -> TerrainStyle {
        self.style
    }

    /// Underlying terrain height field.
    #[must_use]
    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    /// Bare terrain elevation at `x`, ignoring structures.
    #[must_use]
    pub fn terrain_height(&self, x: f32) -> f32 {
        self.terrain.height_at(x)
    }

    /// Highest solid elevation at `x` across terrain, building roofs, and rubble.
    #[must_use]
    pub fn surface_y(&self, x: f32) -> f32 {
        let mut surface = self.terrain.height_at(x);
        for building in self.structures.buildings() {
            if building.covers(x) {
                if let Some(top) = building.top() {
                    surface = surface.max(top);
                }
            }
        }
        for segment in self.structures.rubble() {
            if segment.covers(x) {
                surface = surface.max(segment.top());
            }
        }
        surface
    }

    /// Carves a crater into the terrain. Returns whether the ground changed.
    ///
    /// Rubble resting on carved ground sinks with it.
    pub fn carve_circle(&mut self, center: Vec2, radius: f32) -> bool {
        let changed = self.terrain.carve_circle(center, radius);
        if changed {
            self.reseat_rubble();
        }
        changed
    }

    /// Finds the building floor occupying `point`.
    #[must_use]
    pub fn building_hit_test(&self, point: Vec2) -> Option<BuildingHit> {
        self.structures
            .buildings()
            .filter(|building| !building.is_collapsed() && building.covers(point.x))
            .find_map(|building| {
                building.floor_at(point.y).map(|floor| BuildingHit {
                    building: building.id(),
                    floor,
                })
            })
    }

    /// Finds the rubble segment whose mound contains `point`.
    #[must_use]
    pub fn rubble_hit_test(&self, point: Vec2) -> Option<RubbleId> {
        self.structures
            .rubble()
            .find(|segment| {
                segment.covers(point.x) && point.y >= segment.base() && point.y <= segment.top()
            })
            .map(RubbleSegment::id)
    }

    /// Whether any building floor at `x` overlaps the elevation band `y`.
    #[must_use]
    pub fn is_column_blocked(&self, x: f32, y: Range<f32>) -> bool {
        self.structures.buildings().any(|building| {
            !building.is_collapsed() && building.covers(x) && building.occupies(y.start, y.end)
        })
    }

    /// Looks up a building by identifier.
    #[must_use]
    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.structures.building(id)
    }

    /// Every building ever raised, ordered by identifier.
    pub fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.structures.buildings()
    }

    /// Looks up a rubble segment by identifier.
    #[must_use]
    pub fn rubble_segment(&self, id: RubbleId) -> Option<&RubbleSegment> {
        self.structures.rubble_segment(id)
    }

    /// Every remaining rubble segment, ordered by identifier.
    pub fn rubble(&self) -> impl Iterator<Item = &RubbleSegment> {
        self.structures.rubble()
    }

    /// Levels a footprint and raises a building of `floors` floors on it.
    ///
    /// The footprint is leveled to the terrain height at its center. Returns
    /// `None` when the footprint is empty, leaves the world, or overlaps a
    /// standing building.
    pub fn place_building(&mut self, left: i32, width: u32, floors: u32) -> Option<BuildingId> {
        if width == 0 || floors == 0 || left < 0 {
            return None;
        }
        let right = left.checked_add(i32::try_from(width).ok()?)?;
        if right > self.width as i32 {
            return None;
        }
        let overlaps = self.structures.buildings().any(|building| {
            !building.is_collapsed() && building.left() < right && left < building.right()
        });
        if overlaps {
            return None;
        }

        let level = self.terrain.height_at((left + right) as f32 * 0.5);
        self.terrain.level_range(left as f32, right as f32, level);
        let id = self.structures.insert_building(left, width, level, floors);
        debug!(building = id.get(), left, width, floors, level, "placed building");
        Some(id)
    }

    /// Damages the floor at `index` of a building.
    ///
    /// Returns `None` when the building or floor does not exist. Losing the
    /// ground floor schedules the building for collapse.
    pub fn damage_floor(
        &mut self,
        building: BuildingId,
        index: usize,
        amount: u32,
    ) -> Option<StructureDamage> {
        let damage = self.structures.damage_floor(building, index, amount)?;
        if damage.collapse_scheduled {
            debug!(building = building.get(), "building became unstable");
        }
        Some(damage)
    }

    /// Damages a rubble segment, removing it once its hit points run out.
    pub fn damage_rubble(&mut self, segment: RubbleId, amount: u32) -> Option<StructureDamage> {
        self.structures.damage_rubble(segment, amount)
    }

    /// Starts the collapse countdown of a standing building.
    ///
    /// Returns `false` without touching the countdown when the building is
    /// unknown or already in the collapse pipeline.
    pub fn schedule_building_collapse(&mut self, building: BuildingId, delay: f32) -> bool {
        self.structures.schedule_collapse(building, delay)
    }

    /// Advances collapse countdowns by `dt`.
    ///
    /// Each building appears in the returned list exactly once, on the tick
    /// its countdown runs out. The caller finalizes it with
    /// [`World::finalize_building_collapse`].
    pub fn update_collapsing_buildings(&mut self, dt: f32) -> Vec<BuildingId> {
        let ready = self.structures.tick(dt);
        for id in &ready {
            debug!(building = id.get(), "building ready to collapse");
        }
        ready
    }

    fn reseat_rubble(&mut self) {
        let terrain = &self.terrain;
        self.structures
            .reseat_rubble(|left, right| terrain.lowest_between(left, right));
    }

    /// Converts a ready building into a crater and rubble.
    ///
    /// Returns `None` unless the building's countdown has run out and it has
    /// not been finalized yet.
    pub fn finalize_building_collapse(&mut self, id: BuildingId) -> Option<BuildingCollapse> {
        let building = self.structures.building(id)?;
        if building.stage() != CollapseStage::Ready {
            return None;
        }
        let left = building.left() as f32;
        let right = building.right() as f32;
        let crater = Crater {
            center: Vec2::new((left + right) * 0.5, building.base()),
            radius: (building.width() as f32 * 0.5).max(1.0),
        };

        let floors = self.structures.mark_collapsed(id)?;
        let _ = self.carve_circle(crater.center, crater.radius);

        let mut rubble = Vec::new();
        let mut x = left;
        while x < right {
            let end = (x + RUBBLE_SEGMENT_WIDTH).min(right);
            let ground = self.terrain.lowest_between(x, end);
            rubble.push(self.structures.insert_rubble(x, end, ground, floors));
            x = end;
        }

        debug!(
            building = id.get(),
            floors,
            segments = rubble.len(),
            "building collapsed"
        );

        Some(BuildingCollapse {
            building: id,
            left,
            right,
            floors,
            crater,
            rubble,
        })
    }
}

/// Read-only helpers for renderers and search code.
pub mod query {
    use super::World;

    /// Surface elevation under the center of every column, left to right.
    #[must_use]
    pub fn surface_profile(world: &World) -> Vec<f32> {
        (0..world.width())
            .map(|column| world.surface_y(column as f32 + 0.5))
            .collect()
    }

    /// Whether any building is unstable but not yet collapsed.
    #[must_use]
    pub fn has_pending_collapse(world: &World) -> bool {
        world
            .buildings()
            .any(|building| building.is_unstable() && !building.is_collapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_settings() -> TerrainSettings {
        TerrainSettings {
            width: 24,
            height: 24,
            min_height: 12.0,
            max_height: 12.0,
            smoothing: 0,
            detail: 4,
            seed: Some(1234),
            ..TerrainSettings::default()
        }
    }

    fn flat_world() -> World {
        World::generate(&flat_settings()).expect("flat world")
    }

    #[test]
    fn invalid_settings_are_rejected() {
        let settings = TerrainSettings {
            width: 2,
            ..flat_settings()
        };
        assert!(World::generate(&settings).is_err());
    }

    #[test]
    fn missing_seed_is_recorded_for_replay() {
        let settings = TerrainSettings {
            seed: None,
            ..TerrainSettings::default()
        };
        let world = World::generate(&settings).expect("world");
        let replay = World::generate(&settings.clone().with_seed(world.seed())).expect("replay");

        assert_eq!(world.terrain(), replay.terrain());
    }

    #[test]
    fn flat_settings_produce_a_flat_field() {
        let world = flat_world();
        assert!(world.terrain().samples().iter().all(|&sample| sample == 12.0));
        assert_eq!(world.surface_y(-5.0), 12.0);
        assert_eq!(world.surface_y(500.0), 12.0);
    }

    #[test]
    fn surface_includes_building_roofs() {
        let mut world = flat_world();
        let id = world.place_building(10, 3, 2).expect("building");

        assert_eq!(world.surface_y(11.5), 12.0 + 2.0 * FLOOR_HEIGHT);
        assert_eq!(world.surface_y(13.5), 12.0);
        assert_eq!(
            world.building_hit_test(Vec2::new(10.5, 12.5)),
            Some(BuildingHit {
                building: id,
                floor: 0
            })
        );
        assert_eq!(world.building_hit_test(Vec2::new(10.5, 16.0)), None);
        assert!(world.is_column_blocked(12.5, 12.0..13.0));
        assert!(!world.is_column_blocked(12.5, 15.0..16.0));
        assert!(!world.is_column_blocked(14.5, 12.0..13.0));
    }

    #[test]
    fn overlapping_buildings_are_refused() {
        let mut world = flat_world();
        let _ = world.place_building(10, 3, 2).expect("building");

        assert_eq!(world.place_building(12, 3, 2), None);
        assert_eq!(world.place_building(22, 4, 2), None);
        assert!(world.place_building(13, 3, 1).is_some());
    }

    #[test]
    fn collapse_turns_a_building_into_rubble() {
        let mut world = flat_world();
        let id = world.place_building(10, 3, 3).expect("building");

        let damage = world.damage_floor(id, 0, FLOOR_HP).expect("damage");
        assert!(damage.destroyed);
        assert!(damage.collapse_scheduled);
        assert!(world.building(id).expect("building").is_unstable());
        assert!(query::has_pending_collapse(&world));

        assert!(world.update_collapsing_buildings(1.0).is_empty());
        assert_eq!(world.finalize_building_collapse(id), None);
        assert_eq!(world.update_collapsing_buildings(0.3), vec![id]);

        let collapse = world.finalize_building_collapse(id).expect("collapse");
        let building = world.building(id).expect("building");
        assert!(building.is_collapsed());
        assert!(building.floors().is_empty());
        assert_eq!(collapse.floors, 2);
        assert_eq!(collapse.rubble.len(), 2);

        let mut covered = 0.0;
        for segment in world.rubble() {
            assert!(segment.left() >= 10.0 && segment.right() <= 13.0);
            covered += segment.right() - segment.left();
        }
        assert_eq!(covered, 3.0);
        assert!(world.terrain_height(11.5) < 12.0);
        assert!(world.rubble_hit_test(Vec2::new(11.5, world.surface_y(11.5) - 0.1)).is_some());
        assert!(world.finalize_building_collapse(id).is_none());
        assert!(!query::has_pending_collapse(&world));
    }

    #[test]
    fn rubble_sinks_into_craters_carved_beneath_it() {
        let mut world = flat_world();
        let id = world.place_building(10, 4, 3).expect("building");
        let _ = world.damage_floor(id, 0, FLOOR_HP).expect("damage");
        assert_eq!(
            world.update_collapsing_buildings(COLLAPSE_DELAY + 0.1),
            vec![id]
        );
        let _ = world.finalize_building_collapse(id).expect("collapse");
        let tops: Vec<f32> = world.rubble().map(RubbleSegment::top).collect();

        assert!(world.carve_circle(Vec2::new(11.0, 11.3), 2.0));

        let segments: Vec<&RubbleSegment> = world.rubble().collect();
        assert_eq!(segments.len(), tops.len());
        for segment in &segments {
            let mut x = segment.left();
            while x <= segment.right() {
                assert!(segment.base() <= world.terrain_height(x) + 1e-5);
                x += 0.25;
            }
        }
        for (segment, &before) in segments.iter().zip(&tops) {
            assert!(segment.top() <= before);
        }
        assert!(segments[0].top() < tops[0]);

        let sunk = segments[0];
        assert_eq!(
            world.rubble_hit_test(Vec2::new(11.0, sunk.base() - 0.1)),
            None
        );
        assert_eq!(
            world.rubble_hit_test(Vec2::new(11.0, sunk.top() - 0.1)),
            Some(sunk.id())
        );
        assert_eq!(
            world.surface_y(11.0),
            sunk.top().max(world.terrain_height(11.0))
        );
    }

    #[test]
    fn surface_profile_covers_every_column() {
        let world = flat_world();
        let profile = query::surface_profile(&world);
        assert_eq!(profile.len(), 24);
        assert!(profile.iter().all(|&height| height == 12.0));
    }
}
