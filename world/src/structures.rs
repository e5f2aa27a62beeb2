//! Buildings, their floors, and the rubble they leave behind.

use std::collections::BTreeMap;

use tanx_core::{BuildingId, RubbleId, StructureDamage, StructureTarget};

/// Vertical extent of a single floor.
pub const FLOOR_HEIGHT: f32 = 1.5;
/// Hit points of a freshly built floor.
pub const FLOOR_HP: u32 = 50;
/// Countdown started when a building loses its ground floor.
pub const COLLAPSE_DELAY: f32 = 1.2;
/// Countdown started when a building has no floors left at all.
pub const EMPTY_COLLAPSE_DELAY: f32 = 0.8;
/// Horizontal span of each rubble segment emitted by a collapse.
pub const RUBBLE_SEGMENT_WIDTH: f32 = 2.0;
/// Tallest building the urban generator will raise.
pub const MAX_GENERATED_FLOORS: u32 = 6;

const RUBBLE_HEIGHT_RATIO: f32 = 0.4;
const MIN_RUBBLE_HEIGHT: f32 = 0.6;
const RUBBLE_HP_PER_HEIGHT: f32 = 20.0;
const MIN_RUBBLE_HP: u32 = 10;

/// A floor occupying a fixed vertical slot of its building.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Floor {
    level: u32,
    hp: u32,
    max_hp: u32,
}

impl Floor {
    /// Vertical slot, zero being the ground floor.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Hit points the floor was built with.
    #[must_use]
    pub const fn max_hp(&self) -> u32 {
        self.max_hp
    }

    fn bottom(&self, base: f32) -> f32 {
        base + self.level as f32 * FLOOR_HEIGHT
    }
}

/// Where a building stands in the collapse pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CollapseStage {
    /// Structurally sound.
    Standing,
    /// Lost its support and counts down towards collapse.
    Pending {
        /// Simulation time left before the building is ready to collapse.
        remaining: f32,
    },
    /// Countdown elapsed; waiting for finalization.
    Ready,
    /// Converted into rubble.
    Collapsed,
}

/// Stack of destructible floors standing on a leveled footprint.
#[derive(Clone, Debug, PartialEq)]
pub struct Building {
    id: BuildingId,
    left: i32,
    width: u32,
    base: f32,
    floors: Vec<Floor>,
    stage: CollapseStage,
}

impl Building {
    /// Identifier of the building.
    #[must_use]
    pub const fn id(&self) -> BuildingId {
        self.id
    }

    /// Leftmost column covered by the footprint.
    #[must_use]
    pub const fn left(&self) -> i32 {
        self.left
    }

    /// Number of columns covered by the footprint.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Column just past the right edge of the footprint.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.left + self.width as i32
    }

    /// Elevation of the leveled ground the building stands on.
    #[must_use]
    pub const fn base(&self) -> f32 {
        self.base
    }

    /// Remaining floors ordered bottom to top.
    #[must_use]
    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    /// Current collapse stage.
    #[must_use]
    pub const fn stage(&self) -> CollapseStage {
        self.stage
    }

    /// Whether the building has lost its support.
    #[must_use]
    pub fn is_unstable(&self) -> bool {
        self.stage != CollapseStage::Standing
    }

    /// Whether the building has been converted into rubble.
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.stage == CollapseStage::Collapsed
    }

    /// Whether `x` lies within the footprint.
    #[must_use]
    pub fn covers(&self, x: f32) -> bool {
        x >= self.left as f32 && x < self.right() as f32
    }

    /// Elevation of the roof of the highest remaining floor.
    #[must_use]
    pub fn top(&self) -> Option<f32> {
        self.floors
            .last()
            .map(|floor| floor.bottom(self.base) + FLOOR_HEIGHT)
    }

    /// Index of the floor occupying elevation `y`, if any.
    #[must_use]
    pub fn floor_at(&self, y: f32) -> Option<usize> {
        self.floors.iter().position(|floor| {
            let bottom = floor.bottom(self.base);
            y >= bottom && y < bottom + FLOOR_HEIGHT
        })
    }

    /// Whether any floor overlaps the half-open elevation band `[low, high)`.
    #[must_use]
    pub fn occupies(&self, low: f32, high: f32) -> bool {
        self.floors.iter().any(|floor| {
            let bottom = floor.bottom(self.base);
            bottom < high && bottom + FLOOR_HEIGHT > low
        })
    }

    fn schedule_collapse(&mut self, delay: f32) -> bool {
        if self.stage != CollapseStage::Standing {
            return false;
        }
        self.stage = CollapseStage::Pending {
            remaining: delay.max(0.0),
        };
        true
    }
}

/// Low mound left behind by a collapsed building.
#[derive(Clone, Debug, PartialEq)]
pub struct RubbleSegment {
    id: RubbleId,
    left: f32,
    right: f32,
    base: f32,
    height: f32,
    hp: u32,
}

impl RubbleSegment {
    /// Identifier of the segment.
    #[must_use]
    pub const fn id(&self) -> RubbleId {
        self.id
    }

    /// Left edge of the segment.
    #[must_use]
    pub const fn left(&self) -> f32 {
        self.left
    }

    /// Right edge of the segment.
    #[must_use]
    pub const fn right(&self) -> f32 {
        self.right
    }

    /// Ground elevation the segment rests on.
    #[must_use]
    pub const fn base(&self) -> f32 {
        self.base
    }

    /// Height of the mound above its base.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Remaining hit points.
    #[must_use]
    pub const fn hp(&self) -> u32 {
        self.hp
    }

    /// Elevation of the top of the mound.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.base + self.height
    }

    /// Whether `x` lies within the segment's span.
    #[must_use]
    pub fn covers(&self, x: f32) -> bool {
        x >= self.left && x < self.right
    }
}

/// Rubble parameters derived from the floors left standing at collapse time.
pub(crate) fn rubble_profile(floors: u32) -> (f32, u32) {
    let height = (floors as f32 * FLOOR_HEIGHT * RUBBLE_HEIGHT_RATIO).max(MIN_RUBBLE_HEIGHT);
    let hp = ((height * RUBBLE_HP_PER_HEIGHT).round() as u32).max(MIN_RUBBLE_HP);
    (height, hp)
}

/// Owns every building and rubble segment in a world.
#[derive(Clone, Debug, Default)]
pub(crate) struct StructureRegistry {
    buildings: BTreeMap<BuildingId, Building>,
    rubble: BTreeMap<RubbleId, RubbleSegment>,
    next_building: u32,
    next_rubble: u32,
}

impl StructureRegistry {
    pub(crate) fn insert_building(
        &mut self,
        left: i32,
        width: u32,
        base: f32,
        floors: u32,
    ) -> BuildingId {
        let id = BuildingId::new(self.next_building);
        self.next_building += 1;
        let floors = (0..floors)
            .map(|level| Floor {
                level,
                hp: FLOOR_HP,
                max_hp: FLOOR_HP,
            })
            .collect();
        let _ = self.buildings.insert(
            id,
            Building {
                id,
                left,
                width,
                base,
                floors,
                stage: CollapseStage::Standing,
            },
        );
        id
    }

    pub(crate) fn insert_rubble(
        &mut self,
        left: f32,
        right: f32,
        base: f32,
        floors: u32,
    ) -> RubbleId {
        let id = RubbleId::new(self.next_rubble);
        self.next_rubble += 1;
        let (height, hp) = rubble_profile(floors);
        let _ = self.rubble.insert(
            id,
            RubbleSegment {
                id,
                left,
                right,
                base,
                height,
                hp,
            },
        );
        id
    }

    pub(crate) fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub(crate) fn buildings(&self) -> impl Iterator<Item = &Building> {
        self.buildings.values()
    }

    pub(crate) fn rubble_segment(&self, id: RubbleId) -> Option<&RubbleSegment> {
        self.rubble.get(&id)
    }

    pub(crate) fn rubble(&self) -> impl Iterator<Item = &RubbleSegment> {
        self.rubble.values()
    }

    /// Removes hit points from one floor.
    ///
    /// A floor reaching zero leaves the stack; the floors around it keep
    /// their slots and hit points. A building left without its ground floor
    /// is scheduled for collapse.
    pub(crate) fn damage_floor(
        &mut self,
        id: BuildingId,
        index: usize,
        amount: u32,
    ) -> Option<StructureDamage> {
        let building = self.buildings.get_mut(&id)?;
        if building.is_collapsed() {
            return None;
        }
        let floor = building.floors.get_mut(index)?;
        let dealt = amount.min(floor.hp);
        floor.hp -= dealt;
        let level = floor.level;
        let remaining_hp = floor.hp;

        let mut destroyed = false;
        let mut collapse_scheduled = false;
        if remaining_hp == 0 {
            destroyed = true;
            let _ = building.floors.remove(index);
            let ground_lost = building
                .floors
                .first()
                .map_or(true, |floor| floor.level != 0);
            if ground_lost {
                let delay = if building.floors.is_empty() {
                    EMPTY_COLLAPSE_DELAY
                } else {
                    COLLAPSE_DELAY
                };
                collapse_scheduled = building.schedule_collapse(delay);
            }
        }

        Some(StructureDamage {
            target: StructureTarget::Floor {
                building: id,
                level,
            },
            amount: dealt,
            remaining_hp,
            destroyed,
            collapse_scheduled,
        })
    }

    /// Removes hit points from a rubble segment, deleting it at zero.
    pub(crate) fn damage_rubble(&mut self, id: RubbleId, amount: u32) -> Option<StructureDamage> {
        let segment = self.rubble.get_mut(&id)?;
        let dealt = amount.min(segment.hp);
        segment.hp -= dealt;
        let remaining_hp = segment.hp;
        let destroyed = remaining_hp == 0;
        if destroyed {
            let _ = self.rubble.remove(&id);
        }
        Some(StructureDamage {
            target: StructureTarget::Rubble { segment: id },
            amount: dealt,
            remaining_hp,
            destroyed,
            collapse_scheduled: false,
        })
    }

    /// Drops every rubble segment onto the lowest ground beneath it.
    pub(crate) fn reseat_rubble(&mut self, ground: impl Fn(f32, f32) -> f32) {
        for segment in self.rubble.values_mut() {
            segment.base = segment.base.min(ground(segment.left, segment.right));
        }
    }

    pub(crate) fn schedule_collapse(&mut self, id: BuildingId, delay: f32) -> bool {
        self.buildings
            .get_mut(&id)
            .map_or(false, |building| building.schedule_collapse(delay))
    }

    /// Advances every pending countdown, returning buildings that just became ready.
    pub(crate) fn tick(&mut self, dt: f32) -> Vec<BuildingId> {
        let dt = dt.max(0.0);
        let mut ready = Vec::new();
        for (id, building) in &mut self.buildings {
            if let CollapseStage::Pending { remaining } = building.stage {
                let left = remaining - dt;
                if left <= 0.0 {
                    building.stage = CollapseStage::Ready;
                    ready.push(*id);
                } else {
                    building.stage = CollapseStage::Pending { remaining: left };
                }
            }
        }
        ready
    }

    /// Clears the floors of a ready building and marks it collapsed.
    ///
    /// Returns the number of floors that were still standing.
    pub(crate) fn mark_collapsed(&mut self, id: BuildingId) -> Option<u32> {
        let building = self.buildings.get_mut(&id)?;
        if building.stage != CollapseStage::Ready {
            return None;
        }
        let floors = building.floors.len() as u32;
        building.floors.clear();
        building.stage = CollapseStage::Collapsed;
        Some(floors)
    }
}
