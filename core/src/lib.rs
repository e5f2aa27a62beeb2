#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tanx simulation.
//!
//! This crate defines the vocabulary that connects the authoritative world,
//! the ballistics engine, the turn session, and any front end driving them.
//! Front ends issue player intents to the session, the session resolves them
//! against the ballistics engine and the world, and then broadcasts [`Event`]
//! values describing what happened. Read-only snapshots let adapters and
//! search code observe state without touching it.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest width or height, in cells, accepted for a generated world.
pub const MIN_WORLD_DIMENSION: u32 = 8;

/// Largest width or height, in cells, accepted for a generated world.
pub const MAX_WORLD_DIMENSION: u32 = 1024;

/// Most height samples per cell the terrain field may take.
pub const MAX_DETAIL: u32 = 32;

/// Most smoothing passes a generated surface may receive.
pub const MAX_SMOOTHING: u32 = 64;

/// Lowest elevation the terrain may ever be carved down to.
pub const BEDROCK_ELEVATION: f32 = 0.5;

/// Horizontal directions available to tanks, used both for facing and movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing x.
    Left,
    /// Toward increasing x.
    Right,
}

impl Direction {
    /// Signed unit step along the x axis.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Unique identifier assigned to a tank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TankId(u32);

impl TankId {
    /// Creates a new tank identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(u32);

impl BuildingId {
    /// Creates a new building identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a rubble segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RubbleId(u32);

impl RubbleId {
    /// Creates a new rubble identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Landscape flavour produced by world generation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainStyle {
    /// Smoothed rolling hills without structures.
    #[default]
    Classic,
    /// Flat city-block platforms carrying destructible buildings.
    Urban,
}

/// Parameters that fully determine a generated world.
///
/// Two worlds generated from equal settings carrying the same seed are
/// bit-identical. Settings are consumed once by generation and never consulted
/// again afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainSettings {
    /// Number of cells spanning the world horizontally.
    pub width: u32,
    /// Number of cells spanning the world vertically.
    pub height: u32,
    /// Lowest elevation the generator may place the surface at.
    pub min_height: f32,
    /// Highest elevation the generator may place the surface at.
    pub max_height: f32,
    /// Number of smoothing passes applied to the freshly generated surface.
    pub smoothing: u32,
    /// Height samples taken per cell. Values below two are raised to two.
    pub detail: u32,
    /// Landscape flavour to generate.
    pub style: TerrainStyle,
    /// Seed feeding the generator. `None` draws a seed once at generation time.
    pub seed: Option<u64>,
}

impl Default for TerrainSettings {
    fn default() -> Self {
        Self {
            width: 48,
            height: 36,
            min_height: 10.0,
            max_height: 24.0,
            smoothing: 3,
            detail: 6,
            style: TerrainStyle::Classic,
            seed: None,
        }
    }
}

impl TerrainSettings {
    /// Returns a copy of the settings using the provided seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns a copy of the settings using the provided style.
    #[must_use]
    pub fn with_style(mut self, style: TerrainStyle) -> Self {
        self.style = style;
        self
    }

    /// Sampling resolution actually used by the terrain field.
    #[must_use]
    pub fn effective_detail(&self) -> u32 {
        self.detail.max(2)
    }

    /// Checks that the settings describe a world that can be generated.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.width < MIN_WORLD_DIMENSION || self.height < MIN_WORLD_DIMENSION {
            return Err(SettingsError::TooSmall {
                width: self.width,
                height: self.height,
            });
        }
        for (setting, value, max) in [
            ("width", self.width, MAX_WORLD_DIMENSION),
            ("height", self.height, MAX_WORLD_DIMENSION),
            ("detail", self.detail, MAX_DETAIL),
            ("smoothing", self.smoothing, MAX_SMOOTHING),
        ] {
            if value > max {
                return Err(SettingsError::OutOfRange {
                    setting,
                    value,
                    max,
                });
            }
        }
        if !self.min_height.is_finite() || !self.max_height.is_finite() {
            return Err(SettingsError::NonFiniteHeight);
        }
        if self.min_height < 1.0 {
            return Err(SettingsError::BelowBedrock {
                min_height: self.min_height,
            });
        }
        if self.max_height < self.min_height {
            return Err(SettingsError::InvertedRange {
                min_height: self.min_height,
                max_height: self.max_height,
            });
        }
        let ceiling = self.height as f32 - 2.0;
        if self.max_height > ceiling {
            return Err(SettingsError::AboveCeiling {
                max_height: self.max_height,
                ceiling,
            });
        }
        Ok(())
    }
}

/// Reasons terrain settings may be rejected before generation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SettingsError {
    /// The requested world is smaller than the supported minimum.
    #[error("world of {width}x{height} cells is below the {MIN_WORLD_DIMENSION}-cell minimum")]
    TooSmall {
        /// Requested width in cells.
        width: u32,
        /// Requested height in cells.
        height: u32,
    },
    /// A size or resolution setting exceeds what generation supports.
    #[error("{setting} of {value} exceeds the supported maximum of {max}")]
    OutOfRange {
        /// Name of the offending setting.
        setting: &'static str,
        /// Requested value.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// One of the elevation bounds is NaN or infinite.
    #[error("terrain elevation bounds must be finite")]
    NonFiniteHeight,
    /// The minimum elevation would leave no solid ground.
    #[error("minimum elevation {min_height} must be at least 1")]
    BelowBedrock {
        /// Requested minimum elevation.
        min_height: f32,
    },
    /// The elevation range is inverted.
    #[error("maximum elevation {max_height} is below minimum elevation {min_height}")]
    InvertedRange {
        /// Requested minimum elevation.
        min_height: f32,
        /// Requested maximum elevation.
        max_height: f32,
    },
    /// The maximum elevation leaves no headroom for projectiles and tanks.
    #[error("maximum elevation {max_height} exceeds the {ceiling} ceiling")]
    AboveCeiling {
        /// Requested maximum elevation.
        max_height: f32,
        /// Highest elevation the world height allows.
        ceiling: f32,
    },
}

/// Launch parameters for a single shell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Turret elevation in degrees relative to the tank's facing.
    pub angle: i32,
    /// Multiplier applied to the base projectile speed.
    pub power: f32,
}

impl Aim {
    /// Creates launch parameters from an angle and a power multiplier.
    #[must_use]
    pub const fn new(angle: i32, power: f32) -> Self {
        Self { angle, power }
    }
}

/// Classification of what terminated a projectile's flight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactKind {
    /// The shell struck a tank's body.
    Tank,
    /// The shell struck a building floor.
    Building,
    /// The shell struck a rubble segment.
    Rubble,
    /// The shell struck the terrain.
    Ground,
    /// The shell left the world or ran out of flight time.
    OutOfBounds,
}

/// Terminal impact of a projectile together with what it struck.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Impact {
    /// Direct hit on a tank other than the shooter.
    Tank {
        /// Tank that was struck.
        tank: TankId,
        /// World position of the impact.
        point: Vec2,
    },
    /// Hit on a building floor.
    Building {
        /// Building that was struck.
        building: BuildingId,
        /// Index of the struck floor within the building's current stack.
        floor: usize,
        /// World position of the impact.
        point: Vec2,
    },
    /// Hit on a rubble segment.
    Rubble {
        /// Segment that was struck.
        segment: RubbleId,
        /// World position of the impact.
        point: Vec2,
    },
    /// Hit on the terrain surface.
    Ground {
        /// World position of the impact.
        point: Vec2,
    },
    /// The shell exited the horizontal bounds or timed out.
    OutOfBounds,
}

impl Impact {
    /// Reports the classification of the impact without its payload.
    #[must_use]
    pub const fn kind(&self) -> ImpactKind {
        match self {
            Self::Tank { .. } => ImpactKind::Tank,
            Self::Building { .. } => ImpactKind::Building,
            Self::Rubble { .. } => ImpactKind::Rubble,
            Self::Ground { .. } => ImpactKind::Ground,
            Self::OutOfBounds => ImpactKind::OutOfBounds,
        }
    }

    /// World position of the impact, if the shell struck anything.
    #[must_use]
    pub const fn point(&self) -> Option<Vec2> {
        match self {
            Self::Tank { point, .. }
            | Self::Building { point, .. }
            | Self::Rubble { point, .. }
            | Self::Ground { point } => Some(*point),
            Self::OutOfBounds => None,
        }
    }
}

/// Circular crater carved into the terrain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Crater {
    /// Center of the carve in world coordinates.
    pub center: Vec2,
    /// Radius of the carve in world units.
    pub radius: f32,
}

/// Hit points removed from a single tank by one damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TankDamage {
    /// Tank that took damage.
    pub tank: TankId,
    /// Hit points actually removed.
    pub amount: u32,
    /// Hit points remaining after the damage.
    pub hp_after: u32,
}

/// Structure element affected by a damage application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureTarget {
    /// A floor occupying a fixed vertical slot of a building.
    Floor {
        /// Building owning the floor.
        building: BuildingId,
        /// Vertical slot of the floor, zero being the ground floor.
        level: u32,
    },
    /// A rubble segment.
    Rubble {
        /// Segment that was damaged.
        segment: RubbleId,
    },
}

/// Outcome of damaging a structure element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureDamage {
    /// Element that took damage.
    pub target: StructureTarget,
    /// Hit points actually removed.
    pub amount: u32,
    /// Hit points remaining on the element.
    pub remaining_hp: u32,
    /// Whether the element was removed from the world.
    pub destroyed: bool,
    /// Whether the damage handed the owning building to the collapse pipeline.
    pub collapse_scheduled: bool,
}

/// Outcome of simulating one shell.
///
/// Produced fresh for every shot. Only the damage-application step fills in
/// the crater, damage, structure, and fatality fields, and it does so at most
/// once.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShotResult {
    /// Tank credited with the shot.
    pub shooter: TankId,
    /// Sampled projectile positions in flight order.
    pub path: Vec<Vec2>,
    /// Terminal impact and classification.
    pub impact: Impact,
    /// Crater carved by the impact, once effects were applied.
    pub crater: Option<Crater>,
    /// Tanks that lost hit points.
    pub damage: Vec<TankDamage>,
    /// Structure elements that lost hit points.
    pub structures: Vec<StructureDamage>,
    /// Tanks whose hit points reached zero for the first time.
    pub fatalities: Vec<TankId>,
    /// Whether damage application already ran for this result.
    pub effects_applied: bool,
}

impl ShotResult {
    /// Creates an unapplied result for the provided flight.
    #[must_use]
    pub fn new(shooter: TankId, path: Vec<Vec2>, impact: Impact) -> Self {
        Self {
            shooter,
            path,
            impact,
            crater: None,
            damage: Vec::new(),
            structures: Vec::new(),
            fatalities: Vec::new(),
            effects_applied: false,
        }
    }

    /// Reports whether the shell struck the provided tank directly.
    #[must_use]
    pub fn is_direct_hit_on(&self, tank: TankId) -> bool {
        matches!(self.impact, Impact::Tank { tank: struck, .. } if struck == tank)
    }

    /// Total hit points dealt to tanks.
    #[must_use]
    pub fn total_damage(&self) -> u32 {
        self.damage.iter().map(|entry| entry.amount).sum()
    }

    /// Hit points dealt to the provided tank.
    #[must_use]
    pub fn damage_to(&self, tank: TankId) -> u32 {
        self.damage
            .iter()
            .filter(|entry| entry.tank == tank)
            .map(|entry| entry.amount)
            .sum()
    }

    /// Reports whether any tank died from this shot.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.fatalities.is_empty()
    }
}

/// Record of a building converted into rubble.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingCollapse {
    /// Building that collapsed.
    pub building: BuildingId,
    /// Left edge of the former footprint.
    pub left: f32,
    /// Right edge of the former footprint.
    pub right: f32,
    /// Floors still standing when the collapse was finalized.
    pub floors: u32,
    /// Crater carved beneath the footprint.
    pub crater: Crater,
    /// Rubble segments emitted across the footprint, left to right.
    pub rubble: Vec<RubbleId>,
}

impl BuildingCollapse {
    /// Horizontal center of the former footprint.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// Width of the former footprint.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }
}

/// Collapse record extended with the damage pulse it caused.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollapseOutcome {
    /// Finalized collapse.
    pub collapse: BuildingCollapse,
    /// Tanks caught in the collapse footprint.
    pub damage: Vec<TankDamage>,
    /// Tanks killed by the collapse.
    pub fatalities: Vec<TankId>,
}

/// Immutable representation of a single tank used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TankSnapshot {
    /// Identifier assigned to the tank.
    pub id: TankId,
    /// Display name of the tank's commander.
    pub name: String,
    /// Column the tank stands in.
    pub column: i32,
    /// Body center in world coordinates.
    pub center: Vec2,
    /// Elevation of the surface under the tank.
    pub y: f32,
    /// Direction the turret faces.
    pub facing: Direction,
    /// Turret elevation in degrees relative to facing.
    pub turret_angle: i32,
    /// Current shot power multiplier.
    pub shot_power: f32,
    /// Remaining hit points.
    pub hp: u32,
    /// Whether the tank still has hit points.
    pub alive: bool,
}

/// Phases of the turn session state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for the current player to move, aim, or fire.
    Idle,
    /// A shot was computed and is being played out over animation ticks.
    ProjectileInFlight,
    /// The shell reached its impact; effects are about to be applied.
    Resolving,
    /// An external superpower effect is playing out.
    Superpower,
    /// The match ended.
    GameOver,
}

/// Final result of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchOutcome {
    /// Exactly one tank survived.
    Winner(TankId),
    /// Every tank was destroyed in the same resolution.
    Draw,
}

/// Read-only snapshot of the turn session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Tank whose turn it is.
    pub current_player: TankId,
    /// Current state machine phase.
    pub phase: SessionPhase,
    /// Superpower charge per tank, in tank order, each within `0.0..=1.0`.
    pub charges: Vec<f32>,
    /// Outcome once the match ended.
    pub outcome: Option<MatchOutcome>,
    /// Human-readable status line.
    pub message: String,
    /// Snapshots of every tank in tank order.
    pub tanks: Vec<TankSnapshot>,
}

/// Events broadcast by the session after processing player intents and ticks.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A tank launched a shell.
    ShotFired {
        /// Tank that fired.
        shooter: TankId,
        /// Launch parameters used.
        aim: Aim,
    },
    /// A shell's effects were applied.
    ShotResolved {
        /// Tank credited with the shot.
        shooter: TankId,
        /// Classification of the impact.
        kind: ImpactKind,
        /// Impact position, if the shell struck anything.
        point: Option<Vec2>,
    },
    /// Terrain was carved.
    CraterCarved {
        /// Carved crater.
        crater: Crater,
    },
    /// A tank lost hit points.
    TankDamaged {
        /// Damage record.
        damage: TankDamage,
    },
    /// A tank's hit points reached zero.
    TankDestroyed {
        /// Tank that was destroyed.
        tank: TankId,
    },
    /// A building floor lost all hit points and left the stack.
    FloorDestroyed {
        /// Building owning the floor.
        building: BuildingId,
        /// Vertical slot of the destroyed floor.
        level: u32,
    },
    /// A building lost its support and entered the collapse countdown.
    BuildingUnstable {
        /// Building that became unstable.
        building: BuildingId,
    },
    /// A building finished collapsing into rubble.
    BuildingCollapsed {
        /// Collapse record including the caused damage.
        outcome: CollapseOutcome,
    },
    /// A rubble segment was destroyed.
    RubbleCleared {
        /// Segment that was removed.
        segment: RubbleId,
    },
    /// A tank's superpower charge changed after a shot.
    SuperpowerCharged {
        /// Tank whose charge changed.
        tank: TankId,
        /// Charge after the change, within `0.0..=1.0`.
        charge: f32,
    },
    /// A tank spent its full charge on a superpower.
    SuperpowerActivated {
        /// Tank that activated the superpower.
        tank: TankId,
    },
    /// The active superpower finished playing out.
    SuperpowerCompleted {
        /// Tank that owned the superpower.
        tank: TankId,
    },
    /// The turn passed to another tank.
    TurnChanged {
        /// Tank whose turn begins.
        player: TankId,
    },
    /// The match ended.
    MatchEnded {
        /// Final outcome.
        outcome: MatchOutcome,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn default_settings_validate() {
        assert_eq!(TerrainSettings::default().validate(), Ok(()));
    }

    #[test]
    fn settings_reject_tiny_worlds() {
        let settings = TerrainSettings {
            width: 4,
            ..TerrainSettings::default()
        };
        assert_eq!(
            settings.validate(),
            Err(SettingsError::TooSmall {
                width: 4,
                height: 36
            })
        );
    }

    #[test]
    fn settings_reject_oversized_worlds_and_resolutions() {
        let wide = TerrainSettings {
            width: MAX_WORLD_DIMENSION + 1,
            ..TerrainSettings::default()
        };
        assert_eq!(
            wide.validate(),
            Err(SettingsError::OutOfRange {
                setting: "width",
                value: MAX_WORLD_DIMENSION + 1,
                max: MAX_WORLD_DIMENSION,
            })
        );

        let fine = TerrainSettings {
            detail: u32::MAX,
            ..TerrainSettings::default()
        };
        assert!(matches!(
            fine.validate(),
            Err(SettingsError::OutOfRange {
                setting: "detail",
                ..
            })
        ));

        let smooth = TerrainSettings {
            smoothing: MAX_SMOOTHING + 1,
            ..TerrainSettings::default()
        };
        assert!(matches!(
            smooth.validate(),
            Err(SettingsError::OutOfRange {
                setting: "smoothing",
                ..
            })
        ));

        let largest = TerrainSettings {
            width: MAX_WORLD_DIMENSION,
            detail: MAX_DETAIL,
            smoothing: MAX_SMOOTHING,
            ..TerrainSettings::default()
        };
        assert_eq!(largest.validate(), Ok(()));
    }

    #[test]
    fn settings_reject_surface_above_ceiling() {
        let settings = TerrainSettings {
            height: 20,
            max_height: 19.0,
            ..TerrainSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::AboveCeiling { .. })
        ));
    }

    #[test]
    fn settings_reject_inverted_range() {
        let settings = TerrainSettings {
            min_height: 14.0,
            max_height: 12.0,
            ..TerrainSettings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvertedRange { .. })
        ));
    }

    #[test]
    fn detail_is_raised_to_two() {
        let settings = TerrainSettings {
            detail: 0,
            ..TerrainSettings::default()
        };
        assert_eq!(settings.effective_detail(), 2);
    }

    #[test]
    fn impact_reports_kind_and_point() {
        let point = Vec2::new(3.0, 4.0);
        let impact = Impact::Rubble {
            segment: RubbleId::new(2),
            point,
        };
        assert_eq!(impact.kind(), ImpactKind::Rubble);
        assert_eq!(impact.point(), Some(point));
        assert_eq!(Impact::OutOfBounds.point(), None);
    }

    #[test]
    fn shot_result_sums_damage_per_tank() {
        let mut result = ShotResult::new(
            TankId::new(0),
            Vec::new(),
            Impact::Tank {
                tank: TankId::new(1),
                point: Vec2::ZERO,
            },
        );
        result.damage.push(TankDamage {
            tank: TankId::new(1),
            amount: 25,
            hp_after: 75,
        });
        result.damage.push(TankDamage {
            tank: TankId::new(0),
            amount: 3,
            hp_after: 97,
        });

        assert!(result.is_direct_hit_on(TankId::new(1)));
        assert!(!result.is_direct_hit_on(TankId::new(0)));
        assert_eq!(result.total_damage(), 28);
        assert_eq!(result.damage_to(TankId::new(0)), 3);
        assert!(!result.is_fatal());
    }

    #[test]
    fn direction_sign_and_opposite() {
        assert_eq!(Direction::Left.sign(), -1);
        assert_eq!(Direction::Right.sign(), 1);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
    }

    #[test]
    fn terrain_settings_round_trip_through_bincode() {
        assert_round_trip(&TerrainSettings::default().with_seed(7));
    }

    #[test]
    fn events_round_trip_through_bincode() {
        assert_round_trip(&Event::MatchEnded {
            outcome: MatchOutcome::Winner(TankId::new(1)),
        });
        assert_round_trip(&Event::CraterCarved {
            crater: Crater {
                center: Vec2::new(5.5, 12.0),
                radius: 1.8,
            },
        });
    }
}
