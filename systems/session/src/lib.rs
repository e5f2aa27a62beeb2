#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn session driving a Tanx duel.
//!
//! The session owns the [`Game`] and decides whose turn it is. Shots are split
//! into three steps so front ends can animate them: [`Session::begin_projectile`]
//! computes the path without touching anything, [`Session::update_projectile`]
//! walks a cursor along it, and [`Session::resolve_projectile`] applies the
//! damage, awards superpower charge and passes the turn. Everything observable
//! is buffered as [`Event`] values until the driver drains them.

mod charge;

use glam::Vec2;
use tanx_core::{
    CollapseOutcome, Direction, Event, Impact, MatchOutcome, SessionPhase, SessionSnapshot,
    ShotResult, StructureTarget, TankDamage, TankId,
};
use tanx_system_ballistics::{DamageProfile, Game, GameError};
use tanx_world::Tank;
use thiserror::Error;
use tracing::{debug, info};

const MIN_PROJECTILE_INTERVAL: f32 = 1e-3;
const FULL_CHARGE: f32 = 1.0;

/// Pacing knobs for the session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Seconds between consecutive path samples while a shell is animated.
    pub projectile_interval: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            projectile_interval: 0.03,
        }
    }
}

/// Errors raised when the driver issues a command the session cannot accept.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SessionError {
    /// Resolution was requested but no shell is in flight.
    #[error("no projectile is in flight")]
    NoProjectileInFlight,
    /// A turn command arrived while the session was busy.
    #[error("session is not idle (phase {phase:?})")]
    NotIdle {
        /// Phase the session was in.
        phase: SessionPhase,
    },
    /// A tank tried to fire out of turn.
    #[error("it is {expected:?}'s turn, not {requested:?}'s")]
    NotYourTurn {
        /// Tank whose turn it is.
        expected: TankId,
        /// Tank that tried to act.
        requested: TankId,
    },
    /// The current tank has not built up a full charge.
    #[error("superpower charge is only {charge:.2}")]
    SuperpowerNotReady {
        /// Charge held by the current tank.
        charge: f32,
    },
    /// A superpower command arrived while no superpower was active.
    #[error("no superpower is active")]
    NoActiveSuperpower,
    /// The match already ended.
    #[error("the match is over")]
    MatchOver,
    /// The ballistics engine rejected the request.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Progress reported by [`Session::update_projectile`].
#[derive(Clone, Debug, PartialEq)]
pub enum ProjectileStep {
    /// No shell is being animated.
    Idle,
    /// The shell is still travelling.
    InFlight {
        /// Interpolated shell position.
        position: Vec2,
        /// Path samples the shell passed during this update.
        trail: Vec<Vec2>,
    },
    /// The shell reached the end of its path; resolve it next.
    Finished,
}

#[derive(Clone, Debug)]
struct Flight {
    result: ShotResult,
    cursor: usize,
    timer: f32,
}

/// Owned state of one match.
#[derive(Clone, Debug)]
pub struct Session {
    game: Game,
    config: SessionConfig,
    current: usize,
    phase: SessionPhase,
    flight: Option<Flight>,
    charges: Vec<f32>,
    outcome: Option<MatchOutcome>,
    message: String,
    events: Vec<Event>,
}

impl Session {
    /// Starts a match on `game` with the left tank to move.
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self::with_config(game, SessionConfig::default())
    }

    /// Starts a match with custom pacing.
    #[must_use]
    pub fn with_config(game: Game, config: SessionConfig) -> Self {
        let charges = vec![0.0; game.tanks().len()];
        let mut session = Self {
            game,
            config,
            current: 0,
            phase: SessionPhase::Idle,
            flight: None,
            charges,
            outcome: None,
            message: String::new(),
            events: Vec::new(),
        };
        session.message = format!("{}'s turn", session.current_tank().name());
        session
    }

    /// Ballistics engine driven by this session.
    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Mutable access to the engine for scenario setup.
    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    /// Pacing in use.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Tank whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> TankId {
        self.current_tank().id()
    }

    /// Current state machine phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Outcome once the match has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<MatchOutcome> {
        self.outcome
    }

    /// Human-readable status line.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Superpower charge held by `tank`, zero for unknown tanks.
    #[must_use]
    pub fn charge(&self, tank: TankId) -> f32 {
        self.index_of(tank)
            .map_or(0.0, |index| self.charges[index])
    }

    /// Shot currently being animated or awaiting resolution.
    #[must_use]
    pub fn active_shot(&self) -> Option<&ShotResult> {
        self.flight.as_ref().map(|flight| &flight.result)
    }

    /// Read-only view of the whole session.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_player: self.current_player(),
            phase: self.phase,
            charges: self.charges.clone(),
            outcome: self.outcome,
            message: self.message.clone(),
            tanks: self.game.snapshots(),
        }
    }

    /// Moves every buffered event into `out`, oldest first.
    pub fn drain_events(&mut self, out: &mut Vec<Event>) {
        out.append(&mut self.events);
    }

    /// Drives the current tank one column.
    ///
    /// Moving never ends the turn; a rejected move leaves the tank in place
    /// and returns `false`.
    pub fn attempt_move(&mut self, direction: Direction) -> Result<bool, SessionError> {
        self.ensure_idle()?;
        let tank = self.current_player();
        let moved = self.game.move_tank(tank, direction)?;
        let name = self.current_tank().name().to_owned();
        self.message = if moved {
            format!("{name} moves {}", direction_label(direction))
        } else {
            format!("{name} cannot move {}", direction_label(direction))
        };
        Ok(moved)
    }

    /// Rotates the current tank's turret by `delta` degrees.
    pub fn adjust_turret(&mut self, delta: i32) -> Result<i32, SessionError> {
        self.ensure_idle()?;
        let id = self.current_player();
        let tank = self
            .game
            .tank_mut(id)
            .ok_or(GameError::UnknownTank(id))?;
        tank.adjust_turret(delta);
        Ok(tank.turret_angle())
    }

    /// Changes the current tank's shot power by `delta`.
    pub fn adjust_power(&mut self, delta: f32) -> Result<f32, SessionError> {
        self.ensure_idle()?;
        let id = self.current_player();
        let tank = self
            .game
            .tank_mut(id)
            .ok_or(GameError::UnknownTank(id))?;
        tank.adjust_power(delta);
        Ok(tank.shot_power())
    }

    /// Fires the current tank's shell and starts animating it.
    ///
    /// The path is computed up front and nothing is mutated until
    /// [`Session::resolve_projectile`].
    pub fn begin_projectile(&mut self, shooter: TankId) -> Result<&ShotResult, SessionError> {
        self.ensure_idle()?;
        let expected = self.current_player();
        if shooter != expected {
            return Err(SessionError::NotYourTurn {
                expected,
                requested: shooter,
            });
        }

        let aim = self.current_tank().aim();
        let result = self.game.step_projectile(shooter, false)?;
        debug!(
            shooter = shooter.get(),
            angle = aim.angle,
            power = aim.power,
            samples = result.path.len(),
            "projectile launched"
        );
        self.events.push(Event::ShotFired { shooter, aim });
        self.message = format!("{} fires!", self.current_tank().name());
        self.phase = SessionPhase::ProjectileInFlight;

        let flight = self.flight.insert(Flight {
            result,
            cursor: 0,
            timer: 0.0,
        });
        Ok(&flight.result)
    }

    /// Advances the in-flight shell by `dt` seconds.
    ///
    /// The cursor moves one path sample per projectile interval. Once it
    /// passes the last sample the session enters the resolving phase and
    /// [`ProjectileStep::Finished`] is returned until the shot is resolved.
    pub fn update_projectile(&mut self, dt: f32) -> ProjectileStep {
        match self.phase {
            SessionPhase::ProjectileInFlight => {}
            SessionPhase::Resolving => return ProjectileStep::Finished,
            _ => return ProjectileStep::Idle,
        }
        let Some(flight) = self.flight.as_mut() else {
            return ProjectileStep::Idle;
        };

        let path = &flight.result.path;
        let interval = self.config.projectile_interval.max(MIN_PROJECTILE_INTERVAL);
        flight.timer += dt.max(0.0);

        let mut trail = Vec::new();
        while flight.cursor < path.len() && flight.timer >= interval {
            flight.timer -= interval;
            flight.cursor += 1;
            if let Some(sample) = path.get(flight.cursor) {
                trail.push(*sample);
            }
        }

        if flight.cursor + 1 >= path.len() {
            flight.cursor = path.len();
            self.phase = SessionPhase::Resolving;
            return ProjectileStep::Finished;
        }

        let from = path[flight.cursor];
        let to = path[flight.cursor + 1];
        ProjectileStep::InFlight {
            position: from.lerp(to, flight.timer / interval),
            trail,
        }
    }

    /// Applies the stored shot, awards charge and passes the turn.
    ///
    /// Charge is judged against the tanks as they stood before the impact.
    ///
    /// May be called before the animation finished, in which case the rest
    /// of the flight is skipped. The turn does not pass when the shot ended
    /// the match.
    pub fn resolve_projectile(&mut self) -> Result<ShotResult, SessionError> {
        if !matches!(
            self.phase,
            SessionPhase::ProjectileInFlight | SessionPhase::Resolving
        ) {
            return Err(SessionError::NoProjectileInFlight);
        }
        let flight = self.flight.take().ok_or(SessionError::NoProjectileInFlight)?;

        let gain = charge::shot_gain(&self.game, &flight.result);
        let result = self.game.apply_shot_effects(flight.result);
        self.record_shot(&result);
        self.message = self.impact_message(&result.impact);

        let index = self.current;
        self.charges[index] = (self.charges[index] + gain).clamp(0.0, FULL_CHARGE);
        self.events.push(Event::SuperpowerCharged {
            tank: result.shooter,
            charge: self.charges[index],
        });

        if !self.check_victory() {
            self.advance_turn();
        }
        Ok(result)
    }

    /// Drops the in-flight shot without applying any of its effects.
    ///
    /// The same tank keeps its turn. Returns `false` when nothing was in
    /// flight.
    pub fn abandon_shot(&mut self) -> bool {
        if !matches!(
            self.phase,
            SessionPhase::ProjectileInFlight | SessionPhase::Resolving
        ) {
            return false;
        }
        self.flight = None;
        self.phase = SessionPhase::Idle;
        self.message = format!("{}'s turn", self.current_tank().name());
        debug!(player = self.current_player().get(), "shot abandoned");
        true
    }

    /// Spends the current tank's full charge to start a superpower.
    pub fn activate_superpower(&mut self) -> Result<(), SessionError> {
        self.ensure_idle()?;
        let charge = self.charges[self.current];
        if charge < FULL_CHARGE {
            return Err(SessionError::SuperpowerNotReady { charge });
        }
        self.charges[self.current] = 0.0;
        self.phase = SessionPhase::Superpower;

        let tank = self.current_player();
        self.events.push(Event::SuperpowerActivated { tank });
        self.message = format!("{} unleashes a superpower!", self.current_tank().name());
        info!(tank = tank.get(), "superpower activated");
        Ok(())
    }

    /// Lands one strike of the active superpower at `point`.
    ///
    /// The match may end here, in which case the superpower ends with it.
    pub fn superpower_strike(
        &mut self,
        point: Vec2,
        profile: DamageProfile,
    ) -> Result<ShotResult, SessionError> {
        if self.phase != SessionPhase::Superpower {
            return Err(self.superpower_error());
        }
        let owner = self.current_player();
        let result = self.game.strike(owner, point, profile)?;
        self.record_shot(&result);
        let _ = self.check_victory();
        Ok(result)
    }

    /// Ends the active superpower and hands control back to the same tank.
    pub fn complete_superpower(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Superpower {
            return Err(self.superpower_error());
        }
        self.phase = SessionPhase::Idle;
        let tank = self.current_player();
        self.events.push(Event::SuperpowerCompleted { tank });
        self.message = format!("{}'s turn", self.current_tank().name());
        debug!(tank = tank.get(), "superpower completed");
        Ok(())
    }

    /// Ticks collapsing buildings and applies their damage pulses.
    ///
    /// Collapses may end the match but never pass the turn.
    pub fn update_structures(&mut self, dt: f32) -> Vec<CollapseOutcome> {
        let outcomes = self.game.update_collapses(dt);
        for outcome in &outcomes {
            self.events.push(Event::BuildingCollapsed {
                outcome: outcome.clone(),
            });
            self.record_damage(&outcome.damage, &outcome.fatalities);
        }
        if !outcomes.is_empty() && self.outcome.is_none() {
            let _ = self.check_victory();
        }
        outcomes
    }

    fn current_tank(&self) -> &Tank {
        &self.game.tanks()[self.current]
    }

    fn index_of(&self, tank: TankId) -> Option<usize> {
        self.game.tanks().iter().position(|candidate| candidate.id() == tank)
    }

    fn ensure_idle(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Idle => Ok(()),
            SessionPhase::GameOver => Err(SessionError::MatchOver),
            phase => Err(SessionError::NotIdle { phase }),
        }
    }

    fn superpower_error(&self) -> SessionError {
        if self.phase == SessionPhase::GameOver {
            SessionError::MatchOver
        } else {
            SessionError::NoActiveSuperpower
        }
    }

    fn name_of(&self, tank: TankId) -> &str {
        self.game.tank(tank).map_or("unknown", Tank::name)
    }

    fn impact_message(&self, impact: &Impact) -> String {
        match impact {
            Impact::Tank { tank, .. } => format!("Direct hit on {}!", self.name_of(*tank)),
            Impact::Building { .. } => "Shot struck a building.".to_owned(),
            Impact::Rubble { .. } => "Shot struck the rubble.".to_owned(),
            Impact::Ground { .. } => "Shot impacted the terrain.".to_owned(),
            Impact::OutOfBounds => "Shot flew off into the distance.".to_owned(),
        }
    }

    fn record_shot(&mut self, result: &ShotResult) {
        self.events.push(Event::ShotResolved {
            shooter: result.shooter,
            kind: result.impact.kind(),
            point: result.impact.point(),
        });
        if let Some(crater) = result.crater {
            self.events.push(Event::CraterCarved { crater });
        }
        for damage in &result.structures {
            match damage.target {
                StructureTarget::Floor { building, level } => {
                    if damage.destroyed {
                        self.events.push(Event::FloorDestroyed { building, level });
                    }
                    if damage.collapse_scheduled {
                        self.events.push(Event::BuildingUnstable { building });
                    }
                }
                StructureTarget::Rubble { segment } => {
                    if damage.destroyed {
                        self.events.push(Event::RubbleCleared { segment });
                    }
                }
            }
        }
        self.record_damage(&result.damage, &result.fatalities);
    }

    fn record_damage(&mut self, damage: &[TankDamage], fatalities: &[TankId]) {
        self.events
            .extend(damage.iter().map(|damage| Event::TankDamaged { damage: *damage }));
        self.events
            .extend(fatalities.iter().map(|&tank| Event::TankDestroyed { tank }));
    }

    /// Ends the match once at most one tank is left standing.
    fn check_victory(&mut self) -> bool {
        let alive = self.game.alive_tanks();
        let outcome = match alive.as_slice() {
            [] => MatchOutcome::Draw,
            [winner] => MatchOutcome::Winner(*winner),
            _ => return false,
        };

        self.message = match outcome {
            MatchOutcome::Winner(winner) => {
                let loser = self
                    .game
                    .tanks()
                    .iter()
                    .find(|tank| tank.id() != winner)
                    .map_or("everyone else", Tank::name);
                format!("{} wins! {loser} is destroyed.", self.name_of(winner))
            }
            MatchOutcome::Draw => "Both tanks destroyed!".to_owned(),
        };
        self.outcome = Some(outcome);
        self.phase = SessionPhase::GameOver;
        self.flight = None;
        self.events.push(Event::MatchEnded { outcome });
        info!(?outcome, "match ended");
        true
    }

    fn advance_turn(&mut self) {
        let count = self.game.tanks().len();
        let next = (1..=count)
            .map(|offset| (self.current + offset) % count)
            .find(|&index| self.game.tanks()[index].is_alive())
            .unwrap_or(self.current);
        self.current = next;
        self.phase = SessionPhase::Idle;

        let player = self.current_player();
        let announcement = format!(" Next: {}'s turn", self.current_tank().name());
        self.message.push_str(&announcement);
        self.events.push(Event::TurnChanged { player });
        info!(player = player.get(), "turn changed");
    }
}

fn direction_label(direction: Direction) -> &'static str {
    match direction {
        Direction::Left => "left",
        Direction::Right => "right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tanx_core::{TerrainSettings, TerrainStyle};

    fn flat_session() -> Session {
        let settings = TerrainSettings {
            width: 24,
            height: 24,
            min_height: 12.0,
            max_height: 12.0,
            smoothing: 0,
            detail: 4,
            style: TerrainStyle::Classic,
            seed: Some(11),
        };
        Session::new(Game::new(&settings).expect("game"))
    }

    #[test]
    fn matches_open_with_the_left_tank_idle() {
        let session = flat_session();
        assert_eq!(session.current_player(), TankId::new(0));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.message(), "Player 1's turn");
        assert_eq!(session.snapshot().charges, vec![0.0, 0.0]);
    }

    #[test]
    fn moving_keeps_the_turn() {
        let mut session = flat_session();
        assert_eq!(session.attempt_move(Direction::Right), Ok(true));
        assert_eq!(session.current_player(), TankId::new(0));
        assert_eq!(session.game().tanks()[0].column(), 3);
    }

    #[test]
    fn only_the_current_tank_may_fire() {
        let mut session = flat_session();
        let error = session.begin_projectile(TankId::new(1)).unwrap_err();
        assert_eq!(
            error,
            SessionError::NotYourTurn {
                expected: TankId::new(0),
                requested: TankId::new(1),
            }
        );
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn resolving_without_a_shot_is_rejected() {
        let mut session = flat_session();
        assert_eq!(
            session.resolve_projectile(),
            Err(SessionError::NoProjectileInFlight)
        );
        assert_eq!(session.update_projectile(0.1), ProjectileStep::Idle);
    }

    #[test]
    fn commands_are_refused_while_a_shell_flies() {
        let mut session = flat_session();
        let _ = session.begin_projectile(TankId::new(0)).expect("fire");
        assert_eq!(
            session.adjust_turret(5),
            Err(SessionError::NotIdle {
                phase: SessionPhase::ProjectileInFlight
            })
        );
        assert!(session.attempt_move(Direction::Left).is_err());
    }

    #[test]
    fn abandoned_shots_leave_no_trace() {
        let mut session = flat_session();
        let terrain = session.game().world().terrain().clone();
        let _ = session.begin_projectile(TankId::new(0)).expect("fire");

        assert!(session.abandon_shot());
        assert!(!session.abandon_shot());
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert_eq!(session.current_player(), TankId::new(0));
        assert_eq!(session.game().world().terrain(), &terrain);
        assert!(session.active_shot().is_none());
    }

    #[test]
    fn superpowers_need_a_full_charge() {
        let mut session = flat_session();
        assert_eq!(
            session.activate_superpower(),
            Err(SessionError::SuperpowerNotReady { charge: 0.0 })
        );
        assert_eq!(
            session.complete_superpower(),
            Err(SessionError::NoActiveSuperpower)
        );
    }

    #[test]
    fn animation_walks_the_path_until_it_finishes() {
        let mut session = flat_session();
        let samples = session
            .begin_projectile(TankId::new(0))
            .expect("fire")
            .path
            .len();

        let mut visited = 0;
        let mut finished = false;
        for _ in 0..10_000 {
            match session.update_projectile(0.05) {
                ProjectileStep::InFlight { trail, .. } => visited += trail.len(),
                ProjectileStep::Finished => {
                    finished = true;
                    break;
                }
                ProjectileStep::Idle => panic!("shell vanished"),
            }
        }

        assert!(finished);
        assert!(visited < samples);
        assert_eq!(session.phase(), SessionPhase::Resolving);
        assert_eq!(session.update_projectile(0.05), ProjectileStep::Finished);
    }
}
