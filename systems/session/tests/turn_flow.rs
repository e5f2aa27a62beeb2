use tanx_core::{
    Event, ImpactKind, MatchOutcome, SessionPhase, ShotResult, TankId, TerrainSettings,
    TerrainStyle,
};
use tanx_system_ballistics::{BallisticsConfig, Game};
use tanx_system_session::{ProjectileStep, Session, SessionError};
use tanx_world::FLOOR_HP;

const LEFT: TankId = TankId::new(0);
const RIGHT: TankId = TankId::new(1);

fn flat_settings() -> TerrainSettings {
    TerrainSettings {
        width: 24,
        height: 24,
        min_height: 12.0,
        max_height: 12.0,
        smoothing: 0,
        detail: 4,
        style: TerrainStyle::Classic,
        seed: Some(5),
    }
}

fn zero_gravity() -> BallisticsConfig {
    BallisticsConfig {
        gravity: 0.0,
        ..BallisticsConfig::default()
    }
}

fn session_with(config: BallisticsConfig, columns: Option<(i32, i32)>) -> Session {
    let mut game = Game::with_config(&flat_settings(), config).expect("game");
    if let Some((left, right)) = columns {
        game.place_tank(LEFT, left).expect("left");
        game.place_tank(RIGHT, right).expect("right");
    }
    Session::new(game)
}

fn aim_current(session: &mut Session, angle: i32, power: f32) {
    let tank = session.current_player();
    let (turret, shot_power) = {
        let tank = session.game().tank(tank).expect("tank");
        (tank.turret_angle(), tank.shot_power())
    };
    let _ = session.adjust_turret(angle - turret).expect("turret");
    let _ = session.adjust_power(power - shot_power).expect("power");
}

fn fire(session: &mut Session) -> ShotResult {
    let shooter = session.current_player();
    let _ = session.begin_projectile(shooter).expect("fire");
    for _ in 0..10_000 {
        match session.update_projectile(0.05) {
            ProjectileStep::InFlight { .. } => continue,
            ProjectileStep::Finished => break,
            ProjectileStep::Idle => panic!("shell vanished mid-flight"),
        }
    }
    session.resolve_projectile().expect("resolve")
}

fn wound(session: &mut Session, tank: TankId, amount: u32) {
    let _ = session
        .game_mut()
        .tank_mut(tank)
        .expect("tank")
        .apply_damage(amount);
}

#[test]
fn firing_passes_the_turn_back_and_forth() {
    let mut session = session_with(BallisticsConfig::default(), None);

    aim_current(&mut session, 45, 1.8);
    let first = fire(&mut session);
    assert_eq!(first.impact.kind(), ImpactKind::OutOfBounds);
    assert_eq!(session.current_player(), RIGHT);
    assert_eq!(session.phase(), SessionPhase::Idle);

    aim_current(&mut session, 45, 1.8);
    let second = fire(&mut session);
    assert_eq!(second.impact.kind(), ImpactKind::OutOfBounds);
    assert_eq!(session.current_player(), LEFT);

    assert!(session.message().ends_with("Next: Player 1's turn"));
    assert!((session.charge(LEFT) - 0.08).abs() < 1e-6);
    assert!((session.charge(RIGHT) - 0.08).abs() < 1e-6);
    assert!(session
        .snapshot()
        .tanks
        .iter()
        .all(|tank| tank.hp == 100));

    let mut events = Vec::new();
    session.drain_events(&mut events);
    let turns: Vec<TankId> = events
        .iter()
        .filter_map(|event| match event {
            Event::TurnChanged { player } => Some(*player),
            _ => None,
        })
        .collect();
    assert_eq!(turns, vec![RIGHT, LEFT]);
}

#[test]
fn lethal_splash_ends_the_match() {
    let mut session = session_with(zero_gravity(), Some((4, 8)));
    wound(&mut session, RIGHT, 99);
    aim_current(&mut session, -13, 0.4);

    let result = fire(&mut session);

    assert_eq!(result.impact.kind(), ImpactKind::Ground);
    assert_eq!(result.fatalities, vec![RIGHT]);
    assert_eq!(session.phase(), SessionPhase::GameOver);
    assert_eq!(session.outcome(), Some(MatchOutcome::Winner(LEFT)));
    assert_eq!(session.current_player(), LEFT);
    assert_eq!(session.message(), "Player 1 wins! Player 2 is destroyed.");
    assert!(session.charge(LEFT) > 0.08 + 1e-3);
    assert_eq!(
        session.attempt_move(tanx_core::Direction::Left),
        Err(SessionError::MatchOver)
    );

    let mut events = Vec::new();
    session.drain_events(&mut events);
    assert_eq!(
        events.last(),
        Some(&Event::MatchEnded {
            outcome: MatchOutcome::Winner(LEFT)
        })
    );
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::TurnChanged { .. })));
}

#[test]
fn simultaneous_deaths_are_a_draw() {
    let mut session = session_with(zero_gravity(), Some((4, 6)));
    wound(&mut session, LEFT, 99);
    wound(&mut session, RIGHT, 99);
    aim_current(&mut session, -75, 0.4);

    let result = fire(&mut session);

    assert_eq!(result.fatalities.len(), 2);
    assert_eq!(session.outcome(), Some(MatchOutcome::Draw));
    assert_eq!(session.phase(), SessionPhase::GameOver);
    assert_eq!(session.current_player(), LEFT);
    assert_eq!(session.message(), "Both tanks destroyed!");
}

#[test]
fn a_full_charge_buys_a_superpower_that_keeps_the_turn() {
    let mut session = session_with(zero_gravity(), Some((4, 8)));

    for _ in 0..2 {
        aim_current(&mut session, 0, 0.6);
        assert!(fire(&mut session).is_direct_hit_on(RIGHT));
        aim_current(&mut session, 0, 0.6);
        assert!(fire(&mut session).is_direct_hit_on(LEFT));
    }
    assert_eq!(session.current_player(), LEFT);
    assert_eq!(session.charge(LEFT), 1.0);

    session.activate_superpower().expect("activate");
    assert_eq!(session.phase(), SessionPhase::Superpower);
    assert_eq!(session.charge(LEFT), 0.0);
    assert!(matches!(
        session.begin_projectile(LEFT),
        Err(SessionError::NotIdle {
            phase: SessionPhase::Superpower
        })
    ));

    let target = session.game().tank(RIGHT).expect("target").center();
    let profile = session.game().config().shell_profile();
    let strike = session.superpower_strike(target, profile).expect("strike");
    assert!(strike.is_direct_hit_on(RIGHT));

    session.complete_superpower().expect("complete");
    assert_eq!(session.phase(), SessionPhase::Idle);
    assert_eq!(session.current_player(), LEFT);
    assert_eq!(session.game().tank(RIGHT).expect("target").hp(), 25);

    let mut events = Vec::new();
    session.drain_events(&mut events);
    assert!(events.contains(&Event::SuperpowerActivated { tank: LEFT }));
    assert_eq!(
        events.last(),
        Some(&Event::SuperpowerCompleted { tank: LEFT })
    );
}

#[test]
fn collapses_resolve_between_turns_without_passing_the_turn() {
    let mut session = session_with(zero_gravity(), Some((4, 20)));
    let building = session
        .game_mut()
        .world_mut()
        .place_building(10, 3, 2)
        .expect("building");
    let _ = session
        .game_mut()
        .world_mut()
        .damage_floor(building, 0, FLOOR_HP);

    assert!(session.update_structures(1.0).is_empty());
    let outcomes = session.update_structures(0.5);

    assert_eq!(outcomes.len(), 1);
    assert_eq!(session.current_player(), LEFT);
    assert_eq!(session.phase(), SessionPhase::Idle);
    let mut events = Vec::new();
    session.drain_events(&mut events);
    assert!(matches!(
        events.as_slice(),
        [Event::BuildingCollapsed { outcome }] if outcome.collapse.building == building
    ));
}

#[test]
fn identical_inputs_replay_identically() {
    fn play() -> (Vec<Event>, tanx_core::SessionSnapshot) {
        let settings = TerrainSettings::default()
            .with_seed(2024)
            .with_style(TerrainStyle::Urban);
        let mut session = Session::new(Game::new(&settings).expect("game"));
        let mut events = Vec::new();

        for turn in 0..8_i32 {
            if session.phase() == SessionPhase::GameOver {
                break;
            }
            let direction = if turn % 2 == 0 {
                tanx_core::Direction::Right
            } else {
                tanx_core::Direction::Left
            };
            let _ = session.attempt_move(direction).expect("move");
            aim_current(&mut session, 20 + turn * 5, 0.9 + 0.1 * (turn % 4) as f32);
            let _ = fire(&mut session);
            let _ = session.update_structures(0.6);
            let _ = session.update_structures(0.6);
            session.drain_events(&mut events);
        }
        (events, session.snapshot())
    }

    let (first_events, first_snapshot) = play();
    let (second_events, second_snapshot) = play();

    assert!(!first_events.is_empty());
    assert_eq!(first_events, second_events);
    assert_eq!(first_snapshot, second_snapshot);
}
