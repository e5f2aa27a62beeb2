#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a headless Tanx duel between two computer
//! opponents.

mod board;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tanx_core::{Event, MatchOutcome, SessionPhase, TankId, TerrainSettings, TerrainStyle};
use tanx_system_ballistics::Game;
use tanx_system_session::{ProjectileStep, Session};
use tanx_system_shot_planner::ShotPlanner;
use tanx_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const SUPERPOWER_SCALE: f32 = 2.0;
const MAX_FRAMES_PER_PHASE: u32 = 100_000;

/// Command-line options for an automated duel.
#[derive(Debug, Parser)]
#[command(name = "tanx", about = "Plays a headless Tanx artillery duel")]
struct CliArgs {
    /// Terrain seed; a random one is drawn and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Terrain generator to use.
    #[arg(long, value_enum, default_value_t = StyleArg::Classic)]
    style: StyleArg,
    /// World width in cells.
    #[arg(long, default_value_t = 48)]
    width: u32,
    /// World height in cells.
    #[arg(long, default_value_t = 36)]
    height: u32,
    /// Shots fired before the duel is called off.
    #[arg(long, default_value_t = 40)]
    max_turns: u32,
    /// Simulated seconds per animation frame.
    #[arg(long, default_value_t = 1.0 / 30.0)]
    frame: f32,
    /// Print the board after every turn.
    #[arg(long)]
    render: bool,
    /// Print the final session snapshot as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum StyleArg {
    Classic,
    Urban,
}

impl From<StyleArg> for TerrainStyle {
    fn from(style: StyleArg) -> Self {
        match style {
            StyleArg::Classic => Self::Classic,
            StyleArg::Urban => Self::Urban,
        }
    }
}

impl CliArgs {
    fn terrain_settings(&self) -> TerrainSettings {
        let defaults = TerrainSettings::default();
        let ceiling = self.height as f32 - 2.0;
        let max_height = defaults.max_height.min(ceiling);
        let mut settings = TerrainSettings {
            width: self.width,
            height: self.height,
            max_height,
            min_height: defaults.min_height.min(max_height),
            ..defaults
        }
        .with_style(self.style.into());
        if let Some(seed) = self.seed {
            settings = settings.with_seed(seed);
        }
        settings
    }
}

/// Entry point for the Tanx command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    if !(args.frame.is_finite() && args.frame > 0.0) {
        bail!("frame delta must be a positive number, got {}", args.frame);
    }

    let settings = args.terrain_settings();
    let game = Game::new(&settings).context("failed to set up the duel")?;
    info!(
        seed = game.world().seed(),
        width = game.world().width(),
        height = game.world().height(),
        style = ?game.world().style(),
        "duel generated"
    );

    let mut session = Session::new(game);
    let mut planner = ShotPlanner::default();
    let mut events = Vec::new();

    for turn in 1..=args.max_turns {
        if session.phase() == SessionPhase::GameOver {
            break;
        }
        play_turn(&mut session, &mut planner, args.frame)
            .with_context(|| format!("turn {turn} failed"))?;

        session.drain_events(&mut events);
        for event in events.drain(..) {
            log_event(&session, &event);
        }
        if args.render {
            println!("{}", board::render(session.game()));
        }
        println!("[{turn:>3}] {}", session.message());
    }

    match session.outcome() {
        Some(MatchOutcome::Winner(winner)) => {
            println!("Winner: {}", tank_name(&session, winner));
        }
        Some(MatchOutcome::Draw) => println!("Draw"),
        None => println!("No winner after {} turns", args.max_turns),
    }
    if args.json {
        let snapshot = serde_json::to_string_pretty(&session.snapshot())
            .context("failed to encode the session snapshot")?;
        println!("{snapshot}");
    }
    Ok(())
}

fn play_turn(session: &mut Session, planner: &mut ShotPlanner, frame: f32) -> Result<()> {
    let shooter = session.current_player();
    let opponents: Vec<TankId> = session
        .game()
        .tanks()
        .iter()
        .map(|tank| tank.id())
        .filter(|&id| id != shooter)
        .collect();

    if session.charge(shooter) >= 1.0 {
        unleash_superpower(session, &opponents)?;
        if session.phase() == SessionPhase::GameOver {
            return Ok(());
        }
    }

    match planner.find_best_shot(session.game(), shooter, &opponents)? {
        Some(plan) => {
            let tank = session
                .game()
                .tank(shooter)
                .context("current tank disappeared")?;
            let (turret, power) = (tank.turret_angle(), tank.shot_power());
            let _ = session.adjust_turret(plan.aim.angle - turret)?;
            let _ = session.adjust_power(plan.aim.power - power)?;
            debug!(score = plan.score, "aiming with planned shot");
        }
        None => warn!(shooter = shooter.get(), "no landing shot found, firing as aimed"),
    }

    let _ = session.begin_projectile(shooter)?;
    let mut frames = 0;
    while session.update_projectile(frame) != ProjectileStep::Finished {
        frames += 1;
        if frames >= MAX_FRAMES_PER_PHASE {
            break;
        }
    }
    let _ = session.resolve_projectile()?;

    let mut frames = 0;
    while query::has_pending_collapse(session.game().world()) && frames < MAX_FRAMES_PER_PHASE {
        let _ = session.update_structures(frame);
        frames += 1;
    }
    Ok(())
}

fn unleash_superpower(session: &mut Session, opponents: &[TankId]) -> Result<()> {
    session.activate_superpower()?;
    let profile = session
        .game()
        .config()
        .shell_profile()
        .scaled(SUPERPOWER_SCALE);
    let targets: Vec<_> = opponents
        .iter()
        .filter_map(|&id| session.game().tank(id))
        .filter(|tank| tank.is_alive())
        .map(|tank| tank.center())
        .collect();
    for point in targets {
        let _ = session.superpower_strike(point, profile)?;
        if session.phase() == SessionPhase::GameOver {
            return Ok(());
        }
    }
    session.complete_superpower()?;
    Ok(())
}

fn tank_name(session: &Session, id: TankId) -> &str {
    session.game().tank(id).map_or("unknown", |tank| tank.name())
}

fn log_event(session: &Session, event: &Event) {
    match event {
        Event::ShotFired { shooter, aim } => info!(
            shooter = tank_name(session, *shooter),
            angle = aim.angle,
            power = aim.power,
            "shot fired"
        ),
        Event::ShotResolved {
            shooter,
            kind,
            point,
        } => debug!(shooter = shooter.get(), ?kind, ?point, "shot resolved"),
        Event::CraterCarved { crater } => debug!(
            x = crater.center.x,
            y = crater.center.y,
            radius = crater.radius,
            "crater carved"
        ),
        Event::TankDamaged { damage } => info!(
            tank = tank_name(session, damage.tank),
            amount = damage.amount,
            hp = damage.hp_after,
            "tank damaged"
        ),
        Event::TankDestroyed { tank } => info!(tank = tank_name(session, *tank), "tank destroyed"),
        Event::FloorDestroyed { building, level } => {
            debug!(building = building.get(), level, "floor destroyed");
        }
        Event::BuildingUnstable { building } => {
            info!(building = building.get(), "building is unstable");
        }
        Event::BuildingCollapsed { outcome } => info!(
            building = outcome.collapse.building.get(),
            rubble = outcome.collapse.rubble.len(),
            casualties = outcome.fatalities.len(),
            "building collapsed"
        ),
        Event::RubbleCleared { segment } => debug!(segment = segment.get(), "rubble cleared"),
        Event::SuperpowerCharged { tank, charge } => {
            debug!(tank = tank_name(session, *tank), charge, "superpower charged");
        }
        Event::SuperpowerActivated { tank } => {
            info!(tank = tank_name(session, *tank), "superpower activated");
        }
        Event::SuperpowerCompleted { tank } => {
            debug!(tank = tank_name(session, *tank), "superpower completed");
        }
        Event::TurnChanged { player } => {
            debug!(player = tank_name(session, *player), "turn changed");
        }
        Event::MatchEnded { outcome } => info!(?outcome, "match ended"),
    }
}
