use std::process::{Command, Output};

use tanx_core::{SessionPhase, SessionSnapshot, TankId};

fn tanx(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tanx"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the tanx binary")
}

fn split_report(stdout: &str) -> (Vec<&str>, SessionSnapshot) {
    let start = stdout.find("\n{").expect("snapshot json") + 1;
    let lines = stdout[..start].lines().collect();
    let snapshot = serde_json::from_str(&stdout[start..]).expect("valid snapshot json");
    (lines, snapshot)
}

#[test]
fn seeded_duel_prints_turns_and_a_json_snapshot() {
    let output = tanx(&["--seed", "7", "--max-turns", "2", "--json"]);
    assert!(output.status.success(), "{output:?}");

    let stdout = String::from_utf8(output.stdout).expect("utf-8 output");
    let (lines, snapshot) = split_report(&stdout);

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[  1] "));
    assert!(lines[1].starts_with("[  2] "));
    assert_eq!(lines[2], "No winner after 2 turns");

    assert_eq!(snapshot.current_player, TankId::new(0));
    assert_eq!(snapshot.phase, SessionPhase::Idle);
    assert_eq!(snapshot.outcome, None);
    assert_eq!(snapshot.tanks.len(), 2);
    assert!(snapshot.tanks.iter().all(|tank| tank.alive));
    assert_eq!(snapshot.charges.len(), 2);
    assert!(snapshot.charges.iter().all(|&charge| charge >= 0.08));
}

#[test]
fn seeded_duels_replay_identically() {
    let args = ["--seed", "31", "--style", "urban", "--max-turns", "3", "--json"];
    let first = tanx(&args);
    let second = tanx(&args);

    assert!(first.status.success(), "{first:?}");
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn non_positive_frames_are_rejected() {
    let output = tanx(&["--seed", "7", "--frame", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("frame delta must be a positive number"));
}
