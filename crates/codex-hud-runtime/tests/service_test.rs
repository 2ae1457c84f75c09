use anyhow::Result;
use chrono::{TimeZone, Utc};
use codex_hud_providers::codex::CodexDiscovery;
use codex_hud_runtime::{SnapshotService, build_snapshot_at, load_config};
use codex_hud_testing::{RolloutWriter, TestWorld};
use codex_hud_types::{HudConfig, TurnState};

#[test]
fn test_service_follows_newest_rollout() -> Result<()> {
    let world = TestWorld::new();
    let older = world.write_rollout(
        "2026/02/12/rollout-older.jsonl",
        &RolloutWriter::new().turn_context("/work/old", "gpt-5-codex"),
    )?;
    let newer = world.write_rollout(
        "2026/02/13/rollout-newer.jsonl",
        &RolloutWriter::new()
            .turn_context("/work/new", "gpt-5.3-codex-spark")
            .turn_started(None),
    )?;
    world.set_mtime(&older, 1_770_000_000)?;
    world.set_mtime(&newer, 1_770_100_000)?;

    let discovery = CodexDiscovery::new(Some(world.codex_home().to_path_buf()));
    let service = SnapshotService::new(Box::new(discovery)).without_git();

    let snapshot = service.refresh().expect("a rollout exists");
    assert_eq!(snapshot.session_path, newer);
    assert_eq!(snapshot.cwd.as_deref(), Some("/work/new"));
    assert_eq!(snapshot.turn_state, TurnState::Running);
    Ok(())
}

#[test]
fn test_service_without_sessions_waits() {
    let world = TestWorld::new();
    let discovery = CodexDiscovery::new(Some(world.codex_home().to_path_buf()));
    let service = SnapshotService::new(Box::new(discovery)).without_git();

    assert!(service.refresh().is_none());
}

#[test]
fn test_snapshot_is_rebuilt_each_cycle() -> Result<()> {
    let world = TestWorld::new();
    let rollout = RolloutWriter::new().turn_started(None);
    let path = world.write_rollout("rollout-live.jsonl", &rollout)?;
    let now = Utc.with_ymd_and_hms(2026, 2, 13, 9, 30, 0).unwrap();

    assert_eq!(build_snapshot_at(&path, now).turn_state, TurnState::Running);

    rollout.turn_complete().write_to(&path)?;
    assert_eq!(build_snapshot_at(&path, now).turn_state, TurnState::Idle);
    Ok(())
}

#[test]
fn test_config_from_isolated_home_file() -> Result<()> {
    let world = TestWorld::new().with_config(r#"{"maxTools": 6, "showPlan": false}"#);
    let path = world.home().join(".codex-hud/config.json");

    let config = load_config(Some(&path));
    assert_eq!(config.max_tools, 6);
    assert!(!config.show_plan);
    assert_eq!(config.refresh_ms, HudConfig::DEFAULT_REFRESH_MS);
    Ok(())
}
