use crate::args::Cli;
use crate::logging;
use crate::presentation::renderers::{Frame, FrameWriter, StreamWriter};
use crate::presentation::{RenderContext, render_multi_line, render_status_line};
use crate::types::OutputFormat;
use anyhow::{Context, Result};
use codex_hud_providers::codex::CodexDiscovery;
use codex_hud_providers::{FixedSession, SessionLocator};
use codex_hud_runtime::{SnapshotService, load_config};
use codex_hud_types::HudConfig;
use is_terminal::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

pub const WAITING_MULTI_LINE: &str =
    "[codex-hud] No rollout file found. Start a Codex session first.";
pub const WAITING_STATUS_LINE: &str = "HUD waiting: no rollout";

/// Granularity at which the sleep between refreshes notices Ctrl-C
const STOP_POLL: Duration = Duration::from_millis(50);

pub fn run(cli: Cli) -> Result<()> {
    logging::init(cli.log_level);

    let service = SnapshotService::new(locator_for(&cli));
    tracing::debug!(locator = service.locator_id(), "starting HUD");

    let mut out = StreamWriter::stdout();
    let clear = cli.wants_clear() && std::io::stdout().is_terminal();

    if cli.is_once() {
        tick(&cli, &service, clear, &mut out)?;
        return Ok(());
    }

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .context("failed to install Ctrl-C handler")?;

    while running.load(Ordering::SeqCst) {
        let Some(interval) = tick(&cli, &service, clear, &mut out)? else {
            break;
        };
        sleep_unless_stopped(interval, &running);
    }

    tracing::debug!("interrupted, exiting");
    Ok(())
}

fn locator_for(cli: &Cli) -> Box<dyn SessionLocator> {
    match &cli.rollout {
        Some(path) => Box::new(FixedSession(path.clone())),
        None => Box::new(CodexDiscovery::new(cli.codex_home.clone())),
    }
}

/// One refresh. Returns how long to wait before the next one, or `None` once
/// the reader has gone away.
fn tick(
    cli: &Cli,
    service: &SnapshotService,
    clear: bool,
    out: &mut dyn FrameWriter,
) -> Result<Option<Duration>> {
    let mut config = load_config(cli.config.as_deref());
    if let Some(interval) = cli.interval {
        config.refresh_ms = interval;
    }

    let ctx = RenderContext::detect(cli.width.map(usize::from));
    let frame = build_frame(cli, &config, service, &ctx)?
        .clearing(clear && cli.format == OutputFormat::Plain);

    match out.present(&frame) {
        Ok(()) => Ok(Some(Duration::from_millis(config.refresh_ms))),
        Err(err) if err.kind() == std::io::ErrorKind::BrokenPipe => Ok(None),
        Err(err) => Err(err).context("failed to write HUD"),
    }
}

fn build_frame(
    cli: &Cli,
    config: &HudConfig,
    service: &SnapshotService,
    ctx: &RenderContext,
) -> Result<Frame> {
    let Some(snapshot) = service.refresh_at(ctx.now) else {
        let waiting = if cli.status_line {
            WAITING_STATUS_LINE
        } else {
            WAITING_MULTI_LINE
        };
        return Ok(Frame::line(waiting));
    };

    let frame = match cli.format {
        OutputFormat::Json => Frame::line(serde_json::to_string(&snapshot)?),
        OutputFormat::Plain if cli.status_line => Frame::line(render_status_line(&snapshot, ctx)),
        OutputFormat::Plain => Frame::new(render_multi_line(&snapshot, config, ctx)),
    };
    Ok(frame)
}

fn sleep_unless_stopped(total: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + total;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        std::thread::sleep(STOP_POLL.min(deadline - now));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::Palette;
    use crate::presentation::renderers::RecordingWriter;
    use chrono::{TimeZone, Utc};
    use clap::Parser;
    use codex_hud_testing::{RolloutWriter, TestWorld};

    fn ctx() -> RenderContext {
        RenderContext::new(
            Palette::plain(),
            100,
            Utc.with_ymd_and_hms(2026, 2, 13, 9, 30, 0).unwrap(),
        )
    }

    fn service(cli: &Cli) -> SnapshotService {
        SnapshotService::new(locator_for(cli)).without_git()
    }

    #[test]
    fn test_waiting_messages() {
        let world = TestWorld::new();
        let home = world.codex_home().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["codex-hud", "--codex-home", home.as_str()]);
        let frame = build_frame(&cli, &HudConfig::default(), &service(&cli), &ctx()).unwrap();
        assert_eq!(frame.lines, vec![WAITING_MULTI_LINE.to_string()]);

        let cli = Cli::parse_from(["codex-hud", "--codex-home", home.as_str(), "--tmux-line"]);
        let frame = build_frame(&cli, &HudConfig::default(), &service(&cli), &ctx()).unwrap();
        assert_eq!(frame.lines, vec![WAITING_STATUS_LINE.to_string()]);
    }

    #[test]
    fn test_frame_modes() {
        let world = TestWorld::new();
        let path = world
            .write_rollout(
                "2026/02/13/rollout-a.jsonl",
                &RolloutWriter::new()
                    .turn_context("/work/app", "gpt-5-codex")
                    .turn_started(Some(200_000)),
            )
            .unwrap();
        let path = path.to_str().unwrap();

        let cli = Cli::parse_from(["codex-hud", "--rollout", path]);
        let frame = build_frame(&cli, &HudConfig::default(), &service(&cli), &ctx()).unwrap();
        assert_eq!(frame.lines[0], "[Codex HUD] gpt-5-codex │ work/app │ turn running");
        assert_eq!(frame.lines.last().unwrap(), path);

        let cli = Cli::parse_from(["codex-hud", "--rollout", path, "--status-line"]);
        let frame = build_frame(&cli, &HudConfig::default(), &service(&cli), &ctx()).unwrap();
        assert_eq!(frame.lines, vec!["[g5c | Max] | app | U5 --  ".to_string()]);

        let cli = Cli::parse_from(["codex-hud", "--rollout", path, "--format", "json"]);
        let frame = build_frame(&cli, &HudConfig::default(), &service(&cli), &ctx()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&frame.lines[0]).unwrap();
        assert_eq!(json["model"], "gpt-5-codex");
        assert_eq!(json["turn_state"], "running");
    }

    #[test]
    fn test_frames_are_presented_in_order() {
        let mut out = RecordingWriter::new();
        out.present(&Frame::line(WAITING_MULTI_LINE)).unwrap();
        out.present(&Frame::new(vec!["a".into(), "b".into()]).clearing(true))
            .unwrap();

        assert_eq!(out.frames.len(), 2);
        assert!(out.frames[1].clear);
        assert_eq!(out.last_lines(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_sleep_returns_immediately_when_stopped() {
        let running = AtomicBool::new(false);
        let start = Instant::now();
        sleep_unless_stopped(Duration::from_secs(10), &running);
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
