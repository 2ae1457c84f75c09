use crate::types::{LogLevel, OutputFormat};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codex-hud")]
#[command(about = "Live HUD for the latest Codex CLI session", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Print once and exit
    #[arg(long)]
    pub once: bool,

    /// Print a compact single line for tmux or other status bars
    #[arg(long, visible_alias = "tmux-line")]
    pub status_line: bool,

    /// Do not clear the terminal between refreshes
    #[arg(long)]
    pub no_clear: bool,

    /// Follow this rollout file instead of the newest one
    #[arg(long, value_name = "PATH")]
    pub rollout: Option<PathBuf>,

    /// Codex home to search for sessions (default: $CODEX_HOME or ~/.codex)
    #[arg(long, value_name = "PATH")]
    pub codex_home: Option<PathBuf>,

    /// Refresh interval in milliseconds (default from config)
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Status-line width in columns
    #[arg(long, value_name = "COLS", value_parser = clap::value_parser!(u16).range(1..))]
    pub width: Option<u16>,

    /// Config file (default: ~/.codex-hud/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[arg(long, default_value = "plain")]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn")]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Print once and exit (same as --once)
    Print,
}

impl Cli {
    pub fn is_once(&self) -> bool {
        self.once || self.command == Some(Commands::Print)
    }

    /// Clearing is off in status-line mode and with --no-clear
    pub fn wants_clear(&self) -> bool {
        !self.no_clear && !self.status_line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["codex-hud"]);
        assert!(!cli.is_once());
        assert!(cli.wants_clear());
        assert_eq!(cli.format, OutputFormat::Plain);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_print_subcommand_is_once() {
        let cli = Cli::parse_from(["codex-hud", "print"]);
        assert!(cli.is_once());
    }

    #[test]
    fn test_tmux_line_alias_disables_clear() {
        let cli = Cli::parse_from(["codex-hud", "--tmux-line", "--once"]);
        assert!(cli.status_line);
        assert!(!cli.wants_clear());
    }

    #[test]
    fn test_interval_must_be_positive() {
        assert!(Cli::try_parse_from(["codex-hud", "--interval", "0"]).is_err());
        let cli = Cli::parse_from(["codex-hud", "--interval", "250"]);
        assert_eq!(cli.interval, Some(250));
    }
}
