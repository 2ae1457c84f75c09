//! Glue between the reducer and the outside world: config file, git status,
//! session lookup.

pub mod config;
pub mod error;
pub mod git;
pub mod service;

pub use config::{config_from_value, default_config_path, load_config, load_config_from};
pub use error::{Error, Result};
pub use git::{GitInfo, git_info};
pub use service::{SnapshotService, attach_git, build_snapshot, build_snapshot_at};
