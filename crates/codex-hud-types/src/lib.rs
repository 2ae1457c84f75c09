pub mod config;
pub mod snapshot;
mod util;

pub use config::HudConfig;
pub use snapshot::*;
pub use util::*;
