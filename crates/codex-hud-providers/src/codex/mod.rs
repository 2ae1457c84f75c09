pub mod discovery;
pub mod fields;
pub mod io;
pub mod schema;

pub use self::discovery::{
    CodexDiscovery, default_codex_home, find_latest_rollout, is_rollout_file,
};
pub use self::io::{parse_rollout_lines, read_rollout};
pub use self::schema::{EventMsgType, RecordType, RolloutRecord};
