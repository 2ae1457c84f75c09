pub mod model;
pub mod number;
pub mod path;
pub mod time;

pub use model::{model_tier, shorten_model};
pub use number::format_tokens;
pub use path::{project_name, project_tail};
pub use time::{format_remaining, format_window};
