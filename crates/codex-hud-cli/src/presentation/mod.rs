pub mod formatters;
pub mod renderers;
pub mod style;
pub mod width;

pub use renderers::{RenderContext, render_multi_line, render_status_line};
pub use style::{Palette, Tone, detect_color};
