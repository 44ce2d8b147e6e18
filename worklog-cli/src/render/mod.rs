mod color_mode;
mod renderer;

pub use color_mode::{ColorMode, use_color};
pub use renderer::{RenderOptions, Renderer};
