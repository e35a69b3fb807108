pub mod renderer;
pub mod text;

pub use renderer::{Overlay, Renderer, Screen};
pub use text::{format_leaderboard, render_board};
