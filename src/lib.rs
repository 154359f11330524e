pub mod camera;
pub mod config;
pub mod entity;
pub mod frame_loop;
pub mod game;
pub mod renderer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;

#[cfg(target_arch = "wasm32")]
pub mod web_renderer;
#[cfg(target_arch = "wasm32")]
pub mod web_main;

pub use camera::{Camera, Projected};
pub use config::{Config, Params};
pub use entity::{Direction, Obstacle, Player, Position};
pub use frame_loop::FrameLoop;
pub use game::{FrameOutcome, Game, GameState};
pub use renderer::{Input, Renderer};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;

#[cfg(target_arch = "wasm32")]
pub use web_renderer::WebRenderer;
