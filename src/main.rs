#[cfg(not(target_arch = "wasm32"))]
use lane_runner::{CliRenderer, Config, Game, Input, Renderer};
#[cfg(not(target_arch = "wasm32"))]
use std::io;
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

// One simulation step per display frame
#[cfg(not(target_arch = "wasm32"))]
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667); // ~60 frames/sec

// The browser build starts through `start_game` instead
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> io::Result<()> {
    let mut game = Game::new(Config::default());
    let mut renderer = CliRenderer::new();

    renderer.init()?;
    renderer.render(&game)?;

    let mut last_frame = Instant::now();

    loop {
        // Drain everything that arrived since the last poll
        while let Some(input) = renderer.poll_input()? {
            match input {
                Input::Quit => {
                    renderer.cleanup()?;
                    println!("{}", game.score_text());
                    return Ok(());
                }
                // The restart control only exists once the run is over
                Input::Restart if !game.is_running() => {
                    game.restart();
                    renderer.render(&game)?;
                    last_frame = Instant::now();
                }
                Input::Restart => {}
                steering => {
                    steering.steer(&mut game);
                }
            }
        }

        // Frozen after a game over until restarted
        if game.is_running() && last_frame.elapsed() >= FRAME_INTERVAL {
            last_frame += FRAME_INTERVAL;
            // Don't try to catch up after a stall
            if last_frame.elapsed() >= FRAME_INTERVAL {
                last_frame = Instant::now();
            }

            game.update();
            renderer.render(&game)?;
        }
    }
}
