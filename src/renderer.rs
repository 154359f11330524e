use crate::entity::Direction;
use crate::game::Game;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Press(Direction),
    Release(Direction),
    Quit,
    Restart,
}

impl Input {
    /// Feed a steering input into the game. Returns false for inputs the
    /// frontend has to handle itself (quit, restart).
    pub fn steer(self, game: &mut Game) -> bool {
        match self {
            Input::Press(direction) => game.press(direction),
            Input::Release(direction) => game.release(direction),
            Input::Quit | Input::Restart => return false,
        }
        true
    }
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    /// Initialize the renderer
    fn init(&mut self) -> io::Result<()>;

    /// Render the current game state
    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Clean up and restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    /// Poll for input from the user
    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_steering_inputs_reach_game() {
        let mut game = Game::with_seed(Config::default(), 0);

        assert!(Input::Press(Direction::Left).steer(&mut game));
        assert!(game.move_left);

        assert!(Input::Release(Direction::Left).steer(&mut game));
        assert!(!game.move_left);
    }

    #[test]
    fn test_control_inputs_left_to_frontend() {
        let mut game = Game::with_seed(Config::default(), 0);
        game.score = 3;

        assert!(!Input::Restart.steer(&mut game));
        assert!(!Input::Quit.steer(&mut game));
        assert_eq!(game.score, 3);
    }
}
