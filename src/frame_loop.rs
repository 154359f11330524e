use crate::game::Game;
use crate::renderer::{Input, Renderer};
use std::io;

/// Drives a [`Game`] one display frame at a time for a host that schedules
/// frames itself (the browser's animation frames). The host asks for a new
/// frame only while [`FrameLoop::update_frame`] returns `true`.
pub struct FrameLoop<R: Renderer> {
    pub game: Game,
    pub renderer: R,
    pending_frame: Option<i32>,
    stopped: bool,
}

impl<R: Renderer> FrameLoop<R> {
    pub fn new(game: Game, mut renderer: R) -> io::Result<Self> {
        renderer.init()?;
        Ok(Self {
            game,
            renderer,
            pending_frame: None,
            stopped: false,
        })
    }

    /// Run one frame. Returns whether another frame should follow.
    pub fn update_frame(&mut self) -> io::Result<bool> {
        self.pending_frame = None;

        if self.stopped || !self.game.is_running() {
            return Ok(false);
        }

        self.drain_input()?;
        self.game.update();

        // Drawn even on the frame that ended the run
        self.draw()?;

        Ok(self.game.is_running())
    }

    /// Apply queued key events. The game drops them while it is over.
    fn drain_input(&mut self) -> io::Result<()> {
        while let Some(input) = self.renderer.poll_input()? {
            // Restart arrives through the button, not the key queue
            if let Input::Press(_) | Input::Release(_) = input {
                input.steer(&mut self.game);
            }
        }
        Ok(())
    }

    pub fn draw(&mut self) -> io::Result<()> {
        self.renderer.render(&self.game)
    }

    /// Reset the game and redraw. Returns whether the host has to schedule
    /// a frame to get the loop going again.
    pub fn restart(&mut self) -> io::Result<bool> {
        if self.stopped {
            return Ok(false);
        }

        self.drain_input()?;
        self.game.restart();
        self.draw()?;

        Ok(self.pending_frame.is_none())
    }

    /// Remember the id of the frame the host just requested
    pub fn frame_scheduled(&mut self, id: i32) {
        self.pending_frame = Some(id);
    }

    /// Halt for good. Returns the pending frame the host should cancel.
    pub fn stop(&mut self) -> Option<i32> {
        self.stopped = true;
        self.pending_frame.take()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::entity::Direction;
    use crate::game::GameState;
    use std::collections::VecDeque;

    const EPSILON: f64 = 1e-9;

    #[derive(Default)]
    struct RecordingRenderer {
        inits: usize,
        renders: usize,
        // Score seen by each render call
        rendered_scores: Vec<u32>,
        queued: VecDeque<Input>,
    }

    impl Renderer for RecordingRenderer {
        fn init(&mut self) -> io::Result<()> {
            self.inits += 1;
            Ok(())
        }

        fn render(&mut self, game: &Game) -> io::Result<()> {
            self.renders += 1;
            self.rendered_scores.push(game.score);
            Ok(())
        }

        fn cleanup(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn poll_input(&mut self) -> io::Result<Option<Input>> {
            Ok(self.queued.pop_front())
        }
    }

    fn new_loop() -> FrameLoop<RecordingRenderer> {
        let game = Game::with_seed(Config::default(), 17);
        FrameLoop::new(game, RecordingRenderer::default()).unwrap()
    }

    fn end_run(frame_loop: &mut FrameLoop<RecordingRenderer>) {
        frame_loop.game.obstacles[0].place(0.0, 0.0);
        frame_loop.game.check_collision();
        assert_eq!(frame_loop.game.state, GameState::GameOver);
    }

    #[test]
    fn test_new_initializes_renderer() {
        let frame_loop = new_loop();
        assert_eq!(frame_loop.renderer.inits, 1);
        assert_eq!(frame_loop.renderer.renders, 0);
    }

    #[test]
    fn test_running_frame_updates_renders_and_continues() {
        let mut frame_loop = new_loop();

        assert!(frame_loop.update_frame().unwrap());
        assert_eq!(frame_loop.renderer.renders, 1);
        assert!((frame_loop.game.speed - 0.1001).abs() < EPSILON);
    }

    #[test]
    fn test_collision_frame_is_rendered_and_ends_loop() {
        let mut frame_loop = new_loop();
        frame_loop.game.obstacles[0].place(0.0, -0.5);

        assert!(!frame_loop.update_frame().unwrap());
        assert_eq!(frame_loop.renderer.renders, 1);
        assert!(!frame_loop.game.is_running());
    }

    #[test]
    fn test_frame_after_game_over_does_nothing() {
        let mut frame_loop = new_loop();
        end_run(&mut frame_loop);
        let speed = frame_loop.game.speed;

        assert!(!frame_loop.update_frame().unwrap());
        assert_eq!(frame_loop.renderer.renders, 0);
        assert_eq!(frame_loop.game.speed, speed);
    }

    #[test]
    fn test_queued_keys_apply_before_update() {
        let mut frame_loop = new_loop();
        frame_loop
            .renderer
            .queued
            .extend([Input::Press(Direction::Left), Input::Restart]);

        frame_loop.update_frame().unwrap();

        assert!(frame_loop.game.move_left);
        assert!((frame_loop.game.player.position.x + 0.2).abs() < EPSILON);
        assert!(frame_loop.renderer.queued.is_empty());
    }

    #[test]
    fn test_keys_queued_during_game_over_are_dropped_on_restart() {
        let mut frame_loop = new_loop();
        frame_loop.game.press(Direction::Left);
        end_run(&mut frame_loop);

        frame_loop
            .renderer
            .queued
            .extend([Input::Release(Direction::Left), Input::Press(Direction::Right)]);

        assert!(frame_loop.restart().unwrap());

        // The release came while the game was over, so left stays stuck
        assert!(frame_loop.renderer.queued.is_empty());
        assert!(frame_loop.game.move_left);
        assert!(!frame_loop.game.move_right);
        assert!(frame_loop.game.is_running());
        assert_eq!(frame_loop.renderer.renders, 1);

        assert!(frame_loop.update_frame().unwrap());
        assert!((frame_loop.game.player.position.x + 0.2).abs() < EPSILON);
    }

    #[test]
    fn test_restart_redraws_reset_score() {
        let mut frame_loop = new_loop();
        frame_loop.game.score = 9;
        end_run(&mut frame_loop);

        frame_loop.restart().unwrap();

        assert_eq!(frame_loop.renderer.rendered_scores, vec![0]);
    }

    #[test]
    fn test_restart_schedules_only_without_pending_frame() {
        let mut frame_loop = new_loop();
        frame_loop.frame_scheduled(3);
        assert!(!frame_loop.restart().unwrap(), "a frame is already pending");

        // The frame ran and ended the run, nothing pending any more
        frame_loop.game.obstacles[0].place(0.0, -0.5);
        assert!(!frame_loop.update_frame().unwrap());
        assert!(frame_loop.restart().unwrap());
    }

    #[test]
    fn test_stop_cancels_pending_frame_and_freezes() {
        let mut frame_loop = new_loop();
        frame_loop.frame_scheduled(42);

        assert_eq!(frame_loop.stop(), Some(42));
        assert!(frame_loop.is_stopped());
        assert_eq!(frame_loop.stop(), None);

        assert!(!frame_loop.update_frame().unwrap());
        assert_eq!(frame_loop.renderer.renders, 0);
    }

    #[test]
    fn test_restart_ignored_once_stopped() {
        let mut frame_loop = new_loop();
        end_run(&mut frame_loop);
        frame_loop.stop();

        assert!(!frame_loop.restart().unwrap());
        assert_eq!(frame_loop.game.state, GameState::GameOver);
        assert_eq!(frame_loop.renderer.renders, 0);
    }
}
