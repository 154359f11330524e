use crate::config::Config;
use crate::entity::{Direction, Obstacle, Player};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Running,
    GameOver,
}

/// What happened during a single call to [`Game::update`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOutcome {
    /// Obstacles that passed the player and were sent back to the far slot
    pub recycled: u32,
    /// The frame ended the run
    pub collided: bool,
}

pub struct Game {
    pub config: Config,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub state: GameState,
    pub score: u32,
    pub speed: f64,
    pub move_left: bool,
    pub move_right: bool,
    rng: StdRng,
}

impl Game {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic lane assignment for a given seed
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: Config, rng: StdRng) -> Self {
        let obstacles = (0..config.obstacle_count)
            .map(|i| Obstacle::new(0.0, config.initial_z(i)))
            .collect();

        let mut game = Self {
            speed: config.initial_speed,
            config,
            player: Player::new(),
            obstacles,
            state: GameState::Running,
            score: 0,
            move_left: false,
            move_right: false,
            rng,
        };

        game.place_obstacles();
        game
    }

    pub fn is_running(&self) -> bool {
        self.state == GameState::Running
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    /// Key went down. Ignored once the run is over.
    pub fn press(&mut self, direction: Direction) {
        if self.is_running() {
            *self.intent_mut(direction) = true;
        }
    }

    /// Key came up. Ignored once the run is over, so a held key stays set
    /// until the next restart.
    pub fn release(&mut self, direction: Direction) {
        if self.is_running() {
            *self.intent_mut(direction) = false;
        }
    }

    fn intent_mut(&mut self, direction: Direction) -> &mut bool {
        match direction {
            Direction::Left => &mut self.move_left,
            Direction::Right => &mut self.move_right,
        }
    }

    /// Advance the simulation by one frame.
    pub fn update(&mut self) -> FrameOutcome {
        let mut outcome = FrameOutcome::default();

        if !self.is_running() {
            return outcome;
        }

        // Move obstacles and recycle those that got past the player
        let recycle_z = self.config.recycle_z();
        for i in 0..self.obstacles.len() {
            self.obstacles[i].advance(self.speed);

            if self.obstacles[i].has_passed(&self.player) {
                let x = self.random_lane();
                self.obstacles[i].place(x, recycle_z);
                self.score += 1;
                outcome.recycled += 1;
            }
        }

        self.speed += self.config.speed_increase;

        // Both flags held cancel out
        if self.move_left {
            self.player.step(Direction::Left, self.config.player_speed);
        }
        if self.move_right {
            self.player.step(Direction::Right, self.config.player_speed);
        }
        self.player.clamp_to_lane(self.config.platform_half_width);

        outcome.collided = self.check_collision();
        outcome
    }

    /// End the run if any obstacle is within collision distance of the player.
    pub fn check_collision(&mut self) -> bool {
        let player = self.player.position;
        let hit = self
            .obstacles
            .iter()
            .any(|o| player.distance_to(&o.position) < self.config.collision_distance);

        if hit {
            self.state = GameState::GameOver;
        }
        hit
    }

    pub fn restart(&mut self) {
        self.state = GameState::Running;
        self.score = 0;
        self.speed = self.config.initial_speed;
        self.player = Player::new();
        self.place_obstacles();
    }

    /// Put every obstacle back at its index-based starting slot on a random lane
    fn place_obstacles(&mut self) {
        for i in 0..self.obstacles.len() {
            let x = self.random_lane();
            let z = self.config.initial_z(i);
            self.obstacles[i].place(x, z);
        }
    }

    fn random_lane(&mut self) -> f64 {
        let spread = self.config.lane_spread;
        // Also catches NaN, which gen_range rejects
        if !(spread > 0.0) {
            return 0.0;
        }
        self.rng.gen_range(-spread..spread)
    }
}
