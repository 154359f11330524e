/// Tuning constants for the runner
#[derive(Debug, Clone, Copy)]
pub struct Params;

impl Params {
    // Obstacles
    pub const OBSTACLE_COUNT: usize = 5;
    pub const INITIAL_OBSTACLE_DISTANCE: f64 = 20.0;
    pub const OBSTACLE_SPACING: f64 = 10.0;
    pub const LANE_SPREAD: f64 = 5.0;

    // Difficulty ramp
    pub const INITIAL_SPEED: f64 = 0.1;
    pub const SPEED_INCREASE: f64 = 0.0001;

    // Player
    pub const PLAYER_SPEED: f64 = 0.2;
    pub const PLATFORM_HALF_WIDTH: f64 = 5.0;
    pub const COLLISION_DISTANCE: f64 = 1.0;

    // Scene
    pub const PLATFORM_LENGTH: f64 = 100.0;
    pub const PLATFORM_Y: f64 = -0.5;
    pub const CAMERA_POSITION: [f32; 3] = [0.0, 5.0, 10.0];
    pub const CAMERA_FOV_DEGREES: f32 = 75.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub obstacle_count: usize,
    pub initial_obstacle_distance: f64,
    pub obstacle_spacing: f64,
    /// Obstacles spawn with x in `[-lane_spread, lane_spread)`
    pub lane_spread: f64,
    pub initial_speed: f64,
    pub speed_increase: f64,
    pub player_speed: f64,
    pub platform_half_width: f64,
    pub collision_distance: f64,
    pub platform_length: f64,
    pub platform_y: f64,
    pub camera_position: [f32; 3],
    pub camera_fov_degrees: f32,
    pub camera_near: f32,
    pub camera_far: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            obstacle_count: Params::OBSTACLE_COUNT,
            initial_obstacle_distance: Params::INITIAL_OBSTACLE_DISTANCE,
            obstacle_spacing: Params::OBSTACLE_SPACING,
            lane_spread: Params::LANE_SPREAD,
            initial_speed: Params::INITIAL_SPEED,
            speed_increase: Params::SPEED_INCREASE,
            player_speed: Params::PLAYER_SPEED,
            platform_half_width: Params::PLATFORM_HALF_WIDTH,
            collision_distance: Params::COLLISION_DISTANCE,
            platform_length: Params::PLATFORM_LENGTH,
            platform_y: Params::PLATFORM_Y,
            camera_position: Params::CAMERA_POSITION,
            camera_fov_degrees: Params::CAMERA_FOV_DEGREES,
            camera_near: Params::CAMERA_NEAR,
            camera_far: Params::CAMERA_FAR,
        }
    }
}

impl Config {
    /// Z coordinate an obstacle is sent back to once it passes the player
    pub fn recycle_z(&self) -> f64 {
        self.initial_z(self.obstacle_count.saturating_sub(1))
    }

    /// Starting z coordinate of the obstacle at `index`
    pub fn initial_z(&self, index: usize) -> f64 {
        -(self.initial_obstacle_distance + index as f64 * self.obstacle_spacing)
    }
}
