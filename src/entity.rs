use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance in 3D
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// Lateral steering direction. The lane has no forward/back control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Sign applied to the player's x when moving this way
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub position: Position,
}

impl Player {
    pub fn new() -> Self {
        Self {
            position: Position::ORIGIN,
        }
    }

    pub fn step(&mut self, direction: Direction, amount: f64) {
        self.position.x += direction.sign() * amount;
    }

    pub fn clamp_to_lane(&mut self, half_width: f64) {
        if self.position.x < -half_width {
            self.position.x = -half_width;
        } else if self.position.x > half_width {
            self.position.x = half_width;
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Obstacle {
    pub position: Position,
}

impl Obstacle {
    pub fn new(x: f64, z: f64) -> Self {
        Self {
            position: Position::new(x, 0.0, z),
        }
    }

    /// Move toward the player by `speed`
    pub fn advance(&mut self, speed: f64) {
        self.position.z += speed;
    }

    pub fn has_passed(&self, player: &Player) -> bool {
        self.position.z > player.position.z
    }

    pub fn place(&mut self, x: f64, z: f64) {
        self.position.x = x;
        self.position.z = z;
    }
}
