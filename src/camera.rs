//! Perspective camera shared by the terminal and web renderers
//!
//! Both frontends draw onto a flat surface (character grid or 2D canvas), so
//! the camera only needs to map world points to viewport coordinates.

use crate::config::Config;
use crate::entity::Position;
use glam::{Mat4, Vec3, Vec4};

/// A world point mapped into the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    pub x: f64,
    pub y: f64,
    /// Viewport pixels covered by one world unit at this depth
    pub scale: f64,
    /// Distance along the view axis, larger is further away
    pub depth: f64,
}

pub struct Camera {
    view_proj: Mat4,
    focal: f32,
    width: f64,
    height: f64,
}

impl Camera {
    /// Camera looking at the origin from the configured position
    pub fn new(config: &Config, width: f64, height: f64) -> Self {
        let eye = Vec3::from_array(config.camera_position);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);

        let aspect = (width / height.max(1.0)).max(f64::EPSILON) as f32;
        let fov = config.camera_fov_degrees.to_radians();
        let projection = Mat4::perspective_rh(fov, aspect, config.camera_near, config.camera_far);

        Self {
            view_proj: projection * view,
            focal: projection.y_axis.y,
            width,
            height,
        }
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Map a world point to viewport coordinates, `None` when it is behind
    /// the camera or outside the depth range.
    pub fn project(&self, position: Position) -> Option<Projected> {
        self.project_vec3(position.to_vec3())
    }

    pub fn project_vec3(&self, point: Vec3) -> Option<Projected> {
        let clip: Vec4 = self.view_proj * point.extend(1.0);

        // w is the view-space depth; perspective_rh maps depth to [0, w]
        if clip.w <= 0.0 || clip.z < 0.0 || clip.z > clip.w {
            return None;
        }

        let ndc_x = (clip.x / clip.w) as f64;
        let ndc_y = (clip.y / clip.w) as f64;

        Some(Projected {
            x: (ndc_x + 1.0) * 0.5 * self.width,
            y: (1.0 - ndc_y) * 0.5 * self.height,
            scale: (self.focal / clip.w) as f64 * 0.5 * self.height,
            depth: clip.w as f64,
        })
    }

    /// Corners of the platform quad in viewport space, near edge first.
    /// Corners that still fail to project are dropped.
    pub fn platform_outline(&self, config: &Config) -> Vec<(f64, f64)> {
        let half_width = config.platform_half_width as f32;
        let half_length = (config.platform_length / 2.0) as f32;
        let y = config.platform_y as f32;

        // Keep the near edge in front of the camera
        let near_z = half_length.min(config.camera_position[2] - 1.0);

        [
            Vec3::new(-half_width, y, near_z),
            Vec3::new(half_width, y, near_z),
            Vec3::new(half_width, y, -half_length),
            Vec3::new(-half_width, y, -half_length),
        ]
        .into_iter()
        .filter_map(|corner| self.project_vec3(corner))
        .map(|p| (p.x, p.y))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDTH: f64 = 800.0;
    const HEIGHT: f64 = 600.0;

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new(&Config::default(), WIDTH, HEIGHT);
        let p = camera.project(Position::ORIGIN).expect("origin is visible");

        assert!((p.x - WIDTH / 2.0).abs() < 1e-3, "x = {}", p.x);
        assert!((p.y - HEIGHT / 2.0).abs() < 1e-3, "y = {}", p.y);
    }

    #[test]
    fn test_point_behind_camera_is_culled() {
        let camera = Camera::new(&Config::default(), WIDTH, HEIGHT);
        assert!(camera.project(Position::new(0.0, 5.0, 20.0)).is_none());
    }

    #[test]
    fn test_further_points_are_smaller_and_higher() {
        let camera = Camera::new(&Config::default(), WIDTH, HEIGHT);
        let near = camera.project(Position::new(0.0, 0.0, 0.0)).unwrap();
        let far = camera.project(Position::new(0.0, 0.0, -60.0)).unwrap();

        assert!(far.scale < near.scale);
        assert!(far.depth > near.depth);
        // The lane recedes toward the top of the screen
        assert!(far.y < near.y);
    }

    #[test]
    fn test_lateral_offset_maps_left_and_right() {
        let camera = Camera::new(&Config::default(), WIDTH, HEIGHT);
        let left = camera.project(Position::new(-5.0, 0.0, 0.0)).unwrap();
        let right = camera.project(Position::new(5.0, 0.0, 0.0)).unwrap();

        assert!(left.x < WIDTH / 2.0);
        assert!(right.x > WIDTH / 2.0);
        assert!(((WIDTH / 2.0 - left.x) - (right.x - WIDTH / 2.0)).abs() < 1e-3);
    }

    #[test]
    fn test_platform_outline_has_four_visible_corners() {
        let config = Config::default();
        let camera = Camera::new(&config, WIDTH, HEIGHT);
        assert_eq!(camera.platform_outline(&config).len(), 4);
    }
}
