//! Perspective projection from the rail world to screen space

use glam::{Vec2, Vec3};

/// Nearest depth in front of the camera that still projects
const NEAR_PLANE: f32 = 0.1;

/// A point projected to the screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Pixel position, y down
    pub pos: Vec2,
    /// Pixels per world unit at this depth
    pub scale: f32,
    pub depth: f32,
}

/// Fixed camera behind the player looking down -z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Focal length in pixels
    pub focal: f32,
    pub camera_y: f32,
    pub camera_z: f32,
    /// Screen y of the horizon
    pub horizon: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            focal: height * 0.9,
            camera_y: 2.5,
            camera_z: 5.0,
            horizon: height * 0.4,
        }
    }

    /// Project a world point. None when it is behind the camera.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let depth = self.camera_z - p.z;
        if depth <= NEAR_PLANE {
            return None;
        }
        let scale = self.focal / depth;
        Some(Projected {
            pos: Vec2::new(
                self.width * 0.5 + p.x * scale,
                self.horizon - (p.y - self.camera_y) * scale,
            ),
            scale,
            depth,
        })
    }

    /// Screen position of a pointer aim (-1..1 on both axes)
    pub fn aim_to_screen(&self, aim: Vec2) -> Vec2 {
        Vec2::new(
            self.width * 0.5 * (1.0 + aim.x),
            self.height * 0.5 * (1.0 - aim.y),
        )
    }

    /// Pointer aim for a screen position
    pub fn screen_to_aim(&self, screen: Vec2) -> Vec2 {
        Vec2::new(
            screen.x / (self.width * 0.5) - 1.0,
            1.0 - screen.y / (self.height * 0.5),
        )
        .clamp(Vec2::splat(-1.0), Vec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_farther_points_are_smaller() {
        let vp = Viewport::new(800.0, 600.0);
        let near = vp.project(Vec3::new(0.0, 0.0, -5.0)).unwrap();
        let far = vp.project(Vec3::new(0.0, 0.0, -50.0)).unwrap();
        assert!(near.scale > far.scale);
        assert!(far.pos.y < near.pos.y);
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let vp = Viewport::new(800.0, 600.0);
        assert!(vp.project(Vec3::new(0.0, 0.0, vp.camera_z + 1.0)).is_none());
    }

    #[test]
    fn test_aim_screen_round_trip() {
        let vp = Viewport::new(800.0, 600.0);
        let aim = Vec2::new(0.25, -0.5);
        let back = vp.screen_to_aim(vp.aim_to_screen(aim));
        assert!(back.abs_diff_eq(aim, 1e-5));
    }
}
