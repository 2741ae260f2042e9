//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Screen-space vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub const fn at(p: glam::Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }

    /// Byte stride of one vertex in an uploaded buffer
    pub const STRIDE: usize = std::mem::size_of::<Vertex>();
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.05, 0.04, 0.08, 1.0];
    pub const GROUND: [f32; 4] = [0.12, 0.1, 0.16, 1.0];
    pub const RAIL: [f32; 4] = [0.35, 0.3, 0.45, 1.0];
    pub const PLAYER: [f32; 4] = [0.2, 0.8, 0.4, 1.0];
    pub const CROSSHAIR: [f32; 4] = [1.0, 1.0, 1.0, 0.8];

    pub const SKIBIDI: [f32; 4] = [0.85, 0.85, 0.9, 1.0];
    pub const NPC: [f32; 4] = [0.6, 0.6, 0.6, 1.0];
    pub const RIZZLER: [f32; 4] = [0.9, 0.3, 0.6, 1.0];
    pub const GAMER: [f32; 4] = [0.3, 0.9, 0.9, 1.0];
    pub const SIGMA: [f32; 4] = [0.95, 0.8, 0.2, 1.0];
    pub const BOSS: [f32; 4] = [0.8, 0.15, 0.15, 1.0];
    pub const BOSS_ALT: [f32; 4] = [0.5, 0.2, 0.8, 1.0];
    pub const HIT_FLASH: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const STUN_RING: [f32; 4] = [1.0, 0.9, 0.2, 0.8];

    pub const PLAYER_SHOT: [f32; 4] = [1.0, 0.95, 0.5, 1.0];
    pub const CHICKEN: [f32; 4] = [1.0, 0.85, 0.1, 1.0];
    pub const TRAIL: [f32; 4] = [0.5, 0.8, 1.0, 0.7];
    pub const BOSS_ORB: [f32; 4] = [1.0, 0.3, 0.2, 1.0];
    pub const GAMER_SHOT: [f32; 4] = [0.2, 1.0, 0.6, 1.0];
    pub const HAZARD: [f32; 4] = [1.0, 0.5, 0.1, 0.9];

    pub const WEAK_POINT: [f32; 4] = [1.0, 0.2, 0.3, 1.0];
    pub const WEAK_POINT_RING: [f32; 4] = [1.0, 1.0, 1.0, 0.7];

    pub const HEALTH_FG: [f32; 4] = [0.2, 0.9, 0.3, 1.0];
    pub const HEALTH_BG: [f32; 4] = [0.2, 0.05, 0.05, 0.8];
    pub const BOSS_BAR: [f32; 4] = [0.9, 0.1, 0.2, 1.0];

    pub const DAMAGE_TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const CRIT_TEXT: [f32; 4] = [1.0, 0.8, 0.1, 1.0];
    pub const REWARD_TEXT: [f32; 4] = [0.4, 1.0, 0.4, 1.0];
    pub const STREAK_TEXT: [f32; 4] = [1.0, 0.4, 1.0, 1.0];
    pub const RECOVER_TEXT: [f32; 4] = [0.7, 0.7, 1.0, 1.0];
}
