//! Brainrot Defense - a rail shooter wave defense game
//!
//! Core modules:
//! - `sim`: Simulation core (entities, waves, combat, frame loop)
//! - `renderer`: Draw-list generation from simulation state
//! - `settings`: Player preferences
//! - `meta`: Meta-progression persisted between runs

pub mod error;
pub mod meta;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{PersistError, PurchaseError};
pub use meta::MetaProgress;
pub use settings::{QualityPreset, Settings};

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    /// Nominal frame timestep (the loop runs once per animation frame)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest dt accepted for a single tick (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// World bounds. Enemies approach along +z toward the player at z = 0.
    pub const WORLD_HALF_WIDTH: f32 = 12.0;
    pub const WORLD_MIN_Z: f32 = -80.0;
    pub const WORLD_MAX_Y: f32 = 12.0;
    /// Closest an enemy may get to the player plane
    pub const ENEMY_MIN_DEPTH: f32 = -0.5;

    /// Player defaults
    pub const PLAYER_Z: f32 = 0.0;
    pub const PLAYER_MUZZLE_Y: f32 = 1.2;
    pub const PLAYER_MAX_SPEED: f32 = 18.0; // units per second
    pub const PLAYER_HIT_RADIUS: f32 = 1.2;
    pub const PLAYER_BASE_HEALTH: f32 = 100.0;
    /// Aim pointer (-1..1) to direction slope
    pub const AIM_SPREAD_X: f32 = 0.6;
    pub const AIM_SPREAD_Y: f32 = 0.4;

    /// Melee
    pub const MELEE_RANGE: f32 = 2.0;
    pub const MELEE_DAMAGE: f32 = 10.0;
    pub const MELEE_COOLDOWN_SECS: f64 = 1.0;

    /// Wave sizing
    pub const ENEMIES_BASE_COUNT: u32 = 3;
    pub const ENEMIES_PER_WAVE: u32 = 2;
    pub const SPAWN_STAGGER_SECS: f64 = 0.8;
    pub const ENEMY_SPAWN_Z: f32 = -60.0;
    /// Enemy health grows by this fraction per wave after the first
    pub const HEALTH_SCALE_PER_WAVE: f32 = 0.15;

    /// Escapee ("sigma") variant
    pub const SIGMA_SPAWN_CHANCE: f64 = 0.03;
    pub const SIGMA_START_Z: f32 = -20.0;
    pub const SIGMA_LATERAL_SPEED: f32 = 0.08;
    pub const SIGMA_ESCAPE_X: f32 = 14.0;

    /// Ranged ("gamer") variant
    pub const GAMER_MIN_WAVE: u32 = 3;
    pub const GAMER_HOLD_Z: f32 = -25.0;
    pub const GAMER_SHOOT_COOLDOWN_SECS: f64 = 2.5;
    pub const GAMER_SHOT_DAMAGE: f32 = 5.0;
    pub const GAMER_SHOT_SPEED: f32 = 0.35;

    /// Boss waves
    pub const BOSS_WAVE_INTERVAL: u32 = 5;
    pub const BOSS_INTRO_STAGES: u8 = 3;
    pub const BOSS_INTRO_STAGE_SECS: f64 = 1.2;
    pub const BOSS_SPAWN_Z: f32 = -40.0;
    pub const BOSS_HOLD_Z: f32 = -18.0;
    pub const BOSS_PHASE2_THRESHOLD: f32 = 0.66;
    pub const BOSS_PHASE3_THRESHOLD: f32 = 0.33;
    pub const PHASE_TRANSITION_SECS: f64 = 1.5;
    pub const BOSS_ASCEND_HEIGHT: f32 = 4.0;
    /// Per-frame lerp factor toward the ascend target
    pub const BOSS_ASCEND_RATE: f32 = 0.05;
    pub const BOSS_SHOOT_COOLDOWN_SECS: f64 = 2.0;
    pub const BOSS_SHOT_DAMAGE: f32 = 8.0;
    pub const BOSS_SHOT_SPEED: f32 = 0.5;
    /// Indexed by phase - 1
    pub const PHASE_COOLDOWN_MULT: [f64; 3] = [1.0, 0.7, 0.5];
    pub const PHASE_DAMAGE_MULT: [f32; 3] = [1.0, 1.3, 1.6];
    pub const HAZARD_COOLDOWN_SECS: f64 = 3.0;
    pub const HAZARD_DAMAGE: f32 = 12.0;
    pub const HAZARD_RADIUS: f32 = 2.5;
    pub const HAZARD_DROP_HEIGHT: f32 = 10.0;
    pub const HAZARD_GRAVITY: f32 = 0.01;

    /// Weak-point vulnerability minigame
    pub const MINIGAME_TRIGGER_FRACTION: f32 = 0.5;
    pub const MINIGAME_TRIGGER_BAND: f32 = 0.05;
    pub const MINIGAME_DURATION_SECS: u32 = 8;
    pub const WEAK_POINT_SPAWN_SECS: f64 = 0.6;
    pub const WEAK_POINT_LIFETIME_SECS: f32 = 1.5;
    pub const WEAK_POINT_RADIUS: f32 = 0.8;
    pub const WEAK_POINT_SPREAD: f32 = 3.0;
    pub const MINIGAME_DAMAGE_PER_HIT: f32 = 40.0;

    /// Between waves
    pub const WAVE_CLEAR_HEAL: f32 = 15.0;
    pub const WAVE_CLEAR_DELAY_SECS: f64 = 2.0;

    /// Heal ability
    pub const HEAL_KILLS_REQUIRED: u32 = 10;
    pub const HEAL_AMOUNT: f32 = 30.0;

    /// Combo / streaks
    pub const COMBO_WINDOW_SECS: f64 = 3.0;
    pub const COMBO_STEP: f32 = 0.1;
    pub const COMBO_MAX_MULTIPLIER: f32 = 3.0;
    pub const KILL_STREAK_MILESTONES: [u32; 5] = [3, 5, 10, 15, 25];

    /// Projectiles
    pub const PROJECTILE_LIFE_FRAMES: u32 = 120;
    pub const ENEMY_SHOT_LIFE_FRAMES: u32 = 600;
    pub const PROJECTILE_RADIUS: f32 = 0.25;
    pub const HOMING_TURN_RATE: f32 = 0.12;

    /// Visual effects
    pub const HIT_FLASH_SECS: f32 = 0.1;
    pub const HIT_PARTICLES: usize = 5;
    pub const DEATH_PARTICLES: usize = 20;
    pub const MAX_PARTICLES: usize = 512;
    pub const FLOATING_TEXT_SECS: f32 = 1.0;
}

/// Move `current` a fraction of the way toward `target` (single-pole lerp)
#[inline]
pub fn approach(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate.clamp(0.0, 1.0)
}

/// Distance on the ground plane (x, z), ignoring height
#[inline]
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Direction from the ground-plane position `from` to `to`, normalized
#[inline]
pub fn ground_direction(from: Vec3, to: Vec3) -> Vec2 {
    Vec2::new(to.x - from.x, to.z - from.z).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_converges_without_overshoot() {
        let mut y = 0.0;
        for _ in 0..200 {
            y = approach(y, 4.0, 0.05);
            assert!(y <= 4.0);
        }
        assert!((y - 4.0).abs() < 0.01);
    }

    #[test]
    fn test_ground_distance_ignores_height() {
        let a = Vec3::new(0.0, 10.0, 0.0);
        let b = Vec3::new(3.0, 0.0, -4.0);
        assert!((ground_distance(a, b) - 5.0).abs() < 1e-5);
    }
}
