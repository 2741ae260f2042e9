//! Shared per-frame contract for everything living in an active list

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::effects::{EffectsSink, Shake};
use super::particles::{FloatingText, ParticlePool};
use super::progression::PlayerStats;
use super::projectile::EnemyProjectile;
use crate::renderer::{DrawList, Viewport};

/// An update/draw/expiry unit owned by one of the world's active lists
pub trait Entity {
    /// Advance one simulation tick
    fn update(&mut self, ctx: &mut SimCtx<'_>);
    /// Emit geometry for the current state. Never mutates simulation state.
    fn draw(&self, list: &mut DrawList, viewport: &Viewport);
    /// True once the entity should leave its list
    fn is_expired(&self) -> bool;
}

/// Remove every expired entity, returning how many were purged
pub fn purge_expired<E: Entity>(list: &mut Vec<E>) -> usize {
    let before = list.len();
    list.retain(|e| !e.is_expired());
    before - list.len()
}

/// Requests entities raise during update, applied by the frame loop in order
#[derive(Debug, Clone)]
pub enum WorldCommand {
    /// An enemy landed a melee hit on the player
    Melee { enemy_id: u32, damage: f32 },
    /// An enemy fired a shot
    EnemyShot(EnemyProjectile),
    /// An escapee left the arena (no rewards)
    Escaped { enemy_id: u32 },
}

/// Borrowed slices of the world an entity may touch while updating
pub struct SimCtx<'a> {
    /// Run clock in seconds
    pub clock: f64,
    pub dt: f32,
    pub player_x: f32,
    /// Positions of live enemies (for homing)
    pub targets: &'a [Vec3],
    pub stats: &'a PlayerStats,
    pub rng: &'a mut Pcg32,
    pub particles: &'a mut ParticlePool,
    pub texts: &'a mut Vec<FloatingText>,
    pub sink: &'a mut dyn EffectsSink,
    pub commands: &'a mut Vec<WorldCommand>,
    pub show_texts: bool,
    pub shake_enabled: bool,
}

impl SimCtx<'_> {
    /// Uniform random value in [0, 1)
    pub fn roll(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    /// Spawn a burst of pooled particles
    pub fn burst(&mut self, origin: Vec3, count: usize, color: [f32; 4], speed: f32) {
        self.particles.burst(self.rng, origin, count, color, speed);
    }

    /// Spawn a floating text (suppressed when damage numbers are off)
    pub fn text(&mut self, pos: Vec3, text: impl Into<String>, color: [f32; 4]) {
        if self.show_texts {
            self.texts.push(FloatingText::new(pos, text.into(), color));
        }
    }

    pub fn shake(&mut self, kind: Shake) {
        if self.shake_enabled {
            self.sink.shake(kind);
        }
    }
}
