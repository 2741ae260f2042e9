//! Pooled particles and floating texts
//!
//! Particles churn fast, so they live in a fixed-capacity arena with an
//! index free-list. A slot is either on the free-list or in `active`,
//! never both.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, SimCtx};
use crate::consts::FLOATING_TEXT_SECS;
use crate::renderer::{DrawList, Viewport};

/// Downward pull on particles, units per second squared
const PARTICLE_GRAVITY: f32 = 9.0;
/// Per-second velocity damping
const PARTICLE_DRAG: f32 = 0.9;

/// A particle for visual effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: [f32; 4],
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            color: [1.0; 4],
            life: 0.0,
            max_life: 1.0,
            size: 0.15,
        }
    }
}

impl Particle {
    /// Fade alpha from remaining life
    pub fn alpha(&self) -> f32 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    fn advance(&mut self, dt: f32) {
        self.vel.y -= PARTICLE_GRAVITY * dt;
        self.vel *= 1.0 - (1.0 - PARTICLE_DRAG) * dt.min(1.0);
        self.pos += self.vel * dt;
        self.life -= dt;
    }
}

/// Fixed-capacity particle arena
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: Vec<Particle>,
    free: Vec<usize>,
    active: Vec<usize>,
}

impl ParticlePool {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::default(); capacity],
            // Reversed so slot 0 is handed out first
            free: (0..capacity).rev().collect(),
            active: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live particles
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Number of slots not on the free-list
    pub fn checked_out(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Check out a slot, fully reset. None when the pool is exhausted.
    pub fn acquire(&mut self) -> Option<usize> {
        let idx = self.free.pop()?;
        self.slots[idx] = Particle::default();
        self.active.push(idx);
        Some(idx)
    }

    /// Return a slot to the free-list. Ignores slots that are not active.
    pub fn release(&mut self, idx: usize) {
        if let Some(pos) = self.active.iter().position(|&a| a == idx) {
            self.active.swap_remove(pos);
            self.free.push(idx);
        }
    }

    pub fn get(&self, idx: usize) -> Option<&Particle> {
        self.active.contains(&idx).then(|| &self.slots[idx])
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Particle> {
        if self.active.contains(&idx) {
            Some(&mut self.slots[idx])
        } else {
            None
        }
    }

    /// Check out a slot and fill it. Returns false when the pool is full.
    pub fn spawn(&mut self, particle: Particle) -> bool {
        match self.acquire() {
            Some(idx) => {
                self.slots[idx] = particle;
                true
            }
            None => false,
        }
    }

    /// Spray `count` particles from `origin` in random directions
    pub fn burst(&mut self, rng: &mut Pcg32, origin: Vec3, count: usize, color: [f32; 4], speed: f32) {
        for _ in 0..count {
            let dir = Vec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(0.0..1.0),
                rng.random_range(-1.0..1.0),
            )
            .normalize_or_zero();
            let life = rng.random_range(0.3..0.8);
            let spawned = self.spawn(Particle {
                pos: origin,
                vel: dir * speed * rng.random_range(0.5..1.0),
                color,
                life,
                max_life: life,
                size: rng.random_range(0.08..0.22),
            });
            if !spawned {
                break;
            }
        }
    }

    /// Advance every live particle and return expired slots to the pool
    pub fn update(&mut self, dt: f32) {
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let idx = self.active[i];
            let particle = &mut self.slots[idx];
            particle.advance(dt);
            if particle.life <= 0.0 {
                self.active.swap_remove(i);
                self.free.push(idx);
            }
        }
    }

    /// Return every slot to the pool
    pub fn clear(&mut self) {
        self.free.extend(self.active.drain(..));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.active.iter().map(|&idx| &self.slots[idx])
    }

    pub fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        for particle in self.iter() {
            if let Some(p) = viewport.project(particle.pos) {
                let mut color = particle.color;
                color[3] *= particle.alpha();
                list.circle(p.pos, (particle.size * p.scale).max(1.0), color);
            }
        }
    }
}

/// Rising, fading text (damage numbers, rewards, announcements)
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingText {
    pub pos: Vec3,
    pub text: String,
    pub color: [f32; 4],
    pub life: f32,
}

impl FloatingText {
    pub fn new(pos: Vec3, text: String, color: [f32; 4]) -> Self {
        Self {
            pos,
            text,
            color,
            life: FLOATING_TEXT_SECS,
        }
    }
}

impl Entity for FloatingText {
    fn update(&mut self, ctx: &mut SimCtx<'_>) {
        self.pos.y += 1.5 * ctx.dt;
        self.life -= ctx.dt;
    }

    fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        if let Some(p) = viewport.project(self.pos) {
            let mut color = self.color;
            color[3] = (self.life / FLOATING_TEXT_SECS).clamp(0.0, 1.0);
            list.label(p.pos, self.text.clone(), color, (0.6 * p.scale).max(10.0));
        }
    }

    fn is_expired(&self) -> bool {
        self.life <= 0.0
    }
}
