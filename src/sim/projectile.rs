//! Player and enemy projectiles

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::entity::{Entity, SimCtx};
use crate::consts::*;
use crate::renderer::{DrawList, Viewport, colors};

/// Optional projectile behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Special {
    /// Tumbles as it flies (novelty weapons)
    Spin,
    /// Leaves a particle trail
    Trail,
    /// Steers toward the nearest enemy and trails
    Homing,
}

/// A player-fired projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub pos: Vec3,
    /// Position at the start of this frame, for swept hit tests
    pub prev: Vec3,
    /// Units per frame
    pub vel: Vec3,
    /// Frames left. Zero means spent.
    pub life: u32,
    pub damage: f32,
    pub radius: f32,
    pub special: Option<Special>,
    pub spin: f32,
    age: u32,
}

impl Projectile {
    pub fn new(pos: Vec3, vel: Vec3, damage: f32, special: Option<Special>) -> Self {
        Self {
            pos,
            prev: pos,
            vel,
            life: PROJECTILE_LIFE_FRAMES,
            damage,
            radius: PROJECTILE_RADIUS,
            special,
            spin: 0.0,
            age: 0,
        }
    }

    /// Spend the projectile so nothing else collides with it this frame
    pub fn consume(&mut self) {
        self.life = 0;
    }

    pub fn is_live(&self) -> bool {
        self.life > 0
    }

    fn steer(&mut self, targets: &[Vec3]) {
        let nearest = targets
            .iter()
            .filter(|t| t.z < self.pos.z)
            .min_by(|a, b| {
                a.distance_squared(self.pos)
                    .partial_cmp(&b.distance_squared(self.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(target) = nearest {
            let speed = self.vel.length();
            let desired = (*target - self.pos).normalize_or_zero() * speed;
            self.vel = self.vel.lerp(desired, HOMING_TURN_RATE).normalize_or_zero() * speed;
        }
    }

    fn out_of_bounds(&self) -> bool {
        self.pos.z < WORLD_MIN_Z
            || self.pos.x.abs() > WORLD_HALF_WIDTH * 2.0
            || self.pos.y < -1.0
            || self.pos.y > WORLD_MAX_Y * 2.0
    }
}

impl Entity for Projectile {
    fn update(&mut self, ctx: &mut SimCtx<'_>) {
        if !self.is_live() {
            return;
        }
        self.prev = self.pos;
        self.age += 1;

        match self.special {
            Some(Special::Homing) => {
                self.steer(ctx.targets);
                if self.age % 2 == 0 {
                    ctx.burst(self.pos, 1, colors::TRAIL, 0.5);
                }
            }
            Some(Special::Trail) => {
                if self.age % 2 == 0 {
                    ctx.burst(self.pos, 1, colors::TRAIL, 0.3);
                }
            }
            Some(Special::Spin) => self.spin += 0.3,
            None => {}
        }

        self.pos += self.vel;
        self.life -= 1;
        if self.out_of_bounds() {
            self.life = 0;
        }
    }

    fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        let Some(p) = viewport.project(self.pos) else {
            return;
        };
        let size = (self.radius * p.scale).max(2.0);
        match self.special {
            Some(Special::Spin) => {
                let arm = Vec2::new(self.spin.cos(), self.spin.sin()) * size * 1.5;
                list.line(p.pos - arm, p.pos + arm, size * 0.6, colors::CHICKEN);
            }
            _ => list.circle(p.pos, size, colors::PLAYER_SHOT),
        }
    }

    fn is_expired(&self) -> bool {
        self.life == 0
    }
}

/// Enemy shot variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotKind {
    /// Boss energy orb aimed at the player
    Orb,
    /// Ranged-variant thrown controller
    Gamer,
    /// Falls from above and damages an area on impact
    Hazard,
}

/// A projectile fired at the player
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyProjectile {
    pub kind: ShotKind,
    pub pos: Vec3,
    pub vel: Vec3,
    pub life: u32,
    pub damage: f32,
    pub spin: f32,
}

impl EnemyProjectile {
    /// A straight shot from `origin` toward the player's current position
    pub fn aimed(kind: ShotKind, origin: Vec3, player_x: f32, speed: f32, damage: f32) -> Self {
        let target = Vec3::new(player_x, PLAYER_MUZZLE_Y, PLAYER_Z);
        Self {
            kind,
            pos: origin,
            vel: (target - origin).normalize_or_zero() * speed,
            life: ENEMY_SHOT_LIFE_FRAMES,
            damage,
            spin: 0.0,
        }
    }

    /// A hazard dropped above the player's current lane
    pub fn hazard(player_x: f32, damage: f32) -> Self {
        Self {
            kind: ShotKind::Hazard,
            pos: Vec3::new(player_x, HAZARD_DROP_HEIGHT, PLAYER_Z - 1.0),
            vel: Vec3::ZERO,
            life: ENEMY_SHOT_LIFE_FRAMES,
            damage,
            spin: 0.0,
        }
    }

    pub fn consume(&mut self) {
        self.life = 0;
    }

    pub fn is_live(&self) -> bool {
        self.life > 0
    }

    /// True once the shot has reached the player plane (or the ground, for hazards)
    pub fn arrived(&self) -> bool {
        match self.kind {
            ShotKind::Hazard => self.pos.y <= 0.0,
            ShotKind::Orb | ShotKind::Gamer => self.pos.z >= PLAYER_Z - 0.5,
        }
    }

    /// Lateral reach of the impact
    pub fn hit_radius(&self) -> f32 {
        match self.kind {
            ShotKind::Hazard => HAZARD_RADIUS,
            ShotKind::Orb | ShotKind::Gamer => PLAYER_HIT_RADIUS,
        }
    }
}

impl Entity for EnemyProjectile {
    fn update(&mut self, _ctx: &mut SimCtx<'_>) {
        if !self.is_live() {
            return;
        }
        match self.kind {
            ShotKind::Hazard => self.vel.y -= HAZARD_GRAVITY,
            ShotKind::Gamer => self.spin += 0.4,
            ShotKind::Orb => {}
        }
        self.pos += self.vel;
        self.life -= 1;
    }

    fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        let Some(p) = viewport.project(self.pos) else {
            return;
        };
        match self.kind {
            ShotKind::Orb => list.circle(p.pos, (0.45 * p.scale).max(3.0), colors::BOSS_ORB),
            ShotKind::Gamer => {
                let half = (0.35 * p.scale).max(2.0);
                list.rect(p.pos, Vec2::splat(half), colors::GAMER_SHOT);
            }
            ShotKind::Hazard => {
                list.circle(p.pos, (0.6 * p.scale).max(3.0), colors::HAZARD);
                // Landing marker on the ground
                let ground = Vec3::new(self.pos.x, 0.0, self.pos.z);
                if let Some(g) = viewport.project(ground) {
                    let r = HAZARD_RADIUS * g.scale;
                    list.ring(g.pos, r * 0.9, r, colors::HAZARD);
                }
            }
        }
    }

    fn is_expired(&self) -> bool {
        self.life == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_spends_projectile() {
        let mut shot = Projectile::new(Vec3::ZERO, Vec3::NEG_Z, 10.0, None);
        assert!(shot.is_live());
        shot.consume();
        assert!(shot.is_expired());
    }

    #[test]
    fn test_aimed_shot_heads_for_player() {
        let shot = EnemyProjectile::aimed(
            ShotKind::Orb,
            Vec3::new(4.0, 2.0, -20.0),
            0.0,
            0.5,
            8.0,
        );
        assert!(shot.vel.z > 0.0);
        assert!(shot.vel.x < 0.0);
        assert!((shot.vel.length() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_hazard_arrives_on_ground() {
        let mut shot = EnemyProjectile::hazard(2.0, HAZARD_DAMAGE);
        assert!(!shot.arrived());
        shot.pos.y = -0.1;
        assert!(shot.arrived());
        assert_eq!(shot.hit_radius(), HAZARD_RADIUS);
    }
}
