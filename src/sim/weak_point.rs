//! Boss vulnerability window: weak points and the countdown that owns them

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::projectile_hits_point;
use super::entity::{Entity, SimCtx, purge_expired};
use super::projectile::Projectile;
use crate::consts::*;
use crate::renderer::{DrawList, Viewport, colors};

/// One-hit target spawned around a stunned boss
#[derive(Debug, Clone, PartialEq)]
pub struct WeakPoint {
    pub id: u32,
    pub pos: Vec3,
    pub spawned_at: f64,
    /// Seconds left before it vanishes on its own
    pub remaining: f32,
    pub health: u8,
    pulse: f32,
}

impl WeakPoint {
    pub fn new(id: u32, pos: Vec3, spawned_at: f64) -> Self {
        Self {
            id,
            pos,
            spawned_at,
            remaining: WEAK_POINT_LIFETIME_SECS,
            health: 1,
            pulse: 0.0,
        }
    }

    pub fn is_destroyed(&self) -> bool {
        self.health == 0
    }
}

impl Entity for WeakPoint {
    fn update(&mut self, ctx: &mut SimCtx<'_>) {
        self.remaining -= ctx.dt;
        self.pulse += ctx.dt * 8.0;
    }

    fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        let Some(p) = viewport.project(self.pos) else {
            return;
        };
        let r = WEAK_POINT_RADIUS * p.scale * (1.0 + 0.15 * self.pulse.sin());
        list.circle(p.pos, r, colors::WEAK_POINT);
        list.ring(p.pos, r * 1.2, r * 1.4, colors::WEAK_POINT_RING);
    }

    fn is_expired(&self) -> bool {
        self.is_destroyed() || self.remaining <= 0.0
    }
}

/// State of a running vulnerability window
#[derive(Debug, Clone, PartialEq)]
pub struct Minigame {
    pub boss_id: u32,
    /// Whole seconds left, counted down on a one-second schedule
    pub seconds_left: u32,
    pub hits: u32,
    pub weak_points: Vec<WeakPoint>,
    next_id: u32,
}

impl Minigame {
    pub fn new(boss_id: u32) -> Self {
        Self {
            boss_id,
            seconds_left: MINIGAME_DURATION_SECS,
            hits: 0,
            weak_points: Vec::new(),
            next_id: 1,
        }
    }

    /// Place a weak point at a random offset around the boss
    pub fn spawn_around(&mut self, rng: &mut Pcg32, boss_center: Vec3, clock: f64) -> u32 {
        let offset = Vec3::new(
            rng.random_range(-WEAK_POINT_SPREAD..WEAK_POINT_SPREAD),
            rng.random_range(-WEAK_POINT_SPREAD * 0.5..WEAK_POINT_SPREAD),
            rng.random_range(0.0..1.0),
        );
        let mut pos = boss_center + offset;
        pos.y = pos.y.max(0.5);
        let id = self.next_id;
        self.next_id += 1;
        self.weak_points.push(WeakPoint::new(id, pos, clock));
        id
    }

    /// Test a shot against live weak points. A hit destroys the point,
    /// consumes the shot and counts toward the bonus.
    pub fn hit_test(&mut self, shot: &mut Projectile) -> Option<Vec3> {
        let point = self
            .weak_points
            .iter_mut()
            .filter(|w| !w.is_expired())
            .find(|w| projectile_hits_point(shot, w.pos, WEAK_POINT_RADIUS).is_some())?;
        point.health = 0;
        shot.consume();
        self.hits += 1;
        Some(point.pos)
    }

    pub fn update(&mut self, ctx: &mut SimCtx<'_>) {
        for point in &mut self.weak_points {
            point.update(ctx);
        }
        purge_expired(&mut self.weak_points);
    }

    /// Drop every weak point regardless of remaining lifetime
    pub fn clear(&mut self) {
        self.weak_points.clear();
    }

    /// Bonus damage earned so far
    pub fn bonus_damage(&self) -> f32 {
        self.hits as f32 * MINIGAME_DAMAGE_PER_HIT
    }

    pub fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        for point in &self.weak_points {
            point.draw(list, viewport);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_hit_destroys_point_and_consumes_shot() {
        let mut game = Minigame::new(1);
        let mut rng = Pcg32::seed_from_u64(5);
        game.spawn_around(&mut rng, Vec3::new(0.0, 3.0, -18.0), 0.0);
        let target = game.weak_points[0].pos;

        let mut shot = Projectile::new(target + Vec3::Z, Vec3::NEG_Z, 15.0, None);
        shot.prev = shot.pos;
        shot.pos = target;

        assert_eq!(game.hit_test(&mut shot), Some(target));
        assert_eq!(game.hits, 1);
        assert!(!shot.is_live());
        assert!(game.weak_points[0].is_expired());

        // Destroyed points cannot be hit twice
        let mut again = Projectile::new(target, Vec3::NEG_Z, 15.0, None);
        assert_eq!(game.hit_test(&mut again), None);
        assert_eq!(game.hits, 1);
    }

    #[test]
    fn test_clear_removes_live_points() {
        let mut game = Minigame::new(1);
        let mut rng = Pcg32::seed_from_u64(5);
        for i in 0..4 {
            game.spawn_around(&mut rng, Vec3::ZERO, i as f64);
        }
        assert_eq!(game.weak_points.len(), 4);
        game.clear();
        assert!(game.weak_points.is_empty());
    }

    #[test]
    fn test_bonus_damage_per_hit() {
        let mut game = Minigame::new(1);
        game.hits = 3;
        assert_eq!(game.bonus_damage(), 3.0 * MINIGAME_DAMAGE_PER_HIT);
        assert_eq!(game.seconds_left, MINIGAME_DURATION_SECS);
    }

    #[test]
    fn test_weak_point_expires_after_lifetime() {
        let mut point = WeakPoint::new(1, Vec3::ZERO, 0.0);
        assert!(!point.is_expired());
        point.remaining = 0.0;
        assert!(point.is_expired());
    }
}
