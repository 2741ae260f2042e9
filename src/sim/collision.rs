//! Collision detection for the rail world
//!
//! Player shots move fast relative to small targets, so hits are tested
//! against the segment swept during the frame rather than the end point.

use glam::Vec3;

use super::enemy::Enemy;
use super::projectile::{EnemyProjectile, Projectile};

/// Result of a swept hit test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Fraction along the swept segment where the contact happens (0..=1)
    pub t: f32,
    pub point: Vec3,
}

/// Closest approach of segment `a -> b` to a sphere.
/// Returns the earliest contact when they overlap.
pub fn segment_sphere_hit(a: Vec3, b: Vec3, center: Vec3, radius: f32) -> Option<Contact> {
    let seg = b - a;
    let len_sq = seg.length_squared();
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        ((center - a).dot(seg) / len_sq).clamp(0.0, 1.0)
    };
    let point = a + seg * t;
    (point.distance_squared(center) <= radius * radius).then_some(Contact { t, point })
}

/// Swept test of a player shot against an enemy's body
pub fn projectile_hits_enemy(shot: &Projectile, enemy: &Enemy) -> Option<Contact> {
    if !shot.is_live() || enemy.marked_for_removal {
        return None;
    }
    segment_sphere_hit(shot.prev, shot.pos, enemy.center(), enemy.radius + shot.radius)
}

/// Swept test of a player shot against a small sphere (weak points)
pub fn projectile_hits_point(shot: &Projectile, center: Vec3, radius: f32) -> Option<Contact> {
    if !shot.is_live() {
        return None;
    }
    segment_sphere_hit(shot.prev, shot.pos, center, radius + shot.radius)
}

/// True when an arrived enemy shot lands within reach of the player's lane
pub fn enemy_shot_hits_player(shot: &EnemyProjectile, player_x: f32) -> bool {
    shot.is_live() && shot.arrived() && (shot.pos.x - player_x).abs() <= shot.hit_radius()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::enemy::EnemyKind;
    use crate::sim::projectile::ShotKind;

    #[test]
    fn test_segment_sphere_hit_center() {
        let hit = segment_sphere_hit(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, -10.0),
            Vec3::new(0.0, 1.0, -5.0),
            1.0,
        )
        .unwrap();
        assert!((hit.t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_segment_sphere_miss() {
        let hit = segment_sphere_hit(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(3.0, 0.0, -5.0),
            1.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_zero_length_segment_is_point_test() {
        let p = Vec3::new(0.5, 0.0, 0.0);
        assert!(segment_sphere_hit(p, p, Vec3::ZERO, 1.0).is_some());
        assert!(segment_sphere_hit(p, p, Vec3::new(5.0, 0.0, 0.0), 1.0).is_none());
    }

    #[test]
    fn test_fast_shot_does_not_tunnel() {
        let enemy = Enemy::new(1, EnemyKind::Npc, 1, Vec3::new(0.0, 0.0, -10.0), 0.0);
        let mut shot = Projectile::new(
            Vec3::new(0.0, enemy.center().y, -8.0),
            Vec3::new(0.0, 0.0, -5.0),
            15.0,
            None,
        );
        shot.prev = shot.pos;
        shot.pos += shot.vel;
        assert!(projectile_hits_enemy(&shot, &enemy).is_some());
    }

    #[test]
    fn test_spent_shot_never_hits() {
        let enemy = Enemy::new(1, EnemyKind::Npc, 1, Vec3::new(0.0, 0.0, -10.0), 0.0);
        let mut shot = Projectile::new(enemy.center(), Vec3::NEG_Z, 15.0, None);
        shot.consume();
        assert!(projectile_hits_enemy(&shot, &enemy).is_none());
    }

    #[test]
    fn test_enemy_shot_lane_check() {
        let mut shot = EnemyProjectile::aimed(ShotKind::Orb, Vec3::new(0.0, 2.0, -10.0), 0.0, 0.5, 8.0);
        shot.pos = Vec3::new(0.5, 1.0, PLAYER_Z);
        assert!(enemy_shot_hits_player(&shot, 0.0));
        assert!(!enemy_shot_hits_player(&shot, 0.5 + PLAYER_HIT_RADIUS + 0.1));
    }
}
