//! Enemy catalog, behavior state machine and damage intake

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::effects::{DialogueTrigger, Shake, Sound};
use super::entity::{Entity, SimCtx, WorldCommand};
use super::projectile::{EnemyProjectile, ShotKind};
use crate::consts::*;
use crate::renderer::{DrawList, Viewport, colors};
use crate::{approach, ground_direction, ground_distance};

/// Enemy template keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Skibidi,
    Npc,
    Rizzler,
    /// Ranged variant, only after `GAMER_MIN_WAVE`
    Gamer,
    /// Escapee variant, walks sideways and leaves
    Sigma,
    SkibidiKing,
    OhioOverlord,
}

/// Static per-kind parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub base_health: f32,
    /// Units per frame
    pub speed: f32,
    pub points: u64,
    pub coins: u64,
    pub radius: f32,
    /// Relative weight in the regular spawn draw (0 = never drawn)
    pub spawn_weight: u32,
    pub min_wave: u32,
    pub color: [f32; 4],
}

impl EnemyKind {
    /// Kinds eligible for the weighted regular draw
    pub const REGULAR: [EnemyKind; 4] = [
        EnemyKind::Skibidi,
        EnemyKind::Npc,
        EnemyKind::Rizzler,
        EnemyKind::Gamer,
    ];

    pub const BOSSES: [EnemyKind; 2] = [EnemyKind::SkibidiKing, EnemyKind::OhioOverlord];

    pub fn template(self) -> EnemyTemplate {
        match self {
            EnemyKind::Skibidi => EnemyTemplate {
                name: "Skibidi",
                base_health: 20.0,
                speed: 0.08,
                points: 100,
                coins: 5,
                radius: 1.0,
                spawn_weight: 50,
                min_wave: 1,
                color: colors::SKIBIDI,
            },
            EnemyKind::Npc => EnemyTemplate {
                name: "NPC",
                base_health: 12.0,
                speed: 0.12,
                points: 80,
                coins: 4,
                radius: 0.8,
                spawn_weight: 30,
                min_wave: 1,
                color: colors::NPC,
            },
            EnemyKind::Rizzler => EnemyTemplate {
                name: "Rizzler",
                base_health: 45.0,
                speed: 0.05,
                points: 200,
                coins: 10,
                radius: 1.3,
                spawn_weight: 15,
                min_wave: 1,
                color: colors::RIZZLER,
            },
            EnemyKind::Gamer => EnemyTemplate {
                name: "Gamer",
                base_health: 25.0,
                speed: 0.07,
                points: 150,
                coins: 8,
                radius: 1.0,
                spawn_weight: 20,
                min_wave: GAMER_MIN_WAVE,
                color: colors::GAMER,
            },
            EnemyKind::Sigma => EnemyTemplate {
                name: "Sigma",
                base_health: 60.0,
                speed: SIGMA_LATERAL_SPEED,
                points: 1000,
                coins: 50,
                radius: 1.0,
                spawn_weight: 0,
                min_wave: 1,
                color: colors::SIGMA,
            },
            EnemyKind::SkibidiKing => EnemyTemplate {
                name: "Skibidi King",
                base_health: 600.0,
                speed: 0.04,
                points: 5000,
                coins: 200,
                radius: 3.0,
                spawn_weight: 0,
                min_wave: BOSS_WAVE_INTERVAL,
                color: colors::BOSS,
            },
            EnemyKind::OhioOverlord => EnemyTemplate {
                name: "Ohio Overlord",
                base_health: 800.0,
                speed: 0.035,
                points: 7500,
                coins: 300,
                radius: 3.4,
                spawn_weight: 0,
                min_wave: BOSS_WAVE_INTERVAL,
                color: colors::BOSS_ALT,
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.template().name
    }

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::SkibidiKing | EnemyKind::OhioOverlord)
    }

    /// Bosses alternate every boss wave
    pub fn boss_for_wave(wave: u32) -> EnemyKind {
        let index = (wave / BOSS_WAVE_INTERVAL).saturating_sub(1) as usize;
        Self::BOSSES[index % Self::BOSSES.len()]
    }
}

/// Health multiplier applied at spawn
pub fn wave_health_scale(wave: u32) -> f32 {
    1.0 + wave.saturating_sub(1) as f32 * HEALTH_SCALE_PER_WAVE
}

/// Behavior state. Boss phase is tracked separately in `Enemy::phase`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Approaching,
    /// In melee range of the player
    Engaged,
    /// Boss between phases until the clock reaches `until`
    Transitioning { until: f64 },
    /// Boss frozen during the weak-point minigame
    Stunned,
    /// Escapee walking out of the arena
    Escaping,
}

/// Result of one `take_damage` call
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HitOutcome {
    /// False when the hit was ignored entirely
    pub applied: bool,
    pub lethal: bool,
    pub crit: bool,
    pub damage: f32,
    /// New boss health-bar fraction
    pub boss_fraction: Option<f32>,
    /// Phase the boss just entered
    pub phase_changed: Option<u8>,
    /// The weak-point minigame should start now
    pub start_minigame: bool,
}

/// One active hostile
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec3,
    /// Only escapees carry their own velocity
    pub vel: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub speed: f32,
    pub radius: f32,
    pub behavior: Behavior,
    /// Boss phase, 1..=3
    pub phase: u8,
    /// Current vertical offset (bosses rise in phase 3)
    pub ascend: f32,
    pub ascend_target: f32,
    pub hit_flash: f32,
    pub wobble: f32,
    pub last_melee_at: f64,
    pub last_shot_at: f64,
    pub last_hazard_at: f64,
    pub invulnerable: bool,
    pub minigame_triggered: bool,
    pub marked_for_removal: bool,
    pub escaped: bool,
    /// Stays true until a hit fails to kill
    pub was_one_shot: bool,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, wave: u32, pos: Vec3, clock: f64) -> Self {
        let template = kind.template();
        let max_health = template.base_health * wave_health_scale(wave);
        Self {
            id,
            kind,
            pos,
            vel: Vec3::ZERO,
            health: max_health,
            max_health,
            speed: template.speed,
            radius: template.radius,
            behavior: Behavior::Approaching,
            phase: 1,
            ascend: 0.0,
            ascend_target: 0.0,
            hit_flash: 0.0,
            wobble: 0.0,
            last_melee_at: f64::NEG_INFINITY,
            // Bosses and gamers wait one cooldown before the first shot
            last_shot_at: clock,
            last_hazard_at: clock,
            invulnerable: false,
            minigame_triggered: false,
            marked_for_removal: false,
            escaped: false,
            was_one_shot: true,
        }
    }

    /// Escapee with its scripted entrance: centered, walking to one side
    pub fn sigma(id: u32, wave: u32, clock: f64, heading_right: bool) -> Self {
        let mut enemy = Self::new(
            id,
            EnemyKind::Sigma,
            wave,
            Vec3::new(0.0, 0.0, SIGMA_START_Z),
            clock,
        );
        let dir = if heading_right { 1.0 } else { -1.0 };
        enemy.vel = Vec3::new(dir * SIGMA_LATERAL_SPEED, 0.0, 0.0);
        enemy.behavior = Behavior::Escaping;
        enemy
    }

    pub fn is_boss(&self) -> bool {
        self.kind.is_boss()
    }

    pub fn is_gamer(&self) -> bool {
        self.kind == EnemyKind::Gamer
    }

    pub fn is_sigma(&self) -> bool {
        self.kind == EnemyKind::Sigma
    }

    pub fn is_stunned(&self) -> bool {
        self.behavior == Behavior::Stunned
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.behavior, Behavior::Transitioning { .. })
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// World position including the boss ascend offset
    pub fn center(&self) -> Vec3 {
        self.pos + Vec3::new(0.0, self.radius + self.ascend, 0.0)
    }

    /// Freeze for the vulnerability window
    pub fn stun(&mut self) {
        self.behavior = Behavior::Stunned;
        self.invulnerable = false;
        self.wobble = 0.0;
    }

    pub fn unstun(&mut self) {
        if self.is_stunned() {
            self.behavior = Behavior::Approaching;
        }
    }

    /// Apply a weapon hit, rolling a crit from the player's stats.
    ///
    /// The caller owns the active list: a lethal outcome must be followed by
    /// the kill path, the enemy never removes itself.
    pub fn take_damage(&mut self, amount: f32, ctx: &mut SimCtx<'_>) -> HitOutcome {
        if self.invulnerable || self.marked_for_removal || self.health <= 0.0 {
            return HitOutcome::default();
        }

        let crit = ctx.roll() < ctx.stats.crit_chance;
        let damage = if crit {
            amount * ctx.stats.crit_multiplier
        } else {
            amount
        };
        self.health = (self.health - damage).max(0.0);
        self.hit_flash = HIT_FLASH_SECS;

        let at = self.center();
        ctx.burst(at, HIT_PARTICLES, self.kind.template().color, 4.0);
        if crit {
            ctx.text(at, format!("CRIT {}!", damage.round()), colors::CRIT_TEXT);
            ctx.sink.play_sound(Sound::Crit);
            ctx.shake(Shake::Crit);
        } else {
            ctx.text(at, format!("{}", damage.round()), colors::DAMAGE_TEXT);
            ctx.sink.play_sound(Sound::Hit);
        }
        ctx.sink.hit_marker(crit);

        let lethal = self.health <= 0.0;
        if !lethal {
            self.was_one_shot = false;
        }

        let mut outcome = HitOutcome {
            applied: true,
            lethal,
            crit,
            damage,
            ..HitOutcome::default()
        };

        if self.is_boss() {
            outcome.boss_fraction = Some(self.health_fraction());
            if !lethal {
                outcome.phase_changed = self.check_phase_transition(ctx.clock);
                outcome.start_minigame = self.check_minigame_trigger();
            }
        }
        outcome
    }

    /// Move to the next phase when health crosses its threshold.
    /// Each threshold fires at most once because the phase only moves forward.
    pub fn check_phase_transition(&mut self, clock: f64) -> Option<u8> {
        let fraction = self.health_fraction();
        let next = match self.phase {
            1 if fraction <= BOSS_PHASE2_THRESHOLD => 2,
            2 if fraction <= BOSS_PHASE3_THRESHOLD => 3,
            _ => return None,
        };
        self.phase = next;
        if next == 3 {
            self.ascend_target = BOSS_ASCEND_HEIGHT;
        }
        if !self.is_stunned() {
            self.behavior = Behavior::Transitioning {
                until: clock + PHASE_TRANSITION_SECS,
            };
            self.invulnerable = true;
        }
        log::debug!("{} entered phase {}", self.kind.name(), next);
        Some(next)
    }

    /// One-shot check for the weak-point minigame band
    pub fn check_minigame_trigger(&mut self) -> bool {
        if self.minigame_triggered || self.phase < 2 {
            return false;
        }
        let fraction = self.health_fraction();
        let in_band = fraction <= MINIGAME_TRIGGER_FRACTION
            && fraction > MINIGAME_TRIGGER_FRACTION - MINIGAME_TRIGGER_BAND;
        if in_band {
            self.minigame_triggered = true;
        }
        in_band
    }

    fn phase_index(&self) -> usize {
        (self.phase.clamp(1, 3) - 1) as usize
    }

    fn update_boss_attacks(&mut self, ctx: &mut SimCtx<'_>) {
        if self.is_transitioning() {
            return;
        }
        let phase = self.phase_index();
        let cooldown = BOSS_SHOOT_COOLDOWN_SECS * PHASE_COOLDOWN_MULT[phase];
        if ctx.clock - self.last_shot_at >= cooldown {
            self.last_shot_at = ctx.clock;
            let damage = BOSS_SHOT_DAMAGE * PHASE_DAMAGE_MULT[phase];
            ctx.commands.push(WorldCommand::EnemyShot(EnemyProjectile::aimed(
                ShotKind::Orb,
                self.center(),
                ctx.player_x,
                BOSS_SHOT_SPEED,
                damage,
            )));
        }
        if self.phase >= 3 && ctx.clock - self.last_hazard_at >= HAZARD_COOLDOWN_SECS {
            self.last_hazard_at = ctx.clock;
            ctx.commands
                .push(WorldCommand::EnemyShot(EnemyProjectile::hazard(
                    ctx.player_x,
                    HAZARD_DAMAGE * PHASE_DAMAGE_MULT[phase],
                )));
        }
    }

    fn update_gamer_attacks(&mut self, ctx: &mut SimCtx<'_>) {
        if ctx.clock - self.last_shot_at >= GAMER_SHOOT_COOLDOWN_SECS {
            self.last_shot_at = ctx.clock;
            ctx.commands.push(WorldCommand::EnemyShot(EnemyProjectile::aimed(
                ShotKind::Gamer,
                self.center(),
                ctx.player_x,
                GAMER_SHOT_SPEED,
                GAMER_SHOT_DAMAGE,
            )));
        }
    }

    /// Depth at which this enemy stops advancing
    fn hold_depth(&self) -> f32 {
        if self.is_boss() {
            BOSS_HOLD_Z
        } else if self.is_gamer() {
            GAMER_HOLD_Z
        } else {
            ENEMY_MIN_DEPTH
        }
    }
}

impl Entity for Enemy {
    fn update(&mut self, ctx: &mut SimCtx<'_>) {
        if self.marked_for_removal {
            return;
        }
        self.hit_flash = (self.hit_flash - ctx.dt).max(0.0);
        if self.is_boss() {
            self.ascend = approach(self.ascend, self.ascend_target, BOSS_ASCEND_RATE);
        }

        match self.behavior {
            Behavior::Stunned => {
                // Nothing but the wobble: the window must be safe for the player
                self.wobble += ctx.dt * 12.0;
                return;
            }
            Behavior::Transitioning { until } if ctx.clock >= until => {
                self.behavior = Behavior::Approaching;
                self.invulnerable = false;
            }
            Behavior::Escaping => {
                self.pos += self.vel;
                if self.pos.x.abs() > SIGMA_ESCAPE_X {
                    self.escaped = true;
                    self.marked_for_removal = true;
                    ctx.commands
                        .push(WorldCommand::Escaped { enemy_id: self.id });
                }
                return;
            }
            _ => {}
        }

        // Chase the player's lane
        let player = Vec3::new(ctx.player_x, 0.0, PLAYER_Z);
        let step = ground_direction(self.pos, player) * self.speed;
        self.pos.x = (self.pos.x + step.x).clamp(-WORLD_HALF_WIDTH, WORLD_HALF_WIDTH);
        self.pos.z = (self.pos.z + step.y).clamp(WORLD_MIN_Z, self.hold_depth());

        if ground_distance(self.pos, player) <= MELEE_RANGE {
            if !self.is_transitioning() {
                self.behavior = Behavior::Engaged;
            }
            if ctx.clock - self.last_melee_at >= MELEE_COOLDOWN_SECS {
                self.last_melee_at = ctx.clock;
                ctx.sink.enemy_dialogue(self, DialogueTrigger::Attack);
                ctx.commands.push(WorldCommand::Melee {
                    enemy_id: self.id,
                    damage: MELEE_DAMAGE,
                });
            }
        } else if self.behavior == Behavior::Engaged {
            self.behavior = Behavior::Approaching;
        }

        if self.is_boss() {
            self.update_boss_attacks(ctx);
        } else if self.is_gamer() {
            self.update_gamer_attacks(ctx);
        }
    }

    fn draw(&self, list: &mut DrawList, viewport: &Viewport) {
        let mut center = self.center();
        if self.is_stunned() {
            center.x += self.wobble.sin() * 0.2;
        }
        let Some(p) = viewport.project(center) else {
            return;
        };
        let radius = self.radius * p.scale;
        let color = if self.hit_flash > 0.0 {
            colors::HIT_FLASH
        } else {
            self.kind.template().color
        };
        list.circle(p.pos, radius, color);
        if self.is_stunned() {
            list.ring(p.pos, radius * 1.1, radius * 1.25, colors::STUN_RING);
        }

        // Bosses get the HUD bar; regulars a small bar once damaged
        if !self.is_boss() && self.health < self.max_health {
            let bar = Vec2::new(p.pos.x, p.pos.y - radius - 6.0);
            list.bar(
                bar,
                Vec2::new(radius * 2.0, 4.0),
                self.health_fraction(),
                colors::HEALTH_FG,
                colors::HEALTH_BG,
            );
        }
    }

    fn is_expired(&self) -> bool {
        self.marked_for_removal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::effects::EventLog;
    use crate::sim::particles::{FloatingText, ParticlePool};
    use crate::sim::progression::PlayerStats;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Harness {
        rng: Pcg32,
        particles: ParticlePool,
        texts: Vec<FloatingText>,
        log: EventLog,
        commands: Vec<WorldCommand>,
        stats: PlayerStats,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rng: Pcg32::seed_from_u64(3),
                particles: ParticlePool::new(64),
                texts: Vec::new(),
                log: EventLog::new(),
                commands: Vec::new(),
                stats: PlayerStats {
                    crit_chance: 0.0,
                    ..PlayerStats::BASE
                },
            }
        }

        fn ctx(&mut self, clock: f64) -> SimCtx<'_> {
            SimCtx {
                clock,
                dt: FRAME_DT,
                player_x: 0.0,
                targets: &[],
                stats: &self.stats,
                rng: &mut self.rng,
                particles: &mut self.particles,
                texts: &mut self.texts,
                sink: &mut self.log,
                commands: &mut self.commands,
                show_texts: true,
                shake_enabled: true,
            }
        }
    }

    fn boss() -> Enemy {
        Enemy::new(1, EnemyKind::SkibidiKing, 5, Vec3::new(0.0, 0.0, BOSS_SPAWN_Z), 0.0)
    }

    /// Step an enemy in 50 ms increments and collect every shot it fires
    /// with the clock it fired at
    fn shots_over(enemy: &mut Enemy, h: &mut Harness, secs: f64) -> Vec<(f64, EnemyProjectile)> {
        let mut shots = Vec::new();
        for i in 0..(secs / 0.05).round() as usize {
            let clock = i as f64 * 0.05;
            let mut ctx = h.ctx(clock);
            enemy.update(&mut ctx);
            for command in h.commands.drain(..) {
                if let WorldCommand::EnemyShot(shot) = command {
                    shots.push((clock, shot));
                }
            }
        }
        shots
    }

    fn boss_in_phase(phase: u8) -> Enemy {
        let mut boss = boss();
        boss.phase = phase;
        boss.last_shot_at = 0.0;
        boss.last_hazard_at = 0.0;
        boss
    }

    fn of_kind(shots: &[(f64, EnemyProjectile)], kind: ShotKind) -> Vec<(f64, f32)> {
        shots
            .iter()
            .filter(|(_, s)| s.kind == kind)
            .map(|(at, s)| (*at, s.damage))
            .collect()
    }

    fn min_gap(times: &[(f64, f32)]) -> f64 {
        times
            .windows(2)
            .map(|w| w[1].0 - w[0].0)
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn test_boss_fires_faster_and_harder_per_phase() {
        let mut counts = Vec::new();
        for phase in 1..=3u8 {
            let mut h = Harness::new();
            let mut boss = boss_in_phase(phase);
            let shots = shots_over(&mut boss, &mut h, 12.0);
            let orbs = of_kind(&shots, ShotKind::Orb);
            let index = (phase - 1) as usize;
            let cooldown = BOSS_SHOOT_COOLDOWN_SECS * PHASE_COOLDOWN_MULT[index];
            assert!(orbs.len() >= 2);
            assert!(min_gap(&orbs) >= cooldown - 1e-6);
            let expected = BOSS_SHOT_DAMAGE * PHASE_DAMAGE_MULT[index];
            assert!(orbs.iter().all(|(_, d)| (d - expected).abs() < 1e-4));
            counts.push(orbs.len());
        }
        assert!(counts[0] < counts[1] && counts[1] < counts[2], "{counts:?}");
    }

    #[test]
    fn test_hazards_only_in_phase_three_on_their_own_cooldown() {
        let mut h = Harness::new();
        let mut boss = boss_in_phase(2);
        let shots = shots_over(&mut boss, &mut h, 12.0);
        assert!(of_kind(&shots, ShotKind::Hazard).is_empty());

        let mut boss = boss_in_phase(3);
        let shots = shots_over(&mut boss, &mut h, 12.0);
        let hazards = of_kind(&shots, ShotKind::Hazard);
        assert!(hazards.len() >= 3);
        assert!(min_gap(&hazards) >= HAZARD_COOLDOWN_SECS - 1e-6);
        let expected = HAZARD_DAMAGE * PHASE_DAMAGE_MULT[2];
        assert!(hazards.iter().all(|(_, d)| (d - expected).abs() < 1e-4));
    }

    #[test]
    fn test_transitioning_boss_holds_fire() {
        let mut h = Harness::new();
        let mut boss = boss_in_phase(3);
        boss.behavior = Behavior::Transitioning { until: 100.0 };
        boss.invulnerable = true;
        assert!(shots_over(&mut boss, &mut h, 10.0).is_empty());
    }

    #[test]
    fn test_gamer_shots_respect_cooldown() {
        let mut h = Harness::new();
        let mut gamer = Enemy::new(2, EnemyKind::Gamer, GAMER_MIN_WAVE, Vec3::new(0.0, 0.0, -40.0), 0.0);
        let shots = shots_over(&mut gamer, &mut h, 10.0);
        let thrown = of_kind(&shots, ShotKind::Gamer);
        assert_eq!(thrown.len(), shots.len());
        assert!(thrown.len() >= 3);
        assert!(min_gap(&thrown) >= GAMER_SHOOT_COOLDOWN_SECS - 1e-6);
        assert!(thrown.iter().all(|(_, d)| *d == GAMER_SHOT_DAMAGE));
    }

    #[test]
    fn test_health_scales_with_wave() {
        let w1 = Enemy::new(1, EnemyKind::Skibidi, 1, Vec3::ZERO, 0.0);
        let w5 = Enemy::new(2, EnemyKind::Skibidi, 5, Vec3::ZERO, 0.0);
        assert_eq!(w1.max_health, 20.0);
        assert!((w5.max_health - 20.0 * 1.6).abs() < 1e-4);
    }

    #[test]
    fn test_boss_alternates() {
        assert_eq!(EnemyKind::boss_for_wave(5), EnemyKind::SkibidiKing);
        assert_eq!(EnemyKind::boss_for_wave(10), EnemyKind::OhioOverlord);
        assert_eq!(EnemyKind::boss_for_wave(15), EnemyKind::SkibidiKing);
    }

    #[test]
    fn test_take_damage_subtracts_once_and_clamps() {
        let mut h = Harness::new();
        let mut enemy = Enemy::new(1, EnemyKind::Npc, 1, Vec3::new(0.0, 0.0, -10.0), 0.0);
        let outcome = enemy.take_damage(5.0, &mut h.ctx(0.0));
        assert!(outcome.applied && !outcome.lethal);
        assert_eq!(enemy.health, 7.0);
        assert!(!enemy.was_one_shot);

        let outcome = enemy.take_damage(100.0, &mut h.ctx(0.0));
        assert!(outcome.lethal);
        assert_eq!(enemy.health, 0.0);
    }

    #[test]
    fn test_dead_or_removed_enemy_ignores_hits() {
        let mut h = Harness::new();
        let mut enemy = Enemy::new(1, EnemyKind::Npc, 1, Vec3::ZERO, 0.0);
        enemy.marked_for_removal = true;
        let outcome = enemy.take_damage(5.0, &mut h.ctx(0.0));
        assert!(!outcome.applied);
        assert_eq!(enemy.health, enemy.max_health);
    }

    #[test]
    fn test_crit_uses_multiplier() {
        let mut h = Harness::new();
        h.stats.crit_chance = 1.0;
        let mut enemy = Enemy::new(1, EnemyKind::Rizzler, 1, Vec3::ZERO, 0.0);
        let outcome = enemy.take_damage(10.0, &mut h.ctx(0.0));
        assert!(outcome.crit);
        assert_eq!(outcome.damage, 20.0);
        assert_eq!(enemy.health, 25.0);
        assert_eq!(h.log.count(|e| matches!(e, crate::sim::GameEvent::HitMarker { crit: true })), 1);
    }

    #[test]
    fn test_phase_two_triggers_once_at_threshold() {
        let mut h = Harness::new();
        let mut boss = boss();
        let past_threshold = boss.max_health * (1.0 - BOSS_PHASE2_THRESHOLD + 0.01);
        let outcome = boss.take_damage(past_threshold, &mut h.ctx(0.0));
        assert_eq!(outcome.phase_changed, Some(2));
        assert!(boss.is_transitioning());

        // Transition ends, then zero-damage ticks at the same fraction
        boss.behavior = Behavior::Approaching;
        boss.invulnerable = false;
        for _ in 0..5 {
            let outcome = boss.take_damage(0.0, &mut h.ctx(1.0));
            assert!(outcome.applied);
            assert_eq!(outcome.phase_changed, None);
        }
        assert_eq!(boss.phase, 2);
    }

    #[test]
    fn test_transitioning_boss_is_invulnerable() {
        let mut h = Harness::new();
        let mut boss = boss();
        boss.take_damage(boss.max_health * 0.4, &mut h.ctx(0.0));
        let health = boss.health;
        assert!(!boss.take_damage(10.0, &mut h.ctx(0.1)).applied);
        assert_eq!(boss.health, health);

        // Transition timer expires during update
        let mut ctx = h.ctx(PHASE_TRANSITION_SECS + 0.1);
        boss.update(&mut ctx);
        assert!(!boss.invulnerable);
    }

    #[test]
    fn test_phase_three_sets_ascend_target() {
        let mut boss = boss();
        boss.phase = 2;
        boss.health = boss.max_health * 0.3;
        assert_eq!(boss.check_phase_transition(0.0), Some(3));
        assert_eq!(boss.ascend_target, BOSS_ASCEND_HEIGHT);
        assert_eq!(boss.ascend, 0.0);
    }

    #[test]
    fn test_minigame_band_is_one_shot() {
        let mut boss = boss();
        boss.phase = 2;
        boss.health = boss.max_health * 0.48;
        assert!(boss.check_minigame_trigger());
        assert!(!boss.check_minigame_trigger());
    }

    #[test]
    fn test_minigame_needs_phase_two_and_band() {
        let mut boss = boss();
        boss.health = boss.max_health * 0.48;
        assert!(!boss.check_minigame_trigger());
        boss.phase = 2;
        boss.health = boss.max_health * 0.40;
        assert!(!boss.check_minigame_trigger());
    }

    #[test]
    fn test_stunned_boss_neither_moves_nor_attacks() {
        let mut h = Harness::new();
        let mut boss = boss();
        boss.pos = Vec3::new(0.0, 0.0, -1.0);
        boss.stun();
        let before = boss.pos;
        for i in 0..300 {
            let mut ctx = h.ctx(i as f64 * 0.1);
            boss.update(&mut ctx);
        }
        assert_eq!(boss.pos, before);
        assert!(h.commands.is_empty());
    }

    #[test]
    fn test_melee_respects_cooldown() {
        let mut h = Harness::new();
        let mut enemy = Enemy::new(1, EnemyKind::Skibidi, 1, Vec3::new(0.0, 0.0, -1.0), 0.0);
        for frame in 0..30 {
            let mut ctx = h.ctx(frame as f64 * FRAME_DT as f64);
            enemy.update(&mut ctx);
        }
        let melees = h
            .commands
            .iter()
            .filter(|c| matches!(c, WorldCommand::Melee { .. }))
            .count();
        assert_eq!(melees, 1);
        assert_eq!(enemy.behavior, Behavior::Engaged);
    }

    #[test]
    fn test_sigma_escapes_past_threshold() {
        let mut h = Harness::new();
        let mut sigma = Enemy::sigma(9, 1, 0.0, true);
        sigma.pos.x = SIGMA_ESCAPE_X - 0.01;
        sigma.update(&mut h.ctx(0.0));
        assert!(sigma.escaped && sigma.is_expired());
        assert!(matches!(h.commands[0], WorldCommand::Escaped { enemy_id: 9 }));
    }

    #[test]
    fn test_enemy_clamped_to_world() {
        let mut h = Harness::new();
        let mut enemy = Enemy::new(1, EnemyKind::Npc, 1, Vec3::new(50.0, 0.0, -10.0), 0.0);
        enemy.update(&mut h.ctx(0.0));
        assert!(enemy.pos.x <= WORLD_HALF_WIDTH);
    }
}
