//! World state for one run
//!
//! Everything the frame loop mutates is owned by `GameState` and threaded
//! explicitly through every system. Only `MetaProgress` survives a restart.

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::effects::{EffectsSink, Shake};
use super::enemy::Enemy;
use super::entity::{SimCtx, WorldCommand};
use super::particles::{FloatingText, ParticlePool};
use super::progression::{Combo, KillStreak, PlayerStats};
use super::projectile::{EnemyProjectile, Projectile};
use super::schedule::Schedule;
use super::shop::{Inventory, max_health_for};
use super::weak_point::Minigame;
use crate::consts::*;
use crate::meta::MetaProgress;
use crate::settings::Settings;

/// Progress of the current playthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    pub wave: u32,
    pub started: bool,
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    pub health: f32,
    pub max_health: f32,
    pub score: u64,
    pub kills: u32,
    /// Coins earned this run, spent in the shop
    pub coins: u64,
    pub boss_active: bool,
    pub boss_id: Option<u32>,
    /// Boss health-bar fraction for the HUD
    pub boss_fraction: f32,
    /// A scripted boss intro is playing
    pub boss_intro: bool,
    pub wave_in_progress: bool,
    pub between_waves: bool,
    pub shop_open: bool,
    /// Regular spawns scheduled but not yet placed
    pub pending_spawns: u32,
    /// Health snapshot taken at wave start
    pub wave_start_health: f32,
    /// Kills counted toward the heal ability
    pub heal_kills: u32,
    pub heal_ready_announced: bool,
}

impl RunState {
    pub fn new(max_health: f32) -> Self {
        Self {
            wave: 1,
            started: false,
            running: false,
            paused: false,
            game_over: false,
            health: max_health,
            max_health,
            score: 0,
            kills: 0,
            coins: 0,
            boss_active: false,
            boss_id: None,
            boss_fraction: 0.0,
            boss_intro: false,
            wave_in_progress: false,
            between_waves: false,
            shop_open: false,
            pending_spawns: 0,
            wave_start_health: max_health,
            heal_kills: 0,
            heal_ready_announced: false,
        }
    }

    /// True while the simulation should advance
    pub fn is_live(&self) -> bool {
        self.running && !self.paused && !self.game_over
    }

    pub fn heal_ready(&self) -> bool {
        self.heal_kills >= HEAL_KILLS_REQUIRED
    }

    pub fn is_boss_wave(&self) -> bool {
        self.wave % BOSS_WAVE_INTERVAL == 0
    }
}

/// The player's rail position, aim and derived stats
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Lateral position; the player never moves in depth
    pub x: f32,
    pub vel_x: f32,
    /// Pointer aim in -1..1 on both axes
    pub aim: Vec2,
    pub stats: PlayerStats,
    pub last_shot_at: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            x: 0.0,
            vel_x: 0.0,
            aim: Vec2::ZERO,
            stats: PlayerStats::BASE,
            last_shot_at: f64::NEG_INFINITY,
        }
    }
}

impl PlayerState {
    /// Move toward a target lane at capped speed
    pub fn move_toward(&mut self, target_x: f32, dt: f32, max_speed: f32) {
        let target = target_x.clamp(-WORLD_HALF_WIDTH, WORLD_HALF_WIDTH);
        let max_delta = max_speed * dt;
        let delta = (target - self.x).clamp(-max_delta, max_delta);
        self.vel_x = if dt > 0.0 { delta / dt } else { 0.0 };
        self.x += delta;
    }

    pub fn muzzle(&self) -> Vec3 {
        Vec3::new(self.x, PLAYER_MUZZLE_Y, PLAYER_Z)
    }
}

/// Mutable views of the active lists, borrowed alongside a `SimCtx`
pub struct Lists<'a> {
    pub enemies: &'a mut Vec<Enemy>,
    pub projectiles: &'a mut Vec<Projectile>,
    pub enemy_projectiles: &'a mut Vec<EnemyProjectile>,
    pub minigame: &'a mut Option<Minigame>,
}

/// Complete world for one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub run: RunState,
    pub player: PlayerState,
    pub inventory: Inventory,
    pub combo: Combo,
    pub streak: KillStreak,
    pub meta: MetaProgress,
    pub settings: Settings,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<EnemyProjectile>,
    pub particles: ParticlePool,
    pub texts: Vec<FloatingText>,
    pub minigame: Option<Minigame>,
    pub schedule: Schedule,
    /// Run clock in seconds, advanced by every unpaused tick
    pub clock: f64,
    /// Host wall-clock time (epoch seconds) used to stamp high scores
    pub wall_time: f64,
    pub rng: Pcg32,
    /// Live enemy centers, refreshed before entity updates
    pub(crate) targets: Vec<Vec3>,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        Self::with_meta(seed, settings, MetaProgress::default())
    }

    /// Fresh run carrying existing meta-progression
    pub fn with_meta(seed: u64, settings: &Settings, meta: MetaProgress) -> Self {
        let inventory = Inventory::default();
        let stats = PlayerStats::derive(&inventory, &meta);
        Self {
            seed,
            run: RunState::new(max_health_for(&inventory)),
            player: PlayerState {
                stats,
                ..PlayerState::default()
            },
            inventory,
            combo: Combo::default(),
            streak: KillStreak::default(),
            meta,
            settings: settings.clone(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            particles: ParticlePool::new(settings.max_particles()),
            texts: Vec::new(),
            minigame: None,
            schedule: Schedule::new(),
            clock: 0.0,
            wall_time: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            targets: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reinitialize for a new run. Pending deferred actions are dropped
    /// first so nothing from the old run fires into the new one.
    pub fn reset_run(&mut self) {
        self.schedule.clear();
        let seed = self.rng.random::<u64>();
        let meta = std::mem::take(&mut self.meta);
        let settings = self.settings.clone();
        let wall_time = self.wall_time;
        *self = Self::with_meta(seed, &settings, meta);
        self.wall_time = wall_time;
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn enemy_mut(&mut self, id: u32) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Current boss, if one is on the field
    pub fn boss(&self) -> Option<&Enemy> {
        self.run.boss_id.and_then(|id| self.enemy(id))
    }

    /// Enemies still counted as alive
    pub fn live_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| !e.marked_for_removal).count()
    }

    pub(crate) fn refresh_targets(&mut self) {
        self.targets.clear();
        self.targets.extend(
            self.enemies
                .iter()
                .filter(|e| !e.marked_for_removal)
                .map(|e| e.center()),
        );
    }

    /// Borrow the shared context and the active lists at the same time
    pub fn split<'a>(
        &'a mut self,
        dt: f32,
        sink: &'a mut dyn EffectsSink,
        commands: &'a mut Vec<WorldCommand>,
    ) -> (SimCtx<'a>, Lists<'a>) {
        let ctx = SimCtx {
            clock: self.clock,
            dt,
            player_x: self.player.x,
            targets: &self.targets,
            stats: &self.player.stats,
            rng: &mut self.rng,
            particles: &mut self.particles,
            texts: &mut self.texts,
            sink,
            commands,
            show_texts: self.settings.damage_numbers,
            shake_enabled: self.settings.effective_screen_shake(),
        };
        let lists = Lists {
            enemies: &mut self.enemies,
            projectiles: &mut self.projectiles,
            enemy_projectiles: &mut self.enemy_projectiles,
            minigame: &mut self.minigame,
        };
        (ctx, lists)
    }

    /// Floating text outside an entity update
    pub fn text(&mut self, pos: Vec3, text: impl Into<String>, color: [f32; 4]) {
        if self.settings.damage_numbers {
            self.texts.push(FloatingText::new(pos, text.into(), color));
        }
    }

    pub fn burst(&mut self, origin: Vec3, count: usize, color: [f32; 4], speed: f32) {
        self.particles
            .burst(&mut self.rng, origin, count, color, speed);
    }

    pub fn shake(&self, sink: &mut dyn EffectsSink, kind: Shake) {
        if self.settings.effective_screen_shake() {
            sink.shake(kind);
        }
    }
}
