//! Firing, hit resolution, kill rewards and player damage

use glam::{Vec2, Vec3};

use super::collision::{enemy_shot_hits_player, projectile_hits_enemy};
use super::director;
use super::effects::{DialogueTrigger, EffectsSink, KillReport, RunSummary, Shake, Sound};
use super::enemy::HitOutcome;
use super::entity::WorldCommand;
use super::projectile::Projectile;
use super::state::GameState;
use crate::consts::*;
use crate::renderer::colors;

/// Map a pointer aim (-1..1 on both axes) to a flight direction
pub fn aim_direction(aim: Vec2) -> Vec3 {
    let aim = aim.clamp(Vec2::splat(-1.0), Vec2::ONE);
    Vec3::new(aim.x * AIM_SPREAD_X, aim.y * AIM_SPREAD_Y, -1.0).normalize()
}

/// Pointer aim that sends a straight shot from `muzzle` through `target`
pub fn aim_at(muzzle: Vec3, target: Vec3) -> Vec2 {
    let depth = (muzzle.z - target.z).max(0.01);
    Vec2::new(
        ((target.x - muzzle.x) / depth / AIM_SPREAD_X).clamp(-1.0, 1.0),
        ((target.y - muzzle.y) / depth / AIM_SPREAD_Y).clamp(-1.0, 1.0),
    )
}

/// Fire the equipped weapon if its cooldown has elapsed
pub fn fire(state: &mut GameState, sink: &mut dyn EffectsSink) -> bool {
    let weapon = state.inventory.equipped().spec();
    if state.clock - state.player.last_shot_at < weapon.cooldown_secs {
        return false;
    }
    state.player.last_shot_at = state.clock;

    let dir = aim_direction(state.player.aim);
    let damage = state.player.stats.shot_damage(weapon.damage);
    let muzzle = state.player.muzzle();
    let center = (weapon.pellets.saturating_sub(1)) as f32 / 2.0;
    for i in 0..weapon.pellets {
        let offset = (i as f32 - center) * weapon.spread;
        let pellet = Vec3::new(dir.x + offset, dir.y, dir.z).normalize();
        state.projectiles.push(Projectile::new(
            muzzle,
            pellet * weapon.speed,
            damage,
            weapon.special,
        ));
    }
    sink.play_sound(Sound::Shoot);
    true
}

/// Test every live player shot against weak points, then enemies.
/// Each shot is consumed by its earliest contact along the swept segment;
/// enemies killed earlier in the same pass no longer block shots.
pub fn resolve_projectile_hits(state: &mut GameState, sink: &mut dyn EffectsSink) {
    let mut commands = Vec::new();
    let mut outcomes: Vec<(u32, HitOutcome)> = Vec::new();
    let mut weak_hits: Vec<Vec3> = Vec::new();
    {
        let (mut ctx, lists) = state.split(0.0, &mut *sink, &mut commands);
        for shot in lists.projectiles.iter_mut() {
            if !shot.is_live() {
                continue;
            }
            if let Some(game) = lists.minigame.as_mut() {
                if let Some(pos) = game.hit_test(shot) {
                    weak_hits.push(pos);
                    continue;
                }
            }
            let target = lists
                .enemies
                .iter_mut()
                .filter(|e| !e.marked_for_removal && e.health > 0.0)
                .filter_map(|e| {
                    let t = projectile_hits_enemy(shot, e)?.t;
                    Some((t, e))
                })
                .min_by(|a, b| a.0.total_cmp(&b.0))
                .map(|(_, e)| e);
            if let Some(enemy) = target {
                shot.consume();
                let outcome = enemy.take_damage(shot.damage, &mut ctx);
                if outcome.applied {
                    outcomes.push((enemy.id, outcome));
                }
            }
        }
    }

    for pos in weak_hits {
        sink.play_sound(Sound::WeakPointHit);
        state.burst(pos, HIT_PARTICLES, colors::WEAK_POINT, 5.0);
        state.text(pos, "WEAK POINT!", colors::CRIT_TEXT);
    }

    for (id, outcome) in outcomes {
        apply_hit_outcome(state, id, &outcome, sink);
    }
}

/// Follow-up for a boss or lethal hit: HUD fraction, phase cue,
/// minigame start and the kill path
pub fn apply_hit_outcome(
    state: &mut GameState,
    enemy_id: u32,
    outcome: &HitOutcome,
    sink: &mut dyn EffectsSink,
) {
    if let Some(fraction) = outcome.boss_fraction {
        state.run.boss_fraction = fraction;
    }
    if let Some(phase) = outcome.phase_changed {
        if let Some(boss) = state.enemy(enemy_id) {
            sink.phase_transition(boss, phase);
            sink.enemy_dialogue(boss, DialogueTrigger::PhaseChange);
        }
        sink.play_sound(Sound::PhaseChange);
        log::info!("Boss entered phase {phase}");
    }
    if outcome.lethal {
        award_kill(state, enemy_id, sink);
    } else if outcome.start_minigame {
        director::start_minigame(state, enemy_id, sink);
    }
}

/// Kill rewards and teardown. Returns None when the enemy was already
/// removed, so a kill is never paid twice.
pub fn award_kill(
    state: &mut GameState,
    enemy_id: u32,
    sink: &mut dyn EffectsSink,
) -> Option<KillReport> {
    let clock = state.clock;
    let wave = state.run.wave;
    let enemy = state
        .enemies
        .iter_mut()
        .find(|e| e.id == enemy_id && !e.marked_for_removal)?;
    enemy.marked_for_removal = true;
    enemy.health = 0.0;
    if enemy.escaped {
        return None;
    }

    let template = enemy.kind.template();
    let combo = state.combo.increment(clock);
    let mut report = KillReport {
        enemy_id,
        kind: enemy.kind,
        pos: enemy.center(),
        is_boss: enemy.is_boss(),
        points: template.points,
        combo_bonus: 0,
        coins: state.player.stats.coins_for(template.coins),
        combo,
        was_one_shot: enemy.was_one_shot,
        wave,
    };
    report.combo_bonus = state.combo.bonus(report.points);

    state.run.score += report.points + report.combo_bonus;
    state.run.coins += report.coins;
    state.run.kills += 1;
    state.meta.deposit_kill(report.coins);

    sink.combo_changed(combo, state.combo.multiplier());
    sink.record_kill(&report);
    if let Some(streak) = state.streak.record() {
        sink.kill_streak(streak);
        state.text(report.pos, format!("{streak} KILL STREAK"), colors::STREAK_TEXT);
    }
    sink.check_achievements(&report);

    state.run.heal_kills += 1;
    if state.run.heal_ready() && !state.run.heal_ready_announced {
        state.run.heal_ready_announced = true;
        sink.heal_ready();
    }

    state.burst(report.pos, DEATH_PARTICLES, template.color, 8.0);
    state.text(
        report.pos,
        format!("+{} +{}c", report.points + report.combo_bonus, report.coins),
        colors::REWARD_TEXT,
    );
    sink.kill_feed(template.name);
    sink.chat_kill();
    sink.play_sound(Sound::Kill);
    state.shake(sink, Shake::Kill);
    log::debug!(
        "Killed {} (+{} pts, +{} coins, combo {})",
        template.name,
        report.points + report.combo_bonus,
        report.coins,
        combo
    );

    if report.is_boss {
        teardown_boss(state, &report, sink);
    }
    Some(report)
}

fn teardown_boss(state: &mut GameState, report: &KillReport, sink: &mut dyn EffectsSink) {
    state.run.boss_active = false;
    state.run.boss_id = None;
    state.run.boss_fraction = 0.0;
    // Killed during its own vulnerability window: no bonus on top
    if state
        .minigame
        .as_ref()
        .is_some_and(|game| game.boss_id == report.enemy_id)
    {
        director::abort_minigame(state, sink);
    }
    sink.clear_phase_effects();
    sink.play_sound(Sound::BossKill);
    state.shake(sink, Shake::BossDeath);
    sink.chat_boss_kill();
    sink.lens_flare(report.pos.x, report.pos.z);
    log::info!("Boss {} defeated on wave {}", report.kind.name(), report.wave);
}

/// Damage the player. Returns true when this hit ended the run.
pub fn apply_player_damage(state: &mut GameState, amount: f32, sink: &mut dyn EffectsSink) -> bool {
    if !state.run.running || state.run.game_over {
        return false;
    }
    state.run.health = (state.run.health - amount).max(0.0);
    if let Some(broken) = state.combo.break_combo() {
        sink.combo_broken(broken);
    }
    state.streak.reset();
    sink.damage_overlay();
    sink.play_sound(Sound::PlayerHurt);
    state.shake(sink, Shake::Damage);

    if state.run.health <= 0.0 {
        game_over(state, sink);
        return true;
    }
    false
}

/// Terminal transition. Runs at most once per run.
pub fn game_over(state: &mut GameState, sink: &mut dyn EffectsSink) {
    if state.run.game_over {
        return;
    }
    state.run.running = false;
    state.run.game_over = true;
    state.run.wave_in_progress = false;
    state.schedule.clear();

    let summary = RunSummary {
        score: state.run.score,
        wave: state.run.wave,
        kills: state.run.kills,
        coins: state.run.coins,
    };
    let rank = state
        .meta
        .record_run(summary.score, summary.wave, summary.kills, state.wall_time);
    log::info!(
        "Game over: score {} wave {} kills {} (rank {:?})",
        summary.score,
        summary.wave,
        summary.kills,
        rank
    );
    sink.play_sound(Sound::GameOver);
    sink.game_over(&summary);
}

/// Apply world commands raised during enemy updates, in order.
/// Melee and shots stop being processed once the run has ended.
pub fn apply_commands(
    state: &mut GameState,
    commands: Vec<WorldCommand>,
    sink: &mut dyn EffectsSink,
) {
    for command in commands {
        match command {
            WorldCommand::Melee { enemy_id, damage } => {
                if state.run.game_over {
                    continue;
                }
                log::debug!("Enemy {enemy_id} hit the player for {damage}");
                apply_player_damage(state, damage, sink);
            }
            WorldCommand::EnemyShot(shot) => {
                if !state.run.game_over {
                    state.enemy_projectiles.push(shot);
                }
            }
            WorldCommand::Escaped { enemy_id } => {
                // Forfeit: no rewards and no kill effects
                log::debug!("Enemy {enemy_id} escaped");
            }
        }
    }
}

/// Land enemy shots that reached the player plane
pub fn resolve_enemy_shots(state: &mut GameState, sink: &mut dyn EffectsSink) {
    let player_x = state.player.x;
    let mut damage = Vec::new();
    for shot in state.enemy_projectiles.iter_mut() {
        if !shot.is_live() || !shot.arrived() {
            continue;
        }
        if enemy_shot_hits_player(shot, player_x) {
            damage.push(shot.damage);
        }
        shot.consume();
    }
    for amount in damage {
        if apply_player_damage(state, amount, sink) {
            break;
        }
    }
}

/// Spend a charged heal. Returns the health restored.
pub fn use_heal(state: &mut GameState, sink: &mut dyn EffectsSink) -> Option<f32> {
    if !state.run.is_live() || !state.run.heal_ready() {
        return None;
    }
    let before = state.run.health;
    state.run.health = (state.run.health + HEAL_AMOUNT).min(state.run.max_health);
    state.run.heal_kills = 0;
    state.run.heal_ready_announced = false;
    let restored = state.run.health - before;
    sink.play_sound(Sound::Heal);
    sink.healed(restored);
    Some(restored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::effects::{EventLog, GameEvent};
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::progression::PlayerStats;
    use crate::sim::shop::{WeaponKind, buy_weapon};

    fn running_state() -> GameState {
        let mut state = GameState::new(11, &Settings::default());
        state.run.running = true;
        state.run.started = true;
        state.player.stats = PlayerStats {
            crit_chance: 0.0,
            ..PlayerStats::BASE
        };
        state
    }

    fn place(state: &mut GameState, kind: EnemyKind, pos: Vec3) -> u32 {
        let id = state.next_entity_id();
        state.enemies.push(Enemy::new(id, kind, 1, pos, state.clock));
        id
    }

    #[test]
    fn test_aim_at_round_trips_direction() {
        let muzzle = Vec3::new(0.0, PLAYER_MUZZLE_Y, 0.0);
        let target = Vec3::new(2.0, 2.0, -10.0);
        let dir = aim_direction(aim_at(muzzle, target));
        let expected = (target - muzzle).normalize();
        assert!(dir.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = running_state();
        let mut log = EventLog::new();
        assert!(fire(&mut state, &mut log));
        assert!(!fire(&mut state, &mut log));
        state.clock += 0.31;
        assert!(fire(&mut state, &mut log));
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_shotgun_fires_pellets() {
        let mut state = running_state();
        state.run.shop_open = true;
        state.run.coins = 1000;
        buy_weapon(&mut state, WeaponKind::Shotgun).unwrap();
        fire(&mut state, &mut EventLog::new());
        assert_eq!(state.projectiles.len(), 5);
    }

    #[test]
    fn test_award_kill_pays_once() {
        let mut state = running_state();
        let id = place(&mut state, EnemyKind::Skibidi, Vec3::new(0.0, 0.0, -10.0));
        let mut log = EventLog::new();
        assert!(award_kill(&mut state, id, &mut log).is_some());
        assert!(award_kill(&mut state, id, &mut log).is_none());
        assert_eq!(state.run.kills, 1);
        // first kill already carries a combo of one
        assert_eq!(state.run.score, 110);
        assert_eq!(state.run.coins, 5);
        assert_eq!(state.meta.coins, 5);
        assert_eq!(log.count(|e| matches!(e, GameEvent::KillRecorded(_))), 1);
    }

    fn shot_along_z(state: &GameState, from_z: f32, to_z: f32, damage: f32) -> Projectile {
        let y = state.enemies[0].center().y;
        let mut shot = Projectile::new(Vec3::new(0.0, y, to_z), Vec3::ZERO, damage, None);
        shot.prev = Vec3::new(0.0, y, from_z);
        shot
    }

    #[test]
    fn test_shot_hits_nearest_enemy_on_segment() {
        let mut state = running_state();
        let back = place(&mut state, EnemyKind::Npc, Vec3::new(0.0, 0.0, -12.0));
        let front = place(&mut state, EnemyKind::Npc, Vec3::new(0.0, 0.0, -8.0));
        let shot = shot_along_z(&state, -4.0, -16.0, 1.0);
        state.projectiles.push(shot);

        resolve_projectile_hits(&mut state, &mut EventLog::new());
        let hurt = |id| state.enemy(id).map(|e| e.health < e.max_health);
        assert_eq!(hurt(front), Some(true));
        assert_eq!(hurt(back), Some(false));
    }

    #[test]
    fn test_dead_enemy_does_not_absorb_later_shots() {
        let mut state = running_state();
        let front = place(&mut state, EnemyKind::Npc, Vec3::new(0.0, 0.0, -8.0));
        let back = place(&mut state, EnemyKind::Npc, Vec3::new(0.0, 0.0, -8.5));
        state.enemy_mut(front).unwrap().health = 5.0;
        for _ in 0..2 {
            let shot = shot_along_z(&state, -4.0, -16.0, 10.0);
            state.projectiles.push(shot);
        }

        resolve_projectile_hits(&mut state, &mut EventLog::new());
        assert_eq!(state.run.kills, 1);
        assert!(state.enemy(front).unwrap().marked_for_removal);
        let back = state.enemy(back).unwrap();
        assert!(back.health < back.max_health);
        assert!(state.projectiles.iter().all(|p| !p.is_live()));
    }

    #[test]
    fn test_escaped_enemy_pays_nothing() {
        let mut state = running_state();
        let id = state.next_entity_id();
        let mut sigma = Enemy::sigma(id, 1, 0.0, true);
        sigma.escaped = true;
        state.enemies.push(sigma);
        let mut log = EventLog::new();
        assert!(award_kill(&mut state, id, &mut log).is_none());
        assert_eq!(state.run.score, 0);
        assert_eq!(state.run.coins, 0);
        assert_eq!(state.run.kills, 0);
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_combo_bonus_applied_to_score() {
        let mut state = running_state();
        let mut log = EventLog::new();
        for _ in 0..2 {
            let id = place(&mut state, EnemyKind::Skibidi, Vec3::new(0.0, 0.0, -10.0));
            award_kill(&mut state, id, &mut log);
        }
        // 100 per kill plus floor(100 * 0.1 * combo) bonus
        assert_eq!(state.run.score, 100 + 10 + 100 + 20);
        for _ in 0..3 {
            let id = place(&mut state, EnemyKind::Skibidi, Vec3::new(0.0, 0.0, -10.0));
            award_kill(&mut state, id, &mut log);
        }
        let streaks = log.count(|e| matches!(e, GameEvent::KillStreak(3) | GameEvent::KillStreak(5)));
        assert_eq!(streaks, 2);
    }

    #[test]
    fn test_player_damage_breaks_combo_and_streak() {
        let mut state = running_state();
        let mut log = EventLog::new();
        let id = place(&mut state, EnemyKind::Npc, Vec3::new(0.0, 0.0, -10.0));
        award_kill(&mut state, id, &mut log);
        assert!(!apply_player_damage(&mut state, 10.0, &mut log));
        assert_eq!(state.run.health, 90.0);
        assert_eq!(state.combo.count, 0);
        assert_eq!(state.streak.count, 0);
        assert_eq!(log.count(|e| matches!(e, GameEvent::ComboBroken { combo: 1 })), 1);
    }

    #[test]
    fn test_game_over_fires_once() {
        let mut state = running_state();
        state.run.score = 100;
        let mut log = EventLog::new();
        assert!(apply_player_damage(&mut state, 500.0, &mut log));
        assert!(!apply_player_damage(&mut state, 10.0, &mut log));
        game_over(&mut state, &mut log);
        assert_eq!(state.run.health, 0.0);
        assert!(!state.run.running);
        assert_eq!(log.count(|e| matches!(e, GameEvent::GameOver(_))), 1);
        assert_eq!(state.meta.high_scores.len(), 1);
    }

    #[test]
    fn test_heal_charges_and_resets() {
        let mut state = running_state();
        let mut log = EventLog::new();
        state.run.health = 50.0;
        assert_eq!(use_heal(&mut state, &mut log), None);
        for _ in 0..HEAL_KILLS_REQUIRED + 2 {
            let id = place(&mut state, EnemyKind::Npc, Vec3::new(0.0, 0.0, -10.0));
            award_kill(&mut state, id, &mut log);
        }
        assert_eq!(log.count(|e| matches!(e, GameEvent::HealReady)), 1);
        assert_eq!(use_heal(&mut state, &mut log), Some(HEAL_AMOUNT));
        assert_eq!(state.run.health, 80.0);
        assert_eq!(state.run.heal_kills, 0);
    }

    #[test]
    fn test_enemy_shot_lands_in_lane() {
        let mut state = running_state();
        let mut log = EventLog::new();
        let mut shot = crate::sim::projectile::EnemyProjectile::hazard(0.0, HAZARD_DAMAGE);
        shot.pos.y = -0.1;
        state.enemy_projectiles.push(shot);
        resolve_enemy_shots(&mut state, &mut log);
        assert_eq!(state.run.health, PLAYER_BASE_HEALTH - HAZARD_DAMAGE);
        assert!(!state.enemy_projectiles[0].is_live());
    }
}
