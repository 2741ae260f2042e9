//! Spawn and wave director
//!
//! Decides what spawns and when, detects wave completion, and runs the boss
//! intro and weak-point window through the run schedule.

use glam::Vec3;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand_pcg::Pcg32;

use super::combat::award_kill;
use super::effects::{DialogueTrigger, EffectsSink, Sound};
use super::enemy::{Enemy, EnemyKind};
use super::progression::PlayerStats;
use super::schedule::ScheduledAction;
use super::state::GameState;
use super::weak_point::Minigame;
use crate::consts::*;
use crate::renderer::colors;

/// Regular enemies a non-boss wave spawns
pub fn wave_enemy_count(wave: u32) -> u32 {
    ENEMIES_BASE_COUNT + wave * ENEMIES_PER_WAVE
}

/// Begin a fresh run at wave 1
pub fn start_run(state: &mut GameState, sink: &mut dyn EffectsSink) {
    if state.run.started && !state.run.game_over {
        return;
    }
    state.run.started = true;
    state.run.running = true;
    state.player.stats = PlayerStats::derive(&state.inventory, &state.meta);
    log::info!("Run started (seed {})", state.seed);
    start_wave(state, sink);
}

/// Drop every pending action and reinitialize, keeping meta-progression
pub fn restart(state: &mut GameState, sink: &mut dyn EffectsSink) {
    log::info!("Restarting run");
    state.reset_run();
    start_run(state, sink);
}

/// Announce the current wave and schedule its spawns
pub fn start_wave(state: &mut GameState, sink: &mut dyn EffectsSink) {
    let run = &mut state.run;
    run.wave_in_progress = true;
    run.between_waves = false;
    run.shop_open = false;
    run.wave_start_health = run.health;
    let wave = run.wave;
    let boss_wave = run.is_boss_wave();
    sink.wave_started(wave, boss_wave);

    let now = state.clock;
    if boss_wave {
        state.run.boss_intro = true;
        for stage in 1..=BOSS_INTRO_STAGES {
            let delay = (stage - 1) as f64 * BOSS_INTRO_STAGE_SECS;
            state
                .schedule
                .after(now, delay, ScheduledAction::BossIntro { stage });
        }
        let kind = EnemyKind::boss_for_wave(wave);
        state.schedule.after(
            now,
            BOSS_INTRO_STAGES as f64 * BOSS_INTRO_STAGE_SECS,
            ScheduledAction::SpawnBoss(kind),
        );
        log::info!("Wave {wave} started: boss {}", kind.name());
    } else {
        let count = wave_enemy_count(wave);
        state.run.pending_spawns = count;
        for i in 0..count {
            state.schedule.after(
                now,
                i as f64 * SPAWN_STAGGER_SECS,
                ScheduledAction::SpawnRegular { wave },
            );
        }
        log::info!("Wave {wave} started: {count} enemies");
    }
}

/// Weighted draw over the regular catalog. The escapee is rolled first at a
/// fixed chance regardless of wave.
pub fn pick_regular_kind(rng: &mut Pcg32, wave: u32) -> EnemyKind {
    if rng.random_bool(SIGMA_SPAWN_CHANCE) {
        return EnemyKind::Sigma;
    }
    let eligible: Vec<EnemyKind> = EnemyKind::REGULAR
        .into_iter()
        .filter(|k| k.template().min_wave <= wave)
        .collect();
    match WeightedIndex::new(eligible.iter().map(|k| k.template().spawn_weight)) {
        Ok(dist) => eligible[dist.sample(rng)],
        Err(_) => EnemyKind::Skibidi,
    }
}

fn spawn_regular(state: &mut GameState, wave: u32, sink: &mut dyn EffectsSink) {
    // Stale entry from a wave that already ended
    if wave != state.run.wave || !state.run.wave_in_progress {
        return;
    }
    state.run.pending_spawns = state.run.pending_spawns.saturating_sub(1);

    let kind = pick_regular_kind(&mut state.rng, wave);
    let id = state.next_entity_id();
    let enemy = if kind == EnemyKind::Sigma {
        let heading_right = state.rng.random_bool(0.5);
        Enemy::sigma(id, wave, state.clock, heading_right)
    } else {
        let x = state
            .rng
            .random_range(-WORLD_HALF_WIDTH * 0.8..WORLD_HALF_WIDTH * 0.8);
        let z = ENEMY_SPAWN_Z + state.rng.random_range(-5.0..5.0);
        Enemy::new(id, kind, wave, Vec3::new(x, 0.0, z), state.clock)
    };
    sink.enemy_spawned(&enemy);
    sink.enemy_dialogue(&enemy, DialogueTrigger::Spawn);
    log::debug!("Spawned {} #{id}", kind.name());
    state.enemies.push(enemy);
}

fn spawn_boss(state: &mut GameState, kind: EnemyKind, sink: &mut dyn EffectsSink) {
    if !state.run.wave_in_progress {
        return;
    }
    let id = state.next_entity_id();
    let boss = Enemy::new(
        id,
        kind,
        state.run.wave,
        Vec3::new(0.0, 0.0, BOSS_SPAWN_Z),
        state.clock,
    );
    state.run.boss_intro = false;
    state.run.boss_active = true;
    state.run.boss_id = Some(id);
    state.run.boss_fraction = 1.0;
    sink.enemy_spawned(&boss);
    sink.enemy_dialogue(&boss, DialogueTrigger::Spawn);
    log::info!("Boss {} spawned", kind.name());
    state.enemies.push(boss);
}

/// Detect a cleared wave. Returns true on the frame the wave ends.
pub fn check_wave_complete(state: &mut GameState, sink: &mut dyn EffectsSink) -> bool {
    let run = &state.run;
    if !run.wave_in_progress
        || run.game_over
        || run.pending_spawns > 0
        || run.boss_intro
        || state.live_enemies() > 0
    {
        return false;
    }

    let run = &mut state.run;
    let cleared = run.wave;
    let flawless = run.health >= run.wave_start_health;
    run.wave_in_progress = false;
    run.between_waves = true;
    run.wave += 1;
    run.health = (run.health + WAVE_CLEAR_HEAL).min(run.max_health);

    sink.wave_cleared(cleared, flawless);
    sink.play_sound(Sound::WaveClear);
    log::info!("Wave {cleared} cleared (flawless: {flawless})");

    let next = if state.run.is_boss_wave() {
        ScheduledAction::StartWave
    } else {
        ScheduledAction::OpenShop
    };
    state.schedule.after(state.clock, WAVE_CLEAR_DELAY_SECS, next);
    true
}

pub fn open_shop(state: &mut GameState, sink: &mut dyn EffectsSink) {
    if state.run.game_over || !state.run.between_waves {
        return;
    }
    state.run.shop_open = true;
    sink.shop_opened(state.run.wave);
    log::info!("Shop open before wave {}", state.run.wave);
}

/// Leave the shop and start the next wave. Returns false if it wasn't open.
pub fn close_shop(state: &mut GameState, sink: &mut dyn EffectsSink) -> bool {
    if !state.run.shop_open {
        return false;
    }
    state.run.shop_open = false;
    state.player.stats = PlayerStats::derive(&state.inventory, &state.meta);
    start_wave(state, sink);
    true
}

/// Stun the boss and open the weak-point window
pub fn start_minigame(state: &mut GameState, boss_id: u32, sink: &mut dyn EffectsSink) {
    if state.minigame.is_some() {
        return;
    }
    let Some(boss) = state.enemy_mut(boss_id) else {
        return;
    };
    boss.stun();
    sink.enemy_dialogue(boss, DialogueTrigger::Stunned);
    sink.start_minigame(boss, MINIGAME_DURATION_SECS);

    state.minigame = Some(Minigame::new(boss_id));
    let now = state.clock;
    state
        .schedule
        .after(now, 1.0, ScheduledAction::MinigameSecond);
    state
        .schedule
        .after(now, WEAK_POINT_SPAWN_SECS, ScheduledAction::SpawnWeakPoint);
    log::info!("Weak-point window opened for {MINIGAME_DURATION_SECS}s");
}

fn minigame_second(state: &mut GameState, sink: &mut dyn EffectsSink) {
    let Some(game) = state.minigame.as_mut() else {
        return;
    };
    game.seconds_left = game.seconds_left.saturating_sub(1);
    log::debug!("Weak-point window: {}s left", game.seconds_left);
    if game.seconds_left == 0 {
        end_minigame(state, sink);
    } else {
        state
            .schedule
            .after(state.clock, 1.0, ScheduledAction::MinigameSecond);
    }
}

fn spawn_weak_point(state: &mut GameState) {
    let Some(boss_id) = state.minigame.as_ref().map(|g| g.boss_id) else {
        return;
    };
    let Some(center) = state.enemy(boss_id).map(Enemy::center) else {
        return;
    };
    if let Some(game) = state.minigame.as_mut() {
        game.spawn_around(&mut state.rng, center, state.clock);
    }
    state
        .schedule
        .after(state.clock, WEAK_POINT_SPAWN_SECS, ScheduledAction::SpawnWeakPoint);
}

fn is_minigame_action(action: &ScheduledAction) -> bool {
    matches!(
        action,
        ScheduledAction::MinigameSecond | ScheduledAction::SpawnWeakPoint
    )
}

/// Close the window: clear weak points, release the boss and apply the
/// bonus damage earned from hits
pub fn end_minigame(state: &mut GameState, sink: &mut dyn EffectsSink) {
    let Some(mut game) = state.minigame.take() else {
        return;
    };
    state.schedule.cancel(is_minigame_action);
    game.clear();

    let clock = state.clock;
    let Some(boss) = state.enemy_mut(game.boss_id) else {
        return;
    };
    boss.unstun();

    if game.hits == 0 {
        sink.boss_recovered(boss);
        sink.minigame_ended(0, 0.0);
        let at = boss.center();
        state.text(at, "RECOVERED", colors::RECOVER_TEXT);
        log::info!("Boss recovered: no weak points hit");
        return;
    }

    let bonus = game.bonus_damage();
    boss.health = (boss.health - bonus).max(0.0);
    let fraction = boss.health_fraction();
    let lethal = boss.health <= 0.0;
    let phase = if lethal {
        None
    } else {
        boss.check_phase_transition(clock)
    };
    if let Some(phase) = phase {
        sink.phase_transition(boss, phase);
    }
    let at = boss.center();
    state.run.boss_fraction = fraction;
    sink.minigame_ended(game.hits, bonus);
    state.text(at, format!("-{bonus} WEAK POINTS x{}", game.hits), colors::CRIT_TEXT);
    log::info!("Weak-point window closed: {} hits, {bonus} bonus damage", game.hits);

    if lethal {
        award_kill(state, game.boss_id, sink);
    }
}

/// End the window without a bonus (boss died during it)
pub fn abort_minigame(state: &mut GameState, sink: &mut dyn EffectsSink) {
    let Some(mut game) = state.minigame.take() else {
        return;
    };
    state.schedule.cancel(is_minigame_action);
    game.clear();
    sink.minigame_ended(game.hits, 0.0);
}

/// Run a due scheduled action
pub fn handle(state: &mut GameState, action: ScheduledAction, sink: &mut dyn EffectsSink) {
    match action {
        ScheduledAction::SpawnRegular { wave } => spawn_regular(state, wave, sink),
        ScheduledAction::BossIntro { stage } => {
            if stage == 1 {
                sink.play_sound(Sound::BossIntro);
            }
            sink.boss_intro(stage);
        }
        ScheduledAction::SpawnBoss(kind) => spawn_boss(state, kind, sink),
        ScheduledAction::OpenShop => open_shop(state, sink),
        ScheduledAction::StartWave => {
            if state.run.between_waves && !state.run.game_over {
                start_wave(state, sink);
            }
        }
        ScheduledAction::MinigameSecond => minigame_second(state, sink),
        ScheduledAction::SpawnWeakPoint => spawn_weak_point(state),
    }
}

/// Drain every action due at the current clock, in order
pub fn run_due(state: &mut GameState, sink: &mut dyn EffectsSink) {
    while let Some(action) = state.schedule.pop_due(state.clock) {
        handle(state, action, sink);
        if state.run.game_over {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::effects::{EventLog, GameEvent};
    use rand::SeedableRng;

    fn boss_state() -> (GameState, u32) {
        let mut state = GameState::new(21, &Settings::default());
        state.run.running = true;
        state.run.started = true;
        state.run.wave = 5;
        state.run.wave_in_progress = true;
        let id = state.next_entity_id();
        let mut boss = Enemy::new(id, EnemyKind::SkibidiKing, 5, Vec3::new(0.0, 0.0, BOSS_HOLD_Z), 0.0);
        boss.phase = 2;
        boss.health = boss.max_health * 0.48;
        boss.minigame_triggered = true;
        state.enemies.push(boss);
        state.run.boss_active = true;
        state.run.boss_id = Some(id);
        (state, id)
    }

    #[test]
    fn test_wave_enemy_count_grows_linearly() {
        assert_eq!(wave_enemy_count(1), 5);
        assert_eq!(wave_enemy_count(4), 11);
    }

    #[test]
    fn test_gamer_only_after_min_wave() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..500 {
            assert_ne!(pick_regular_kind(&mut rng, 1), EnemyKind::Gamer);
        }
        let mut saw_gamer = false;
        for _ in 0..500 {
            saw_gamer |= pick_regular_kind(&mut rng, GAMER_MIN_WAVE) == EnemyKind::Gamer;
        }
        assert!(saw_gamer);
    }

    #[test]
    fn test_bosses_never_drawn_as_regulars() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(!pick_regular_kind(&mut rng, 20).is_boss());
        }
    }

    #[test]
    fn test_minigame_zero_hits_recovers() {
        let (mut state, id) = boss_state();
        let mut log = EventLog::new();
        start_minigame(&mut state, id, &mut log);
        let health = state.enemy(id).unwrap().health;
        assert!(state.enemy(id).unwrap().is_stunned());

        end_minigame(&mut state, &mut log);
        let boss = state.enemy(id).unwrap();
        assert_eq!(boss.health, health);
        assert!(!boss.is_stunned());
        assert_eq!(log.count(|e| matches!(e, GameEvent::BossRecovered { .. })), 1);
        assert!(state.minigame.is_none());
        assert_eq!(state.schedule.pending(is_minigame_action), 0);
    }

    #[test]
    fn test_minigame_hits_apply_bonus() {
        let (mut state, id) = boss_state();
        let mut log = EventLog::new();
        start_minigame(&mut state, id, &mut log);
        let health = state.enemy(id).unwrap().health;
        if let Some(game) = state.minigame.as_mut() {
            game.hits = 3;
        }
        end_minigame(&mut state, &mut log);
        let boss = state.enemy(id).unwrap();
        assert_eq!(boss.health, health - 3.0 * MINIGAME_DAMAGE_PER_HIT);
        assert_eq!(log.count(|e| matches!(e, GameEvent::BossRecovered { .. })), 0);
    }

    #[test]
    fn test_minigame_bonus_can_kill() {
        let (mut state, id) = boss_state();
        let mut log = EventLog::new();
        state.enemy_mut(id).unwrap().health = 50.0;
        start_minigame(&mut state, id, &mut log);
        state.minigame.as_mut().unwrap().hits = 2;
        end_minigame(&mut state, &mut log);
        assert!(state.enemy(id).unwrap().marked_for_removal);
        assert!(!state.run.boss_active);
        assert_eq!(log.count(|e| matches!(e, GameEvent::KillRecorded(r) if r.is_boss)), 1);
    }

    #[test]
    fn test_wave_clear_waits_for_pending_spawns() {
        let mut state = GameState::new(4, &Settings::default());
        let mut log = EventLog::new();
        start_run(&mut state, &mut log);
        assert!(!check_wave_complete(&mut state, &mut log));
        state.run.pending_spawns = 0;
        state.schedule.clear();
        state.run.health = 50.0;
        assert!(check_wave_complete(&mut state, &mut log));
        assert_eq!(state.run.wave, 2);
        assert_eq!(state.run.health, 50.0 + WAVE_CLEAR_HEAL);
        assert_eq!(
            log.count(|e| matches!(e, GameEvent::WaveCleared { wave: 1, flawless: false })),
            1
        );
    }

    #[test]
    fn test_shop_close_starts_next_wave() {
        let mut state = GameState::new(4, &Settings::default());
        let mut log = EventLog::new();
        state.run.between_waves = true;
        state.run.wave = 2;
        open_shop(&mut state, &mut log);
        assert!(state.run.shop_open);
        assert!(close_shop(&mut state, &mut log));
        assert!(state.run.wave_in_progress);
        assert_eq!(state.run.pending_spawns, wave_enemy_count(2));
        assert!(!close_shop(&mut state, &mut log));
    }
}
