//! Per-frame simulation tick
//!
//! Ordering within a tick is fixed: input, scheduled actions, projectiles,
//! projectile hits, enemies and their attacks, enemy shots, effects, combo
//! window, cleanup, wave completion, HUD.

use glam::Vec2;

use super::combat;
use super::director;
use super::effects::EffectsSink;
use super::entity::{Entity, purge_expired};
use super::shop::{self, WeaponKind};
use super::state::GameState;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Lateral lane the player steers toward
    pub target_x: Option<f32>,
    /// Pointer aim in -1..1 on both axes
    pub aim: Option<Vec2>,
    /// Fire trigger held
    pub fire: bool,
    /// Use the heal ability
    pub heal: bool,
    /// Pause toggle
    pub pause: bool,
    pub start: bool,
    pub restart: bool,
    pub open_shop: bool,
    pub close_shop: bool,
    /// Switch to an already owned weapon
    pub equip: Option<WeaponKind>,
}

fn apply_input(state: &mut GameState, input: &TickInput, sink: &mut dyn EffectsSink) {
    if input.restart {
        director::restart(state, sink);
    } else if input.start && (!state.run.started || state.run.game_over) {
        if state.run.game_over {
            director::restart(state, sink);
        } else {
            director::start_run(state, sink);
        }
    }

    if input.pause && state.run.running && !state.run.game_over {
        state.run.paused = !state.run.paused;
        log::info!("{}", if state.run.paused { "Paused" } else { "Resumed" });
    }

    if input.open_shop {
        director::open_shop(state, sink);
    }
    if input.close_shop {
        director::close_shop(state, sink);
    }
    if let Some(weapon) = input.equip {
        if !state.run.game_over {
            if let Err(e) = shop::equip_weapon(state, weapon) {
                log::debug!("Equip refused: {e}");
            }
        }
    }
}

/// Advance the world by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, sink: &mut dyn EffectsSink) {
    apply_input(state, input, sink);

    if !state.run.is_live() {
        sink.update_hud(&state.run);
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.clock += dt as f64;

    // Player input
    if let Some(target) = input.target_x {
        state.player.move_toward(target, dt, PLAYER_MAX_SPEED);
    }
    if let Some(aim) = input.aim {
        state.player.aim = aim.clamp(Vec2::splat(-1.0), Vec2::ONE);
    }
    if input.heal {
        combat::use_heal(state, sink);
    }
    if input.fire && !state.run.shop_open {
        combat::fire(state, sink);
    }

    director::run_due(state, sink);
    if state.run.game_over {
        sink.update_hud(&state.run);
        return;
    }

    // Player projectiles
    state.refresh_targets();
    let mut commands = Vec::new();
    {
        let (mut ctx, lists) = state.split(dt, &mut *sink, &mut commands);
        for shot in lists.projectiles.iter_mut() {
            shot.update(&mut ctx);
        }
    }
    combat::resolve_projectile_hits(state, sink);

    // Enemies, then whatever they asked for
    {
        let (mut ctx, lists) = state.split(dt, &mut *sink, &mut commands);
        for enemy in lists.enemies.iter_mut() {
            enemy.update(&mut ctx);
        }
    }
    combat::apply_commands(state, std::mem::take(&mut commands), sink);
    if state.run.game_over {
        sink.update_hud(&state.run);
        return;
    }

    // Enemy shots
    {
        let (mut ctx, lists) = state.split(dt, &mut *sink, &mut commands);
        for shot in lists.enemy_projectiles.iter_mut() {
            shot.update(&mut ctx);
        }
    }
    combat::resolve_enemy_shots(state, sink);
    if state.run.game_over {
        sink.update_hud(&state.run);
        return;
    }

    // Effects
    let mut texts = std::mem::take(&mut state.texts);
    {
        let (mut ctx, lists) = state.split(dt, &mut *sink, &mut commands);
        if let Some(game) = lists.minigame.as_mut() {
            game.update(&mut ctx);
        }
        for text in texts.iter_mut() {
            text.update(&mut ctx);
        }
    }
    texts.append(&mut state.texts);
    state.texts = texts;
    state.particles.update(dt);

    if state.combo.expired(state.clock) {
        if let Some(broken) = state.combo.break_combo() {
            sink.combo_broken(broken);
        }
    }

    // Cleanup
    purge_expired(&mut state.projectiles);
    purge_expired(&mut state.enemy_projectiles);
    purge_expired(&mut state.enemies);
    purge_expired(&mut state.texts);

    director::check_wave_complete(state, sink);
    sink.update_hud(&state.run);
}
