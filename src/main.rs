//! Brainrot Defense native entry point
//!
//! Runs a headless autopilot session against the simulation core, logging
//! every effect, then banks the run into the meta-progression file.
//!
//! Usage: `brainrot-defense [meta.json] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use brainrot_defense::consts::*;
    use brainrot_defense::meta::PerkKind;
    use brainrot_defense::renderer::{Viewport, render_world};
    use brainrot_defense::sim::combat::aim_at;
    use brainrot_defense::sim::effects::{KillReport, RunSummary, Shake, Sound};
    use brainrot_defense::sim::{
        EffectsSink, Enemy, GameState, RunState, TickInput, UpgradeKind, WeaponKind, buy_upgrade,
        buy_weapon, tick,
    };
    use brainrot_defense::{MetaProgress, QualityPreset, Settings};

    /// Hard stop for the demo session, in frames (ten simulated minutes)
    const MAX_FRAMES: u64 = 60 * 60 * 10;

    /// Sink that writes effects to the log
    #[derive(Default)]
    struct LogSink {
        kills: u32,
        shots: u64,
        over: Option<RunSummary>,
    }

    impl EffectsSink for LogSink {
        fn play_sound(&mut self, sound: Sound) {
            if sound == Sound::Shoot {
                self.shots += 1;
            }
        }
        fn shake(&mut self, kind: Shake) {
            log::trace!("shake {kind:?}");
        }
        fn record_kill(&mut self, report: &KillReport) {
            self.kills += 1;
            log::debug!(
                "kill #{}: {} for {} (+{} combo)",
                self.kills,
                report.kind.name(),
                report.points,
                report.combo_bonus
            );
        }
        fn kill_streak(&mut self, streak: u32) {
            log::info!("{streak} kill streak");
        }
        fn start_minigame(&mut self, boss: &Enemy, seconds: u32) {
            log::info!("{} stunned for {seconds}s", boss.kind.name());
        }
        fn minigame_ended(&mut self, hits: u32, bonus_damage: f32) {
            log::info!("weak points: {hits} hits, {bonus_damage} bonus damage");
        }
        fn boss_recovered(&mut self, boss: &Enemy) {
            log::info!("{} recovered", boss.kind.name());
        }
        fn phase_transition(&mut self, boss: &Enemy, phase: u8) {
            log::info!("{} phase {phase}", boss.kind.name());
        }
        fn wave_started(&mut self, wave: u32, boss_wave: bool) {
            log::info!("wave {wave}{}", if boss_wave { " (boss)" } else { "" });
        }
        fn wave_cleared(&mut self, wave: u32, flawless: bool) {
            log::info!("wave {wave} cleared{}", if flawless { ", flawless" } else { "" });
        }
        fn boss_intro(&mut self, stage: u8) {
            log::info!("boss intro stage {stage}");
        }
        fn heal_ready(&mut self) {
            log::info!("heal ready");
        }
        fn game_over(&mut self, summary: &RunSummary) {
            self.over = Some(*summary);
        }
        fn update_hud(&mut self, _run: &RunState) {}
    }

    /// Choose this frame's input: track the closest threat, shoot weak points
    /// first, heal when hurt
    fn autopilot(state: &GameState) -> TickInput {
        let muzzle = state.player.muzzle();
        let weak_point = state
            .minigame
            .as_ref()
            .and_then(|game| game.weak_points.first())
            .map(|w| w.pos);
        let closest = state
            .enemies
            .iter()
            .filter(|e| !e.marked_for_removal && !e.is_sigma())
            .max_by(|a, b| a.pos.z.total_cmp(&b.pos.z))
            .map(Enemy::center);
        let target = weak_point.or(closest);

        TickInput {
            target_x: target.map(|t| t.x * 0.3),
            aim: target.map(|t| aim_at(muzzle, t)),
            fire: target.is_some(),
            heal: state.run.health < state.run.max_health * 0.6,
            ..TickInput::default()
        }
    }

    /// Spend run coins: weapons first, then the cheapest upgrade
    fn shop(state: &mut GameState) {
        for weapon in [WeaponKind::HomingLauncher, WeaponKind::Laser, WeaponKind::Shotgun] {
            if buy_weapon(state, weapon).is_ok() {
                return;
            }
        }
        while let Some(upgrade) = UpgradeKind::ALL
            .into_iter()
            .min_by_key(|u| u.price(state.inventory.level(*u)))
        {
            if let Err(e) = buy_upgrade(state, upgrade) {
                log::debug!("shop: {e}");
                break;
            }
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let meta_path = args.next().unwrap_or_else(|| "brainrot_meta.json".to_string());
        let mut settings = args
            .next()
            .map(Settings::load_or_default)
            .unwrap_or_default();
        if let Some(preset) = std::env::var("BRAINROT_QUALITY")
            .ok()
            .and_then(|name| QualityPreset::parse(&name))
        {
            settings.quality = preset;
        }

        let meta = MetaProgress::load_or_default(&meta_path);
        let seed = meta.lifetime_kills.wrapping_mul(31).wrapping_add(7);
        let mut state = GameState::with_meta(seed, &settings, meta);
        state.wall_time = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        let mut sink = LogSink::default();
        let viewport = Viewport::new(1280.0, 720.0);
        let start = TickInput {
            start: true,
            ..TickInput::default()
        };
        tick(&mut state, &start, FRAME_DT, &mut sink);

        let mut frame = 0u64;
        while !state.run.game_over && frame < MAX_FRAMES {
            if state.run.shop_open {
                shop(&mut state);
                let close = TickInput {
                    close_shop: true,
                    ..TickInput::default()
                };
                tick(&mut state, &close, FRAME_DT, &mut sink);
            } else {
                let input = autopilot(&state);
                tick(&mut state, &input, FRAME_DT, &mut sink);
            }
            if frame % 600 == 0 {
                let list = render_world(&state, &viewport);
                log::debug!(
                    "frame {frame}: {} vertices, {} labels",
                    list.vertices.len(),
                    list.labels.len()
                );
            }
            frame += 1;
        }

        match sink.over {
            Some(summary) => log::info!(
                "Run over: score {} wave {} kills {} coins {} ({} shots)",
                summary.score,
                summary.wave,
                summary.kills,
                summary.coins,
                sink.shots
            ),
            None => log::info!(
                "Demo stopped at wave {} with score {}",
                state.run.wave,
                state.run.score
            ),
        }

        let mut meta = state.meta;
        for perk in PerkKind::ALL {
            if let Ok(level) = meta.buy_perk(perk) {
                log::info!("Bought perk {} level {level}", perk.name());
            }
        }
        if let Err(e) = meta.save(&meta_path) {
            log::error!("Failed to save {meta_path}: {e}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Brainrot Defense (native demo) starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The host page drives `sim::tick` directly
}
