//! Outbound hooks from the simulation to the presentation layer
//!
//! Every method has a no-op default, so a host only overrides what it
//! actually presents. The core never depends on a hook's result.

use glam::Vec3;

use super::enemy::{Enemy, EnemyKind};
use super::state::RunState;

/// Sound cues the host may synthesize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Shoot,
    Hit,
    Crit,
    Kill,
    BossKill,
    PlayerHurt,
    PhaseChange,
    WeakPointHit,
    Heal,
    WaveClear,
    BossIntro,
    GameOver,
}

/// Screen shake intensities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shake {
    Damage,
    Kill,
    Crit,
    BossDeath,
}

/// Moments an enemy may say something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueTrigger {
    Spawn,
    Attack,
    PhaseChange,
    Stunned,
}

/// Everything a kill produced, handed to achievement and feed hooks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillReport {
    pub enemy_id: u32,
    pub kind: EnemyKind,
    pub pos: Vec3,
    pub is_boss: bool,
    pub points: u64,
    pub combo_bonus: u64,
    pub coins: u64,
    pub combo: u32,
    pub was_one_shot: bool,
    pub wave: u32,
}

/// Final numbers of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u64,
    pub wave: u32,
    pub kills: u32,
    pub coins: u64,
}

/// Narrow capability interface for side effects
pub trait EffectsSink {
    fn play_sound(&mut self, _sound: Sound) {}
    fn damage_overlay(&mut self) {}
    fn shake(&mut self, _kind: Shake) {}
    fn hit_marker(&mut self, _crit: bool) {}
    fn enemy_dialogue(&mut self, _enemy: &Enemy, _trigger: DialogueTrigger) {}
    fn enemy_spawned(&mut self, _enemy: &Enemy) {}
    fn update_hud(&mut self, _run: &RunState) {}
    fn kill_feed(&mut self, _name: &str) {}
    fn record_kill(&mut self, _report: &KillReport) {}
    fn combo_changed(&mut self, _combo: u32, _multiplier: f32) {}
    fn combo_broken(&mut self, _combo: u32) {}
    fn kill_streak(&mut self, _streak: u32) {}
    fn check_achievements(&mut self, _report: &KillReport) {}
    fn start_minigame(&mut self, _boss: &Enemy, _seconds: u32) {}
    fn minigame_ended(&mut self, _hits: u32, _bonus_damage: f32) {}
    fn boss_recovered(&mut self, _boss: &Enemy) {}
    fn phase_transition(&mut self, _boss: &Enemy, _phase: u8) {}
    fn clear_phase_effects(&mut self) {}
    fn lens_flare(&mut self, _x: f32, _z: f32) {}
    fn chat_kill(&mut self) {}
    fn chat_boss_kill(&mut self) {}
    fn wave_started(&mut self, _wave: u32, _boss_wave: bool) {}
    fn wave_cleared(&mut self, _wave: u32, _flawless: bool) {}
    fn boss_intro(&mut self, _stage: u8) {}
    fn shop_opened(&mut self, _next_wave: u32) {}
    fn heal_ready(&mut self) {}
    fn healed(&mut self, _amount: f32) {}
    fn game_over(&mut self, _summary: &RunSummary) {}
}

/// Discards every effect
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EffectsSink for NullSink {}

/// Recorded form of a hook call
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(Sound),
    DamageOverlay,
    Shake(Shake),
    HitMarker { crit: bool },
    Dialogue { enemy_id: u32, trigger: DialogueTrigger },
    EnemySpawned { enemy_id: u32, kind: EnemyKind, is_boss: bool },
    KillFeed(String),
    KillRecorded(KillReport),
    ComboChanged { combo: u32 },
    ComboBroken { combo: u32 },
    KillStreak(u32),
    AchievementCheck { enemy_id: u32, was_one_shot: bool },
    MinigameStarted { boss_id: u32, seconds: u32 },
    MinigameEnded { hits: u32, bonus_damage: f32 },
    BossRecovered { boss_id: u32 },
    PhaseTransition { boss_id: u32, phase: u8 },
    PhaseEffectsCleared,
    LensFlare,
    ChatKill,
    ChatBossKill,
    WaveStarted { wave: u32, boss_wave: bool },
    WaveCleared { wave: u32, flawless: bool },
    BossIntro(u8),
    ShopOpened { next_wave: u32 },
    HealReady,
    Healed(f32),
    GameOver(RunSummary),
}

/// Sink that records every effect, for hosts that poll and for tests
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
    /// HUD refreshes are counted, not recorded
    pub hud_updates: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn drain(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EffectsSink for EventLog {
    fn play_sound(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }
    fn damage_overlay(&mut self) {
        self.events.push(GameEvent::DamageOverlay);
    }
    fn shake(&mut self, kind: Shake) {
        self.events.push(GameEvent::Shake(kind));
    }
    fn hit_marker(&mut self, crit: bool) {
        self.events.push(GameEvent::HitMarker { crit });
    }
    fn enemy_dialogue(&mut self, enemy: &Enemy, trigger: DialogueTrigger) {
        self.events.push(GameEvent::Dialogue {
            enemy_id: enemy.id,
            trigger,
        });
    }
    fn enemy_spawned(&mut self, enemy: &Enemy) {
        self.events.push(GameEvent::EnemySpawned {
            enemy_id: enemy.id,
            kind: enemy.kind,
            is_boss: enemy.is_boss(),
        });
    }
    fn update_hud(&mut self, _run: &RunState) {
        self.hud_updates += 1;
    }
    fn kill_feed(&mut self, name: &str) {
        self.events.push(GameEvent::KillFeed(name.to_string()));
    }
    fn record_kill(&mut self, report: &KillReport) {
        self.events.push(GameEvent::KillRecorded(*report));
    }
    fn combo_changed(&mut self, combo: u32, _multiplier: f32) {
        self.events.push(GameEvent::ComboChanged { combo });
    }
    fn combo_broken(&mut self, combo: u32) {
        self.events.push(GameEvent::ComboBroken { combo });
    }
    fn kill_streak(&mut self, streak: u32) {
        self.events.push(GameEvent::KillStreak(streak));
    }
    fn check_achievements(&mut self, report: &KillReport) {
        self.events.push(GameEvent::AchievementCheck {
            enemy_id: report.enemy_id,
            was_one_shot: report.was_one_shot,
        });
    }
    fn start_minigame(&mut self, boss: &Enemy, seconds: u32) {
        self.events.push(GameEvent::MinigameStarted {
            boss_id: boss.id,
            seconds,
        });
    }
    fn minigame_ended(&mut self, hits: u32, bonus_damage: f32) {
        self.events
            .push(GameEvent::MinigameEnded { hits, bonus_damage });
    }
    fn boss_recovered(&mut self, boss: &Enemy) {
        self.events.push(GameEvent::BossRecovered { boss_id: boss.id });
    }
    fn phase_transition(&mut self, boss: &Enemy, phase: u8) {
        self.events.push(GameEvent::PhaseTransition {
            boss_id: boss.id,
            phase,
        });
    }
    fn clear_phase_effects(&mut self) {
        self.events.push(GameEvent::PhaseEffectsCleared);
    }
    fn lens_flare(&mut self, _x: f32, _z: f32) {
        self.events.push(GameEvent::LensFlare);
    }
    fn chat_kill(&mut self) {
        self.events.push(GameEvent::ChatKill);
    }
    fn chat_boss_kill(&mut self) {
        self.events.push(GameEvent::ChatBossKill);
    }
    fn wave_started(&mut self, wave: u32, boss_wave: bool) {
        self.events.push(GameEvent::WaveStarted { wave, boss_wave });
    }
    fn wave_cleared(&mut self, wave: u32, flawless: bool) {
        self.events.push(GameEvent::WaveCleared { wave, flawless });
    }
    fn boss_intro(&mut self, stage: u8) {
        self.events.push(GameEvent::BossIntro(stage));
    }
    fn shop_opened(&mut self, next_wave: u32) {
        self.events.push(GameEvent::ShopOpened { next_wave });
    }
    fn heal_ready(&mut self) {
        self.events.push(GameEvent::HealReady);
    }
    fn healed(&mut self, amount: f32) {
        self.events.push(GameEvent::Healed(amount));
    }
    fn game_over(&mut self, summary: &RunSummary) {
        self.events.push(GameEvent::GameOver(*summary));
    }
}
