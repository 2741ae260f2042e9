//! Combo, kill streak and player stat derivation
//!
//! Stats are derived from the inventory and meta perks between waves; the
//! combat resolver only reads them.

use serde::{Deserialize, Serialize};

use super::shop::{Inventory, UpgradeKind};
use crate::consts::*;
use crate::meta::{MetaProgress, PerkKind};

/// Combat multipliers applied to every shot and kill
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    /// Scales weapon base damage
    pub damage: f32,
    /// Flat bonus added after scaling
    pub damage_bonus: f32,
    /// Final multiplier
    pub damage_multiplier: f32,
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub coin_multiplier: f32,
}

impl PlayerStats {
    pub const BASE: PlayerStats = PlayerStats {
        damage: 1.0,
        damage_bonus: 0.0,
        damage_multiplier: 1.0,
        crit_chance: 0.05,
        crit_multiplier: 2.0,
        coin_multiplier: 1.0,
    };

    /// Recompute stats from upgrade levels and permanent perks
    pub fn derive(inventory: &Inventory, meta: &MetaProgress) -> Self {
        let lvl = |kind: UpgradeKind| inventory.level(kind) as f32;
        let perk = |kind: PerkKind| meta.perk_level(kind) as f32;
        let base = Self::BASE;

        Self {
            damage: base.damage + 0.15 * lvl(UpgradeKind::Damage),
            damage_bonus: base.damage_bonus + 2.0 * lvl(UpgradeKind::Damage),
            damage_multiplier: base.damage_multiplier + 0.05 * perk(PerkKind::Power),
            crit_chance: (base.crit_chance
                + 0.04 * lvl(UpgradeKind::CritChance)
                + 0.02 * perk(PerkKind::Precision))
                .min(0.75),
            crit_multiplier: base.crit_multiplier + 0.25 * lvl(UpgradeKind::CritDamage),
            coin_multiplier: base.coin_multiplier
                + 0.2 * lvl(UpgradeKind::CoinMagnet)
                + 0.1 * perk(PerkKind::Greed),
        }
    }

    /// Damage a weapon shot deals before crit rolls
    pub fn shot_damage(&self, weapon_damage: f32) -> f32 {
        (weapon_damage * self.damage + self.damage_bonus) * self.damage_multiplier
    }

    /// Coins a kill pays out
    pub fn coins_for(&self, base_coins: u64) -> u64 {
        (base_coins as f32 * self.coin_multiplier).floor() as u64
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::BASE
    }
}

/// Consecutive kills inside a time window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Combo {
    pub count: u32,
    /// Clock time of the last kill
    pub last_kill_at: f64,
}

impl Combo {
    /// Score multiplier for a combo count
    pub fn multiplier_for(count: u32) -> f32 {
        (1.0 + count as f32 * COMBO_STEP).min(COMBO_MAX_MULTIPLIER)
    }

    pub fn multiplier(&self) -> f32 {
        Self::multiplier_for(self.count)
    }

    /// Extra points earned on top of `points` at the current combo
    pub fn bonus_for(count: u32, points: u64) -> u64 {
        (points as f32 * (Self::multiplier_for(count) - 1.0)).floor() as u64
    }

    pub fn bonus(&self, points: u64) -> u64 {
        Self::bonus_for(self.count, points)
    }

    pub fn increment(&mut self, clock: f64) -> u32 {
        self.count += 1;
        self.last_kill_at = clock;
        self.count
    }

    /// Reset the combo. Returns the broken count when there was one.
    pub fn break_combo(&mut self) -> Option<u32> {
        let broken = self.count;
        self.count = 0;
        (broken > 0).then_some(broken)
    }

    /// True once the window since the last kill has elapsed
    pub fn expired(&self, clock: f64) -> bool {
        self.count > 0 && clock - self.last_kill_at > COMBO_WINDOW_SECS
    }
}

/// Kills since the player last took damage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KillStreak {
    pub count: u32,
    pub best: u32,
}

impl KillStreak {
    /// Count a kill. Returns the streak when it lands on a milestone.
    pub fn record(&mut self) -> Option<u32> {
        self.count += 1;
        self.best = self.best.max(self.count);
        KILL_STREAK_MILESTONES
            .contains(&self.count)
            .then_some(self.count)
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}
