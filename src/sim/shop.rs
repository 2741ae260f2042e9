//! Weapons, upgrades and the between-wave shop
//!
//! Purchases spend coins earned this run. Stats are re-derived after every
//! purchase, never during combat.

use serde::{Deserialize, Serialize};

use super::progression::PlayerStats;
use super::projectile::Special;
use super::state::GameState;
use crate::consts::PLAYER_BASE_HEALTH;
use crate::error::PurchaseError;

/// Highest level any upgrade can reach
pub const MAX_UPGRADE_LEVEL: u8 = 5;

/// Health added per Max Health level
pub const MAX_HEALTH_PER_LEVEL: f32 = 20.0;

/// Purchasable weapons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Pistol,
    Shotgun,
    Laser,
    RubberChicken,
    HomingLauncher,
}

/// Static weapon parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponSpec {
    pub name: &'static str,
    pub price: u64,
    pub damage: f32,
    pub cooldown_secs: f64,
    /// Projectile speed, units per frame
    pub speed: f32,
    pub pellets: u32,
    /// Lateral spread between pellets, radians
    pub spread: f32,
    pub special: Option<Special>,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Pistol,
        WeaponKind::Shotgun,
        WeaponKind::Laser,
        WeaponKind::RubberChicken,
        WeaponKind::HomingLauncher,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> WeaponSpec {
        match self {
            WeaponKind::Pistol => WeaponSpec {
                name: "Pistol",
                price: 0,
                damage: 15.0,
                cooldown_secs: 0.3,
                speed: 1.5,
                pellets: 1,
                spread: 0.0,
                special: None,
            },
            WeaponKind::Shotgun => WeaponSpec {
                name: "Shotgun",
                price: 150,
                damage: 9.0,
                cooldown_secs: 0.8,
                speed: 1.3,
                pellets: 5,
                spread: 0.08,
                special: None,
            },
            WeaponKind::Laser => WeaponSpec {
                name: "Laser",
                price: 300,
                damage: 8.0,
                cooldown_secs: 0.08,
                speed: 2.5,
                pellets: 1,
                spread: 0.0,
                special: Some(Special::Trail),
            },
            WeaponKind::RubberChicken => WeaponSpec {
                name: "Rubber Chicken",
                price: 250,
                damage: 40.0,
                cooldown_secs: 1.0,
                speed: 0.9,
                pellets: 1,
                spread: 0.0,
                special: Some(Special::Spin),
            },
            WeaponKind::HomingLauncher => WeaponSpec {
                name: "Homing Launcher",
                price: 500,
                damage: 30.0,
                cooldown_secs: 0.9,
                speed: 1.0,
                pellets: 1,
                spread: 0.0,
                special: Some(Special::Homing),
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

/// Per-run upgrade tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    Damage,
    CritChance,
    CritDamage,
    CoinMagnet,
    MaxHealth,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 5] = [
        UpgradeKind::Damage,
        UpgradeKind::CritChance,
        UpgradeKind::CritDamage,
        UpgradeKind::CoinMagnet,
        UpgradeKind::MaxHealth,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Damage => "Damage",
            UpgradeKind::CritChance => "Crit Chance",
            UpgradeKind::CritDamage => "Crit Damage",
            UpgradeKind::CoinMagnet => "Coin Magnet",
            UpgradeKind::MaxHealth => "Max Health",
        }
    }

    /// Price of the next level, given the current one
    pub fn price(self, level: u8) -> u64 {
        let base: u64 = match self {
            UpgradeKind::Damage => 50,
            UpgradeKind::CritChance => 60,
            UpgradeKind::CritDamage => 70,
            UpgradeKind::CoinMagnet => 40,
            UpgradeKind::MaxHealth => 45,
        };
        // 1.5x per level, rounded down
        base * 3u64.pow(level as u32) / 2u64.pow(level as u32)
    }
}

/// Owned weapons, equipped weapon and upgrade levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    owned: [bool; 5],
    equipped: WeaponKind,
    levels: [u8; 5],
}

impl Default for Inventory {
    fn default() -> Self {
        let mut owned = [false; 5];
        owned[WeaponKind::Pistol.index()] = true;
        Self {
            owned,
            equipped: WeaponKind::Pistol,
            levels: [0; 5],
        }
    }
}

impl Inventory {
    pub fn owns(&self, weapon: WeaponKind) -> bool {
        self.owned[weapon.index()]
    }

    pub fn equipped(&self) -> WeaponKind {
        self.equipped
    }

    /// Equip an owned weapon
    pub fn equip(&mut self, weapon: WeaponKind) -> Result<(), PurchaseError> {
        if !self.owns(weapon) {
            return Err(PurchaseError::NotOwned(weapon.name()));
        }
        self.equipped = weapon;
        Ok(())
    }

    pub fn level(&self, upgrade: UpgradeKind) -> u8 {
        self.levels[upgrade.index()]
    }

    pub fn set_level(&mut self, upgrade: UpgradeKind, level: u8) {
        self.levels[upgrade.index()] = level.min(MAX_UPGRADE_LEVEL);
    }

    /// Weapons available to equip, in catalog order
    pub fn owned_weapons(&self) -> impl Iterator<Item = WeaponKind> + '_ {
        WeaponKind::ALL.into_iter().filter(|w| self.owns(*w))
    }
}

fn spend(coins: &mut u64, price: u64) -> Result<(), PurchaseError> {
    if *coins < price {
        return Err(PurchaseError::InsufficientCoins {
            needed: price,
            available: *coins,
        });
    }
    *coins -= price;
    Ok(())
}

/// Buy and equip a weapon with run coins
pub fn buy_weapon(state: &mut GameState, weapon: WeaponKind) -> Result<(), PurchaseError> {
    if !state.run.shop_open {
        return Err(PurchaseError::ShopClosed);
    }
    if state.inventory.owns(weapon) {
        return Err(PurchaseError::AlreadyOwned(weapon.name()));
    }
    spend(&mut state.run.coins, weapon.spec().price)?;
    state.inventory.owned[weapon.index()] = true;
    state.inventory.equipped = weapon;
    log::info!("Bought {} ({} coins left)", weapon.name(), state.run.coins);
    Ok(())
}

/// Switch to a weapon bought earlier this run. Allowed at any point
/// before game over; the new weapon's cooldown starts fresh.
pub fn equip_weapon(state: &mut GameState, weapon: WeaponKind) -> Result<(), PurchaseError> {
    if state.inventory.equipped() == weapon {
        return Ok(());
    }
    state.inventory.equip(weapon)?;
    state.player.last_shot_at = f64::NEG_INFINITY;
    log::info!("Equipped {}", weapon.name());
    Ok(())
}

/// Buy the next level of an upgrade with run coins. Returns the new level.
pub fn buy_upgrade(state: &mut GameState, upgrade: UpgradeKind) -> Result<u8, PurchaseError> {
    if !state.run.shop_open {
        return Err(PurchaseError::ShopClosed);
    }
    let level = state.inventory.level(upgrade);
    if level >= MAX_UPGRADE_LEVEL {
        return Err(PurchaseError::MaxLevel(upgrade.name()));
    }
    spend(&mut state.run.coins, upgrade.price(level))?;
    state.inventory.levels[upgrade.index()] = level + 1;

    if upgrade == UpgradeKind::MaxHealth {
        state.run.max_health = max_health_for(&state.inventory);
        state.run.health = (state.run.health + MAX_HEALTH_PER_LEVEL).min(state.run.max_health);
    }
    state.player.stats = PlayerStats::derive(&state.inventory, &state.meta);
    log::info!("Upgraded {} to level {}", upgrade.name(), level + 1);
    Ok(level + 1)
}

/// Max health implied by the inventory's upgrade level
pub fn max_health_for(inventory: &Inventory) -> f32 {
    PLAYER_BASE_HEALTH + MAX_HEALTH_PER_LEVEL * inventory.level(UpgradeKind::MaxHealth) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    fn shop_state(coins: u64) -> GameState {
        let mut state = GameState::new(1, &Settings::default());
        state.run.shop_open = true;
        state.run.coins = coins;
        state
    }

    #[test]
    fn test_starts_with_pistol_equipped() {
        let inv = Inventory::default();
        assert!(inv.owns(WeaponKind::Pistol));
        assert_eq!(inv.equipped(), WeaponKind::Pistol);
        assert_eq!(inv.owned_weapons().count(), 1);
    }

    #[test]
    fn test_equip_requires_ownership() {
        let mut inv = Inventory::default();
        assert_eq!(
            inv.equip(WeaponKind::Laser),
            Err(PurchaseError::NotOwned("Laser"))
        );
        assert_eq!(inv.equipped(), WeaponKind::Pistol);
    }

    #[test]
    fn test_switch_back_to_owned_weapon() {
        let mut state = shop_state(10_000);
        buy_weapon(&mut state, WeaponKind::Laser).unwrap();
        state.run.shop_open = false;
        state.player.last_shot_at = 5.0;

        equip_weapon(&mut state, WeaponKind::Pistol).unwrap();
        assert_eq!(state.inventory.equipped(), WeaponKind::Pistol);
        assert_eq!(state.player.last_shot_at, f64::NEG_INFINITY);
        equip_weapon(&mut state, WeaponKind::Laser).unwrap();
        assert_eq!(state.inventory.equipped(), WeaponKind::Laser);
        assert_eq!(
            equip_weapon(&mut state, WeaponKind::Shotgun),
            Err(PurchaseError::NotOwned("Shotgun"))
        );
        assert_eq!(state.inventory.equipped(), WeaponKind::Laser);
    }

    #[test]
    fn test_buy_weapon_equips_it() {
        let mut state = shop_state(1000);
        buy_weapon(&mut state, WeaponKind::Shotgun).unwrap();
        assert_eq!(state.inventory.equipped(), WeaponKind::Shotgun);
        assert_eq!(state.run.coins, 850);
        assert_eq!(
            buy_weapon(&mut state, WeaponKind::Shotgun),
            Err(PurchaseError::AlreadyOwned("Shotgun"))
        );
    }

    #[test]
    fn test_purchase_refused_when_shop_closed() {
        let mut state = shop_state(1000);
        state.run.shop_open = false;
        assert_eq!(
            buy_upgrade(&mut state, UpgradeKind::Damage),
            Err(PurchaseError::ShopClosed)
        );
    }

    #[test]
    fn test_upgrade_prices_escalate_and_cap() {
        let mut state = shop_state(100_000);
        let mut last = 0;
        for expected in 1..=MAX_UPGRADE_LEVEL {
            let price = UpgradeKind::Damage.price(state.inventory.level(UpgradeKind::Damage));
            assert!(price > last);
            last = price;
            assert_eq!(buy_upgrade(&mut state, UpgradeKind::Damage), Ok(expected));
        }
        assert_eq!(
            buy_upgrade(&mut state, UpgradeKind::Damage),
            Err(PurchaseError::MaxLevel("Damage"))
        );
        assert!(state.player.stats.damage > PlayerStats::BASE.damage);
    }

    #[test]
    fn test_insufficient_coins_changes_nothing() {
        let mut state = shop_state(10);
        let before = state.player.stats;
        assert!(matches!(
            buy_upgrade(&mut state, UpgradeKind::CritChance),
            Err(PurchaseError::InsufficientCoins { needed: 60, available: 10 })
        ));
        assert_eq!(state.run.coins, 10);
        assert_eq!(state.player.stats, before);
    }

    #[test]
    fn test_max_health_upgrade_raises_cap() {
        let mut state = shop_state(1000);
        state.run.health = 50.0;
        buy_upgrade(&mut state, UpgradeKind::MaxHealth).unwrap();
        assert_eq!(state.run.max_health, PLAYER_BASE_HEALTH + MAX_HEALTH_PER_LEVEL);
        assert_eq!(state.run.health, 70.0);
    }
}
