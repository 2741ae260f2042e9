//! Simulation module
//!
//! All gameplay logic lives here. This module is pure:
//! - No rendering beyond emitting draw lists
//! - No platform dependencies
//! - Side effects leave only through `EffectsSink`

pub mod collision;
pub mod combat;
pub mod director;
pub mod effects;
pub mod enemy;
pub mod entity;
pub mod particles;
pub mod progression;
pub mod projectile;
pub mod schedule;
pub mod shop;
pub mod state;
pub mod tick;
pub mod weak_point;

pub use effects::{EffectsSink, EventLog, GameEvent, KillReport, NullSink, RunSummary};
pub use enemy::{Enemy, EnemyKind, HitOutcome};
pub use entity::{Entity, WorldCommand};
pub use progression::{Combo, KillStreak, PlayerStats};
pub use schedule::{Schedule, ScheduledAction};
pub use shop::{Inventory, UpgradeKind, WeaponKind, buy_upgrade, buy_weapon, equip_weapon};
pub use state::{GameState, PlayerState, RunState};
pub use tick::{TickInput, tick};
