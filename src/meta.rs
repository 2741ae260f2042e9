//! Meta-progression persisted between runs
//!
//! Meta-coins, permanent perks and the top-10 high score table.
//! Nothing from a run's simulation state survives except what lands here.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PersistError, PurchaseError};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Highest level a permanent perk can reach
pub const MAX_PERK_LEVEL: u8 = 5;

/// Permanent perks bought with meta-coins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerkKind {
    /// +5% weapon damage per level
    Power,
    /// +2% crit chance per level
    Precision,
    /// +10% coins per level
    Greed,
}

impl PerkKind {
    pub const ALL: [PerkKind; 3] = [PerkKind::Power, PerkKind::Precision, PerkKind::Greed];

    pub fn name(self) -> &'static str {
        match self {
            PerkKind::Power => "Power",
            PerkKind::Precision => "Precision",
            PerkKind::Greed => "Greed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Price of the next level, given the current one
    pub fn price(self, level: u8) -> u64 {
        let base = match self {
            PerkKind::Power => 150,
            PerkKind::Precision => 120,
            PerkKind::Greed => 100,
        };
        base * (level as u64 + 1)
    }
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    pub wave: u32,
    pub kills: u32,
    /// Unix timestamp in seconds when achieved
    pub timestamp: f64,
}

/// Everything that persists across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaProgress {
    /// Meta-currency bank
    pub coins: u64,
    pub lifetime_kills: u64,
    pub best_wave: u32,
    perks: [u8; 3],
    pub high_scores: Vec<HighScoreEntry>,
}

impl MetaProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn perk_level(&self, perk: PerkKind) -> u8 {
        self.perks[perk.index()]
    }

    /// Buy the next level of a perk. Returns the new level.
    pub fn buy_perk(&mut self, perk: PerkKind) -> Result<u8, PurchaseError> {
        let level = self.perk_level(perk);
        if level >= MAX_PERK_LEVEL {
            return Err(PurchaseError::MaxLevel(perk.name()));
        }
        let price = perk.price(level);
        if self.coins < price {
            return Err(PurchaseError::InsufficientCoins {
                needed: price,
                available: self.coins,
            });
        }
        self.coins -= price;
        self.perks[perk.index()] = level + 1;
        log::info!("Perk {} upgraded to level {}", perk.name(), level + 1);
        Ok(level + 1)
    }

    /// Credit a kill's coins to the bank
    pub fn deposit_kill(&mut self, coins: u64) {
        self.coins += coins;
        self.lifetime_kills += 1;
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.high_scores.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.high_scores.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run. Returns the leaderboard rank (1-indexed) if it placed.
    pub fn record_run(&mut self, score: u64, wave: u32, kills: u32, timestamp: f64) -> Option<usize> {
        self.best_wave = self.best_wave.max(wave);
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            wave,
            kills,
            timestamp,
        };

        // Sorted descending by score
        let pos = self.high_scores.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.high_scores.insert(i, entry);
                i + 1
            }
            None => {
                self.high_scores.push(entry);
                self.high_scores.len()
            }
        };
        self.high_scores.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn top_score(&self) -> Option<u64> {
        self.high_scores.first().map(|e| e.score)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load progress, starting fresh when there is no readable save
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(meta) => {
                log::info!(
                    "Loaded meta progress ({} coins, {} high scores)",
                    meta.coins,
                    meta.high_scores.len()
                );
                meta
            }
            Err(e) => {
                log::warn!("No meta progress found, starting fresh ({e})");
                Self::new()
            }
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        log::info!("Meta progress saved ({} coins)", self.coins);
        Ok(())
    }
}
