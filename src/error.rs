//! Error types for the fallible edges of the game
//!
//! The frame loop itself never fails; only shop actions and persistence do.

use thiserror::Error;

/// Why a shop or perk purchase was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("not enough coins: need {needed}, have {available}")]
    InsufficientCoins { needed: u64, available: u64 },

    #[error("{0} is already at max level")]
    MaxLevel(&'static str),

    #[error("{0} is already owned")]
    AlreadyOwned(&'static str),

    #[error("{0} is not owned")]
    NotOwned(&'static str),

    #[error("the shop is closed")]
    ShopClosed,
}

/// Loading or saving a JSON document failed
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
