use crate::{currency::CurrencyType, upgrade::UpgradeType};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid currency amount: {amount}")]
    InvalidAmount { amount: f64 },

    #[error("insufficient {currency:?}: need {needed}, have {available}")]
    InsufficientFunds {
        currency: CurrencyType,
        needed: f64,
        available: f64,
    },

    #[error("upgrade {upgrade:?} is already at max level {max_level}")]
    UpgradeAtMaxLevel { upgrade: UpgradeType, max_level: u32 },

    #[error("no spec registered for upgrade {0:?}")]
    UnknownUpgradeType(UpgradeType),

    #[error("invalid upgrade spec for {upgrade:?}: {reason}")]
    InvalidSpec { upgrade: UpgradeType, reason: String },

    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
