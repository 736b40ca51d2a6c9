pub mod catalog;
pub mod directory;
pub mod wallet;

use cardwise_core::{CardError, CardId};
use thiserror::Error;

pub use catalog::Catalog;
pub use directory::MerchantDirectory;
pub use wallet::{Wallet, WalletStats};

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Card not found: {0}")]
    NotFound(CardId),
    #[error("Duplicate card id: {0}")]
    DuplicateId(CardId),
    #[error("{bank_name} {card_name} is already in the wallet")]
    AlreadyOwned { bank_name: String, card_name: String },
    #[error("No merchant matches '{0}'")]
    MerchantNotFound(String),
    #[error("'{query}' matches several merchants: {}", .candidates.join(", "))]
    AmbiguousMerchant { query: String, candidates: Vec<String> },
    #[error("Duplicate merchant id: {0}")]
    DuplicateMerchant(String),
    #[error("Invalid card: {0}")]
    InvalidCard(#[from] CardError),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}
