use cardwise_core::CatalogCard;
use serde::{Deserialize, Serialize};

use crate::WalletError;

/// The cards a user can pick from when adding to their wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub cards: Vec<CatalogCard>,
}

impl Catalog {
    pub fn new(cards: Vec<CatalogCard>) -> Self {
        Self { cards }
    }

    /// Parses a `[[cards]]` list. Every entry is validated.
    pub fn from_toml(toml_content: &str) -> Result<Self, WalletError> {
        let catalog: Catalog = toml::from_str(toml_content)?;
        for card in &catalog.cards {
            card.validate()?;
        }
        Ok(catalog)
    }

    /// Distinct bank names, in catalog order.
    pub fn banks(&self) -> Vec<&str> {
        let mut banks: Vec<&str> = Vec::new();
        for card in &self.cards {
            if !banks.contains(&card.bank_name.as_str()) {
                banks.push(&card.bank_name);
            }
        }
        banks
    }

    /// Case-insensitive match on card or bank name, optionally restricted to
    /// one bank. An empty query matches everything.
    pub fn search(&self, query: &str, bank: Option<&str>) -> Vec<&CatalogCard> {
        let needle = query.trim().to_lowercase();
        self.cards
            .iter()
            .filter(|c| bank.map_or(true, |b| c.bank_name == b))
            .filter(|c| {
                needle.is_empty()
                    || c.card_name.to_lowercase().contains(&needle)
                    || c.bank_name.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn find(&self, bank_name: &str, card_name: &str) -> Option<&CatalogCard> {
        self.cards
            .iter()
            .find(|c| c.bank_name == bank_name && c.card_name == card_name)
    }
}
