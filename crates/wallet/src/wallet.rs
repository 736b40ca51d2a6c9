use cardwise_core::{Card, CardId, CatalogCard};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::WalletError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalletStats {
    pub total: usize,
    pub active: usize,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WalletFile {
    #[serde(default)]
    cards: Vec<Card>,
}

/// The cards a user owns. All mutation happens here; the recommendation
/// engine only ever sees a [`Wallet::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct Wallet {
    cards: Vec<Card>,
    next_seq: u64,
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, WalletError> {
        let file: WalletFile = toml::from_str(toml_content)?;
        let mut wallet = Wallet::new();
        for card in file.cards {
            wallet.insert(card)?;
        }
        Ok(wallet)
    }

    pub fn to_toml(&self) -> Result<String, WalletError> {
        let file = WalletFile {
            cards: self.cards.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Adds a catalog card as a new active card and returns its id.
    pub fn add(&mut self, template: CatalogCard) -> Result<CardId, WalletError> {
        if self.owns(&template.bank_name, &template.card_name) {
            return Err(WalletError::AlreadyOwned {
                bank_name: template.bank_name,
                card_name: template.card_name,
            });
        }
        template.validate()?;

        let id = self.next_id(&template.bank_name, &template.card_name);
        info!(card = %id, "adding card to wallet");
        self.cards.push(template.issue(id.clone()));
        Ok(id)
    }

    /// Inserts an already-issued card, e.g. one read back from a wallet file.
    pub fn insert(&mut self, card: Card) -> Result<(), WalletError> {
        card.validate()?;
        if self.get(&card.id).is_some() {
            return Err(WalletError::DuplicateId(card.id));
        }
        debug!(card = %card.id, "inserting card");
        self.cards.push(card);
        Ok(())
    }

    pub fn remove(&mut self, id: &CardId) -> Result<Card, WalletError> {
        let idx = self
            .cards
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| WalletError::NotFound(id.clone()))?;
        info!(card = %id, "removing card from wallet");
        Ok(self.cards.remove(idx))
    }

    /// Flips the active flag and returns the new state.
    pub fn toggle(&mut self, id: &CardId) -> Result<bool, WalletError> {
        let card = self
            .cards
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| WalletError::NotFound(id.clone()))?;
        card.is_active = !card.is_active;
        info!(card = %id, active = card.is_active, "toggled card");
        Ok(card.is_active)
    }

    pub fn get(&self, id: &CardId) -> Option<&Card> {
        self.cards.iter().find(|c| &c.id == id)
    }

    pub fn find(&self, bank_name: &str, card_name: &str) -> Option<&Card> {
        self.cards
            .iter()
            .find(|c| c.bank_name == bank_name && c.card_name == card_name)
    }

    pub fn owns(&self, bank_name: &str, card_name: &str) -> bool {
        self.find(bank_name, card_name).is_some()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Owned copy of the current cards, safe to rank while the wallet keeps
    /// changing.
    pub fn snapshot(&self) -> Vec<Card> {
        self.cards.clone()
    }

    pub fn stats(&self) -> WalletStats {
        WalletStats {
            total: self.cards.len(),
            active: self.cards.iter().filter(|c| c.is_active).count(),
        }
    }

    fn next_id(&mut self, bank_name: &str, card_name: &str) -> CardId {
        loop {
            self.next_seq += 1;
            let id = CardId::new(format!("{bank_name}_{card_name}_{}", self.next_seq));
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}
