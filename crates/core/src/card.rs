use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Reward rate in percent, e.g. `3.3` means 3.3% of the spend.
pub type Rate = Decimal;

/// Card category → rate, in the order the card data lists them.
pub type RateTable = IndexMap<String, Rate>;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        CardId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A credit card the user owns.
///
/// `cashback`, `notes` and `limits` are keyed by the bank's own category
/// names. Every bank has its own taxonomy, so the keys are free-form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub bank_name: String,
    pub card_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub general_notes: Vec<String>,
    #[serde(default)]
    pub cashback: RateTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<BTreeMap<String, String>>,
    /// Monthly cap in reward points per category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, Decimal>>,
}

fn default_active() -> bool {
    true
}

impl Card {
    pub fn new(id: &str, bank_name: &str, card_name: &str) -> Self {
        Card {
            id: CardId::new(id),
            bank_name: bank_name.to_string(),
            card_name: card_name.to_string(),
            is_active: true,
            general_notes: Vec::new(),
            cashback: RateTable::new(),
            notes: None,
            limits: None,
        }
    }

    pub fn with_rate(mut self, category: &str, rate: Rate) -> Self {
        self.cashback.insert(category.to_string(), rate);
        self
    }

    pub fn with_note(mut self, category: &str, note: &str) -> Self {
        self.notes
            .get_or_insert_with(BTreeMap::new)
            .insert(category.to_string(), note.to_string());
        self
    }

    pub fn with_limit(mut self, category: &str, limit: Decimal) -> Self {
        self.limits
            .get_or_insert_with(BTreeMap::new)
            .insert(category.to_string(), limit);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn rate(&self, category: &str) -> Option<Rate> {
        self.cashback.get(category).copied()
    }

    pub fn note(&self, category: &str) -> Option<&str> {
        self.notes.as_ref()?.get(category).map(String::as_str)
    }

    pub fn limit(&self, category: &str) -> Option<Decimal> {
        self.limits.as_ref()?.get(category).copied()
    }

    pub fn validate(&self) -> Result<(), CardError> {
        if self.id.0.trim().is_empty() {
            return Err(CardError::EmptyId);
        }
        validate_rewards(&self.cashback, self.limits.as_ref())
    }
}

/// A card as the bank advertises it, before the user adds it to a wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCard {
    pub bank_name: String,
    pub card_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub general_notes: Vec<String>,
    #[serde(default)]
    pub cashback: RateTable,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<BTreeMap<String, Decimal>>,
}

impl CatalogCard {
    pub fn new(bank_name: &str, card_name: &str) -> Self {
        CatalogCard {
            bank_name: bank_name.to_string(),
            card_name: card_name.to_string(),
            general_notes: Vec::new(),
            cashback: RateTable::new(),
            notes: None,
            limits: None,
        }
    }

    pub fn with_rate(mut self, category: &str, rate: Rate) -> Self {
        self.cashback.insert(category.to_string(), rate);
        self
    }

    pub fn validate(&self) -> Result<(), CardError> {
        validate_rewards(&self.cashback, self.limits.as_ref())
    }

    /// Turns the template into an owned, active card.
    pub fn issue(self, id: CardId) -> Card {
        Card {
            id,
            bank_name: self.bank_name,
            card_name: self.card_name,
            is_active: true,
            general_notes: self.general_notes,
            cashback: self.cashback,
            notes: self.notes,
            limits: self.limits,
        }
    }
}

fn validate_rewards(
    cashback: &RateTable,
    limits: Option<&BTreeMap<String, Decimal>>,
) -> Result<(), CardError> {
    if let Some((category, rate)) = cashback.iter().find(|(_, r)| **r < Decimal::ZERO) {
        return Err(CardError::NegativeRate {
            category: category.clone(),
            rate: *rate,
        });
    }
    if let Some((category, limit)) = limits
        .into_iter()
        .flatten()
        .find(|(_, l)| **l < Decimal::ZERO)
    {
        return Err(CardError::NegativeLimit {
            category: category.clone(),
            limit: *limit,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CardError {
    #[error("Card id must not be empty")]
    EmptyId,
    #[error("Negative cashback rate {rate} for category '{category}'")]
    NegativeRate { category: String, rate: Rate },
    #[error("Negative limit {limit} for category '{category}'")]
    NegativeLimit { category: String, limit: Decimal },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(s: &str) -> Rate {
        s.parse().unwrap()
    }

    #[test]
    fn new_card_is_active_and_empty() {
        let card = Card::new("c1", "Cathay", "CUBE");
        assert!(card.is_active);
        assert!(card.cashback.is_empty());
        assert!(card.notes.is_none());
        assert!(card.limits.is_none());
    }

    #[test]
    fn lookups_return_none_when_maps_missing() {
        let card = Card::new("c1", "Cathay", "CUBE").with_rate("dining", rate("3"));
        assert_eq!(card.rate("dining"), Some(rate("3")));
        assert_eq!(card.rate("travel"), None);
        assert_eq!(card.note("dining"), None);
        assert_eq!(card.limit("dining"), None);
    }

    #[test]
    fn note_and_limit_lookup() {
        let card = Card::new("c1", "Taishin", "Richart")
            .with_rate("dining", rate("3.3"))
            .with_note("dining", "requires plan switch")
            .with_limit("dining", rate("500"));
        assert_eq!(card.note("dining"), Some("requires plan switch"));
        assert_eq!(card.limit("dining"), Some(rate("500")));
    }

    #[test]
    fn validate_rejects_negative_rate() {
        let card = Card::new("c1", "Bank", "Card").with_rate("dining", rate("-1"));
        assert!(matches!(
            card.validate(),
            Err(CardError::NegativeRate { ref category, .. }) if category == "dining"
        ));
    }

    #[test]
    fn validate_rejects_negative_limit() {
        let card = Card::new("c1", "Bank", "Card").with_limit("dining", rate("-500"));
        assert!(matches!(card.validate(), Err(CardError::NegativeLimit { .. })));
    }

    #[test]
    fn validate_rejects_blank_id() {
        let card = Card::new("  ", "Bank", "Card");
        assert_eq!(card.validate(), Err(CardError::EmptyId));
    }

    #[test]
    fn validate_accepts_zero_rate() {
        let card = Card::new("c1", "Bank", "Card").with_rate("dining", Decimal::ZERO);
        assert!(card.validate().is_ok());
    }

    #[test]
    fn issue_keeps_rewards_and_activates() {
        let template = CatalogCard::new("E.SUN", "Unicard").with_rate("online_shopping", rate("4.5"));
        let card = template.issue(CardId::new("esun_1"));
        assert_eq!(card.id.as_str(), "esun_1");
        assert!(card.is_active);
        assert_eq!(card.rate("online_shopping"), Some(rate("4.5")));
    }

    #[test]
    fn deserializes_json_numbers_exactly() {
        let json = r#"{
            "id": "c1",
            "bank_name": "CTBC",
            "card_name": "LINE Pay",
            "cashback": { "dining": 3.3, "general": 1 }
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert!(card.is_active);
        assert_eq!(card.rate("dining"), Some(rate("3.3")));
        assert_eq!(card.rate("general"), Some(rate("1")));
    }
}
