use cardwise_core::{projected_reward, Card, CategoryMapping, FallbackKeys, Projection};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::ranker::{rank_cards, RankedCard};
use crate::resolver::{resolve_best_rate, RateMatch};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Fallback keys must not be blank")]
    BlankFallbackKey,
}

/// A ranked card together with the reward it would earn on one spend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectedCard<'a> {
    #[serde(flatten)]
    pub ranked: RankedCard<'a>,
    pub projection: Projection,
}

/// Owns the reference data the resolver needs and answers recommendation
/// requests against card snapshots handed in by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationEngine {
    #[serde(default)]
    pub mapping: CategoryMapping,
    #[serde(default)]
    pub fallback_keys: FallbackKeys,
}

impl RecommendationEngine {
    pub fn new(mapping: CategoryMapping, fallback_keys: FallbackKeys) -> Self {
        Self {
            mapping,
            fallback_keys,
        }
    }

    /// Reads a `[mapping]` table and an optional `fallback_keys` array.
    /// Either one left out keeps the bundled default.
    pub fn from_toml(toml_content: &str) -> Result<Self, EngineError> {
        let engine: RecommendationEngine = toml::from_str(toml_content)?;
        engine.validate()?;
        Ok(engine)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.fallback_keys.iter().any(|k| k.trim().is_empty()) {
            return Err(EngineError::BlankFallbackKey);
        }
        Ok(())
    }

    pub fn resolve(&self, card: &Card, merchant_category: &str) -> RateMatch {
        resolve_best_rate(card, merchant_category, &self.mapping, &self.fallback_keys)
    }

    pub fn rank<'a>(&self, cards: &'a [Card], merchant_category: &str) -> Vec<RankedCard<'a>> {
        rank_cards(cards, merchant_category, &self.mapping, &self.fallback_keys)
    }

    /// The flagged best card, if any card pays a positive rate.
    pub fn recommend<'a>(&self, cards: &'a [Card], merchant_category: &str) -> Option<RankedCard<'a>> {
        let top = self
            .rank(cards, merchant_category)
            .into_iter()
            .next()
            .filter(|r| r.is_recommended);

        match &top {
            Some(r) => info!(merchant_category, card = %r.card.id, rate = %r.cashback_rate, "recommended card"),
            None => info!(merchant_category, "no card earns a reward here"),
        }
        top
    }

    /// Ranking plus the projected reward of each card for `amount`, capped
    /// at the matched category's monthly limit.
    pub fn project<'a>(
        &self,
        cards: &'a [Card],
        merchant_category: &str,
        amount: Decimal,
    ) -> Vec<ProjectedCard<'a>> {
        self.rank(cards, merchant_category)
            .into_iter()
            .map(|ranked| {
                let projection = projected_reward(amount, ranked.cashback_rate, ranked.category_limit);
                ProjectedCard { ranked, projection }
            })
            .collect()
    }
}
