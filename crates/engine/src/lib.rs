pub mod engine;
pub mod ranker;
pub mod resolver;
pub mod summary;

pub use engine::{EngineError, ProjectedCard, RecommendationEngine};
pub use ranker::{rank_cards, RankedCard};
pub use resolver::{resolve_best_rate, MatchType, RateMatch};
pub use summary::{summarize, summarize_top_categories};

/// Free functions over the bundled reference data, for callers that do not
/// carry their own mapping table.
pub mod recommend {
    use crate::*;
    use cardwise_core::{calculate_cashback_amount, Card, Decimal};

    pub fn rank_with_defaults<'a>(cards: &'a [Card], merchant_category: &str) -> Vec<RankedCard<'a>> {
        RecommendationEngine::default().rank(cards, merchant_category)
    }

    pub fn cashback_for(card: &Card, merchant_category: &str, amount: Decimal) -> i64 {
        let m = RecommendationEngine::default().resolve(card, merchant_category);
        calculate_cashback_amount(amount, m.rate)
    }
}
