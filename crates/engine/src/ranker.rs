use cardwise_core::{Card, CategoryMapping, FallbackKeys, Rate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::resolver::{resolve_best_rate, MatchType};

/// A card decorated with its resolved rate for one merchant category.
/// Recomputed on every request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCard<'a> {
    pub card: &'a Card,
    pub cashback_rate: Rate,
    pub matched_category: String,
    pub match_type: MatchType,
    pub is_recommended: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_note: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_limit: Option<Decimal>,
}

/// Ranks the active cards for a merchant category, best first.
///
/// Sorted by rate, then by match quality; the sort is stable so input order
/// decides any remaining tie. Only the top card is flagged as recommended,
/// and only when it actually pays something.
pub fn rank_cards<'a>(
    cards: &'a [Card],
    merchant_category: &str,
    mapping: &CategoryMapping,
    fallback: &FallbackKeys,
) -> Vec<RankedCard<'a>> {
    let mut ranked: Vec<RankedCard<'a>> = cards
        .iter()
        .filter(|card| card.is_active)
        .map(|card| {
            let m = resolve_best_rate(card, merchant_category, mapping, fallback);
            debug!(
                card = %card.id,
                rate = %m.rate,
                matched = %m.matched_category,
                match_type = %m.match_type,
                "resolved cashback rate"
            );
            let (category_note, category_limit) = match m.match_type {
                MatchType::None => (None, None),
                _ => (card.note(&m.matched_category), card.limit(&m.matched_category)),
            };
            RankedCard {
                card,
                cashback_rate: m.rate,
                matched_category: m.matched_category,
                match_type: m.match_type,
                is_recommended: false,
                category_note,
                category_limit,
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.cashback_rate
            .cmp(&a.cashback_rate)
            .then_with(|| b.match_type.priority().cmp(&a.match_type.priority()))
    });

    if let Some(top) = ranked.first_mut() {
        if top.cashback_rate > Decimal::ZERO {
            top.is_recommended = true;
        }
    }

    debug!(
        merchant_category,
        active = ranked.len(),
        total = cards.len(),
        "ranked cards"
    );

    ranked
}
