use cardwise_core::{Card, CategoryMapping, FallbackKeys, Rate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a card's rate was found for a merchant category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Exact,
    Mapped,
    General,
    None,
}

impl MatchType {
    /// Tie-break weight when two cards pay the same rate.
    pub fn priority(self) -> u8 {
        match self {
            MatchType::Exact => 3,
            MatchType::Mapped => 2,
            MatchType::General => 1,
            MatchType::None => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Mapped => "mapped",
            MatchType::General => "general",
            MatchType::None => "none",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateMatch {
    pub rate: Rate,
    pub matched_category: String,
    pub match_type: MatchType,
}

impl RateMatch {
    fn new(rate: Rate, category: &str, match_type: MatchType) -> Self {
        RateMatch {
            rate,
            matched_category: category.to_string(),
            match_type,
        }
    }

    pub fn none() -> Self {
        RateMatch {
            rate: Decimal::ZERO,
            matched_category: String::new(),
            match_type: MatchType::None,
        }
    }
}

/// Best rate a card pays at a merchant category.
///
/// Rules in priority order, first hit wins:
/// 1. the card defines the merchant category itself (any rate, zero included);
/// 2. the highest rate among the mapped candidates, if it is positive;
/// 3. the first fallback key the card defines;
/// 4. nothing.
///
/// A mapped candidate that pays zero is kept as the answer only when no
/// fallback key applies.
pub fn resolve_best_rate(
    card: &Card,
    merchant_category: &str,
    mapping: &CategoryMapping,
    fallback: &FallbackKeys,
) -> RateMatch {
    if let Some(rate) = card.rate(merchant_category) {
        return RateMatch::new(rate, merchant_category, MatchType::Exact);
    }

    // Every candidate is checked; the list order only breaks ties.
    let mut best: Option<(&str, Rate)> = None;
    for candidate in mapping.candidates(merchant_category) {
        if let Some(rate) = card.rate(candidate) {
            if best.map_or(true, |(_, top)| rate > top) {
                best = Some((candidate.as_str(), rate));
            }
        }
    }

    if let Some((category, rate)) = best {
        if rate > Decimal::ZERO {
            return RateMatch::new(rate, category, MatchType::Mapped);
        }
    }

    if let Some((key, rate)) = fallback
        .iter()
        .find_map(|key| card.rate(key).map(|rate| (key, rate)))
    {
        return RateMatch::new(rate, key, MatchType::General);
    }

    match best {
        Some((category, rate)) => RateMatch::new(rate, category, MatchType::Mapped),
        None => RateMatch::none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn card(rates: &[(&str, &str)]) -> Card {
        rates
            .iter()
            .fold(Card::new("c1", "Bank", "Card"), |c, (k, r)| c.with_rate(k, d(r)))
    }

    fn mapping(entries: &[(&str, &[&str])]) -> CategoryMapping {
        let table: BTreeMap<String, Vec<String>> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
            .collect();
        CategoryMapping::new(table)
    }

    #[test]
    fn exact_match_beats_higher_mapped_rate() {
        let c = card(&[("coffee", "1"), ("dining", "10"), ("general", "5")]);
        let m = resolve_best_rate(&c, "coffee", &CategoryMapping::default(), &FallbackKeys::default());
        assert_eq!(m.rate, d("1"));
        assert_eq!(m.matched_category, "coffee");
        assert_eq!(m.match_type, MatchType::Exact);
    }

    #[test]
    fn exact_zero_rate_is_still_exact() {
        let c = card(&[("coffee", "0"), ("general", "5")]);
        let m = resolve_best_rate(&c, "coffee", &CategoryMapping::default(), &FallbackKeys::default());
        assert_eq!(m.rate, Decimal::ZERO);
        assert_eq!(m.match_type, MatchType::Exact);
    }

    #[test]
    fn mapped_takes_maximum_not_first() {
        let c = card(&[("dining", "2"), ("general", "5")]);
        let map = mapping(&[("coffee", &["dining", "general"])]);
        let m = resolve_best_rate(&c, "coffee", &map, &FallbackKeys::default());
        assert_eq!(m.rate, d("5"));
        assert_eq!(m.matched_category, "general");
        assert_eq!(m.match_type, MatchType::Mapped);
    }

    #[test]
    fn mapped_tie_keeps_earlier_candidate() {
        let c = card(&[("shopping", "3"), ("online_shopping", "3")]);
        let map = mapping(&[("mall", &["shopping", "online_shopping"])]);
        let m = resolve_best_rate(&c, "mall", &map, &FallbackKeys::default());
        assert_eq!(m.matched_category, "shopping");
    }

    #[test]
    fn falls_back_to_general_keys_in_order() {
        let c = card(&[("domestic_general", "0.5"), ("other", "2")]);
        let m = resolve_best_rate(&c, "night_market", &CategoryMapping::default(), &FallbackKeys::default());
        assert_eq!(m.rate, d("0.5"));
        assert_eq!(m.matched_category, "domestic_general");
        assert_eq!(m.match_type, MatchType::General);
    }

    #[test]
    fn zero_mapped_rate_falls_through_to_general() {
        let c = card(&[("weekend", "0"), ("other", "1")]);
        let map = mapping(&[("night_market", &["weekend"])]);
        let m = resolve_best_rate(&c, "night_market", &map, &FallbackKeys::default());
        assert_eq!(m.rate, d("1"));
        assert_eq!(m.match_type, MatchType::General);
    }

    #[test]
    fn zero_mapped_rate_kept_when_no_fallback_applies() {
        let c = card(&[("weekend", "0")]);
        let map = mapping(&[("night_market", &["weekend"])]);
        let m = resolve_best_rate(&c, "night_market", &map, &FallbackKeys::default());
        assert_eq!(m.rate, Decimal::ZERO);
        assert_eq!(m.matched_category, "weekend");
        assert_eq!(m.match_type, MatchType::Mapped);
    }

    #[test]
    fn unknown_merchant_category_goes_straight_to_fallback() {
        let c = card(&[("dining", "3"), ("general", "1")]);
        let m = resolve_best_rate(&c, "casino", &CategoryMapping::default(), &FallbackKeys::default());
        assert_eq!(m.rate, d("1"));
        assert_eq!(m.match_type, MatchType::General);
    }

    #[test]
    fn empty_cashback_is_no_match() {
        let c = card(&[]);
        let m = resolve_best_rate(&c, "coffee", &CategoryMapping::default(), &FallbackKeys::default());
        assert_eq!(m, RateMatch::none());
        assert_eq!(m.matched_category, "");
    }

    #[test]
    fn custom_fallback_order_is_respected() {
        let c = card(&[("general", "1"), ("other", "2")]);
        let fallback = FallbackKeys::new(vec!["other".to_string(), "general".to_string()]);
        let m = resolve_best_rate(&c, "casino", &CategoryMapping::empty(), &fallback);
        assert_eq!(m.matched_category, "other");
    }

    #[test]
    fn match_type_priority_order() {
        assert!(MatchType::Exact.priority() > MatchType::Mapped.priority());
        assert!(MatchType::Mapped.priority() > MatchType::General.priority());
        assert!(MatchType::General.priority() > MatchType::None.priority());
    }
}
