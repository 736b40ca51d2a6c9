use cardwise_core::{Rate, RateTable};

pub const SUMMARY_SEPARATOR: &str = " • ";

/// Display line with a card's three best categories.
pub fn summarize(cashback: &RateTable) -> String {
    summarize_top_categories(cashback, 3)
}

/// Top `n` categories by rate as `"<category> <rate>%"`, joined for display.
/// Equal rates keep the order the card lists them in.
pub fn summarize_top_categories(cashback: &RateTable, n: usize) -> String {
    if cashback.is_empty() {
        return "no cashback info".to_string();
    }

    let mut entries: Vec<(&String, &Rate)> = cashback.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1));

    entries
        .into_iter()
        .take(n)
        .map(|(category, rate)| format!("{} {}%", display_category(category), rate.normalize()))
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR)
}

// Catalog keys sometimes carry an inline `// remark`.
fn display_category(key: &str) -> &str {
    key.split_once("//").map_or(key, |(head, _)| head).trim()
}
