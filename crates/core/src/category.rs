use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// The merchant categories the app knows how to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MerchantCategory {
    #[serde(alias = "咖啡廳")]
    Coffee,
    #[serde(alias = "餐廳")]
    Restaurant,
    #[serde(alias = "超商")]
    Convenience,
    #[serde(alias = "速食")]
    FastFood,
    #[serde(alias = "購物")]
    Shopping,
    #[serde(alias = "夜市")]
    NightMarket,
    #[serde(alias = "其他")]
    Other,
}

impl MerchantCategory {
    pub const ALL: [MerchantCategory; 7] = [
        MerchantCategory::Coffee,
        MerchantCategory::Restaurant,
        MerchantCategory::Convenience,
        MerchantCategory::FastFood,
        MerchantCategory::Shopping,
        MerchantCategory::NightMarket,
        MerchantCategory::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MerchantCategory::Coffee => "coffee",
            MerchantCategory::Restaurant => "restaurant",
            MerchantCategory::Convenience => "convenience",
            MerchantCategory::FastFood => "fast_food",
            MerchantCategory::Shopping => "shopping",
            MerchantCategory::NightMarket => "night_market",
            MerchantCategory::Other => "other",
        }
    }

    /// Display label used by the merchant data (`咖啡廳`, `夜市`, ...).
    pub fn label(self) -> &'static str {
        match self {
            MerchantCategory::Coffee => "咖啡廳",
            MerchantCategory::Restaurant => "餐廳",
            MerchantCategory::Convenience => "超商",
            MerchantCategory::FastFood => "速食",
            MerchantCategory::Shopping => "購物",
            MerchantCategory::NightMarket => "夜市",
            MerchantCategory::Other => "其他",
        }
    }
}

impl fmt::Display for MerchantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MerchantCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let key = trimmed.to_lowercase().replace(['-', ' '], "_");
        MerchantCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == key || c.label() == trimmed)
            .ok_or_else(|| format!("Unknown merchant category: '{s}'"))
    }
}

#[derive(Error, Debug)]
pub enum CategoryError {
    #[error("Failed to parse category mapping: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bundled snapshot of merchant category → card categories to try,
/// most specific first.
pub const DEFAULT_CATEGORY_MAPPING: &[(&str, &[&str])] = &[
    ("coffee", &["dining", "general"]),
    ("restaurant", &["dining", "general"]),
    ("convenience", &["convenience", "general"]),
    ("fast_food", &["dining", "general"]),
    (
        "shopping",
        &["shopping", "department_store", "online_shopping", "general"],
    ),
    ("night_market", &["weekend", "general"]),
    ("other", &["general"]),
];

/// Generic keys tried when no mapped category pays anything: general
/// spending, then domestic general, then the catch-all.
pub const DEFAULT_FALLBACK_KEYS: &[&str] = &["general", "domestic_general", "other"];

/// Lookup table from a merchant category to the card categories that may
/// apply to it. Reference data; different snapshots disagree, so it is
/// always supplied from outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMapping(BTreeMap<String, Vec<String>>);

impl CategoryMapping {
    pub fn new(table: BTreeMap<String, Vec<String>>) -> Self {
        CategoryMapping(table)
    }

    pub fn empty() -> Self {
        CategoryMapping(BTreeMap::new())
    }

    pub fn from_toml(toml_content: &str) -> Result<Self, CategoryError> {
        Ok(toml::from_str(toml_content)?)
    }

    /// Candidate card categories for a merchant category. Unknown keys
    /// yield an empty slice.
    pub fn candidates(&self, merchant_category: &str) -> &[String] {
        self.0
            .get(merchant_category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn insert(&mut self, merchant_category: &str, candidates: Vec<String>) {
        self.0.insert(merchant_category.to_string(), candidates);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for CategoryMapping {
    fn default() -> Self {
        CategoryMapping(
            DEFAULT_CATEGORY_MAPPING
                .iter()
                .map(|(merchant, candidates)| {
                    (
                        merchant.to_string(),
                        candidates.iter().map(|c| c.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FallbackKeys(Vec<String>);

impl FallbackKeys {
    pub fn new(keys: Vec<String>) -> Self {
        FallbackKeys(keys)
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for FallbackKeys {
    fn default() -> Self {
        FallbackKeys(DEFAULT_FALLBACK_KEYS.iter().map(|k| k.to_string()).collect())
    }
}
