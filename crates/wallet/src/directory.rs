use cardwise_core::{Merchant, MerchantCategory};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::WalletError;

/// Known merchants, searchable by name, address or description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MerchantDirectory {
    #[serde(default)]
    pub merchants: Vec<Merchant>,
}

impl MerchantDirectory {
    pub fn new(merchants: Vec<Merchant>) -> Self {
        Self { merchants }
    }

    /// Parses a `[[merchants]]` list. Ids must be unique.
    pub fn from_toml(toml_content: &str) -> Result<Self, WalletError> {
        let directory: MerchantDirectory = toml::from_str(toml_content)?;
        for (i, merchant) in directory.merchants.iter().enumerate() {
            if directory.merchants[..i].iter().any(|m| m.id == merchant.id) {
                return Err(WalletError::DuplicateMerchant(merchant.id.clone()));
            }
        }
        Ok(directory)
    }

    /// Case-insensitive match on name, address or description, optionally
    /// restricted to one category. An empty query matches everything.
    pub fn search(&self, query: &str, category: Option<MerchantCategory>) -> Vec<&Merchant> {
        self.merchants
            .iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .filter(|m| m.matches(query))
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&Merchant> {
        self.merchants.iter().find(|m| m.id == id)
    }

    /// The one merchant a user means by `query`: a case-insensitive exact
    /// name wins, otherwise the search must narrow to a single hit.
    pub fn resolve(&self, query: &str) -> Result<&Merchant, WalletError> {
        let wanted = query.trim().to_lowercase();
        if let Some(m) = self
            .merchants
            .iter()
            .find(|m| m.name.to_lowercase() == wanted)
        {
            return Ok(m);
        }

        let hits = self.search(query, None);
        debug!(query, hits = hits.len(), "merchant lookup");
        match hits.as_slice() {
            [] => Err(WalletError::MerchantNotFound(query.to_string())),
            [only] => Ok(*only),
            many => Err(WalletError::AmbiguousMerchant {
                query: query.to_string(),
                candidates: many.iter().map(|m| m.name.clone()).collect(),
            }),
        }
    }
}
