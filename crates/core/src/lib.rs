pub mod card;
pub mod category;
pub mod merchant;
pub mod reward;

pub use card::{Card, CardError, CardId, CatalogCard, Rate, RateTable};
pub use category::{
    CategoryError, CategoryMapping, FallbackKeys, MerchantCategory, DEFAULT_CATEGORY_MAPPING,
    DEFAULT_FALLBACK_KEYS,
};
pub use merchant::Merchant;
pub use reward::{calculate_cashback_amount, format_rate, projected_reward, Projection};
pub use rust_decimal::Decimal;
