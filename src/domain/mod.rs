//! Exchange-agnostic advisory domain logic.

mod ids;
mod lot;
mod stats;

pub mod bargain;
pub mod crafting;

// Core domain types
pub use ids::{ItemId, RecipeId, Scope};
pub use lot::{
    normalize_auction, normalize_commodity, Lot, RawAuctionListing, RawCommodityListing,
    RawItemRef,
};
pub use stats::{Stats, StatsKey, StatsProvider};

// Bargain detection
pub use bargain::{
    detect_bargains, BargainConfig, Features, Recommendation, RecommendationKind,
};

// Crafting economics
pub use crafting::{
    analyze_recipes, PriceSource, Reagent, Recipe, RecipeAnalysis, RecipeCostEngine,
};
