//! Bazaarlord - advisory decision core for virtual auction houses.
//!
//! This crate scores bargain opportunities over normalized market
//! snapshots, values multi-step crafting recipes, and parses a small
//! advisory-rule DSL whose action vocabulary is enforced by a
//! compliance guardrail. Every output is strictly advisory: no
//! component can emit an instruction that would automate an in-game
//! transaction.
//!
//! # Architecture
//!
//! Four coupled pieces make up the core:
//!
//! - **`domain::bargain`** - Bargain scoring over lots and rolling
//!   historical statistics, producing ranked buy recommendations.
//! - **`domain::crafting`** - Memoized, depth-capped recursive
//!   cost/profit/margin analysis of recipe graphs.
//! - **`dsl`** - Line-oriented rule parser and advisory validator.
//! - **`compliance`** - Closed allowed/prohibited action vocabularies,
//!   text sanitization and prohibited-token detection.
//!
//! The scorer and the crafting engine do not depend on the DSL; the
//! DSL's validator depends on the compliance vocabulary. All four are
//! pure, synchronous computations over already-materialized inputs -
//! fetching, caching, persistence and presentation live outside this
//! crate behind the [`domain::StatsProvider`] and
//! [`domain::PriceSource`] seams.
//!
//! # Modules
//!
//! - [`config`] - Configuration loading from TOML files
//! - [`domain`] - Lots, statistics, recommendations, recipes
//! - [`dsl`] - Rule parsing and validation
//! - [`compliance`] - Advisory-only guardrail
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use bazaarlord::domain::{
//!     detect_bargains, BargainConfig, ItemId, Lot, Scope, Stats, StatsKey,
//! };
//! use rust_decimal_macros::dec;
//!
//! let lot = Lot {
//!     item_id: ItemId::new(1),
//!     quantity: 10,
//!     scope: Scope::region("eu"),
//!     is_commodity: true,
//!     price_u: Some(dec!(70)),
//!     time_left: None,
//!     quality: None,
//! };
//! let mut history: HashMap<StatsKey, Stats> = HashMap::new();
//! history.insert(
//!     (Scope::region("eu"), ItemId::new(1), None),
//!     Stats {
//!         p50_7d: dec!(100),
//!         p50_30d: dec!(120),
//!         mad_7d: dec!(10),
//!         vol_7d: dec!(500),
//!         rot: dec!(0.8),
//!     },
//! );
//!
//! let recs = detect_bargains(&[lot], &history, dec!(10000), &BargainConfig::default());
//! assert_eq!(recs.len(), 1);
//! assert_eq!(recs[0].kind.as_str(), "RECOMMEND_BUY");
//! ```

pub mod compliance;
pub mod config;
pub mod domain;
pub mod dsl;
pub mod error;

pub use error::{Error, Result};
