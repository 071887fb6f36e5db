//! Rolling historical price statistics and the provider seam.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ItemId, Scope};

/// Rolling historical statistics for a (scope, item, quality) key.
///
/// All fields are non-negative. `mad_7d` may legitimately be zero for
/// thin or pegged markets; the scorer substitutes an epsilon before
/// dividing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// 7-day rolling median price.
    pub p50_7d: Decimal,
    /// 30-day rolling median price.
    pub p50_30d: Decimal,
    /// 7-day median absolute deviation of the price.
    pub mad_7d: Decimal,
    /// 7-day traded volume.
    pub vol_7d: Decimal,
    /// Rotation (turnover) rate; >= 1.0 means the median listing
    /// sells within a day.
    pub rot: Decimal,
}

/// Lookup key for historical statistics.
pub type StatsKey = (Scope, ItemId, Option<u8>);

/// Source of historical statistics.
///
/// The engine never fetches or stores history itself; callers supply a
/// provider backed by whatever store they maintain. A missing entry is
/// normal (new or delisted items) and simply excludes the lot from
/// scoring.
pub trait StatsProvider {
    /// Return statistics for the given key, if any exist.
    fn stats(&self, scope: &Scope, item_id: ItemId, quality: Option<u8>) -> Option<Stats>;
}

impl StatsProvider for HashMap<StatsKey, Stats> {
    fn stats(&self, scope: &Scope, item_id: ItemId, quality: Option<u8>) -> Option<Stats> {
        self.get(&(scope.clone(), item_id, quality)).cloned()
    }
}
