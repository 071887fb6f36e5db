//! Bargain detection over normalized auction snapshots.
//!
//! Scores lots against rolling historical statistics and produces
//! ranked, advisory-only buy recommendations. A lot must look cheap
//! against both the 7-day and 30-day medians, or sit far below the
//! robust (MAD-based) band, and clear a liquidity gate before it is
//! scored at all.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ItemId, Lot, Scope, Stats, StatsProvider};

/// Robust z-score scale factor for MAD (consistency constant for a
/// normal distribution).
const MAD_SCALE: Decimal = dec!(1.4826);

/// Substituted for a zero MAD so the z-score denominator never
/// vanishes.
const MAD_EPSILON: Decimal = dec!(0.000001);

/// z-score below which a lot is treated as a strong anomaly and its
/// score is floored at [`ANOMALY_SCORE_FLOOR`].
const ANOMALY_BOOST_Z: Decimal = dec!(-2.0);
const ANOMALY_SCORE_FLOOR: Decimal = dec!(0.7);

/// Configuration for the bargain detector.
#[derive(Debug, Clone, Deserialize)]
pub struct BargainConfig {
    /// A candidate must cost at most this fraction of the 30-day median.
    #[serde(default = "default_discount_p50_30d")]
    pub discount_p50_30d: Decimal,

    /// A candidate must cost at most this fraction of the 7-day median.
    #[serde(default = "default_discount_p50_7d")]
    pub discount_p50_7d: Decimal,

    /// Robust z-score at or below which a lot counts as an anomaly.
    #[serde(default = "default_z_threshold")]
    pub z_threshold: Decimal,

    /// Minimum 7-day volume for commodity lots.
    #[serde(default = "default_min_vol_commodity")]
    pub min_vol_commodity: Decimal,

    /// Minimum 7-day volume for non-commodity lots.
    #[serde(default = "default_min_vol_noncommodity")]
    pub min_vol_noncommodity: Decimal,

    /// Minimum bargain score to emit a recommendation.
    #[serde(default = "default_bargain_score_min")]
    pub bargain_score_min: Decimal,

    /// Fraction of available capital a single recommendation may tie up.
    #[serde(default = "default_max_alloc_fraction")]
    pub max_alloc_fraction: Decimal,

    /// Hard cap on the suggested unit count.
    #[serde(default = "default_max_units_cap")]
    pub max_units_cap: u32,

    /// Fallback ETA in hours for slow-rotating items.
    #[serde(default = "default_eta_h")]
    pub eta_h_default: u32,
}

fn default_discount_p50_30d() -> Decimal {
    dec!(0.75)
}

fn default_discount_p50_7d() -> Decimal {
    dec!(0.85)
}

fn default_z_threshold() -> Decimal {
    dec!(-1.5)
}

fn default_min_vol_commodity() -> Decimal {
    dec!(200)
}

fn default_min_vol_noncommodity() -> Decimal {
    dec!(40)
}

fn default_bargain_score_min() -> Decimal {
    dec!(0.6)
}

fn default_max_alloc_fraction() -> Decimal {
    dec!(0.12)
}

fn default_max_units_cap() -> u32 {
    200
}

fn default_eta_h() -> u32 {
    72
}

impl Default for BargainConfig {
    fn default() -> Self {
        Self {
            discount_p50_30d: default_discount_p50_30d(),
            discount_p50_7d: default_discount_p50_7d(),
            z_threshold: default_z_threshold(),
            min_vol_commodity: default_min_vol_commodity(),
            min_vol_noncommodity: default_min_vol_noncommodity(),
            bargain_score_min: default_bargain_score_min(),
            max_alloc_fraction: default_max_alloc_fraction(),
            max_units_cap: default_max_units_cap(),
            eta_h_default: default_eta_h(),
        }
    }
}

/// Kind of recommendation emitted by the engine.
///
/// Only advisory kinds exist; there is deliberately no variant that
/// could describe an automated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationKind {
    #[serde(rename = "RECOMMEND_BUY")]
    RecommendBuy,
}

impl RecommendationKind {
    /// DSL action name for this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RecommendBuy => "RECOMMEND_BUY",
        }
    }
}

/// One ranked buy recommendation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub item_id: ItemId,
    pub scope: Scope,
    pub is_commodity: bool,
    pub price_u: Decimal,
    pub p50_7d: Decimal,
    pub p50_30d: Decimal,
    /// Robust z-score, rounded to 2 decimals.
    pub zscore_7d: Decimal,
    pub vol_7d: Decimal,
    pub rot: Decimal,
    /// Heuristic bargain score in [0, 1], rounded to 3 decimals.
    pub bargain_score: Decimal,
    pub kind: RecommendationKind,
    pub qty_suggested: u32,
    pub target_sell: Decimal,
    pub eta_h: u32,
    pub reason: String,
}

/// Scoring features derived from a lot and its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    /// Price relative to the 7-day median.
    pub rel_7d: Decimal,
    /// Price relative to the 30-day median.
    pub rel_30d: Decimal,
    /// Robust z-score against the 7-day band.
    pub zscore_7d: Decimal,
    pub vol_7d: Decimal,
    pub rot: Decimal,
}

/// Robust z-score of a unit price against the 7-day median and MAD.
///
/// A zero MAD is epsilon-substituted, so this never divides by zero.
pub fn zscore(price_u: Decimal, p50_7d: Decimal, mad_7d: Decimal) -> Decimal {
    let denom = MAD_SCALE * mad_7d.max(MAD_EPSILON);
    (price_u - p50_7d) / denom
}

/// Build scoring features for one lot.
pub fn build_features(price_u: Decimal, stats: &Stats) -> Features {
    Features {
        rel_7d: price_u / stats.p50_7d.max(MAD_EPSILON),
        rel_30d: price_u / stats.p50_30d.max(MAD_EPSILON),
        zscore_7d: zscore(price_u, stats.p50_7d, stats.mad_7d),
        vol_7d: stats.vol_7d,
        rot: stats.rot,
    }
}

/// Rule-based bargain score, clamped to [0, 1].
///
/// Discount depth against the 7-day median dominates, the 30-day
/// median confirms, rotation contributes a small liquidity bonus.
pub fn rule_score(features: &Features) -> Decimal {
    let zero = Decimal::ZERO;
    let one = Decimal::ONE;

    let base = (one - features.rel_7d).max(zero) * dec!(0.5)
        + (one - features.rel_30d).max(zero) * dec!(0.35)
        + features.rot.min(one) * dec!(0.15);

    base.clamp(zero, one)
}

/// Advisory resale target for a scored lot.
///
/// When a positive 72-hour price prediction is supplied the target is
/// capped just below it; otherwise the lot is targeted just under the
/// 7-day median.
pub fn compute_target(stats: &Stats, pred_72h: Option<Decimal>) -> Decimal {
    match pred_72h {
        Some(pred) if pred > Decimal::ZERO => {
            (pred * dec!(0.99)).min(stats.p50_7d * dec!(1.01))
        }
        _ => stats.p50_7d * dec!(0.99),
    }
}

/// Coarse time-to-sell estimate in hours, driven by rotation.
pub fn estimate_eta(stats: &Stats, default_eta_h: u32) -> u32 {
    if stats.rot >= Decimal::ONE {
        36
    } else if stats.rot >= dec!(0.6) {
        48
    } else {
        default_eta_h
    }
}

/// Scan a snapshot of lots and produce ranked buy recommendations.
///
/// Lots with no usable price, no statistics, failed liquidity or a
/// sub-threshold score are silently filtered; that is normal operation,
/// not an error. The result is sorted by descending bargain score and
/// is deterministic for identical inputs (the sort is stable, ties keep
/// snapshot order).
pub fn detect_bargains<S: StatsProvider>(
    lots: &[Lot],
    history: &S,
    capital: Decimal,
    cfg: &BargainConfig,
) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    for lot in lots {
        let Some(price_u) = lot.price_u else {
            continue;
        };
        let Some(stats) = history.stats(&lot.scope, lot.item_id, lot.quality) else {
            continue;
        };

        let discount_flag = price_u <= cfg.discount_p50_30d * stats.p50_30d
            && price_u <= cfg.discount_p50_7d * stats.p50_7d;
        let z = zscore(price_u, stats.p50_7d, stats.mad_7d);
        let anomaly_flag = z <= cfg.z_threshold;
        let candidate = discount_flag || anomaly_flag;

        let liquidity_ok = if lot.is_commodity {
            stats.vol_7d >= cfg.min_vol_commodity
        } else {
            stats.vol_7d >= cfg.min_vol_noncommodity
        };

        if !(candidate && liquidity_ok) {
            continue;
        }

        let features = build_features(price_u, &stats);
        let mut score = rule_score(&features);
        if features.zscore_7d <= ANOMALY_BOOST_Z {
            score = score.max(ANOMALY_SCORE_FLOOR);
        }
        if score < cfg.bargain_score_min {
            continue;
        }

        // Suggested quantity is advisory-only: capital slice over unit
        // price, hard-capped. The cap is applied in Decimal space so a
        // raw quantity beyond u32::MAX saturates at the cap instead of
        // failing the conversion.
        let qty = (capital * cfg.max_alloc_fraction / price_u.max(Decimal::ONE))
            .floor()
            .min(Decimal::from(cfg.max_units_cap))
            .to_u32()
            .unwrap_or(0);
        if qty == 0 {
            continue;
        }

        let target_sell = compute_target(&stats, None);
        let eta_h = estimate_eta(&stats, cfg.eta_h_default);
        let z_rounded = z.round_dp(2);
        let reason = format!(
            "discount/anomaly; z={z_rounded}, vol_7d={}, rot={}",
            stats.vol_7d, stats.rot
        );

        debug!(
            item_id = %lot.item_id,
            scope = %lot.scope,
            score = %score,
            "bargain candidate accepted"
        );

        recs.push(Recommendation {
            item_id: lot.item_id,
            scope: lot.scope.clone(),
            is_commodity: lot.is_commodity,
            price_u,
            p50_7d: stats.p50_7d,
            p50_30d: stats.p50_30d,
            zscore_7d: z_rounded,
            vol_7d: stats.vol_7d,
            rot: stats.rot,
            bargain_score: score.round_dp(3),
            kind: RecommendationKind::RecommendBuy,
            qty_suggested: qty,
            target_sell,
            eta_h,
            reason,
        });
    }

    recs.sort_by(|a, b| b.bargain_score.cmp(&a.bargain_score));
    recs
}
