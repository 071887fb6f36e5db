//! Normalized market lots and raw-snapshot normalization.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{ItemId, Scope};

/// One normalized market listing.
///
/// Either a fungible commodity stack (region-scoped) or a unique
/// non-commodity item (realm-scoped). Lots are built per analysis call
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    pub item_id: ItemId,
    pub quantity: u32,
    pub scope: Scope,
    pub is_commodity: bool,
    /// Normalized per-unit price. Must be positive to be scored; lots
    /// without one are skipped.
    pub price_u: Option<Decimal>,
    pub time_left: Option<String>,
    pub quality: Option<u8>,
}

/// Item reference as it appears in raw auction snapshots.
#[derive(Debug, Clone, Deserialize)]
pub struct RawItemRef {
    pub id: u32,
}

/// Raw region-wide commodity listing straight from a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCommodityListing {
    pub item: RawItemRef,
    #[serde(default)]
    pub quantity: u32,
    pub unit_price: Option<Decimal>,
}

/// Raw connected-realm auction listing straight from a snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuctionListing {
    pub item: RawItemRef,
    #[serde(default)]
    pub quantity: u32,
    pub buyout: Option<Decimal>,
    pub time_left: Option<String>,
}

/// Normalize a raw commodity listing into a region-scoped [`Lot`].
pub fn normalize_commodity(region: &str, raw: &RawCommodityListing) -> Lot {
    Lot {
        item_id: ItemId::new(raw.item.id),
        quantity: raw.quantity,
        scope: Scope::region(region),
        is_commodity: true,
        price_u: raw.unit_price,
        time_left: None,
        quality: None,
    }
}

/// Normalize a raw realm auction into a [`Lot`].
///
/// Returns `None` when the listing has no buyout (bid-only auctions
/// carry no usable unit price). Quantity is clamped to at least one so
/// the per-unit division is always defined.
pub fn normalize_auction(realm_id: u64, raw: &RawAuctionListing) -> Option<Lot> {
    let quantity = raw.quantity.max(1);
    let buyout = raw.buyout?;
    Some(Lot {
        item_id: ItemId::new(raw.item.id),
        quantity,
        scope: Scope::realm(realm_id),
        is_commodity: false,
        price_u: Some(buyout / Decimal::from(quantity)),
        time_left: raw.time_left.clone(),
        quality: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn normalize_commodity_keeps_unit_price() {
        let raw: RawCommodityListing =
            serde_json::from_str(r#"{"item":{"id":190396},"quantity":40,"unit_price":12.5}"#)
                .unwrap();
        let lot = normalize_commodity("eu", &raw);

        assert_eq!(lot.item_id, ItemId::new(190396));
        assert_eq!(lot.quantity, 40);
        assert_eq!(lot.scope, Scope::region("eu"));
        assert!(lot.is_commodity);
        assert_eq!(lot.price_u, Some(dec!(12.5)));
    }

    #[test]
    fn normalize_commodity_without_price() {
        let raw: RawCommodityListing =
            serde_json::from_str(r#"{"item":{"id":5},"quantity":1}"#).unwrap();
        let lot = normalize_commodity("us", &raw);
        assert_eq!(lot.price_u, None);
    }

    #[test]
    fn normalize_auction_divides_buyout_by_quantity() {
        let raw: RawAuctionListing = serde_json::from_str(
            r#"{"item":{"id":19019},"quantity":4,"buyout":100,"time_left":"LONG"}"#,
        )
        .unwrap();
        let lot = normalize_auction(1403, &raw).unwrap();

        assert_eq!(lot.scope, Scope::realm(1403));
        assert!(!lot.is_commodity);
        assert_eq!(lot.price_u, Some(dec!(25)));
        assert_eq!(lot.time_left.as_deref(), Some("LONG"));
    }

    #[test]
    fn normalize_auction_without_buyout_is_dropped() {
        let raw: RawAuctionListing =
            serde_json::from_str(r#"{"item":{"id":19019},"quantity":1}"#).unwrap();
        assert!(normalize_auction(1403, &raw).is_none());
    }

    #[test]
    fn normalize_auction_clamps_zero_quantity() {
        let raw: RawAuctionListing =
            serde_json::from_str(r#"{"item":{"id":7},"quantity":0,"buyout":9}"#).unwrap();
        let lot = normalize_auction(1, &raw).unwrap();
        assert_eq!(lot.quantity, 1);
        assert_eq!(lot.price_u, Some(dec!(9)));
    }
}
