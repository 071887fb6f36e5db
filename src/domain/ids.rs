//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Item identifier - newtype for type safety.
///
/// Wraps the numeric item id used by auction snapshots, price sources
/// and recipe reagent lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Create a new ItemId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ItemId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Recipe identifier - newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(u32);

impl RecipeId {
    /// Create a new RecipeId.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric id.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for RecipeId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// Market scope of a lot.
///
/// Commodity stacks are listed region-wide, unique items are listed per
/// connected realm. Historical statistics are keyed by scope, so the two
/// never mix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Region-wide commodity market (e.g. "eu", "us").
    Region(String),
    /// Connected-realm market for non-commodity items.
    Realm(u64),
}

impl Scope {
    /// Create a region scope.
    pub fn region(name: impl Into<String>) -> Self {
        Self::Region(name.into())
    }

    /// Create a connected-realm scope.
    pub const fn realm(id: u64) -> Self {
        Self::Realm(id)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Region(name) => write!(f, "{name}"),
            Self::Realm(id) => write!(f, "{id}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_new_and_value() {
        let id = ItemId::new(19019);
        assert_eq!(id.value(), 19019);
    }

    #[test]
    fn item_id_display() {
        assert_eq!(format!("{}", ItemId::new(42)), "42");
    }

    #[test]
    fn recipe_id_from_u32() {
        let id = RecipeId::from(7);
        assert_eq!(id.value(), 7);
    }

    #[test]
    fn scope_display() {
        assert_eq!(format!("{}", Scope::region("eu")), "eu");
        assert_eq!(format!("{}", Scope::realm(1403)), "1403");
    }

    #[test]
    fn scope_equality_distinguishes_variants() {
        assert_ne!(Scope::region("1403"), Scope::realm(1403));
    }
}
