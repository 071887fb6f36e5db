//! Recursive crafting-cost analysis.
//!
//! Values each recipe against a caller-supplied price source, expanding
//! one level of sub-recipe substitution and degrading gracefully when a
//! reagent cannot be priced.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{ItemId, RecipeId};

/// Cost markup applied to reagents flagged as scarce.
const SCARCITY_MARKUP: Decimal = dec!(1.10);

/// Sub-recipe expansion stops past this depth; deeper dependencies are
/// priced directly like any other reagent.
const MAX_SUB_RECIPE_DEPTH: u8 = 1;

/// One reagent line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reagent {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// A craftable item definition.
///
/// Reagent item ids may reference other recipes' products, forming a
/// dependency graph the engine walks one level deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub recipe_id: RecipeId,
    pub product_id: ItemId,
    /// Units produced per craft.
    pub quantity: u32,
    pub reagents: Vec<Reagent>,
    pub profession: String,
    pub level_required: u32,
}

/// Computed economics for one recipe.
///
/// Monetary fields are rounded to 2 decimals. `margin` is
/// `profit / sale_price` when the product could be priced, zero
/// otherwise. `risk` counts reagents whose price could not be resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipeAnalysis {
    pub recipe_id: RecipeId,
    pub product_id: ItemId,
    pub cost: Decimal,
    pub sale_price: Decimal,
    pub profit: Decimal,
    pub margin: Decimal,
    pub risk: usize,
    pub missing_reagents: Vec<ItemId>,
}

/// Source of current market prices.
///
/// Lookups are fallible; a `None` means the item has no resolvable
/// price and is recorded as a risk signal rather than an error.
pub trait PriceSource {
    /// Current per-unit price for an item, if one can be resolved.
    fn price(&self, item_id: ItemId) -> Option<Decimal>;
}

impl PriceSource for HashMap<ItemId, Decimal> {
    fn price(&self, item_id: ItemId) -> Option<Decimal> {
        self.get(&item_id).copied()
    }
}

/// Memoizing recipe economics engine.
///
/// Results are cached per (recipe id, expansion depth) for the lifetime
/// of the engine; repeated analysis of the same recipe never re-invokes
/// the price source. The cache is behind a mutex so the engine can be
/// driven through `&self`, but the intended use is single-threaded per
/// instance - shard recipes across engines for parallel throughput.
pub struct RecipeCostEngine<'a, P> {
    prices: &'a P,
    /// Recipe ids in collection order; drives [`Self::analyze_all`].
    order: Vec<RecipeId>,
    by_recipe: HashMap<RecipeId, &'a Recipe>,
    by_product: HashMap<ItemId, &'a Recipe>,
    scarce: HashSet<ItemId>,
    cache: Mutex<HashMap<(RecipeId, u8), RecipeAnalysis>>,
}

impl<'a, P: PriceSource> RecipeCostEngine<'a, P> {
    /// Build an engine over a recipe collection.
    ///
    /// `scarce` lists reagent ids whose component cost carries a 10%
    /// supply markup.
    pub fn new(recipes: &'a [Recipe], prices: &'a P, scarce: HashSet<ItemId>) -> Self {
        let order = recipes.iter().map(|r| r.recipe_id).collect();
        let by_recipe = recipes.iter().map(|r| (r.recipe_id, r)).collect();
        let by_product = recipes.iter().map(|r| (r.product_id, r)).collect();
        Self {
            prices,
            order,
            by_recipe,
            by_product,
            scarce,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Analyze one recipe. Returns `None` for an unknown recipe id.
    pub fn analyze(&self, recipe_id: RecipeId) -> Option<RecipeAnalysis> {
        self.analyze_at(recipe_id, 0)
    }

    /// Analyze every recipe in the collection, in collection order.
    pub fn analyze_all(&self) -> Vec<RecipeAnalysis> {
        self.order
            .iter()
            .filter_map(|&id| self.analyze(id))
            .collect()
    }

    fn analyze_at(&self, recipe_id: RecipeId, depth: u8) -> Option<RecipeAnalysis> {
        if let Some(hit) = self.cache.lock().get(&(recipe_id, depth)) {
            return Some(hit.clone());
        }

        let recipe = self.by_recipe.get(&recipe_id).copied()?;
        let mut cost = Decimal::ZERO;
        let mut missing: Vec<ItemId> = Vec::new();

        for reagent in &recipe.reagents {
            let sub = if depth < MAX_SUB_RECIPE_DEPTH {
                self.by_product.get(&reagent.item_id).copied()
            } else {
                None
            };

            let component_cost = match sub {
                Some(sub_recipe) => {
                    // The lock is released before recursing.
                    let analysis = self.analyze_at(sub_recipe.recipe_id, depth + 1)?;
                    let produced = Decimal::from(sub_recipe.quantity.max(1));
                    analysis.cost / produced
                }
                None => match self.prices.price(reagent.item_id) {
                    Some(price) => price,
                    None => {
                        missing.push(reagent.item_id);
                        continue;
                    }
                },
            };

            let component_cost = if self.scarce.contains(&reagent.item_id) {
                component_cost * SCARCITY_MARKUP
            } else {
                component_cost
            };

            cost += component_cost * Decimal::from(reagent.quantity);
        }

        let sale_price = self
            .prices
            .price(recipe.product_id)
            .map(|p| p * Decimal::from(recipe.quantity))
            .unwrap_or(Decimal::ZERO);

        let profit = sale_price - cost;
        let margin = if sale_price > Decimal::ZERO {
            profit / sale_price
        } else {
            Decimal::ZERO
        };

        let analysis = RecipeAnalysis {
            recipe_id,
            product_id: recipe.product_id,
            cost: cost.round_dp(2),
            sale_price: sale_price.round_dp(2),
            profit: profit.round_dp(2),
            margin: margin.round_dp(2),
            risk: missing.len(),
            missing_reagents: missing,
        };

        self.cache
            .lock()
            .insert((recipe_id, depth), analysis.clone());
        Some(analysis)
    }
}

/// Analyze a whole recipe collection in one call.
///
/// Convenience wrapper that builds a throwaway engine; results come
/// back in the collection's order.
pub fn analyze_recipes<P: PriceSource>(
    recipes: &[Recipe],
    prices: &P,
    scarce: HashSet<ItemId>,
) -> Vec<RecipeAnalysis> {
    let engine = RecipeCostEngine::new(recipes, prices, scarce);
    recipes
        .iter()
        .filter_map(|r| engine.analyze(r.recipe_id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_recipe(
        recipe_id: u32,
        product_id: u32,
        quantity: u32,
        reagents: &[(u32, u32)],
    ) -> Recipe {
        Recipe {
            recipe_id: RecipeId::new(recipe_id),
            product_id: ItemId::new(product_id),
            quantity,
            reagents: reagents
                .iter()
                .map(|&(item_id, quantity)| Reagent {
                    item_id: ItemId::new(item_id),
                    quantity,
                })
                .collect(),
            profession: "alchemy".into(),
            level_required: 1,
        }
    }

    fn make_prices(entries: &[(u32, Decimal)]) -> HashMap<ItemId, Decimal> {
        entries
            .iter()
            .map(|&(id, price)| (ItemId::new(id), price))
            .collect()
    }

    #[test]
    fn sub_recipe_cost_is_amortized_over_output() {
        let recipes = vec![
            make_recipe(1, 101, 1, &[(201, 2), (202, 1)]),
            make_recipe(2, 201, 2, &[(301, 1)]),
        ];
        let prices = make_prices(&[(202, dec!(5)), (301, dec!(3)), (101, dec!(20))]);
        let engine = RecipeCostEngine::new(&recipes, &prices, HashSet::new());

        let analysis = engine.analyze(RecipeId::new(1)).unwrap();
        // Sub-recipe: 3 per craft over 2 units -> 1.5/unit; 2 units + 5.
        assert_eq!(analysis.cost, dec!(8.00));
        assert_eq!(analysis.sale_price, dec!(20.00));
        assert_eq!(analysis.profit, dec!(12.00));
        assert_eq!(analysis.margin, dec!(0.60));
        assert_eq!(analysis.risk, 0);
    }

    #[test]
    fn unknown_recipe_id_yields_none() {
        let recipes = vec![make_recipe(1, 101, 1, &[])];
        let prices = make_prices(&[(101, dec!(20))]);
        let engine = RecipeCostEngine::new(&recipes, &prices, HashSet::new());
        assert!(engine.analyze(RecipeId::new(99)).is_none());
    }

    #[test]
    fn missing_reagent_is_recorded_not_fatal() {
        let recipes = vec![make_recipe(1, 101, 1, &[(202, 1)])];
        let prices = make_prices(&[(101, dec!(20))]);
        let engine = RecipeCostEngine::new(&recipes, &prices, HashSet::new());

        let analysis = engine.analyze(RecipeId::new(1)).unwrap();
        assert_eq!(analysis.missing_reagents, vec![ItemId::new(202)]);
        assert_eq!(analysis.risk, 1);
        assert_eq!(analysis.cost, dec!(0));
        assert_eq!(analysis.sale_price, dec!(20));
    }

    #[test]
    fn unpriceable_product_sells_for_zero() {
        let recipes = vec![make_recipe(1, 101, 1, &[(202, 2)])];
        let prices = make_prices(&[(202, dec!(5))]);
        let engine = RecipeCostEngine::new(&recipes, &prices, HashSet::new());

        let analysis = engine.analyze(RecipeId::new(1)).unwrap();
        assert_eq!(analysis.sale_price, dec!(0));
        assert_eq!(analysis.profit, dec!(-10));
        assert_eq!(analysis.margin, dec!(0));
    }

    #[test]
    fn scarce_reagent_costs_ten_percent_more() {
        let recipes = vec![make_recipe(1, 101, 1, &[(202, 2)])];
        let prices = make_prices(&[(202, dec!(5)), (101, dec!(20))]);

        let plain = RecipeCostEngine::new(&recipes, &prices, HashSet::new())
            .analyze(RecipeId::new(1))
            .unwrap();
        let scarce_set: HashSet<ItemId> = [ItemId::new(202)].into();
        let scarce = RecipeCostEngine::new(&recipes, &prices, scarce_set)
            .analyze(RecipeId::new(1))
            .unwrap();

        assert_eq!(plain.cost, dec!(10.00));
        assert_eq!(scarce.cost, dec!(11.00));
    }

    #[test]
    fn deep_nesting_is_priced_not_expanded() {
        // 1 -> 201 (recipe 2) -> 301 (recipe 3). Depth cap means recipe
        // 3 is never expanded: reagent 301 inside recipe 2 is priced
        // directly.
        let recipes = vec![
            make_recipe(1, 101, 1, &[(201, 1)]),
            make_recipe(2, 201, 1, &[(301, 1)]),
            make_recipe(3, 301, 1, &[(401, 10)]),
        ];
        let prices = make_prices(&[(301, dec!(7)), (401, dec!(100)), (101, dec!(20))]);
        let engine = RecipeCostEngine::new(&recipes, &prices, HashSet::new());

        let analysis = engine.analyze(RecipeId::new(1)).unwrap();
        // 301 priced at 7, not expanded into 10x401.
        assert_eq!(analysis.cost, dec!(7.00));
    }

    #[test]
    fn analyze_all_covers_every_recipe_in_collection_order() {
        // Ids deliberately not in ascending order.
        let recipes = vec![
            make_recipe(9, 101, 1, &[(202, 1)]),
            make_recipe(2, 201, 2, &[(301, 1)]),
        ];
        let prices = make_prices(&[(202, dec!(5)), (301, dec!(3)), (101, dec!(20)), (201, dec!(4))]);
        let engine = RecipeCostEngine::new(&recipes, &prices, HashSet::new());

        let all = engine.analyze_all();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].recipe_id, RecipeId::new(9));
        assert_eq!(all[1].recipe_id, RecipeId::new(2));
    }

    #[test]
    fn recipe_json_round_trips() {
        let json = r#"{
            "recipe_id": 2,
            "product_id": 201,
            "quantity": 2,
            "reagents": [{"item_id": 301, "quantity": 1}],
            "profession": "alchemy",
            "level_required": 1
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.recipe_id, RecipeId::new(2));
        assert_eq!(recipe.reagents.len(), 1);
        assert_eq!(recipe.reagents[0].item_id, ItemId::new(301));
    }
}
