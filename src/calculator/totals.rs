//! Pricing and nutrition aggregation.
//!
//! Combines the base price, the overflow allocator's extra counts, and the
//! per-unit nutrition into the summary the rendering layer consumes. All
//! selected units count toward nutrition, free and extra alike; only extra
//! units carry a charge. Totals are recomputed from scratch on every call.

use super::allocate;
use super::{Menu, SelectionState};

/// One selected ingredient in the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub ingredient_id: String,
    pub name: String,
    pub quantity: u32,
    /// Units of this ingredient past the category's free quota.
    pub extra_quantity: u32,
    /// `extra_quantity × extra_price`, unrounded.
    pub extra_charge: f64,
}

/// Aggregated totals, rounded to display precision: whole calories, one
/// decimal place for gram values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Totals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub extra_price: f64,
    pub total_price: f64,
}

/// The full order summary for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub template_name: String,
    pub base_price: f64,
    pub currency_code: String,
    pub lines: Vec<LineItem>,
    pub totals: Totals,
}

fn round_grams(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the order summary for the current selection. `None` while no
/// template is chosen (nothing to price against).
pub fn compute(menu: &Menu, state: &SelectionState) -> Option<OrderSummary> {
    let template = state.template.as_ref()?;

    // one allocator pass per category that has selected units
    let mut categories: Vec<&str> = Vec::new();
    for ingredient in &menu.ingredients {
        if state.units_of(&ingredient.id) > 0 && !categories.contains(&ingredient.category.as_str())
        {
            categories.push(ingredient.category.as_str());
        }
    }

    let mut lines = Vec::new();
    let mut nutrition = crate::model::Nutrition::default();
    let mut extra_price = 0.0;

    for category in categories {
        let selection = state.category_selection(menu, category);
        let extras = allocate::extra_quantities(template.limit_for(category), &selection);
        for (id, quantity) in selection {
            if quantity == 0 {
                continue;
            }
            let ingredient = menu
                .ingredient(&id)
                .expect("selection ids come from the menu");
            let extra_quantity = extras.get(&id).copied().unwrap_or(0);
            let extra_charge = f64::from(extra_quantity) * ingredient.extra_price.amount;
            nutrition.accumulate(&ingredient.nutrition, quantity);
            extra_price += extra_charge;
            lines.push(LineItem {
                ingredient_id: id,
                name: ingredient.name.clone(),
                quantity,
                extra_quantity,
                extra_charge,
            });
        }
    }

    Some(OrderSummary {
        template_name: template.name.clone(),
        base_price: template.base_price.amount,
        currency_code: template.base_price.currency_code.clone(),
        totals: Totals {
            calories: nutrition.calories.round() as i64,
            protein: round_grams(nutrition.protein),
            carbs: round_grams(nutrition.carbs),
            fat: round_grams(nutrition.fat),
            extra_price,
            total_price: template.base_price.amount + extra_price,
        },
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::tests::fixture_menu;

    #[test]
    fn test_no_template_no_summary() {
        let menu = fixture_menu();
        let state = SelectionState::new();
        assert!(compute(&menu, &state).is_none());
    }

    #[test]
    fn test_base_price_only_when_nothing_selected() {
        let menu = fixture_menu();
        let mut state = SelectionState::new();
        state.select_template(&menu, "t1");
        let summary = compute(&menu, &state).unwrap();
        assert_eq!(summary.totals.total_price, 5.0);
        assert_eq!(summary.totals.extra_price, 0.0);
        assert_eq!(summary.totals.calories, 0);
        assert!(summary.lines.is_empty());
    }

    #[test]
    fn test_overflow_pricing_mixed_ingredients() {
        // limit 2 on Base; rice ×3 then quinoa ×1 in canonical order:
        // rice unit 3 extra at 1.00, quinoa unit 4 extra at 2.00
        let menu = fixture_menu();
        let mut state = SelectionState::new();
        state.select_template(&menu, "t1");
        for _ in 0..3 {
            state.add_unit(&menu, "rice");
        }
        state.add_unit(&menu, "quinoa");

        let summary = compute(&menu, &state).unwrap();
        assert_eq!(summary.totals.extra_price, 3.0);
        assert_eq!(summary.totals.total_price, 8.0);
        let rice = summary
            .lines
            .iter()
            .find(|l| l.ingredient_id == "rice")
            .unwrap();
        assert_eq!((rice.quantity, rice.extra_quantity), (3, 1));
        let quinoa = summary
            .lines
            .iter()
            .find(|l| l.ingredient_id == "quinoa")
            .unwrap();
        assert_eq!((quinoa.quantity, quinoa.extra_quantity), (1, 1));
        assert_eq!(quinoa.extra_charge, 2.0);
    }

    #[test]
    fn test_nutrition_counts_free_and_extra_units_alike() {
        let menu = fixture_menu();
        let mut state = SelectionState::new();
        state.select_template(&menu, "t1");
        for _ in 0..3 {
            state.add_unit(&menu, "rice");
        }
        let summary = compute(&menu, &state).unwrap();
        // 3 × 130 calories, rounded to whole numbers
        assert_eq!(summary.totals.calories, 390);
        // 3 × 2.7 g protein, one decimal place
        assert_eq!(summary.totals.protein, 8.1);
        assert_eq!(summary.totals.carbs, 84.0);
        assert_eq!(summary.totals.fat, 0.9);
    }

    #[test]
    fn test_limits_apply_per_category() {
        let menu = fixture_menu();
        let mut state = SelectionState::new();
        state.select_template(&menu, "t1");
        state.add_unit(&menu, "rice");
        state.add_unit(&menu, "rice");
        state.add_unit(&menu, "tofu");
        // Base at its limit of 2, Protein at its limit of 1: no extras
        let summary = compute(&menu, &state).unwrap();
        assert_eq!(summary.totals.extra_price, 0.0);

        state.add_unit(&menu, "tofu");
        let summary = compute(&menu, &state).unwrap();
        // second tofu overflows Protein's limit of 1
        assert_eq!(summary.totals.extra_price, 1.5);
    }

    #[test]
    fn test_totals_are_monotonic_in_units() {
        let menu = fixture_menu();
        let mut state = SelectionState::new();
        state.select_template(&menu, "t1");

        let mut previous = compute(&menu, &state).unwrap().totals;
        for id in ["rice", "quinoa", "tofu", "rice", "tofu", "quinoa"] {
            state.add_unit(&menu, id);
            let current = compute(&menu, &state).unwrap().totals;
            assert!(current.total_price >= previous.total_price);
            assert!(current.calories >= previous.calories);
            assert!(current.protein >= previous.protein);
            previous = current;
        }
        for id in ["quinoa", "tofu", "rice"] {
            state.remove_unit(id);
            let current = compute(&menu, &state).unwrap().totals;
            assert!(current.total_price <= previous.total_price);
            assert!(current.calories <= previous.calories);
            previous = current;
        }
    }

    #[test]
    fn test_end_to_end_quota_overflow() {
        // template at 5.00, category limit 2, three units at 0.75 extra
        let menu = Menu::from_json(
            r#"{
                "bowlTemplates": [
                    {"id": "t1", "name": "Mini", "basePrice": 5.0,
                     "limits": {"Base": 2}}
                ],
                "ingredients": [
                    {"id": "rice", "name": "Rice", "category": "Base",
                     "extraPrice": 0.75}
                ],
                "categoryOrder": ["Base"]
            }"#,
        )
        .unwrap();
        let mut state = SelectionState::new();
        state.select_template(&menu, "t1");
        for _ in 0..3 {
            state.add_unit(&menu, "rice");
        }
        let summary = compute(&menu, &state).unwrap();
        assert_eq!(summary.totals.total_price, 5.75);
    }
}
