//! # Order Calculator
//!
//! The storefront side of the configurator: a menu ingested once from a
//! JSON payload, an explicit [`SelectionState`] value, and pure transition
//! functions that drive it. Rendering consumes the recomputed
//! [`totals`](self::totals) after every transition; there is no hidden
//! calculator state anywhere.
//!
//! A malformed or missing payload leaves the calculator inert: ingestion
//! returns `None`, logs to the diagnostic channel, and nothing renders.
//! There is no user-facing error affordance by design.

pub mod allocate;
pub mod totals;

use std::collections::{BTreeMap, HashMap};

use log::error;
use serde::Deserialize;

use crate::model::{BowlTemplate, Ingredient, Money, Nutrition};

/// Free-form display settings passed through from the host page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings(HashMap<String, String>);

impl Settings {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self(values)
    }

    /// A display text, falling back to the built-in default.
    pub fn text<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.0.get(key).map(String::as_str).unwrap_or(default)
    }
}

/// The immutable menu the calculator works against: templates, the
/// ingredient catalog in canonical display order, and the category order.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu {
    pub templates: Vec<BowlTemplate>,
    /// Ingredients in canonical enumeration order. This order decides
    /// which units the overflow allocator bills as extra.
    pub ingredients: Vec<Ingredient>,
    pub category_order: Vec<String>,
    pub settings: Settings,
}

impl Menu {
    pub fn new(
        templates: Vec<BowlTemplate>,
        ingredients: Vec<Ingredient>,
        category_order: Vec<String>,
        settings: Settings,
    ) -> Self {
        Self {
            templates,
            ingredients,
            category_order,
            settings,
        }
    }

    pub fn template(&self, id: &str) -> Option<&BowlTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.iter().find(|i| i.id == id)
    }

    /// The category's ingredients in canonical order.
    pub fn ingredients_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Ingredient> + 'a {
        self.ingredients.iter().filter(move |i| i.category == category)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload {
    #[serde(default)]
    bowl_templates: Vec<RawTemplate>,
    #[serde(default)]
    ingredients: Vec<RawIngredient>,
    #[serde(default)]
    category_order: Vec<String>,
    #[serde(default)]
    settings: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTemplate {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    base_price: f64,
    #[serde(default)]
    limits: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIngredient {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    allergens: Vec<String>,
    #[serde(default)]
    calories: f64,
    #[serde(default)]
    protein: f64,
    #[serde(default)]
    carbs: f64,
    #[serde(default)]
    fat: f64,
    #[serde(default)]
    extra_price: f64,
}

fn limit_value(value: &serde_json::Value) -> u32 {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f.max(0.0) as u32).unwrap_or(0),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(|f| f.max(0.0) as u32)
            .unwrap_or(0),
        _ => 0,
    }
}

impl Menu {
    /// Ingest the host page payload. Malformed input returns `None` and
    /// logs the failure; the calculator then stays inert.
    pub fn from_json(raw: &str) -> Option<Menu> {
        let payload: RawPayload = match serde_json::from_str(raw) {
            Ok(payload) => payload,
            Err(err) => {
                error!("Calculator payload rejected: {}", err);
                return None;
            }
        };

        let templates = payload
            .bowl_templates
            .into_iter()
            .map(|t| BowlTemplate {
                id: t.id,
                name: t.name,
                description: t.description,
                base_price: Money::new(t.base_price, crate::catalog::DEFAULT_CURRENCY),
                limits: t
                    .limits
                    .iter()
                    .map(|(category, v)| (category.clone(), limit_value(v)))
                    .collect(),
            })
            .collect();
        let ingredients = payload
            .ingredients
            .into_iter()
            .map(|i| Ingredient {
                id: i.id,
                name: i.name,
                category: i.category,
                allergens: i.allergens,
                nutrition: Nutrition {
                    calories: i.calories,
                    protein: i.protein,
                    carbs: i.carbs,
                    fat: i.fat,
                },
                extra_price: Money::new(i.extra_price, crate::catalog::DEFAULT_CURRENCY),
            })
            .collect();

        Some(Menu::new(
            templates,
            ingredients,
            payload.category_order,
            Settings::new(payload.settings),
        ))
    }
}

/// The customer's ephemeral session state: the chosen template and the
/// selected unit count per ingredient. Zero entries are pruned; values
/// are always positive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    pub template: Option<BowlTemplate>,
    pub selected_units: BTreeMap<String, u32>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose a template, discarding any previous selection. Unknown ids
    /// clear the selection entirely.
    pub fn select_template(&mut self, menu: &Menu, template_id: &str) {
        self.template = menu.template(template_id).cloned();
        self.selected_units.clear();
    }

    /// Add one unit of an ingredient. Ignored when no template is chosen
    /// or the ingredient is not on the menu.
    pub fn add_unit(&mut self, menu: &Menu, ingredient_id: &str) {
        if self.template.is_none() || menu.ingredient(ingredient_id).is_none() {
            return;
        }
        *self
            .selected_units
            .entry(ingredient_id.to_string())
            .or_insert(0) += 1;
    }

    /// Remove one unit of an ingredient; entries reaching zero are pruned.
    /// Removing from zero is a no-op.
    pub fn remove_unit(&mut self, ingredient_id: &str) {
        if let Some(count) = self.selected_units.get_mut(ingredient_id) {
            *count -= 1;
            if *count == 0 {
                self.selected_units.remove(ingredient_id);
            }
        }
    }

    pub fn units_of(&self, ingredient_id: &str) -> u32 {
        self.selected_units.get(ingredient_id).copied().unwrap_or(0)
    }

    /// The category's selection as `(ingredient_id, quantity)` pairs in
    /// the menu's canonical order, ready for the overflow allocator.
    pub fn category_selection(&self, menu: &Menu, category: &str) -> Vec<(String, u32)> {
        menu.ingredients_in(category)
            .map(|i| (i.id.clone(), self.units_of(&i.id)))
            .collect()
    }
}
