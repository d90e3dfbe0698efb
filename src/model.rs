//! # Domain Model
//!
//! Typed records for the bowl configurator. These are plain in-memory
//! values: nothing here knows how the persistence platform encodes fields.
//! The [`crate::codec`] and [`crate::catalog`] modules own the translation
//! between these types and the platform's stringly-typed records.
//!
//! A `Category` is an opaque string identifier. The set of valid categories
//! (the taxonomy) lives in the store's field definition; records here may
//! transiently reference categories that no longer exist, until the cascade
//! cleanup runs.

/// Identifier type for ingredient categories.
///
/// Categories are opaque strings, unique within the current taxonomy. The
/// empty string is the "no category" state an ingredient is left in after
/// cascade cleanup.
pub type Category = String;

/// A monetary amount as the platform stores it: a raw amount plus an ISO
/// currency code. Amounts stay unrounded until display.
#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency_code: String,
}

impl Money {
    pub fn new(amount: f64, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(0.0, currency_code)
    }
}

/// Per-unit macro nutrients of an ingredient.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Nutrition {
    /// Accumulate `quantity` units of `other` into this total.
    pub fn accumulate(&mut self, other: &Nutrition, quantity: u32) {
        let q = f64::from(quantity);
        self.calories += other.calories * q;
        self.protein += other.protein * q;
        self.carbs += other.carbs * q;
        self.fat += other.fat * q;
    }
}

/// A single ingredient of the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// Category identifier, or empty when unassigned. May reference a
    /// category that has since been removed from the taxonomy.
    pub category: Category,
    pub allergens: Vec<String>,
    pub nutrition: Nutrition,
    /// Price per unit once the category's free quota is exhausted.
    pub extra_price: Money,
}

impl Ingredient {
    /// Whether this ingredient currently belongs to a category.
    pub fn has_category(&self) -> bool {
        !self.category.is_empty()
    }
}

/// A bowl template: the base the customer starts from.
///
/// `limits` maps each category to the number of units included in the base
/// price. The pairs preserve stored key order; keys are expected to equal
/// the live taxonomy but may contain stale ("orphaned") entries between
/// cascade runs.
#[derive(Debug, Clone, PartialEq)]
pub struct BowlTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_price: Money,
    pub limits: Vec<(Category, u32)>,
}

impl BowlTemplate {
    /// The free quota for a category, 0 when the category has no entry.
    pub fn limit_for(&self, category: &str) -> u32 {
        self.limits
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// The shop-level ordering record: display order for categories and, per
/// category, for ingredients. Persisted separately from the vocabulary.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrderRecord {
    pub category_order: Vec<Category>,
    pub ingredient_order: Vec<(Category, Vec<String>)>,
}

impl OrderRecord {
    /// The stored ingredient sequence for a category, empty if absent.
    pub fn ingredients_for(&self, category: &str) -> &[String] {
        self.ingredient_order
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or(&[])
    }
}
