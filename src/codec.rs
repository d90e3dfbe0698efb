//! # Field Codec
//!
//! The persistence platform stores every field value as a raw string, and
//! composite values (allergen lists, prices, limit maps, ordering state) as
//! JSON encoded *within* that string. This module is the only place that
//! encoding is dealt with: domain types go in and out of their string form
//! here, and nowhere else.
//!
//! ## Decode contract
//!
//! Decoding never fails. A missing or empty value decodes silently to the
//! empty default; malformed JSON decodes to the empty default with a
//! `log::warn!` naming the field. Callers can rely on always receiving a
//! usable value and must not expect an error channel for bad stored data.

use log::warn;
use serde_json::{Map, Value};

use crate::model::{Money, OrderRecord};

/// Parse a raw field value as JSON, defaulting on malformed input.
///
/// Empty input is the "field absent" case and stays quiet; anything else
/// that fails to parse is logged with the owning field's name.
fn parse_value(raw: &str, field: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Malformed JSON in field '{}' ({}); using default", field, err);
            None
        }
    }
}

/// Read a number that may be stored as a JSON number or a numeric string.
///
/// The platform's form layer historically saved limit values as strings
/// ("2" rather than 2), so both spellings are accepted.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode a JSON string list (`["a","b"]`). Malformed → empty.
pub fn decode_string_list(raw: &str, field: &str) -> Vec<String> {
    match parse_value(raw, field) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(_) => {
            warn!("Field '{}' is not a JSON array; using default", field);
            Vec::new()
        }
        None => Vec::new(),
    }
}

pub fn encode_string_list(items: &[String]) -> String {
    Value::Array(items.iter().map(|s| Value::String(s.clone())).collect()).to_string()
}

/// Decode a `{amount, currency_code}` money value. Malformed → zero in the
/// given default currency.
pub fn decode_money(raw: &str, field: &str, default_currency: &str) -> Money {
    let fallback = || Money::zero(default_currency);
    match parse_value(raw, field) {
        Some(Value::Object(map)) => {
            let amount = map.get("amount").and_then(as_f64).unwrap_or(0.0);
            let currency = map
                .get("currency_code")
                .and_then(Value::as_str)
                .unwrap_or(default_currency);
            Money::new(amount, currency)
        }
        Some(_) => {
            warn!("Field '{}' is not a money object; using default", field);
            fallback()
        }
        None => fallback(),
    }
}

pub fn encode_money(money: &Money) -> String {
    serde_json::json!({
        "amount": money.amount,
        "currency_code": money.currency_code,
    })
    .to_string()
}

/// Decode a category→limit JSON object into ordered pairs.
///
/// Key order follows the stored document (serde_json is built with
/// `preserve_order`); values accept both numeric and string spellings and
/// default to 0, negative values clamp to 0.
pub fn decode_limit_map(raw: &str, field: &str) -> Vec<(String, u32)> {
    match parse_value(raw, field) {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(category, v)| {
                let limit = as_f64(&v).map(|n| n.max(0.0) as u32).unwrap_or(0);
                (category, limit)
            })
            .collect(),
        Some(_) => {
            warn!("Field '{}' is not a JSON object; using default", field);
            Vec::new()
        }
        None => Vec::new(),
    }
}

pub fn encode_limit_map(limits: &[(String, u32)]) -> String {
    let mut map = Map::new();
    for (category, limit) in limits {
        map.insert(category.clone(), Value::from(*limit));
    }
    Value::Object(map).to_string()
}

/// Decode a plain numeric field (calories, grams). Malformed → 0.
pub fn decode_number(raw: &str, field: &str) -> f64 {
    if raw.trim().is_empty() {
        return 0.0;
    }
    match raw.trim().parse() {
        Ok(n) => n,
        Err(_) => {
            warn!("Field '{}' is not numeric ('{}'); using 0", field, raw);
            0.0
        }
    }
}

/// Decode the shop ordering state from its two raw JSON strings.
pub fn decode_order_record(category_order_raw: &str, ingredient_order_raw: &str) -> OrderRecord {
    let category_order = decode_string_list(category_order_raw, "category_order");
    let ingredient_order = match parse_value(ingredient_order_raw, "ingredient_order") {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(category, v)| {
                let ids = match v {
                    Value::Array(items) => items
                        .into_iter()
                        .filter_map(|i| match i {
                            Value::String(s) => Some(s),
                            _ => None,
                        })
                        .collect(),
                    _ => Vec::new(),
                };
                (category, ids)
            })
            .collect(),
        Some(_) => {
            warn!("Field 'ingredient_order' is not a JSON object; using default");
            Vec::new()
        }
        None => Vec::new(),
    };
    OrderRecord {
        category_order,
        ingredient_order,
    }
}

pub fn encode_ingredient_order(order: &[(String, Vec<String>)]) -> String {
    let mut map = Map::new();
    for (category, ids) in order {
        map.insert(
            category.clone(),
            Value::Array(ids.iter().map(|s| Value::String(s.clone())).collect()),
        );
    }
    Value::Object(map).to_string()
}
