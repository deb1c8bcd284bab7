//! Browse-query sort order.
//!
//! Order strings are comma-separated field names, each optionally prefixed
//! with `-` for descending: `"-date,title"`. Sorting is stable, so ties
//! keep store order, and entities missing the field sort last either way.

use std::cmp::Ordering;

use serde_json::Value;

use crate::resource::JsonMap;

/// One sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    pub field: String,
    pub descending: bool,
}

/// Parse an order string into sort keys.
pub fn parse_order(source: &str) -> Vec<OrderSpec> {
    source
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.strip_prefix('-') {
            Some(field) => OrderSpec {
                field: field.trim().to_string(),
                descending: true,
            },
            None => OrderSpec {
                field: token.to_string(),
                descending: false,
            },
        })
        .collect()
}

/// Compare two entities by the given sort keys.
pub fn cmp_entities(a: &JsonMap, b: &JsonMap, specs: &[OrderSpec]) -> Ordering {
    for spec in specs {
        let ordering = cmp_field(a.get(&spec.field), b.get(&spec.field), spec.descending);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn cmp_field(a: Option<&Value>, b: Option<&Value>, descending: bool) -> Ordering {
    match (present(a), present(b)) {
        (None, None) => Ordering::Equal,
        // Missing values sort last regardless of direction
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering = cmp_values(x, y);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        // Mixed types: rank by type so the sort stays total
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

const fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Number(_) => 1,
        Value::String(_) => 2,
        Value::Array(_) => 3,
        Value::Object(_) => 4,
        Value::Null => 5,
    }
}
