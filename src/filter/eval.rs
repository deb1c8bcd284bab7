//! Filter expression evaluation against entity JSON.

use rustc_hash::FxHashMap;
use serde_json::Value;

use super::ast::{CmpOp, FilterExpr, Literal};

/// Virtual field expansion table
///
/// Maps shorthand fields to their real dotted paths, so `tag:photo` matches
/// any of the entity's `tags[].slug` values. The table is pluggable: callers
/// can register additional expansions next to the defaults.
#[derive(Debug, Clone)]
pub struct FieldExpansions {
    table: FxHashMap<String, String>,
}

impl Default for FieldExpansions {
    fn default() -> Self {
        let mut table = FxHashMap::default();
        for (from, to) in [
            ("tag", "tags.slug"),
            ("tags", "tags.slug"),
            ("author", "authors.slug"),
            ("authors", "authors.slug"),
            ("primary_tag", "primary_tag.slug"),
            ("primary_author", "primary_author.slug"),
        ] {
            table.insert(from.to_string(), to.to_string());
        }
        Self { table }
    }
}

impl FieldExpansions {
    /// Register a custom expansion.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.table.insert(from.into(), to.into());
    }

    /// Resolve a field name to its effective dotted path.
    pub fn expand<'a>(&'a self, field: &'a str) -> &'a str {
        self.table.get(field).map_or(field, String::as_str)
    }
}

/// Evaluate a compiled filter expression against an entity.
pub fn eval(expr: &FilterExpr, entity: &Value, expansions: &FieldExpansions) -> bool {
    match expr {
        FilterExpr::And(parts) => parts.iter().all(|p| eval(p, entity, expansions)),
        FilterExpr::Or(parts) => parts.iter().any(|p| eval(p, entity, expansions)),
        FilterExpr::Not(inner) => !eval(inner, entity, expansions),
        FilterExpr::Cmp { field, op, value } => {
            cmp_field(entity, expansions.expand(field), *op, value)
        }
        FilterExpr::In { field, values } => {
            let path = expansions.expand(field);
            values.iter().any(|v| cmp_field(entity, path, CmpOp::Eq, v))
        }
    }
}

/// Compare a (possibly array-valued) entity field against a literal.
///
/// Dotted paths descend into objects; arrays along the way fan out with
/// any-element-matches semantics. A missing field only matches `null`.
fn cmp_field(entity: &Value, path: &str, op: CmpOp, lit: &Literal) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    let mut candidates = Vec::new();
    collect(entity, &segments, &mut candidates);

    if candidates.is_empty() {
        return matches!(lit, Literal::Null) && matches!(op, CmpOp::Eq);
    }
    candidates.iter().any(|v| compare(v, op, lit))
}

fn collect<'a>(value: &'a Value, segments: &[&str], out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, segments, out);
            }
        }
        _ if segments.is_empty() => out.push(value),
        Value::Object(map) => {
            if let Some(next) = map.get(segments[0]) {
                collect(next, &segments[1..], out);
            }
        }
        _ => {}
    }
}

fn compare(value: &Value, op: CmpOp, lit: &Literal) -> bool {
    match lit {
        Literal::Null => matches!(value, Value::Null) && matches!(op, CmpOp::Eq),
        Literal::Bool(expected) => {
            matches!(op, CmpOp::Eq) && value.as_bool() == Some(*expected)
        }
        Literal::Num(expected) => {
            let actual = value
                .as_f64()
                .or_else(|| value.as_str().and_then(|s| s.parse().ok()));
            actual.is_some_and(|a| cmp_f64(a, *expected, op))
        }
        Literal::Str(expected) => match value {
            Value::String(actual) => match op {
                CmpOp::Eq => actual == expected,
                CmpOp::Gt => actual.as_str() > expected.as_str(),
                CmpOp::Lt => actual.as_str() < expected.as_str(),
                CmpOp::Gte => actual.as_str() >= expected.as_str(),
                CmpOp::Lte => actual.as_str() <= expected.as_str(),
            },
            // Numeric entity value vs numeric-looking string literal
            Value::Number(n) => expected
                .parse::<f64>()
                .ok()
                .zip(n.as_f64())
                .is_some_and(|(e, a)| cmp_f64(a, e, op)),
            _ => false,
        },
    }
}

fn cmp_f64(actual: f64, expected: f64, op: CmpOp) -> bool {
    match op {
        CmpOp::Eq => actual == expected,
        CmpOp::Gt => actual > expected,
        CmpOp::Lt => actual < expected,
        CmpOp::Gte => actual >= expected,
        CmpOp::Lte => actual <= expected,
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse::parse;
    use super::*;
    use serde_json::json;

    fn post() -> Value {
        json!({
            "slug": "hello-world",
            "featured": true,
            "month": "06",
            "tags": [
                {"slug": "photo", "name": "Photo"},
                {"slug": "travel", "name": "Travel"},
            ],
            "authors": [{"slug": "sam", "name": "Sam"}],
            "primary_tag": {"slug": "photo", "name": "Photo"},
            "primary_author": {"slug": "sam", "name": "Sam"},
        })
    }

    fn matches(filter: &str, entity: &Value) -> bool {
        eval(&parse(filter).unwrap(), entity, &FieldExpansions::default())
    }

    #[test]
    fn test_virtual_tag_expansion() {
        let entity = post();
        assert!(matches("tag:photo", &entity));
        assert!(matches("tag:travel", &entity));
        assert!(!matches("tag:news", &entity));
        assert!(matches("tags:'photo'", &entity));
    }

    #[test]
    fn test_primary_fields() {
        let entity = post();
        assert!(matches("primary_tag:photo", &entity));
        assert!(!matches("primary_tag:travel", &entity));
        assert!(matches("primary_author:sam", &entity));
    }

    #[test]
    fn test_and_or_negation() {
        let entity = post();
        assert!(matches("featured:true+tag:photo", &entity));
        assert!(!matches("featured:false+tag:photo", &entity));
        assert!(matches("featured:false,tag:photo", &entity));
        assert!(matches("tag:-news", &entity));
        assert!(!matches("tag:-photo", &entity));
    }

    #[test]
    fn test_numeric_comparison_on_string_field() {
        let entity = post();
        assert!(matches("month:>=06", &entity));
        assert!(matches("month:<07", &entity));
        assert!(!matches("month:>6", &entity));
    }

    #[test]
    fn test_missing_field_matches_null_only() {
        let entity = post();
        assert!(matches("missing:null", &entity));
        assert!(!matches("missing:value", &entity));
        assert!(matches("missing:-value", &entity));
    }

    #[test]
    fn test_in_group() {
        let entity = post();
        assert!(matches("tag:[news,photo]", &entity));
        assert!(!matches("tag:[news,opinion]", &entity));
    }

    #[test]
    fn test_custom_expansion() {
        let mut expansions = FieldExpansions::default();
        expansions.insert("category", "categories.slug");
        let entity = json!({"categories": [{"slug": "tech"}]});
        let expr = parse("category:tech").unwrap();
        assert!(eval(&expr, &entity, &expansions));
    }
}
