//! Compiled filter-expression cache.
//!
//! Expression strings repeat heavily across routes, collections, taxonomy
//! instantiations, and browse queries; each distinct string is parsed once
//! and the AST shared from then on.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use super::ast::FilterExpr;
use super::eval::{FieldExpansions, eval};
use super::parse::parse;
use crate::core::{RouteError, RouteResult};

/// Cache of compiled filter expressions keyed by source string
#[derive(Debug, Default)]
pub struct FilterCache {
    compiled: DashMap<String, Arc<FilterExpr>>,
    expansions: FieldExpansions,
}

impl FilterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile an expression, reusing the cached AST when available.
    pub fn compile(&self, source: &str) -> RouteResult<Arc<FilterExpr>> {
        if let Some(hit) = self.compiled.get(source) {
            return Ok(hit.clone());
        }

        let expr = Arc::new(parse(source).map_err(|e| {
            RouteError::validation_with_help(
                format!("invalid filter expression `{source}`: {e}"),
                "filters look like `tag:photo`, `featured:true+tag:-news`, or `authors:'sam'`",
            )
        })?);
        self.compiled.insert(source.to_string(), expr.clone());
        Ok(expr)
    }

    /// Compile and evaluate an expression against an entity.
    pub fn matches(&self, source: &str, entity: &Value) -> RouteResult<bool> {
        let expr = self.compile(source)?;
        Ok(eval(&expr, entity, &self.expansions))
    }

    /// Number of distinct compiled expressions.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}
