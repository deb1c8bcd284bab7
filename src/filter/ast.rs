//! Tagged AST for filter expressions.

/// A compiled filter expression
///
/// Built once per distinct source string (see [`super::FilterCache`]) and
/// evaluated against entity JSON values.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// All sub-expressions must match (`+` in source form).
    And(Vec<FilterExpr>),
    /// Any sub-expression must match (`,` in source form).
    Or(Vec<FilterExpr>),
    /// Negation (`field:-value` in source form).
    Not(Box<FilterExpr>),
    /// Field comparison (`field:value`, `field:>value`, ...).
    Cmp {
        field: String,
        op: CmpOp,
        value: Literal,
    },
    /// In-group membership (`field:[a,b,c]`).
    In { field: String, values: Vec<Literal> },
}

/// Comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Gt,
    Lt,
    Gte,
    Lte,
}

/// Literal value on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

impl Literal {
    /// Classify a bareword token.
    ///
    /// `true`/`false`/`null` and numbers get their typed forms; everything
    /// else stays a string. Quoted tokens bypass this and are always strings.
    pub fn from_bareword(word: &str) -> Self {
        match word {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            "null" => Self::Null,
            _ => match word.parse::<f64>() {
                Ok(n) => Self::Num(n),
                Err(_) => Self::Str(word.to_string()),
            },
        }
    }
}
