//! Parser for the filter expression language.
//!
//! Grammar (loosest binding first):
//!
//! ```text
//! or    := and (',' and)*
//! and   := unit ('+' unit)*
//! unit  := '(' or ')' | clause
//! clause := field ':' rhs
//! rhs   := '-' atom | ('>=' | '<=' | '>' | '<')? atom | '[' atom (',' atom)* ']'
//! atom  := '\'' ... '\'' | bareword
//! ```
//!
//! Examples: `featured:true+tag:-news`, `tags:'getting-started'`,
//! `primary_author:sam,primary_tag:photo`, `month:>=06`.

use std::fmt;

use super::ast::{CmpOp, FilterExpr, Literal};

/// Filter expression syntax error
#[derive(Debug, Clone)]
pub struct FilterParseError {
    pub message: String,
    pub pos: usize,
}

impl fmt::Display for FilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at position {}", self.message, self.pos)
    }
}

impl std::error::Error for FilterParseError {}

/// Parse a filter expression into its AST form.
pub fn parse(input: &str) -> Result<FilterExpr, FilterParseError> {
    let mut parser = Parser { input, pos: 0 };
    let expr = parser.or_expr()?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn or_expr(&mut self) -> Result<FilterExpr, FilterParseError> {
        let mut parts = vec![self.and_expr()?];
        while self.eat(',') {
            parts.push(self.and_expr()?);
        }
        Ok(if parts.len() == 1 {
            parts.pop().unwrap()
        } else {
            FilterExpr::Or(parts)
        })
    }

    fn and_expr(&mut self) -> Result<FilterExpr, FilterParseError> {
        let mut parts = vec![self.unit()?];
        while self.eat('+') {
            parts.push(self.unit()?);
        }
        Ok(if parts.len() == 1 {
            parts.pop().unwrap()
        } else {
            FilterExpr::And(parts)
        })
    }

    fn unit(&mut self) -> Result<FilterExpr, FilterParseError> {
        self.skip_ws();
        if self.eat('(') {
            let expr = self.or_expr()?;
            if !self.eat(')') {
                return Err(self.error("expected `)`"));
            }
            return Ok(expr);
        }
        self.clause()
    }

    fn clause(&mut self) -> Result<FilterExpr, FilterParseError> {
        self.skip_ws();
        let field = self.field()?;
        if !self.eat(':') {
            return Err(self.error("expected `:` after field name"));
        }
        self.skip_ws();

        // In-group: field:[a,b,c]
        if self.eat('[') {
            let mut values = vec![self.atom()?];
            while self.eat(',') {
                values.push(self.atom()?);
            }
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            return Ok(FilterExpr::In { field, values });
        }

        // Negation: field:-value
        if self.eat('-') {
            let value = self.atom()?;
            return Ok(FilterExpr::Not(Box::new(FilterExpr::Cmp {
                field,
                op: CmpOp::Eq,
                value,
            })));
        }

        let op = if self.eat_str(">=") {
            CmpOp::Gte
        } else if self.eat_str("<=") {
            CmpOp::Lte
        } else if self.eat('>') {
            CmpOp::Gt
        } else if self.eat('<') {
            CmpOp::Lt
        } else {
            CmpOp::Eq
        };

        let value = self.atom()?;
        Ok(FilterExpr::Cmp { field, op, value })
    }

    fn field(&mut self) -> Result<String, FilterParseError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected field name"));
        }
        Ok(self.input[start..self.pos].to_string())
    }

    fn atom(&mut self) -> Result<Literal, FilterParseError> {
        self.skip_ws();

        // Quoted string: always a string literal
        if self.eat('\'') {
            let start = self.pos;
            while let Some(c) = self.peek() {
                if c == '\'' {
                    let value = self.input[start..self.pos].to_string();
                    self.pos += 1;
                    return Ok(Literal::Str(value));
                }
                self.pos += c.len_utf8();
            }
            return Err(self.error("unterminated quoted string"));
        }

        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '%') {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.error("expected value"));
        }
        Ok(Literal::from_bareword(&self.input[start..self.pos]))
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str(&mut self, expected: &str) -> bool {
        self.skip_ws();
        if self.input[self.pos..].starts_with(expected) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error(&self, message: &str) -> FilterParseError {
        FilterParseError {
            message: message.to_string(),
            pos: self.pos,
        }
    }
}
