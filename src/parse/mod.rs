pub mod ast;
mod error;
mod lexer;
mod parser;

use crate::common::UInt;
use serde::{Deserialize, Serialize};

pub use error::{ParseError, ParseErrorKind};
pub use lexer::TokenKind;
pub use parser::Parser;

/// Bounds on what a single dice group may ask for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Most dice a single group may roll.
    pub max_dice: UInt,
    /// Most sides a die may have.
    pub max_sides: UInt,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dice: 1000,
            max_sides: 10_000,
        }
    }
}

/// Parses dice notation using the default [`Limits`].
pub fn parse(s: &str) -> Result<ast::Expression, ParseError> {
    parse_with(s, Limits::default())
}

pub fn parse_with(s: &str, limits: Limits) -> Result<ast::Expression, ParseError> {
    let parsed = Parser::with_limits(s, limits).parse();
    match &parsed {
        Ok(expr) => tracing::debug!(notation = s, terms = expr.terms().len(), "parsed dice notation"),
        Err(why) => tracing::debug!(notation = s, error = %why, "rejected dice notation"),
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_from_partial_config() {
        let limits: Limits = serde_json::from_str(r#"{ "max_dice": 50 }"#).unwrap();
        assert_eq!(
            limits,
            Limits {
                max_dice: 50,
                max_sides: 10_000,
            }
        );
    }
}
