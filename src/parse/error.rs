use super::lexer::TokenKind;
use crate::common::UInt;
use crate::ops::Qualifier;
use std::fmt;
use std::ops::Range;

/// Rejected notation.
///
/// `position` is the character offset of the offending token; `span` is its
/// byte range in the input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("invalid dice notation at position {position} ({slice:?}): {kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: usize,
    pub span: Range<usize>,
    pub slice: String,
}

impl ParseError {
    pub(crate) fn new(source: &str, kind: ParseErrorKind, span: Range<usize>) -> Self {
        let position = source
            .get(..span.start)
            .map_or(span.start, |s| s.chars().count());
        let slice = source.get(span.clone()).unwrap_or_default().to_string();
        Self {
            kind,
            position,
            span,
            slice,
        }
    }

    /// Why the notation was rejected.
    pub fn reason(&self) -> &ParseErrorKind {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    Empty,
    UnknownCharacter,
    UnexpectedToken {
        found: TokenKind,
        expected: Vec<TokenKind>,
    },
    UnexpectedEnd {
        expected: Vec<TokenKind>,
    },
    MissingSides,
    NumberTooLarge,
    ZeroDice,
    TooFewSides(u64),
    TooManyDice {
        count: u64,
        max: UInt,
    },
    TooManySides {
        sides: u64,
        max: UInt,
    },
    EmptySelection(Qualifier),
    SelectsAllDice {
        qualifier: &'static str,
        count: u64,
        kept: UInt,
    },
    InvalidRerollThreshold {
        threshold: u64,
        sides: UInt,
    },
    InvalidExplodeThreshold {
        threshold: u64,
        sides: UInt,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no dice or numbers to roll"),
            Self::UnknownCharacter => write!(f, "unknown character"),
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected {}, expected ", found)?;
                fmt_expected(expected, f)
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input, expected ")?;
                fmt_expected(expected, f)
            }
            Self::MissingSides => write!(f, "dice must say how many sides they have"),
            Self::NumberTooLarge => write!(f, "number is too large"),
            Self::ZeroDice => write!(f, "at least one die must be rolled"),
            Self::TooFewSides(sides) => {
                write!(f, "dice need at least 2 sides, found {}", sides)
            }
            Self::TooManyDice { count, max } => {
                write!(f, "cannot roll {} dice at once; the limit is {}", count, max)
            }
            Self::TooManySides { sides, max } => {
                write!(f, "dice cannot have {} sides; the limit is {}", sides, max)
            }
            Self::EmptySelection(qualifier) => {
                write!(f, "'{}' must select at least one die", qualifier)
            }
            Self::SelectsAllDice {
                qualifier,
                count,
                kept,
            } => write!(
                f,
                "'{}{}' must select fewer than the {} dice still kept",
                qualifier, count, kept
            ),
            Self::InvalidRerollThreshold { threshold, sides } => write!(
                f,
                "cannot reroll {} or lower on a d{}; the threshold must be between 1 and {}",
                threshold,
                sides,
                sides - 1
            ),
            Self::InvalidExplodeThreshold { threshold, sides } => write!(
                f,
                "cannot explode on {} or higher on a d{}; the threshold must be between 2 and {}",
                threshold, sides, sides
            ),
        }
    }
}

fn fmt_expected(expected: &[TokenKind], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match expected {
        [] => Ok(()),
        [a] => f.write_str(a.to_str()),
        [a, b] => write!(f, "{} or {}", a, b),
        [rest @ .., last] => {
            for exp in rest {
                write!(f, "{}, ", exp)?;
            }
            write!(f, "or {}", last)
        }
    }
}
