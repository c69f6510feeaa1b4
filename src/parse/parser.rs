use super::{ast::*, error::*, lexer::*, Limits};
use crate::common::*;
use crate::ops::*;
use logos_iter::LogosIter;
use std::ops::Range;

type PResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
    source: &'a str,
    lexer: Lexer<'a>,
    limits: Limits,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_limits(source, Limits::default())
    }

    pub fn with_limits(source: &'a str, limits: Limits) -> Self {
        Self {
            source,
            lexer: lexer(source),
            limits,
        }
    }

    pub fn parse(mut self) -> PResult<Expression<'a>> {
        if self.peek().is_none() {
            return self.error_at_end(ParseErrorKind::Empty);
        }

        let mut terms = NonEmpty::new(self.parse_term()?);
        while let Some(op) = self.parse_operator()? {
            terms.push(DiceTerm::Operator(op));
            terms.push(self.parse_term()?);
        }

        Ok(Expression::new(self.source, terms))
    }

    fn peek(&mut self) -> Option<TokenKind> {
        self.lexer.peek().copied()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.peek().map_or(false, |peeked| options.contains(&peeked))
    }

    fn error<T>(&self, kind: ParseErrorKind, span: Range<usize>) -> PResult<T> {
        Err(ParseError::new(self.source, kind, span))
    }

    fn error_at_end<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        let end = self.source.len();
        self.error(kind, end..end)
    }

    /// Consumes the next token and reports it as unexpected.
    fn unexpected_token<T>(&mut self, expected: &[TokenKind]) -> PResult<T> {
        let expected = expected.to_vec();
        match self.lexer.next() {
            None => self.error_at_end(ParseErrorKind::UnexpectedEnd { expected }),
            Some(TokenKind::Error) => self.error(ParseErrorKind::UnknownCharacter, self.lexer.span()),
            Some(found) => self.error(
                ParseErrorKind::UnexpectedToken { found, expected },
                self.lexer.span(),
            ),
        }
    }

    /// Consumes an integer token, returning its value and span.
    fn consume_integer(&mut self) -> PResult<(u64, Range<usize>)> {
        if !self.matches(TokenKind::Integer) {
            return self.unexpected_token(&[TokenKind::Integer]);
        }
        self.lexer.next();
        let span = self.lexer.span();
        match self.lexer.slice().parse() {
            Ok(x) => Ok((x, span)),
            Err(_) => self.error(ParseErrorKind::NumberTooLarge, span),
        }
    }

    fn parse_operator(&mut self) -> PResult<Option<BinaryOperator>> {
        let op = match self.peek() {
            None => return Ok(None),
            Some(TokenKind::Plus) => BinaryOperator::Add,
            Some(TokenKind::Minus) => BinaryOperator::Sub,
            Some(_) => return self.unexpected_token(TokenKind::OPERATORS),
        };
        self.lexer.next();
        Ok(Some(op))
    }

    fn parse_term(&mut self) -> PResult<DiceTerm> {
        match self.peek() {
            Some(TokenKind::Dice) => self.parse_dice_group(None),
            Some(TokenKind::Integer) => {
                let (x, span) = self.consume_integer()?;
                if self.matches(TokenKind::Dice) {
                    self.parse_dice_group(Some((x, span)))
                } else {
                    match Int::try_from(x) {
                        Ok(x) => Ok(DiceTerm::Constant(x)),
                        Err(_) => self.error(ParseErrorKind::NumberTooLarge, span),
                    }
                }
            }
            _ => self.unexpected_token(TokenKind::TERM_STARTS),
        }
    }

    fn parse_dice_group(&mut self, count: Option<(u64, Range<usize>)>) -> PResult<DiceTerm> {
        let count = match count {
            None => Num::MIN,
            Some((0, span)) => return self.error(ParseErrorKind::ZeroDice, span),
            Some((x, span)) if x > self.limits.max_dice as u64 => {
                let max = self.limits.max_dice;
                return self.error(ParseErrorKind::TooManyDice { count: x, max }, span);
            }
            // In range: non-zero and no larger than a `UInt` limit.
            Some((x, _)) => Num::new(x as UInt).unwrap_or(Num::MIN),
        };

        // The 'd' itself.
        self.lexer.next();
        let sides = self.parse_sides()?;

        let mut group = DiceGroup::new(count, sides);
        let mut kept = count.get();
        while self.matches_any(TokenKind::QUALIFIERS) {
            let qualifier = self.parse_qualifier(sides, kept)?;
            if let Some(remaining) = qualifier.remaining_after(kept) {
                kept = remaining;
            }
            group.qualifiers.push(qualifier);
        }

        Ok(DiceTerm::DiceGroup(group))
    }

    fn parse_sides(&mut self) -> PResult<UInt> {
        match self.peek() {
            Some(TokenKind::Percent) => {
                self.lexer.next();
                if self.limits.max_sides < 100 {
                    let max = self.limits.max_sides;
                    self.error(ParseErrorKind::TooManySides { sides: 100, max }, self.lexer.span())
                } else {
                    Ok(100)
                }
            }
            Some(TokenKind::Integer) => {
                let (sides, span) = self.consume_integer()?;
                if sides < 2 {
                    self.error(ParseErrorKind::TooFewSides(sides), span)
                } else if sides > self.limits.max_sides as u64 {
                    let max = self.limits.max_sides;
                    self.error(ParseErrorKind::TooManySides { sides, max }, span)
                } else {
                    Ok(sides as UInt)
                }
            }
            None => self.error_at_end(ParseErrorKind::MissingSides),
            Some(TokenKind::Error) => self.unexpected_token(TokenKind::SIDES),
            Some(_) => {
                self.lexer.next();
                self.error(ParseErrorKind::MissingSides, self.lexer.span())
            }
        }
    }

    /// Parses one qualifier for a group of `sides`-sided dice of which `kept`
    /// are still kept.
    fn parse_qualifier(&mut self, sides: UInt, kept: UInt) -> PResult<Qualifier> {
        let op = self.lexer.next().unwrap_or(TokenKind::Error);
        let start = self.lexer.span().start;

        match op {
            TokenKind::Reroll => {
                let threshold = self.optional_integer()?.unwrap_or(1);
                if threshold < 1 || threshold >= sides as u64 {
                    let kind = ParseErrorKind::InvalidRerollThreshold { threshold, sides };
                    return self.error(kind, start..self.lexer.span().end);
                }
                Ok(Reroll(threshold as UInt).into())
            }
            TokenKind::Explode => {
                let threshold = self.optional_integer()?;
                match threshold {
                    Some(t) if t < 2 || t > sides as u64 => {
                        let kind = ParseErrorKind::InvalidExplodeThreshold {
                            threshold: t,
                            sides,
                        };
                        self.error(kind, start..self.lexer.span().end)
                    }
                    t => Ok(Exploding(t.map(|t| t as UInt)).into()),
                }
            }
            _ => {
                let (n, span) = self.consume_integer()?;
                let span = start..span.end;
                let (prefix, qualifier): (&'static str, fn(UInt) -> Qualifier) = match op {
                    TokenKind::Keep | TokenKind::KeepHighest => {
                        (KeepHighest::PREFIX, |n| Qualifier::KeepHighest(KeepHighest(n)))
                    }
                    TokenKind::KeepLowest => {
                        (KeepLowest::PREFIX, |n| Qualifier::KeepLowest(KeepLowest(n)))
                    }
                    TokenKind::Dice | TokenKind::DropLowest => {
                        (DropLowest::PREFIX, |n| Qualifier::DropLowest(DropLowest(n)))
                    }
                    TokenKind::DropHighest => {
                        (DropHighest::PREFIX, |n| Qualifier::DropHighest(DropHighest(n)))
                    }
                    _ => unreachable!("{} is not a qualifier", op),
                };

                if n == 0 {
                    self.error(ParseErrorKind::EmptySelection(qualifier(0)), span)
                } else if n >= kept as u64 {
                    let kind = ParseErrorKind::SelectsAllDice {
                        qualifier: prefix,
                        count: n,
                        kept,
                    };
                    self.error(kind, span)
                } else {
                    // Below `kept`, so it fits.
                    Ok(qualifier(n as UInt))
                }
            }
        }
    }

    fn optional_integer(&mut self) -> PResult<Option<u64>> {
        if self.matches(TokenKind::Integer) {
            self.consume_integer().map(|(x, _)| Some(x))
        } else {
            Ok(None)
        }
    }
}
