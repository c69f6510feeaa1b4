use logos::Logos;
use logos_iter::{LogosIter, PeekableLexer};
use std::fmt;

pub(crate) type Lexer<'a> = PeekableLexer<'a, logos::Lexer<'a, TokenKind>, TokenKind>;

pub(crate) fn lexer(s: &str) -> Lexer {
    TokenKind::lexer(s).peekable_lexer()
}

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TokenKind {
    #[regex(r"[0-9]+")]
    Integer,

    #[regex("[dD]")]
    Dice,
    #[token("%")]
    Percent,

    #[regex("[kK]")]
    Keep,
    #[regex("[kK][hH]")]
    KeepHighest,
    #[regex("[kK][lL]")]
    KeepLowest,
    #[regex("[dD][hH]")]
    DropHighest,
    #[regex("[dD][lL]")]
    DropLowest,
    #[regex("[rR]")]
    Reroll,
    #[token("!")]
    Explode,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub const OPERATORS: &'static [Self] = &[Self::Plus, Self::Minus];

    pub const TERM_STARTS: &'static [Self] = &[Self::Integer, Self::Dice];

    pub const SIDES: &'static [Self] = &[Self::Integer, Self::Percent];

    /// Tokens that may follow the sides of a dice group. A bare `d` here means
    /// drop-lowest.
    pub const QUALIFIERS: &'static [Self] = &[
        Self::Keep,
        Self::KeepHighest,
        Self::KeepLowest,
        Self::Dice,
        Self::DropHighest,
        Self::DropLowest,
        Self::Reroll,
        Self::Explode,
    ];

    pub fn to_str(self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer => "<integer>",
            Dice => "'d'",
            Percent => "'%'",
            Keep => "'k'",
            KeepHighest => "'kh'",
            KeepLowest => "'kl'",
            DropHighest => "'dh'",
            DropLowest => "'dl'",
            Reroll => "'r'",
            Explode => "'!'",
            Plus => "'+'",
            Minus => "'-'",
            Error => "<error>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
