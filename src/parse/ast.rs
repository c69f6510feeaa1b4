use crate::common::*;
use crate::ops::Qualifier;
use std::fmt;

/// A parsed dice expression: the notation it came from and its terms.
///
/// Terms alternate between value terms ([`DiceTerm::DiceGroup`] or
/// [`DiceTerm::Constant`]) and [`DiceTerm::Operator`], starting and ending with
/// a value term.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression<'a> {
    pub(crate) notation: &'a str,
    pub(crate) terms: NonEmpty<DiceTerm>,
}

impl<'a> Expression<'a> {
    pub fn new(notation: &'a str, terms: NonEmpty<DiceTerm>) -> Self {
        Self { notation, terms }
    }

    /// The original input, verbatim.
    pub fn notation(&self) -> &'a str {
        self.notation
    }

    pub fn terms(&self) -> &[DiceTerm] {
        &self.terms
    }
}

impl fmt::Display for Expression<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in self.terms.iter() {
            write!(f, "{}", term)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum DiceTerm {
    DiceGroup(DiceGroup),
    Constant(Int),
    Operator(BinaryOperator),
}

impl DiceTerm {
    pub fn is_value(&self) -> bool {
        !matches!(self, Self::Operator(_))
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DiceGroup(group) => fmt::Display::fmt(group, f),
            Self::Constant(x) => fmt::Display::fmt(x, f),
            Self::Operator(op) => fmt::Display::fmt(op, f),
        }
    }
}

impl From<DiceGroup> for DiceTerm {
    fn from(group: DiceGroup) -> Self {
        Self::DiceGroup(group)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DiceGroup {
    pub count: Num,
    pub sides: UInt,
    pub qualifiers: Vec<Qualifier>,
}

impl DiceGroup {
    pub fn new(count: Num, sides: UInt) -> Self {
        Self {
            count,
            sides,
            qualifiers: Vec::new(),
        }
    }

    pub fn with_qualifiers(mut self, qualifiers: Vec<Qualifier>) -> Self {
        self.qualifiers = qualifiers;
        self
    }
}

impl fmt::Display for DiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        for qualifier in &self.qualifiers {
            write!(f, "{}", qualifier)?;
        }
        Ok(())
    }
}
