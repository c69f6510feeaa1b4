use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::num::NonZeroU32;

pub type Int = i64;
pub type UInt = u32;

/// The number of dice in a group.
pub type Num = NonZeroU32;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
}

impl BinaryOperator {
    pub(crate) fn apply(self, total: Int, value: Int) -> Int {
        match self {
            Self::Add => total.saturating_add(value),
            Self::Sub => total.saturating_sub(value),
        }
    }

    pub(crate) fn signed(self, value: Int) -> Int {
        match self {
            Self::Add => value,
            Self::Sub => value.saturating_neg(),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
        };
        f.write_char(c)
    }
}
