use crate::common::UInt;
use crate::roll::{DiceGroupRoll, RandomSource};
use std::fmt;

/// Upper bound on the dice a single reroll or exploding qualifier may add to a group.
pub const MAX_EXTRA_ROLLS: usize = 100;

/// When a qualifier runs relative to the others on the same group.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Phase {
    /// Draws additional dice.
    Generate,
    /// Marks already drawn dice as not kept.
    Filter,
}

#[enum_dispatch::enum_dispatch]
pub trait Qualify {
    fn phase(&self) -> Phase;

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, source: &mut S);
}

/// A suffix on a dice group that changes which dice are drawn or kept.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[enum_dispatch::enum_dispatch(Qualify)]
pub enum Qualifier {
    KeepHighest(KeepHighest),
    KeepLowest(KeepLowest),
    DropHighest(DropHighest),
    DropLowest(DropLowest),
    Reroll(Reroll),
    Exploding(Exploding),
}

impl Qualifier {
    /// The number of kept dice left after this qualifier filters `kept` dice,
    /// or `None` for qualifiers that don't filter.
    pub(crate) fn remaining_after(&self, kept: UInt) -> Option<UInt> {
        match *self {
            Self::KeepHighest(KeepHighest(n)) | Self::KeepLowest(KeepLowest(n)) => Some(n),
            Self::DropHighest(DropHighest(n)) | Self::DropLowest(DropLowest(n)) => {
                Some(kept.saturating_sub(n))
            }
            Self::Reroll(_) | Self::Exploding(_) => None,
        }
    }

    /// Whether this qualifier makes sense on `sides`-sided dice of which
    /// `kept` are still kept.
    pub(crate) fn accepts(&self, sides: UInt, kept: UInt) -> bool {
        match *self {
            Self::KeepHighest(KeepHighest(n))
            | Self::KeepLowest(KeepLowest(n))
            | Self::DropHighest(DropHighest(n))
            | Self::DropLowest(DropLowest(n)) => (1..kept).contains(&n),
            Self::Reroll(Reroll(t)) => (1..sides).contains(&t),
            Self::Exploding(Exploding(t)) => t.map_or(true, |t| (2..=sides).contains(&t)),
        }
    }
}

impl fmt::Display for Qualifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepHighest(x) => x.fmt(f),
            Self::KeepLowest(x) => x.fmt(f),
            Self::DropHighest(x) => x.fmt(f),
            Self::DropLowest(x) => x.fmt(f),
            Self::Reroll(x) => x.fmt(f),
            Self::Exploding(x) => x.fmt(f),
        }
    }
}

macro_rules! filter_impl {
    ($(($name:ident, $disp:literal)),+ $(,)?) => {
        $(
            #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
            pub struct $name(pub UInt);

            impl $name {
                pub const PREFIX: &'static str = $disp;
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}{}", Self::PREFIX, self.0)
                }
            }
        )+
    };
}

filter_impl!(
    (KeepHighest, "kh"),
    (KeepLowest, "kl"),
    (DropHighest, "dh"),
    (DropLowest, "dl"),
);

impl Qualify for KeepHighest {
    fn phase(&self) -> Phase {
        Phase::Filter
    }

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, _: &mut S) {
        let excess = group.kept_count().saturating_sub(self.0 as usize);
        group.drop_lowest(excess);
    }
}

impl Qualify for KeepLowest {
    fn phase(&self) -> Phase {
        Phase::Filter
    }

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, _: &mut S) {
        let excess = group.kept_count().saturating_sub(self.0 as usize);
        group.drop_highest(excess);
    }
}

impl Qualify for DropHighest {
    fn phase(&self) -> Phase {
        Phase::Filter
    }

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, _: &mut S) {
        group.drop_highest(self.0 as usize);
    }
}

impl Qualify for DropLowest {
    fn phase(&self) -> Phase {
        Phase::Filter
    }

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, _: &mut S) {
        group.drop_lowest(self.0 as usize);
    }
}

/// Rerolls every die showing `threshold` or less.
///
/// The replaced die stays in the group, marked as not kept; its replacement is
/// appended and may be rerolled again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Reroll(pub UInt);

impl Qualify for Reroll {
    fn phase(&self) -> Phase {
        Phase::Generate
    }

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, source: &mut S) {
        let mut extra = 0;
        let mut i = 0;
        while i < group.dice.len() && extra < MAX_EXTRA_ROLLS {
            let die = &mut group.dice[i];
            if die.kept && die.value <= self.0 {
                die.kept = false;
                group.roll_another(source);
                extra += 1;
            }
            i += 1;
        }
    }
}

impl fmt::Display for Reroll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Adds a die for every die showing `threshold` or more, the group's maximum
/// face when no threshold is given.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Exploding(pub Option<UInt>);

impl Qualify for Exploding {
    fn phase(&self) -> Phase {
        Phase::Generate
    }

    fn apply<S: RandomSource + ?Sized>(&self, group: &mut DiceGroupRoll, source: &mut S) {
        let threshold = self.0.unwrap_or(group.sides);
        let mut extra = 0;
        let mut i = 0;
        while i < group.dice.len() && extra < MAX_EXTRA_ROLLS {
            let die = &group.dice[i];
            if die.kept && die.value >= threshold {
                group.roll_another(source);
                extra += 1;
            }
            i += 1;
        }
    }
}

impl fmt::Display for Exploding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(t) => write!(f, "!{}", t),
            None => f.write_str("!"),
        }
    }
}
