use super::result::DieRoll;
use super::source::{draw, RandomSource};
use crate::common::{Int, UInt};
use std::cmp::Reverse;

/// The dice drawn for one dice group, in draw order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiceGroupRoll {
    pub sides: UInt,
    pub dice: Vec<DieRoll>,
}

impl DiceGroupRoll {
    pub(crate) fn roll_new<S: RandomSource + ?Sized>(
        count: usize,
        sides: UInt,
        source: &mut S,
    ) -> Self {
        let mut ret = Self {
            sides,
            dice: Vec::with_capacity(count),
        };
        for _ in 0..count {
            ret.roll_another(source);
        }
        ret
    }

    pub(crate) fn roll_another<S: RandomSource + ?Sized>(&mut self, source: &mut S) {
        let value = draw(source, self.sides);
        self.dice.push(DieRoll::new(self.sides, value));
    }

    pub fn kept_count(&self) -> usize {
        self.dice.iter().filter(|d| d.kept).count()
    }

    pub fn kept_values(&self) -> impl Iterator<Item = UInt> + '_ {
        self.dice.iter().filter(|d| d.kept).map(|d| d.value)
    }

    pub fn kept_sum(&self) -> Int {
        self.kept_values().map(Int::from).sum()
    }

    /// Drops the `n` lowest kept dice; among equal values the earliest drawn goes first.
    pub(crate) fn drop_lowest(&mut self, n: usize) {
        self.drop_by(n, |value| value);
    }

    /// Drops the `n` highest kept dice; among equal values the earliest drawn goes first.
    pub(crate) fn drop_highest(&mut self, n: usize) {
        self.drop_by(n, Reverse);
    }

    fn drop_by<K: Ord>(&mut self, n: usize, key: impl Fn(UInt) -> K) {
        let mut kept: Vec<usize> = (0..self.dice.len()).filter(|&i| self.dice[i].kept).collect();
        // Stable, so ties stay in draw order.
        kept.sort_by_key(|&i| key(self.dice[i].value));
        for i in kept.into_iter().take(n) {
            self.dice[i].drop();
        }
    }
}
