use super::{stringify, ReplaySource};
use crate::common::{Int, UInt};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const MODIFIER_PREFIX: &str = "constant_";

/// One physical die.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct DieRoll {
    pub sides: UInt,
    pub value: UInt,
    /// `false` once a qualifier dropped the die or a reroll replaced it.
    pub kept: bool,
}

impl DieRoll {
    pub fn new(sides: UInt, value: UInt) -> Self {
        Self {
            sides,
            value,
            kept: true,
        }
    }

    pub(crate) fn drop(&mut self) {
        self.kept = false;
    }
}

/// The outcome of evaluating a dice expression.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RollResult {
    pub notation: String,
    /// Kept die values across all groups, in roll order.
    pub rolls: Vec<UInt>,
    /// Signed constants, keyed `constant_<k>` for the `k`th constant written.
    ///
    /// Map order is by key text, so `constant_10` sorts before `constant_2`;
    /// see [`RollResult::modifiers_in_order`].
    pub modifiers: BTreeMap<String, Int>,
    pub total: Int,
    pub output: String,
    /// Every die drawn, kept or not, in draw order.
    pub dice: Vec<DieRoll>,
}

impl RollResult {
    pub(crate) fn new(
        notation: &str,
        dice: Vec<DieRoll>,
        rolls: Vec<UInt>,
        modifiers: BTreeMap<String, Int>,
        total: Int,
    ) -> Self {
        let mut ret = Self {
            notation: notation.to_string(),
            rolls,
            modifiers,
            total,
            output: String::new(),
            dice,
        };
        ret.output = stringify::output(&ret.notation, &ret.rolls, ret.modifier_total(), total);
        ret
    }

    pub(crate) fn modifier_key(ordinal: usize) -> String {
        format!("{}{}", MODIFIER_PREFIX, ordinal)
    }

    fn modifier_ordinal(key: &str) -> Option<usize> {
        key.strip_prefix(MODIFIER_PREFIX)?.parse().ok()
    }

    /// Constant modifiers in the order they appear in the notation.
    pub fn modifiers_in_order(&self) -> Vec<(&str, Int)> {
        let mut ordered: Vec<_> = self
            .modifiers
            .iter()
            .map(|(key, &value)| (key.as_str(), value))
            .collect();
        ordered.sort_by_key(|(key, _)| Self::modifier_ordinal(key));
        ordered
    }

    /// Sum of all constant modifiers.
    pub fn modifier_total(&self) -> Int {
        self.modifiers
            .values()
            .fold(0, |acc: Int, x| acc.saturating_add(*x))
    }

    /// Dice removed by a qualifier, in draw order.
    pub fn dropped(&self) -> impl Iterator<Item = &DieRoll> {
        self.dice.iter().filter(|d| !d.kept)
    }

    /// A source that replays this result's dice in draw order.
    pub fn replay(&self) -> ReplaySource {
        ReplaySource::new(self.dice.iter().map(|d| d.value))
    }

    /// The chat line announcing this roll.
    pub fn message(&self) -> String {
        format!("Rolled {}: {}", self.notation, self.output)
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output)
    }
}
