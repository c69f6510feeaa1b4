use super::{DiceGroupRoll, RandomSource, RollResult};
use crate::common::*;
use crate::ops::{Phase, Qualify};
use crate::parse::ast::{DiceGroup, DiceTerm, Expression};
use std::collections::BTreeMap;

/// Evaluates parsed expressions against a borrowed [`RandomSource`].
pub struct RollContext<'s, S: RandomSource + ?Sized> {
    source: &'s mut S,
}

impl<'s, S: RandomSource + ?Sized> RollContext<'s, S> {
    pub fn new(source: &'s mut S) -> Self {
        Self { source }
    }

    /// # Panics
    ///
    /// If `expr` doesn't alternate value terms and operators, holds a group
    /// with fewer than two sides, or the source returns a value outside a
    /// die's range. None of these can happen for an expression the parser
    /// produced and a correct source.
    pub fn eval(&mut self, expr: &Expression<'_>) -> RollResult {
        let terms = expr.terms();
        assert_well_formed(terms);

        let mut dice = Vec::new();
        let mut rolls = Vec::new();
        let mut modifiers = BTreeMap::new();
        let mut total: Int = 0;
        let mut op = BinaryOperator::Add;

        for term in terms {
            match term {
                DiceTerm::Operator(next) => op = *next,
                DiceTerm::Constant(x) => {
                    let key = RollResult::modifier_key(modifiers.len() + 1);
                    modifiers.insert(key, op.signed(*x));
                    total = op.apply(total, *x);
                }
                DiceTerm::DiceGroup(group) => {
                    let rolled = self.roll_group(group);
                    total = op.apply(total, rolled.kept_sum());
                    rolls.extend(rolled.kept_values());
                    dice.extend(rolled.dice);
                }
            }
        }

        let result = RollResult::new(expr.notation(), dice, rolls, modifiers, total);
        tracing::debug!(notation = expr.notation(), total, output = %result.output, "rolled dice");
        result
    }

    fn roll_group(&mut self, group: &DiceGroup) -> DiceGroupRoll {
        let count = group.count.get() as usize;
        let mut rolled = DiceGroupRoll::roll_new(count, group.sides, &mut *self.source);

        for phase in [Phase::Generate, Phase::Filter] {
            for qualifier in group.qualifiers.iter().filter(|q| q.phase() == phase) {
                qualifier.apply(&mut rolled, &mut *self.source);
            }
        }
        rolled
    }
}

fn assert_well_formed(terms: &[DiceTerm]) {
    for (i, term) in terms.iter().enumerate() {
        assert_eq!(
            term.is_value(),
            i % 2 == 0,
            "ill-formed dice expression: unexpected {:?} at term {}",
            term,
            i
        );
        if let DiceTerm::DiceGroup(group) = term {
            assert_group_well_formed(group);
        }
    }
    assert!(
        terms.len() % 2 == 1,
        "ill-formed dice expression: ends with an operator"
    );
}

fn assert_group_well_formed(group: &DiceGroup) {
    assert!(group.sides >= 2, "ill-formed dice group: {}", group);
    let mut kept = group.count.get();
    for qualifier in &group.qualifiers {
        assert!(
            qualifier.accepts(group.sides, kept),
            "ill-formed dice group: '{}' cannot apply to {} with {} dice kept",
            qualifier,
            group,
            kept
        );
        if let Some(remaining) = qualifier.remaining_after(kept) {
            kept = remaining;
        }
    }
}

/// Evaluates `expr`, drawing die values from `source`.
pub fn evaluate<S: RandomSource + ?Sized>(expr: &Expression<'_>, source: &mut S) -> RollResult {
    RollContext::new(source).eval(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::*;
    use crate::parse::parse;
    use crate::roll::{DieRoll, ReplaySource, StepRoller};

    fn mock_roller() -> StepRoller {
        StepRoller::new(10, 1)
    }

    fn roll(s: &str, values: &[UInt]) -> RollResult {
        let expr = parse(s).unwrap();
        let mut source = ReplaySource::new(values.to_vec());
        let result = evaluate(&expr, &mut source);
        assert_eq!(source.remaining(), 0, "unused scripted values for {}", s);
        result
    }

    fn check(s: &str, expected: Int) {
        let expr = parse(s).unwrap();
        let actual = evaluate(&expr, &mut mock_roller());
        assert_eq!(expected, actual.total, "{}", actual);
    }

    #[test]
    fn test_eval_constant() {
        check("2", 2);
        check("2 + 3", 5);
        check("2 - 3", -1);
    }

    #[test]
    fn test_eval_dice() {
        check("1d20 + 4", 10 + 4);
        check("2d4", 2 + 3);
        check("8d6", 4 + 5 + 6 + 1 + 2 + 3 + 4 + 5);
        check("1d20 - 1d4", 10 - 3);
    }

    #[test]
    fn test_eval_op_dice() {
        check("2d20kh1", 11);
        check("2d20kl1", 10);
        check("8d6dh1dl1", 4 + 5 + 2 + 3 + 4 + 5);
        check("8d6r1", 4 + 5 + 6 + 2 + 3 + 4 + 5 + 6);
        check("8d6!", 4 + 5 + 6 + 1 + 2 + 3 + 4 + 5 + 6 + 1);
    }

    #[test]
    fn test_single_d20() {
        let result = roll("1d20", &[17]);
        assert_eq!(result.rolls, vec![17]);
        assert_eq!(result.total, 17);
        assert!(result.modifiers.is_empty());
        assert_eq!(result.output, "1d20: [17] (+0) = 17");
    }

    #[test]
    fn test_modifier_kept_apart_from_dice() {
        let result = roll("1d20+5", &[12]);
        assert_eq!(result.rolls, vec![12]);
        assert_eq!(result.total, 17);
        assert_eq!(result.modifiers.get("constant_1"), Some(&5));
        assert_eq!(result.output, "1d20+5: [12] (+5) = 17");
    }

    #[test]
    fn test_subtracted_modifier_is_signed() {
        let result = roll("2d6-1", &[3, 4]);
        assert_eq!(result.total, 6);
        assert_eq!(result.modifiers.get("constant_1"), Some(&-1));
        assert_eq!(result.output, "2d6-1: [3, 4] (-1) = 6");
    }

    #[test]
    fn test_several_modifiers() {
        let result = roll("1d4+2-3+10", &[4]);
        assert_eq!(result.total, 13);
        assert_eq!(result.modifiers.len(), 3);
        assert_eq!(result.modifiers["constant_1"], 2);
        assert_eq!(result.modifiers["constant_2"], -3);
        assert_eq!(result.modifiers["constant_3"], 10);
        assert_eq!(result.output, "1d4+2-3+10: [4] (+9) = 13");
    }

    #[test]
    fn test_modifiers_in_written_order() {
        let result = roll("1d4+1+2+3+4+5+6+7+8+9+10-11", &[4]);
        assert_eq!(result.modifiers.len(), 11);
        assert_eq!(result.modifiers["constant_11"], -11);

        let keys: Vec<_> = result.modifiers.keys().map(String::as_str).collect();
        assert_eq!(&keys[..3], ["constant_1", "constant_10", "constant_11"]);

        let ordered = result.modifiers_in_order();
        let values: Vec<Int> = ordered.iter().map(|&(_, v)| v).collect();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, -11]);
        assert_eq!(ordered[1].0, "constant_2");
        assert_eq!(result.total, 4 + 55 - 11);
    }

    #[test]
    fn test_drop_lowest() {
        let result = roll("4d6dl1", &[4, 2, 5, 2]);
        assert_eq!(result.rolls, vec![4, 5, 2]);
        assert_eq!(result.total, 11);
        assert_eq!(result.output, "4d6dl1: [4, 5, 2] (+0) = 11");

        let dropped: Vec<_> = result.dropped().collect();
        assert_eq!(dropped, vec![&DieRoll { sides: 6, value: 2, kept: false }]);
        assert!(!result.dice[1].kept);
        assert!(result.dice[3].kept);
    }

    #[test]
    fn test_qualifiers_only_see_own_group() {
        let result = roll("2d6dl1 + 2d6", &[5, 6, 1, 1]);
        assert_eq!(result.rolls, vec![6, 1, 1]);
        assert_eq!(result.total, 8);
    }

    #[test]
    fn test_generating_qualifiers_run_before_filters() {
        // The drop is written first but sees the rerolled value.
        let expr = Expression::new(
            "3d6dl1r1",
            NonEmpty::new(DiceTerm::DiceGroup(
                DiceGroup::new(Num::new(3).unwrap(), 6)
                    .with_qualifiers(vec![DropLowest(1).into(), Reroll(1).into()]),
            )),
        );
        let mut source = ReplaySource::new([1, 3, 4, 6]);
        let result = evaluate(&expr, &mut source);
        assert_eq!(result.rolls, vec![4, 6]);
        assert_eq!(result.dice.len(), 4);
    }

    #[test]
    fn test_exploding_adds_kept_dice() {
        let result = roll("2d6!", &[6, 2, 3]);
        assert_eq!(result.rolls, vec![6, 2, 3]);
        assert_eq!(result.total, 11);
    }

    #[test]
    fn test_reroll_reports_replaced_die() {
        let result = roll("1d20r1+2", &[1, 14]);
        assert_eq!(result.rolls, vec![14]);
        assert_eq!(result.total, 16);
        assert_eq!(result.dice.len(), 2);
        assert!(!result.dice[0].kept);
    }

    #[test]
    fn test_replay_reproduces_result() {
        let expr = parse("4d6dl1 + 1d8!r1 - 2").unwrap();
        let first = evaluate(&expr, &mut mock_roller());
        let again = evaluate(&expr, &mut first.replay());
        assert_eq!(first, again);
    }

    #[test]
    fn test_message() {
        let result = roll("1d20+5", &[12]);
        assert_eq!(result.message(), "Rolled 1d20+5: 1d20+5: [12] (+5) = 17");
    }

    #[test]
    #[should_panic(expected = "ill-formed dice expression")]
    fn test_ill_formed_sequence_panics() {
        let mut terms = NonEmpty::new(DiceTerm::Constant(1));
        terms.push(DiceTerm::Operator(BinaryOperator::Add));
        evaluate(&Expression::new("1+", terms), &mut mock_roller());
    }

    fn eval_group(count: u32, sides: UInt, qualifiers: Vec<Qualifier>) -> RollResult {
        let group = DiceGroup::new(Num::new(count).unwrap(), sides).with_qualifiers(qualifiers);
        let notation = group.to_string();
        let expr = Expression::new(&notation, NonEmpty::new(DiceTerm::DiceGroup(group)));
        evaluate(&expr, &mut mock_roller())
    }

    #[test]
    fn test_hand_built_group_is_accepted() {
        let result = eval_group(4, 6, vec![Reroll(1).into(), DropLowest(3).into()]);
        assert_eq!(result.rolls.len(), 1);
    }

    #[test]
    #[should_panic(expected = "ill-formed dice group: 'dl4'")]
    fn test_dropping_every_die_panics() {
        eval_group(4, 6, vec![DropLowest(4).into()]);
    }

    #[test]
    #[should_panic(expected = "ill-formed dice group: 'dh2'")]
    fn test_dropping_every_remaining_die_panics() {
        eval_group(4, 6, vec![DropLowest(2).into(), DropHighest(2).into()]);
    }

    #[test]
    #[should_panic(expected = "ill-formed dice group: 'kh0'")]
    fn test_empty_keep_panics() {
        eval_group(4, 6, vec![KeepHighest(0).into()]);
    }

    #[test]
    #[should_panic(expected = "ill-formed dice group: 'r6'")]
    fn test_reroll_on_every_face_panics() {
        eval_group(2, 6, vec![Reroll(6).into()]);
    }

    #[test]
    #[should_panic(expected = "ill-formed dice group: '!7'")]
    fn test_unreachable_explode_panics() {
        eval_group(2, 6, vec![Exploding(Some(7)).into()]);
    }

    #[test]
    #[should_panic(expected = "returned 9 for a d6")]
    fn test_out_of_range_source_panics() {
        roll("1d6", &[9]);
    }
}
