use crate::common::UInt;
use rand::Rng;
use std::collections::VecDeque;

/// Where die values come from.
pub trait RandomSource {
    /// Returns a uniformly distributed value in `1..=sides`.
    fn roll(&mut self, sides: UInt) -> UInt;
}

impl<R: Rng> RandomSource for R {
    fn roll(&mut self, sides: UInt) -> UInt {
        self.gen_range(1..=sides)
    }
}

/// Draws one value, checking that the source honoured its range.
pub(crate) fn draw<S: RandomSource + ?Sized>(source: &mut S, sides: UInt) -> UInt {
    let value = source.roll(sides);
    assert!(
        (1..=sides).contains(&value),
        "random source returned {} for a d{}",
        value,
        sides
    );
    tracing::trace!(sides, value, "drew die");
    value
}

/// Hands out a fixed sequence of values, in order.
///
/// Feeding it the dice of an earlier result reproduces that result exactly.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct ReplaySource {
    values: VecDeque<UInt>,
}

impl ReplaySource {
    pub fn new(values: impl IntoIterator<Item = UInt>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }

    /// Values not handed out yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl RandomSource for ReplaySource {
    fn roll(&mut self, sides: UInt) -> UInt {
        match self.values.pop_front() {
            Some(value) => value,
            None => panic!("replay source ran out of values for a d{}", sides),
        }
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;


#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rng_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for sides in [2, 6, 20, 100] {
            for _ in 0..200 {
                let x = draw(&mut rng, sides);
                assert!((1..=sides).contains(&x));
            }
        }
    }

    #[test]
    fn test_replay_in_order() {
        let mut source = ReplaySource::new([3, 1, 4]);
        assert_eq!(source.roll(6), 3);
        assert_eq!(source.roll(6), 1);
        assert_eq!(source.remaining(), 1);
        assert_eq!(source.roll(6), 4);
    }

    #[test]
    #[should_panic(expected = "ran out of values")]
    fn test_replay_exhausted() {
        ReplaySource::default().roll(6);
    }

    #[test]
    #[should_panic(expected = "returned 7 for a d6")]
    fn test_out_of_range_value_panics() {
        draw(&mut ReplaySource::new([7]), 6);
    }

    #[test]
    fn test_step_roller_wraps() {
        let mut roller = StepRoller::new(5, 1);
        let values: Vec<_> = (0..4).map(|_| roller.roll(6)).collect();
        assert_eq!(values, vec![5, 6, 1, 2]);
    }
}
