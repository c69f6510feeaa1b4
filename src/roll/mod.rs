mod eval;
mod group;
mod result;
mod source;
mod stringify;

pub use eval::{evaluate, RollContext};
pub use group::DiceGroupRoll;
pub use result::{DieRoll, RollResult};
pub use source::{RandomSource, ReplaySource};

#[cfg(test)]
pub(crate) use source::StepRoller;
