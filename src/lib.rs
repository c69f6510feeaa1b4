pub mod common;
pub mod ops;
pub mod parse;
pub mod presets;
pub mod record;
pub mod roll;

pub use parse::{parse, parse_with, Limits, ParseError, ParseErrorKind};
pub use record::RollRecord;
pub use roll::{evaluate, DieRoll, RandomSource, ReplaySource, RollResult};

pub(crate) type DefaultRng = rand::rngs::ThreadRng;

/// Parses `notation` and rolls it with the thread-local RNG.
pub fn roll(notation: &str) -> Result<RollResult, ParseError> {
    let mut rng: DefaultRng = rand::thread_rng();
    roll_with(notation, &mut rng)
}

/// Parses `notation` and rolls it, drawing die values from `source`.
pub fn roll_with<S: RandomSource + ?Sized>(
    notation: &str,
    source: &mut S,
) -> Result<RollResult, ParseError> {
    let expr = parse(notation)?;
    Ok(evaluate(&expr, source))
}
