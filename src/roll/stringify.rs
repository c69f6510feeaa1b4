use crate::common::{Int, UInt};

/// Renders `<notation>: [<kept values>] (<signed constants>) = <total>`.
pub(crate) fn output(notation: &str, kept: &[UInt], constants: Int, total: Int) -> String {
    let dice = kept
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{}: [{}] ({:+}) = {}", notation, dice, constants, total)
}
