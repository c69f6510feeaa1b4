//! The shape a roll takes once it leaves the engine.
//!
//! Chat hosts store each roll as a message line plus a roll record; both are
//! derived from a [`RollResult`] here so every host renders them the same way.

use crate::common::{Int, UInt};
use crate::roll::RollResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A roll as persisted next to its chat message.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RollRecord {
    pub dice_notation: String,
    pub individual_rolls: Vec<UInt>,
    pub modifiers: BTreeMap<String, Int>,
    pub total: Int,
}

impl From<&RollResult> for RollRecord {
    fn from(result: &RollResult) -> Self {
        Self {
            dice_notation: result.notation.clone(),
            individual_rolls: result.rolls.clone(),
            modifiers: result.modifiers.clone(),
            total: result.total,
        }
    }
}

impl From<RollResult> for RollRecord {
    fn from(result: RollResult) -> Self {
        Self {
            dice_notation: result.notation,
            individual_rolls: result.rolls,
            modifiers: result.modifiers,
            total: result.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::ReplaySource;

    fn result(s: &str, values: &[UInt]) -> RollResult {
        crate::roll_with(s, &mut ReplaySource::new(values.to_vec())).unwrap()
    }

    #[test]
    fn test_record_json_shape() {
        let record = RollRecord::from(&result("1d20+5", &[12]));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "dice_notation": "1d20+5",
                "individual_rolls": [12],
                "modifiers": { "constant_1": 5 },
                "total": 17
            })
        );
    }

    #[test]
    fn test_record_keeps_only_kept_dice() {
        let record = RollRecord::from(result("4d6dl1", &[3, 1, 6, 4]));
        assert_eq!(record.individual_rolls, vec![3, 6, 4]);
        assert_eq!(record.total, 13);
        assert!(record.modifiers.is_empty());
    }

    #[test]
    fn test_result_survives_json() {
        let original = result("4d6dl1 + 1d8 - 2", &[3, 1, 6, 4, 8]);
        let json = serde_json::to_string(&original).unwrap();
        let back: RollResult = serde_json::from_str(&json).unwrap();
        assert_eq!(original, back);
    }
}
