use serde::Serialize;

/// A one-click roll offered next to the chat input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Preset {
    pub label: &'static str,
    pub notation: &'static str,
}

impl Preset {
    const fn new(label: &'static str, notation: &'static str) -> Self {
        Self { label, notation }
    }
}

pub const COMMON_ROLLS: &[Preset] = &[
    Preset::new("d20", "1d20"),
    Preset::new("d20 + 5", "1d20+5"),
    Preset::new("d6", "1d6"),
    Preset::new("2d6", "2d6"),
    Preset::new("d100", "1d100"),
    Preset::new("4d6 drop lowest", "4d6dl1"),
];
