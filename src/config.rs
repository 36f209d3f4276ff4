use serde::{Deserialize, Serialize};

/// Which instruction encoding the image uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// ARCompact: 16/32-bit parcels, optional trailing long immediate.
    #[default]
    Compact,
    /// ARCtangent-A4: fixed 32-bit words.
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub mode: Mode,
    /// Rewrite pseudo-instructions into their named forms.
    pub simplify: bool,
    /// Replace pc-relative literal loads with absolute memory references.
    pub inline_const: bool,
}

impl DecoderConfig {
    pub fn legacy() -> Self {
        Self { mode: Mode::Legacy, ..Self::default() }
    }

    /// Minimum instruction alignment for the selected encoding.
    pub fn alignment(&self) -> u32 {
        match self.mode {
            Mode::Compact => 2,
            Mode::Legacy => 4,
        }
    }
}
