use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::{DecoderConfig, Mode};
use crate::flags::{Aux, Width};
use crate::isa::{compact::CompactDecoder, legacy::LegacyDecoder};
use crate::memory::Memory;
use crate::simplify;

pub use crate::instructions::Op;

/// Where an operand's value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpValue {
    #[default]
    Void,
    Reg(u8),
    Imm(u32),
    /// `[base, disp]`; with `imm_base` the immediate is the base and `base`
    /// the index register (`[#imm, reg]`).
    Displ { base: u8, disp: i32, imm_base: bool },
    /// `[base, index]`
    Phrase { base: u8, index: u8 },
    /// Absolute data address.
    Mem(u32),
    /// Absolute code address.
    Near(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Operand {
    pub value: OpValue,
    pub width: Width,
}

impl Operand {
    pub const VOID: Operand = Operand { value: OpValue::Void, width: Width::Word };

    pub fn new(value: OpValue) -> Self {
        Self { value, width: Width::Word }
    }
    pub fn reg(r: u8) -> Self {
        Self::new(OpValue::Reg(r))
    }
    pub fn imm(v: u32) -> Self {
        Self::new(OpValue::Imm(v))
    }
    pub fn near(addr: u32) -> Self {
        Self::new(OpValue::Near(addr))
    }
    pub fn mem(addr: u32) -> Self {
        Self::new(OpValue::Mem(addr))
    }
    pub fn displ(base: u8, disp: i32) -> Self {
        Self::new(OpValue::Displ { base, disp, imm_base: false })
    }

    pub fn is_void(&self) -> bool {
        self.value == OpValue::Void
    }

    pub fn is_imm(&self, v: u32) -> bool {
        self.value == OpValue::Imm(v)
    }
}

/// One decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub ea: u32,
    /// Bytes consumed, long immediate included.
    pub size: u8,
    pub op: Op,
    pub ops: [Operand; 3],
    pub aux: Aux,
}

impl Decoded {
    pub fn new(ea: u32, op: Op) -> Self {
        Self { ea, size: 0, op, ops: [Operand::VOID; 3], aux: Aux::empty() }
    }

    /// Number of leading non-void operands.
    pub fn operand_count(&self) -> usize {
        self.ops.iter().take_while(|o| !o.is_void()).count()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("Misaligned instruction address {ea:#010x}")]
    Misaligned { ea: u32 },
    #[error("No instruction assigned to {code:#010x} at {ea:#010x}")]
    Unassigned { ea: u32, code: u32 },
    #[error("Truncated instruction at {ea:#010x}: {source}")]
    Truncated {
        ea: u32,
        #[source]
        source: anyhow::Error,
    },
}

impl DecodeError {
    pub fn ea(&self) -> u32 {
        match self {
            DecodeError::Misaligned { ea }
            | DecodeError::Unassigned { ea, .. }
            | DecodeError::Truncated { ea, .. } => *ea,
        }
    }
}

pub trait Decoder {
    fn decode<M: Memory + ?Sized>(&self, mem: &M, ea: u32) -> Result<Decoded, DecodeError>;
}

/// Entry point: selects the encoding and applies the post-decode passes.
#[derive(Debug, Clone, Default)]
pub struct ArcDecoder {
    cfg: DecoderConfig,
}

impl ArcDecoder {
    pub fn new(cfg: DecoderConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.cfg
    }
}

impl Decoder for ArcDecoder {
    fn decode<M: Memory + ?Sized>(&self, mem: &M, ea: u32) -> Result<Decoded, DecodeError> {
        let cfg = self.cfg;
        let mut d = match cfg.mode {
            Mode::Compact => CompactDecoder.decode(mem, ea)?,
            Mode::Legacy => LegacyDecoder { fold_pseudo: cfg.simplify }.decode(mem, ea)?,
        };
        simplify::fix_ldst(&mut d);
        if cfg.simplify {
            simplify::simplify(&mut d);
        }
        if cfg.inline_const {
            simplify::inline_const(&mut d, mem);
        }
        trace!(ea = format_args!("{ea:#010x}"), size = d.size, op = d.op.mnemonic(), "decoded");
        Ok(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::LinearMemory;

    #[test]
    fn errors_name_the_address() {
        let e = DecodeError::Unassigned { ea: 0x40, code: 0x3000_0000 };
        assert_eq!(e.to_string(), "No instruction assigned to 0x30000000 at 0x00000040");

        let mem = LinearMemory::new(2);
        let e = ArcDecoder::new(DecoderConfig::legacy()).decode(&mem, 0).unwrap_err();
        assert!(matches!(e, DecodeError::Truncated { ea: 0, .. }));
        assert!(std::error::Error::source(&e).is_some());
    }

    #[test]
    fn leading_operands_are_counted() {
        let mut d = Decoded::new(0, Op::Push);
        assert_eq!(d.operand_count(), 0);
        d.ops[0] = Operand::reg(1);
        assert_eq!(d.operand_count(), 1);
    }
}
