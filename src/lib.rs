pub mod bits;
pub mod config;
pub mod context;
pub mod decoder;
pub mod disasm;
pub mod flags;
pub mod instructions;
pub mod memory;
pub mod regs;
pub mod simplify;

pub mod isa {
    pub mod compact; // ARCompact 16/32-bit
    pub mod legacy; // ARCtangent-A4 32-bit
    pub mod operand;
    pub mod table;
}

pub use config::{DecoderConfig, Mode};
pub use decoder::{ArcDecoder, DecodeError, Decoded, Decoder, OpValue, Operand};
pub use memory::{LinearMemory, Memory};
