use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
/// Per-instruction attributes that are not positional operands.
///
/// The low bits are shared: branches and ALU ops keep a condition code in
/// bits 4..0, loads and stores keep their size/writeback/sign-extend
/// qualifiers in the same place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Aux: u32 {
const COND = 0x1F; // condition code field
const X = 1 << 0; // sign extend (.x)
const SIZE_B = 1 << 1; // byte access (.b)
const SIZE_W = 1 << 2; // halfword access (.w)
const SIZE = 0x06;
const AA_A = 1 << 3; // pre-update (.a)
const AA_AB = 1 << 4; // post-update (.ab)
const AA_AS = 0x18; // scaled index (.as)
const AA = 0x18;
const DI = 1 << 5; // direct, uncached access (.di)
const D = 1 << 5; // delay slot executed (.d)
const JD = 1 << 6; // delay slot on jump taken (.jd)
const DELAY = 0x60;
const F = 1 << 8; // update flags (.f)
const PCLOAD = 1 << 9; // pc-relative load rewritten to an absolute address
}
}

/// Access width of a load/store or of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Width {
    Byte,
    Half,
    #[default]
    Word,
}

impl Width {
    pub fn bytes(self) -> u32 {
        match self {
            Width::Byte => 1,
            Width::Half => 2,
            Width::Word => 4,
        }
    }
}

/// Address writeback mode of a load/store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddrMode {
    None,
    PreUpdate,
    PostUpdate,
    Scaled,
}

impl Aux {
    pub fn cond(self) -> u8 {
        (self.bits() & Aux::COND.bits()) as u8
    }

    pub fn with_cond(self, cond: u32) -> Aux {
        Aux::from_bits_retain((self.bits() & !Aux::COND.bits()) | (cond & Aux::COND.bits()))
    }

    pub fn width(self) -> Width {
        match self.bits() & Aux::SIZE.bits() {
            0x02 => Width::Byte,
            0x04 => Width::Half,
            _ => Width::Word,
        }
    }

    pub fn with_width(self, w: Width) -> Aux {
        let size = match w {
            Width::Byte => Aux::SIZE_B,
            Width::Half => Aux::SIZE_W,
            Width::Word => Aux::empty(),
        };
        (self - Aux::SIZE) | size
    }

    pub fn addr_mode(self) -> AddrMode {
        match self.bits() & Aux::AA.bits() {
            0x08 => AddrMode::PreUpdate,
            0x10 => AddrMode::PostUpdate,
            0x18 => AddrMode::Scaled,
            _ => AddrMode::None,
        }
    }

    /// Replace the low six bits (the load/store qualifier group).
    pub fn with_ldst_bits(self, v: u32) -> Aux {
        Aux::from_bits_retain((self.bits() & !0x3F) | (v & 0x3F))
    }
}

/// Condition code names, indexed by the 5-bit condition field.
pub const COND_NAMES: [&str; 16] = [
    "al", "eq", "ne", "pl", "mi", "lo", "hs", "vs", "vc", "gt", "ge", "lt", "le", "hi", "ls",
    "pnz",
];

pub mod cond {
    pub const AL: u32 = 0;
    pub const EQ: u32 = 1;
    pub const NE: u32 = 2;
    pub const PL: u32 = 3;
    pub const MI: u32 = 4;
    pub const LO: u32 = 5;
    pub const HS: u32 = 6;
    pub const VS: u32 = 7;
    pub const VC: u32 = 8;
    pub const GT: u32 = 9;
    pub const GE: u32 = 10;
    pub const LT: u32 = 11;
    pub const LE: u32 = 12;
    pub const HI: u32 = 13;
    pub const LS: u32 = 14;
    pub const PNZ: u32 = 15;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_low_bits() {
        let a = Aux::empty().with_cond(cond::NE) | Aux::F;
        assert_eq!(a.cond(), 2);
        assert!(a.contains(Aux::F));

        let ld = Aux::empty().with_ldst_bits(0b01_10_1 | (1 << 5));
        assert_eq!(ld.width(), Width::Half);
        assert_eq!(ld.addr_mode(), AddrMode::PreUpdate);
        assert!(ld.contains(Aux::X));
        assert!(ld.contains(Aux::DI));
    }

    #[test]
    fn width_round_trips_through_size_bits() {
        for w in [Width::Byte, Width::Half, Width::Word] {
            assert_eq!(Aux::AA_AS.with_width(w).width(), w);
            assert_eq!(Aux::AA_AS.with_width(w).addr_mode(), AddrMode::Scaled);
        }
    }
}
