//! ARCompact opcode trie.
//!
//! The root is indexed by the major opcode (bits 15..11 of the first
//! parcel). Each entry either names an instruction or points at a child
//! table indexed by one or two further bit ranges of the instruction word.

use bitflags::bitflags;

use crate::bits::bits;
use crate::flags::cond::*;
use crate::instructions::Op;

/// Aux-mask group bits. The low five bits carry a fixed condition when
/// [`aux::CND`] is set.
pub mod aux {
    pub const COND: u32 = 0x1F;
    pub const B: u32 = 1 << 8; // implicit byte access
    pub const W: u32 = 1 << 9; // implicit halfword access
    pub const Q_4_0: u32 = 1 << 10; // condition in bits 4..0
    pub const AAZZXD_23_15: u32 = 1 << 11; // aa, ZZ, X, Di of ld [b,c]
    pub const DAAZZX_11_6: u32 = 1 << 12; // Di, aa, ZZ, X of ld [b,s9]
    pub const DAAZZR_5_0: u32 = 1 << 13; // Di, aa, ZZ, R of st [b,s9]
    pub const D: u32 = 1 << 14; // implicit delay slot
    pub const X: u32 = 1 << 15; // implicit sign extension
    pub const CND: u32 = 1 << 16; // condition fixed by the table
    pub const N_5: u32 = 1 << 17; // delay slot bit 5
    pub const GEN: u32 = 1 << 18; // F at bit 15, cond in 4..0 if 23..22 = 3
    pub const GEN2: u32 = 1 << 19; // cond in 4..0 if 23..22 = 3

    pub const fn cnd(c: u32) -> u32 {
        CND | c
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxMask: u32 {
const COND = aux::COND;
const B = aux::B;
const W = aux::W;
const Q_4_0 = aux::Q_4_0;
const AAZZXD_23_15 = aux::AAZZXD_23_15;
const DAAZZX_11_6 = aux::DAAZZX_11_6;
const DAAZZR_5_0 = aux::DAAZZR_5_0;
const D = aux::D;
const X = aux::X;
const CND = aux::CND;
const N_5 = aux::N_5;
const GEN = aux::GEN;
const GEN2 = aux::GEN2;
}
}

/// How to pull one operand out of the instruction word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    A32,   //  5..0          6-bit register
    A16,   //  2..0          3-bit register
    B32,   // 14..12 & 26..24
    B16,   // 10..8
    C32,   // 11..6
    C16,   //  7..5
    H16,   //  2..0 & 7..5   6-bit register
    S25,   // 15..6 & 26..17 & 3..0, x2
    S21,   // 15..6 & 26..17, x2
    S25L,  // as S25, 32-bit aligned target
    S21L,  // as S21, 32-bit aligned target
    S10,   //  8..0, x2
    S9,    // 15 & 23..17, x2
    S8,    //  6..0, x2
    S7,    //  5..0, x2
    S13,   // 10..0, x4
    U3,    //  2..0
    U5,    //  4..0
    U6,    // 11..6
    U7,    //  6..0
    U7L,   //  4..0, x4
    U8,    //  7..0
    SpU7,  // [sp, u5*4]
    PclU10, // [pcl, u8*4]
    BU5,   // [b16, u5]
    BU6,   // [b16, u5*2]
    BU7,   // [b16, u5*4]
    BS9,   // [b32, 15 & 23..16]
    GenA,
    GenB,
    GenC,
    GenCPcrel,
    BcInd,   // [b32, c32]
    Bc16Ind, // [b16, c16]
    RSp,
    RBlink,
    Zero,
    RR0,
    RGp,
    GpS9,  // [gp, s9]
    GpS10, // [gp, s9*2]
    GpS11, // [gp, s9*4]
    S11,   //  8..0, x4
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opnd {
    pub kind: OperandKind,
    /// Memory/indirect reference rather than a direct value.
    pub ind: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Term {
    pub op: Op,
    pub aux: AuxMask,
    pub ops: [Option<Opnd>; 3],
}

/// Inclusive bit range `hi..=lo`.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub hi: u8,
    pub lo: u8,
}

impl Field {
    pub fn width(self) -> u32 {
        (self.hi - self.lo + 1) as u32
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sub {
    pub sel: Field,
    /// Extra range placed above `sel` in the index.
    pub ext: Option<Field>,
    pub table: &'static [Entry],
}

impl Sub {
    pub fn index(&self, code: u32) -> usize {
        let mut idx = bits(code, self.sel.hi as u32, self.sel.lo as u32);
        if let Some(ext) = self.ext {
            idx |= bits(code, ext.hi as u32, ext.lo as u32) << self.sel.width();
        }
        idx as usize
    }

    pub fn index_width(&self) -> u32 {
        self.sel.width() + self.ext.map_or(0, Field::width)
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Entry {
    Invalid,
    Insn(Term),
    Sub(Sub),
}

/// Walk the trie from the major-opcode slot to the selected instruction.
pub fn lookup(code: u32, major: u32) -> Option<&'static Term> {
    let mut entry = MAJOR.get(major as usize)?;
    loop {
        match entry {
            Entry::Invalid => return None,
            Entry::Insn(t) => return Some(t),
            Entry::Sub(s) => entry = s.table.get(s.index(code))?,
        }
    }
}

use OperandKind::*;

const NO: Option<Opnd> = None;

const fn o(kind: OperandKind) -> Option<Opnd> {
    Some(Opnd { kind, ind: false })
}

const fn ind(kind: OperandKind) -> Option<Opnd> {
    Some(Opnd { kind, ind: true })
}

const fn t(op: Op, aux: u32, ops: [Option<Opnd>; 3]) -> Entry {
    Entry::Insn(Term { op, aux: AuxMask::from_bits_retain(aux), ops })
}

const fn sub(hi: u8, lo: u8, table: &'static [Entry]) -> Entry {
    Entry::Sub(Sub { sel: Field { hi, lo }, ext: None, table })
}

const fn sub2(ext_hi: u8, ext_lo: u8, hi: u8, lo: u8, table: &'static [Entry]) -> Entry {
    Entry::Sub(Sub {
        sel: Field { hi, lo },
        ext: Some(Field { hi: ext_hi, lo: ext_lo }),
        table,
    })
}

const fn sparse<const N: usize>(defs: &[(usize, Entry)]) -> [Entry; N] {
    let mut table = [Entry::Invalid; N];
    let mut i = 0;
    while i < defs.len() {
        table[defs[i].0] = defs[i].1;
        i += 1;
    }
    table
}

use aux::*;

// bit 16, major 0x00
static MAJ00: [Entry; 2] = sparse(&[
    (0x0, t(Op::B, Q_4_0 | N_5, [o(S21), NO, NO])),
    (0x1, t(Op::B, N_5, [o(S25), NO, NO])),
]);

// bit 17, major 0x01, bit 16 = 0
static BL: [Entry; 2] = sparse(&[
    (0x0, t(Op::Bl, Q_4_0 | N_5, [o(S21L), NO, NO])),
    (0x1, t(Op::Bl, N_5, [o(S25L), NO, NO])),
]);

// bits 3..0, major 0x01, bit 16 = 1, bit 4 = 0
static BR_REGREG: [Entry; 16] = sparse(&[
    (0x0, t(Op::Br, cnd(EQ) | N_5, [o(B32), o(C32), o(S9)])),
    (0x1, t(Op::Br, cnd(NE) | N_5, [o(B32), o(C32), o(S9)])),
    (0x2, t(Op::Br, cnd(LT) | N_5, [o(B32), o(C32), o(S9)])),
    (0x3, t(Op::Br, cnd(GE) | N_5, [o(B32), o(C32), o(S9)])),
    (0x4, t(Op::Br, cnd(LO) | N_5, [o(B32), o(C32), o(S9)])),
    (0x5, t(Op::Br, cnd(HS) | N_5, [o(B32), o(C32), o(S9)])),
    (0xE, t(Op::Bbit0, N_5, [o(B32), o(C32), o(S9)])),
    (0xF, t(Op::Bbit1, N_5, [o(B32), o(C32), o(S9)])),
]);

// bits 3..0, major 0x01, bit 16 = 1, bit 4 = 1
static BR_REGIMM: [Entry; 16] = sparse(&[
    (0x0, t(Op::Br, cnd(EQ) | N_5, [o(B32), o(U6), o(S9)])),
    (0x1, t(Op::Br, cnd(NE) | N_5, [o(B32), o(U6), o(S9)])),
    (0x2, t(Op::Br, cnd(LT) | N_5, [o(B32), o(U6), o(S9)])),
    (0x3, t(Op::Br, cnd(GE) | N_5, [o(B32), o(U6), o(S9)])),
    (0x4, t(Op::Br, cnd(LO) | N_5, [o(B32), o(U6), o(S9)])),
    (0x5, t(Op::Br, cnd(HS) | N_5, [o(B32), o(U6), o(S9)])),
    (0xE, t(Op::Bbit0, N_5, [o(B32), o(U6), o(S9)])),
    (0xF, t(Op::Bbit1, N_5, [o(B32), o(U6), o(S9)])),
]);

// bit 4, major 0x01, bit 16 = 1
static BR: [Entry; 2] = sparse(&[
    (0x0, sub(3, 0, &BR_REGREG)),
    (0x1, sub(3, 0, &BR_REGIMM)),
]);

// bit 16, major 0x01
static MAJ01: [Entry; 2] = sparse(&[
    (0x0, sub(17, 17, &BL)),
    (0x1, sub(4, 4, &BR)),
]);

// bits 14..12 & 26..24, major 0x04, sop 0x3F
static ZOP: [Entry; 64] = sparse(&[
    (0x01, t(Op::Sleep, 0, [o(GenC), NO, NO])),
    (0x02, t(Op::Swi, 0, [NO, NO, NO])),
    (0x03, t(Op::Sync, 0, [NO, NO, NO])),
    (0x04, t(Op::Rtie, 0, [NO, NO, NO])),
    (0x05, t(Op::Brk, 0, [NO, NO, NO])),
]);

// bits 5..0, major 0x04, 21..16 = 0x2F
static SOP: [Entry; 64] = sparse(&[
    (0x00, t(Op::Asl, 0, [o(GenB), o(GenC), NO])),
    (0x01, t(Op::Asr, 0, [o(GenB), o(GenC), NO])),
    (0x02, t(Op::Lsr, 0, [o(GenB), o(GenC), NO])),
    (0x03, t(Op::Ror, 0, [o(GenB), o(GenC), NO])),
    (0x04, t(Op::Rrc, 0, [o(GenB), o(GenC), NO])),
    (0x05, t(Op::Sexb, 0, [o(GenB), o(GenC), NO])),
    (0x06, t(Op::Sexw, 0, [o(GenB), o(GenC), NO])),
    (0x07, t(Op::Extb, 0, [o(GenB), o(GenC), NO])),
    (0x08, t(Op::Extw, 0, [o(GenB), o(GenC), NO])),
    (0x09, t(Op::Abs, 0, [o(GenB), o(GenC), NO])),
    (0x0A, t(Op::Not, 0, [o(GenB), o(GenC), NO])),
    (0x0B, t(Op::Rlc, 0, [o(GenB), o(GenC), NO])),
    (0x0C, t(Op::Ex, 0, [o(GenB), ind(GenC), NO])),
    (0x3F, sub2(14, 12, 26, 24, &ZOP)),
]);

const GEN3: [Option<Opnd>; 3] = [o(GenA), o(GenB), o(GenC)];
const GEN2OPS: [Option<Opnd>; 3] = [o(GenB), o(GenC), NO];
const GENBCC: [Option<Opnd>; 3] = [o(GenB), o(GenC), o(GenC)];

// bits 21..16, major 0x04
static MAJ04: [Entry; 64] = sparse(&[
    (0x00, t(Op::Add, GEN, GEN3)),
    (0x01, t(Op::Adc, GEN, GEN3)),
    (0x02, t(Op::Sub, GEN, GEN3)),
    (0x03, t(Op::Sbc, GEN, GEN3)),
    (0x04, t(Op::And, GEN, GEN3)),
    (0x05, t(Op::Or, GEN, GEN3)),
    (0x06, t(Op::Bic, GEN, GEN3)),
    (0x07, t(Op::Xor, GEN, GEN3)),
    (0x08, t(Op::Max, GEN, GEN3)),
    (0x09, t(Op::Min, GEN, GEN3)),
    (0x0A, t(Op::Mov, GEN, GEN2OPS)),
    (0x0B, t(Op::Tst, GEN2, GEN2OPS)),
    (0x0C, t(Op::Cmp, GEN2, GEN2OPS)),
    (0x0D, t(Op::Rcmp, GEN, GEN2OPS)),
    (0x0E, t(Op::Rsub, GEN, GEN3)),
    (0x0F, t(Op::Bset, GEN, GEN3)),
    (0x10, t(Op::Bclr, GEN, GEN3)),
    (0x11, t(Op::Btst, GEN2, GEN2OPS)),
    (0x12, t(Op::Bxor, GEN, GEN3)),
    (0x13, t(Op::Bmsk, GEN, GEN3)),
    (0x14, t(Op::Add1, GEN, GEN3)),
    (0x15, t(Op::Add2, GEN, GEN3)),
    (0x16, t(Op::Add3, GEN, GEN3)),
    (0x17, t(Op::Sub1, GEN, GEN3)),
    (0x18, t(Op::Sub2, GEN, GEN3)),
    (0x19, t(Op::Sub3, GEN, GEN3)),
    (0x1A, t(Op::Mpy, GEN, GEN3)),
    (0x1B, t(Op::Mpyh, GEN, GEN3)),
    (0x1C, t(Op::Mpyhu, GEN, GEN3)),
    (0x1D, t(Op::Mpyu, GEN, GEN3)),
    (0x20, t(Op::J, GEN, [ind(GenC), NO, NO])),
    (0x21, t(Op::J, GEN | D, [ind(GenC), NO, NO])),
    (0x22, t(Op::Jl, GEN, [ind(GenC), NO, NO])),
    (0x23, t(Op::Jl, GEN | D, [ind(GenC), NO, NO])),
    (0x28, t(Op::Lp, GEN2, [o(GenCPcrel), NO, NO])),
    (0x29, t(Op::Flag, GEN2, [o(GenC), NO, NO])),
    (0x2A, t(Op::Lr, 0, [o(GenB), ind(GenC), NO])),
    (0x2B, t(Op::Sr, 0, [o(GenB), ind(GenC), NO])),
    (0x2F, sub(5, 0, &SOP)),
    (0x30, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x31, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x32, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x33, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x34, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x35, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x36, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
    (0x37, t(Op::Ld, AAZZXD_23_15, [o(A32), o(BcInd), NO])),
]);

// bits 14..12 & 26..24, major 0x05, sop 0x3F; nothing assigned yet
static ZOP5: [Entry; 64] = [Entry::Invalid; 64];

// bits 5..0, major 0x05, 21..16 = 0x2F
static SOP5: [Entry; 64] = sparse(&[
    (0x00, t(Op::Swap, GEN, GEN2OPS)),
    (0x01, t(Op::Norm, GEN, GEN2OPS)),
    (0x02, t(Op::Sat16, GEN, GEN2OPS)),
    (0x03, t(Op::Rnd16, GEN, GEN2OPS)),
    (0x04, t(Op::Abssw, GEN, GEN2OPS)),
    (0x05, t(Op::Abss, GEN, GEN2OPS)),
    (0x06, t(Op::Negsw, GEN, GEN2OPS)),
    (0x07, t(Op::Negs, GEN, GEN2OPS)),
    (0x08, t(Op::Normw, GEN, GEN2OPS)),
    (0x3F, sub2(14, 12, 26, 24, &ZOP5)),
]);

// bits 21..16, major 0x05
static MAJ05: [Entry; 64] = sparse(&[
    (0x00, t(Op::Asl, GEN, GEN3)),
    (0x01, t(Op::Lsr, GEN, GEN3)),
    (0x02, t(Op::Asr, GEN, GEN3)),
    (0x03, t(Op::Ror, GEN, GEN3)),
    (0x04, t(Op::Mul64, GEN, [o(Zero), o(GenB), o(GenC)])),
    (0x05, t(Op::Mulu64, GEN, [o(Zero), o(GenB), o(GenC)])),
    (0x06, t(Op::Adds, GEN, GEN3)),
    (0x07, t(Op::Subs, GEN, GEN3)),
    (0x08, t(Op::Divaw, GEN, GEN3)),
    (0x0A, t(Op::Asls, GEN, GEN3)),
    (0x0B, t(Op::Asrs, GEN, GENBCC)),
    (0x0C, t(Op::Muldw, GEN, GENBCC)),
    (0x0D, t(Op::Muludw, GEN, GENBCC)),
    (0x0E, t(Op::Mulrdw, GEN, GENBCC)),
    (0x10, t(Op::Macdw, GEN, GENBCC)),
    (0x11, t(Op::Macudw, GEN, GENBCC)),
    (0x12, t(Op::Macrdw, GEN, GENBCC)),
    (0x14, t(Op::Msubdw, GEN, GENBCC)),
    (0x28, t(Op::Addsdw, GEN, GEN3)),
    (0x29, t(Op::Subsdw, GEN, GEN3)),
    (0x2F, sub(5, 0, &SOP5)),
    (0x30, t(Op::Mululw, GEN, GENBCC)),
    (0x31, t(Op::Mullw, GEN, GENBCC)),
    (0x32, t(Op::Mulflw, GEN, GENBCC)),
    (0x33, t(Op::Maclw, GEN, GENBCC)),
    (0x34, t(Op::Macflw, GEN, GENBCC)),
    (0x35, t(Op::Machulw, GEN, GENBCC)),
    (0x36, t(Op::Machlw, GEN, GENBCC)),
    (0x37, t(Op::Machflw, GEN, GENBCC)),
    (0x38, t(Op::Mulhlw, GEN, GENBCC)),
    (0x39, t(Op::Mulhflw, GEN, GENBCC)),
]);

// bits 4..3, major 0x0C
static MAJ0C: [Entry; 4] = sparse(&[
    (0x0, t(Op::Ld, 0, [o(A16), o(Bc16Ind), NO])),
    (0x1, t(Op::Ld, B, [o(A16), o(Bc16Ind), NO])),
    (0x2, t(Op::Ld, W, [o(A16), o(Bc16Ind), NO])),
    (0x3, t(Op::Add, 0, [o(A16), o(B16), o(C16)])),
]);

// bits 4..3, major 0x0D
static MAJ0D: [Entry; 4] = sparse(&[
    (0x0, t(Op::Add, 0, [o(C16), o(B16), o(U3)])),
    (0x1, t(Op::Sub, 0, [o(C16), o(B16), o(U3)])),
    (0x2, t(Op::Asl, 0, [o(C16), o(B16), o(U3)])),
    (0x3, t(Op::Asr, 0, [o(C16), o(B16), o(U3)])),
]);

// bits 4..3, major 0x0E
static MAJ0E: [Entry; 4] = sparse(&[
    (0x0, t(Op::Add, 0, [o(B16), o(B16), o(H16)])),
    (0x1, t(Op::Mov, 0, [o(B16), o(H16), NO])),
    (0x2, t(Op::Cmp, 0, [o(B16), o(H16), NO])),
    (0x3, t(Op::Mov, 0, [o(H16), o(B16), NO])),
]);

// bits 10..8, major 0x0F, 4..0 = 0, 7..5 = 7
static ZOP16: [Entry; 8] = sparse(&[
    (0x0, t(Op::Nop, 0, [NO, NO, NO])),
    (0x1, t(Op::Unimp, 0, [NO, NO, NO])),
    (0x4, t(Op::J, cnd(EQ), [ind(RBlink), NO, NO])),
    (0x5, t(Op::J, cnd(NE), [ind(RBlink), NO, NO])),
    (0x6, t(Op::J, 0, [ind(RBlink), NO, NO])),
    (0x7, t(Op::J, D, [ind(RBlink), NO, NO])),
]);

// bits 7..5, major 0x0F, 4..0 = 0
static SOP16: [Entry; 8] = sparse(&[
    (0x0, t(Op::J, 0, [ind(B16), NO, NO])),
    (0x1, t(Op::J, D, [ind(B16), NO, NO])),
    (0x2, t(Op::Jl, 0, [ind(B16), NO, NO])),
    (0x3, t(Op::Jl, D, [ind(B16), NO, NO])),
    (0x6, t(Op::Sub, cnd(NE), [o(B16), o(B16), o(B16)])),
    (0x7, sub(10, 8, &ZOP16)),
]);

const BBC: [Option<Opnd>; 3] = [o(B16), o(B16), o(C16)];
const BC: [Option<Opnd>; 3] = [o(B16), o(C16), NO];

// bits 4..0, major 0x0F
static MAJ0F: [Entry; 32] = sparse(&[
    (0x00, sub(7, 5, &SOP16)),
    (0x02, t(Op::Sub, 0, BBC)),
    (0x04, t(Op::And, 0, BBC)),
    (0x05, t(Op::Or, 0, BBC)),
    (0x06, t(Op::Bic, 0, BBC)),
    (0x07, t(Op::Xor, 0, BBC)),
    (0x0B, t(Op::Tst, 0, BC)),
    (0x0C, t(Op::Mul64, 0, BC)),
    (0x0D, t(Op::Sexb, 0, BC)),
    (0x0E, t(Op::Sexw, 0, BC)),
    (0x0F, t(Op::Extb, 0, BC)),
    (0x10, t(Op::Extw, 0, BC)),
    (0x11, t(Op::Abs, 0, BC)),
    (0x12, t(Op::Not, 0, BC)),
    (0x13, t(Op::Neg, 0, BC)),
    (0x14, t(Op::Add1, 0, BBC)),
    (0x15, t(Op::Add2, 0, BBC)),
    (0x16, t(Op::Add3, 0, BBC)),
    (0x18, t(Op::Asl, 0, BBC)),
    (0x19, t(Op::Lsr, 0, BBC)),
    (0x1A, t(Op::Asr, 0, BBC)),
    (0x1B, t(Op::Asl, 0, BC)),
    (0x1C, t(Op::Asr, 0, BC)),
    (0x1D, t(Op::Lsr, 0, BC)),
    (0x1E, t(Op::Trap, 0, [NO, NO, NO])),
    (0x1F, t(Op::Brk, 0, [NO, NO, NO])),
]);

const BBU5: [Option<Opnd>; 3] = [o(B16), o(B16), o(U5)];

// bits 7..5, major 0x17
static MAJ17: [Entry; 8] = sparse(&[
    (0x0, t(Op::Asl, 0, BBU5)),
    (0x1, t(Op::Lsr, 0, BBU5)),
    (0x2, t(Op::Asr, 0, BBU5)),
    (0x3, t(Op::Sub, 0, BBU5)),
    (0x4, t(Op::Bset, 0, BBU5)),
    (0x5, t(Op::Bclr, 0, BBU5)),
    (0x6, t(Op::Bmsk, 0, BBU5)),
    (0x7, t(Op::Btst, 0, [o(B16), o(U5), NO])),
]);

// bits 10..8, major 0x18, 7..5 = 5
static SP_ADDSUB: [Entry; 8] = sparse(&[
    (0x0, t(Op::Add, 0, [o(RSp), o(RSp), o(U7L)])),
    (0x1, t(Op::Sub, 0, [o(RSp), o(RSp), o(U7L)])),
]);

// bits 4..0, major 0x18, 7..5 = 6
static SP_POPS: [Entry; 32] = sparse(&[
    (0x01, t(Op::Pop, 0, [o(B16), NO, NO])),
    (0x11, t(Op::Pop, 0, [o(RBlink), NO, NO])),
]);

// bits 4..0, major 0x18, 7..5 = 7
static SP_PUSHS: [Entry; 32] = sparse(&[
    (0x01, t(Op::Push, 0, [o(B16), NO, NO])),
    (0x11, t(Op::Push, 0, [o(RBlink), NO, NO])),
]);

// bits 7..5, major 0x18
static MAJ18: [Entry; 8] = sparse(&[
    (0x0, t(Op::Ld, 0, [o(B16), o(SpU7), NO])),
    (0x1, t(Op::Ld, B, [o(B16), o(SpU7), NO])),
    (0x2, t(Op::St, 0, [o(B16), o(SpU7), NO])),
    (0x3, t(Op::St, B, [o(B16), o(SpU7), NO])),
    (0x4, t(Op::Add, 0, [o(B16), o(RSp), o(U7L)])),
    (0x5, sub(10, 8, &SP_ADDSUB)),
    (0x6, sub(4, 0, &SP_POPS)),
    (0x7, sub(4, 0, &SP_PUSHS)),
]);

// bits 10..9, major 0x19
static MAJ19: [Entry; 4] = sparse(&[
    (0x0, t(Op::Ld, 0, [o(RR0), o(GpS11), NO])),
    (0x1, t(Op::Ld, B, [o(RR0), o(GpS9), NO])),
    (0x2, t(Op::Ld, W, [o(RR0), o(GpS10), NO])),
    (0x3, t(Op::Add, 0, [o(RR0), o(RGp), o(S11)])),
]);

// bit 7, major 0x1C
static MAJ1C: [Entry; 2] = sparse(&[
    (0x0, t(Op::Add, 0, [o(B16), o(B16), o(U7)])),
    (0x1, t(Op::Cmp, 0, [o(B16), o(U7), NO])),
]);

// bit 7, major 0x1D
static MAJ1D: [Entry; 2] = sparse(&[
    (0x0, t(Op::Br, cnd(EQ), [o(B16), o(Zero), o(S8)])),
    (0x1, t(Op::Br, cnd(NE), [o(B16), o(Zero), o(S8)])),
]);

// bits 8..6, major 0x1E, 10..9 = 3
static BCC16: [Entry; 8] = sparse(&[
    (0x0, t(Op::B, cnd(GT), [o(S7), NO, NO])),
    (0x1, t(Op::B, cnd(GE), [o(S7), NO, NO])),
    (0x2, t(Op::B, cnd(LT), [o(S7), NO, NO])),
    (0x3, t(Op::B, cnd(LE), [o(S7), NO, NO])),
    (0x4, t(Op::B, cnd(HI), [o(S7), NO, NO])),
    (0x5, t(Op::B, cnd(HS), [o(S7), NO, NO])),
    (0x6, t(Op::B, cnd(LO), [o(S7), NO, NO])),
    (0x7, t(Op::B, cnd(LS), [o(S7), NO, NO])),
]);

// bits 10..9, major 0x1E
static MAJ1E: [Entry; 4] = sparse(&[
    (0x0, t(Op::B, 0, [o(S10), NO, NO])),
    (0x1, t(Op::B, cnd(EQ), [o(S10), NO, NO])),
    (0x2, t(Op::B, cnd(NE), [o(S10), NO, NO])),
    (0x3, sub(8, 6, &BCC16)),
]);

/// Root table, indexed by major opcode.
pub static MAJOR: [Entry; 32] = sparse(&[
    (0x00, sub(16, 16, &MAJ00)),
    (0x01, sub(16, 16, &MAJ01)),
    (0x02, t(Op::Ld, DAAZZX_11_6, [o(A32), o(BS9), NO])),
    (0x03, t(Op::St, DAAZZR_5_0, [o(C32), o(BS9), NO])),
    (0x04, sub(21, 16, &MAJ04)),
    (0x05, sub(21, 16, &MAJ05)),
    (0x0C, sub(4, 3, &MAJ0C)),
    (0x0D, sub(4, 3, &MAJ0D)),
    (0x0E, sub(4, 3, &MAJ0E)),
    (0x0F, sub(4, 0, &MAJ0F)),
    (0x10, t(Op::Ld, 0, [o(C16), o(BU7), NO])),
    (0x11, t(Op::Ld, B, [o(C16), o(BU5), NO])),
    (0x12, t(Op::Ld, W, [o(C16), o(BU6), NO])),
    (0x13, t(Op::Ld, W | X, [o(C16), o(BU6), NO])),
    (0x14, t(Op::St, 0, [o(C16), o(BU7), NO])),
    (0x15, t(Op::St, B, [o(C16), o(BU5), NO])),
    (0x16, t(Op::St, W, [o(C16), o(BU6), NO])),
    (0x17, sub(7, 5, &MAJ17)),
    (0x18, sub(7, 5, &MAJ18)),
    (0x19, sub(10, 9, &MAJ19)),
    (0x1A, t(Op::Ld, 0, [o(B16), o(PclU10), NO])),
    (0x1B, t(Op::Mov, 0, [o(B16), o(U8), NO])),
    (0x1C, sub(7, 7, &MAJ1C)),
    (0x1D, sub(7, 7, &MAJ1D)),
    (0x1E, sub(10, 9, &MAJ1E)),
    (0x1F, t(Op::Bl, 0, [o(S13), NO, NO])),
]);

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(entry: &Entry, depth: usize, visit: &mut dyn FnMut(&Entry, usize)) {
        visit(entry, depth);
        if let Entry::Sub(s) = entry {
            for child in s.table {
                walk(child, depth + 1, visit);
            }
        }
    }

    #[test]
    fn child_tables_cover_their_index_range() {
        for e in MAJOR.iter() {
            walk(e, 0, &mut |e, depth| {
                assert!(depth < 6, "trie too deep");
                if let Entry::Sub(s) = e {
                    assert_eq!(s.table.len(), 1usize << s.index_width());
                }
            });
        }
    }

    #[test]
    fn selectors_stay_inside_the_word() {
        for (major, e) in MAJOR.iter().enumerate() {
            let limit = if major < 0x0C { 31 } else { 15 };
            walk(e, 0, &mut |e, _| {
                if let Entry::Sub(s) = e {
                    assert!(s.sel.hi as u32 <= limit);
                    if let Some(x) = s.ext {
                        assert!(x.hi as u32 <= limit);
                    }
                }
            });
        }
    }

    #[test]
    fn terminals_carry_only_known_aux_groups() {
        let mut count = 0;
        for e in MAJOR.iter() {
            walk(e, 0, &mut |e, _| {
                if let Entry::Insn(t) = e {
                    count += 1;
                    assert_eq!(AuxMask::from_bits(t.aux.bits()), Some(t.aux));
                    if !t.aux.contains(AuxMask::CND) {
                        assert!((t.aux & AuxMask::COND).is_empty(), "{:?}", t.op);
                    }
                }
            });
        }
        assert!(count > 150);
    }

    #[test]
    fn second_range_lands_in_high_index_bits() {
        let Entry::Sub(s) = sub2(14, 12, 26, 24, &ZOP5) else { unreachable!() };
        let code = (0b101 << 12) | (0b011 << 24);
        assert_eq!(s.index(code), 0b101_011);
    }

    #[test]
    fn lookup_reaches_nested_terminals() {
        // major 4, sop 0x2F, zop: b = 5 -> brk
        let code = (0x04 << 27) | (0x2F << 16) | 0x3F | (0b101 << 24);
        assert_eq!(lookup(code, 0x04).map(|t| t.op), Some(Op::Brk));
        // unassigned major
        assert!(lookup(0, 0x06).is_none());
    }
}
