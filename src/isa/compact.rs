//! ARCompact decoding: 16/32-bit instructions with an optional trailing
//! long immediate.

use tracing::warn;

use crate::bits::{bits, sbits, sign_extend};
use crate::context::DecodeCtx;
use crate::decoder::{DecodeError, Decoded, Decoder, OpValue, Operand};
use crate::flags::{Aux, Width};
use crate::instructions::Op;
use crate::isa::table::{lookup, AuxMask, OperandKind, Opnd, Term};
use crate::isa::operand::indirect;
use crate::memory::Memory;
use crate::regs::{reg16, BLINK, GP, LIMM, PCL, R0, SP};

/// Role of the general operands in major 4/5 instructions, selected by
/// bits 23..22 and, for the conditional forms, bit 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenMode {
    /// `op a,b,c`
    RegReg,
    /// `op a,b,u6`
    RegU6,
    /// `op b,b,s12`
    RegS12,
    /// `op.cc b,b,c`
    CondReg,
    /// `op.cc b,b,u6`
    CondU6,
}

impl GenMode {
    pub fn of(code: u32) -> Self {
        match bits(code, 23, 22) {
            0 => GenMode::RegReg,
            1 => GenMode::RegU6,
            2 => GenMode::RegS12,
            _ if bits(code, 5, 5) == 0 => GenMode::CondReg,
            _ => GenMode::CondU6,
        }
    }

    fn is_conditional(self) -> bool {
        matches!(self, GenMode::CondReg | GenMode::CondU6)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CompactDecoder;

impl Decoder for CompactDecoder {
    fn decode<M: Memory + ?Sized>(&self, mem: &M, ea: u32) -> Result<Decoded, DecodeError> {
        if ea & 1 != 0 {
            return Err(DecodeError::Misaligned { ea });
        }
        let mut ctx = DecodeCtx::new(mem, ea);
        let mut code = ctx.next_u16()? as u32;
        let major = bits(code, 15, 11);
        if major < 0x0C {
            code = (code << 16) | ctx.next_u16()? as u32;
        }
        let term = lookup(code, major).ok_or(DecodeError::Unassigned { ea, code })?;
        decode_term(&mut ctx, code, term)
    }
}

/// Build the instruction named by `term` from the already-read word.
pub fn decode_term<M: Memory + ?Sized>(
    ctx: &mut DecodeCtx<'_, M>,
    code: u32,
    term: &Term,
) -> Result<Decoded, DecodeError> {
    let mut d = Decoded::new(ctx.ea, term.op);
    let (aux, rest) = decode_aux(code, term.aux);
    if !rest.is_empty() {
        warn!(ea = format_args!("{:#010x}", ctx.ea), residual = ?rest, "unhandled aux bits");
    }
    d.aux = aux;

    let gen = GenMode::of(code);
    for (slot, opnd) in term.ops.iter().enumerate() {
        if let Some(opnd) = opnd {
            d.ops[slot] = decode_operand(ctx, code, *opnd, slot, term.op, gen, aux.width())?;
        }
    }
    d.size = ctx.size();
    Ok(d)
}

/// Map the table's aux groups onto instruction attributes.
///
/// Returns the attributes and any mask bits no group consumed.
pub fn decode_aux(code: u32, mask: AuxMask) -> (Aux, AuxMask) {
    let mut aux = Aux::empty();
    let mut rest = mask;

    if rest.contains(AuxMask::CND) {
        aux = aux.with_cond(mask.bits());
        rest -= AuxMask::CND | AuxMask::COND;
    }
    if rest.contains(AuxMask::Q_4_0) {
        aux = aux.with_cond(code);
        rest -= AuxMask::Q_4_0;
    }
    if rest.intersects(AuxMask::GEN | AuxMask::GEN2) {
        if !rest.contains(AuxMask::GEN2) && bits(code, 15, 15) != 0 {
            aux |= Aux::F;
        }
        if GenMode::of(code).is_conditional() {
            aux = aux.with_cond(code);
        }
        rest -= AuxMask::GEN | AuxMask::GEN2;
    }
    if rest.contains(AuxMask::N_5) {
        aux = (aux - Aux::D) | Aux::from_bits_retain(code & Aux::D.bits());
        rest -= AuxMask::N_5;
    }
    if rest.contains(AuxMask::W) {
        aux = (aux - Aux::SIZE) | Aux::SIZE_W;
        rest -= AuxMask::W;
    }
    if rest.contains(AuxMask::B) {
        aux = (aux - Aux::SIZE) | Aux::SIZE_B;
        rest -= AuxMask::B;
    }
    if rest.contains(AuxMask::X) {
        aux |= Aux::X;
        rest -= AuxMask::X;
    }
    if rest.contains(AuxMask::D) {
        aux = (aux - Aux::DELAY) | Aux::D;
        rest -= AuxMask::D;
    }
    if rest.contains(AuxMask::DAAZZX_11_6) {
        aux = aux.with_ldst_bits(bits(code, 11, 6));
        rest -= AuxMask::DAAZZX_11_6;
    }
    if rest.contains(AuxMask::DAAZZR_5_0) {
        aux = aux.with_ldst_bits(bits(code, 5, 0));
        rest -= AuxMask::DAAZZR_5_0;
    }
    if rest.contains(AuxMask::AAZZXD_23_15) {
        let v = bits(code, 15, 15) << 5
            | bits(code, 23, 22) << 3
            | bits(code, 18, 17) << 1
            | bits(code, 16, 16);
        aux = aux.with_ldst_bits(v);
        rest -= AuxMask::AAZZXD_23_15;
    }
    (aux, rest)
}

/// Word-aligned pc plus `delta`.
fn branch(ea: u32, delta: i32) -> Operand {
    Operand::near((ea & !3).wrapping_add(delta as u32))
}

/// Register operand, or the long immediate for r62.
fn reg_or_limm<M: Memory + ?Sized>(
    ctx: &mut DecodeCtx<'_, M>,
    r: u8,
    slot: usize,
    op: Op,
) -> Result<Operand, DecodeError> {
    if r != LIMM {
        return Ok(Operand::reg(r));
    }
    // a long immediate never names a destination
    if slot == 0 && op.writes_first() {
        Ok(Operand::imm(0))
    } else {
        Ok(Operand::imm(ctx.limm()?))
    }
}

/// `[base, disp]`; a long-immediate base folds into an absolute address.
fn displ<M: Memory + ?Sized>(
    ctx: &mut DecodeCtx<'_, M>,
    base: u8,
    disp: i32,
) -> Result<Operand, DecodeError> {
    if base == LIMM {
        Ok(Operand::mem(ctx.limm()?.wrapping_add(disp as u32)))
    } else {
        Ok(Operand::displ(base, disp))
    }
}

fn b32(code: u32) -> u8 {
    (bits(code, 14, 12) << 3 | bits(code, 26, 24)) as u8
}

/// Decode one operand slot.
pub fn decode_operand<M: Memory + ?Sized>(
    ctx: &mut DecodeCtx<'_, M>,
    code: u32,
    opnd: Opnd,
    slot: usize,
    op: Op,
    gen: GenMode,
    aux_width: Width,
) -> Result<Operand, DecodeError> {
    use OperandKind::*;

    let ea = ctx.ea;
    let x = match opnd.kind {
        A16 => reg_or_limm(ctx, reg16(bits(code, 2, 0)), slot, op)?,
        B16 => reg_or_limm(ctx, reg16(bits(code, 10, 8)), slot, op)?,
        C16 => reg_or_limm(ctx, reg16(bits(code, 7, 5)), slot, op)?,
        A32 => reg_or_limm(ctx, bits(code, 5, 0) as u8, slot, op)?,
        B32 | GenB => reg_or_limm(ctx, b32(code), slot, op)?,
        C32 => reg_or_limm(ctx, bits(code, 11, 6) as u8, slot, op)?,
        H16 => {
            let r = bits(code, 2, 0) << 3 | bits(code, 7, 5);
            reg_or_limm(ctx, r as u8, slot, op)?
        }
        S25 | S21 | S25L | S21L => {
            let disp = bits(code, 15, 6) << 10 | bits(code, 26, 17);
            let mut disp = match opnd.kind {
                S25 | S25L => sign_extend(disp | bits(code, 3, 0) << 20, 24),
                _ => sign_extend(disp, 20),
            };
            // branch-and-link targets are 32-bit aligned
            if matches!(opnd.kind, S25L | S21L) {
                disp &= !1;
            }
            branch(ea, disp * 2)
        }
        S9 => {
            let mut disp = bits(code, 23, 17) as i32;
            if bits(code, 15, 15) != 0 {
                disp -= 1 << 7;
            }
            branch(ea, disp * 2)
        }
        S7 => branch(ea, sbits(code, 5, 0) * 2),
        S8 => branch(ea, sbits(code, 6, 0) * 2),
        S10 => branch(ea, sbits(code, 8, 0) * 2),
        S13 => branch(ea, sbits(code, 10, 0) * 4),
        PclU10 => displ(ctx, PCL, bits(code, 7, 0) as i32 * 4)?,
        SpU7 => displ(ctx, SP, bits(code, 4, 0) as i32 * 4)?,
        U3 => Operand::imm(bits(code, 2, 0)),
        U5 => Operand::imm(bits(code, 4, 0)),
        U6 => Operand::imm(bits(code, 11, 6)),
        U7 => Operand::imm(bits(code, 6, 0)),
        U7L => Operand::imm(bits(code, 4, 0) * 4),
        U8 => Operand::imm(bits(code, 7, 0)),
        BU5 | BU6 | BU7 => {
            let scale = match opnd.kind {
                BU6 => 2,
                BU7 => 4,
                _ => 1,
            };
            displ(ctx, reg16(bits(code, 10, 8)), bits(code, 4, 0) as i32 * scale)?
        }
        BS9 => {
            let mut disp = bits(code, 23, 16) as i32;
            if bits(code, 15, 15) != 0 {
                disp -= 1 << 8;
            }
            displ(ctx, b32(code), disp)?
        }
        GenA => {
            let r = match gen {
                GenMode::RegReg | GenMode::RegU6 => bits(code, 5, 0) as u8,
                _ => b32(code),
            };
            reg_or_limm(ctx, r, slot, op)?
        }
        GenC | GenCPcrel => {
            let (value, is_reg) = match gen {
                GenMode::RegReg | GenMode::CondReg => (bits(code, 11, 6), true),
                GenMode::RegU6 | GenMode::CondU6 => (bits(code, 11, 6), false),
                GenMode::RegS12 => {
                    let s12 = bits(code, 5, 0) << 6 | bits(code, 11, 6);
                    (sign_extend(s12, 12) as u32, false)
                }
            };
            let x = if is_reg {
                reg_or_limm(ctx, value as u8, slot, op)?
            } else {
                Operand::imm(value)
            };
            match x.value {
                OpValue::Imm(v) if opnd.kind == GenCPcrel => branch(ea, (v as i32).wrapping_mul(2)),
                _ => x,
            }
        }
        BcInd => {
            let (b, c) = (b32(code), bits(code, 11, 6) as u8);
            let li = if b == LIMM || c == LIMM { ctx.limm()? } else { 0 };
            indirect(b, c, 0, li, false, aux_width)
        }
        Bc16Ind => {
            let (b, c) = (reg16(bits(code, 10, 8)), reg16(bits(code, 7, 5)));
            indirect(b, c, 0, 0, false, aux_width)
        }
        Zero => Operand::imm(0),
        RSp => Operand::reg(SP),
        RBlink => Operand::reg(BLINK),
        RR0 => Operand::reg(R0),
        RGp => Operand::reg(GP),
        GpS9 => displ(ctx, GP, sbits(code, 8, 0))?,
        GpS10 => displ(ctx, GP, sbits(code, 8, 0) * 2)?,
        GpS11 => displ(ctx, GP, sbits(code, 8, 0) * 4)?,
        S11 => Operand::imm((sbits(code, 8, 0) * 4) as u32),
    };

    if !opnd.ind {
        return Ok(x);
    }
    Ok(match x.value {
        OpValue::Reg(r) => Operand::displ(r, 0),
        OpValue::Imm(v) if op.is_jump() => Operand::near(v),
        OpValue::Imm(v) => Operand::mem(v),
        _ => {
            warn!(
                ea = format_args!("{ea:#010x}"),
                slot,
                kind = ?opnd.kind,
                "cannot decode operand as indirect"
            );
            Operand::VOID
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::{cond, AddrMode};
    use crate::isa::table::aux;
    use crate::memory::LinearMemory;

    fn mask(bits: u32) -> AuxMask {
        AuxMask::from_bits_retain(bits)
    }

    #[test]
    fn gen_mode_from_bits() {
        assert_eq!(GenMode::of(0), GenMode::RegReg);
        assert_eq!(GenMode::of(1 << 22), GenMode::RegU6);
        assert_eq!(GenMode::of(2 << 22), GenMode::RegS12);
        assert_eq!(GenMode::of(3 << 22), GenMode::CondReg);
        assert_eq!(GenMode::of(3 << 22 | 1 << 5), GenMode::CondU6);
    }

    #[test]
    fn fixed_condition_from_mask() {
        let (a, rest) = decode_aux(0xFFFF_FFFF, mask(aux::cnd(cond::HS) | aux::N_5));
        assert!(rest.is_empty());
        assert_eq!(a.cond() as u32, cond::HS);
        assert!(a.contains(Aux::D));
    }

    #[test]
    fn gen_flag_and_condition() {
        let code = 1 << 15 | 3 << 22 | cond::LT;
        let (a, _) = decode_aux(code, mask(aux::GEN));
        assert!(a.contains(Aux::F));
        assert_eq!(a.cond() as u32, cond::LT);

        // GEN2 never sets the flag bit
        let (a, _) = decode_aux(code, mask(aux::GEN2));
        assert!(!a.contains(Aux::F));
        assert_eq!(a.cond() as u32, cond::LT);

        // unconditional forms ignore the low bits
        let (a, _) = decode_aux(1 << 15 | cond::LT, mask(aux::GEN));
        assert_eq!(a, Aux::F);
    }

    #[test]
    fn register_indexed_load_qualifiers() {
        // .di, .ab, halfword, .x
        let code = 1 << 15 | 2 << 22 | 2 << 17 | 1 << 16;
        let (a, rest) = decode_aux(code, mask(aux::AAZZXD_23_15));
        assert!(rest.is_empty());
        assert_eq!(a.width(), Width::Half);
        assert_eq!(a.addr_mode(), AddrMode::PostUpdate);
        assert!(a.contains(Aux::X | Aux::DI));
    }

    #[test]
    fn forced_width_replaces_size_bits() {
        let (a, _) = decode_aux(0, mask(aux::W | aux::X));
        assert_eq!(a.width(), Width::Half);
        assert!(a.contains(Aux::X));
        let (a, _) = decode_aux(0, mask(aux::B));
        assert_eq!(a.width(), Width::Byte);
    }

    #[test]
    fn leftover_mask_bits_are_reported() {
        let (_, rest) = decode_aux(0, mask(aux::X | 1 << 24));
        assert_eq!(rest.bits(), 1 << 24);
    }

    #[test]
    fn indirect_on_branch_kind_is_void() {
        let mem = LinearMemory::new(16);
        let mut ctx = DecodeCtx::new(&mem, 0);
        let opnd = Opnd { kind: OperandKind::S7, ind: true };
        let x = decode_operand(&mut ctx, 0x0004, opnd, 0, Op::B, GenMode::RegReg, Width::Word).unwrap();
        assert!(x.is_void());
    }

    #[test]
    fn limm_destination_is_not_fetched() {
        let mem = LinearMemory::new(0);
        let mut ctx = DecodeCtx::new(&mem, 0);
        let opnd = Opnd { kind: OperandKind::A32, ind: false };
        let x = decode_operand(&mut ctx, 62, opnd, 0, Op::Add, GenMode::RegReg, Width::Word).unwrap();
        assert!(x.is_imm(0));
        assert_eq!(ctx.size(), 0);
        // but a source slot needs the stream
        assert!(decode_operand(&mut ctx, 62, opnd, 1, Op::Add, GenMode::RegReg, Width::Word).is_err());
    }
}
