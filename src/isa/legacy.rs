//! ARCtangent-A4 decoding: fixed 32-bit words, optional 32-bit long
//! immediate.
//!
//! ```text
//! 31   27 26   21 20   15 14    9 8           0
//! [class ][  a   ][  b   ][  c   ][ shimm/flags ]
//! ```
//!
//! Register fields 61 and 63 select the sign-extended short immediate in
//! bits 8..0 (61 also sets `.f`); 62 selects the long immediate.

use crate::bits::{bits, sbits};
use crate::context::DecodeCtx;
use crate::decoder::{DecodeError, Decoded, Decoder, Operand};
use crate::flags::Aux;
use crate::instructions::Op;
use crate::isa::operand::indirect;
use crate::memory::Memory;
use crate::regs::{is_imm, LIMM, SHIMM, SHIMM_F};

/// Operand layout of a register-class instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `ld a,[b,c]`
    Indexed,
    /// `ld/lr a,[b,shimm]`, `st/sr c,[b,shimm]`
    Offset,
    /// `op a,b`; `flag b`
    Single,
    /// no operands
    System,
    /// `j/jl b`
    Jump,
    /// `op a,b,c`
    Alu,
}

#[derive(Debug, Clone, Copy)]
struct Fields {
    class: u32,
    a: u8,
    b: u8,
    c: u8,
    shimm: i32,
}

impl Fields {
    fn of(code: u32) -> Self {
        Self {
            class: bits(code, 31, 27),
            a: bits(code, 26, 21) as u8,
            b: bits(code, 20, 15) as u8,
            c: bits(code, 14, 9) as u8,
            shimm: sbits(code, 8, 0),
        }
    }
}

fn alu_op(class: u32) -> Option<Op> {
    Some(match class {
        0x08 => Op::Add,
        0x09 => Op::Adc,
        0x0A => Op::Sub,
        0x0B => Op::Sbc,
        0x0C => Op::And,
        0x0D => Op::Or,
        0x0E => Op::Bic,
        0x0F => Op::Xor,
        0x10 => Op::Asl,
        0x11 => Op::Lsr,
        0x12 => Op::Asr,
        0x13 => Op::Ror,
        0x14 => Op::Mul64,
        0x15 => Op::Mulu64,
        0x1E => Op::Max,
        0x1F => Op::Min,
        _ => return None,
    })
}

/// Class 3: the c field selects the operation.
fn single_op(f: &Fields) -> Option<(Op, Shape)> {
    let op = match f.c {
        0x00 => Op::Flag,
        0x01 => Op::Asr,
        0x02 => Op::Lsr,
        0x03 => Op::Ror,
        0x04 => Op::Rrc,
        0x05 => Op::Sexb,
        0x06 => Op::Sexw,
        0x07 => Op::Extb,
        0x08 => Op::Extw,
        0x09 => Op::Swap,
        0x0A => Op::Norm,
        0x3F => {
            let op = match f.shimm {
                0 => Op::Brk,
                1 => Op::Sleep,
                2 => Op::Swi,
                _ => return None,
            };
            return Some((op, Shape::System));
        }
        _ => return None,
    };
    Some((op, Shape::Single))
}

/// Register field as a direct operand.
fn register(r: u8, shimm: i32, limm: u32) -> Operand {
    match r {
        SHIMM_F | SHIMM => Operand::imm(shimm as u32),
        LIMM => Operand::imm(limm),
        _ => Operand::reg(r),
    }
}

/// Register field as a jump target; immediates count in words.
fn jump_target(r: u8, shimm: i32, limm: u32) -> Operand {
    match r {
        SHIMM_F | SHIMM => Operand::near((shimm as u32).wrapping_mul(4)),
        // the top bits of a long immediate hold the flags to set
        LIMM => Operand::near((limm & 0x01FF_FFFF).wrapping_mul(4)),
        _ => Operand::reg(r),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyDecoder {
    /// Rename degenerate encodings (`and a,b,b` -> `mov a,b`, ...).
    pub fold_pseudo: bool,
}

impl Decoder for LegacyDecoder {
    fn decode<M: Memory + ?Sized>(&self, mem: &M, ea: u32) -> Result<Decoded, DecodeError> {
        if ea & 3 != 0 {
            return Err(DecodeError::Misaligned { ea });
        }
        let mut ctx = DecodeCtx::new(mem, ea);
        let code = ctx.next_u32()?;
        let mut d = match bits(code, 31, 27) {
            4..=6 => branch_insn(ea, code),
            _ => self.register_insn(&mut ctx, code)?,
        };
        d.size = ctx.size();
        Ok(d)
    }
}

/// `b/bl/lp` with a 20-bit word displacement.
fn branch_insn(ea: u32, code: u32) -> Decoded {
    let op = match bits(code, 31, 27) {
        4 => Op::B,
        5 => Op::Bl,
        _ => Op::Lp,
    };
    let mut d = Decoded::new(ea, op);
    let words = sbits(code, 26, 7);
    d.ops[0] = Operand::near(ea.wrapping_add((words * 4) as u32).wrapping_add(4));
    // bits 8..7 belong to the displacement
    d.aux = Aux::from_bits_retain(code & 0x7F);
    d
}

impl LegacyDecoder {
    fn register_insn<M: Memory + ?Sized>(
        &self,
        ctx: &mut DecodeCtx<'_, M>,
        code: u32,
    ) -> Result<Decoded, DecodeError> {
        let ea = ctx.ea;
        let f = Fields::of(code);
        let unassigned = || DecodeError::Unassigned { ea, code };

        let (mut op, shape) = match f.class {
            0 => (Op::Ld, Shape::Indexed),
            1 if code & 1 << 13 != 0 => (Op::Lr, Shape::Offset),
            1 => (Op::Ld, Shape::Offset),
            2 if code & 1 << 25 != 0 => (Op::Sr, Shape::Offset),
            2 => (Op::St, Shape::Offset),
            3 => single_op(&f).ok_or_else(unassigned)?,
            7 if code & 1 << 9 != 0 => (Op::Jl, Shape::Jump),
            7 => (Op::J, Shape::Jump),
            class => (alu_op(class).ok_or_else(unassigned)?, Shape::Alu),
        };

        if self.fold_pseudo && op == Op::Xor && code == 0x7FFF_FFFF {
            // xor 0x1ff,0x1ff,0x1ff
            return Ok(Decoded::new(ea, Op::Nop));
        }

        let mut d = Decoded::new(ea, op);
        d.aux = legacy_aux(code, &f, shape, op);

        // the long immediate is fetched once, whichever source slots name it
        let value_reg = if matches!(op, Op::St | Op::Sr) { f.c } else { f.a };
        let sources: &[u8] = match shape {
            Shape::Indexed | Shape::Alu => &[f.b, f.c],
            Shape::Offset if matches!(op, Op::St | Op::Sr) => &[f.b, f.c],
            Shape::Offset | Shape::Single | Shape::Jump => &[f.b],
            Shape::System => &[],
        };
        let mut limm = if sources.contains(&LIMM) { ctx.next_u32()? } else { 0 };
        let mut shimm = f.shimm;

        let mut fold_c = false;
        if self.fold_pseudo && shape == Shape::Alu && f.b == f.c {
            match op {
                Op::And | Op::Or => {
                    op = Op::Mov;
                    fold_c = true;
                }
                Op::Add if is_imm(f.b) => {
                    op = Op::Mov;
                    shimm <<= 1;
                    limm <<= 1;
                    fold_c = true;
                }
                Op::Add => {
                    op = Op::Lsl;
                    fold_c = true;
                }
                Op::Adc => {
                    op = Op::Rlc;
                    fold_c = true;
                }
                _ => {}
            }
            d.op = op;
        }

        let width = d.aux.width();
        match shape {
            Shape::Indexed => {
                d.ops[0] = register(f.a, 0, limm);
                d.ops[1] = indirect(f.b, f.c, shimm, limm, false, width);
            }
            Shape::Offset => {
                d.ops[0] = register(value_reg, shimm, limm);
                let no_offset = matches!(op, Op::Lr | Op::Sr);
                d.ops[1] = indirect(f.b, SHIMM, shimm, limm, no_offset, width);
            }
            Shape::Single if op == Op::Flag => {
                d.ops[0] = register(f.b, shimm, limm);
            }
            Shape::Single => {
                d.ops[0] = register(f.a, 0, limm);
                d.ops[1] = register(f.b, shimm, limm);
            }
            Shape::System => {}
            Shape::Jump => {
                d.ops[0] = jump_target(f.b, shimm, limm);
            }
            Shape::Alu => {
                d.ops[0] = register(f.a, 0, limm);
                d.ops[1] = register(f.b, shimm, limm);
                if !fold_c {
                    d.ops[2] = register(f.c, shimm, limm);
                }
            }
        }
        Ok(d)
    }
}

/// Attribute bits for a register-class instruction.
///
/// Bits 8..0 hold `.f`, the delay mode and the condition unless a field
/// takes the short immediate from there; loads and stores keep their
/// qualifiers next to the fields they do not use.
fn legacy_aux(code: u32, f: &Fields, shape: Shape, op: Op) -> Aux {
    match op {
        Op::Ld if shape == Shape::Offset => return Aux::from_bits_retain(bits(code, 14, 9)),
        Op::St => return Aux::from_bits_retain(bits(code, 26, 21)),
        Op::Lr | Op::Sr => return Aux::empty(),
        _ => {}
    }
    let fields: [Option<u8>; 3] = match shape {
        Shape::System => return Aux::empty(),
        Shape::Single if op == Op::Flag => [Some(f.b), Some(f.b), None],
        Shape::Single => [Some(f.a), Some(f.b), None],
        _ => [Some(f.a), Some(f.b), Some(f.c)],
    };
    let mut aux = Aux::from_bits_retain(code & 0x1FF);
    if fields.contains(&Some(SHIMM_F)) {
        aux = Aux::F;
    }
    if fields[1..].contains(&Some(SHIMM)) {
        aux = Aux::empty();
    }
    aux
}
