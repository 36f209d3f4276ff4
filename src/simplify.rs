//! Post-decode rewrites.

use crate::decoder::{Decoded, OpValue, Operand};
use crate::flags::{AddrMode, Aux, Width};
use crate::instructions::Op;
use crate::memory::Memory;
use crate::regs::PCL;

/// Give the memory operand of a byte/halfword load or store its access width.
pub fn fix_ldst(d: &mut Decoded) {
    if !d.op.is_load_store() {
        return;
    }
    match d.aux.width() {
        w @ (Width::Byte | Width::Half) => d.ops[1].width = w,
        Width::Word => {}
    }
}

/// Rename pseudo-instruction forms.
///
/// * `ld.as a,[b,off]` -> `ld a,[b,off*size]`
/// * `addN a,b,imm` -> `add a,b,imm<<N` (same for `subN`)
/// * `sub.f 0,b,c` -> `cmp b,c`
///
/// A second application leaves the result unchanged.
pub fn simplify(d: &mut Decoded) {
    match d.op {
        Op::Ld | Op::St => scale_index(d),
        Op::Add1 | Op::Add2 | Op::Add3 | Op::Sub1 | Op::Sub2 | Op::Sub3 => fold_shift(d),
        _ => {}
    }
    if d.op == Op::Sub && d.ops[0].is_imm(0) && d.aux.contains(Aux::F) {
        d.aux -= Aux::F;
        d.op = Op::Cmp;
        d.ops = [d.ops[1], d.ops[2], Operand::VOID];
    }
}

fn scale_index(d: &mut Decoded) {
    if d.aux.addr_mode() != AddrMode::Scaled {
        return;
    }
    let scale = match d.aux.width() {
        Width::Word => 4,
        Width::Half => 2,
        Width::Byte => return,
    };
    if let OpValue::Displ { disp, imm_base: false, .. } = &mut d.ops[1].value {
        *disp = disp.wrapping_mul(scale);
        d.aux -= Aux::AA;
    }
}

fn fold_shift(d: &mut Decoded) {
    let OpValue::Imm(v) = &mut d.ops[2].value else {
        return;
    };
    let (op, shift) = match d.op {
        Op::Add1 => (Op::Add, 1),
        Op::Add2 => (Op::Add, 2),
        Op::Add3 => (Op::Add, 3),
        Op::Sub1 => (Op::Sub, 1),
        Op::Sub2 => (Op::Sub, 2),
        _ => (Op::Sub, 3),
    };
    *v = v.wrapping_shl(shift);
    d.op = op;
}

/// Turn `ld a,[pcl,off]` into a load from the absolute literal address when
/// `mem` has that address loaded. Marks the rewrite with [`Aux::PCLOAD`].
pub fn inline_const<M: Memory + ?Sized>(d: &mut Decoded, mem: &M) {
    if d.op != Op::Ld || d.aux.intersects(Aux::AA_A | Aux::SIZE) {
        return;
    }
    let OpValue::Displ { base: PCL, disp, imm_base: false } = d.ops[1].value else {
        return;
    };
    let target = (d.ea & !3).wrapping_add(disp as u32);
    if mem.is_loaded(target) {
        d.ops[1].value = OpValue::Mem(target);
        d.aux |= Aux::PCLOAD;
    }
}
