use crate::decoder::{Decoded, OpValue, Operand};
use crate::flags::{AddrMode, Aux, Width, COND_NAMES};
use crate::regs::reg_name;

/// Plain-text listing of one instruction, e.g. `ld.ab r1, [r2, 0x4]`.
pub fn fmt_decoded(d: &Decoded) -> String {
    let mut s = format!("{}{}", d.op.mnemonic(), suffixes(d));
    let ops: Vec<String> = d.ops.iter().filter(|o| !o.is_void()).map(fmt_operand).collect();
    if !ops.is_empty() {
        s.push(' ');
        s.push_str(&ops.join(", "));
    }
    s
}

pub fn fmt_operand(o: &Operand) -> String {
    match o.value {
        OpValue::Void => String::new(),
        OpValue::Reg(r) => reg_name(r),
        OpValue::Imm(v) => format!("{v:#x}"),
        OpValue::Displ { base, disp, imm_base: false } => {
            if disp == 0 {
                format!("[{}]", reg_name(base))
            } else {
                format!("[{}, {}]", reg_name(base), signed(disp))
            }
        }
        OpValue::Displ { base, disp, imm_base: true } => {
            format!("[{:#x}, {}]", disp as u32, reg_name(base))
        }
        OpValue::Phrase { base, index } => format!("[{}, {}]", reg_name(base), reg_name(index)),
        OpValue::Mem(a) => format!("[{a:#x}]"),
        OpValue::Near(a) => format!("{a:#x}"),
    }
}

fn signed(v: i32) -> String {
    if v < 0 {
        format!("-{:#x}", v.unsigned_abs())
    } else {
        format!("{v:#x}")
    }
}

fn suffixes(d: &Decoded) -> String {
    let mut s = String::new();
    let aux = d.aux;
    if d.op.is_load_store() {
        match aux.width() {
            Width::Byte => s.push_str(".b"),
            Width::Half => s.push_str(".w"),
            Width::Word => {}
        }
        if aux.contains(Aux::X) {
            s.push_str(".x");
        }
        match aux.addr_mode() {
            AddrMode::None => {}
            AddrMode::PreUpdate => s.push_str(".a"),
            AddrMode::PostUpdate => s.push_str(".ab"),
            AddrMode::Scaled => s.push_str(".as"),
        }
        if aux.contains(Aux::DI) {
            s.push_str(".di");
        }
        return s;
    }
    match aux.cond() {
        0 => {}
        c if (c as usize) < COND_NAMES.len() => {
            s.push('.');
            s.push_str(COND_NAMES[c as usize]);
        }
        c => s.push_str(&format!(".c{c}")),
    }
    if aux.contains(Aux::F) {
        s.push_str(".f");
    }
    match (aux & Aux::DELAY).bits() {
        0x20 => s.push_str(".d"),
        0x40 => s.push_str(".jd"),
        _ => {}
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::cond;
    use crate::instructions::Op;
    use crate::regs::{BLINK, SP};

    #[test]
    fn lists_operands_in_order() {
        let mut d = Decoded::new(0, Op::Add);
        d.ops = [Operand::reg(SP), Operand::reg(SP), Operand::imm(0x10)];
        assert_eq!(fmt_decoded(&d), "add sp, sp, 0x10");
    }

    #[test]
    fn branch_suffixes() {
        let mut d = Decoded::new(0, Op::J);
        d.ops[0] = Operand::displ(BLINK, 0);
        d.aux = Aux::empty().with_cond(cond::NE) | Aux::D;
        assert_eq!(fmt_decoded(&d), "j.ne.d [blink]");
    }

    #[test]
    fn load_qualifiers() {
        let mut d = Decoded::new(0, Op::Ld);
        d.ops[0] = Operand::reg(1);
        d.ops[1] = Operand::displ(2, -4);
        d.aux = Aux::SIZE_W | Aux::X | Aux::AA_AB;
        assert_eq!(fmt_decoded(&d), "ld.w.x.ab r1, [r2, -0x4]");
    }
}
