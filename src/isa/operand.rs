//! Operand shapes shared by both encodings.

use crate::decoder::{OpValue, Operand};
use crate::flags::Width;
use crate::regs::{is_imm, LIMM};

/// Build the memory operand `[b, c]`.
///
/// A field naming an immediate takes `limm` for r62 and `shimm` otherwise:
///
/// | b   | c   | result                     |
/// |-----|-----|----------------------------|
/// | imm | imm | `Mem(imm1 + imm2)`         |
/// | reg | imm | `Displ [b, imm]`           |
/// | imm | reg | `Displ [imm, c]` imm base  |
/// | reg | reg | `Phrase [b, c]`            |
///
/// `no_offset` zeroes the c-side immediate (aux register moves).
pub fn indirect(b: u8, c: u8, shimm: i32, limm: u32, no_offset: bool, width: Width) -> Operand {
    let imm = |r: u8| if r == LIMM { limm } else { shimm as u32 };
    let value = match (is_imm(b), is_imm(c)) {
        (true, true) => {
            let off = if no_offset { 0 } else { imm(c) };
            OpValue::Mem(imm(b).wrapping_add(off))
        }
        (false, false) => OpValue::Phrase { base: b, index: c },
        (false, true) => OpValue::Displ {
            base: b,
            disp: if no_offset { 0 } else { imm(c) as i32 },
            imm_base: false,
        },
        (true, false) => OpValue::Displ { base: c, disp: imm(b) as i32, imm_base: true },
    };
    Operand { value, width }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regs::{SHIMM, SHIMM_F};

    #[test]
    fn shapes_by_field_kind() {
        let w = Width::Word;
        assert_eq!(indirect(1, 2, 5, 0, false, w).value, OpValue::Phrase { base: 1, index: 2 });
        assert_eq!(
            indirect(1, SHIMM, -8, 0, false, w).value,
            OpValue::Displ { base: 1, disp: -8, imm_base: false }
        );
        assert_eq!(
            indirect(LIMM, 3, 0, 0x1000, false, w).value,
            OpValue::Displ { base: 3, disp: 0x1000, imm_base: true }
        );
        assert_eq!(indirect(LIMM, SHIMM_F, 4, 0x1000, false, w).value, OpValue::Mem(0x1004));
    }

    #[test]
    fn no_offset_drops_the_index_immediate() {
        let w = Width::Word;
        assert_eq!(
            indirect(1, SHIMM, 12, 0, true, w).value,
            OpValue::Displ { base: 1, disp: 0, imm_base: false }
        );
        assert_eq!(indirect(LIMM, LIMM, 0, 0x40, true, w).value, OpValue::Mem(0x40));
        assert_eq!(indirect(1, 2, 0, 0, false, Width::Byte).width, Width::Byte);
    }
}
