//! Core register numbers with a fixed role in the encodings.

pub const R0: u8 = 0;
pub const GP: u8 = 26;
pub const FP: u8 = 27;
pub const SP: u8 = 28;
pub const ILINK1: u8 = 29;
pub const ILINK2: u8 = 30;
pub const BLINK: u8 = 31;
pub const LP_COUNT: u8 = 60;

/// Legacy: short immediate, sets flags.
pub const SHIMM_F: u8 = 61;
/// Long immediate follows the instruction.
pub const LIMM: u8 = 62;
/// Legacy: short immediate without flag update.
pub const SHIMM: u8 = 63;
/// Compact: word-aligned PC of the current instruction.
pub const PCL: u8 = 63;

/// Field values that name an immediate rather than a register.
#[inline]
pub fn is_imm(code: u8) -> bool {
    code >= SHIMM_F
}

/// Map a 3-bit compact register field to its core register (r0-r3, r12-r15).
#[inline]
pub fn reg16(code: u32) -> u8 {
    let code = (code & 7) as u8;
    if code > 3 {
        code + 8
    } else {
        code
    }
}

pub fn reg_name(r: u8) -> String {
    match r {
        GP => "gp".into(),
        FP => "fp".into(),
        SP => "sp".into(),
        ILINK1 => "ilink1".into(),
        ILINK2 => "ilink2".into(),
        BLINK => "blink".into(),
        LP_COUNT => "lp_count".into(),
        PCL => "pcl".into(),
        _ => format!("r{r}"),
    }
}
