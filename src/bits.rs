use num_traits::{PrimInt, Unsigned};

/// Extract the inclusive bit range `high..=low` of `value`.
#[inline]
pub fn bits<T: PrimInt + Unsigned>(value: T, high: u32, low: u32) -> u32 {
    debug_assert!(high >= low && (high as usize) < T::zero().count_zeros() as usize);
    let width = high - low + 1;
    let v = (value >> low as usize).to_u64().unwrap_or(0);
    (v & ((1u64 << width) - 1)) as u32
}

/// Like [`bits`], but treats bit `high` as the sign bit.
#[inline]
pub fn sbits<T: PrimInt + Unsigned>(value: T, high: u32, low: u32) -> i32 {
    sign_extend(bits(value, high, low), high - low + 1)
}

/// Two's-complement sign extension of the low `width` bits of `v`.
#[inline]
pub fn sign_extend(v: u32, width: u32) -> i32 {
    let v = v as i64 & ((1i64 << width) - 1);
    if v & (1i64 << (width - 1)) != 0 {
        (v - (1i64 << width)) as i32
    } else {
        v as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_ranges() {
        assert_eq!(bits(0xABCDu16, 15, 11), 0x15);
        assert_eq!(bits(0xABCDu16, 3, 0), 0xD);
        assert_eq!(bits(0xDEAD_BEEFu32, 31, 0), 0xDEAD_BEEF);
        assert_eq!(bits(0x8000_0000u32, 31, 31), 1);
    }

    #[test]
    fn sign_extends() {
        assert_eq!(sbits(0x1FFu32, 8, 0), -1);
        assert_eq!(sbits(0x0FFu32, 8, 0), 255);
        assert_eq!(sbits(0x100u32, 8, 0), -256);
        assert_eq!(sbits(0x20u16, 5, 0), -32);
        assert_eq!(sbits(0xFFFF_FFFFu32, 31, 0), -1);
        assert_eq!(sign_extend(0x800, 12), -2048);
        assert_eq!(sign_extend(0x7FF, 12), 2047);
    }
}
