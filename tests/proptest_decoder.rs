//! Property-based tests for both encodings.
//!
//! - Decoding never panics on arbitrary input
//! - Sizes stay within the encoding's bounds and never exceed the input
//! - Errors report the requested address
//! - The rewrite pass is idempotent

use proptest::prelude::*;

use arc_rs::disasm::fmt_decoded;
use arc_rs::simplify::simplify;
use arc_rs::{ArcDecoder, DecodeError, Decoder, DecoderConfig, LinearMemory, Mode};

const BASE: u32 = 0x1000;

fn config(legacy: bool, simplify: bool, inline_const: bool) -> DecoderConfig {
    DecoderConfig {
        mode: if legacy { Mode::Legacy } else { Mode::Compact },
        simplify,
        inline_const,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4000))]

    #[test]
    fn decode_never_panics(
        bytes in prop::collection::vec(any::<u8>(), 0..16),
        off in 0u32..16,
        legacy in any::<bool>(),
        simplify in any::<bool>(),
        inline_const in any::<bool>(),
    ) {
        let mem = LinearMemory::from_bytes(BASE, &bytes);
        let dec = ArcDecoder::new(config(legacy, simplify, inline_const));
        if let Ok(d) = dec.decode(&mem, BASE + off) {
            let _ = fmt_decoded(&d);
        }
    }

    #[test]
    fn compact_sizes(bytes in prop::collection::vec(any::<u8>(), 2..12)) {
        let mem = LinearMemory::from_bytes(BASE, &bytes);
        let dec = ArcDecoder::new(config(false, false, false));
        if let Ok(d) = dec.decode(&mem, BASE) {
            prop_assert!(matches!(d.size, 2 | 4 | 6 | 8), "size {}", d.size);
            prop_assert!(d.size as usize <= bytes.len());
            prop_assert_eq!(d.ea, BASE);
        }
    }

    #[test]
    fn legacy_sizes(bytes in prop::collection::vec(any::<u8>(), 4..12)) {
        let mem = LinearMemory::from_bytes(BASE, &bytes);
        let dec = ArcDecoder::new(config(true, true, false));
        if let Ok(d) = dec.decode(&mem, BASE) {
            prop_assert!(matches!(d.size, 4 | 8), "size {}", d.size);
            prop_assert!(d.size as usize <= bytes.len());
        }
    }

    #[test]
    fn errors_carry_the_address(
        bytes in prop::collection::vec(any::<u8>(), 0..8),
        off in 0u32..8,
        legacy in any::<bool>(),
    ) {
        let mem = LinearMemory::from_bytes(BASE, &bytes);
        let cfg = config(legacy, false, false);
        let ea = BASE + off;
        match ArcDecoder::new(cfg).decode(&mem, ea) {
            Err(e @ DecodeError::Misaligned { .. }) => {
                prop_assert_eq!(e.ea(), ea);
                prop_assert!(ea % cfg.alignment() != 0);
            }
            Err(e) => prop_assert_eq!(e.ea(), ea),
            Ok(_) => prop_assert_eq!(ea % cfg.alignment(), 0),
        }
    }

    #[test]
    fn rewrite_is_idempotent(
        bytes in prop::collection::vec(any::<u8>(), 8..12),
        legacy in any::<bool>(),
    ) {
        let mem = LinearMemory::from_bytes(BASE, &bytes);
        if let Ok(once) = ArcDecoder::new(config(legacy, true, false)).decode(&mem, BASE) {
            let mut twice = once;
            simplify(&mut twice);
            prop_assert_eq!(twice, once);
        }
    }

    #[test]
    fn decode_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 8..12), legacy in any::<bool>()) {
        let mem = LinearMemory::from_bytes(BASE, &bytes);
        let dec = ArcDecoder::new(config(legacy, true, true));
        let a = dec.decode(&mem, BASE).ok();
        let b = dec.decode(&mem, BASE).ok();
        prop_assert_eq!(a, b);
    }
}
