use arc_rs::disasm::fmt_decoded;
use arc_rs::{ArcDecoder, Decoder, DecoderConfig, LinearMemory};
use pretty_assertions::assert_eq;

fn listing(cfg: DecoderConfig, halves: &[u16]) -> Vec<String> {
    let mut mem = LinearMemory::from_bytes(0, &vec![0; halves.len() * 2]);
    mem.write_halves(0, halves).unwrap();
    let dec = ArcDecoder::new(cfg);
    let mut out = Vec::new();
    let mut pc = 0;
    while let Ok(d) = dec.decode(&mem, pc) {
        out.push(fmt_decoded(&d));
        pc += d.size as u32;
    }
    out
}

#[test]
fn function_prologue_and_return() {
    let cfg = DecoderConfig { inline_const: true, ..DecoderConfig::default() };
    let text = listing(
        cfg,
        &[
            0xC0F1, // push_s blink
            0xC1A4, // sub_s sp,sp,16
            0xD101, // ld_s r1,[pcl,4]
            0x8C23, // ldb_s r1,[r12,3]
            0x7EE0, // j_s [blink]
            0x0000,
        ],
    );
    assert_eq!(
        text,
        vec![
            "push blink",
            "sub sp, sp, 0x10",
            "ld r1, [0x8]",
            "ld.b r1, [r12, 0x3]",
            "j [blink]",
        ]
    );
}

#[test]
fn immediate_base_and_long_immediates() {
    // ld r1,[0x80,r3] ; mov_s r1,0x12345678
    let ld: u32 = 4 << 27 | 6 << 24 | 0x30 << 16 | 7 << 12 | 3 << 6 | 1;
    let text = listing(
        DecoderConfig::default(),
        &[(ld >> 16) as u16, ld as u16, 0x0000, 0x0080, 0x71CF, 0x1234, 0x5678],
    );
    assert_eq!(text, vec!["ld r1, [0x80, r3]", "mov r1, 0x12345678"]);
}
