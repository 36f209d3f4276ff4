use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use std::fmt::Write as _;
use std::path::Path;

use arc_disasm::{load_raw_bin, Image};
use arc_rs::disasm::fmt_decoded;
use arc_rs::{ArcDecoder, Decoded, Decoder, DecoderConfig, Memory, Mode};

#[derive(Parser, Debug)]
#[command(author, version, about = "ARC disassembler CLI", long_about = None)]
struct Cli {
    /// Load address for the binary in target address space
    #[arg(long, default_value_t = 0u32)]
    base: u32,
    /// Skip N bytes at start of file before loading
    #[arg(long, default_value_t = 0usize)]
    skip: usize,
    /// Input binary path
    #[arg(value_name = "BINFILE")]
    input: String,
    /// Limit bytes loaded (default: to EOF after --skip)
    #[arg(long)]
    len: Option<usize>,
    /// Decode the ARCtangent-A4 32-bit encoding instead of ARCompact
    #[arg(long)]
    legacy: bool,
    /// Rewrite pseudo-instructions (ld.as scaling, addN folding, sub.f -> cmp)
    #[arg(long)]
    simplify: bool,
    /// Resolve pc-relative literal loads to absolute addresses
    #[arg(long)]
    inline_const: bool,
    /// Image is stored big-endian
    #[arg(long)]
    big_endian: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List loaded segments (simple single-segment for raw .bin)
    Sections,
    /// Disassemble a range [start, end) in bytes
    Range {
        /// Start address (hex or dec)
        start: String,
        /// End address (hex or dec, exclusive)
        end: String,
        /// Show instruction bytes
        #[arg(long)]
        show_bytes: bool,
        /// Output format: text or json
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write output to file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// One row of a range listing.
#[derive(Debug, Clone, serde::Serialize)]
struct Line {
    addr: u32,
    bytes: Vec<u8>,
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    insn: Option<Decoded>,
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn raw_bytes(img: &Image, addr: u32, n: u32) -> Vec<u8> {
    (0..n).filter_map(|i| img.byte(addr.wrapping_add(i))).collect()
}

/// Linear sweep over `[start, end)`. Undecodable slots become `.half`/`.word`
/// data directives and the sweep resumes at the next aligned address.
fn sweep(img: &Image, dec: &ArcDecoder, start: u32, end: u32) -> Vec<Line> {
    let step = dec.config().alignment();
    let mut pc = start;
    let mut lines = Vec::new();
    while pc < end {
        match dec.decode(img, pc) {
            Ok(d) => {
                let size = u32::from(d.size);
                lines.push(Line {
                    addr: pc,
                    bytes: raw_bytes(img, pc, size),
                    text: fmt_decoded(&d),
                    insn: Some(d),
                });
                pc = pc.wrapping_add(size);
            }
            Err(e) => {
                debug!(%e, "emitting data");
                let text = match dec.config().mode {
                    Mode::Compact => img.read_u16(pc).map(|v| format!(".half {v:#06x}")),
                    Mode::Legacy => img.read_u32(pc).map(|v| format!(".word {v:#010x}")),
                };
                let Ok(text) = text else {
                    lines.push(Line { addr: pc, bytes: Vec::new(), text: "<oob>".into(), insn: None });
                    break;
                };
                lines.push(Line { addr: pc, bytes: raw_bytes(img, pc, step), text, insn: None });
                pc = pc.wrapping_add(step);
            }
        }
    }
    lines
}

fn render_text(lines: &[Line], show_bytes: bool) -> String {
    let mut buf = String::new();
    for l in lines {
        let _ = write!(buf, "{:#010x}: ", l.addr);
        if show_bytes {
            for b in &l.bytes {
                let _ = write!(buf, "{b:02x} ");
            }
            let _ = write!(buf, "  ");
        }
        let _ = writeln!(buf, "{}", l.text);
    }
    buf
}

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let img = load_raw_bin(Path::new(&cli.input), cli.base, cli.skip, cli.len, cli.big_endian)?;

    match cli.cmd {
        Command::Sections => {
            println!("{:<10} {:<#12} {:<#12} {:<6} {:<6}", "name", "start", "end", "perms", "kind");
            for s in &img.segments {
                println!(
                    "{:<10} {:#010x} {:#010x} {:<6} {:<6}",
                    s.name,
                    s.base,
                    s.end(),
                    s.perms,
                    s.kind
                );
            }
        }
        Command::Range { start, end, show_bytes, format, out } => {
            let start = parse_u32(&start)?;
            let end = parse_u32(&end)?;
            anyhow::ensure!(end >= start, "end must be >= start");

            let cfg = DecoderConfig {
                mode: if cli.legacy { Mode::Legacy } else { Mode::Compact },
                simplify: cli.simplify,
                inline_const: cli.inline_const,
            };
            info!(?cfg, start, end, "disassembling range");
            let dec = ArcDecoder::new(cfg);
            let lines = sweep(&img, &dec, start, end);
            let buf = match format {
                OutputFormat::Text => render_text(&lines, show_bytes),
                OutputFormat::Json => serde_json::to_string_pretty(&lines)?,
            };
            if let Some(path) = out {
                std::fs::write(path, buf)?;
            } else {
                print!("{buf}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arc_disasm::Segment;
    use pretty_assertions::assert_eq;

    fn image(bytes: Vec<u8>) -> Image {
        let seg = Segment { name: "t".into(), base: 0x100, bytes, perms: "r-x", kind: "raw" };
        Image { segments: vec![seg], big_endian: false }
    }

    #[test]
    fn parse_u32_hex_and_dec() {
        assert_eq!(parse_u32("0x10").unwrap(), 16);
        assert_eq!(parse_u32(" 0X1f ").unwrap(), 31);
        assert_eq!(parse_u32("42").unwrap(), 42);
        assert!(parse_u32("zz").is_err());
    }

    #[test]
    fn compact_sweep_advances_by_size() {
        // mov_s r2, r2 ; nop_s
        let img = image(vec![0x48, 0x72, 0xE0, 0x78]);
        let dec = ArcDecoder::new(DecoderConfig::default());
        let lines = sweep(&img, &dec, 0x100, 0x104);
        let text: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(text, vec!["mov r2, r2", "nop"]);
        assert_eq!(lines[1].addr, 0x102);
        assert_eq!(lines[0].bytes, vec![0x48, 0x72]);
    }

    #[test]
    fn undecodable_compact_parcel_becomes_half() {
        // major 0x06 is unassigned
        let img = image(vec![0x00, 0x30, 0x00, 0x00]);
        let dec = ArcDecoder::new(DecoderConfig::default());
        let lines = sweep(&img, &dec, 0x100, 0x102);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, ".half 0x3000");
        assert_eq!(lines[0].bytes, vec![0x00, 0x30]);
        assert!(lines[0].insn.is_none());
    }

    #[test]
    fn truncated_tail_stops_the_sweep() {
        let img = image(vec![0x00]);
        let dec = ArcDecoder::new(DecoderConfig::default());
        let lines = sweep(&img, &dec, 0x100, 0x102);
        assert_eq!(render_text(&lines, false), "0x00000100: <oob>\n");
    }
}
