use anyhow::{anyhow, Result};
use arc_rs::Memory;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct Segment {
    pub name: String,
    pub base: u32,
    pub bytes: Vec<u8>,
    pub perms: &'static str, // e.g., "r-x"
    pub kind: &'static str,  // e.g., "raw"
}

impl Segment {
    pub fn end(&self) -> u32 {
        self.base.wrapping_add(self.bytes.len() as u32)
    }

    fn contains(&self, addr: u32) -> bool {
        addr >= self.base && addr < self.end()
    }
}

/// Loaded program image; answers decoder reads across its segments.
#[derive(Debug, Clone)]
pub struct Image {
    pub segments: Vec<Segment>,
    pub big_endian: bool,
}

pub fn load_raw_bin(
    path: &Path,
    base: u32,
    skip: usize,
    len: Option<usize>,
    big_endian: bool,
) -> Result<Image> {
    let file = std::fs::read(path)?;
    anyhow::ensure!(skip <= file.len(), "--skip exceeds file size");
    let mut payload = &file[skip..];
    if let Some(lim) = len {
        anyhow::ensure!(lim <= payload.len(), "--len exceeds remaining file size after skip");
        payload = &payload[..lim];
    }
    let seg = Segment {
        name: "segment0".into(),
        base,
        bytes: payload.to_vec(),
        perms: "r-x",
        kind: "raw",
    };
    Ok(Image { segments: vec![seg], big_endian })
}

impl Image {
    pub fn byte(&self, addr: u32) -> Option<u8> {
        let s = self.segments.iter().find(|s| s.contains(addr))?;
        s.bytes.get((addr - s.base) as usize).copied()
    }

    fn bytes<const N: usize>(&self, addr: u32) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        for (i, b) in out.iter_mut().enumerate() {
            let a = addr.wrapping_add(i as u32);
            *b = self.byte(a).ok_or_else(|| anyhow!("address {a:#010x} is not mapped"))?;
        }
        Ok(out)
    }
}

impl Memory for Image {
    fn read_u8(&self, addr: u32) -> Result<u8> {
        Ok(self.bytes::<1>(addr)?[0])
    }

    fn read_u16(&self, addr: u32) -> Result<u16> {
        let b = self.bytes(addr)?;
        Ok(if self.big_endian { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) })
    }

    fn read_u32(&self, addr: u32) -> Result<u32> {
        let b = self.bytes(addr)?;
        Ok(if self.big_endian { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) })
    }

    fn is_loaded(&self, addr: u32) -> bool {
        self.segments.iter().any(|s| s.contains(addr))
    }
}
