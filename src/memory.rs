use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Host view of the program image: word reads plus a readability query.
pub trait Memory {
    fn read_u8(&self, addr: u32) -> Result<u8>;
    fn read_u16(&self, addr: u32) -> Result<u16>;
    fn read_u32(&self, addr: u32) -> Result<u32>;
    /// Whether `addr` holds loaded data the decoder may treat as constant.
    fn is_loaded(&self, addr: u32) -> bool;
}

/// One contiguous region of bytes mapped at `base`.
#[derive(Clone, Serialize, Deserialize)]
pub struct LinearMemory {
    pub mem: Vec<u8>,
    pub base: u32,
    pub big_endian: bool,
}

impl LinearMemory {
    pub fn new(size: usize) -> Self {
        Self {
            mem: vec![0; size],
            base: 0,
            big_endian: false,
        }
    }

    pub fn from_bytes(base: u32, bytes: &[u8]) -> Self {
        Self {
            mem: bytes.to_vec(),
            base,
            big_endian: false,
        }
    }

    fn slice(&self, addr: u32, len: usize) -> Result<&[u8]> {
        let off = addr.wrapping_sub(self.base) as usize;
        self.mem
            .get(off..off.saturating_add(len))
            .filter(|_| addr >= self.base)
            .ok_or_else(|| anyhow!("read of {len} bytes at {addr:#010x} outside mapped memory"))
    }

    fn slice_mut(&mut self, addr: u32, len: usize) -> Result<&mut [u8]> {
        anyhow::ensure!(addr >= self.base, "write at {addr:#010x} below mapped memory");
        let off = (addr - self.base) as usize;
        self.mem
            .get_mut(off..off.saturating_add(len))
            .ok_or_else(|| anyhow!("write of {len} bytes at {addr:#010x} outside mapped memory"))
    }

    pub fn write_u16(&mut self, addr: u32, v: u16) -> Result<()> {
        let bytes = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.slice_mut(addr, 2)?.copy_from_slice(&bytes);
        Ok(())
    }

    pub fn write_u32(&mut self, addr: u32, v: u32) -> Result<()> {
        let bytes = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.slice_mut(addr, 4)?.copy_from_slice(&bytes);
        Ok(())
    }

    /// Store a compact-encoding sequence: each 16-bit parcel in memory order.
    pub fn write_halves(&mut self, addr: u32, halves: &[u16]) -> Result<()> {
        for (i, h) in halves.iter().enumerate() {
            self.write_u16(addr.wrapping_add(2 * i as u32), *h)?;
        }
        Ok(())
    }
}

impl Memory for LinearMemory {
    fn read_u8(&self, addr: u32) -> Result<u8> {
        Ok(self.slice(addr, 1)?[0])
    }
    fn read_u16(&self, addr: u32) -> Result<u16> {
        let b = self.slice(addr, 2)?;
        let b = [b[0], b[1]];
        Ok(if self.big_endian { u16::from_be_bytes(b) } else { u16::from_le_bytes(b) })
    }
    fn read_u32(&self, addr: u32) -> Result<u32> {
        let b = self.slice(addr, 4)?;
        let b = [b[0], b[1], b[2], b[3]];
        Ok(if self.big_endian { u32::from_be_bytes(b) } else { u32::from_le_bytes(b) })
    }
    fn is_loaded(&self, addr: u32) -> bool {
        addr >= self.base && ((addr - self.base) as usize) < self.mem.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_honour_base_and_bounds() {
        let mem = LinearMemory::from_bytes(0x1000, &[0x01, 0x02, 0x03, 0x04]);
        assert_eq!(mem.read_u16(0x1000).unwrap(), 0x0201);
        assert_eq!(mem.read_u32(0x1000).unwrap(), 0x0403_0201);
        assert!(mem.read_u16(0x1003).is_err());
        assert!(mem.read_u8(0x0FFF).is_err());
        assert!(mem.is_loaded(0x1003));
        assert!(!mem.is_loaded(0x1004));
    }

    #[test]
    fn big_endian_reads() {
        let mut mem = LinearMemory::from_bytes(0, &[0x12, 0x34, 0x56, 0x78]);
        mem.big_endian = true;
        assert_eq!(mem.read_u16(0).unwrap(), 0x1234);
        assert_eq!(mem.read_u32(0).unwrap(), 0x1234_5678);
        mem.write_u16(2, 0xBEEF).unwrap();
        assert_eq!(mem.mem, vec![0x12, 0x34, 0xBE, 0xEF]);
    }
}
