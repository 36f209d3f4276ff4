use crate::decoder::DecodeError;
use crate::memory::Memory;

/// Transient state for one instruction decode.
///
/// Tracks the read cursor and caches the long immediate so that two
/// operand slots naming r62 trigger a single fetch.
pub struct DecodeCtx<'m, M: Memory + ?Sized> {
    pub ea: u32,
    pos: u32,
    mem: &'m M,
    limm: Option<u32>,
}

impl<'m, M: Memory + ?Sized> DecodeCtx<'m, M> {
    pub fn new(mem: &'m M, ea: u32) -> Self {
        Self { ea, pos: ea, mem, limm: None }
    }

    pub fn next_u16(&mut self) -> Result<u16, DecodeError> {
        let v = self
            .mem
            .read_u16(self.pos)
            .map_err(|source| DecodeError::Truncated { ea: self.ea, source })?;
        self.pos = self.pos.wrapping_add(2);
        Ok(v)
    }

    pub fn next_u32(&mut self) -> Result<u32, DecodeError> {
        let v = self
            .mem
            .read_u32(self.pos)
            .map_err(|source| DecodeError::Truncated { ea: self.ea, source })?;
        self.pos = self.pos.wrapping_add(4);
        Ok(v)
    }

    /// Compact long immediate: two parcels, high half first.
    pub fn limm(&mut self) -> Result<u32, DecodeError> {
        if let Some(v) = self.limm {
            return Ok(v);
        }
        let hi = self.next_u16()? as u32;
        let lo = self.next_u16()? as u32;
        let v = (hi << 16) | lo;
        self.limm = Some(v);
        Ok(v)
    }

    /// Bytes consumed so far.
    pub fn size(&self) -> u8 {
        self.pos.wrapping_sub(self.ea) as u8
    }
}
