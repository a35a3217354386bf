use std::cmp::Ordering;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ReplayError, Result};

/// Byte-aligned little-endian reader over a replay buffer.
///
/// The read position only ever moves forward and never past the end of
/// `data`; a read that cannot be satisfied leaves the position untouched
/// and returns [`ReplayError::Truncated`].
#[derive(Debug, Clone, Copy)]
pub struct ReplayBuffer<'a> {
    pub data: &'a [u8],
    pub byte_index: usize,
}

impl<'a> ReplayBuffer<'a> {
    const MAX_VAR_INT_BYTES: usize = 5;

    pub fn new(data: &'a [u8]) -> Self {
        ReplayBuffer {
            data,
            byte_index: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.byte_index
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.byte_index
    }

    pub fn done(&self) -> bool {
        self.byte_index >= self.data.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(ReplayError::Truncated {
                offset: self.byte_index,
                needed: n,
                remaining,
            });
        }
        let start = self.byte_index;
        self.byte_index += n;
        Ok(&self.data[start..self.byte_index])
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.take(n)
    }

    /// Splits off the next `n` bytes as an independent buffer.
    pub fn sub_buffer(&mut self, n: usize) -> Result<ReplayBuffer<'a>> {
        Ok(ReplayBuffer::new(self.take(n)?))
    }

    pub fn skip_bytes(&mut self, n: usize) -> Result<&Self> {
        self.take(n)?;

        Ok(self)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(LittleEndian::read_u64(self.take(8)?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(LittleEndian::read_i64(self.take(8)?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    /// Single byte, nonzero is true.
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }

    /// Unreal serializes `bool` fields of archive headers as a full `u32`.
    pub fn read_u32_bool(&mut self) -> Result<bool> {
        Ok(self.read_u32()? != 0)
    }

    /// read_var_int reads a variable-length int value.
    /// Format: read from input by 8 bits, little-endian groups.
    ///     * Highest bit tells if have to read more bytes (at most 5 bytes),
    ///     * Lowest bit of the assembled value is not data but tells if the number is negative.
    pub fn read_var_int(&mut self) -> Result<i64> {
        let mut value: u64 = 0;
        for i in 0..Self::MAX_VAR_INT_BYTES {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                let magnitude = (value >> 1) as i64;
                return Ok(if value & 0x01 > 0 {
                    -magnitude
                } else {
                    magnitude
                });
            }
        }
        Err(ReplayError::Malformed(format!(
            "variable-length integer at offset {} exceeds {} bytes",
            self.byte_index - Self::MAX_VAR_INT_BYTES,
            Self::MAX_VAR_INT_BYTES
        )))
    }

    /// Reads an `FString`: a signed 32-bit length followed by either
    /// `length` single-byte units or `-length` UTF-16LE code units.
    /// Both forms end in a null unit, which must be present and is stripped.
    pub fn read_fstring(&mut self) -> Result<String> {
        let offset = self.byte_index;
        let length = self.read_i32()?;
        let (value, terminated) = match length.cmp(&0) {
            Ordering::Equal => return Ok(String::new()),
            Ordering::Greater => {
                let bytes = self.take(length as usize)?;
                let value: String = bytes.iter().map(|&b| b as char).collect();
                (value, bytes.last() == Some(&0))
            }
            Ordering::Less => {
                let units = length.unsigned_abs() as usize;
                let bytes = self.take(units.saturating_mul(2))?;
                let code_units: Vec<u16> = bytes.chunks_exact(2).map(LittleEndian::read_u16).collect();
                (
                    String::from_utf16_lossy(&code_units),
                    code_units.last() == Some(&0),
                )
            }
        };
        if !terminated {
            return Err(ReplayError::Malformed(format!(
                "string at offset {offset} is missing its null terminator"
            )));
        }

        Ok(value.trim_end_matches('\0').to_string())
    }

    /// Reads a `u32` magic number; a mismatch means the data is some other format.
    pub fn expect_magic(&mut self, expected: u32, what: &str) -> Result<()> {
        let magic = self.read_u32()?;
        if magic != expected {
            return Err(ReplayError::UnsupportedFormat(format!(
                "bad {what} magic {magic:#010x}, expected {expected:#010x}"
            )));
        }
        Ok(())
    }

    pub fn read_guid(&mut self) -> Result<[u8; 16]> {
        let mut guid = [0u8; 16];
        guid.copy_from_slice(self.take(16)?);
        Ok(guid)
    }

    /// A `u32` element count followed by that many elements.
    pub fn read_array<T>(&mut self, mut read: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let count = self.read_u32()? as usize;
        // every element takes at least one byte, so a larger count is already truncated
        let mut items = Vec::with_capacity(count.min(self.remaining()));
        for _ in 0..count {
            items.push(read(self)?);
        }
        Ok(items)
    }
}

pub fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
