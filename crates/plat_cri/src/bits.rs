//! Backward bit reader used by CRILAYLA.

use crate::error::{Error, Result};

/// Reads bits MSB-first, starting at the last byte of the buffer and moving toward the front.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    remaining: usize,
    pool: u32,
    left: u32,
}

impl<'a> BitReader<'a> {
    /// Create a reader positioned at the last byte of `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            remaining: data.len(),
            pool: 0,
            left: 0,
        }
    }

    /// Assemble the next `count` bits, at most 32, into an integer.
    ///
    /// Fails with [`Error::BitstreamExhausted`] instead of reading before the first byte.
    pub fn get_bits(&mut self, count: u32) -> Result<u32> {
        debug_assert!(count <= 32);

        let mut result = 0u32;
        let mut produced = 0;
        while produced < count {
            if self.left == 0 {
                if self.remaining == 0 {
                    return Err(Error::BitstreamExhausted);
                }
                self.remaining -= 1;
                self.pool = self.data[self.remaining] as u32;
                self.left = 8;
            }

            let round = self.left.min(count - produced);
            let bits = (self.pool >> (self.left - round)) & ((1 << round) - 1);
            result = (result << round) | bits;
            self.left -= round;
            produced += round;
        }

        Ok(result)
    }

    /// Number of bits that can still be read
    pub fn bits_left(&self) -> usize {
        self.remaining * 8 + self.left as usize
    }
}
