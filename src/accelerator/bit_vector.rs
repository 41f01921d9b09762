//! the flattened wire representation of a feature map
//!
//! bit 0 is the least significant bit. the text form is hex, most significant digit first,
//! the same way a verilog testbench would print the bus.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{AccelError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitVector {
    len: usize,
    words: Vec<u64>,
}

impl BitVector {
    pub fn zeros(len: usize) -> Self {
        BitVector {
            len,
            words: vec![0; (len + 63) / 64],
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.len, "bit {} out of range {}", index, self.len);
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    pub fn set_bit(&mut self, index: usize, value: bool) {
        assert!(index < self.len, "bit {} out of range {}", index, self.len);
        let mask = 1u64 << (index % 64);
        if value {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
    }

    /// # Description
    /// - read `width` bits starting at `offset`, bit `offset` lands in bit 0 of the result
    /// - `width` is at most 64
    pub fn field(&self, offset: usize, width: u32) -> u64 {
        assert!(width <= 64, "field width {} is wider than 64 bits", width);
        (0..width as usize)
            .filter(|&i| self.bit(offset + i))
            .fold(0u64, |acc, i| acc | (1u64 << i))
    }

    /// write the low `width` bits of `raw` starting at `offset`, `width` is at most 64
    pub fn set_field(&mut self, offset: usize, width: u32, raw: u64) {
        assert!(width <= 64, "field width {} is wider than 64 bits", width);
        for i in 0..width as usize {
            self.set_bit(offset + i, (raw >> i) & 1 == 1);
        }
    }

    /// # Description
    /// - parse a hex string into a vector of exactly `len` bits
    /// - `_` separators and a leading `0x` are allowed
    /// - bits set above `len` are rejected, never dropped
    ///
    /// # Example
    /// ```
    /// use cnn_accel::accelerator::BitVector;
    /// let v = BitVector::from_hex("c3e1", 16).unwrap();
    /// assert_eq!(v.field(0, 4), 0x1);
    /// assert_eq!(v.field(12, 4), 0xc);
    /// assert_eq!(v.to_string(), "c3e1");
    /// assert!(BitVector::from_hex("1ff", 8).is_err());
    /// ```
    pub fn from_hex(text: &str, len: usize) -> Result<Self> {
        let digits: Vec<char> = text
            .trim()
            .trim_start_matches("0x")
            .chars()
            .filter(|c| *c != '_')
            .collect();
        let mut vector = BitVector::zeros(len);
        for (nibble_index, c) in digits.iter().rev().enumerate() {
            let nibble = c
                .to_digit(16)
                .ok_or_else(|| AccelError::parse(format!("invalid hex digit '{}'", c)))?;
            for bit in 0..4 {
                if (nibble >> bit) & 1 == 1 {
                    let index = nibble_index * 4 + bit;
                    if index >= len {
                        return Err(AccelError::ShapeMismatch {
                            expected: len,
                            found: index + 1,
                        });
                    }
                    vector.set_bit(index, true);
                }
            }
        }
        Ok(vector)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nibbles = ((self.len + 3) / 4).max(1);
        let text: String = (0..nibbles)
            .rev()
            .map(|n| {
                let width = (self.len - n * 4).min(4) as u32;
                let value = if self.len == 0 { 0 } else { self.field(n * 4, width) };
                std::char::from_digit(value as u32, 16).unwrap_or('0')
            })
            .collect();
        write!(f, "{}", text)
    }
}

impl FromStr for BitVector {
    type Err = AccelError;

    /// the length is taken from the number of digits
    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .trim()
            .trim_start_matches("0x")
            .chars()
            .filter(|c| *c != '_')
            .count();
        BitVector::from_hex(s, digits * 4)
    }
}

impl Serialize for BitVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
