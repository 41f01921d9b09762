//! fixed-width two's-complement values
//!
//! every element in the datapath is an `i64` that always holds a value representable in its
//! `ElementWidth`. assignments from wider results go through `wrap`, which truncates exactly
//! like a hardware register assignment does.

use serde::Serialize;

use crate::error::{AccelError, Result};

pub type Element = i64;

/// the widest element the simulator can hold
pub const MAX_WIDTH: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ElementWidth(u32);

impl ElementWidth {
    /// # Description
    /// - build a width, only 1..=64 bits are accepted
    ///
    /// # Example
    /// ```
    /// use cnn_accel::accelerator::ElementWidth;
    /// let width = ElementWidth::new(8).unwrap();
    /// assert_eq!(width.bits(), 8);
    /// assert!(ElementWidth::new(0).is_err());
    /// assert!(ElementWidth::new(65).is_err());
    /// ```
    pub fn new(bits: u32) -> Result<Self> {
        if bits == 0 || bits > MAX_WIDTH {
            return Err(AccelError::invalid_configuration(format!(
                "element width must be in 1..={}, got {}",
                MAX_WIDTH, bits
            )));
        }
        Ok(ElementWidth(bits))
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn mask(&self) -> u64 {
        if self.0 == MAX_WIDTH {
            u64::MAX
        } else {
            (1u64 << self.0) - 1
        }
    }

    pub fn min(&self) -> Element {
        self.sign_extend(1u64 << (self.0 - 1))
    }

    pub fn max(&self) -> Element {
        self.sign_extend(self.mask() >> 1)
    }

    pub fn contains(&self, value: Element) -> bool {
        value >= self.min() && value <= self.max()
    }

    /// interpret the low `bits` of `raw` as a signed value
    pub fn sign_extend(&self, raw: u64) -> Element {
        let shift = MAX_WIDTH - self.0;
        ((raw << shift) as i64) >> shift
    }

    /// # Description
    /// - truncate any integer to this width, keeping only the low bits
    /// - this is what a register assignment from a wider expression does
    ///
    /// # Example
    /// ```
    /// use cnn_accel::accelerator::ElementWidth;
    /// let w4 = ElementWidth::new(4).unwrap();
    /// assert_eq!(w4.wrap(7), 7);
    /// assert_eq!(w4.wrap(8), -8);
    /// assert_eq!(w4.wrap(-9), 7);
    /// ```
    pub fn wrap(&self, value: i128) -> Element {
        self.sign_extend(value as u64)
    }

    /// the bit pattern of `value` as it sits on the wire
    pub fn to_raw(&self, value: Element) -> u64 {
        (value as u64) & self.mask()
    }
}

/// the ReLU function
pub fn relu(value: Element) -> Element {
    if value < 0 {
        0
    } else {
        value
    }
}
