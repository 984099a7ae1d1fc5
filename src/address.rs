//! Memory address encoding.
//!
//! The MB85RS family takes its address MSB first, right after the opcode.
//! Smaller parts only decode the low 13 bits of a 16-bit address, bigger
//! parts take 24 bits. This driver lets the caller pick the width.

use crate::error::ConfigError;

/// Number of address bytes sent after an address-bearing opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AddressWidth(u8);

impl AddressWidth {
    pub const ONE: Self = Self(1);
    pub const TWO: Self = Self(2);
    pub const THREE: Self = Self(3);
    pub const FOUR: Self = Self(4);

    /// Returns `None` unless `bytes` is between 1 and 4.
    pub const fn new(bytes: u8) -> Option<Self> {
        match bytes {
            1..=4 => Some(Self(bytes)),
            _ => None,
        }
    }

    /// Number of bytes on the wire.
    pub const fn bytes(self) -> usize {
        self.0 as usize
    }

    /// Highest address that survives encoding without truncation.
    pub const fn max_address(self) -> u32 {
        u32::MAX >> (8 * (4 - self.0 as u32))
    }

    /// Encodes `address` big-endian into the first `self.bytes()` bytes of
    /// `buf` and returns them.
    ///
    /// Bits above the configured width are dropped. Keeping `address` inside
    /// the part's capacity is the caller's job.
    pub fn encode(self, address: u32, buf: &mut [u8; 4]) -> &[u8] {
        let width = self.bytes();
        let be = address.to_be_bytes();
        buf[..width].copy_from_slice(&be[4 - width..]);
        &buf[..width]
    }
}

impl Default for AddressWidth {
    fn default() -> Self {
        Self::TWO
    }
}

impl TryFrom<u8> for AddressWidth {
    type Error = ConfigError;

    fn try_from(bytes: u8) -> Result<Self, Self::Error> {
        Self::new(bytes).ok_or(ConfigError::InvalidAddressWidth(bytes))
    }
}
