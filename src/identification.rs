//! Device identification as returned by RDID (9Fh).
//!
//! The chip shifts out four bytes: manufacturer ID, continuation code,
//! then the 16-bit product ID. See p.10 of the MB85RS64V datasheet:
//! <http://www.fujitsu.com/downloads/MICRO/fsa/pdf/products/memory/fram/MB85RS64V-DS501-00015-4v0-E.pdf>

/// Manufacturer IDs seen on the silicon revisions this driver supports.
pub const KNOWN_MANUFACTURER_IDS: [u8; 2] = [0x04, 0x07];

/// Product IDs seen on the silicon revisions this driver supports.
///
/// Supporting another variant means adding its ID here.
pub const KNOWN_PRODUCT_IDS: [u16; 2] = [0x0302, 0x7F7F];

const KIB: u32 = 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceId {
    pub manufacturer_id: u8,
    pub product_id: u16,
}

impl DeviceId {
    /// Decodes a raw RDID response. Byte 1 (continuation code) is ignored.
    pub const fn from_rdid(raw: [u8; 4]) -> Self {
        Self {
            manufacturer_id: raw[0],
            product_id: u16::from_be_bytes([raw[2], raw[3]]),
        }
    }

    /// True if both halves of the ID are in the known sets.
    pub fn is_known(&self) -> bool {
        KNOWN_MANUFACTURER_IDS.contains(&self.manufacturer_id)
            && KNOWN_PRODUCT_IDS.contains(&self.product_id)
    }

    /// Memory size in bytes encoded in the product ID, if there is one.
    ///
    /// The low 5 bits of the product ID's high byte hold log2 of the size
    /// in KiB: 0x0302 gives 2^3 KiB = 8 KiB. A high byte of 0x7F is a
    /// continuation code and carries no density.
    pub fn density(&self) -> Option<u32> {
        const CONTINUATION: u8 = 0x7F;
        const MASK: u8 = 0b0001_1111;

        let [hi, _] = self.product_id.to_be_bytes();
        if hi == CONTINUATION {
            return None;
        }
        1u32.checked_shl(u32::from(hi & MASK))?.checked_mul(KIB)
    }
}
