//! Opcode set and the per-transaction command description.

/// Refer to the MB85RS64V datasheet, "Command" table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Opcode {
    /// Set the write enable latch (WREN).
    WriteEnable = 0b0110,
    /// Reset the write enable latch (WRDI).
    WriteDisable = 0b0100,
    /// Read the 8-bit status register (RDSR).
    ReadStatus = 0b0101,
    /// Write the 8-bit status register (WRSR).
    WriteStatus = 0b0001,
    /// Read memory (READ).
    Read = 0b0011,
    /// Write memory (WRITE).
    Write = 0b0010,
    /// Read the manufacturer and product IDs (RDID).
    ReadDeviceId = 0b1001_1111,
}

impl Opcode {
    /// Only READ and WRITE are followed by an address.
    pub const fn has_address(self) -> bool {
        matches!(self, Opcode::Read | Opcode::Write)
    }
}

/// What happens on the bus after the opcode and address.
pub(crate) enum DataPhase<'a> {
    None,
    Read(&'a mut [u8]),
    Write(&'a [u8]),
    /// Shift out `0`, then clock in `1`, all under one select.
    WriteThenRead(&'a [u8], &'a mut [u8]),
}

/// One chip-select framed transaction.
///
/// Built only through the constructors below, so an address is present
/// exactly when the opcode needs one.
pub(crate) struct Command<'a> {
    pub(crate) opcode: Opcode,
    pub(crate) address: Option<u32>,
    pub(crate) data: DataPhase<'a>,
}

impl<'a> Command<'a> {
    fn bare(opcode: Opcode, data: DataPhase<'a>) -> Self {
        Self {
            opcode,
            address: None,
            data,
        }
    }

    pub(crate) fn write_enable() -> Self {
        Self::bare(Opcode::WriteEnable, DataPhase::None)
    }

    pub(crate) fn write_disable() -> Self {
        Self::bare(Opcode::WriteDisable, DataPhase::None)
    }

    pub(crate) fn read_status(status: &'a mut [u8; 1]) -> Self {
        Self::bare(Opcode::ReadStatus, DataPhase::Read(status))
    }

    /// The chip echoes one byte after the new value; it goes to `echo`.
    pub(crate) fn write_status(value: &'a [u8; 1], echo: &'a mut [u8; 1]) -> Self {
        Self::bare(Opcode::WriteStatus, DataPhase::WriteThenRead(value, echo))
    }

    pub(crate) fn read_device_id(id: &'a mut [u8; 4]) -> Self {
        Self::bare(Opcode::ReadDeviceId, DataPhase::Read(id))
    }

    pub(crate) fn read(addr: u32, buf: &'a mut [u8]) -> Self {
        Self {
            opcode: Opcode::Read,
            address: Some(addr),
            data: DataPhase::Read(buf),
        }
    }

    pub(crate) fn write(addr: u32, data: &'a [u8]) -> Self {
        Self {
            opcode: Opcode::Write,
            address: Some(addr),
            data: DataPhase::Write(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_values() {
        assert_eq!(Opcode::WriteEnable as u8, 0x06);
        assert_eq!(Opcode::WriteDisable as u8, 0x04);
        assert_eq!(Opcode::ReadStatus as u8, 0x05);
        assert_eq!(Opcode::WriteStatus as u8, 0x01);
        assert_eq!(Opcode::Read as u8, 0x03);
        assert_eq!(Opcode::Write as u8, 0x02);
        assert_eq!(Opcode::ReadDeviceId as u8, 0x9F);
    }

    #[test]
    fn address_only_on_memory_access() {
        let mut buf = [0u8; 4];
        let mut status = [0u8; 1];
        let mut echo = [0u8; 1];
        let value = [0u8; 1];
        let commands = [
            Command::write_enable(),
            Command::write_disable(),
            Command::read_status(&mut status),
            Command::write_status(&value, &mut echo),
            Command::read_device_id(&mut buf),
        ];
        for cmd in &commands {
            assert!(!cmd.opcode.has_address());
            assert_eq!(cmd.address, None);
        }

        let mut data = [0u8; 2];
        let read = Command::read(0x10, &mut data);
        assert!(read.opcode.has_address());
        assert_eq!(read.address, Some(0x10));

        let write = Command::write(0x20, &[1, 2]);
        assert!(write.opcode.has_address());
        assert_eq!(write.address, Some(0x20));
    }
}
