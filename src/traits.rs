use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::comms::Fram;
use crate::error::Error;

/// Byte-addressable memory that keeps its contents without power.
pub trait NonVolatileMemory {
    type Error;

    /// Reads memory contents into `buf`, starting at `addr`.
    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Stores `data` starting at `addr`, doing whatever unlocking the part
    /// needs first.
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), Self::Error>;

    /// Size in bytes, if known.
    fn capacity(&self) -> Option<u32>;
}

impl<SPI, CS> NonVolatileMemory for Fram<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = Error<SPI, CS>;

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Self::Error> {
        self.read_bytes(addr, buf)
    }

    /// Sets the write enable latch, then writes. The chip clears the latch
    /// again once the write is committed.
    fn write(&mut self, addr: u32, data: &[u8]) -> Result<(), Self::Error> {
        self.write_enable(true)?;
        self.write_bytes(addr, data)
    }

    fn capacity(&self) -> Option<u32> {
        Fram::capacity(self)
    }
}
