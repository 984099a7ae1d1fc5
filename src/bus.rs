//! Chip-select framed transactions.
//!
//! Every command runs as: CS low, opcode, address (READ/WRITE only), data
//! phase, flush, CS high. The rising CS edge is what commits a WRITE or
//! WRSR on the chip, so CS is released on every exit path, including a
//! failed transfer.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::address::AddressWidth;
use crate::command::{Command, DataPhase};
use crate::error::Error;

/// Opcode plus the widest address.
const MAX_HEADER: usize = 5;

pub(crate) struct Bus<SPI, CS> {
    spi: SPI,
    cs: CS,
    address_width: AddressWidth,
}

impl<SPI, CS> Bus<SPI, CS> {
    pub(crate) fn new(spi: SPI, cs: CS, address_width: AddressWidth) -> Self {
        Self {
            spi,
            cs,
            address_width,
        }
    }

    pub(crate) fn address_width(&self) -> AddressWidth {
        self.address_width
    }

    pub(crate) fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Bus<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Drives CS to its idle (high) level.
    pub(crate) fn deselect(&mut self) -> Result<(), Error<SPI, CS>> {
        self.cs.set_high().map_err(Error::Gpio)
    }

    /// Runs one command as a single transaction.
    pub(crate) fn execute(&mut self, command: Command<'_>) -> Result<(), Error<SPI, CS>> {
        let Command {
            opcode,
            address,
            data,
        } = command;
        debug_assert_eq!(address.is_some(), opcode.has_address());

        let mut header = [0u8; MAX_HEADER];
        header[0] = opcode as u8;
        let mut len = 1;
        if let Some(addr) = address {
            trace!("{:?} @ {:#x}", opcode, addr);
            let mut encoded = [0u8; 4];
            let encoded = self.address_width.encode(addr, &mut encoded);
            header[1..1 + encoded.len()].copy_from_slice(encoded);
            len += encoded.len();
        }
        let header = &header[..len];

        self.selected(|spi| {
            spi.write(header)?;
            match data {
                DataPhase::None => {}
                DataPhase::Read(buf) => spi.read(buf)?,
                DataPhase::Write(bytes) => spi.write(bytes)?,
                DataPhase::WriteThenRead(bytes, buf) => {
                    spi.write(bytes)?;
                    spi.read(buf)?;
                }
            }
            // SpiBus may return before the last clock edge; CS must not
            // rise until it has.
            spi.flush()
        })
    }

    /// Runs `f` with CS held low and raises CS afterwards whatever `f`
    /// returned. A transfer error takes precedence over a CS error.
    fn selected<F>(&mut self, f: F) -> Result<(), Error<SPI, CS>>
    where
        F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    {
        if let Err(err) = self.cs.set_low() {
            // The pin may be half-driven; try to park it before bailing out.
            let _ = self.cs.set_high();
            return Err(Error::Gpio(err));
        }
        let transfer = f(&mut self.spi).map_err(Error::Spi);
        let release = self.cs.set_high().map_err(Error::Gpio);
        transfer.and(release)
    }
}
