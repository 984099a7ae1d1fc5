//! Refer to datasheet:
//! <http://www.fujitsu.com/downloads/MICRO/fsa/pdf/products/memory/fram/MB85RS64V-DS501-00015-4v0-E.pdf>
use crate::address::AddressWidth;
use crate::bus::Bus;
use crate::command::Command;
use crate::config::{Config, FramBuilder};
use crate::error::{ConfigError, Error};
use crate::identification::DeviceId;
use bitflags::bitflags;
use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// An MB85RS series FRAM behind a raw SPI bus and a GPIO chip-select.
///
/// Only obtainable through [`Fram::new`] or [`FramBuilder::build`], both of
/// which check the chip's identity first.
pub struct Fram<SPI, CS> {
    bus: Bus<SPI, CS>,
    identity: DeviceId,
    capacity: Option<u32>,
}

impl<SPI, CS> Debug for Fram<SPI, CS> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Fram")
            .field("identity", &self.identity)
            .field("address_width", &self.bus.address_width())
            .field("capacity", &self.capacity)
            .finish()
    }
}

bitflags! {
    /// Status register bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Status: u8 {
        /// Status of the **W**rite **E**nable **L**atch.
        const WEL = 1 << 1;
        /// Block protect 0.
        const BP0 = 1 << 2;
        /// Block protect 1.
        const BP1 = 1 << 3;
        /// Status register write protect.
        const WPEN = 1 << 7;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Status {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Status({=u8:#010b})", self.bits())
    }
}

impl<SPI, CS> Fram<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Takes ownership of the bus and chip-select pin and checks that an
    /// MB85RS64V (or a compatible revision) answers.
    ///
    /// Fails with [`Error::Config`] for an address width outside 1..=4 or a
    /// capacity that width cannot address, and with [`Error::UnknownDevice`]
    /// when RDID returns an ID not listed in [`crate::KNOWN_MANUFACTURER_IDS`]
    /// / [`crate::KNOWN_PRODUCT_IDS`]. The bus and pin are dropped on failure;
    /// use [`Fram::try_new`] to get them back.
    pub fn new(spi: SPI, cs: CS, config: Config) -> Result<Self, Error<SPI, CS>> {
        Self::try_new(spi, cs, config).map_err(|(err, _spi, _cs)| err)
    }

    /// Like [`Fram::new`], but hands the bus and chip-select pin back
    /// together with the error.
    #[allow(clippy::type_complexity)]
    pub fn try_new(spi: SPI, cs: CS, config: Config) -> Result<Self, (Error<SPI, CS>, SPI, CS)> {
        let address_width = match Self::check_config(&config) {
            Ok(address_width) => address_width,
            Err(err) => return Err((err.into(), spi, cs)),
        };

        let mut bus = Bus::new(spi, cs, address_width);
        match Self::identify(&mut bus) {
            Ok(identity) => Ok(Self {
                bus,
                identity,
                capacity: config.capacity,
            }),
            Err(err) => {
                let (spi, cs) = bus.release();
                Err((err, spi, cs))
            }
        }
    }

    fn check_config(config: &Config) -> Result<AddressWidth, ConfigError> {
        let address_width = AddressWidth::try_from(config.address_width)?;
        if let Some(capacity) = config.capacity {
            if capacity.saturating_sub(1) > address_width.max_address() {
                error!(
                    "capacity {} exceeds what {} address bytes can reach",
                    capacity,
                    address_width.bytes()
                );
                return Err(ConfigError::CapacityExceedsAddressWidth {
                    capacity,
                    address_width: config.address_width,
                });
            }
        }
        Ok(address_width)
    }

    /// Parks CS high, then reads and checks the chip's identity.
    fn identify(bus: &mut Bus<SPI, CS>) -> Result<DeviceId, Error<SPI, CS>> {
        bus.deselect()?;

        let identity = Self::read_device_id(bus)?;
        debug!(
            "manufacturer id: {:#x}, product id: {:#x}",
            identity.manufacturer_id, identity.product_id
        );
        if !identity.is_known() {
            error!("unknown device: {:?}", identity);
            return Err(Error::UnknownDevice(identity));
        }
        if let Some(density) = identity.density() {
            debug!("density from product id: {} bytes", density);
        }
        Ok(identity)
    }

    /// Starts a [`FramBuilder`].
    pub fn builder() -> FramBuilder<SPI, CS> {
        FramBuilder::new()
    }

    /// The identity read and validated by [`Fram::new`].
    pub fn identity(&self) -> DeviceId {
        self.identity
    }

    pub fn address_width(&self) -> AddressWidth {
        self.bus.address_width()
    }

    pub fn capacity(&self) -> Option<u32> {
        self.capacity
    }

    /// Gives back the bus and chip-select pin.
    pub fn release(self) -> (SPI, CS) {
        self.bus.release()
    }

    /// Sets (WREN, 06h) or resets (WRDI, 04h) the write enable latch.
    ///
    /// The latch lives in the chip and is cleared by the chip after every
    /// WRITE or WRSR. The driver keeps no copy of it: a WRITE issued with the
    /// latch reset is silently ignored by the chip.
    pub fn write_enable(&mut self, enable: bool) -> Result<(), Error<SPI, CS>> {
        let command = if enable {
            Command::write_enable()
        } else {
            Command::write_disable()
        };
        self.bus.execute(command)
    }

    /// Writes one byte at `addr` (WRITE, 02h).
    pub fn write_byte(&mut self, addr: u32, value: u8) -> Result<(), Error<SPI, CS>> {
        self.write_bytes(addr, &[value])
    }

    /// WRITE (02h), then `values` in one burst. The chip increments the
    /// address after each byte for as long as CS stays low, and commits on
    /// the rising CS edge.
    pub fn write_bytes(&mut self, addr: u32, values: &[u8]) -> Result<(), Error<SPI, CS>> {
        self.check_range(addr, values.len())?;
        self.bus.execute(Command::write(addr, values))
    }

    /// Reads one byte at `addr` (READ, 03h).
    pub fn read_byte(&mut self, addr: u32) -> Result<u8, Error<SPI, CS>> {
        let mut buf = [0u8; 1];
        self.read_bytes(addr, &mut buf)?;
        Ok(buf[0])
    }

    /// Fills `buf` from consecutive addresses starting at `addr`, in a
    /// single READ (03h).
    pub fn read_bytes(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Error<SPI, CS>> {
        self.check_range(addr, buf.len())?;
        self.bus.execute(Command::read(addr, buf))
    }

    /// Reads the manufacturer and product IDs (RDID, 9Fh).
    pub fn device_id(&mut self) -> Result<DeviceId, Error<SPI, CS>> {
        Self::read_device_id(&mut self.bus)
    }

    /// Reads the status register (RDSR, 05h).
    pub fn status_register(&mut self) -> Result<Status, Error<SPI, CS>> {
        let mut status = [0u8; 1];
        self.bus.execute(Command::read_status(&mut status))?;
        Ok(Status::from_bits_retain(status[0]))
    }

    /// Writes the status register (WRSR, 01h). Needs the write enable latch
    /// like a memory write. Only WPEN, BP1 and BP0 are writable.
    pub fn set_status_register(&mut self, status: Status) -> Result<(), Error<SPI, CS>> {
        let value = [status.bits()];
        let mut echo = [0u8; 1];
        self.bus.execute(Command::write_status(&value, &mut echo))
    }

    fn read_device_id(bus: &mut Bus<SPI, CS>) -> Result<DeviceId, Error<SPI, CS>> {
        let mut raw = [0u8; 4];
        bus.execute(Command::read_device_id(&mut raw))?;
        Ok(DeviceId::from_rdid(raw))
    }

    fn check_range(&self, addr: u32, len: usize) -> Result<(), Error<SPI, CS>> {
        let Some(capacity) = self.capacity else {
            return Ok(());
        };
        if u64::from(addr) + len as u64 > u64::from(capacity) {
            warn!(
                "access at {:#x} of {} bytes runs past {} bytes",
                addr, len, capacity
            );
            return Err(Error::OutOfRange { addr, len });
        }
        Ok(())
    }
}
