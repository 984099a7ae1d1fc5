use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::comms::Fram;
use crate::error::{ConfigError, Error};

/// Size of the MB85RS64V memory array (64 Kbit).
pub const MB85RS64V_CAPACITY: u32 = 8 * 1024;

/// Construction parameters for [`Fram`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Address bytes sent after READ/WRITE, 1 to 4. Validated by
    /// [`Fram::new`].
    pub address_width: u8,
    /// Size of the memory array in bytes. Accesses past it are rejected
    /// with [`Error::OutOfRange`]. Must be reachable with `address_width`
    /// bytes. `None` disables the check and lets the chip wrap around.
    pub capacity: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address_width: 2,
            capacity: Some(MB85RS64V_CAPACITY),
        }
    }
}

/// Collects the transport handles and [`Config`] for [`Fram::new`].
pub struct FramBuilder<SPI, CS> {
    spi: Option<SPI>,
    cs: Option<CS>,
    config: Config,
}

impl<SPI, CS> Default for FramBuilder<SPI, CS> {
    fn default() -> Self {
        Self {
            spi: None,
            cs: None,
            config: Config::default(),
        }
    }
}

impl<SPI, CS> FramBuilder<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spi(mut self, spi: SPI) -> Self {
        self.spi = Some(spi);
        self
    }

    pub fn chip_select(mut self, cs: CS) -> Self {
        self.cs = Some(cs);
        self
    }

    pub fn address_width(mut self, bytes: u8) -> Self {
        self.config.address_width = bytes;
        self
    }

    pub fn capacity(mut self, capacity: Option<u32>) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Checks that both handles are present, then runs [`Fram::new`].
    pub fn build(self) -> Result<Fram<SPI, CS>, Error<SPI, CS>> {
        let spi = self.spi.ok_or(ConfigError::MissingSpi)?;
        let cs = self.cs.ok_or(ConfigError::MissingChipSelect)?;
        Fram::new(spi, cs, self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_mb85rs64v() {
        let config = Config::default();
        assert_eq!(config.address_width, 2);
        assert_eq!(config.capacity, Some(0x2000));
    }
}
