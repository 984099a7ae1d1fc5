use core::fmt::{self, Debug};
use embedded_hal::{digital, spi};

use crate::identification::DeviceId;

/// Problems with the construction parameters. Detected before any bus
/// traffic happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No SPI bus was handed to the builder.
    MissingSpi,
    /// No chip-select pin was handed to the builder.
    MissingChipSelect,
    /// Address width must be 1, 2, 3 or 4 bytes.
    InvalidAddressWidth(u8),
    /// The configured capacity has addresses the address width cannot
    /// encode; they would alias lower addresses on the wire.
    CapacityExceedsAddressWidth { capacity: u32, address_width: u8 },
}

/// The error type used by this library.
///
/// This can encapsulate an SPI or GPIO error, and adds its own protocol errors
/// on top of that.
pub enum Error<SPI: spi::ErrorType, CS: digital::ErrorType> {
    /// An SPI transfer failed.
    Spi(SPI::Error),
    /// The chip-select pin could not be driven.
    Gpio(CS::Error),
    /// The driver was configured with invalid parameters.
    Config(ConfigError),
    /// The chip answered RDID with an identity this driver does not know.
    UnknownDevice(DeviceId),
    /// The access would run past the end of the memory array.
    OutOfRange { addr: u32, len: usize },
}

impl<SPI: spi::ErrorType, CS: digital::ErrorType> From<ConfigError> for Error<SPI, CS> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

#[cfg(feature = "defmt")]
impl<SPI: spi::ErrorType, CS: digital::ErrorType> defmt::Format for Error<SPI, CS> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Error::Spi(_spi) => defmt::write!(fmt, "Error::Spi"),
            Error::Gpio(_gpio) => defmt::write!(fmt, "Error::Gpio"),
            Error::Config(err) => defmt::write!(fmt, "Error::Config({})", err),
            Error::UnknownDevice(id) => defmt::write!(fmt, "Error::UnknownDevice({})", id),
            Error::OutOfRange { addr, len } => defmt::write!(
                fmt,
                "Error::OutOfRange {{ addr: {=u32:#x}, len: {=usize} }}",
                addr,
                len
            ),
        }
    }
}

impl<SPI: spi::ErrorType, CS: digital::ErrorType> Debug for Error<SPI, CS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi(spi) => write!(f, "Error::Spi({:?})", spi),
            Error::Gpio(gpio) => write!(f, "Error::Gpio({:?})", gpio),
            Error::Config(err) => write!(f, "Error::Config({:?})", err),
            Error::UnknownDevice(id) => write!(f, "Error::UnknownDevice({:?})", id),
            Error::OutOfRange { addr, len } => {
                write!(f, "Error::OutOfRange {{ addr: {:#x}, len: {} }}", addr, len)
            }
        }
    }
}
