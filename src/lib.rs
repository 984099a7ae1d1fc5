//! An `embedded-hal` driver for the Fujitsu MB85RS64V SPI FRAM.
//!
//! The driver owns a raw [`embedded_hal::spi::SpiBus`] and drives the
//! chip-select line itself through an [`embedded_hal::digital::OutputPin`].
//! Every operation is one CS-framed transaction; nothing is cached, so each
//! read reflects the chip at call time.
//!
//! ```ignore
//! use fujitsu_mb85rs_fram_rs::{Config, Fram};
//!
//! let mut fram = Fram::new(spi, cs, Config::default())?;
//! fram.write_enable(true)?;
//! fram.write_bytes(0x0031, b"Hello, world!")?;
//!
//! let mut buf = [0u8; 13];
//! fram.read_bytes(0x0031, &mut buf)?;
//! ```
//!
//! # Features
//!
//! - `defmt`: log through `defmt` and implement `defmt::Format` on the
//!   public types.
//! - `log`: log through the `log` facade.
#![cfg_attr(not(test), no_std)]

mod fmt;

mod address;
mod bus;
mod command;
mod comms;
mod config;
mod error;
mod identification;
mod traits;

pub use address::AddressWidth;
pub use command::Opcode;
pub use comms::{Fram, Status};
pub use config::{Config, FramBuilder, MB85RS64V_CAPACITY};
pub use error::{ConfigError, Error};
pub use identification::{DeviceId, KNOWN_MANUFACTURER_IDS, KNOWN_PRODUCT_IDS};
pub use traits::NonVolatileMemory;
