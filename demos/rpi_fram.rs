// rpi_fram.rs - Writes to and reads back from an MB85RS64V FRAM on a
// Raspberry Pi, with chip-select on a plain GPIO.
//
// Run with: RUST_LOG=debug cargo run --example rpi_fram --features log

use std::error::Error;
use std::fmt::Debug;

use fujitsu_mb85rs_fram_rs::{Config, Fram};
use rppal::gpio::Gpio;
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

// GPIO wired to the FRAM's /CS pin (BCM numbering).
const GPIO_CS: u8 = 25;

fn driver_error<E: Debug>(err: E) -> Box<dyn Error> {
    format!("{:?}", err).into()
}

/// One-time platform setup, before any driver is built.
fn init_platform() {
    env_logger::init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_platform();

    // The MB85RS64V samples on the rising edge (SPI mode 0) and runs at up
    // to 20 MHz; 2 MHz leaves plenty of margin on jumper wires.
    let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 2_000_000, Mode::Mode0)?;
    let cs = Gpio::new()?.get(GPIO_CS)?.into_output_high();

    let mut fram = Fram::new(spi, cs, Config::default()).map_err(driver_error)?;
    println!("Device: {:?}", fram.identity());

    fram.write_enable(true).map_err(driver_error)?;
    fram.write_byte(0x0030, 0xFF).map_err(driver_error)?;
    fram.write_enable(false).map_err(driver_error)?;
    println!("0x0030: {:#04x}", fram.read_byte(0x0030).map_err(driver_error)?);

    fram.write_enable(true).map_err(driver_error)?;
    fram.write_bytes(0x0031, b"Hello, world!").map_err(driver_error)?;
    fram.write_enable(false).map_err(driver_error)?;

    let mut buffer = [0u8; 14];
    fram.read_bytes(0x0030, &mut buffer).map_err(driver_error)?;
    println!("Bytes read: {:?}", buffer);

    let status = fram.status_register().map_err(driver_error)?;
    println!("Status: {:?}", status);

    Ok(())
}
