//! A simulated MB85RS chip sitting behind mock `SpiBus` / `OutputPin`
//! handles that share its state.
#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

pub const MB85RS64V_ID: [u8; 4] = [0x04, 0x7F, 0x03, 0x02];

const WREN: u8 = 0x06;
const WRDI: u8 = 0x04;
const RDSR: u8 = 0x05;
const WRSR: u8 = 0x01;
const READ: u8 = 0x03;
const WRITE: u8 = 0x02;
const RDID: u8 = 0x9F;

const WEL: u8 = 1 << 1;
const WRITABLE_STATUS: u8 = 0b1000_1100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

impl spi::Error for MockError {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl digital::Error for MockError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

/// Everything the driver did to the transport, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Select,
    Deselect,
    Write(Vec<u8>),
    Read(usize),
    Flush,
}

pub struct Chip {
    pub memory: Vec<u8>,
    pub id: [u8; 4],
    pub status: u8,
    pub address_width: usize,
    pub events: Vec<Event>,
    /// WRITE frames dropped because the latch was not set.
    pub ignored_writes: usize,
    pub fail_spi: bool,
    pub fail_select: bool,
    pub selected: bool,
    frame: Vec<u8>,
    clocked_out: usize,
}

impl Chip {
    pub fn new(id: [u8; 4], address_width: usize, size: usize) -> Self {
        Self {
            memory: vec![0; size],
            id,
            status: 0,
            address_width,
            events: Vec::new(),
            ignored_writes: 0,
            fail_spi: false,
            fail_select: false,
            selected: false,
            frame: Vec::new(),
            clocked_out: 0,
        }
    }

    pub fn latch_set(&self) -> bool {
        self.status & WEL != 0
    }

    fn address(&self) -> usize {
        self.frame[1..1 + self.address_width]
            .iter()
            .fold(0usize, |acc, b| (acc << 8) | usize::from(*b))
    }

    fn select(&mut self) {
        self.events.push(Event::Select);
        self.selected = true;
        self.frame.clear();
        self.clocked_out = 0;
    }

    fn clock_in(&mut self, bytes: &[u8]) {
        self.events.push(Event::Write(bytes.to_vec()));
        if self.selected {
            self.frame.extend_from_slice(bytes);
        }
    }

    fn clock_out(&mut self, buf: &mut [u8]) {
        self.events.push(Event::Read(buf.len()));
        if !self.selected {
            buf.fill(0xFF);
            return;
        }
        let offset = self.clocked_out;
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = match self.frame.first().copied() {
                Some(RDSR) | Some(WRSR) => self.status,
                Some(RDID) => self.id.get(offset + i).copied().unwrap_or(0),
                Some(READ) if self.frame.len() > self.address_width => {
                    let len = self.memory.len();
                    self.memory[(self.address() + offset + i) % len]
                }
                _ => 0,
            };
        }
        self.clocked_out += buf.len();
    }

    /// Rising CS: the chip acts on the frame it just received.
    fn deselect(&mut self) {
        self.events.push(Event::Deselect);
        if !self.selected {
            return;
        }
        self.selected = false;
        match self.frame.first().copied() {
            Some(WREN) => self.status |= WEL,
            Some(WRDI) => self.status &= !WEL,
            Some(WRITE) if self.frame.len() > self.address_width => {
                if self.latch_set() {
                    let start = self.address();
                    let len = self.memory.len();
                    let data = self.frame[1 + self.address_width..].to_vec();
                    for (i, byte) in data.into_iter().enumerate() {
                        self.memory[(start + i) % len] = byte;
                    }
                    self.status &= !WEL;
                } else {
                    self.ignored_writes += 1;
                }
            }
            Some(WRSR) if self.frame.len() > 1 => {
                if self.latch_set() {
                    self.status = self.frame[1] & WRITABLE_STATUS;
                } else {
                    self.ignored_writes += 1;
                }
            }
            _ => {}
        }
    }
}

pub type SharedChip = Rc<RefCell<Chip>>;

pub struct MockSpi(pub SharedChip);
pub struct MockCs(pub SharedChip);

/// A chip of `size` bytes answering RDID with `id`.
pub fn mock(id: [u8; 4], address_width: usize, size: usize) -> (SharedChip, MockSpi, MockCs) {
    let chip = Rc::new(RefCell::new(Chip::new(id, address_width, size)));
    (chip.clone(), MockSpi(chip.clone()), MockCs(chip))
}

impl spi::ErrorType for MockSpi {
    type Error = MockError;
}

impl SpiBus for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.fail_spi {
            return Err(MockError);
        }
        chip.clock_out(words);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.fail_spi {
            return Err(MockError);
        }
        chip.clock_in(words);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let out = words.to_vec();
        self.transfer(words, &out)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().events.push(Event::Flush);
        Ok(())
    }
}

impl digital::ErrorType for MockCs {
    type Error = MockError;
}

impl OutputPin for MockCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut chip = self.0.borrow_mut();
        if chip.fail_select {
            return Err(MockError);
        }
        chip.select();
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().deselect();
        Ok(())
    }
}
