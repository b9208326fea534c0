//! Driver and command-line front end for the Sequent Microsystems Multi-IO
//! expansion board.
//!
//! The board is an I2C target at `0x06 + stack`. [`Board`] speaks its
//! register protocol over any [`embedded_hal::i2c::I2c`] bus and
//! [`commands::CommandTable`] maps command words onto board operations.

use std::io::Write;

use embedded_hal::i2c::I2c;

pub mod board;
pub mod calibration;
pub mod channel;
pub mod cli;
pub mod codec;
pub mod commands;
mod error;
pub mod linux;
pub mod registers;

pub use board::Board;
pub use cli::{Args, Cli};
pub use error::{Category, Error};

pub const PROGRAM_NAME: &str = "multiio";
pub const CARD_NAME: &str = "Multi-IO";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What a command runs against: a way to reach the bus and a place to print.
pub trait Session {
    type Bus: I2c;

    /// Open a fresh connection to the bus.
    fn open_bus(&mut self) -> Result<Self::Bus, Error>;

    fn output(&mut self) -> &mut dyn Write;

    /// Open the bus and attach to the board at `stack`.
    fn board(&mut self, stack: u8) -> Result<Board<Self::Bus>, Error> {
        let bus = self.open_bus()?;
        Board::open(bus, stack)
    }
}
