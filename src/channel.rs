//! Per-class channel bounds.

use std::fmt;

use crate::Error;

/// A family of physical lines on the board, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelClass {
    VoltageIn,
    CurrentIn,
    VoltageOut,
    CurrentOut,
    Opto,
    /// Quadrature encoders, each built from a pair of opto channels.
    OptoEncoder,
    Rtd,
    /// Open-drain outputs (the relay bank of the register map).
    OpenDrain,
    Led,
    Servo,
}

impl ChannelClass {
    pub const MIN: u8 = 1;

    pub const ALL: [ChannelClass; 10] = [
        ChannelClass::VoltageIn,
        ChannelClass::CurrentIn,
        ChannelClass::VoltageOut,
        ChannelClass::CurrentOut,
        ChannelClass::Opto,
        ChannelClass::OptoEncoder,
        ChannelClass::Rtd,
        ChannelClass::OpenDrain,
        ChannelClass::Led,
        ChannelClass::Servo,
    ];

    pub const fn max(self) -> u8 {
        match self {
            ChannelClass::VoltageIn
            | ChannelClass::CurrentIn
            | ChannelClass::VoltageOut
            | ChannelClass::CurrentOut
            | ChannelClass::Rtd
            | ChannelClass::OpenDrain
            | ChannelClass::Servo => 2,
            ChannelClass::Opto => 4,
            ChannelClass::OptoEncoder => ChannelClass::Opto.max() / 2,
            ChannelClass::Led => 6,
        }
    }

    /// Bitmap with one bit set per channel of the class.
    pub const fn mask(self) -> u8 {
        (1 << self.max()) - 1
    }

    pub fn is_valid(self, channel: i64) -> bool {
        (i64::from(Self::MIN)..=i64::from(self.max())).contains(&channel)
    }

    pub fn validate(self, channel: i64) -> Result<u8, Error> {
        if self.is_valid(channel) {
            Ok(channel as u8)
        } else {
            Err(Error::ChannelOutOfRange { class: self, channel })
        }
    }
}

impl fmt::Display for ChannelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelClass::VoltageIn => "0-10V input",
            ChannelClass::CurrentIn => "4-20mA input",
            ChannelClass::VoltageOut => "0-10V output",
            ChannelClass::CurrentOut => "4-20mA output",
            ChannelClass::Opto => "Optocoupled input",
            ChannelClass::OptoEncoder => "Optocoupled encoder",
            ChannelClass::Rtd => "RTD",
            ChannelClass::OpenDrain => "Open-drain output",
            ChannelClass::Led => "LED",
            ChannelClass::Servo => "Servo",
        })
    }
}
