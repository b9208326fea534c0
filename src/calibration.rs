//! Two-point field calibration.
//!
//! The board keeps one calibration slot per calibratable channel. A point is
//! recorded by writing the reference value, then the slot number followed by
//! [`CALIBRATION_KEY`]. Writing [`RESET_CALIBRATION_KEY`] instead returns the
//! slot to factory calibration.

use std::fmt;

use embedded_hal::i2c::I2c;
use log::{debug, warn};

use crate::channel::ChannelClass;
use crate::codec::encode_f32;
use crate::registers::{
    CALIBRATION_KEY, CALIB_CHANNEL, CALIB_STATUS, CALIB_VALUE, RESET_CALIBRATION_KEY,
};
use crate::{Board, Error};

/// Channel families with their own calibration slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationTarget {
    Rtd,
    VoltageIn,
    CurrentIn,
    VoltageOut,
    CurrentOut,
}

impl CalibrationTarget {
    pub const ALL: [CalibrationTarget; 5] = [
        CalibrationTarget::Rtd,
        CalibrationTarget::VoltageIn,
        CalibrationTarget::CurrentIn,
        CalibrationTarget::VoltageOut,
        CalibrationTarget::CurrentOut,
    ];

    /// Slot of the first channel.
    pub const fn base(self) -> u8 {
        match self {
            CalibrationTarget::Rtd => 1,
            CalibrationTarget::VoltageIn => 3,
            CalibrationTarget::CurrentIn => 5,
            CalibrationTarget::VoltageOut => 7,
            CalibrationTarget::CurrentOut => 9,
        }
    }

    pub const fn class(self) -> ChannelClass {
        match self {
            CalibrationTarget::Rtd => ChannelClass::Rtd,
            CalibrationTarget::VoltageIn => ChannelClass::VoltageIn,
            CalibrationTarget::CurrentIn => ChannelClass::CurrentIn,
            CalibrationTarget::VoltageOut => ChannelClass::VoltageOut,
            CalibrationTarget::CurrentOut => ChannelClass::CurrentOut,
        }
    }

    /// Slot for a channel already validated against [`Self::class`].
    pub const fn slot(self, channel: u8) -> u8 {
        self.base() + (channel - 1)
    }
}

/// Progress reported by the calibration status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationStatus {
    InProgress,
    Done,
    Failed,
    Unknown(u8),
}

impl From<u8> for CalibrationStatus {
    fn from(raw: u8) -> Self {
        match raw {
            0 => CalibrationStatus::InProgress,
            1 => CalibrationStatus::Done,
            2 => CalibrationStatus::Failed,
            other => CalibrationStatus::Unknown(other),
        }
    }
}

impl fmt::Display for CalibrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CalibrationStatus::InProgress => "Calibration in progress",
            CalibrationStatus::Done => "Calibration done",
            CalibrationStatus::Failed => "Calibration error",
            CalibrationStatus::Unknown(_) => "Unknown calibration status",
        })
    }
}

impl<I2C: I2c> Board<I2C> {
    /// Record `value` as a calibration point for `slot`.
    ///
    /// The value and the commit are separate writes. If the commit fails the
    /// value has already landed and the slot is left in an undefined state,
    /// reported as [`Error::CalibrationIncomplete`].
    pub fn calibrate(&mut self, slot: u8, value: f32) -> Result<(), Error> {
        debug!("Calibrating slot {slot} at {value}");
        self.write_registers(CALIB_VALUE, &encode_f32(value))?;
        self.write_registers(CALIB_CHANNEL, &[slot, CALIBRATION_KEY])
            .map_err(|source| {
                warn!("Calibration value written but slot {slot} was not committed");
                Error::CalibrationIncomplete {
                    slot,
                    source: Box::new(source),
                }
            })
    }

    pub fn reset_calibration(&mut self, slot: u8) -> Result<(), Error> {
        debug!("Resetting calibration of slot {slot}");
        self.write_registers(CALIB_CHANNEL, &[slot, RESET_CALIBRATION_KEY])
    }

    pub fn calibration_status(&mut self) -> Result<CalibrationStatus, Error> {
        self.read_u8(CALIB_STATUS).map(CalibrationStatus::from)
    }
}
