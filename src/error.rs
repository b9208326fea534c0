use embedded_hal::i2c::ErrorKind;

use crate::channel::ChannelClass;

/// Broad classes of failure, each with its own process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Wrong number of command words for the resolved verb.
    ArgumentCount,
    /// A numeric or keyword argument outside its domain.
    ArgumentRange,
    /// Opening the bus, probing the board or a register transfer failed.
    Operation,
    /// The verb or help topic could not be resolved.
    NotFound,
}

impl Category {
    pub fn exit_code(self) -> u8 {
        match self {
            Category::Operation => 1,
            Category::ArgumentCount => 2,
            Category::ArgumentRange => 3,
            Category::NotFound => 4,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Command option required!")]
    MissingCommand,

    #[error("Invalid parameters number!")]
    ArgumentCount,

    #[error("Invalid command option!")]
    UnknownCommand,

    #[error("No command option named \"{0}\"")]
    UnknownTopic(String),

    #[error("Stack level {0} out of range! [0..7]")]
    StackOutOfRange(i64),

    #[error("{class} channel out of range! [{}..{}]", ChannelClass::MIN, .class.max())]
    ChannelOutOfRange { class: ChannelClass, channel: i64 },

    #[error("Invalid {what} value, must be {range}")]
    ValueOutOfRange { what: &'static str, range: &'static str },

    #[error("Invalid number \"{0}\"")]
    InvalidNumber(String),

    #[error("Invalid {what} \"{value}\"")]
    InvalidArgument { what: &'static str, value: String },

    #[error("Failed to open the bus {path}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{} id {stack} not detected ({kind})", crate::CARD_NAME)]
    BoardNotDetected { stack: u8, kind: ErrorKind },

    #[error("Transfer at register 0x{register:02x} failed ({kind})")]
    Transfer { register: u8, kind: ErrorKind },

    #[error("Slot {channel} of the region at 0x{base:02x} is outside the register map")]
    AddressOutOfRange { base: u8, channel: u8 },

    #[error("Calibration value written for slot {slot} but the commit failed, device calibration state is undefined")]
    CalibrationIncomplete {
        slot: u8,
        #[source]
        source: Box<Error>,
    },

    #[error(transparent)]
    Output(#[from] std::io::Error),
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Error::MissingCommand | Error::ArgumentCount => Category::ArgumentCount,
            Error::StackOutOfRange(_)
            | Error::ChannelOutOfRange { .. }
            | Error::ValueOutOfRange { .. }
            | Error::InvalidNumber(_)
            | Error::InvalidArgument { .. } => Category::ArgumentRange,
            Error::UnknownCommand | Error::UnknownTopic(_) => Category::NotFound,
            Error::Open { .. }
            | Error::BoardNotDetected { .. }
            | Error::Transfer { .. }
            | Error::AddressOutOfRange { .. }
            | Error::CalibrationIncomplete { .. }
            | Error::Output(_) => Category::Operation,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.category().exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_map_to_distinct_exit_codes() {
        let codes = [
            Error::ArgumentCount.exit_code(),
            Error::InvalidNumber("x".into()).exit_code(),
            Error::Transfer { register: 0, kind: ErrorKind::Other }.exit_code(),
            Error::UnknownCommand.exit_code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert_ne!(*a, 0);
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn channel_message_names_the_class_and_bounds() {
        let err = Error::ChannelOutOfRange { class: ChannelClass::VoltageOut, channel: 5 };
        assert_eq!(err.to_string(), "0-10V output channel out of range! [1..2]");
        assert_eq!(err.category(), Category::ArgumentRange);
    }

    #[test]
    fn partial_calibration_keeps_the_cause() {
        let err = Error::CalibrationIncomplete {
            slot: 3,
            source: Box::new(Error::Transfer { register: 82, kind: ErrorKind::Bus }),
        };
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert!(source.unwrap().starts_with("Transfer at register 0x52 failed"));
    }
}
