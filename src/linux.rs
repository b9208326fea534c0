//! Linux `/dev/i2c-N` transport.

use std::fmt;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use i2cdev::core::{I2CMessage, I2CTransfer};
use i2cdev::linux::{LinuxI2CBus, LinuxI2CMessage};
use log::{debug, trace};

use crate::{Error, Session};

/// Bus the board sits on when plugged into a Raspberry Pi header.
pub const DEFAULT_BUS: &str = "/dev/i2c-1";

/// An I2C adapter device node.
pub struct LinuxBus {
    bus: LinuxI2CBus,
    path: PathBuf,
}

impl LinuxBus {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Opening {}", path.display());
        let bus = LinuxI2CBus::new(path).map_err(|e| Error::Open {
            path: path.display().to_string(),
            source: io::Error::from(e),
        })?;
        Ok(Self {
            bus,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for LinuxBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinuxBus").field("path", &self.path).finish()
    }
}

/// Failure of an `I2C_RDWR` transfer.
#[derive(Debug)]
pub struct BusError(io::Error);

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for BusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

// errno values returned by the i2c-dev driver.
const EIO: i32 = 5;
const ENXIO: i32 = 6;
const EAGAIN: i32 = 11;
const EBUSY: i32 = 16;
const EREMOTEIO: i32 = 121;

impl embedded_hal::i2c::Error for BusError {
    fn kind(&self) -> ErrorKind {
        match self.0.raw_os_error() {
            Some(ENXIO) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address),
            Some(EREMOTEIO) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown),
            Some(EIO | EBUSY) => ErrorKind::Bus,
            Some(EAGAIN) => ErrorKind::ArbitrationLoss,
            _ => ErrorKind::Other,
        }
    }
}

impl ErrorType for LinuxBus {
    type Error = BusError;
}

impl I2c for LinuxBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        trace!("Transaction a:0x{address:02x} ops:{}", operations.len());
        // The whole transaction is one I2C_RDWR ioctl, with repeated starts
        // between messages and a single stop at the end.
        let mut messages: Vec<LinuxI2CMessage> = operations
            .iter_mut()
            .map(|operation| match operation {
                Operation::Write(data) => LinuxI2CMessage::write(data),
                Operation::Read(buffer) => LinuxI2CMessage::read(buffer),
            })
            .map(|message| message.with_address(address.into()))
            .collect();
        self.bus
            .transfer(&mut messages)
            .map(drop)
            .map_err(|e| BusError(io::Error::from(e)))
    }
}

/// Terminal session: the configured bus node and stdout.
pub struct Console {
    bus: PathBuf,
    stdout: Stdout,
}

impl Console {
    pub fn new(bus: impl Into<PathBuf>) -> Self {
        Self {
            bus: bus.into(),
            stdout: io::stdout(),
        }
    }
}

impl Session for Console {
    type Bus = LinuxBus;

    fn open_bus(&mut self) -> Result<LinuxBus, Error> {
        LinuxBus::open(&self.bus)
    }

    fn output(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::Error as _;

    use super::*;

    #[test]
    fn errno_maps_to_error_kind() {
        let kind = |errno| BusError(io::Error::from_raw_os_error(errno)).kind();
        assert_eq!(kind(ENXIO), ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        assert_eq!(kind(EREMOTEIO), ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown));
        assert_eq!(kind(EIO), ErrorKind::Bus);
        assert_eq!(kind(EAGAIN), ErrorKind::ArbitrationLoss);
        assert_eq!(kind(22), ErrorKind::Other);
    }

    #[test]
    fn missing_node_is_an_open_error() {
        let err = LinuxBus::open("/nonexistent/i2c-99").unwrap_err();
        assert!(matches!(err, Error::Open { ref path, .. } if path == "/nonexistent/i2c-99"));
        assert_eq!(err.exit_code(), 1);
    }
}
