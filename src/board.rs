use std::ops::RangeInclusive;

use bit_field::BitField;
use embedded_hal::i2c::{Error as _, I2c};
use log::{debug, trace};

use crate::codec::{self, Region, Scale, RAW_SIZE, SCALED_SIZE};
use crate::{registers, Error};

/// Bus address of the board at stack level 0.
pub const ADDRESS_BASE: u8 = 0x06;
/// Stack levels selectable with the board's address jumpers.
pub const STACK_LEVELS: RangeInclusive<u8> = 0..=7;

/// One Multi-IO board on an I2C bus.
#[derive(Debug)]
pub struct Board<I2C> {
    i2c: I2C,
    stack: u8,
    address: u8,
}

impl<I2C: I2c> Board<I2C> {
    /// Attach to the board at `stack` and check that it answers.
    pub fn open(i2c: I2C, stack: u8) -> Result<Self, Error> {
        if !STACK_LEVELS.contains(&stack) {
            return Err(Error::StackOutOfRange(stack.into()));
        }
        let mut board = Self {
            i2c,
            stack,
            address: ADDRESS_BASE + stack,
        };
        board.probe()?;
        Ok(board)
    }

    fn probe(&mut self) -> Result<(), Error> {
        let mut revision = [0u8; 1];
        self.i2c
            .write_read(self.address, &[registers::REVISION_MAJOR], &mut revision)
            .map_err(|e| Error::BoardNotDetected {
                stack: self.stack,
                kind: e.kind(),
            })?;
        debug!("Board {} at 0x{:02x}, firmware major {}", self.stack, self.address, revision[0]);
        Ok(())
    }

    pub fn stack(&self) -> u8 {
        self.stack
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Give back the bus.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Fill `buf` with the registers starting at `register`.
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error> {
        trace!("Read r:0x{register:02x} n:{}", buf.len());
        self.i2c
            .write_read(self.address, &[register], buf)
            .map_err(|e| Error::Transfer {
                register,
                kind: e.kind(),
            })
    }

    /// Write `data` to the registers starting at `register`.
    pub fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), Error> {
        trace!("Write r:0x{register:02x} {data:02x?}");
        let mut frame = Vec::with_capacity(data.len() + 1);
        frame.push(register);
        frame.extend_from_slice(data);
        self.i2c
            .write(self.address, &frame)
            .map_err(|e| Error::Transfer {
                register,
                kind: e.kind(),
            })
    }

    pub fn read_array<const N: usize>(&mut self, register: u8) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        self.read_registers(register, &mut buf)?;
        Ok(buf)
    }

    pub fn read_u8(&mut self, register: u8) -> Result<u8, Error> {
        self.read_array::<1>(register).map(|[byte]| byte)
    }

    pub fn write_u8(&mut self, register: u8, value: u8) -> Result<(), Error> {
        self.write_registers(register, &[value])
    }

    pub fn read_u16(&mut self, register: u8) -> Result<u16, Error> {
        self.read_array(register).map(u16::from_le_bytes)
    }

    pub fn write_u16(&mut self, register: u8, value: u16) -> Result<(), Error> {
        self.write_registers(register, &value.to_le_bytes())
    }

    pub fn read_u32(&mut self, register: u8) -> Result<u32, Error> {
        self.read_array(register).map(u32::from_le_bytes)
    }

    pub fn write_u32(&mut self, register: u8, value: u32) -> Result<(), Error> {
        self.write_registers(register, &value.to_le_bytes())
    }

    /// Read the scaled 16-bit value of `channel` in `region`.
    pub fn read_scaled(&mut self, region: Region, channel: u8, scale: Scale) -> Result<f32, Error> {
        let register = region.address(channel)?;
        let raw = self.read_array::<SCALED_SIZE>(register)?;
        Ok(scale.decode(raw))
    }

    pub fn write_scaled(
        &mut self,
        region: Region,
        channel: u8,
        scale: Scale,
        value: f32,
    ) -> Result<(), Error> {
        let register = region.address(channel)?;
        self.write_registers(register, &scale.encode(value))
    }

    pub fn read_f32(&mut self, region: Region, channel: u8) -> Result<f32, Error> {
        let register = region.address(channel)?;
        self.read_array::<RAW_SIZE>(register).map(codec::decode_f32)
    }

    /// State of bit `channel - 1` of a bitmap register.
    pub fn read_bit(&mut self, register: u8, channel: u8) -> Result<bool, Error> {
        let bits = self.read_u8(register)?;
        Ok(bits.get_bit(usize::from(channel - 1)))
    }

    /// Read-modify-write of bit `channel - 1` of a bitmap register.
    pub fn modify_bit(&mut self, register: u8, channel: u8, on: bool) -> Result<(), Error> {
        let mut bits = self.read_u8(register)?;
        bits.set_bit(usize::from(channel - 1), on);
        self.write_u8(register, bits)
    }
}

#[cfg(test)]
mod tests {
    use embedded_hal::i2c::ErrorKind;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    use super::*;

    const ADDR: u8 = ADDRESS_BASE + 3;

    fn probe() -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![registers::REVISION_MAJOR], vec![1])
    }

    #[test]
    fn stack_level_selects_the_address() {
        let mut i2c = I2cMock::new(&[probe()]);
        let board = Board::open(i2c.clone(), 3).unwrap();
        assert_eq!(board.address(), 0x09);
        assert_eq!(board.stack(), 3);
        i2c.done();
    }

    #[test]
    fn rejects_stack_levels_above_seven() {
        let mut i2c = I2cMock::new(&[]);
        assert!(matches!(
            Board::open(i2c.clone(), 8),
            Err(Error::StackOutOfRange(8))
        ));
        i2c.done();
    }

    #[test]
    fn silent_board_is_not_detected() {
        let mut i2c = I2cMock::new(&[probe().with_error(ErrorKind::Other)]);
        assert!(matches!(
            Board::open(i2c.clone(), 3),
            Err(Error::BoardNotDetected { stack: 3, kind: ErrorKind::Other })
        ));
        i2c.done();
    }

    #[test]
    fn writes_prefix_the_register() {
        let mut i2c = I2cMock::new(&[
            probe(),
            I2cTransaction::write(ADDR, vec![registers::U_OUT + 2, 0xc4, 0x09]),
        ]);
        let mut board = Board::open(i2c.clone(), 3).unwrap();
        board
            .write_scaled(Region::new(registers::U_OUT, 2, 2), 2, Scale::MILLI, 2.5)
            .unwrap();
        i2c.done();
    }

    #[test]
    fn read_failure_names_the_register() {
        let mut i2c = I2cMock::new(&[
            probe(),
            I2cTransaction::write_read(ADDR, vec![registers::U_IN], vec![0, 0])
                .with_error(ErrorKind::Bus),
        ]);
        let mut board = Board::open(i2c.clone(), 3).unwrap();
        let err = board
            .read_scaled(Region::new(registers::U_IN, 2, 2), 1, Scale::MILLI)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Transfer { register: registers::U_IN, kind: ErrorKind::Bus }
        ));
        i2c.done();
    }

    #[test]
    fn bad_slot_never_touches_the_bus() {
        let mut i2c = I2cMock::new(&[probe()]);
        let mut board = Board::open(i2c.clone(), 3).unwrap();
        assert!(matches!(
            board.read_f32(Region::new(registers::RTD_VAL1, 4, 2), 3),
            Err(Error::AddressOutOfRange { .. })
        ));
        i2c.done();
    }

    #[test]
    fn modify_bit_keeps_the_other_bits() {
        let mut i2c = I2cMock::new(&[
            probe(),
            I2cTransaction::write_read(ADDR, vec![registers::OPTO_ENC_ENABLE], vec![0b01]),
            I2cTransaction::write(ADDR, vec![registers::OPTO_ENC_ENABLE, 0b11]),
            I2cTransaction::write_read(ADDR, vec![registers::OPTO_ENC_ENABLE], vec![0b11]),
            I2cTransaction::write(ADDR, vec![registers::OPTO_ENC_ENABLE, 0b10]),
        ]);
        let mut board = Board::open(i2c.clone(), 3).unwrap();
        board.modify_bit(registers::OPTO_ENC_ENABLE, 2, true).unwrap();
        board.modify_bit(registers::OPTO_ENC_ENABLE, 1, false).unwrap();
        i2c.done();
    }

    #[test]
    fn counters_are_little_endian() {
        let mut i2c = I2cMock::new(&[
            probe(),
            I2cTransaction::write_read(ADDR, vec![registers::OPTO_EDGE_COUNT], vec![0x78, 0x56, 0x34, 0x12]),
        ]);
        let mut board = Board::open(i2c.clone(), 3).unwrap();
        assert_eq!(board.read_u32(registers::OPTO_EDGE_COUNT).unwrap(), 0x1234_5678);
        i2c.done();
    }
}
