//! Conversions between register bytes and physical values.
//!
//! Two encodings are in use on the board:
//! - scaled: a little-endian `i16` holding `value * factor`;
//! - raw: a little-endian `f32`, `u32` or `i32` copied as is.

use crate::{registers, Error};

/// Bytes occupied by one scaled value.
pub const SCALED_SIZE: usize = 2;
/// Bytes occupied by one raw `f32` or 32-bit counter.
pub const RAW_SIZE: usize = 4;

/// How a physical value is turned into a raw register word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Smallest raw word that reads back at or above the value.
    Ceil,
    /// Nearest raw word, halves away from zero.
    Nearest,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    factor: f32,
    rounding: Rounding,
}

impl Scale {
    /// Volts to millivolts, milliamps to microamps.
    pub const MILLI: Scale = Scale::new(1000.0, Rounding::Ceil);
    /// Percent to tenths of a percent.
    pub const DECI: Scale = Scale::new(10.0, Rounding::Nearest);

    pub const fn new(factor: f32, rounding: Rounding) -> Self {
        Self { factor, rounding }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    pub fn decode(&self, bytes: [u8; SCALED_SIZE]) -> f32 {
        f32::from(i16::from_le_bytes(bytes)) / self.factor
    }

    pub fn encode(&self, value: f32) -> [u8; SCALED_SIZE] {
        // Exact in f64: a 24-bit mantissa times a small integer factor.
        let product = f64::from(value) * f64::from(self.factor);
        let raw = match self.rounding {
            Rounding::Ceil => {
                let raw = product.ceil() as i64;
                // The f32 division on the way back can round up onto `value`.
                if self.read_back(raw - 1) >= value {
                    raw - 1
                } else {
                    raw
                }
            }
            Rounding::Nearest => product.round() as i64,
        };
        // Narrows like a C store into `int16_t`.
        (raw as i16).to_le_bytes()
    }

    fn read_back(&self, raw: i64) -> f32 {
        raw as f32 / self.factor
    }
}

pub fn decode_f32(bytes: [u8; RAW_SIZE]) -> f32 {
    f32::from_le_bytes(bytes)
}

pub fn encode_f32(value: f32) -> [u8; RAW_SIZE] {
    value.to_le_bytes()
}

/// An array of equally sized per-channel slots in the register map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub base: u8,
    pub slot_size: u8,
    pub slots: u8,
}

impl Region {
    pub const fn new(base: u8, slot_size: u8, slots: u8) -> Self {
        Self { base, slot_size, slots }
    }

    /// Register address of the 1-based `channel`.
    ///
    /// Fails when the channel is not one of the region's slots or the slot
    /// would run past the end of the register map.
    pub fn address(&self, channel: u8) -> Result<u8, Error> {
        let out_of_range = || Error::AddressOutOfRange { base: self.base, channel };
        if !(1..=self.slots).contains(&channel) {
            return Err(out_of_range());
        }
        let address =
            usize::from(self.base) + usize::from(self.slot_size) * usize::from(channel - 1);
        if address + usize::from(self.slot_size) > registers::MEM_SIZE {
            return Err(out_of_range());
        }
        u8::try_from(address).map_err(|_| out_of_range())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_signed_little_endian() {
        assert_eq!(Scale::MILLI.decode([0xc4, 0x09]), 2.5);
        assert_eq!(Scale::MILLI.decode([0x18, 0xfc]), -1.0);
        assert_eq!(Scale::DECI.decode([0xfc, 0x00]), 25.2);
    }

    #[test]
    fn encodes_with_ceiling() {
        assert_eq!(Scale::MILLI.encode(2.5), [0xc4, 0x09]);
        assert_eq!(Scale::MILLI.encode(2.5004), 2501i16.to_le_bytes());
        assert_eq!(Scale::MILLI.encode(-2.5004), (-2500i16).to_le_bytes());
    }

    #[test]
    fn deci_rounds_to_nearest() {
        assert_eq!(Scale::DECI.encode(25.24), 252i16.to_le_bytes());
        assert_eq!(Scale::DECI.encode(25.26), 253i16.to_le_bytes());
        assert_eq!(Scale::DECI.encode(-140.0), (-1400i16).to_le_bytes());
    }

    #[test]
    fn every_raw_word_survives_decode_then_encode() {
        for raw in i16::MIN..=i16::MAX {
            let bytes = raw.to_le_bytes();
            assert_eq!(Scale::MILLI.encode(Scale::MILLI.decode(bytes)), bytes, "raw {raw}");
        }
    }

    #[test]
    fn ceiling_never_reads_back_below_the_value() {
        let unit = 1.0 / Scale::MILLI.factor();
        let mut value = -32.0f32;
        while value < 32.0 {
            let read_back = Scale::MILLI.decode(Scale::MILLI.encode(value));
            assert!(read_back >= value, "{value} read back as {read_back}");
            assert!(read_back - value <= unit * 1.01, "{value} read back as {read_back}");
            value += 0.0137;
        }
    }

    #[test]
    fn raw_float_bytes_are_copied() {
        for value in [0.0f32, -0.0, 100.34, -273.15, f32::MAX, f32::MIN_POSITIVE, 1e-42] {
            let bytes = encode_f32(value);
            assert_eq!(bytes, value.to_le_bytes());
            assert_eq!(encode_f32(decode_f32(bytes)), bytes);
        }
    }

    #[test]
    fn first_slot_is_the_base() {
        let region = Region::new(registers::U_OUT, 2, 2);
        assert_eq!(region.address(1).unwrap(), registers::U_OUT);
        assert_eq!(region.address(2).unwrap(), registers::U_OUT + 2);
    }

    #[test]
    fn slot_addresses_increase_with_the_channel() {
        let region = Region::new(registers::OPTO_EDGE_COUNT, 4, 4);
        let addresses: Vec<u8> = (1..=4).map(|ch| region.address(ch).unwrap()).collect();
        assert!(addresses.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(addresses[3], registers::OPTO_EDGE_COUNT + 12);
    }

    #[test]
    fn servo_slots_line_up_with_the_map() {
        let region = Region::new(registers::SERVO_VAL1, 2, 2);
        assert_eq!(region.address(2).unwrap(), registers::SERVO_VAL2);
    }

    #[test]
    fn rejects_slots_outside_the_region_or_map() {
        let region = Region::new(registers::RTD_VAL1, 4, 2);
        assert!(matches!(region.address(0), Err(Error::AddressOutOfRange { .. })));
        assert!(matches!(region.address(3), Err(Error::AddressOutOfRange { .. })));

        let overflowing = Region::new(250, 4, 3);
        assert!(overflowing.address(1).is_ok());
        assert!(matches!(overflowing.address(2), Err(Error::AddressOutOfRange { base: 250, channel: 2 })));
    }
}
