//! Multi-IO register map.
//!
//! Offsets are single bytes selected before every transfer. Multi-byte values
//! are little-endian.

/// Bitmap of the open-drain outputs
pub const RELAYS: u8 = 0;
/// Write a channel number to switch one open-drain output on
pub const RELAY_SET: u8 = 1;
/// Write a channel number to switch one open-drain output off
pub const RELAY_CLR: u8 = 2;
/// Bitmap of the general purpose LEDs
pub const LEDS: u8 = 3;
/// Write a LED number to turn it on
pub const LED_SET: u8 = 4;
/// Write a LED number to turn it off
pub const LED_CLR: u8 = 5;
/// Bitmap of the optocoupled inputs
pub const OPTO: u8 = 6;
pub const ANALOG_TYPE: u8 = 7;

/// 0-10V inputs, millivolts
pub const U_IN: u8 = 8;
/// 4-20mA inputs, microamps
pub const I_IN: u8 = 12;
/// 0-10V outputs, millivolts
pub const U_OUT: u8 = 16;
/// 4-20mA outputs, microamps
pub const I_OUT: u8 = 20;
/// Motor PWM fill factor, tenths of a percent
pub const MOT_VAL: u8 = 24;
/// Servo positions, tenths of a percent
pub const SERVO_VAL1: u8 = 26;
pub const SERVO_VAL2: u8 = 28;
/// RTD temperatures, `f32` degrees Celsius
pub const RTD_VAL1: u8 = 30;
/// RTD resistances, `f32` ohms
pub const RTD_RES1: u8 = 38;

/// CPU temperature in degrees, followed by the 3V3 rail in millivolts
pub const DIAG_TEMPERATURE: u8 = 46;
pub const DIAG_3V3_MV: u8 = 47;

/// Per-channel rising edge counting enable bitmap
pub const OPTO_IT_RISING: u8 = 49;
/// Per-channel falling edge counting enable bitmap
pub const OPTO_IT_FALLING: u8 = 50;
/// Quadrature encoder enable bitmap
pub const OPTO_ENC_ENABLE: u8 = 51;
/// Write a channel number to clear its edge counter
pub const OPTO_CNT_RST: u8 = 52;
/// Write an encoder number to clear its counter
pub const OPTO_ENC_CNT_RST: u8 = 53;
/// Edge counters, `u32` per opto channel
pub const OPTO_EDGE_COUNT: u8 = 54;
/// Encoder counters, `i32` per encoder
pub const OPTO_ENC_COUNT: u8 = 70;

/// Calibration point, `f32`
pub const CALIB_VALUE: u8 = 78;
/// Calibration slot, immediately followed by the key byte
pub const CALIB_CHANNEL: u8 = 82;
pub const CALIB_KEY: u8 = 83;
/// Read-only calibration state
pub const CALIB_STATUS: u8 = 84;

/// Current date and time, one byte per field starting with the year
pub const RTC_YEAR: u8 = 85;
/// Date and time to set, followed by a command byte
pub const RTC_SET_YEAR: u8 = 91;
pub const RTC_CMD: u8 = 97;

pub const WDT_RESET: u8 = 98;
pub const WDT_INTERVAL_SET: u8 = 99;
pub const WDT_INTERVAL_GET: u8 = 101;
pub const WDT_INIT_INTERVAL_SET: u8 = 103;
pub const WDT_INIT_INTERVAL_GET: u8 = 105;
pub const WDT_RESET_COUNT: u8 = 107;
pub const WDT_CLEAR_RESET_COUNT: u8 = 109;
pub const WDT_POWER_OFF_INTERVAL_SET: u8 = 110;
pub const WDT_POWER_OFF_INTERVAL_GET: u8 = 114;

pub const REVISION_HW_MAJOR: u8 = 0x78;
pub const REVISION_HW_MINOR: u8 = 0x79;
/// Firmware major version, also used as the presence probe
pub const REVISION_MAJOR: u8 = 0x7a;
pub const REVISION_MINOR: u8 = 0x7b;

/// Push button: bit 0 current state, bit 1 latched press
pub const BUTTON: u8 = 0x7c;

/// Size of the addressable register space
pub const MEM_SIZE: usize = 255;

/// Key byte that commits a calibration point (also terminates an RTC set)
pub const CALIBRATION_KEY: u8 = 0xaa;
/// Key byte that clears a channel's calibration
pub const RESET_CALIBRATION_KEY: u8 = 0x55;
/// Written to [`WDT_RESET`] to reload the watchdog
pub const WDT_RESET_SIGNATURE: u8 = 0xca;
/// Written to [`WDT_CLEAR_RESET_COUNT`] to clear the reset counter
pub const WDT_RESET_COUNT_SIGNATURE: u8 = 0xbe;
