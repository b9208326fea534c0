use std::fmt;
use std::io::Write;
use std::ops::RangeInclusive;

use super::Command;
use crate::registers::{CALIBRATION_KEY, RTC_SET_YEAR, RTC_YEAR};
use crate::{Args, Error, Session};

/// Calendar time as held by the board's RTC, two-digit year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DateTime {
    year: u8,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
}

impl DateTime {
    /// Register order is year first.
    fn from_registers([year, month, day, hour, minute, second]: [u8; 6]) -> Self {
        Self { year, month, day, hour, minute, second }
    }

    /// Set block, terminated by the commit key.
    fn to_registers(self) -> [u8; 7] {
        [
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            CALIBRATION_KEY,
        ]
    }

    /// Parse `mm dd yy hh mm ss` starting at word `first`.
    fn from_args(args: &Args, first: usize) -> Result<Self, Error> {
        let field = |offset: usize,
                     what: &'static str,
                     range: RangeInclusive<u8>,
                     text: &'static str|
         -> Result<u8, Error> {
            let value = args.integer(first + offset)?;
            u8::try_from(value)
                .ok()
                .filter(|value| range.contains(value))
                .ok_or(Error::ValueOutOfRange { what, range: text })
        };
        Ok(Self {
            month: field(0, "month", 1..=12, "[1..12]")?,
            day: field(1, "date", 1..=31, "[1..31]")?,
            year: field(2, "year", 0..=99, "[0..99]")?,
            hour: field(3, "hour", 0..=23, "[0..23]")?,
            minute: field(4, "minute", 0..=59, "[0..59]")?,
            second: field(5, "second", 0..=59, "[0..59]")?,
        })
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.month, self.day, self.year, self.hour, self.minute, self.second
        )
    }
}

fn read<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let now = DateTime::from_registers(session.board(stack)?.read_array(RTC_YEAR)?);
    writeln!(session.output(), "{now}")?;
    Ok(())
}

fn write<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[9])?;
    let stack = args.stack()?;
    let time = DateTime::from_args(args, 3)?;
    session
        .board(stack)?
        .write_registers(RTC_SET_YEAR, &time.to_registers())?;
    writeln!(session.output(), "done")?;
    Ok(())
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("rtcrd")
            .handler(|_, session, args| read(session, args))
            .help("Get the internal RTC date and time(mm/dd/yy hh:mm:ss)")
            .usage(&["<id> rtcrd"])
            .example("0 rtcrd; Get the internal RTC time and date on board #0")
            .build(),
        Command::builder()
            .verb("rtcwr")
            .handler(|_, session, args| write(session, args))
            .help("Set the internal RTC date and time(mm/dd/yy hh:mm:ss)")
            .usage(&["<id> rtcwr <mm> <dd> <yy> <hh> <mm> <ss>"])
            .example("0 rtcwr 9 15 20 21 43 15; Set the internal RTC on board #0 to Sept/15/2020 21:43:15")
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prints_month_first() {
        let time = DateTime::from_registers([24, 3, 9, 7, 5, 0]);
        assert_eq!(time.to_string(), "03/09/24 07:05:00");
    }

    #[test]
    fn set_block_is_year_first_and_keyed() {
        let args = Args::new(["0", "rtcwr", "9", "15", "20", "21", "43", "15"]);
        let time = DateTime::from_args(&args, 3).unwrap();
        assert_eq!(time.to_registers(), [20, 9, 15, 21, 43, 15, CALIBRATION_KEY]);
    }

    #[test]
    fn each_field_is_range_checked() {
        let cases = [
            (["13", "1", "20", "0", "0", "0"], "month"),
            (["12", "0", "20", "0", "0", "0"], "date"),
            (["12", "1", "100", "0", "0", "0"], "year"),
            (["12", "1", "20", "24", "0", "0"], "hour"),
            (["12", "1", "20", "0", "60", "0"], "minute"),
            (["12", "1", "20", "0", "0", "-1"], "second"),
        ];
        for (fields, expected) in cases {
            let args = Args::new(["0", "rtcwr"].into_iter().chain(fields));
            match DateTime::from_args(&args, 3) {
                Err(Error::ValueOutOfRange { what, .. }) => assert_eq!(what, expected),
                other => panic!("{expected}: {other:?}"),
            }
        }
    }
}
