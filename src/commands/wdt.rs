//! Watchdog timer.

use std::io::Write;

use super::Command;
use crate::registers::{
    WDT_CLEAR_RESET_COUNT, WDT_INIT_INTERVAL_GET, WDT_INIT_INTERVAL_SET,
    WDT_POWER_OFF_INTERVAL_GET, WDT_POWER_OFF_INTERVAL_SET, WDT_RESET, WDT_RESET_COUNT,
    WDT_RESET_COUNT_SIGNATURE, WDT_RESET_SIGNATURE, WDT_INTERVAL_GET, WDT_INTERVAL_SET,
};
use crate::{Args, Error, Session};

/// A watchdog interval in seconds, with separate read and write registers.
struct Interval {
    get: u8,
    set: u8,
    /// Width on the wire, 2 or 4 bytes.
    wide: bool,
    min: u32,
    max: u32,
    what: &'static str,
    range: &'static str,
}

const PERIOD: Interval = Interval {
    get: WDT_INTERVAL_GET,
    set: WDT_INTERVAL_SET,
    wide: false,
    min: 1,
    max: 65_000,
    what: "watchdog period",
    range: "[1..65000]s",
};

const INIT_PERIOD: Interval = Interval {
    get: WDT_INIT_INTERVAL_GET,
    set: WDT_INIT_INTERVAL_SET,
    wide: false,
    min: 10,
    max: 65_000,
    what: "watchdog initial period",
    range: "[10..65000]s",
};

/// Up to 48 days.
const POWER_OFF: Interval = Interval {
    get: WDT_POWER_OFF_INTERVAL_GET,
    set: WDT_POWER_OFF_INTERVAL_SET,
    wide: true,
    min: 2,
    max: 4_147_200,
    what: "watchdog power off interval",
    range: "[2..4147200]s",
};

fn reload<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    session.board(stack)?.write_u8(WDT_RESET, WDT_RESET_SIGNATURE)
}

fn read_interval<S: Session>(session: &mut S, args: &Args, interval: &Interval) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let mut board = session.board(stack)?;
    let seconds = if interval.wide {
        board.read_u32(interval.get)?
    } else {
        board.read_u16(interval.get)?.into()
    };
    writeln!(session.output(), "{seconds}")?;
    Ok(())
}

fn write_interval<S: Session>(session: &mut S, args: &Args, interval: &Interval) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let out_of_range = Error::ValueOutOfRange {
        what: interval.what,
        range: interval.range,
    };
    let seconds = u32::try_from(args.integer(3)?)
        .ok()
        .filter(|s| (interval.min..=interval.max).contains(s))
        .ok_or(out_of_range)?;
    let mut board = session.board(stack)?;
    if interval.wide {
        board.write_u32(interval.set, seconds)
    } else {
        // Narrow maxima are below u16::MAX.
        board.write_u16(interval.set, seconds as u16)
    }
}

fn read_reset_count<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let count = session.board(stack)?.read_u16(WDT_RESET_COUNT)?;
    writeln!(session.output(), "{count}")?;
    Ok(())
}

fn clear_reset_count<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    session
        .board(stack)?
        .write_u8(WDT_CLEAR_RESET_COUNT, WDT_RESET_COUNT_SIGNATURE)
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("wdtr")
            .handler(|_, session, args| reload(session, args))
            .help("Reload the watchdog timer and enable the watchdog if disabled")
            .usage(&["<id> wdtr"])
            .example("0 wdtr; Reload the watchdog timer on board #0 with the period")
            .build(),
        Command::builder()
            .verb("wdtprd")
            .handler(|_, session, args| read_interval(session, args, &PERIOD))
            .help("Get the watchdog period in seconds, reload command must be issued in this interval")
            .usage(&["<id> wdtprd"])
            .example("0 wdtprd; Get the watchdog timer period on board #0")
            .build(),
        Command::builder()
            .verb("wdtpwr")
            .handler(|_, session, args| write_interval(session, args, &PERIOD))
            .help("Set the watchdog period in seconds, reload command must be issued in this interval")
            .usage(&["<id> wdtpwr <val>"])
            .example("0 wdtpwr 10; Set the watchdog timer period on board #0 at 10 seconds")
            .build(),
        Command::builder()
            .verb("wdtiprd")
            .handler(|_, session, args| read_interval(session, args, &INIT_PERIOD))
            .help("Get the watchdog initial period in seconds, used after power on or a watchdog reset")
            .usage(&["<id> wdtiprd"])
            .example("0 wdtiprd; Get the watchdog timer initial period on board #0")
            .build(),
        Command::builder()
            .verb("wdtipwr")
            .handler(|_, session, args| write_interval(session, args, &INIT_PERIOD))
            .help("Set the watchdog initial period in seconds, used after power on or a watchdog reset")
            .usage(&["<id> wdtipwr <val>"])
            .example("0 wdtipwr 60; Set the watchdog timer initial period on board #0 at 60 seconds")
            .build(),
        Command::builder()
            .verb("wdtoprd")
            .handler(|_, session, args| read_interval(session, args, &POWER_OFF))
            .help("Get the watchdog off period in seconds (max 48 days), the time the supply stays off after a reset")
            .usage(&["<id> wdtoprd"])
            .example("0 wdtoprd; Get the watchdog off period on board #0")
            .build(),
        Command::builder()
            .verb("wdtopwr")
            .handler(|_, session, args| write_interval(session, args, &POWER_OFF))
            .help("Set the watchdog off period in seconds (max 48 days), the time the supply stays off after a reset")
            .usage(&["<id> wdtopwr <val>"])
            .example("0 wdtopwr 10; Set the watchdog off interval on board #0 at 10 seconds")
            .build(),
        Command::builder()
            .verb("wdtrcrd")
            .handler(|_, session, args| read_reset_count(session, args))
            .help("Get the watchdog reset count")
            .usage(&["<id> wdtrcrd"])
            .example("0 wdtrcrd; Get the watchdog reset count on board #0")
            .build(),
        Command::builder()
            .verb("wdtrcclr")
            .handler(|_, session, args| clear_reset_count(session, args))
            .help("Clear the watchdog reset count")
            .usage(&["<id> wdtrcclr"])
            .example("0 wdtrcclr; Clear the watchdog reset count on board #0")
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_intervals_fit_their_registers() {
        for interval in [&PERIOD, &INIT_PERIOD] {
            assert!(!interval.wide);
            assert!(u16::try_from(interval.max).is_ok());
            assert_eq!(interval.get - interval.set, 2);
        }
        assert!(POWER_OFF.wide);
        assert_eq!(POWER_OFF.get - POWER_OFF.set, 4);
    }
}
