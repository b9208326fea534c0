use std::io::Write;

use super::Command;
use crate::calibration::CalibrationTarget;
use crate::channel::ChannelClass;
use crate::codec::{Region, Scale};
use crate::registers::{I_IN, I_OUT, U_IN, U_OUT};
use crate::{Args, Error, Session};

/// Describes one family of 0-10V or 4-20mA channels.
pub(super) struct AnalogChannel {
    class: ChannelClass,
    region: Region,
    target: CalibrationTarget,
}

impl AnalogChannel {
    const fn new(class: ChannelClass, base: u8, target: CalibrationTarget) -> Self {
        Self {
            class,
            region: Region::new(base, 2, class.max()),
            target,
        }
    }
}

const VOLTAGE_IN: AnalogChannel =
    AnalogChannel::new(ChannelClass::VoltageIn, U_IN, CalibrationTarget::VoltageIn);
const CURRENT_IN: AnalogChannel =
    AnalogChannel::new(ChannelClass::CurrentIn, I_IN, CalibrationTarget::CurrentIn);
const VOLTAGE_OUT: AnalogChannel =
    AnalogChannel::new(ChannelClass::VoltageOut, U_OUT, CalibrationTarget::VoltageOut);
const CURRENT_OUT: AnalogChannel =
    AnalogChannel::new(ChannelClass::CurrentOut, I_OUT, CalibrationTarget::CurrentOut);

/// Output setpoint bounds.
struct Limits {
    min: f32,
    max: f32,
    what: &'static str,
    range: &'static str,
}

const VOLTAGE_LIMITS: Limits = Limits {
    min: 0.0,
    max: 10.0,
    what: "voltage",
    range: "[0..10]V",
};
const CURRENT_LIMITS: Limits = Limits {
    min: 4.0,
    max: 20.0,
    what: "current",
    range: "[4..20]mA",
};

fn read<S: Session>(session: &mut S, args: &Args, analog: &AnalogChannel) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let channel = args.channel(3, analog.class)?;
    let mut board = session.board(stack)?;
    let value = board.read_scaled(analog.region, channel, Scale::MILLI)?;
    writeln!(session.output(), "{value:.3}")?;
    Ok(())
}

fn write<S: Session>(
    session: &mut S,
    args: &Args,
    analog: &AnalogChannel,
    limits: &Limits,
) -> Result<(), Error> {
    args.expect(&[5])?;
    let stack = args.stack()?;
    let channel = args.channel(3, analog.class)?;
    let value = args.float(4)?;
    if !(limits.min..=limits.max).contains(&value) {
        return Err(Error::ValueOutOfRange {
            what: limits.what,
            range: limits.range,
        });
    }
    session
        .board(stack)?
        .write_scaled(analog.region, channel, Scale::MILLI, value)
}

/// Shared by every calibratable class, including RTD.
pub(super) fn calibrate<S: Session>(
    session: &mut S,
    args: &Args,
    target: CalibrationTarget,
) -> Result<(), Error> {
    args.expect(&[5])?;
    let stack = args.stack()?;
    let slot = target.slot(args.channel(3, target.class())?);
    if args.is_keyword(4, "reset") {
        return session.board(stack)?.reset_calibration(slot);
    }
    let value = args.float(4)?;
    session.board(stack)?.calibrate(slot, value)
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("uinrd")
            .handler(|_, session, args| read(session, args, &VOLTAGE_IN))
            .help("Read 0-10V input voltage value(V)")
            .usage(&["<id> uinrd <channel>"])
            .example("0 uinrd 2; Read the voltage on 0-10V input channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("uincal")
            .handler(|_, session, args| calibrate(session, args, VOLTAGE_IN.target))
            .help("Calibrate 0-10V input channel, the calibration must be done in 2 points at min 5V apart")
            .usage(&["<id> uincal <channel> <value(V)>", "<id> uincal <channel> reset"])
            .example("0 uincal 1 0.5; Calibrate the 0-10V input channel #1 on board #0 at 0.5V")
            .build(),
        Command::builder()
            .verb("iinrd")
            .handler(|_, session, args| read(session, args, &CURRENT_IN))
            .help("Read 4-20mA input amperage value(mA)")
            .usage(&["<id> iinrd <channel>"])
            .example("0 iinrd 2; Read the current on 4-20mA input channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("iincal")
            .handler(|_, session, args| calibrate(session, args, CURRENT_IN.target))
            .help("Calibrate 4-20mA input channel, the calibration must be done in 2 points at min 10mA apart")
            .usage(&["<id> iincal <channel> <value(mA)>", "<id> iincal <channel> reset"])
            .example("0 iincal 1 5.5; Calibrate the 4-20mA input channel #1 on board #0 at 5.5mA")
            .build(),
        Command::builder()
            .verb("uoutrd")
            .handler(|_, session, args| read(session, args, &VOLTAGE_OUT))
            .help("Read 0-10V output voltage value(V)")
            .usage(&["<id> uoutrd <channel>"])
            .example("0 uoutrd 2; Read the voltage on 0-10V output channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("uoutwr")
            .handler(|_, session, args| write(session, args, &VOLTAGE_OUT, &VOLTAGE_LIMITS))
            .help("Write 0-10V output voltage value(V)")
            .usage(&["<id> uoutwr <channel> <value(V)>"])
            .example("0 uoutwr 2 2.5; Write 2.5V to 0-10V output channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("uoutcal")
            .handler(|_, session, args| calibrate(session, args, VOLTAGE_OUT.target))
            .help("Calibrate 0-10V output channel, the calibration must be done in 2 points at min 5V apart")
            .usage(&["<id> uoutcal <channel> <value(V)>", "<id> uoutcal <channel> reset"])
            .example("0 uoutcal 1 0.5; Calibrate the 0-10V output channel #1 on board #0 at 0.5V")
            .build(),
        Command::builder()
            .verb("ioutrd")
            .handler(|_, session, args| read(session, args, &CURRENT_OUT))
            .help("Read 4-20mA output amperage value(mA)")
            .usage(&["<id> ioutrd <channel>"])
            .example("0 ioutrd 2; Read the current on 4-20mA output channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("ioutwr")
            .handler(|_, session, args| write(session, args, &CURRENT_OUT, &CURRENT_LIMITS))
            .help("Write 4-20mA output amperage value(mA)")
            .usage(&["<id> ioutwr <channel> <value(mA)>"])
            .example("0 ioutwr 2 10.5; Set 10.5mA on 4-20mA output channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("ioutcal")
            .handler(|_, session, args| calibrate(session, args, CURRENT_OUT.target))
            .help("Calibrate 4-20mA output channel, the calibration must be done in 2 points at min 10mA apart")
            .usage(&["<id> ioutcal <channel> <value(mA)>", "<id> ioutcal <channel> reset"])
            .example("0 ioutcal 1 5.5; Calibrate the 4-20mA output channel #1 on board #0 at 5.5mA")
            .build(),
    ]
}
