use std::io::Write;

use super::{analog, Command};
use crate::calibration::CalibrationTarget;
use crate::channel::ChannelClass;
use crate::codec::{Region, RAW_SIZE};
use crate::registers::{RTD_RES1, RTD_VAL1};
use crate::{Args, Error, Session};

const TEMPERATURE: Region = Region::new(RTD_VAL1, RAW_SIZE as u8, ChannelClass::Rtd.max());
const RESISTANCE: Region = Region::new(RTD_RES1, RAW_SIZE as u8, ChannelClass::Rtd.max());

fn read<S: Session>(session: &mut S, args: &Args, region: Region) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let channel = args.channel(3, ChannelClass::Rtd)?;
    let value = session.board(stack)?.read_f32(region, channel)?;
    writeln!(session.output(), "{value:.3}")?;
    Ok(())
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("rtdrd")
            .handler(|_, session, args| read(session, args, TEMPERATURE))
            .help("Display rtd temperature(C)")
            .usage(&["<id> rtdrd <channel>"])
            .example("0 rtdrd 2; Display the temperature of RTD channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("rtdresrd")
            .handler(|_, session, args| read(session, args, RESISTANCE))
            .help("Display rtd resistance(ohm)")
            .usage(&["<id> rtdresrd <channel>"])
            .example("0 rtdresrd 2; Display the resistance of RTD channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("rtdcal")
            .handler(|_, session, args| analog::calibrate(session, args, CalibrationTarget::Rtd))
            .help("Calibrate resistance measurement, the calibration must be done in 2 points")
            .usage(&["<id> rtdcal <channel> <value(ohm)>", "<id> rtdcal <channel> reset"])
            .example("0 rtdcal 1 100.34; Calibrate RTD channel #1 on board #0 at 100.34 ohm")
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resistance_follows_temperature() {
        assert_eq!(TEMPERATURE.address(2).unwrap(), RTD_VAL1 + 4);
        assert_eq!(RESISTANCE.address(1).unwrap(), TEMPERATURE.address(2).unwrap() + 4);
    }
}
