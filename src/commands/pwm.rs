use std::io::Write;

use super::Command;
use crate::channel::ChannelClass;
use crate::codec::{Region, Scale, SCALED_SIZE};
use crate::registers::{MOT_VAL, SERVO_VAL1};
use crate::{Args, Error, Session};

const SERVOS: Region = Region::new(SERVO_VAL1, SCALED_SIZE as u8, ChannelClass::Servo.max());
/// The motor output is a single slot.
const MOTOR: Region = Region::new(MOT_VAL, SCALED_SIZE as u8, 1);

/// Extended range servos travel to 140%.
const SERVO_LIMIT: f32 = 140.0;
const MOTOR_LIMIT: f32 = 100.0;

fn percent(
    args: &Args,
    index: usize,
    limit: f32,
    what: &'static str,
    range: &'static str,
) -> Result<f32, Error> {
    let value = args.float(index)?;
    if (-limit..=limit).contains(&value) {
        Ok(value)
    } else {
        Err(Error::ValueOutOfRange { what, range })
    }
}

fn read_servo<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let channel = args.channel(3, ChannelClass::Servo)?;
    let value = session.board(stack)?.read_scaled(SERVOS, channel, Scale::DECI)?;
    writeln!(session.output(), "{value:.1}")?;
    Ok(())
}

fn write_servo<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[5])?;
    let stack = args.stack()?;
    let channel = args.channel(3, ChannelClass::Servo)?;
    let value = percent(args, 4, SERVO_LIMIT, "servo position", "[-140..140]%")?;
    session
        .board(stack)?
        .write_scaled(SERVOS, channel, Scale::DECI, value)
}

fn read_motor<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let value = session.board(stack)?.read_scaled(MOTOR, 1, Scale::DECI)?;
    writeln!(session.output(), "{value:.1}")?;
    Ok(())
}

fn write_motor<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let value = percent(args, 3, MOTOR_LIMIT, "motor fill factor", "[-100..100]%")?;
    session.board(stack)?.write_scaled(MOTOR, 1, Scale::DECI, value)
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("servord")
            .handler(|_, session, args| read_servo(session, args))
            .help("Display the servo position value in %")
            .usage(&["<id> servord <channel>"])
            .example("0 servord 1; Get the servo 1 position on board #0")
            .build(),
        Command::builder()
            .verb("servowr")
            .handler(|_, session, args| write_servo(session, args))
            .help("Set the servo position (-100..100) for standard (-140..140) for extended range servos")
            .usage(&["<id> servowr <channel> <value(%)>"])
            .example("0 servowr 1 25.2; Set the servo 1 position to 25.2% on board #0")
            .build(),
        Command::builder()
            .verb("motrd")
            .handler(|_, session, args| read_motor(session, args))
            .help("Display motor PWM fill factor value in %")
            .usage(&["<id> motrd"])
            .example("0 motrd; Get the motor PWM fill factor on board #0")
            .build(),
        Command::builder()
            .verb("motwr")
            .handler(|_, session, args| write_motor(session, args))
            .help("Set the motor PWM fill factor (-100..100)")
            .usage(&["<id> motwr <value(%)>"])
            .example("0 motwr 25.2; Set motor PWM to 25.2% on board #0")
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_sits_below_the_servos() {
        assert_eq!(MOTOR.address(1).unwrap() + SCALED_SIZE as u8, SERVOS.address(1).unwrap());
        assert!(MOTOR.address(2).is_err());
    }

    #[test]
    fn percent_limits_are_inclusive() {
        let args = Args::new(["0", "servowr", "1", "-140", "140.01"]);
        assert_eq!(percent(&args, 4, SERVO_LIMIT, "servo", "").unwrap(), -140.0);
        assert!(matches!(
            percent(&args, 5, SERVO_LIMIT, "servo", ""),
            Err(Error::ValueOutOfRange { what: "servo", .. })
        ));
    }
}
