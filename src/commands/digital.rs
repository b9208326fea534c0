//! Open-drain outputs and LEDs.
//!
//! Both banks have a bitmap register plus set/clear registers that take a
//! 1-based channel number.

use std::io::Write;

use bit_field::BitField;

use super::Command;
use crate::channel::ChannelClass;
use crate::registers::{LEDS, LED_CLR, LED_SET, RELAYS, RELAY_CLR, RELAY_SET};
use crate::{Args, Error, Session};

struct Bank {
    class: ChannelClass,
    bitmap: u8,
    set: u8,
    clear: u8,
    mask_range: &'static str,
}

const OPEN_DRAIN: Bank = Bank {
    class: ChannelClass::OpenDrain,
    bitmap: RELAYS,
    set: RELAY_SET,
    clear: RELAY_CLR,
    mask_range: "[0..3]",
};

const LED: Bank = Bank {
    class: ChannelClass::Led,
    bitmap: LEDS,
    set: LED_SET,
    clear: LED_CLR,
    mask_range: "[0..63]",
};

/// One `0`/`1` per channel, channel 1 first.
fn format_states(bits: u8, class: ChannelClass) -> String {
    (0..usize::from(class.max()))
        .map(|bit| if bits.get_bit(bit) { "1" } else { "0" })
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_state(args: &Args, index: usize) -> Result<bool, Error> {
    match args.integer(index)? {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(Error::ValueOutOfRange {
            what: "state",
            range: "0 or 1",
        }),
    }
}

fn read<S: Session>(session: &mut S, args: &Args, bank: &Bank) -> Result<(), Error> {
    args.expect(&[3, 4])?;
    let stack = args.stack()?;
    let channel = match args.len() {
        4 => Some(args.channel(3, bank.class)?),
        _ => None,
    };
    let bits = session.board(stack)?.read_u8(bank.bitmap)?;
    let out = session.output();
    match channel {
        Some(channel) => writeln!(out, "{}", u8::from(bits.get_bit(usize::from(channel - 1))))?,
        None => writeln!(out, "{}", format_states(bits, bank.class))?,
    }
    Ok(())
}

fn write<S: Session>(session: &mut S, args: &Args, bank: &Bank) -> Result<(), Error> {
    args.expect(&[4, 5])?;
    let stack = args.stack()?;
    if args.len() == 4 {
        let mask = u8::try_from(args.integer(3)?)
            .ok()
            .filter(|mask| mask & !bank.class.mask() == 0)
            .ok_or(Error::ValueOutOfRange {
                what: "mask",
                range: bank.mask_range,
            })?;
        return session.board(stack)?.write_u8(bank.bitmap, mask);
    }
    let channel = args.channel(3, bank.class)?;
    let register = if parse_state(args, 4)? { bank.set } else { bank.clear };
    session.board(stack)?.write_u8(register, channel)
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("dodrd")
            .handler(|_, session, args| read(session, args, &OPEN_DRAIN))
            .help("Read open-drain output digital value")
            .usage(&["<id> dodrd <channel[1..2]>", "<id> dodrd"])
            .example("0 dodrd 2; Get the state of open-drain #2 on board #0")
            .build(),
        Command::builder()
            .verb("dodwr")
            .handler(|_, session, args| write(session, args, &OPEN_DRAIN))
            .help("Write open-drain output digital value")
            .usage(&["<id> dodwr <channel[1..2]> <state(0/1)>", "<id> dodwr <mask[0..3]>"])
            .example("0 dodwr 2 1; Turn on open-drain output channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("ledrd")
            .handler(|_, session, args| read(session, args, &LED))
            .help("Display the state of general purpose LEDS on the card")
            .usage(&["<id> ledrd <led[1..6]>", "<id> ledrd"])
            .example("0 ledrd 2; Get the state of LED #2 on board #0")
            .build(),
        Command::builder()
            .verb("ledwr")
            .handler(|_, session, args| write(session, args, &LED))
            .help("Set the state of general purpose LEDS on the card")
            .usage(&["<id> ledwr <led[1..6]> <state(0/1)>", "<id> ledwr <mask[0..63]>"])
            .example("0 ledwr 2 1; Turn ON the LED #2 on board #0")
            .build(),
    ]
}
