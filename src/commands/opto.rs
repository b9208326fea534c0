//! Optocoupled inputs, their edge counters and quadrature encoders.

use std::io::Write;

use bit_field::BitField;

use super::Command;
use crate::channel::ChannelClass;
use crate::codec::{Region, RAW_SIZE};
use crate::registers::{
    OPTO, OPTO_CNT_RST, OPTO_EDGE_COUNT, OPTO_ENC_CNT_RST, OPTO_ENC_COUNT, OPTO_ENC_ENABLE,
    OPTO_IT_RISING,
};
use crate::{Args, Error, Session};

const EDGE_COUNTERS: Region =
    Region::new(OPTO_EDGE_COUNT, RAW_SIZE as u8, ChannelClass::Opto.max());
const ENCODER_COUNTERS: Region =
    Region::new(OPTO_ENC_COUNT, RAW_SIZE as u8, ChannelClass::OptoEncoder.max());

/// Edge selection: bit 0 rising, bit 1 falling.
fn parse_edges(word: &str) -> Result<u8, Error> {
    const KEYWORDS: [(&str, u8); 6] = [
        ("none", 0),
        ("up", 1),
        ("rising", 1),
        ("down", 2),
        ("falling", 2),
        ("both", 3),
    ];
    if let Some((_, edges)) = KEYWORDS.iter().find(|(k, _)| k.eq_ignore_ascii_case(word)) {
        return Ok(*edges);
    }
    let out_of_range = || Error::ValueOutOfRange {
        what: "edge counting type",
        range: "[0..3]",
    };
    match word.trim().parse::<i64>() {
        Ok(edges @ 0..=3) => Ok(edges as u8),
        Ok(_) => Err(out_of_range()),
        Err(_) => Err(Error::InvalidArgument {
            what: "edge counting type",
            value: word.to_owned(),
        }),
    }
}

fn read<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3, 4])?;
    let stack = args.stack()?;
    let channel = match args.len() {
        4 => Some(args.channel(3, ChannelClass::Opto)?),
        _ => None,
    };
    let inputs = session.board(stack)?.read_u8(OPTO)?;
    let out = session.output();
    match channel {
        Some(channel) => writeln!(out, "{}", u8::from(inputs.get_bit(usize::from(channel - 1))))?,
        None => writeln!(out, "{inputs}")?,
    }
    Ok(())
}

fn read_edges<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let bit = usize::from(args.channel(3, ChannelClass::Opto)? - 1);
    let [rising, falling] = session.board(stack)?.read_array::<2>(OPTO_IT_RISING)?;
    let mut edges = 0u8;
    edges.set_bit(0, rising.get_bit(bit));
    edges.set_bit(1, falling.get_bit(bit));
    writeln!(session.output(), "{edges}")?;
    Ok(())
}

fn write_edges<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[5])?;
    let stack = args.stack()?;
    let bit = usize::from(args.channel(3, ChannelClass::Opto)? - 1);
    let edges = parse_edges(args.word(4)?)?;
    let mut board = session.board(stack)?;
    let [mut rising, mut falling] = board.read_array::<2>(OPTO_IT_RISING)?;
    rising.set_bit(bit, edges.get_bit(0));
    falling.set_bit(bit, edges.get_bit(1));
    board.write_registers(OPTO_IT_RISING, &[rising, falling])
}

fn read_count<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let channel = args.channel(3, ChannelClass::Opto)?;
    let register = EDGE_COUNTERS.address(channel)?;
    let count = session.board(stack)?.read_u32(register)?;
    writeln!(session.output(), "{count}")?;
    Ok(())
}

/// Writes the 1-based channel number to a reset register.
fn reset<S: Session>(
    session: &mut S,
    args: &Args,
    class: ChannelClass,
    register: u8,
) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let channel = args.channel(3, class)?;
    session.board(stack)?.write_u8(register, channel)
}

fn read_encoder<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let encoder = args.channel(3, ChannelClass::OptoEncoder)?;
    let enabled = session.board(stack)?.read_bit(OPTO_ENC_ENABLE, encoder)?;
    writeln!(session.output(), "{}", u8::from(enabled))?;
    Ok(())
}

fn write_encoder<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[5])?;
    let stack = args.stack()?;
    let encoder = args.channel(3, ChannelClass::OptoEncoder)?;
    let enable = match args.integer(4)? {
        0 => false,
        1 => true,
        _ => {
            return Err(Error::ValueOutOfRange {
                what: "encoder state",
                range: "0 or 1",
            })
        }
    };
    session
        .board(stack)?
        .modify_bit(OPTO_ENC_ENABLE, encoder, enable)
}

fn read_encoder_count<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[4])?;
    let stack = args.stack()?;
    let encoder = args.channel(3, ChannelClass::OptoEncoder)?;
    let register = ENCODER_COUNTERS.address(encoder)?;
    let raw = session.board(stack)?.read_array(register)?;
    writeln!(session.output(), "{}", i32::from_le_bytes(raw))?;
    Ok(())
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("optrd")
            .handler(|_, session, args| read(session, args))
            .help("Read optocoupled inputs status")
            .usage(&["<id> optrd <channel>", "<id> optrd"])
            .example("0 optrd 2; Read status of optocoupled input ch #2 on board #0")
            .build(),
        Command::builder()
            .verb("optedgerd")
            .handler(|_, session, args| read_edges(session, args))
            .help("Read optocoupled counting edges 0 - none; 1 - rising; 2 - falling; 3 - both")
            .usage(&["<id> optedgerd <channel>"])
            .example("0 optedgerd 2; Read counting edges of optocoupled channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("optedgewr")
            .handler(|_, session, args| write_edges(session, args))
            .help("Set optocoupled channel counting edges 0 - none; 1 - rising; 2 - falling; 3 - both")
            .usage(&["<id> optedgewr <channel> <edges>"])
            .example("0 optedgewr 2 rising; Count rising edges on optocoupled channel #2 on board #0")
            .build(),
        Command::builder()
            .verb("optcntrd")
            .handler(|_, session, args| read_count(session, args))
            .help("Read optocoupled inputs edges count for one pin")
            .usage(&["<id> optcntrd <channel>"])
            .example("0 optcntrd 2; Read contor of optocoupled input ch #2 on board #0")
            .build(),
        Command::builder()
            .verb("optcntrst")
            .handler(|_, session, args| reset(session, args, ChannelClass::Opto, OPTO_CNT_RST))
            .help("Reset optocoupled inputs edges count for one pin")
            .usage(&["<id> optcntrst <channel>"])
            .example("0 optcntrst 2; Reset contor of optocoupled input ch #2 on board #0")
            .build(),
        Command::builder()
            .verb("optencrd")
            .handler(|_, session, args| read_encoder(session, args))
            .help("Read optocoupled quadrature encoder state 0 - disabled 1 - enabled")
            .usage(&["<id> optencrd <encoder>"])
            .example("0 optencrd 2; Read state of optocoupled encoder #2 on board #0")
            .build(),
        Command::builder()
            .verb("optencwr")
            .handler(|_, session, args| write_encoder(session, args))
            .help("Enable / Disable optocoupled quadrature encoder, encoder 1 uses inputs 1 and 2, encoder 2 uses inputs 3 and 4")
            .usage(&["<id> optencwr <encoder> <state(0/1)>"])
            .example("0 optencwr 2 1; Enable encoder on optocoupled inputs 3 and 4 on board #0")
            .build(),
        Command::builder()
            .verb("optcntencrd")
            .handler(|_, session, args| read_encoder_count(session, args))
            .help("Read optocoupled encoder count for one channel")
            .usage(&["<id> optcntencrd <encoder>"])
            .example("0 optcntencrd 2; Read contor of optocoupled encoder #2 on board #0")
            .build(),
        Command::builder()
            .verb("optcntencrst")
            .handler(|_, session, args| {
                reset(session, args, ChannelClass::OptoEncoder, OPTO_ENC_CNT_RST)
            })
            .help("Reset optocoupled encoder count")
            .usage(&["<id> optcntencrst <encoder>"])
            .example("0 optcntencrst 2; Reset contor of encoder #2 on board #0")
            .build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_keywords() {
        assert_eq!(parse_edges("None").unwrap(), 0);
        assert_eq!(parse_edges("up").unwrap(), 1);
        assert_eq!(parse_edges("RISING").unwrap(), 1);
        assert_eq!(parse_edges("down").unwrap(), 2);
        assert_eq!(parse_edges("falling").unwrap(), 2);
        assert_eq!(parse_edges("both").unwrap(), 3);
        assert_eq!(parse_edges("3").unwrap(), 3);
    }

    #[test]
    fn edge_numbers_are_bounded() {
        assert!(matches!(parse_edges("4"), Err(Error::ValueOutOfRange { .. })));
        assert!(matches!(parse_edges("-1"), Err(Error::ValueOutOfRange { .. })));
        // Not silently zero.
        assert!(matches!(parse_edges("sideways"), Err(Error::InvalidArgument { .. })));
    }

    #[test]
    fn counters_fit_before_the_encoders() {
        let last = EDGE_COUNTERS.address(ChannelClass::Opto.max()).unwrap();
        assert!(usize::from(last) + RAW_SIZE <= usize::from(OPTO_ENC_COUNT));
        assert_eq!(ENCODER_COUNTERS.address(2).unwrap(), OPTO_ENC_COUNT + 4);
    }
}
