use std::io::Write;

use bit_field::BitField;

use super::Command;
use crate::registers::BUTTON;
use crate::{Args, Error, Session};

const PRESSED: usize = 0;
const LATCHED: usize = 1;

fn read<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let state = session.board(stack)?.read_u8(BUTTON)?;
    writeln!(session.output(), "{}", u8::from(state.get_bit(PRESSED)))?;
    Ok(())
}

/// A set latch is cleared once it has been read.
fn read_latch<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let mut board = session.board(stack)?;
    let latched = board.read_u8(BUTTON)?.get_bit(LATCHED);
    if latched {
        board.write_u8(BUTTON, 0)?;
    }
    writeln!(session.output(), "{}", u8::from(latched))?;
    Ok(())
}

pub(super) fn commands<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("brd")
            .handler(|_, session, args| read(session, args))
            .help("Read the button current state, 1 = pushed, 0 = released")
            .usage(&["<id> brd"])
            .example("0 brd")
            .build(),
        Command::builder()
            .verb("blrd")
            .handler(|_, session, args| read_latch(session, args))
            .help("Read the button latch, return 1 if the button has been pushed since last read")
            .usage(&["<id> blrd"])
            .example("0 blrd")
            .build(),
    ]
}
