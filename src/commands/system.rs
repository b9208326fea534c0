//! Help, version, board discovery and board status.

use std::io::Write;

use log::debug;

use super::{Command, CommandTable};
use crate::board::STACK_LEVELS;
use crate::codec::Scale;
use crate::registers::{DIAG_TEMPERATURE, REVISION_MAJOR};
use crate::{Args, Board, Error, Session, PROGRAM_NAME, VERSION};

fn help<S: Session>(table: &CommandTable<S>, session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[2, 3])?;
    let out = session.output();
    match args.get(2) {
        Some(topic) => table
            .find_by_name(topic)
            .ok_or_else(|| Error::UnknownTopic(topic.to_owned()))?
            .write_details(out)?,
        None => table.write_help(out)?,
    }
    Ok(())
}

fn version<S: Session>(session: &mut S) -> Result<(), Error> {
    writeln!(session.output(), "{PROGRAM_NAME} v{VERSION}")?;
    Ok(())
}

/// Probe every stack level on one bus connection.
fn list<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[2])?;
    let mut bus = session.open_bus()?;
    let mut found = Vec::new();
    for stack in STACK_LEVELS {
        match Board::open(&mut bus, stack) {
            Ok(_) => found.push(stack),
            Err(Error::BoardNotDetected { kind, .. }) => debug!("Stack {stack}: {kind}"),
            Err(err) => return Err(err),
        }
    }
    let out = session.output();
    writeln!(out, "{} board(s) detected", found.len())?;
    if !found.is_empty() {
        let ids: Vec<String> = found.iter().map(u8::to_string).collect();
        writeln!(out, "Id: {}", ids.join(" "))?;
    }
    Ok(())
}

fn board_status<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let mut board = session.board(stack)?;
    let [temperature, supply @ ..] = board.read_array::<3>(DIAG_TEMPERATURE)?;
    let [major, minor] = board.read_array::<2>(REVISION_MAJOR)?;
    writeln!(
        session.output(),
        "Firmware version {major}.{minor}, CPU temperature {temperature} C, Power source {:.2} V",
        Scale::MILLI.decode(supply)
    )?;
    Ok(())
}

fn calibration_status<S: Session>(session: &mut S, args: &Args) -> Result<(), Error> {
    args.expect(&[3])?;
    let stack = args.stack()?;
    let status = session.board(stack)?.calibration_status()?;
    writeln!(session.output(), "{status}")?;
    Ok(())
}

pub(super) fn meta<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("-h")
            .position(1)
            .handler(help)
            .help("Display the list of command options or one command option details")
            .usage(&["-h    Display command options list", "-h <param>    Display help for <param> command option"])
            .example("-h uinrd    Display help for \"uinrd\" command option")
            .build(),
        Command::builder()
            .verb("-v")
            .position(1)
            .handler(|_, session, _| version(session))
            .help("Display the multiio command version")
            .usage(&["-v"])
            .build(),
        Command::builder()
            .verb("-list")
            .position(1)
            .handler(|_, session, args| list(session, args))
            .help("List all Multi-IO boards connected, return the number of boards and stack level for every board")
            .usage(&["-list"])
            .example("-list; Display the number of boards and the stack level of each")
            .build(),
    ]
}

pub(super) fn status<S: Session>() -> Vec<Command<S>> {
    vec![
        Command::builder()
            .verb("board")
            .handler(|_, session, args| board_status(session, args))
            .help("Display the board status and firmware version number")
            .usage(&["<id> board"])
            .example("0 board; Display vcc, temperature and firmware version of board #0")
            .build(),
        Command::builder()
            .verb("calstat")
            .handler(|_, session, args| calibration_status(session, args))
            .help("Display current calibration status of device")
            .usage(&["<id> calstat"])
            .example("0 calstat")
            .build(),
    ]
}
