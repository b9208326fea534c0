//! Command table and dispatch.
//!
//! Every verb is described by a [`Command`]: where the verb sits in the
//! command words, the handler to run and its help texts. The table is built
//! once and searched front to back, so earlier entries win.

use std::io::{self, Write};

use bon::Builder;
use log::debug;

use crate::{Args, Error, Session, PROGRAM_NAME};

mod analog;
mod button;
mod digital;
mod opto;
mod pwm;
mod rtc;
mod rtd;
mod system;
mod wdt;

pub type Handler<S> = fn(&CommandTable<S>, &mut S, &Args) -> Result<(), Error>;

#[derive(Builder)]
pub struct Command<S> {
    verb: &'static str,
    /// Index of the verb in the command words.
    #[builder(default = 2)]
    position: usize,
    handler: Handler<S>,
    help: &'static str,
    /// Invocations without the program name, one per accepted form.
    usage: &'static [&'static str],
    #[builder(default)]
    example: &'static str,
}

impl<S> Command<S> {
    pub fn verb(&self) -> &'static str {
        self.verb
    }

    pub fn position(&self) -> usize {
        self.position
    }

    fn matches(&self, args: &Args) -> bool {
        args.get(self.position)
            .is_some_and(|word| word.eq_ignore_ascii_case(self.verb))
    }

    fn write_summary(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "  {:<17}{}", self.verb, self.help)
    }

    fn write_usage(&self, out: &mut dyn Write) -> io::Result<()> {
        match self.usage {
            [single] => writeln!(out, "  {:<17}{PROGRAM_NAME} {single}", "Usage:"),
            forms => forms.iter().enumerate().try_for_each(|(i, form)| {
                let label = format!("Usage {}:", i + 1);
                writeln!(out, "  {label:<17}{PROGRAM_NAME} {form}")
            }),
        }
    }

    fn write_details(&self, out: &mut dyn Write) -> io::Result<()> {
        self.write_summary(out)?;
        self.write_usage(out)?;
        if !self.example.is_empty() {
            writeln!(out, "  {:<17}{PROGRAM_NAME} {}", "Example:", self.example)?;
        }
        Ok(())
    }
}

pub struct CommandTable<S> {
    commands: Vec<Command<S>>,
}

impl<S: Session> CommandTable<S> {
    pub fn new() -> Self {
        let commands = [
            system::meta(),
            system::status(),
            analog::commands(),
            rtd::commands(),
            rtc::commands(),
            wdt::commands(),
            opto::commands(),
            pwm::commands(),
            digital::commands(),
            button::commands(),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self { commands }
    }

    pub fn commands(&self) -> &[Command<S>] {
        &self.commands
    }

    /// First command whose verb sits at its position in `args`.
    pub fn find(&self, args: &Args) -> Option<&Command<S>> {
        self.commands.iter().find(|command| command.matches(args))
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Command<S>> {
        self.commands
            .iter()
            .find(|command| command.verb.eq_ignore_ascii_case(name))
    }

    pub fn write_help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "Usage: {PROGRAM_NAME} [options] [...]")?;
        writeln!(out, "Options:")?;
        for command in &self.commands {
            command.write_summary(out)?;
        }
        writeln!(out, "Use \"{PROGRAM_NAME} -h <option>\" for more details")
    }

    /// Run the command named by `args`, reporting any failure on the
    /// session output before returning it.
    pub fn run(&self, session: &mut S, args: &Args) -> Result<(), Error> {
        if args.is_empty() {
            let out = session.output();
            writeln!(out, "{}", Error::MissingCommand)?;
            self.write_help(out)?;
            return Err(Error::MissingCommand);
        }
        let Some(command) = self.find(args) else {
            let out = session.output();
            writeln!(out, "{}", Error::UnknownCommand)?;
            self.write_help(out)?;
            return Err(Error::UnknownCommand);
        };
        debug!("Running {}", command.verb);
        let result = (command.handler)(self, session, args);
        if let Err(err) = &result {
            let out = session.output();
            write_error(out, err)?;
            if matches!(err, Error::ArgumentCount) {
                command.write_usage(out)?;
            }
        }
        result
    }
}

impl<S: Session> Default for CommandTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Print an error followed by its chain of causes.
fn write_error(out: &mut dyn Write, err: &Error) -> io::Result<()> {
    write!(out, "{err}")?;
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        write!(out, ": {cause}")?;
        source = cause.source();
    }
    writeln!(out)
}
