//! Process arguments.
//!
//! `clap` handles the global options. Everything after them is passed through
//! untouched as the command words, so `-h`, `-v` and `-list` reach the command
//! table like any other verb.

use std::path::PathBuf;

use clap::Parser;

use crate::board::STACK_LEVELS;
use crate::channel::ChannelClass;
use crate::linux::DEFAULT_BUS;
use crate::{Error, PROGRAM_NAME};

#[derive(Debug, Parser)]
#[command(
    name = PROGRAM_NAME,
    about = "Command line tool for the Multi-IO board",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// I2C adapter device node
    #[arg(long, env = "MULTIIO_BUS", default_value = DEFAULT_BUS)]
    pub bus: PathBuf,

    /// Stack level and command, or a meta option (-h, -v, -list)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub words: Vec<String>,
}

/// Command words, with the program name at index 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    words: Vec<String>,
}

impl Args {
    pub fn new<I, T>(words: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            words: std::iter::once(PROGRAM_NAME.to_owned())
                .chain(words.into_iter().map(Into::into))
                .collect(),
        }
    }

    /// Word count including the program name.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// True when no command words follow the program name.
    pub fn is_empty(&self) -> bool {
        self.words.len() < 2
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn word(&self, index: usize) -> Result<&str, Error> {
        self.get(index).ok_or(Error::ArgumentCount)
    }

    /// Fail unless the word count is one of `counts`.
    pub fn expect(&self, counts: &[usize]) -> Result<(), Error> {
        if counts.contains(&self.len()) {
            Ok(())
        } else {
            Err(Error::ArgumentCount)
        }
    }

    pub fn integer(&self, index: usize) -> Result<i64, Error> {
        let word = self.word(index)?;
        word.trim()
            .parse()
            .map_err(|_| Error::InvalidNumber(word.to_owned()))
    }

    pub fn float(&self, index: usize) -> Result<f32, Error> {
        let word = self.word(index)?;
        match word.trim().parse::<f32>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(Error::InvalidNumber(word.to_owned())),
        }
    }

    /// Stack level of the target board, always word 1.
    pub fn stack(&self) -> Result<u8, Error> {
        let stack = self.integer(1)?;
        u8::try_from(stack)
            .ok()
            .filter(|stack| STACK_LEVELS.contains(stack))
            .ok_or(Error::StackOutOfRange(stack))
    }

    pub fn channel(&self, index: usize, class: ChannelClass) -> Result<u8, Error> {
        class.validate(self.integer(index)?)
    }

    pub fn is_keyword(&self, index: usize, keyword: &str) -> bool {
        self.get(index)
            .is_some_and(|word| word.eq_ignore_ascii_case(keyword))
    }
}

impl From<&Cli> for Args {
    fn from(cli: &Cli) -> Self {
        Args::new(cli.words.iter().cloned())
    }
}
