use std::process::ExitCode;

use clap::Parser;
use log::debug;

use multiio::commands::CommandTable;
use multiio::linux::Console;
use multiio::{Args, Cli};

fn main() -> ExitCode {
    env_logger::builder().format_timestamp_millis().init();

    let cli = Cli::parse();
    debug!("Using bus {}", cli.bus.display());
    let args = Args::from(&cli);
    let mut console = Console::new(cli.bus);
    match CommandTable::new().run(&mut console, &args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("Exiting after {err:?}");
            ExitCode::from(err.exit_code())
        }
    }
}
