use anyhow::Result;

use crate::args::{Cli, Command};

pub mod doctor;
pub mod document;
pub mod schema;
pub mod validate;

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command.clone() {
        Command::Validate { schema } => validate::run(&schema),
        Command::Document { command } => document::run(command),
        Command::Schema { command } => schema::run(&cli, command),
        Command::Doctor => doctor::run(&cli),
    }
}
