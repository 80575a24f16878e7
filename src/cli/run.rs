//! Dispatches parsed arguments to the matching command handler.
use super::{
    args::{Arguments, Command},
    commands::CommandResult,
    commands::{extract::extract, init::init, replace::replace, translate::translate},
};
use anyhow::Result;

pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Init(cmd)) => init(cmd),
        Some(Command::Extract(cmd)) => extract(cmd),
        Some(Command::Replace(cmd)) => replace(cmd),
        Some(Command::Translate(cmd)) => translate(cmd),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
