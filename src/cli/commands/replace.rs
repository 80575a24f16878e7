use anyhow::Result;

use super::super::args::ReplaceCommand;
use super::helper::run_process;
use super::{CommandKind, CommandResult};

pub fn replace(cmd: ReplaceCommand) -> Result<CommandResult> {
    run_process(&cmd.args, CommandKind::Replace, cmd.auto_import)
}
