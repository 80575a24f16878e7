use anyhow::Result;

use super::super::args::ExtractCommand;
use super::helper::run_process;
use super::{CommandKind, CommandResult};

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    run_process(&cmd.args, CommandKind::Extract, false)
}
