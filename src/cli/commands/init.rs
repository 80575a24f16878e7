use std::{env, fs};

use anyhow::{Context, Result};

use super::super::args::InitCommand;
use super::{CommandKind, CommandResult, CommandSummary, InitSummary};
use crate::config::{CONFIG_FILE_NAME, LoggingConfig, default_config_json};
use crate::logging;

pub fn init(cmd: InitCommand) -> Result<CommandResult> {
    logging::init(&LoggingConfig::default(), cmd.common.verbose);

    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let path = match &cmd.common.config {
        Some(path) => cwd.join(path),
        None => cwd.join(CONFIG_FILE_NAME),
    };

    let exists = path.exists();
    if exists && !cmd.force {
        return Ok(CommandResult::new(
            CommandKind::Init,
            CommandSummary::Init(InitSummary {
                path,
                created: false,
                overwritten: false,
            }),
        ));
    }

    fs::write(&path, default_config_json()? + "\n")
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(CommandResult::new(
        CommandKind::Init,
        CommandSummary::Init(InitSummary {
            path,
            created: true,
            overwritten: exists,
        }),
    ))
}
