use std::env;

use anyhow::{Context, Result};
use tracing::debug;

use super::super::args::{CommonArgs, ProcessArgs};
use super::{CommandKind, CommandResult, CommandSummary, ProcessSummary};
use crate::config::{ConfigLoadResult, load_config, load_config_file};
use crate::core::{Process, ProcessOptions};
use crate::logging;

/// Load the config for a command and install logging from it.
pub fn load_context(common: &CommonArgs) -> Result<ConfigLoadResult> {
    let cwd = env::current_dir().context("Failed to read the current directory")?;
    let loaded = match &common.config {
        Some(path) => load_config_file(&cwd.join(path))?,
        None => load_config(&cwd)?,
    };

    logging::init(&loaded.config.logging, common.verbose);
    debug!(
        root = %loaded.root.display(),
        from_file = loaded.from_file,
        "configuration loaded"
    );
    Ok(loaded)
}

/// Shared body of `extract` and `replace`.
pub fn run_process(
    args: &ProcessArgs,
    kind: CommandKind,
    auto_import: bool,
) -> Result<CommandResult> {
    let ConfigLoadResult {
        mut config, root, ..
    } = load_context(&args.common)?;
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
        config.validate()?;
    }

    let replace = kind == CommandKind::Replace;
    let options = ProcessOptions {
        replace,
        auto_import,
        dry_run: args.dry_run,
        patterns: args.patterns.clone(),
        ignores: args.ignores.clone(),
    };

    let mut process = Process::new(config, root)?;
    let result = process.execute(&options)?;

    Ok(CommandResult::new(
        kind,
        CommandSummary::Process(ProcessSummary {
            result,
            dry_run: args.dry_run,
            replace,
        }),
    ))
}
