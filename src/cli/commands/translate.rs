use anyhow::{Result, bail};

use super::super::args::TranslateCommand;
use super::helper::load_context;
use super::{CommandKind, CommandResult, CommandSummary, TranslateSummary};
use crate::config::{CONFIG_FILE_NAME, ConfigLoadResult};
use crate::core::Process;

pub fn translate(cmd: TranslateCommand) -> Result<CommandResult> {
    let ConfigLoadResult { config, root, .. } = load_context(&cmd.common)?;

    let locales = if cmd.locales.is_empty() {
        if !config.translation.enabled {
            bail!(
                "Translation is disabled. Set translation.enabled in {} or pass --locales.",
                CONFIG_FILE_NAME
            );
        }
        vec![config.fallback_locale.clone()]
    } else {
        cmd.locales.clone()
    };

    let mut process = Process::new(config, root)?;
    let summaries = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(process.translate(&locales, cmd.from.as_deref(), cmd.to.as_deref()))?;

    Ok(CommandResult::new(
        CommandKind::Translate,
        CommandSummary::Translate(TranslateSummary { summaries }),
    ))
}
