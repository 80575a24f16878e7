use std::path::PathBuf;

use crate::core::ProcessResult;
use crate::translation::TranslationSummary;

use super::super::exit_status::ExitStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Init,
    Extract,
    Replace,
    Translate,
}

#[derive(Debug)]
pub enum CommandSummary {
    Init(InitSummary),
    Process(ProcessSummary),
    Translate(TranslateSummary),
}

#[derive(Debug)]
pub struct InitSummary {
    pub path: PathBuf,
    pub created: bool,
    /// True if an existing file was replaced by `--force`.
    pub overwritten: bool,
}

#[derive(Debug)]
pub struct ProcessSummary {
    pub result: ProcessResult,
    pub dry_run: bool,
    /// True for `replace`, false for `extract`.
    pub replace: bool,
}

#[derive(Debug)]
pub struct TranslateSummary {
    pub summaries: Vec<TranslationSummary>,
}

/// Result of running an i18n-xy command.
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    /// Failed files, failed translations, or a refused init.
    pub error_count: usize,
}

impl CommandResult {
    pub fn new(kind: CommandKind, summary: CommandSummary) -> Self {
        let error_count = match &summary {
            CommandSummary::Init(s) => usize::from(!s.created),
            CommandSummary::Process(s) => s.result.failed_files,
            CommandSummary::Translate(s) => s.summaries.iter().map(|t| t.failed_count).sum(),
        };
        Self {
            kind,
            summary,
            error_count,
        }
    }

    pub fn exit_status(&self) -> ExitStatus {
        ExitStatus::from_failures(self.error_count)
    }
}
