//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `init`: Write a default `i18n-xy.config.json`
//! - `extract`: Collect Chinese text into locale files
//! - `replace`: Collect text and rewrite sources to lookup calls
//! - `translate`: Fill missing keys of other locales through a provider

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Init(cmd)) => cmd.common.verbose,
            Some(Command::Extract(cmd)) => cmd.args.common.verbose,
            Some(Command::Replace(cmd)) => cmd.args.common.verbose,
            Some(Command::Translate(cmd)) => cmd.common.verbose,
            None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Config file to use instead of searching for i18n-xy.config.json
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct InitCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments shared by `extract` and `replace`.
#[derive(Debug, Clone, Default, Args)]
pub struct ProcessArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// Glob of files to process (replaces `include`; repeatable)
    #[arg(short, long = "pattern")]
    pub patterns: Vec<String>,

    /// Glob of files to skip (added to `exclude`; repeatable)
    #[arg(short, long = "ignore")]
    pub ignores: Vec<String>,

    /// Locale output directory (overrides `outputDir`)
    #[arg(short, long)]
    pub output: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub args: ProcessArgs,
}

#[derive(Debug, Args)]
pub struct ReplaceCommand {
    #[command(flatten)]
    pub args: ProcessArgs,

    /// Insert the configured import into rewritten files
    #[arg(long)]
    pub auto_import: bool,
}

#[derive(Debug, Args)]
pub struct TranslateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Target locales (default: `fallbackLocale`; repeatable)
    #[arg(short, long = "locales", num_args = 1..)]
    pub locales: Vec<String>,

    /// Provider source language (default: derived from `locale`)
    #[arg(long)]
    pub from: Option<String>,

    /// Provider target language (default: derived from each target locale)
    #[arg(long)]
    pub to: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a default i18n-xy.config.json in the current directory
    Init(InitCommand),
    /// Extract Chinese text into locale files without touching sources
    Extract(ExtractCommand),
    /// Extract Chinese text and replace it with lookup calls
    Replace(ReplaceCommand),
    /// Translate missing keys into other locales
    Translate(TranslateCommand),
}
