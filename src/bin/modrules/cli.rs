//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use modrules::util::config::OutputFormat;

/// modrules - resolve module rules into build descriptors
#[derive(Parser)]
#[command(name = "modrules")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the module and print its build descriptor
    Resolve(ResolveArgs),

    /// Show include, definition and compiler switch flags
    Flags(FlagsArgs),

    /// Show which rules applied and what they did
    Explain(ExplainArgs),

    /// Resolve under every tier and editor combination
    Check(CheckArgs),

    /// Create a starter Module.toml
    Init(InitArgs),
}

/// Manifest location and target context flags.
#[derive(Args, Debug, Clone, Default)]
pub struct ContextArgs {
    /// Path to Module.toml (defaults to searching upward from the current directory)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Configuration tier: debug, development, test or shipping
    #[arg(short, long, env = "MODRULES_TIER")]
    pub tier: Option<String>,

    /// Request editor support
    #[arg(short, long, overrides_with = "no_editor")]
    pub editor: bool,

    /// Build without editor support, even if config requests it
    #[arg(long, overrides_with = "editor")]
    pub no_editor: bool,

    /// Platform identifier (defaults to the host OS)
    #[arg(short, long, env = "MODRULES_PLATFORM")]
    pub platform: Option<String>,
}

impl ContextArgs {
    /// Editor flag from the command line, if one was given.
    pub fn editor(&self) -> Option<bool> {
        match (self.editor, self.no_editor) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Args)]
pub struct FlagsArgs {
    #[command(flatten)]
    pub context: ContextArgs,

    /// Print all flags on one line
    #[arg(long)]
    pub one_line: bool,
}

#[derive(Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub context: ContextArgs,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Path to Module.toml (defaults to searching upward from the current directory)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Platform identifier (defaults to the host OS)
    #[arg(short, long, env = "MODRULES_PLATFORM")]
    pub platform: Option<String>,
}

#[derive(Args)]
pub struct InitArgs {
    /// Module name (defaults to directory name)
    #[arg(long)]
    pub name: Option<String>,

    /// Directory to initialize (defaults to current directory)
    pub path: Option<PathBuf>,
}
