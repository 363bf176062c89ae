//! modrules CLI - resolve module rules into build descriptors

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modrules::core::InvalidContext;
use modrules::util::diagnostic::{self, suggestions, Diagnostic};
use modrules::ResolutionError;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color;

    if let Err(e) = run(cli) {
        report(&e, color);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("modrules=debug")
    } else {
        EnvFilter::new("modrules=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Flags(args) => commands::flags::execute(args),
        Commands::Explain(args) => commands::explain::execute(args),
        Commands::Check(args) => commands::check::execute(args, cli.no_color),
        Commands::Init(args) => commands::init::execute(args),
    }
}

fn report(e: &anyhow::Error, color: bool) {
    if let Some(err) = e.downcast_ref::<ResolutionError>() {
        diagnostic::emit(&err.to_diagnostic(), color);
    } else if let Some(err) = e.downcast_ref::<InvalidContext>() {
        diagnostic::emit(
            &Diagnostic::error(err.to_string()).with_suggestion(suggestions::INVALID_TIER),
            color,
        );
    } else {
        eprintln!("error: {:#}", e);
    }
}
