use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(error) = run() {
        eprintln!("datastory error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = commands::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Report {
            input,
            out_dir,
            base_name,
        } => commands::report(input, out_dir, base_name, &config),
        Commands::Render { input, audience } => commands::render(input, audience, &config),
        Commands::Export { input, output } => commands::export(input, output.as_deref(), &config),
        Commands::Summary { input } => commands::summary(input, &config),
        Commands::Classify { metric, value } => commands::classify(metric, *value, &config),
    }
}

/// Logs go to stderr so stdout carries only the rendered documents.
fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default = if verbose {
        "debug"
    } else {
        "warn,datastory=info,datastory_core=info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
