//! gofcm CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use gofcm::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // `check` installs the subscriber described by the resolved log section.
    if !matches!(cli.command, Commands::Check) {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let result = match cli.command {
        Commands::Config(args) => {
            gofcm::cli::commands::config::execute(args, cli.config.as_deref(), cli.json)
        }
        Commands::Check => gofcm::cli::commands::check::execute(cli.config.as_deref(), cli.json),
    };

    if let Err(err) = result {
        gofcm::cli::handle_error(err, cli.json);
    }
}
