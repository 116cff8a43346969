mod commands;
mod outputs;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// witness-action -- run a CI step under witness attestation.
#[derive(Parser, Debug)]
#[command(name = "witness-action", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve witness and run the payload under `witness run`
    Run {
        /// Payload argv; defaults to `<shell> -c <command input>`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },

    /// Resolve the witness binary and print its path
    Resolve {
        /// Version to resolve (defaults to the `witness_version` input, then latest)
        #[arg(long = "witness-version")]
        version: Option<String>,
    },

    /// Print the witness argv as JSON without running anything
    Args {
        /// Payload argv; defaults to `<shell> -c <command input>`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout belongs to witness and the payload.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { command } => {
            let code = commands::run::run(&command).await?;
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Commands::Resolve { version } => commands::resolve::run(version.as_deref()).await,
        Commands::Args { command } => commands::args::run(&command),
    }
}
