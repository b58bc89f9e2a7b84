use clap::{Parser, Subcommand};

mod commands;

use commands::{CliError, ServeOptions, run_explain, run_serve};

#[derive(Parser, Debug)]
#[command(name = "explainer", version)]
#[command(about = "ExplainMyError - explains programming errors over the A2A protocol")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the A2A endpoint
    Serve {
        /// Listen address (overrides EXPLAINER_BIND_ADDR)
        #[arg(long)]
        bind: Option<String>,
        /// Maximum request body size in bytes (overrides EXPLAINER_MAX_BODY_SIZE)
        #[arg(long)]
        max_body_size: Option<usize>,
        /// Disable CORS headers
        #[arg(long)]
        no_cors: bool,
    },
    /// Explain one error message and exit
    Explain {
        /// The error message or stack trace
        message: String,
        /// Print the full agent output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize JSON logging once.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();
    let env_filter = match "info".parse() {
        Ok(directive) => env_filter.add_directive(directive),
        Err(_) => env_filter,
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .json()
        .try_init();

    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Serve {
            bind,
            max_body_size,
            no_cors,
        } => {
            run_serve(ServeOptions {
                bind,
                max_body_size,
                no_cors,
            })
            .await
        }
        Commands::Explain { message, json } => run_explain(&message, json).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}
