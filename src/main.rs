use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use comment_scanner::config::Config;
use comment_scanner::output::terminal;
use comment_scanner::toxicity::Dispatcher;

/// Comment scanner: flags toxic comments with a trained model, falling back
/// to keyword matching when no model is installed.
#[derive(Parser)]
#[command(name = "comment-scanner", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (UI at /, API at /api/analyze)
    Serve {
        /// Port to listen on (default: 5000)
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Address to bind (default: 127.0.0.1)
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Classify a single comment and print the verdict
    Classify {
        /// The comment text
        text: String,

        /// Print the JSON response body instead of the colored summary
        #[arg(long)]
        json: bool,
    },

    /// Print the normalized form of a comment
    Normalize {
        /// The comment text
        text: String,
    },

    /// Show model directory, artifact status and keyword source
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new("comment_scanner=info,tower_http=info")
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config::load()?;
            info!(
                model_dir = %config.model_dir.display(),
                cache = %config.model_cache,
                "Starting web server"
            );
            let dispatcher = Dispatcher::from_config(&config)?;
            println!("Open your browser and go to: http://{bind}:{port}");
            comment_scanner::web::run_server(dispatcher, port, &bind).await?;
        }

        Commands::Classify { text, json } => {
            let config = Config::load()?;
            let dispatcher = Dispatcher::from_config(&config)?;
            let result = dispatcher.classify(&text)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                terminal::display_result(&result);
            }
        }

        Commands::Normalize { text } => {
            println!("{}", comment_scanner::text::normalize(&text));
        }

        Commands::Status => {
            let config = Config::load()?;
            let dispatcher = Dispatcher::from_config(&config)?;
            terminal::display_status(&dispatcher);
        }
    }

    Ok(())
}
