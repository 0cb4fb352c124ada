use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use lexi_brain::config::Config;
use lexi_brain::error::{LexiError, Result};
use lexi_brain::factories::brain_factory::LexiBrainFactory;
use lexi_brain::logging::init_tracing;
use lexi_brain::LexiBrain;

#[derive(Parser, Debug)]
#[command(name = "lexi")]
#[command(version)]
#[command(about = "Route assistant utterances to weather, news, search and YouTube plugins")]
struct Cli {
    /// JSON config file; `LEXI_*` environment variables fill whatever it leaves out.
    #[arg(long, env = "LEXI_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process one utterance and print the response envelope as JSON.
    Ask {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Read utterances from stdin, one per line.
    Repl,
    /// Show which credentials and plugins are available.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("lexi");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?.resolve_env(),
        None => Config::from_env(),
    };

    match cli.command {
        Command::Status => {
            let brain = LexiBrainFactory::create_from_config(&config)?;
            let report = serde_json::json!({
                "status": config.plugin_status(),
                "plugins": brain.capabilities(),
            });
            print_json(&report)
        }
        Command::Ask { text } => {
            let brain = LexiBrainFactory::create_from_config(&config)?;
            answer(&brain, &text.join(" ")).await
        }
        Command::Repl => {
            let brain = LexiBrainFactory::create_from_config(&config)?;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| LexiError::Runtime(e.to_string()))?
            {
                if line.trim().is_empty() {
                    continue;
                }
                answer(&brain, &line).await?;
            }
            Ok(())
        }
    }
}

async fn answer(brain: &LexiBrain, text: &str) -> Result<()> {
    let response = brain.process_user_input(text).await;
    print_json(&response)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
