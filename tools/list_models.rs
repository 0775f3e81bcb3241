/// List models — print the Gemini models that can write passages.
///
/// Usage: list_models [--config <file.ron>]
///
/// Reads the API key from GEMINI_API_KEY and prints every model that
/// supports `generateContent`, marking the configured one.

use std::path::Path;

use storybook_engine::external::gemini::GeminiClient;
use storybook_engine::StorybookConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = match args.get(1).map(String::as_str) {
        None => StorybookConfig::default(),
        Some("--config") if args.len() == 3 => {
            match StorybookConfig::load_from_ron(Path::new(&args[2])) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("Failed to load config {}: {}", args[2], e);
                    std::process::exit(1);
                }
            }
        }
        Some(_) => {
            eprintln!("Usage: list_models [--config <file.ron>]");
            std::process::exit(1);
        }
    };

    let client = match GeminiClient::from_env(&config.generator) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {} (set GEMINI_API_KEY)", e);
            std::process::exit(1);
        }
    };

    match client.list_models().await {
        Ok(models) => {
            println!("Models supporting generateContent:");
            for model in models {
                let marker = if model == client.model() { "*" } else { " " };
                println!("  {} {}", marker, model);
            }
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
