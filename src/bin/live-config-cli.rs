use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "live-config-cli")]
#[command(about = "Read and replace a running process's configuration", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(long, default_value = "/config/")]
    config_path: String,

    #[arg(long, default_value = "/config-schema/")]
    schema_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current configuration
    Get,
    /// Print the configuration's JSON Schema
    Schema,
    /// Replace the configuration with the contents of a JSON file
    Set {
        /// JSON file holding the candidate configuration
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Get => {
            let res = client.get(format!("{}{}", base, cli.config_path)).send().await?;
            print_response(res).await?;
        }
        Commands::Schema => {
            let res = client.get(format!("{}{}", base, cli.schema_path)).send().await?;
            print_response(res).await?;
        }
        Commands::Set { file } => {
            let body = std::fs::read(&file)?;
            // Fail locally on malformed files instead of round-tripping a 400.
            serde_json::from_slice::<Value>(&body)?;

            let res = client
                .post(format!("{}{}", base, cli.config_path))
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = res.status();
            if status.is_success() {
                println!("Configuration updated");
            } else {
                eprintln!("Error: server returned status {}", status);
                if let Ok(text) = res.text().await {
                    eprintln!("Response: {}", text.trim_end());
                }
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: server returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text.trim_end());
        }
        std::process::exit(1);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
