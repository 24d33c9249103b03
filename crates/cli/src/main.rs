//! Time Machine CLI - queue reminders and inspect the daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser, Debug)]
#[command(name = "timemachine-cli")]
#[command(about = "Time Machine reminder queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "TIMEMACHINE_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Commands {
    /// Queue a message for a future delivery
    Add {
        /// Message text (quote it to keep spaces)
        message: String,
    },

    /// List pending messages, next delivery first
    List,

    /// Show daemon status
    Status,
}

#[derive(Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct AddResult {
    queue_length: usize,
}

#[derive(Deserialize)]
struct ListResult {
    messages: Vec<String>,
    count: usize,
}

#[derive(Deserialize)]
struct StatsResult {
    queue_length: usize,
    uptime_seconds: u64,
}

#[derive(Tabled)]
struct MessageRow {
    #[tabled(rename = "#")]
    position: usize,
    message: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        method,
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    into_result(response)
}

fn into_result(response: JsonRpcResponse) -> Result<serde_json::Value> {
    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn message_rows(messages: Vec<String>) -> Vec<MessageRow> {
    messages
        .into_iter()
        .enumerate()
        .map(|(i, message)| MessageRow {
            position: i + 1,
            message,
        })
        .collect()
}

fn format_uptime(seconds: u64) -> String {
    let (days, rest) = (seconds / 86_400, seconds % 86_400);
    let (hours, rest) = (rest / 3600, rest % 3600);
    let minutes = rest / 60;
    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, rest % 60)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Add { message } => {
            let result = call_rpc(&cli.rpc_url, "queue.add.v1", json!({ "message": message })).await?;
            let added: AddResult = serde_json::from_value(result)?;

            println!("{}", "✓ Message queued".green().bold());
            println!("  {} {}", "Queue length:".bold(), added.queue_length);
        }

        Commands::List => {
            let result = call_rpc(&cli.rpc_url, "queue.list.v1", json!({})).await?;
            let list: ListResult = serde_json::from_value(result)?;

            if list.count == 0 {
                println!("{}", "Queue is empty".yellow());
            } else {
                println!("{}", format!("{} pending message(s)", list.count).cyan().bold());
                println!();
                println!("{}", Table::new(message_rows(list.messages)));
            }
        }

        Commands::Status => {
            println!("{}", "Time Machine Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "admin.stats.v1", json!({})).await {
                Ok(result) => {
                    let stats: StatsResult = serde_json::from_value(result)?;
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Pending:".bold(), stats.queue_length);
                    println!("  {} {}", "Uptime:".bold(), format_uptime(stats.uptime_seconds));
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }
    }

    Ok(())
}
