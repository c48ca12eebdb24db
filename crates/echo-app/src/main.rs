//! echo-chat entry point.
//!
//! Two modes: `serve` runs the relay server that holds the upstream API
//! key, `repl` runs the interactive chat client against a relay.

mod repl;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use echo_core::coordinator::SessionCoordinator;
use echo_core::event_bus::EventBus;
use echo_platform::llm::{GeminiClient, RelayClient};
use echo_platform::storage::open_storage;
use echo_types::config::{RelayConfig, StorageBackendType, StorageConfig, UpstreamConfig};
use echo_types::Result;

#[derive(Parser)]
#[command(name = "echo-chat", version, about = "Streaming chat client and relay server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the relay server
    Serve {
        #[arg(long, default_value = "127.0.0.1:8787")]
        addr: SocketAddr,

        /// Upstream API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: String,

        #[arg(long, default_value = "gemini-1.5-flash")]
        model: String,

        /// Override the upstream API base URL
        #[arg(long)]
        api_base: Option<String>,
    },
    /// Chat interactively against a relay server
    Repl {
        /// Relay endpoint to send prompts to
        #[arg(long, default_value = "http://127.0.0.1:8787/api/chat")]
        endpoint: String,

        /// Directory for persisted chat history
        #[arg(long)]
        data_dir: Option<String>,

        /// Keep history in memory only
        #[arg(long)]
        ephemeral: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    match Cli::parse().command {
        Command::Serve {
            addr,
            api_key,
            model,
            api_base,
        } => {
            let generator = Arc::new(GeminiClient::new(UpstreamConfig {
                api_key,
                model,
                api_base,
            }));
            server::serve(addr, generator).await
        }
        Command::Repl {
            endpoint,
            data_dir,
            ephemeral,
        } => {
            let storage = open_storage(&StorageConfig {
                backend: if ephemeral {
                    StorageBackendType::Memory
                } else {
                    StorageBackendType::Auto
                },
                data_dir,
            })
            .await?;
            let generator = Arc::new(RelayClient::new(&RelayConfig { endpoint }));
            let coordinator = SessionCoordinator::start(storage, generator, EventBus::new()).await;
            repl::run(coordinator).await
        }
    }
}
