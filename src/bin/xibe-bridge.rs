//! xibe-bridge
//!
//! Line-delimited JSON harness around the bridge: one `IpcRequest` per stdin
//! line in, one `IpcResponse` per stdout line out.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use xibe_bridge::config::{ConfigLoader, ExecutionMode};
use xibe_bridge::dispatch::{IpcRequest, IpcResponse};
use xibe_bridge::logging::{ensure_stdout_free, init_logging};
use xibe_bridge::Bridge;

#[derive(Parser)]
#[command(name = "xibe-bridge")]
#[command(about = "Backend bridge serving settings, budget and catalog operations over stdio")]
struct Cli {
    /// Configuration file layered over the global config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Constrained execution: paid-service operations short-circuit
    #[arg(long, default_value = "false")]
    constrained: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load(cli.config.as_deref()).context("loading configuration")?;
    if cli.constrained {
        config.mode = ExecutionMode::Constrained;
    }
    ensure_stdout_free(Some(&config.logging)).context("checking log destination")?;
    init_logging(Some(&config.logging)).context("initializing logging")?;

    let bridge = Arc::new(Bridge::from_config(&config).context("starting bridge")?);
    info!(
        operations = bridge.dispatcher().operations().len(),
        "Serving requests on stdio"
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<IpcResponse>();
    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(response) = rx.recv().await {
            let mut line = match serde_json::to_vec(&response) {
                Ok(line) => line,
                Err(e) => {
                    error!(error = %e, "Failed to encode response");
                    continue;
                }
            };
            line.push(b'\n');
            if stdout.write_all(&line).await.is_err() || stdout.flush().await.is_err() {
                break;
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let request = match IpcRequest::decode_line(&line) {
            Ok(request) => request,
            Err(rejected) => {
                warn!(
                    error = %rejected.reason,
                    replied = rejected.reply.is_some(),
                    "Rejected request line"
                );
                if let Some(reply) = rejected.reply {
                    let _ = tx.send(reply);
                }
                continue;
            }
        };
        let bridge = Arc::clone(&bridge);
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = bridge.dispatch(request).await;
            let _ = tx.send(response);
        });
    }

    // Writer drains once every in-flight request has dropped its sender.
    drop(tx);
    writer.await.context("response writer")?;
    Ok(())
}
