//! seven-rpc CLI - stdio 上で Dispatcher を動かすデモ用 transport
//!
//! 使い方:
//! ```text
//! echo '{"id":1,"method":"math.add","params":[1,2]}' | seven-rpc-cli [config.json]
//! ```
//!
//! 設定ファイルは第 1 引数か `SEVEN_RPC_CONFIG` で指定（無ければ既定値）。
//! ログは stderr に出力し、`RUST_LOG` で絞り込めます。

use std::process::ExitCode;
use std::sync::Arc;

use tracing::error;
use tracing_subscriber::EnvFilter;

use seven_rpc_core::DispatcherConfig;

mod error;
mod handlers;
mod transport;

use crate::error::CliError;
use crate::transport::StdioServer;

const CONFIG_ENV: &str = "SEVEN_RPC_CONFIG";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "seven-rpc exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CliError> {
    let config = load_config()?;
    let dispatcher = Arc::new(handlers::build_dispatcher(config)?);

    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let mut server = StdioServer::new(reader, tokio::io::stdout(), dispatcher);
    server.run().await
}

fn load_config() -> Result<DispatcherConfig, CliError> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(CONFIG_ENV).ok());

    match path {
        Some(path) => Ok(DispatcherConfig::load(path)?),
        None => Ok(DispatcherConfig::default()),
    }
}
