//! Line-delimited JSON transport.
//!
//! Reads one request object per line, dispatches it, and writes one
//! response object per line:
//!
//! ```text
//! -> {"id": 1, "method": "math.add", "params": {"left": 1, "right": 2}}
//! <- {"id": 1, "status": 200, "result": 3.0}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use seven_rpc_core::domain::{BAD_REQUEST_STATUS, Fault};
use seven_rpc_core::{Dispatcher, MethodCall, MethodResponse, Params};

use crate::error::CliError;

/// A decoded request line.
#[derive(Debug, Deserialize)]
struct WireRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

/// One response line.
#[derive(Debug, Serialize)]
pub struct WireResponse {
    id: Value,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fault: Option<Fault>,
    /// Set only when the line itself could not be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl WireResponse {
    fn from_response(id: Value, response: MethodResponse) -> Self {
        let status = response.status_hint();
        match response {
            MethodResponse::Return { value } => Self {
                id,
                status,
                result: Some(value),
                fault: None,
                error: None,
            },
            MethodResponse::Fault(fault) => Self {
                id,
                status,
                result: None,
                fault: Some(fault),
                error: None,
            },
        }
    }

    fn parse_error(message: String) -> Self {
        Self {
            id: Value::Null,
            status: BAD_REQUEST_STATUS,
            result: None,
            fault: None,
            error: Some(message),
        }
    }
}

/// Serves a dispatcher over a pair of byte streams.
pub struct StdioServer<R, W> {
    reader: R,
    writer: W,
    dispatcher: Arc<Dispatcher>,
}

impl<R, W> StdioServer<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            reader,
            writer,
            dispatcher,
        }
    }

    /// Runs until the reader is closed.
    pub async fn run(&mut self) -> Result<(), CliError> {
        info!("seven-rpc serving on stdio");

        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line).await? == 0 {
                info!("input closed, shutting down");
                return Ok(());
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response = self.process(trimmed).await;
            let mut bytes = serde_json::to_vec(&response)?;
            bytes.push(b'\n');
            self.writer.write_all(&bytes).await?;
            self.writer.flush().await?;
        }
    }

    #[cfg(test)]
    pub fn into_writer(self) -> W {
        self.writer
    }

    async fn process(&self, line: &str) -> WireResponse {
        let request: WireRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "failed to parse request line");
                return WireResponse::parse_error(format!("parse error: {e}"));
            }
        };
        debug!(method = %request.method, id = %request.id, "received request");

        let response = match Params::from_value(request.params) {
            Ok(params) => {
                self.dispatcher
                    .handle(MethodCall::new(request.method, params))
                    .await
            }
            Err(e) => MethodResponse::Fault(Fault::from_error(
                &e,
                self.dispatcher.config().default_status,
            )),
        };
        WireResponse::from_response(request.id, response)
    }
}
