//! TracingFaultLogger - Fault を tracing のイベントとして出力する

use tracing::{error, warn};

use crate::domain::{ErrorKind, RpcError};
use crate::ports::FaultLogger;

/// TracingFaultLogger は FaultLogger の既定実装
///
/// 呼び出し側の誤り（MethodNotExists / InvalidParameters）は `warn`、
/// handler 側の失敗は `error` で出力します。
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFaultLogger;

impl FaultLogger for TracingFaultLogger {
    fn log(&self, err: &RpcError) {
        let kind = err.kind();
        match kind {
            ErrorKind::MethodNotExists | ErrorKind::InvalidParameters => {
                warn!(?kind, code = err.code(), "rpc fault: {err}");
            }
            ErrorKind::HandlerError => {
                error!(?kind, code = err.code(), status = ?err.status_hint(), "rpc fault: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HandlerError;

    #[test]
    fn logs_every_kind_without_a_subscriber() {
        let logger = TracingFaultLogger;
        logger.log(&RpcError::MethodNotExists("x".to_string()));
        logger.log(&RpcError::MissingParameter("y".to_string()));
        logger.log(&HandlerError::new("z").into());
    }
}
