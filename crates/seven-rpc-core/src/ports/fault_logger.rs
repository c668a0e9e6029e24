//! FaultLogger port - Fault になったエラーの通知先

use crate::domain::RpcError;

/// FaultLogger は Fault に変換される直前のエラーを受け取る
///
/// 1 回の dispatch につき高々 1 回呼ばれます。
pub trait FaultLogger: Send + Sync {
    fn log(&self, error: &RpcError);
}
