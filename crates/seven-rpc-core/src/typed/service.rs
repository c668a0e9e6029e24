//! ServiceHandler - 複数のメソッドを持つ handler
//!
//! 一つの名前で登録し、`service.method` の形で各メソッドを呼び出せます。

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::handler::FnHandler;
use crate::domain::{Reply, RpcError, Signature};
use crate::ports::RpcHandler;

/// ServiceHandler はメソッド名 → 関数 handler の表
///
/// # 使用例
/// ```ignore
/// let math = ServiceHandler::new()
///     .method("add", Signature::new().required("a").required("b"), add)
///     .method("negate", Signature::new().required("value"), negate);
///
/// dispatcher.add_handler("math", Arc::new(math), false)?;
/// // "math.add" / "math.negate" で呼べる
/// ```
#[derive(Default)]
pub struct ServiceHandler {
    methods: HashMap<String, Arc<dyn RpcHandler>>,
}

impl ServiceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// メソッドを追加（同名は後勝ち）
    pub fn method<F, R, Fut>(mut self, name: impl Into<String>, signature: Signature, func: F) -> Self
    where
        F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, RpcError>> + Send + 'static,
        R: Into<Reply> + Send + 'static,
    {
        self.methods
            .insert(name.into(), Arc::new(FnHandler::new(signature, func)));
        self
    }
}

#[async_trait]
impl RpcHandler for ServiceHandler {
    fn method_signature(&self, method: &str) -> Option<Signature> {
        self.methods.get(method)?.signature()
    }

    async fn call_method(&self, method: &str, args: Vec<Value>) -> Result<Reply, RpcError> {
        match self.methods.get(method) {
            Some(handler) => handler.call(args).await,
            None => Err(RpcError::MethodNotExists(method.to_string())),
        }
    }
}
