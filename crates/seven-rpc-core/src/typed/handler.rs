//! FnHandler - async クロージャを関数 handler にする
//!
//! # 学習ポイント
//! - ジェネリックな struct (FnHandler<F, R, Fut>)
//! - Type erasure パターン (FnHandler → Arc<dyn RpcHandler>)
//! - PhantomData<fn() -> ..> で Send + Sync を保ったまま型引数を固定する

use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Reply, RpcError, Signature};
use crate::ports::RpcHandler;

/// FnHandler は Signature + async クロージャ
///
/// # 使用例
/// ```ignore
/// let echo = FnHandler::new(Signature::new().required("message"), |args| async move {
///     Ok(args[0].clone())
/// });
/// dispatcher.add_handler("echo", Arc::new(echo), false)?;
/// ```
///
/// クロージャは `Value` でも `MethodResponse` でも（`Into<Reply>` なら何でも）返せます。
pub struct FnHandler<F, R, Fut> {
    signature: Signature,
    func: F,
    _marker: PhantomData<fn() -> (R, Fut)>,
}

impl<F, R, Fut> FnHandler<F, R, Fut>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, RpcError>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
    pub fn new(signature: Signature, func: F) -> Self {
        Self {
            signature,
            func,
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<F, R, Fut> RpcHandler for FnHandler<F, R, Fut>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, RpcError>> + Send + 'static,
    R: Into<Reply> + Send + 'static,
{
    fn signature(&self) -> Option<Signature> {
        Some(self.signature.clone())
    }

    async fn call(&self, args: Vec<Value>) -> Result<Reply, RpcError> {
        (self.func)(args).await.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorKind, Fault, MethodResponse};
    use serde_json::json;

    #[tokio::test]
    async fn fn_handler_declares_signature_and_calls_closure() {
        let handler = FnHandler::new(Signature::new().required("a").required("b"), |args| async move {
            let a = args[0].as_i64().unwrap_or_default();
            let b = args[1].as_i64().unwrap_or_default();
            Ok(json!(a + b))
        });

        assert_eq!(handler.signature().map(|s| s.total_count()), Some(2));
        assert_eq!(handler.method_signature("anything"), None);

        let reply = handler.call(vec![json!(2), json!(3)]).await.unwrap();
        assert_eq!(reply, Reply::Value(json!(5)));
    }

    #[tokio::test]
    async fn fn_handler_may_return_its_own_envelope() {
        let handler = FnHandler::new(Signature::new(), |_args| async move {
            Ok(MethodResponse::from(Fault::new("custom", 9, ErrorKind::HandlerError, 409)))
        });

        let reply = handler.call(vec![]).await.unwrap();
        assert!(matches!(reply, Reply::Response(r) if r.is_fault()));
    }
}
