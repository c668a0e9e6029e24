//! RpcHandler port - 登録される handler の抽象
//!
//! # 二つの呼ばれ方
//! - **関数として**: `"echo"` のように名前だけで呼ばれる（`signature` / `call`）
//! - **メソッドとして**: `"math.add"` のように `handler.method` で呼ばれる
//!   （`method_signature` / `call_method`）
//!
//! どちらも Signature を返さなければ「呼び出せない」とみなされます。

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{HandlerError, Reply, RpcError, Signature};

/// RpcHandler は名前で公開される handler
///
/// 引数は Signature の順に並んだ位置引数として渡されます。
/// 名前付き引数の並べ替えや個数チェックは dispatcher 側で済んでいます。
///
/// # 使用例
/// ```ignore
/// struct Calculator;
///
/// #[async_trait]
/// impl RpcHandler for Calculator {
///     fn method_signature(&self, method: &str) -> Option<Signature> {
///         match method {
///             "add" => Some(Signature::new().required("a").required("b")),
///             _ => None,
///         }
///     }
///
///     async fn call_method(&self, method: &str, args: Vec<Value>) -> Result<Reply, RpcError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait RpcHandler: Send + Sync {
    /// handler 自身を関数として呼べる場合の Signature
    fn signature(&self) -> Option<Signature> {
        None
    }

    /// `method` を公開している場合の Signature
    fn method_signature(&self, _method: &str) -> Option<Signature> {
        None
    }

    async fn call(&self, _args: Vec<Value>) -> Result<Reply, RpcError> {
        Err(HandlerError::new("handler is not callable as a function").into())
    }

    async fn call_method(&self, method: &str, _args: Vec<Value>) -> Result<Reply, RpcError> {
        Err(RpcError::MethodNotExists(method.to_string()))
    }
}

/// CallTarget は解決済みの呼び出し対象
#[derive(Clone)]
pub enum CallTarget {
    /// handler 自身
    Function(Arc<dyn RpcHandler>),

    /// handler + サブメソッド名
    Method(Arc<dyn RpcHandler>, String),
}

impl CallTarget {
    pub async fn invoke(&self, args: Vec<Value>) -> Result<Reply, RpcError> {
        match self {
            CallTarget::Function(handler) => handler.call(args).await,
            CallTarget::Method(handler, method) => handler.call_method(method, args).await,
        }
    }
}

impl std::fmt::Debug for CallTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallTarget::Function(_) => f.write_str("Function"),
            CallTarget::Method(_, method) => f.debug_tuple("Method").field(method).finish(),
        }
    }
}
