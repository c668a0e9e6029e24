//! デモ用の handler と Dispatcher のワイヤリング

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use seven_rpc_core::impls::TracingFaultLogger;
use seven_rpc_core::{
    Dispatcher, DispatcherBuilder, DispatcherConfig, FnHandler, HandlerError, Reply, RpcError,
    RpcHandler, ServiceHandler, Signature,
};

use crate::error::CliError;

/// 0 除算などの「値はそろっているが計算できない」エラー
const UNPROCESSABLE_STATUS: u16 = 422;

/// デモ用の handler を登録した Dispatcher を作る
///
/// - `echo`: 関数 handler
/// - `math.*`: ServiceHandler
/// - `system.*`: 初回呼び出しで生成される handler
pub fn build_dispatcher(config: DispatcherConfig) -> Result<Dispatcher, CliError> {
    let echo = FnHandler::new(Signature::new().optional("value"), |args| async move {
        Ok(args.into_iter().next().unwrap_or(Value::Null))
    });

    let dispatcher = DispatcherBuilder::new()
        .with_config(config)
        .handler("echo", Arc::new(echo))?
        .handler("math", Arc::new(math()))?
        .lazy_handler("system", || Ok(SystemHandler::default()))?
        .logger(Arc::new(TracingFaultLogger))
        .expect_methods(&["echo", "math.add", "math.divide", "system.ping"])
        .build()?;
    Ok(dispatcher)
}

fn math() -> ServiceHandler {
    let operands = || Signature::new().required("left").required("right");

    ServiceHandler::new()
        .method("add", operands(), |args| async move {
            let (left, right) = operands_of(&args)?;
            Ok(json!(left + right))
        })
        .method("subtract", operands(), |args| async move {
            let (left, right) = operands_of(&args)?;
            Ok(json!(left - right))
        })
        .method("divide", operands(), |args| async move {
            let (left, right) = operands_of(&args)?;
            if right == 0.0 {
                return Err(HandlerError::new("division by zero")
                    .with_code(1)
                    .with_status(UNPROCESSABLE_STATUS)
                    .into());
            }
            Ok(json!(left / right))
        })
}

fn operands_of(args: &[Value]) -> Result<(f64, f64), RpcError> {
    Ok((number(args, 0, "left")?, number(args, 1, "right")?))
}

fn number(args: &[Value], index: usize, name: &str) -> Result<f64, RpcError> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| HandlerError::new(format!("parameter '{name}' must be a number")).into())
}

/// 起動情報を返す handler
#[derive(Default)]
pub struct SystemHandler;

#[async_trait]
impl RpcHandler for SystemHandler {
    fn method_signature(&self, method: &str) -> Option<Signature> {
        match method {
            "ping" | "version" => Some(Signature::new()),
            _ => None,
        }
    }

    async fn call_method(&self, method: &str, _args: Vec<Value>) -> Result<Reply, RpcError> {
        match method {
            "ping" => Ok(json!("pong").into()),
            "version" => Ok(json!(env!("CARGO_PKG_VERSION")).into()),
            other => Err(RpcError::MethodNotExists(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seven_rpc_core::{ErrorKind, MethodCall, Params};

    #[tokio::test]
    async fn demo_methods_respond() {
        let dispatcher = build_dispatcher(DispatcherConfig::default()).unwrap();

        let response = dispatcher
            .handle(MethodCall::new("math.add", vec![json!(2), json!(3)]))
            .await;
        assert_eq!(response.value(), Some(&json!(5.0)));

        let response = dispatcher.handle(MethodCall::new("system.ping", Params::default())).await;
        assert_eq!(response.value(), Some(&json!("pong")));
    }

    #[tokio::test]
    async fn divide_by_zero_is_unprocessable() {
        let dispatcher = build_dispatcher(DispatcherConfig::default()).unwrap();
        let params = Params::from_value(json!({"left": 1, "right": 0})).unwrap();
        let response = dispatcher.handle(MethodCall::new("math.divide", params)).await;

        let fault = response.fault().unwrap();
        assert_eq!(fault.kind, ErrorKind::HandlerError);
        assert_eq!(fault.status, UNPROCESSABLE_STATUS);
    }

    #[tokio::test]
    async fn non_numeric_operand_is_reported() {
        let dispatcher = build_dispatcher(DispatcherConfig::default()).unwrap();
        let response = dispatcher
            .handle(MethodCall::new("math.subtract", vec![json!("x"), json!(1)]))
            .await;
        assert_eq!(
            response.fault().map(|f| f.message.as_str()),
            Some("parameter 'left' must be a number")
        );
    }
}
