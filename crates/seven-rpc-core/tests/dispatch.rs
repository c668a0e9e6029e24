//! End-to-end dispatch through the public API.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use seven_rpc_core::app::DispatcherBuilder;
use seven_rpc_core::domain::{BAD_REQUEST_STATUS, SUCCESS_STATUS};
use seven_rpc_core::impls::TracingFaultLogger;
use seven_rpc_core::{
    ErrorKind, FnHandler, HandlerError, MethodCall, MethodResponse, Params, Reply, RpcError,
    RpcHandler, ServiceHandler, Signature,
};

struct Accounts;

impl Accounts {
    fn connect(built: &AtomicUsize) -> Result<Self, HandlerError> {
        built.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(25));
        Ok(Accounts)
    }
}

#[async_trait]
impl RpcHandler for Accounts {
    fn method_signature(&self, method: &str) -> Option<Signature> {
        match method {
            "balance" => Some(Signature::new().required("accountId").optional("currency")),
            "close" => Some(Signature::new().required("accountId")),
            _ => None,
        }
    }

    async fn call_method(&self, method: &str, args: Vec<Value>) -> Result<Reply, RpcError> {
        match method {
            "balance" => {
                let currency = args.get(1).and_then(Value::as_str).unwrap_or("EUR");
                Ok(json!({"account": args[0], "amount": 100, "currency": currency}).into())
            }
            "close" => Err(HandlerError::new("account is frozen")
                .with_code(17)
                .with_data(json!({"account": args[0]}))
                .into()),
            other => Err(RpcError::MethodNotExists(other.to_string())),
        }
    }
}

fn build() -> seven_rpc_core::Dispatcher {
    build_counting(Arc::new(AtomicUsize::new(0)))
}

fn build_counting(built: Arc<AtomicUsize>) -> seven_rpc_core::Dispatcher {
    let echo = FnHandler::new(Signature::new().optional("value"), |args| async move {
        Ok(args.into_iter().next().unwrap_or(Value::Null))
    });
    let strings = ServiceHandler::new().method(
        "upper",
        Signature::new().required("text"),
        |args| async move { Ok(json!(args[0].as_str().unwrap_or_default().to_uppercase())) },
    );

    DispatcherBuilder::new()
        .handler("echo", Arc::new(echo))
        .unwrap()
        .handler("strings", Arc::new(strings))
        .unwrap()
        .lazy_handler("accounts", move || Accounts::connect(&built))
        .unwrap()
        .logger(Arc::new(TracingFaultLogger))
        .expect_methods(&["echo", "strings.upper", "accounts.balance"])
        .build()
        .unwrap()
}

fn call(method: &str, params: Value) -> MethodCall {
    MethodCall::new(method, Params::from_value(params).unwrap())
}

#[tokio::test]
async fn named_call_reaches_lazily_built_handler() {
    let dispatcher = build();
    let response = dispatcher
        .handle(call("accounts.balance", json!({"account_id": "A-1"})))
        .await;

    assert_eq!(response.status_hint(), SUCCESS_STATUS);
    assert_eq!(
        response.value(),
        Some(&json!({"account": "A-1", "amount": 100, "currency": "EUR"}))
    );
}

#[tokio::test]
async fn index_keyed_object_is_treated_as_positional() {
    let dispatcher = build();
    let response = dispatcher
        .handle(call("accounts.balance", json!({"1": "USD", "0": "B-2"})))
        .await;
    assert_eq!(response.value().unwrap()["currency"], "USD");
}

#[tokio::test]
async fn handler_error_data_reaches_fault() {
    let dispatcher = build();
    let response = dispatcher.handle(call("accounts.close", json!(["C-3"]))).await;

    let fault = response.fault().unwrap();
    assert_eq!(fault.kind, ErrorKind::HandlerError);
    assert_eq!(fault.code, 17);
    assert_eq!(fault.status, BAD_REQUEST_STATUS);
    assert_eq!(fault.data, Some(json!({"account": "C-3"})));
}

#[tokio::test]
async fn every_failure_becomes_a_fault() {
    let dispatcher = build();
    let cases = [
        ("nowhere", json!([]), ErrorKind::MethodNotExists),
        ("strings.lower", json!(["x"]), ErrorKind::MethodNotExists),
        ("strings.upper", json!([]), ErrorKind::InvalidParameters),
        ("strings.upper", json!({"txt": "x"}), ErrorKind::InvalidParameters),
        ("echo", json!([1, 2]), ErrorKind::InvalidParameters),
    ];

    for (method, params, kind) in cases {
        let response = dispatcher.handle(call(method, params)).await;
        let fault = response.fault().unwrap_or_else(|| panic!("{method} should fail"));
        assert_eq!(fault.kind, kind, "{method}");
    }
}

#[tokio::test]
async fn empty_call_on_optional_signature_succeeds() {
    let dispatcher = build();
    let response = dispatcher.handle(MethodCall::new("echo", Params::default())).await;
    assert_eq!(response, MethodResponse::returned(Value::Null));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_calls_build_lazy_handler_once() {
    let built = Arc::new(AtomicUsize::new(0));
    let dispatcher = Arc::new(build_counting(Arc::clone(&built)));
    assert_eq!(built.load(Ordering::SeqCst), 0);

    let mut joins = Vec::new();
    for i in 0..32 {
        let dispatcher = Arc::clone(&dispatcher);
        joins.push(tokio::spawn(async move {
            dispatcher
                .handle(call("accounts.balance", json!([format!("acc-{i}")])))
                .await
        }));
    }

    for join in joins {
        let response = join.await.unwrap();
        assert!(!response.is_fault());
    }
    assert_eq!(built.load(Ordering::SeqCst), 1);
}
