//! seven-rpc-core
//!
//! Transport-agnostic RPC dispatch core.
//!
//! メソッド名と引数（位置引数 / 名前付き引数）を受け取り、登録済みの handler に
//! 解決し、引数を handler の Signature に合わせて呼び出し、結果を
//! `MethodResponse`（Return / Fault）に正規化します。
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（MethodCall, Params, Signature, MethodResponse, RpcError）
//! - **ports**: 抽象化レイヤー（RpcHandler, FaultLogger）
//! - **typed**: handler の組み立てと登録（FnHandler, ServiceHandler, HandlerRegistry）
//! - **app**: アプリケーションロジック（binder, Dispatcher, DispatcherBuilder, config）
//! - **impls**: 実装（TracingFaultLogger）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;

pub use app::{Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use domain::{
    ErrorKind, Fault, HandlerError, MethodCall, MethodResponse, Params, Reply, RpcError,
    Signature,
};
pub use ports::{FaultLogger, RpcHandler};
pub use typed::{FnHandler, RegistryError, ServiceHandler};
