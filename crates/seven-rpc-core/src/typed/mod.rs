//! Typed - handler を作る・登録するための API
//!
//! # 二層構造
//! - **表層**: `FnHandler`, `ServiceHandler` - クロージャ + Signature で handler を組み立てる
//! - **内部**: `Arc<dyn RpcHandler>` - object-safe, type erasure
//!
//! `HandlerRegistry` は内部表現だけを扱います。

pub mod handler;
pub mod registry;
pub mod service;

pub use self::handler::FnHandler;
pub use self::registry::{HandlerEntry, HandlerFactory, HandlerRegistry, RegistryError};
pub use self::service::ServiceHandler;
