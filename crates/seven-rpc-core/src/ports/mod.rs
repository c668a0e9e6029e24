//! Ports - 抽象化レイヤー
//!
//! dispatch コアが外側に求めるインターフェースを定義します。
//! - **RpcHandler**: 名前で公開される handler
//! - **FaultLogger**: Fault 経路のエラー通知

pub mod fault_logger;
pub mod handler;

pub use self::fault_logger::FaultLogger;
pub use self::handler::{CallTarget, RpcHandler};
