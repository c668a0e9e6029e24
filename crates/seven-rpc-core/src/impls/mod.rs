//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **TracingFaultLogger**: `tracing` に Fault を流す FaultLogger

pub mod tracing_logger;

pub use self::tracing_logger::TracingFaultLogger;
