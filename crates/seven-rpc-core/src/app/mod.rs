//! App - アプリケーション層
//!
//! domain と ports を組み合わせて dispatch を実装します。
//!
//! # 主要コンポーネント
//! - **inspector**: 呼び出し対象の Signature を読む
//! - **binder**: 引数を Signature の並びに合わせる
//! - **Dispatcher**: 名前解決 → バインド → 呼び出し → 応答の正規化
//! - **DispatcherBuilder**: 構築とワイヤリング（起動時検証つき）
//! - **DispatcherConfig**: 設定

pub mod binder;
pub mod builder;
pub mod config;
pub mod dispatcher;
pub mod inspector;

// 主要な型を再エクスポート
pub use self::binder::{bind, normalize_key};
pub use self::builder::{BuildError, DispatcherBuilder};
pub use self::config::{ConfigError, DispatcherConfig};
pub use self::dispatcher::{Dispatcher, METHOD_SEPARATOR};
pub use self::inspector::describe;
