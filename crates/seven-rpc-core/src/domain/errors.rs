//! Errors - エラー型と分類
//!
//! dispatch 経路（解決 → バインド → 呼び出し）で発生するエラーと、
//! Fault 上での分類（ErrorKind）を定義します。
//!
//! # 分類
//! - MethodNotExists: メソッド名がどの handler にも解決できない
//! - InvalidParameters: 引数の個数が範囲外、または必須の名前付き引数が欠けている
//! - HandlerError: handler 自身のエラー、handler の生成失敗、panic

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 成功時に transport へ渡すステータスのヒント
pub const SUCCESS_STATUS: u16 = 200;

/// エラー自身がステータスを持たない場合の既定値
pub const BAD_REQUEST_STATUS: u16 = 400;

pub const NOT_FOUND_STATUS: u16 = 404;

pub const ERROR_STATUS: u16 = 500;

/// ErrorKind は Fault の分類
///
/// serialize 時は snake_case（`method_not_exists` など）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MethodNotExists,
    InvalidParameters,
    HandlerError,
}

/// HandlerError は handler が自分で組み立てて返すエラー
///
/// dispatcher は中身を解釈せず、そのまま Fault に写します。
/// `status` を設定すると transport 向けのステータスのヒントを上書きできます。
///
/// # 使用例
/// ```ignore
/// return Err(HandlerError::new("division by zero")
///     .with_code(-1)
///     .with_status(422)
///     .into());
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    code: i64,
    status: Option<u16>,
    data: Option<serde_json::Value>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 0,
            status: None,
            data: None,
        }
    }

    pub fn with_code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// エラーの追加情報（Fault の `data` にそのまま載る）
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }
}

/// RpcError は dispatch 経路のエラー
///
/// `Dispatcher::handle` がすべて捕まえて Fault に変換するので、
/// transport 側で扱う必要はありません。
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Method '{0}' is not defined")]
    MethodNotExists(String),

    #[error(
        "Invalid number of parameters. {given} given but {required} are required of {total} total."
    )]
    InvalidParameterCount {
        given: usize,
        required: usize,
        total: usize,
    },

    #[error("Parameter '{0}' is missing.")]
    MissingParameter(String),

    /// 正規化すると同じ名前になるキーが複数ある
    #[error("Parameter '{0}' is given more than once.")]
    DuplicateParameter(String),

    #[error("Parameters must be an array or an object, got {0}")]
    InvalidParameterShape(String),

    #[error("failed to instantiate handler '{name}': {source}")]
    Instantiation {
        name: String,
        #[source]
        source: HandlerError,
    },

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl RpcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RpcError::MethodNotExists(_) => ErrorKind::MethodNotExists,
            RpcError::InvalidParameterCount { .. }
            | RpcError::MissingParameter(_)
            | RpcError::DuplicateParameter(_)
            | RpcError::InvalidParameterShape(_) => ErrorKind::InvalidParameters,
            RpcError::Instantiation { .. } | RpcError::Panicked(_) | RpcError::Handler(_) => {
                ErrorKind::HandlerError
            }
        }
    }

    /// 分類済みのエラーは 0、handler のエラーは handler が決めたコード
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Handler(e) | RpcError::Instantiation { source: e, .. } => e.code(),
            _ => 0,
        }
    }

    /// エラー自身が持つステータスのヒント（無ければ None）
    pub fn status_hint(&self) -> Option<u16> {
        match self {
            RpcError::Handler(e) | RpcError::Instantiation { source: e, .. } => e.status(),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            RpcError::Handler(e) | RpcError::Instantiation { source: e, .. } => e.data(),
            _ => None,
        }
    }
}
