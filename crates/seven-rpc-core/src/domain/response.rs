//! MethodResponse - 正規化された呼び出し結果
//!
//! 成功は `Return`、失敗は `Fault`。transport 側はこれをワイヤ形式に
//! 変換し、`status_hint()` を参考に最終的なステータスを決めます。

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{ErrorKind, RpcError, SUCCESS_STATUS};

/// Fault は失敗の正規化された表現
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fault {
    pub message: String,
    pub code: i64,
    pub kind: ErrorKind,

    /// transport 向けのステータスのヒント
    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Fault {
    pub fn new(message: impl Into<String>, code: i64, kind: ErrorKind, status: u16) -> Self {
        Self {
            message: message.into(),
            code,
            kind,
            status,
            data: None,
        }
    }

    /// エラーから Fault を作る
    ///
    /// エラー自身がステータスを持たなければ `default_status` を使います。
    pub fn from_error(error: &RpcError, default_status: u16) -> Self {
        Self {
            message: error.to_string(),
            code: error.code(),
            kind: error.kind(),
            status: error.status_hint().unwrap_or(default_status),
            data: error.data().cloned(),
        }
    }
}

/// MethodResponse は `Return` か `Fault`
///
/// serialize 時の形: `{"type":"return","value":...}` / `{"type":"fault",...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MethodResponse {
    Return { value: Value },
    Fault(Fault),
}

impl MethodResponse {
    pub fn returned(value: Value) -> Self {
        MethodResponse::Return { value }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, MethodResponse::Fault(_))
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            MethodResponse::Return { value } => Some(value),
            MethodResponse::Fault(_) => None,
        }
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            MethodResponse::Fault(fault) => Some(fault),
            MethodResponse::Return { .. } => None,
        }
    }

    pub fn status_hint(&self) -> u16 {
        match self {
            MethodResponse::Return { .. } => SUCCESS_STATUS,
            MethodResponse::Fault(fault) => fault.status,
        }
    }
}

impl From<Fault> for MethodResponse {
    fn from(fault: Fault) -> Self {
        MethodResponse::Fault(fault)
    }
}

/// Reply は handler の戻り値
///
/// handler は素の値を返しても、自分で組み立てた `MethodResponse` を
/// 返してもかまいません。素の値は `Return` に包まれ、
/// `MethodResponse` はそのまま呼び出し側に届きます。
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Value(Value),
    Response(MethodResponse),
}

impl Reply {
    pub fn into_response(self) -> MethodResponse {
        match self {
            Reply::Value(value) => MethodResponse::Return { value },
            Reply::Response(response) => response,
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::Value(value)
    }
}

impl From<MethodResponse> for Reply {
    fn from(response: MethodResponse) -> Self {
        Reply::Response(response)
    }
}

impl From<Fault> for Reply {
    fn from(fault: Fault) -> Self {
        Reply::Response(MethodResponse::Fault(fault))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{BAD_REQUEST_STATUS, HandlerError, NOT_FOUND_STATUS};
    use serde_json::json;

    #[test]
    fn plain_value_is_wrapped_in_return() {
        let response = Reply::from(json!(3)).into_response();
        assert_eq!(response, MethodResponse::returned(json!(3)));
        assert_eq!(response.status_hint(), SUCCESS_STATUS);
    }

    #[test]
    fn envelope_passes_through_unchanged() {
        let fault = Fault::new("nope", 7, ErrorKind::HandlerError, NOT_FOUND_STATUS);
        let response = Reply::from(fault.clone()).into_response();
        assert_eq!(response.fault(), Some(&fault));
    }

    #[test]
    fn fault_from_error_uses_default_status_when_error_has_none() {
        let err = RpcError::MethodNotExists("x".to_string());
        let fault = Fault::from_error(&err, BAD_REQUEST_STATUS);
        assert_eq!(fault.message, "Method 'x' is not defined");
        assert_eq!(fault.kind, ErrorKind::MethodNotExists);
        assert_eq!(fault.status, BAD_REQUEST_STATUS);
        assert_eq!(fault.code, 0);
    }

    #[test]
    fn fault_from_error_prefers_error_status_and_keeps_data() {
        let err: RpcError = HandlerError::new("gone")
            .with_status(NOT_FOUND_STATUS)
            .with_data(json!({"id": 1}))
            .into();
        let fault = Fault::from_error(&err, BAD_REQUEST_STATUS);
        assert_eq!(fault.status, NOT_FOUND_STATUS);
        assert_eq!(fault.data, Some(json!({"id": 1})));
    }

    #[test]
    fn response_is_tagged_by_type() {
        let v = serde_json::to_value(MethodResponse::returned(json!("ok"))).unwrap();
        assert_eq!(v, json!({"type": "return", "value": "ok"}));

        let fault = Fault::new("bad", 0, ErrorKind::InvalidParameters, BAD_REQUEST_STATUS);
        let v = serde_json::to_value(MethodResponse::from(fault)).unwrap();
        assert_eq!(v["type"], "fault");
        assert_eq!(v["kind"], "invalid_parameters");
        assert!(v.get("data").is_none());
    }
}
