//! Params / MethodCall - デコード済みのリクエスト
//!
//! transport 側がワイヤ形式から取り出したメソッド名と引数を保持します。
//! 引数は「位置引数」か「名前付き引数」のどちらか一方で、
//! 曖昧さは `Params` の variant で明示します。

use serde::ser::{Serialize, Serializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::errors::RpcError;

/// Params は呼び出し側が渡した引数
///
/// # JSON からの変換
/// `Params::from_value` は次のように判定します。
/// - 配列 → `Positional`
/// - キーがちょうど `"0"`..`"n-1"` のオブジェクト → 添字順の `Positional`
/// - それ以外のオブジェクト → `Named`
/// - `null` → 空の `Positional`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum Params {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Params {
    pub fn from_value(value: Value) -> Result<Self, RpcError> {
        match value {
            Value::Null => Ok(Params::Positional(Vec::new())),
            Value::Array(values) => Ok(Params::Positional(values)),
            Value::Object(map) => match sequential_values(&map) {
                Some(values) => Ok(Params::Positional(values)),
                None => Ok(Params::Named(map)),
            },
            other => Err(RpcError::InvalidParameterShape(json_type_name(&other).to_string())),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_named(&self) -> bool {
        matches!(self, Params::Named(_))
    }
}

impl Default for Params {
    fn default() -> Self {
        Params::Positional(Vec::new())
    }
}

impl From<Vec<Value>> for Params {
    fn from(values: Vec<Value>) -> Self {
        Params::Positional(values)
    }
}

impl From<Map<String, Value>> for Params {
    fn from(map: Map<String, Value>) -> Self {
        Params::Named(map)
    }
}

impl TryFrom<Value> for Params {
    type Error = RpcError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Params::from_value(value)
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Params::Positional(values) => values.serialize(serializer),
            Params::Named(map) => map.serialize(serializer),
        }
    }
}

/// キーが `0..n-1` の添字だけで構成されていれば、添字順の値を返す
///
/// `"01"` や `"+1"` のような表記は添字として扱いません。
fn sequential_values(map: &Map<String, Value>) -> Option<Vec<Value>> {
    let mut slots: Vec<Option<Value>> = vec![None; map.len()];
    for (key, value) in map {
        let index: usize = key.parse().ok()?;
        if index.to_string() != *key {
            return None;
        }
        *slots.get_mut(index)? = Some(value.clone());
    }
    slots.into_iter().collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// MethodCall はメソッド名 + 引数
///
/// 生成後は変更しません。
#[derive(Debug, Clone, PartialEq, serde::Serialize, Deserialize)]
pub struct MethodCall {
    method_name: String,
    #[serde(default)]
    parameters: Params,
}

impl MethodCall {
    pub fn new(method_name: impl Into<String>, parameters: impl Into<Params>) -> Self {
        Self {
            method_name: method_name.into(),
            parameters: parameters.into(),
        }
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn parameters(&self) -> &Params {
        &self.parameters
    }

    pub fn into_parts(self) -> (String, Params) {
        (self.method_name, self.parameters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_becomes_positional() {
        let params = Params::from_value(json!([1, "two", null])).unwrap();
        assert_eq!(params, Params::Positional(vec![json!(1), json!("two"), json!(null)]));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn index_keyed_object_becomes_positional_in_index_order() {
        let params = Params::from_value(json!({"1": "b", "0": "a", "2": "c"})).unwrap();
        assert_eq!(params, Params::Positional(vec![json!("a"), json!("b"), json!("c")]));
    }

    #[test]
    fn object_with_gap_in_indices_is_named() {
        let params = Params::from_value(json!({"0": "a", "2": "c"})).unwrap();
        assert!(params.is_named());
    }

    #[test]
    fn padded_index_key_is_named() {
        let params = Params::from_value(json!({"00": "a"})).unwrap();
        assert!(params.is_named());
    }

    #[test]
    fn null_is_empty_positional() {
        let params = Params::from_value(Value::Null).unwrap();
        assert_eq!(params, Params::default());
        assert!(params.is_empty());
    }

    #[test]
    fn scalar_is_rejected() {
        let err = Params::from_value(json!("oops")).unwrap_err();
        assert!(matches!(err, RpcError::InvalidParameterShape(ref t) if t == "string"));
    }

    #[test]
    fn method_call_deserializes_and_detects_shape() {
        let call: MethodCall = serde_json::from_value(json!({
            "method_name": "user.find",
            "parameters": {"user_id": 7}
        }))
        .unwrap();

        assert_eq!(call.method_name(), "user.find");
        assert!(call.parameters().is_named());
    }

    #[test]
    fn method_call_without_parameters_defaults_to_empty() {
        let call: MethodCall = serde_json::from_value(json!({"method_name": "ping"})).unwrap();
        assert!(call.parameters().is_empty());
    }
}
