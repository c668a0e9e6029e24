//! Binder - 呼び出し側の引数を Signature の並びに合わせる
//!
//! # フロー
//! 1. 個数チェック（required 以上 total 以下）
//! 2. 位置引数ならそのまま返す
//! 3. 名前付き引数ならキーを lowerCamelCase に正規化し、
//!    Signature の順に並べ替える（欠けた省略可能引数は null）
//!
//! 正規化後に同じ名前になるキー（`user_id` と `userId` など）は
//! どちらを採るか決められないので DuplicateParameter にします。
//! 必須引数より前にある省略可能引数は、名前付きでも省略できません。

use std::collections::HashMap;

use serde_json::Value;

use crate::domain::{Params, RpcError, Signature};

/// `params` を `signature` の順の位置引数にする
pub fn bind(signature: &Signature, params: Params) -> Result<Vec<Value>, RpcError> {
    let given = params.len();
    let required = signature.required_count();
    let total = signature.total_count();
    if given < required || given > total {
        return Err(RpcError::InvalidParameterCount {
            given,
            required,
            total,
        });
    }

    let named = match params {
        Params::Positional(values) => return Ok(values),
        Params::Named(named) => named,
    };

    let mut by_name: HashMap<String, Value> = HashMap::with_capacity(named.len());
    for (key, value) in named {
        let key = normalize_key(&key);
        if by_name.contains_key(&key) {
            return Err(RpcError::DuplicateParameter(key));
        }
        by_name.insert(key, value);
    }

    signature
        .params()
        .iter()
        .enumerate()
        .map(|(index, param)| match by_name.remove(param.name()) {
            Some(value) => Ok(value),
            None if signature.is_omittable(index) => Ok(Value::Null),
            None => Err(RpcError::MissingParameter(param.name().to_string())),
        })
        .collect()
}

/// snake_case / kebab-case のキーを lowerCamelCase にする
///
/// `_` と `-` を単語の区切りとみなし、各単語の先頭を大文字にして連結し、
/// 最後に先頭の一文字を小文字にします。単語の途中の文字は変えません
/// （`userId` はそのまま、`USER_ID` は `uSERID`）。
pub fn normalize_key(key: &str) -> String {
    let mut joined = String::with_capacity(key.len());
    let mut word_start = true;
    for c in key.chars() {
        let c = if c == '_' || c == '-' { ' ' } else { c };
        if c != ' ' {
            joined.push(if word_start { c.to_ascii_uppercase() } else { c });
        }
        word_start = is_word_delimiter(c);
    }

    let mut chars = joined.chars();
    match chars.next() {
        Some(first) => {
            let mut normalized = String::with_capacity(joined.len());
            normalized.push(first.to_ascii_lowercase());
            normalized.push_str(chars.as_str());
            normalized
        }
        None => joined,
    }
}

fn is_word_delimiter(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C')
}
