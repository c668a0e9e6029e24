//! Signature - 呼び出し対象の引数の形
//!
//! Rust には実行時リフレクションが無いので、handler は自分の引数を
//! `Signature` として宣言します（`RpcHandler::signature` など）。

use serde::Serialize;

/// 宣言された引数 1 つ分
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    name: String,
    optional: bool,
}

impl ParamSpec {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 既定値を持つ（省略可能な）引数か
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Signature は引数の並びと個数
///
/// 引数名は lowerCamelCase で宣言します。名前付き引数のキーは
/// この規約に正規化してから照合されます。
///
/// # 使用例
/// ```ignore
/// let sig = Signature::new()
///     .required("userId")
///     .optional("includeDeleted");
/// assert_eq!(sig.required_count(), 1);
/// assert_eq!(sig.total_count(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Signature {
    params: Vec<ParamSpec>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            optional: false,
        });
        self
    }

    pub fn optional(mut self, name: impl Into<String>) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            optional: true,
        });
        self
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// 位置引数で最低限渡す必要がある個数
    ///
    /// 最後の必須引数までの個数です。必須引数より前にある省略可能な引数は、
    /// 位置引数では飛ばせないので必須として数えます。
    pub fn required_count(&self) -> usize {
        self.params
            .iter()
            .rposition(|p| !p.optional)
            .map_or(0, |last| last + 1)
    }

    pub fn total_count(&self) -> usize {
        self.params.len()
    }

    /// `index` 番目の引数を省略できるか
    ///
    /// 省略可能と宣言されていても、後ろに必須引数があれば省略できません。
    pub fn is_omittable(&self, index: usize) -> bool {
        index >= self.required_count() && index < self.total_count()
    }
}
