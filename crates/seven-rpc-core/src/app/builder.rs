//! DispatcherBuilder - Dispatcher の構築とワイヤリング
//!
//! # 学習ポイント
//! - 所有権を渡していく Builder（`self` を消費して返す）
//! - 公開メソッド名の起動時チェック
//! - 登録エラーと構築エラーを別の型に分ける

use std::sync::Arc;

use super::config::DispatcherConfig;
use super::dispatcher::{Dispatcher, METHOD_SEPARATOR};
use crate::domain::HandlerError;
use crate::ports::{FaultLogger, RpcHandler};
use crate::typed::{HandlerRegistry, RegistryError};

/// DispatcherBuilder は Dispatcher を構築
///
/// # 使用例
/// ```ignore
/// let dispatcher = DispatcherBuilder::new()
///     .handler("math", Arc::new(math))?
///     .lazy_handler("reports", || Ok(ReportHandler::connect()?))?
///     .logger(Arc::new(TracingFaultLogger))
///     .expect_methods(&["math.add", "reports.daily"])
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - expect_methods() で公開されるべきメソッド名を登録
/// - build() 時に、各メソッド名がそのまま、または `handler.` 部分で
///   登録済みの handler 名に当たるかをチェック
/// - 不足があれば BuildError を返す
///
/// サブメソッドの有無までは見ません（Deferred の handler を生成しないため）。
pub struct DispatcherBuilder {
    registry: HandlerRegistry,
    logger: Option<Arc<dyn FaultLogger>>,
    config: DispatcherConfig,
    expected_methods: Option<Vec<String>>,
}

/// BuildError は Dispatcher 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing methods: {0:?}. These methods were expected but no handler is registered for them.")]
    MissingMethods(Vec<String>),
}

impl DispatcherBuilder {
    /// 新しい DispatcherBuilder を作成
    pub fn new() -> Self {
        Self {
            registry: HandlerRegistry::new(),
            logger: None,
            config: DispatcherConfig::default(),
            expected_methods: None,
        }
    }

    pub fn with_config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// 生成済みの handler を登録（同名は DuplicateHandler）
    pub fn handler(
        mut self,
        name: impl Into<String>,
        handler: Arc<dyn RpcHandler>,
    ) -> Result<Self, RegistryError> {
        self.registry.register_live(name, handler, false)?;
        Ok(self)
    }

    /// 遅延生成の handler を登録（同名は DuplicateHandler）
    pub fn lazy_handler<F, H>(mut self, name: impl Into<String>, factory: F) -> Result<Self, RegistryError>
    where
        F: Fn() -> Result<H, HandlerError> + Send + Sync + 'static,
        H: RpcHandler + 'static,
    {
        self.registry.register_lazy(name, factory, false)?;
        Ok(self)
    }

    pub fn logger(mut self, logger: Arc<dyn FaultLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// 公開されるべきメソッド名のリストを設定
    pub fn expect_methods(mut self, methods: &[&str]) -> Self {
        self.expected_methods = Some(methods.iter().map(|m| m.to_string()).collect());
        self
    }

    /// DispatcherBuilder を構築して Dispatcher を生成
    ///
    /// # 検証
    /// - expect_methods() で設定されたメソッド名に対応する handler 名が登録されているかチェック
    /// - 不足があれば BuildError::MissingMethods を返す
    pub fn build(self) -> Result<Dispatcher, BuildError> {
        if let Some(expected) = &self.expected_methods {
            let missing: Vec<String> = expected
                .iter()
                .filter(|method| !self.covers(method))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingMethods(missing));
            }
        }
        Ok(Dispatcher::from_parts(self.registry, self.logger, self.config))
    }

    fn covers(&self, method: &str) -> bool {
        if self.registry.has(method) {
            return true;
        }
        method
            .split_once(METHOD_SEPARATOR)
            .is_some_and(|(handler_name, _)| self.registry.has(handler_name))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
