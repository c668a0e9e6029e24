//! Dispatcher - メソッド名を handler に解決して呼び出す
//!
//! # フロー
//! 1. 名前そのもので登録された handler が関数として呼べるならそれを使う
//! 2. だめなら最初の `.` で `handler.method` に分けてサブメソッドを探す
//! 3. どちらも無ければ MethodNotExists
//!
//! `handle()` はすべてのエラー（panic を含む）を Fault に変換するので、
//! transport 側は例外処理を持つ必要がありません。

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::debug;

use super::binder;
use super::config::DispatcherConfig;
use super::inspector;
use crate::domain::{
    Fault, HandlerError, MethodCall, MethodResponse, Params, Reply, RpcError, Signature,
};
use crate::ports::{CallTarget, FaultLogger, RpcHandler};
use crate::typed::{HandlerRegistry, RegistryError};

/// `handler.method` の区切り
pub const METHOD_SEPARATOR: char = '.';

/// Dispatcher は registry を持ち、MethodCall を MethodResponse にする
///
/// # 使用例
/// ```ignore
/// let mut dispatcher = Dispatcher::new();
/// dispatcher
///     .add_handler("echo", Arc::new(echo), false)?
///     .add_handler("math", Arc::new(math), false)?;
///
/// let response = dispatcher.handle(MethodCall::new("math.add", vec![json!(1), json!(2)])).await;
/// ```
///
/// # 並行性
/// 設定（`add_handler` など）は `&mut self`、`handle` / `call` は `&self`。
/// 設定後に `Arc<Dispatcher>` として共有する想定です。
pub struct Dispatcher {
    registry: HandlerRegistry,
    logger: Option<Arc<dyn FaultLogger>>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            registry: HandlerRegistry::new(),
            logger: None,
            config,
        }
    }

    pub(crate) fn from_parts(
        registry: HandlerRegistry,
        logger: Option<Arc<dyn FaultLogger>>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            registry,
            logger,
            config,
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn logger(&self) -> Option<&Arc<dyn FaultLogger>> {
        self.logger.as_ref()
    }

    pub fn set_logger(&mut self, logger: Arc<dyn FaultLogger>) {
        self.logger = Some(logger);
    }

    pub fn add_handler(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn RpcHandler>,
        overwrite: bool,
    ) -> Result<&mut Self, RegistryError> {
        self.registry.register_live(name, handler, overwrite)?;
        Ok(self)
    }

    /// 初回呼び出し時に `factory` で生成する handler を追加
    pub fn add_lazy_handler<F, H>(
        &mut self,
        name: impl Into<String>,
        factory: F,
        overwrite: bool,
    ) -> Result<&mut Self, RegistryError>
    where
        F: Fn() -> Result<H, HandlerError> + Send + Sync + 'static,
        H: RpcHandler + 'static,
    {
        self.registry.register_lazy(name, factory, overwrite)?;
        Ok(self)
    }

    /// 初回呼び出し時に `H::default()` で生成する handler を追加
    pub fn add_default_handler<H>(
        &mut self,
        name: impl Into<String>,
        overwrite: bool,
    ) -> Result<&mut Self, RegistryError>
    where
        H: RpcHandler + Default + 'static,
    {
        self.registry.register_default::<H>(name, overwrite)?;
        Ok(self)
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    pub fn remove_handler(&mut self, name: &str) -> &mut Self {
        self.registry.remove(name);
        self
    }

    /// メソッド名を呼び出し対象と Signature に解決
    pub async fn resolve(&self, method: &str) -> Result<(CallTarget, Signature), RpcError> {
        if let Some(handler) = self.registry.resolve(method).await? {
            let target = CallTarget::Function(handler);
            if let Some(signature) = inspector::describe(&target) {
                return Ok((target, signature));
            }
        }

        if let Some((handler_name, sub_method)) = method.split_once(METHOD_SEPARATOR) {
            if let Some(handler) = self.registry.resolve(handler_name).await? {
                let target = CallTarget::Method(handler, sub_method.to_string());
                if let Some(signature) = inspector::describe(&target) {
                    return Ok((target, signature));
                }
            }
        }

        Err(RpcError::MethodNotExists(method.to_string()))
    }

    /// 解決 → バインド → 呼び出し
    ///
    /// エラーはそのまま返します。Fault が欲しい場合は `handle` を使います。
    pub async fn call(&self, method: &str, params: Params) -> Result<Reply, RpcError> {
        let (target, signature) = self.resolve(method).await?;
        let args = binder::bind(&signature, params)?;
        debug!(method, ?target, args = args.len(), "invoking handler");
        target.invoke(args).await
    }

    /// MethodCall を処理して必ず MethodResponse を返す
    pub async fn handle(&self, call: MethodCall) -> MethodResponse {
        let (method, params) = call.into_parts();
        match self.guarded_call(&method, params).await {
            Ok(reply) => reply.into_response(),
            Err(error) => {
                debug!(method = %method, kind = ?error.kind(), "call failed: {error}");
                if self.config.log_faults {
                    if let Some(logger) = &self.logger {
                        logger.log(&error);
                    }
                }
                MethodResponse::Fault(Fault::from_error(&error, self.config.default_status))
            }
        }
    }

    /// `call` 全体（遅延生成・Signature の読み取り・呼び出し）の panic を捕まえる
    async fn guarded_call(&self, method: &str, params: Params) -> Result<Reply, RpcError> {
        if !self.config.catch_panics {
            return self.call(method, params).await;
        }
        match AssertUnwindSafe(self.call(method, params)).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(RpcError::Panicked(panic_message(payload.as_ref()))),
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
