//! HandlerRegistry - handler の登録と解決
//!
//! # 学習ポイント
//! - HashMap での型消去された trait object の管理
//! - 生成済み（Live）と遅延生成（Deferred）を enum で区別する
//! - tokio::sync::OnceCell による「最初の一回だけ」生成
//!
//! # 並行性
//! 登録・削除は `&mut self`（起動時の設定フェーズ）で行い、
//! 解決は `&self` で多数のリクエストから同時に呼ばれます。
//! Deferred の生成は OnceCell が直列化するので、同時に初回解決が
//! 来てもインスタンスは一つしか作られません。

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::{HandlerError, RpcError};
use crate::ports::RpcHandler;

/// 引数なしで handler を作るファクトリ
pub type HandlerFactory =
    Arc<dyn Fn() -> Result<Arc<dyn RpcHandler>, HandlerError> + Send + Sync>;

/// HandlerEntry はレジストリの一項目
pub enum HandlerEntry {
    /// 生成済みのインスタンス
    Live(Arc<dyn RpcHandler>),

    /// 初回解決時に生成し、以後は `instance` を使う
    Deferred {
        factory: HandlerFactory,
        instance: OnceCell<Arc<dyn RpcHandler>>,
    },
}

impl HandlerEntry {
    pub fn live(handler: Arc<dyn RpcHandler>) -> Self {
        HandlerEntry::Live(handler)
    }

    pub fn deferred(factory: HandlerFactory) -> Self {
        HandlerEntry::Deferred {
            factory,
            instance: OnceCell::new(),
        }
    }

    /// インスタンスが既に存在するか
    pub fn is_resolved(&self) -> bool {
        match self {
            HandlerEntry::Live(_) => true,
            HandlerEntry::Deferred { instance, .. } => instance.initialized(),
        }
    }
}

/// RegistryError は HandlerRegistry の操作エラー
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("The '{0}' handler already exists")]
    DuplicateHandler(String),
}

/// HandlerRegistry は名前 → handler の表
///
/// # 使用例
/// ```ignore
/// let mut registry = HandlerRegistry::new();
/// registry.register_live("echo", Arc::new(echo), false)?;
/// registry.register_default::<SystemHandler>("system", false)?;
///
/// let handler = registry.resolve("system").await?;
/// ```
#[derive(Default)]
pub struct HandlerRegistry {
    entries: HashMap<String, HandlerEntry>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// 登録（`overwrite` が false なら同名は DuplicateHandler）
    pub fn register(
        &mut self,
        name: impl Into<String>,
        entry: HandlerEntry,
        overwrite: bool,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if !overwrite && self.entries.contains_key(&name) {
            return Err(RegistryError::DuplicateHandler(name));
        }
        debug!(handler = %name, overwrite, "registering handler");
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn register_live(
        &mut self,
        name: impl Into<String>,
        handler: Arc<dyn RpcHandler>,
        overwrite: bool,
    ) -> Result<(), RegistryError> {
        self.register(name, HandlerEntry::live(handler), overwrite)
    }

    /// 初回解決時に `factory` で生成する handler を登録
    pub fn register_lazy<F, H>(
        &mut self,
        name: impl Into<String>,
        factory: F,
        overwrite: bool,
    ) -> Result<(), RegistryError>
    where
        F: Fn() -> Result<H, HandlerError> + Send + Sync + 'static,
        H: RpcHandler + 'static,
    {
        let factory: HandlerFactory =
            Arc::new(move || factory().map(|h| Arc::new(h) as Arc<dyn RpcHandler>));
        self.register(name, HandlerEntry::deferred(factory), overwrite)
    }

    /// `H::default()` で遅延生成する handler を登録
    pub fn register_default<H>(
        &mut self,
        name: impl Into<String>,
        overwrite: bool,
    ) -> Result<(), RegistryError>
    where
        H: RpcHandler + Default + 'static,
    {
        self.register_lazy(name, || Ok(H::default()), overwrite)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&HandlerEntry> {
        self.entries.get(name)
    }

    /// 名前を handler に解決
    ///
    /// - 未登録なら `Ok(None)`
    /// - Deferred なら初回だけ生成してエントリに保持する
    /// - 生成に失敗したら `RpcError::Instantiation`（エントリは未生成のまま）
    pub async fn resolve(&self, name: &str) -> Result<Option<Arc<dyn RpcHandler>>, RpcError> {
        let Some(entry) = self.entries.get(name) else {
            return Ok(None);
        };

        let handler = match entry {
            HandlerEntry::Live(handler) => Arc::clone(handler),
            HandlerEntry::Deferred { factory, instance } => {
                let handler = instance
                    .get_or_try_init(|| async {
                        debug!(handler = %name, "instantiating deferred handler");
                        factory().map_err(|source| RpcError::Instantiation {
                            name: name.to_string(),
                            source,
                        })
                    })
                    .await?;
                Arc::clone(handler)
            }
        };
        Ok(Some(handler))
    }

    pub fn remove(&mut self, name: &str) -> Option<HandlerEntry> {
        self.entries.remove(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
