//! Application state wiring the dispatcher to the SQLite repositories.
//!
//! The dispatcher is generic over the repository traits; AppState pins it to
//! the concrete infra implementations. Every repository shares one
//! `DatabasePool`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use prism_core::service::identity::IdentityService;
use prism_core::tool::dispatcher::ToolDispatcher;
use prism_infra::config::{database_path, load_config, resolve_data_dir};
use prism_infra::sqlite::emotion::SqliteEmotionRepository;
use prism_infra::sqlite::goal::SqliteGoalRepository;
use prism_infra::sqlite::identity::SqliteIdentityRepository;
use prism_infra::sqlite::memory::SqliteMemoryRepository;
use prism_infra::sqlite::pool::DatabasePool;
use prism_infra::sqlite::thought::SqliteThoughtRepository;
use prism_types::config::PrismConfig;

/// Dispatcher pinned to the SQLite repositories.
pub type ConcreteDispatcher = ToolDispatcher<
    SqliteMemoryRepository,
    SqliteIdentityRepository,
    SqliteEmotionRepository,
    SqliteGoalRepository,
    SqliteThoughtRepository,
>;

/// Shared application state used by both CLI commands and HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ConcreteDispatcher>,
    pub config: Arc<PrismConfig>,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Resolve the data directory, load config, open the database and wire
    /// the dispatcher.
    pub async fn init(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir(data_dir);

        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let config = load_config(&data_dir).await;
        let db_path = database_path(&data_dir, &config);
        let db_pool = DatabasePool::open(&db_path)
            .await
            .with_context(|| format!("failed to open database at {}", db_path.display()))?;

        tracing::info!(data_dir = %data_dir.display(), "PRISM state initialized");
        Ok(Self::from_parts(config, data_dir, db_pool))
    }

    /// Wire the dispatcher over an already open pool.
    pub fn from_parts(config: PrismConfig, data_dir: PathBuf, db_pool: DatabasePool) -> Self {
        let identity = IdentityService::new(
            SqliteIdentityRepository::new(db_pool.clone()),
            SqliteMemoryRepository::new(db_pool.clone()),
        );

        let dispatcher = ToolDispatcher::new(
            SqliteMemoryRepository::new(db_pool.clone()),
            identity,
            SqliteEmotionRepository::new(db_pool.clone()),
            SqliteGoalRepository::new(db_pool.clone()),
            SqliteThoughtRepository::new(db_pool.clone()),
        )
        .with_fallback_user(config.fallback_user());

        Self {
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
            data_dir,
            db_pool,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        database_path(&self.data_dir, &self.config)
    }
}
