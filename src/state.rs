use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::AppConfig;
use crate::db;
use crate::storage::{ImageStore, LocalImageStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub images: Arc<dyn ImageStore>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = db::connect(&config.database_url).await?;
        let images =
            Arc::new(LocalImageStore::new(&config.upload_dir).await?) as Arc<dyn ImageStore>;
        Ok(Self { db, config, images })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, images: Arc<dyn ImageStore>) -> Self {
        Self { db, config, images }
    }
}

#[cfg(test)]
impl AppState {
    /// State for unit tests that never touch the database or the disk:
    /// the pool connects lazily and the image store swallows everything.
    pub(crate) fn fake() -> Self {
        use async_trait::async_trait;
        use bytes::Bytes;

        struct NullImageStore;

        #[async_trait]
        impl ImageStore for NullImageStore {
            async fn save(&self, _filename: &str, _body: Bytes) -> anyhow::Result<()> {
                Ok(())
            }
            async fn remove(&self, _filename: &str) -> anyhow::Result<()> {
                Ok(())
            }
        }

        let db = sqlx::sqlite::SqlitePoolOptions::new()
            .connect_lazy("sqlite::memory:")
            .expect("lazy pool should construct");

        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            upload_dir: "uploads".into(),
            jwt: crate::config::JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 60,
            },
        });

        Self {
            db,
            config,
            images: Arc::new(NullImageStore),
        }
    }
}
