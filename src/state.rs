use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::store::{postgres::PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let pool = db::connect(&config.database).await?;
        db::init_schema(&pool).await?;

        Ok(Self::from_store(Arc::new(PgStore::new(pool))))
    }

    pub fn from_store(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[cfg(test)]
    pub fn fake() -> (Self, Arc<crate::store::memory::MemoryStore>) {
        let memory = Arc::new(crate::store::memory::MemoryStore::new());
        (Self::from_store(memory.clone()), memory)
    }
}
