use std::sync::Arc;
use tokio::sync::RwLock;

use crate::clients::catalog::CatalogClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{StreamResolver, StreamSource};

/// Everything built once at startup and shared by the CLI commands and
/// the HTTP router.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub catalog: Arc<CatalogClient>,

    pub resolver: Arc<StreamResolver>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let catalog = Arc::new(CatalogClient::new(&config.upstream)?);
        let source: Arc<dyn StreamSource> = catalog.clone();
        let resolver = Arc::new(StreamResolver::new(
            source,
            store.clone(),
            &config.upstream,
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            catalog,
            resolver,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
