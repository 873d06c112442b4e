use std::sync::Arc;

use leadmap_core::services::{ConnectFn, DataStore, DataStoreError};
use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};

use crate::config::LeadmapConfig;

/// Builds the shared data-store handle for the hosted SurrealDB instance.
///
/// The connector runs on first access: a missing endpoint or access key
/// surfaces as `DataStoreError::MissingSetting` there, not at startup.
pub fn build_data_store(config: &LeadmapConfig) -> DataStore<Client> {
    let config = config.clone();
    let connect: ConnectFn<Client> = Arc::new(move || {
        let config = config.clone();
        Box::pin(async move {
            let url = config
                .db_url
                .clone()
                .ok_or(DataStoreError::MissingSetting("LEADMAP_DB_URL"))?;
            let key = config
                .db_key
                .clone()
                .ok_or(DataStoreError::MissingSetting("LEADMAP_DB_KEY"))?;

            let db = Surreal::new::<Ws>(&url).await.map_err(map_connect_error)?;
            db.authenticate(key).await.map_err(map_connect_error)?;
            db.use_ns(&config.db_namespace)
                .use_db(&config.db_name)
                .await
                .map_err(map_connect_error)?;

            Ok(Arc::new(db))
        })
    });

    DataStore::new(connect)
}

fn map_connect_error(err: impl std::fmt::Display) -> DataStoreError {
    DataStoreError::ConnectFailed(err.to_string())
}
