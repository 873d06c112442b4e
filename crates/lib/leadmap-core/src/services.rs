use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use surrealdb::{Connection, Surreal};
use tokio::sync::OnceCell;

use crate::control::LeadControlPlane;
use crate::store::SurrealLeadStore;

pub type ConnectFuture<C> =
    Pin<Box<dyn Future<Output = Result<Arc<Surreal<C>>, DataStoreError>> + Send + 'static>>;
pub type ConnectFn<C> = Arc<dyn Fn() -> ConnectFuture<C> + Send + Sync + 'static>;

#[derive(Debug)]
pub enum DataStoreError {
    MissingSetting(&'static str),
    ConnectFailed(String),
}

impl fmt::Display for DataStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSetting(name) => write!(f, "missing required setting: {name}"),
            Self::ConnectFailed(message) => {
                write!(f, "failed to connect to data store: {message}")
            }
        }
    }
}

impl Error for DataStoreError {}

/// Shared handle to the hosted data store.
///
/// The connection is established lazily by the first caller and reused for
/// the life of the process; concurrent first callers share a single
/// connection attempt. Configuration problems (missing endpoint or access
/// key) therefore surface on first access, not at startup.
pub struct DataStore<C: Connection> {
    cell: OnceCell<SurrealLeadStore<C>>,
    connect: ConnectFn<C>,
}

impl<C: Connection> DataStore<C> {
    #[must_use]
    pub fn new(connect: ConnectFn<C>) -> Self {
        Self {
            cell: OnceCell::new(),
            connect,
        }
    }

    /// Returns the shared lead store, connecting on first use.
    ///
    /// # Errors
    /// Returns `DataStoreError` if required settings are absent or the
    /// connection cannot be established.
    pub async fn store(&self) -> Result<&SurrealLeadStore<C>, DataStoreError> {
        let connect = self.connect.clone();
        self.cell
            .get_or_try_init(|| async move {
                let db = (connect)().await?;
                Ok(SurrealLeadStore::from_arc(db))
            })
            .await
    }

    /// Returns a control plane over the shared store, connecting on first use.
    ///
    /// # Errors
    /// Returns `DataStoreError` if required settings are absent or the
    /// connection cannot be established.
    pub async fn control(&self) -> Result<LeadControlPlane<C>, DataStoreError> {
        let store = self.store().await?;
        Ok(LeadControlPlane::with_store(store.clone()))
    }
}
