use std::{error::Error, fmt, sync::Arc};

use surrealdb::{Connection, Surreal};

use crate::store::{StoreError, SurrealLeadStore};

pub mod leads;

pub use leads::{RecordEnrichmentRequest, SaveLeadRequest};

#[derive(Debug)]
pub enum ControlError {
    Store(StoreError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ControlError {}

impl From<StoreError> for ControlError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

pub struct LeadControlPlane<C: Connection> {
    store: SurrealLeadStore<C>,
}

impl<C: Connection> Clone for LeadControlPlane<C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<C: Connection> LeadControlPlane<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self {
            store: SurrealLeadStore::new(db),
        }
    }

    pub fn from_arc(db: Arc<Surreal<C>>) -> Self {
        Self {
            store: SurrealLeadStore::from_arc(db),
        }
    }

    pub const fn with_store(store: SurrealLeadStore<C>) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &SurrealLeadStore<C> {
        &self.store
    }
}
