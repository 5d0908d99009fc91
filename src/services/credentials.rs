use std::sync::{Arc, Mutex, PoisonError, RwLock};

use rusqlite::Connection;

use crate::db::{self, queries};
use crate::errors::ApiError;

pub const TOKEN_KEY: &str = "token";

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, ApiError>;
    fn save(&self, token: &str) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

pub struct SqliteCredentialStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteCredentialStore {
    pub fn open(path: &str) -> anyhow::Result<Self> {
        let conn = db::init_db(path)?;
        Ok(Self::new(Arc::new(Mutex::new(conn))))
    }

    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

impl CredentialStore for SqliteCredentialStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(queries::get_value(&db, TOKEN_KEY)?)
    }

    fn save(&self, token: &str) -> Result<(), ApiError> {
        let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(queries::set_value(&db, TOKEN_KEY, token)?)
    }

    fn clear(&self) -> Result<(), ApiError> {
        let db = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        queries::delete_value(&db, TOKEN_KEY)?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>, ApiError> {
        Ok(self
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), ApiError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AuthContext {
    store: Arc<dyn CredentialStore>,
}

impl AuthContext {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::default()))
    }

    // An unreadable store counts as no credential.
    pub fn bearer_token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!(error = %e, "credential store unreadable, sending unauthenticated");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token().is_some()
    }

    pub(crate) fn store_token(&self, token: &str) -> Result<(), ApiError> {
        self.store.save(token)
    }

    pub(crate) fn clear(&self) -> Result<(), ApiError> {
        self.store.clear()
    }
}
