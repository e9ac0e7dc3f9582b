use rusqlite::Connection;
use std::cell::RefCell;

use crate::errors::StoreError;

/// Embedded document-store schema (auctions + auction_images).
pub const SCHEMA: &str = include_str!("../../sql/schema.sql");

// Thread-local connection slot.
thread_local! {
    static DB_CONN: RefCell<Option<Connection>> = const { RefCell::new(None) };
}

/// Cheap-to-clone handle; the actual SQLite connection is opened lazily
/// per thread.
#[derive(Clone)]
pub struct Database {
    path: String,
}

impl Database {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Opens (or reuses) the per-thread connection and runs `f(conn)`.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Connection) -> Result<T, StoreError>,
    {
        let inner_result = DB_CONN
            .try_with(|cell| {
                let mut slot = cell.borrow_mut();
                if slot.is_none() {
                    let conn = Connection::open(&self.path)
                        .map_err(|e| StoreError::Db(format!("Open DB failed: {e}")))?;
                    *slot = Some(conn);
                }
                let conn = slot.as_mut().unwrap();
                f(conn)
            })
            .map_err(|_| StoreError::Internal)?;
        inner_result
    }
}

/// Applies the embedded schema (idempotent, everything is IF NOT EXISTS).
pub fn init_db(db: &Database) -> Result<(), StoreError> {
    db.with_conn(|conn| {
        conn.execute_batch(SCHEMA)
            .map_err(|e| StoreError::Db(format!("Failed to apply schema: {e}")))?;
        Ok(())
    })
}
