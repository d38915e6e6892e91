//! Website store for SiteBook.
//!
//! Implements `WebsiteStoreTrait`: create, list, favorite filtering, favorite
//! toggling and bulk clearing of saved websites, backed by SQLite via `rusqlite`.
//!
//! All access goes through one connection guarded by a mutex, and every write
//! runs in its own transaction, so writes never interleave and readers only
//! observe committed state. The store also keeps a snapshot of the last
//! successful full listing; the favorites view is derived from it.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockWriteGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, error, info, instrument, warn};

use crate::database::Database;
use crate::types::errors::WebsiteError;
use crate::types::website::{ListFilter, Website, WebsiteId};

const SELECT_COLUMNS: &str = "SELECT id, title, link, is_favorite, created_at FROM websites";

/// Trait defining saved-website operations.
pub trait WebsiteStoreTrait {
    /// Saves a new, non-favorite website and returns it.
    fn add_website(&self, title: &str, link: &str) -> Result<Website, WebsiteError>;
    /// Reads every website from the store, newest first, and refreshes the snapshot.
    fn list_all(&self) -> Result<Vec<Website>, WebsiteError>;
    /// Favorites from the last loaded snapshot, in snapshot order.
    fn list_favorites(&self) -> Vec<Website>;
    fn list(&self, filter: ListFilter) -> Result<Vec<Website>, WebsiteError>;
    fn get_website(&self, id: WebsiteId) -> Result<Website, WebsiteError>;
    fn set_favorite(&self, id: WebsiteId, is_favorite: bool) -> Result<(), WebsiteError>;
    /// Flips the favorite flag and returns its new value.
    fn toggle_favorite(&self, id: WebsiteId) -> Result<bool, WebsiteError>;
    /// Removes every website in a single transaction.
    fn delete_all(&self) -> Result<(), WebsiteError>;
}

/// Website store owning the database connection.
pub struct WebsiteStore {
    db: Mutex<Database>,
    snapshot: RwLock<Vec<Website>>,
}

impl WebsiteStore {
    /// Creates a store over an already migrated database. The snapshot starts
    /// empty until the first `list_all`.
    pub fn new(db: Database) -> Self {
        Self {
            db: Mutex::new(db),
            snapshot: RwLock::new(Vec::new()),
        }
    }

    /// Gives the database back, e.g. to close it at shutdown.
    pub fn into_database(self) -> Database {
        self.db.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    /// A panicking lock holder drops its open transaction, which rolls back,
    /// so a poisoned connection is still consistent.
    fn lock_db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot_mut(&self) -> RwLockWriteGuard<'_, Vec<Website>> {
        self.snapshot.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current UNIX timestamp in seconds.
    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads a single `Website` row into a struct.
    fn row_to_website(row: &rusqlite::Row) -> rusqlite::Result<Website> {
        let raw_id: String = row.get(0)?;
        let id = raw_id
            .parse::<WebsiteId>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
        Ok(Website {
            id,
            title: row.get(1)?,
            link: row.get(2)?,
            is_favorite: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn load_all(conn: &Connection) -> rusqlite::Result<Vec<Website>> {
        let mut stmt = conn.prepare_cached(&format!("{} ORDER BY position DESC", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], Self::row_to_website)?;
        rows.collect()
    }

    fn insert(conn: &mut Connection, website: &Website) -> rusqlite::Result<()> {
        let tx = conn.transaction()?;
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM websites",
            [],
            |row| row.get(0),
        )?;
        tx.execute(
            "INSERT INTO websites (id, title, link, is_favorite, position, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                website.id.to_string(),
                website.title,
                website.link,
                website.is_favorite,
                position,
                website.created_at
            ],
        )?;
        tx.commit()
    }

    /// Writes the flag and commits. `None` means the id did not resolve and
    /// nothing was changed.
    fn write_favorite(
        conn: &mut Connection,
        id: WebsiteId,
        flag: impl FnOnce(bool) -> bool,
    ) -> rusqlite::Result<Option<bool>> {
        let tx = conn.transaction()?;
        let current: Option<bool> = tx
            .query_row(
                "SELECT is_favorite FROM websites WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(current) = current else {
            return Ok(None);
        };
        let next = flag(current);
        tx.execute(
            "UPDATE websites SET is_favorite = ?1 WHERE id = ?2",
            params![next, id.to_string()],
        )?;
        tx.commit()?;
        Ok(Some(next))
    }

    fn apply_favorite(&self, id: WebsiteId, flag: impl FnOnce(bool) -> bool) -> Result<bool, WebsiteError> {
        let mut db = self.lock_db();
        let next = Self::write_favorite(db.connection_mut(), id, flag)
            .inspect_err(|e| error!(%id, "could not save favorite flag: {}", e))?
            .ok_or_else(|| {
                warn!(%id, "favorite change for unknown website");
                WebsiteError::NotFound(id)
            })?;

        if let Some(website) = self.snapshot_mut().iter_mut().find(|w| w.id == id) {
            website.is_favorite = next;
        }
        debug!(%id, is_favorite = next, "favorite flag saved");
        Ok(next)
    }
}

impl WebsiteStoreTrait for WebsiteStore {
    #[instrument(skip_all, level = "debug")]
    fn add_website(&self, title: &str, link: &str) -> Result<Website, WebsiteError> {
        let website = Website {
            id: WebsiteId::new(),
            title: title.to_string(),
            link: link.to_string(),
            is_favorite: false,
            created_at: Self::now(),
        };

        let mut db = self.lock_db();
        Self::insert(db.connection_mut(), &website)
            .inspect_err(|e| error!("could not save website: {}", e))?;

        self.snapshot_mut().insert(0, website.clone());
        debug!(id = %website.id, "website saved");
        Ok(website)
    }

    #[instrument(skip_all, level = "debug")]
    fn list_all(&self) -> Result<Vec<Website>, WebsiteError> {
        let db = self.lock_db();
        let websites = Self::load_all(db.connection())
            .inspect_err(|e| error!("could not fetch websites: {}", e))?;

        *self.snapshot_mut() = websites.clone();
        debug!(count = websites.len(), "websites loaded");
        Ok(websites)
    }

    fn list_favorites(&self) -> Vec<Website> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|w| w.is_favorite)
            .cloned()
            .collect()
    }

    fn list(&self, filter: ListFilter) -> Result<Vec<Website>, WebsiteError> {
        match filter {
            ListFilter::All => self.list_all(),
            ListFilter::Favorites => Ok(self.list_favorites()),
        }
    }

    #[instrument(skip_all, level = "debug")]
    fn get_website(&self, id: WebsiteId) -> Result<Website, WebsiteError> {
        let db = self.lock_db();
        db.connection()
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.to_string()],
                Self::row_to_website,
            )
            .optional()
            .inspect_err(|e| error!(%id, "could not fetch website: {}", e))?
            .ok_or(WebsiteError::NotFound(id))
    }

    #[instrument(skip_all, level = "debug")]
    fn set_favorite(&self, id: WebsiteId, is_favorite: bool) -> Result<(), WebsiteError> {
        self.apply_favorite(id, |_| is_favorite).map(|_| ())
    }

    #[instrument(skip_all, level = "debug")]
    fn toggle_favorite(&self, id: WebsiteId) -> Result<bool, WebsiteError> {
        self.apply_favorite(id, |current| !current)
    }

    #[instrument(skip_all, level = "debug")]
    fn delete_all(&self) -> Result<(), WebsiteError> {
        let mut db = self.lock_db();
        let removed = {
            let tx = db
                .connection_mut()
                .transaction()
                .inspect_err(|e| error!("could not start website deletion: {}", e))?;
            let removed = tx
                .execute("DELETE FROM websites", [])
                .inspect_err(|e| error!("could not delete websites: {}", e))?;
            tx.commit()
                .inspect_err(|e| error!("could not commit website deletion: {}", e))?;
            removed
        };

        let mut snapshot = self.snapshot_mut();
        snapshot.clear();
        match Self::load_all(db.connection()) {
            Ok(websites) => *snapshot = websites,
            Err(e) => warn!("could not reload websites after clearing: {}", e),
        }
        info!(removed, "all websites deleted");
        Ok(())
    }
}
