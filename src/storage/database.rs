//! SQLite Database
//!
//! Embedded note store using rusqlite with r2d2 connection pooling.
//!
//! Several widget instances run as independent processes against the same
//! database file. The only cross-instance synchronization is the guarded
//! `UPDATE` in [`Database::claim_pending`], whose affected-row count tells the
//! caller whether it won.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::{debug, info, warn};

use desktop_notes_core::{NoteId, NoteRecord, NoteStatus, NoteStyle, Point, Rect, Size};

use crate::storage::record_store::RecordStore;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::ensure_parent_dir;

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

const NOTE_COLUMNS: &str =
    "id, status, filepath, position_x, position_y, size_width, size_height, style";

/// Raw note row from the database
#[derive(Debug, Clone)]
pub struct NoteRow {
    pub id: NoteId,
    pub status: String,
    pub filepath: Option<String>,
    pub position_x: Option<i32>,
    pub position_y: Option<i32>,
    pub size_width: Option<i32>,
    pub size_height: Option<i32>,
    pub style: Option<String>,
}

impl NoteRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            status: row.get(1)?,
            filepath: row.get(2)?,
            position_x: row.get(3)?,
            position_y: row.get(4)?,
            size_width: row.get(5)?,
            size_height: row.get(6)?,
            style: row.get(7)?,
        })
    }

    /// Convert to the domain record. Unknown statuses are normalized to
    /// `Shown`; missing columns take the schema defaults.
    pub fn into_record(self) -> NoteRecord {
        let defaults = NoteRecord::default();
        let status = match NoteStatus::parse(&self.status) {
            Ok(status) => status,
            Err(_) => {
                warn!(note_id = self.id, status = %self.status, "Unknown stored status, treating as shown");
                NoteStatus::Shown
            }
        };

        NoteRecord {
            id: self.id,
            status,
            filepath: self.filepath.filter(|p| !p.is_empty()),
            position: Point::new(
                self.position_x.unwrap_or(defaults.position.x),
                self.position_y.unwrap_or(defaults.position.y),
            ),
            size: Size::new(
                self.size_width.unwrap_or(defaults.size.width),
                self.size_height.unwrap_or(defaults.size.height),
            ),
            style: NoteStyle::from_blob(self.style.as_deref()),
        }
    }
}

#[derive(Debug, Clone)]
enum DbLocation {
    File(PathBuf),
    Memory,
}

/// Note store backed by SQLite.
///
/// Construction never touches the disk; the pool is built and the schema
/// created on the first operation that needs a connection.
pub struct Database {
    location: DbLocation,
    pool: Mutex<Option<DbPool>>,
}

impl Database {
    /// A store for the database file at `path`, opened lazily
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            location: DbLocation::File(path.into()),
            pool: Mutex::new(None),
        }
    }

    /// Create an in-memory database for testing.
    ///
    /// Uses a single pooled connection so every call sees the same data.
    pub fn new_in_memory() -> Self {
        Self {
            location: DbLocation::Memory,
            pool: Mutex::new(None),
        }
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            DbLocation::File(path) => Some(path),
            DbLocation::Memory => None,
        }
    }

    /// Whether the pool has been built and the schema verified
    pub fn is_open(&self) -> bool {
        self.pool.lock().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Get the pool, opening the database on first use
    fn ensure_pool(&self) -> AppResult<DbPool> {
        let mut guard = self
            .pool
            .lock()
            .map_err(|_| AppError::internal("database pool lock poisoned"))?;

        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = self.build_pool()?;
        Self::init_schema(&pool)?;
        match &self.location {
            DbLocation::File(path) => info!(path = %path.display(), "Database opened"),
            DbLocation::Memory => debug!("In-memory database opened"),
        }
        *guard = Some(pool.clone());
        Ok(pool)
    }

    fn build_pool(&self) -> AppResult<DbPool> {
        let (manager, max_size) = match &self.location {
            DbLocation::File(path) => {
                ensure_parent_dir(path).map_err(|e| {
                    AppError::storage_unavailable(format!(
                        "Could not create database directory for {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                let manager = SqliteConnectionManager::file(path).with_init(|conn| {
                    conn.busy_timeout(BUSY_TIMEOUT)?;
                    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                        row.get::<_, String>(0)
                    })?;
                    Ok(())
                });
                (manager, 4)
            }
            DbLocation::Memory => (SqliteConnectionManager::memory(), 1),
        };

        Pool::builder()
            .max_size(max_size)
            .connection_timeout(CONNECTION_TIMEOUT)
            .build(manager)
            .map_err(|e| {
                AppError::storage_unavailable(format!("Failed to create connection pool: {}", e))
            })
    }

    /// Initialize the database schema
    fn init_schema(pool: &DbPool) -> AppResult<()> {
        let conn = pool
            .get()
            .map_err(|e| AppError::storage_unavailable(format!("Failed to get connection: {}", e)))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                status TEXT NOT NULL DEFAULT 'shown',
                filepath TEXT,
                position_x INTEGER DEFAULT 50,
                position_y INTEGER DEFAULT 50,
                size_width INTEGER DEFAULT 200,
                size_height INTEGER DEFAULT 150,
                style TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_notes_status ON notes(status);",
        )
        .map_err(|e| AppError::storage_unavailable(format!("Failed to create notes schema: {}", e)))?;

        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.ensure_pool()?
            .get()
            .map_err(|e| AppError::storage_unavailable(format!("Failed to get connection: {}", e)))
    }

    fn style_blob(style: &NoteStyle) -> AppResult<String> {
        style.validate()?;
        Ok(style.to_blob()?)
    }

    /// Run an `UPDATE` keyed by `id`, reporting `NotFound` when no row matched.
    fn update_row(
        &self,
        id: NoteId,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
        what: &str,
    ) -> AppResult<()> {
        let conn = self.get_connection()?;
        let changed = conn.execute(sql, params)?;
        if changed == 0 {
            warn!(note_id = id, "Note not found for {} update", what);
            return Err(AppError::not_found(format!("note {}", id)));
        }
        Ok(())
    }

    fn filepath_param(record: &NoteRecord) -> Option<&str> {
        record.filepath.as_deref().filter(|p| !p.is_empty())
    }
}

impl RecordStore for Database {
    fn open(&self) -> AppResult<()> {
        self.ensure_pool().map(|_| ())
    }

    fn create(&self, record: &NoteRecord) -> AppResult<NoteId> {
        let style = Self::style_blob(&record.style)?;
        let conn = self.get_connection()?;
        conn.execute(
            "INSERT INTO notes (status, filepath, position_x, position_y, size_width, size_height, style)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.status.as_str(),
                Self::filepath_param(record),
                record.position.x,
                record.position.y,
                record.size.width,
                record.size.height,
                style,
            ],
        )?;
        let id = conn.last_insert_rowid();
        info!(note_id = id, status = %record.status, "Note created");
        Ok(id)
    }

    fn read(&self, id: NoteId) -> AppResult<NoteRecord> {
        let conn = self.get_connection()?;
        let result = conn.query_row(
            &format!("SELECT {} FROM notes WHERE id = ?1", NOTE_COLUMNS),
            params![id],
            NoteRow::from_row,
        );

        match result {
            Ok(row) => Ok(row.into_record()),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(AppError::not_found(format!("note {}", id)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, record: &NoteRecord) -> AppResult<()> {
        if !record.is_assigned() {
            return Err(AppError::validation("cannot update a note without an id"));
        }
        let style = Self::style_blob(&record.style)?;
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE notes SET status = ?2, filepath = ?3, position_x = ?4, position_y = ?5,
             size_width = ?6, size_height = ?7, style = ?8 WHERE id = ?1",
            params![
                record.id,
                record.status.as_str(),
                Self::filepath_param(record),
                record.position.x,
                record.position.y,
                record.size.width,
                record.size.height,
                style,
            ],
        )?;

        if changed == 0 {
            warn!(note_id = record.id, "Note not found for update");
            return Err(AppError::not_found(format!("note {}", record.id)));
        }
        Ok(())
    }

    fn delete(&self, id: NoteId) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let changed = conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        if changed > 0 {
            info!(note_id = id, "Note deleted");
        }
        Ok(changed > 0)
    }

    fn list_all(&self) -> AppResult<Vec<NoteRecord>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM notes ORDER BY id ASC",
            NOTE_COLUMNS
        ))?;

        let rows = stmt
            .query_map([], NoteRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows.into_iter().map(NoteRow::into_record).collect())
    }

    fn set_status(&self, id: NoteId, status: NoteStatus) -> AppResult<()> {
        self.update_row(
            id,
            "UPDATE notes SET status = ?2 WHERE id = ?1",
            params![id, status.as_str()],
            "status",
        )
    }

    fn set_filepath(&self, id: NoteId, filepath: Option<&str>) -> AppResult<()> {
        self.update_row(
            id,
            "UPDATE notes SET filepath = ?2 WHERE id = ?1",
            params![id, filepath.filter(|p| !p.is_empty())],
            "filepath",
        )
    }

    fn set_style(&self, id: NoteId, style: &NoteStyle) -> AppResult<()> {
        let blob = Self::style_blob(style)?;
        self.update_row(
            id,
            "UPDATE notes SET style = ?2 WHERE id = ?1",
            params![id, blob],
            "style",
        )
    }

    fn set_geometry(&self, id: NoteId, bounds: Rect) -> AppResult<()> {
        self.update_row(
            id,
            "UPDATE notes SET position_x = ?2, position_y = ?3, size_width = ?4, size_height = ?5
             WHERE id = ?1",
            params![id, bounds.x, bounds.y, bounds.width, bounds.height],
            "geometry",
        )
    }

    fn claim_pending(&self, id: NoteId) -> AppResult<bool> {
        let conn = self.get_connection()?;
        let changed = conn.execute(
            "UPDATE notes SET status = ?2 WHERE id = ?1 AND status = ?3",
            params![
                id,
                NoteStatus::Shown.as_str(),
                NoteStatus::PendingPlacement.as_str()
            ],
        )?;
        let won = changed == 1;
        debug!(note_id = id, won, "Claim attempt on pending note");
        Ok(won)
    }

    fn is_healthy(&self) -> bool {
        match self.get_connection() {
            Ok(conn) => conn.query_row("SELECT 1", [], |_| Ok(())).is_ok(),
            Err(_) => false,
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("location", &self.location)
            .field("open", &self.is_open())
            .finish()
    }
}
