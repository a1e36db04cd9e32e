// Persistence backends for the serialized task collection

use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the directory created under the store root
pub const STORE_DIR_NAME: &str = ".tasklist";

const TASKS_FILE: &str = "tasks.json";
const TASKS_TMP_FILE: &str = "tasks.json.tmp";
const LOCK_FILE: &str = "tasks.lock";
const DB_FILE: &str = "tasklist.db";
const TASKS_KEY: &str = "tasks";

/// Narrow capability over a durable blob store
///
/// Implementations hold exactly one serialized collection and overwrite it
/// wholesale on every write.
pub trait Backend {
    /// The stored blob, or `None` if nothing was ever written
    fn read_raw(&self) -> Result<Option<String>>;

    /// Replace the stored blob
    fn write_raw(&mut self, raw: &str) -> Result<()>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read_raw(&self) -> Result<Option<String>> {
        (**self).read_raw()
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        (**self).write_raw(raw)
    }
}

// ============================================================================
// In-memory
// ============================================================================

/// Backend holding the blob in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    raw: Option<String>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob, as if written by an earlier session
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// Make every subsequent read fail, simulating unavailable storage
    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make every subsequent write fail, simulating an exhausted quota
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }
}

impl Backend for MemoryBackend {
    fn read_raw(&self) -> Result<Option<String>> {
        if self.fail_reads {
            return Err(eyre!("Storage unavailable"));
        }
        Ok(self.raw.clone())
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        if self.fail_writes {
            return Err(eyre!("Storage quota exceeded"));
        }
        self.raw = Some(raw.to_string());
        Ok(())
    }
}

// ============================================================================
// JSON file
// ============================================================================

/// Backend storing the blob in `.tasklist/tasks.json`
///
/// Writes go to a temp file that is renamed over the target, so readers see
/// either the old blob or the new one. A sibling lock file serializes
/// readers and writers across processes.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    tmp_path: PathBuf,
    lock_path: PathBuf,
}

impl FileBackend {
    /// Open or create the store directory under `root`
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let base_path = root.as_ref().join(STORE_DIR_NAME);
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        Ok(Self {
            path: base_path.join(TASKS_FILE),
            tmp_path: base_path.join(TASKS_TMP_FILE),
            lock_path: base_path.join(LOCK_FILE),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tmp_path(&self) -> &Path {
        &self.tmp_path
    }

    fn open_lock(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .context("Failed to open lock file")
    }
}

impl Backend for FileBackend {
    fn read_raw(&self) -> Result<Option<String>> {
        let lock = self.open_lock()?;
        lock.lock_shared().context("Failed to acquire shared file lock")?;

        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context(format!("Failed to read {}", self.path.display())),
        }
        // Lock is released when lock is dropped
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        let lock = self.open_lock()?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let mut file = File::create(&self.tmp_path).context("Failed to create temp tasks file")?;
        file.write_all(raw.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.tmp_path, &self.path).context("Failed to replace tasks file")?;

        debug!(path = ?self.path, bytes = raw.len(), "write_raw: wrote tasks file");
        Ok(())
    }
}

// ============================================================================
// SQLite key-value table
// ============================================================================

/// Backend storing the blob in a single-key SQLite table
pub struct SqliteBackend {
    db: Connection,
}

impl SqliteBackend {
    /// Open or create `.tasklist/tasklist.db` under `root`
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let base_path = root.as_ref().join(STORE_DIR_NAME);
        fs::create_dir_all(&base_path).context("Failed to create store directory")?;

        let db = Connection::open(base_path.join(DB_FILE)).context("Failed to open SQLite database")?;
        Self::with_connection(db)
    }

    /// Backend over a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        Self::with_connection(db)
    }

    fn with_connection(db: Connection) -> Result<Self> {
        db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .context("Failed to create schema")?;

        Ok(Self { db })
    }
}

impl Backend for SqliteBackend {
    fn read_raw(&self) -> Result<Option<String>> {
        let raw = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [TASKS_KEY], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .context("Failed to read tasks from database")?;
        Ok(raw)
    }

    fn write_raw(&mut self, raw: &str) -> Result<()> {
        self.db
            .execute(
                "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
                rusqlite::params![TASKS_KEY, raw],
            )
            .context("Failed to write tasks to database")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_backend_starts_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.read_raw().unwrap().is_none());
    }

    #[test]
    fn test_memory_backend_overwrites() {
        let mut backend = MemoryBackend::with_raw("[1]");
        backend.write_raw("[2]").unwrap();
        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_memory_backend_failing_writes_keep_old_blob() {
        let mut backend = MemoryBackend::with_raw("old");
        backend.fail_writes(true);
        assert!(backend.write_raw("new").is_err());
        assert_eq!(backend.raw(), Some("old"));
    }

    #[test]
    fn test_memory_backend_failing_reads() {
        let mut backend = MemoryBackend::with_raw("[]");
        backend.fail_reads(true);
        assert!(backend.read_raw().is_err());

        backend.fail_reads(false);
        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_backend_creates_directory() {
        let temp = TempDir::new().unwrap();
        let backend = FileBackend::open(temp.path()).unwrap();
        assert!(temp.path().join(STORE_DIR_NAME).is_dir());
        assert!(backend.read_raw().unwrap().is_none());
    }

    #[test]
    fn test_file_backend_overwrite_shorter_blob() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp.path()).unwrap();

        backend.write_raw("a much longer first blob").unwrap();
        backend.write_raw("short").unwrap();

        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("short"));
        assert_eq!(fs::read_to_string(backend.path()).unwrap(), "short");
    }

    #[test]
    fn test_file_backend_failed_write_keeps_previous_blob() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp.path()).unwrap();
        backend.write_raw("[\"previous\"]").unwrap();

        // A directory in the temp file's place makes the next write fail
        fs::create_dir(backend.tmp_path()).unwrap();
        assert!(backend.write_raw("[\"next\"]").is_err());

        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("[\"previous\"]"));
    }

    #[test]
    fn test_file_backend_ignores_leftover_partial_write() {
        let temp = TempDir::new().unwrap();
        let mut backend = FileBackend::open(temp.path()).unwrap();
        backend.write_raw("[\"previous\"]").unwrap();

        // Interrupted write: temp file half written, never renamed
        fs::write(backend.tmp_path(), "[{\"id\":").unwrap();
        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("[\"previous\"]"));

        backend.write_raw("[\"next\"]").unwrap();
        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("[\"next\"]"));
        assert!(!backend.tmp_path().exists());
    }

    #[test]
    fn test_file_backend_persists_across_opens() {
        let temp = TempDir::new().unwrap();
        FileBackend::open(temp.path()).unwrap().write_raw("[]").unwrap();

        let reopened = FileBackend::open(temp.path()).unwrap();
        assert_eq!(reopened.read_raw().unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_sqlite_backend_roundtrip() {
        let mut backend = SqliteBackend::open_in_memory().unwrap();
        assert!(backend.read_raw().unwrap().is_none());

        backend.write_raw("first").unwrap();
        backend.write_raw("second").unwrap();
        assert_eq!(backend.read_raw().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_sqlite_backend_persists_across_opens() {
        let temp = TempDir::new().unwrap();
        SqliteBackend::open(temp.path()).unwrap().write_raw("[]").unwrap();

        let reopened = SqliteBackend::open(temp.path()).unwrap();
        assert_eq!(reopened.read_raw().unwrap().as_deref(), Some("[]"));
        assert!(temp.path().join(STORE_DIR_NAME).join(DB_FILE).exists());
    }
}
