//! Byte-level storage used by the persistence facade.
//!
//! [`ByteStore`] is the only thing the facade needs from a file system:
//! open for reading, open for truncating write. [`FsStore`] is backed by
//! `std::fs`; [`MemoryStore`] keeps files in memory for tests and
//! embedding.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::config::PersistConfig;

/// Opens byte streams by path.
pub trait ByteStore: Send + Sync {
    /// Open `path` for reading from the start.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Open `path` for writing, creating it if needed and discarding any
    /// previous content.
    fn open_truncating_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>>;
}

/// [`ByteStore`] over the local file system. The default follows
/// [`PersistConfig::default`].
#[derive(Clone, Debug)]
pub struct FsStore {
    create_parent_dirs: bool,
    sync_on_save: bool,
}

impl Default for FsStore {
    fn default() -> Self {
        Self::from_config(&PersistConfig::default())
    }
}

impl FsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &PersistConfig) -> Self {
        Self {
            create_parent_dirs: config.create_parent_dirs,
            sync_on_save: config.sync_on_save,
        }
    }
}

impl ByteStore for FsStore {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn open_truncating_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        if self.create_parent_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        Ok(Box::new(FsWriter {
            inner: BufWriter::new(file),
            sync: self.sync_on_save,
        }))
    }
}

struct FsWriter {
    inner: BufWriter<File>,
    sync: bool,
}

impl Write for FsWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()?;
        if self.sync {
            self.inner.get_ref().sync_all()?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryFiles {
    files: RwLock<HashMap<PathBuf, Vec<u8>>>,
    writes: AtomicUsize,
    read_only: AtomicBool,
}

/// In-memory [`ByteStore`].
///
/// Clones share the same files, so a test can keep a handle while a
/// document owns another. Every truncating open counts as one write.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryFiles>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of truncating opens so far.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Refuse all further writes with `PermissionDenied`.
    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.store(read_only, Ordering::SeqCst);
    }

    /// Current content of `path`.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let files = self.inner.files.read().expect("lock poisoned");
        files.get(path.as_ref()).cloned()
    }

    /// Current content of `path` as text.
    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.contents(path)
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Put a file in place directly.
    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        let mut files = self.inner.files.write().expect("lock poisoned");
        files.insert(path.into(), contents.into());
    }

    pub fn remove(&self, path: impl AsRef<Path>) -> bool {
        let mut files = self.inner.files.write().expect("lock poisoned");
        files.remove(path.as_ref()).is_some()
    }
}

fn poisoned(e: impl std::fmt::Display) -> io::Error {
    io::Error::other(format!("lock poisoned: {e}"))
}

impl ByteStore for MemoryStore {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        let files = self.inner.files.read().map_err(poisoned)?;
        match files.get(path) {
            Some(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", path.display()),
            )),
        }
    }

    fn open_truncating_write(&self, path: &Path) -> io::Result<Box<dyn Write + '_>> {
        if self.inner.read_only.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "memory store is read-only",
            ));
        }
        let mut files = self.inner.files.write().map_err(poisoned)?;
        files.insert(path.to_path_buf(), Vec::new());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        debug!(path = %path.display(), "memory store truncated");
        Ok(Box::new(MemoryWriter {
            files: &self.inner.files,
            path: path.to_path_buf(),
        }))
    }
}

/// Appends straight into the shared map, so content is visible as soon
/// as it is written.
struct MemoryWriter<'a> {
    files: &'a RwLock<HashMap<PathBuf, Vec<u8>>>,
    path: PathBuf,
}

impl Write for MemoryWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = self.files.write().map_err(poisoned)?;
        files.entry(self.path.clone()).or_default().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
