// Directory scanning module
// Lists one directory's immediate children, applying the exclusion list and
// the hidden/symlink filters. Per-entry failures are reported through the
// status sink and never abort the scan.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use crate::error::ScanError;
use crate::ignore;
use crate::status::{Status, StatusSink};

/// A regular file found during a scan, with its mtime in epoch milliseconds.
#[derive(Debug, Clone)]
pub struct FileMeta {
    pub name: String,
    pub modified: i64,
}

/// Immediate contents of one directory after filtering.
#[derive(Debug)]
pub struct ScanResult {
    pub path: PathBuf,
    pub files: Vec<FileMeta>,
    pub dirs: Vec<String>,
}

/// Lists directories one level at a time for the recursive engines.
pub struct DirectoryScanner {
    sink: Arc<dyn StatusSink>,
}

impl DirectoryScanner {
    pub fn new(sink: Arc<dyn StatusSink>) -> Self {
        Self { sink }
    }

    /// Scan the immediate children of `dir`.
    ///
    /// Skipped outright: names starting with `.` or `~`, names listed in the
    /// directory's exclusion file, and symbolic links (never followed, to
    /// avoid cycles and double counting).
    pub async fn scan(&self, dir: &Path) -> Result<ScanResult, ScanError> {
        let ignored = match ignore::load(dir).await {
            Ok(set) => set,
            Err(_) => {
                // Unreadable exclusion file: report and scan everything.
                self.sink.status(Status::Error, &dir.join(ignore::IGNORE_NAME));
                Default::default()
            }
        };

        let read_dir_err = |e| ScanError::ReadDir {
            dir: dir.to_path_buf(),
            source: e,
        };

        let mut entries = tokio::fs::read_dir(dir).await.map_err(read_dir_err)?;
        let mut files = Vec::new();
        let mut dirs = Vec::new();

        while let Some(entry) = entries.next_entry().await.map_err(read_dir_err)? {
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => {
                    self.sink.status(Status::Error, &entry.path());
                    continue;
                }
            };

            if name.starts_with('.') || name.starts_with('~') || ignored.contains(&name) {
                continue;
            }

            // file_type() does not follow symlinks.
            let file_type = match entry.file_type().await {
                Ok(t) => t,
                Err(_) => {
                    self.sink.status(Status::Error, &entry.path());
                    continue;
                }
            };

            if file_type.is_symlink() {
                continue;
            }

            if file_type.is_dir() {
                dirs.push(name);
            } else {
                match entry.metadata().await {
                    Ok(meta) => files.push(FileMeta {
                        name,
                        modified: mtime_millis(&meta),
                    }),
                    Err(_) => self.sink.status(Status::Error, &entry.path()),
                }
            }
        }

        Ok(ScanResult {
            path: dir.to_path_buf(),
            files,
            dirs,
        })
    }
}

fn mtime_millis(meta: &std::fs::Metadata) -> i64 {
    match meta.modified() {
        Ok(time) => match time.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_millis() as i64,
            // Pre-epoch mtimes come back as negative milliseconds.
            Err(e) => -(e.duration().as_millis() as i64),
        },
        Err(_) => 0,
    }
}
