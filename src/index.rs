// Index persistence module
// Each tracked directory owns one index file: a checksum-protected envelope
// around the JSON-encoded record array. The envelope is the unit of
// integrity; the records inside it are the unit of meaning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::hasher::md5_hex;

/// Name of the per-directory index file.
pub const INDEX_NAME: &str = ".rotcheck";

/// One tracked file: its name within the directory, its last known
/// modification time (epoch milliseconds) and its content digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub name: String,
    #[serde(rename = "mod")]
    pub modified: i64,
    pub md5: String,
}

/// On-disk wrapper: `data` is itself a JSON-encoded record array and `md5`
/// is the digest of that exact string. Envelopes written before checksums
/// were introduced lack `ts` and are accepted without verification.
#[derive(Debug, Serialize, Deserialize)]
struct IndexEnvelope {
    data: String,
    md5: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ts: Option<i64>,
    #[serde(default)]
    v: String,
}

fn index_path(dir: &Path) -> PathBuf {
    dir.join(INDEX_NAME)
}

/// Reads and writes per-directory index envelopes.
pub struct IndexStore;

impl IndexStore {
    /// Load the index for `dir`. A missing index file is an empty index; a
    /// present but unverifiable one is `IndexError::Damaged` — the caller
    /// decides whether repair is permitted.
    pub async fn load(dir: &Path) -> Result<Vec<FileRecord>, IndexError> {
        let file = index_path(dir);

        let text = match tokio::fs::read_to_string(&file).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(IndexError::Load {
                    dir: dir.to_path_buf(),
                    source: e,
                })
            }
        };

        let damaged = || IndexError::Damaged {
            dir: dir.to_path_buf(),
        };

        let envelope: IndexEnvelope = serde_json::from_str(&text).map_err(|_| damaged())?;

        // Legacy envelopes (no ts) predate the checksum and are trusted as-is.
        if envelope.ts.is_some() && md5_hex(&envelope.data) != envelope.md5 {
            return Err(damaged());
        }

        serde_json::from_str(&envelope.data).map_err(|_| damaged())
    }

    /// Persist `records` for `dir`, wrapping them in a fresh envelope.
    /// Written to a temporary file and renamed into place so a concurrent
    /// reader never observes a torn write.
    pub async fn save(dir: &Path, records: &[FileRecord]) -> Result<(), IndexError> {
        let data = serde_json::to_string(records).map_err(|e| IndexError::Serialize {
            dir: dir.to_path_buf(),
            source: e,
        })?;

        let envelope = IndexEnvelope {
            md5: md5_hex(&data),
            data,
            ts: Some(chrono::Utc::now().timestamp_millis()),
            v: env!("CARGO_PKG_VERSION").to_string(),
        };

        let text = serde_json::to_string(&envelope).map_err(|e| IndexError::Serialize {
            dir: dir.to_path_buf(),
            source: e,
        })?;

        let save_err = |e| IndexError::Save {
            dir: dir.to_path_buf(),
            source: e,
        };

        let file = index_path(dir);
        let tmp = dir.join(format!("{}.tmp", INDEX_NAME));
        tokio::fs::write(&tmp, text).await.map_err(save_err)?;
        tokio::fs::rename(&tmp, &file).await.map_err(save_err)
    }

    /// Remove the index file for `dir` if present; returns whether one
    /// existed.
    pub async fn delete(dir: &Path) -> Result<bool, IndexError> {
        match tokio::fs::remove_file(index_path(dir)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(IndexError::Delete {
                dir: dir.to_path_buf(),
                source: e,
            }),
        }
    }
}
