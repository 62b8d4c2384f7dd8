// Error taxonomy
// Per-file errors are recovered locally by the engines; per-directory errors
// fail only that directory's call and propagate as that subtree's result.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to produce a content digest for one file.
#[derive(Debug, Error)]
pub enum HashError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to spawn {program} for {path}: {source}")]
    Spawn {
        program: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{program} failed for {path} (exit status {status})")]
    Exit {
        program: String,
        path: PathBuf,
        status: String,
    },

    #[error("{program} produced no digest for {path}")]
    EmptyOutput { program: String, path: PathBuf },
}

/// Failure loading, saving or deleting a directory's index envelope.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The envelope exists but its checksum does not match its payload, or
    /// the file is not parseable at all. Never silently recovered unless the
    /// run has overwrite permission.
    #[error("{dir}: index checksum mismatch or unparseable envelope")]
    Damaged { dir: PathBuf },

    #[error("failed to read index in {dir}: {source}")]
    Load {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write index in {dir}: {source}")]
    Save {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to delete index in {dir}: {source}")]
    Delete {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize index for {dir}: {source}")]
    Serialize {
        dir: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure listing a directory. Per-entry stat failures are not errors; the
/// scanner reports those through the status sink and keeps going.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to list {dir}: {source}")]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Directory-level failure during verification.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Directory-level failure during index purging.
#[derive(Debug, Error)]
pub enum PurgeError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}
