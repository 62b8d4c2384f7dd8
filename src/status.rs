// Status events
// The core reports every observable outcome through a single sink; the CLI
// (or a test collector) decides how to render it.

use std::path::Path;

/// Per-file or per-directory classification outcome reported during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// File seen for the first time; a record was created.
    Added,
    /// File seen for the first time in a readonly run; nothing recorded.
    UnknownAdded,
    /// Hash changed together with the mtime: a legitimate edit.
    Updated,
    /// Suspect hash accepted because the run has overwrite permission.
    Repaired,
    /// Hash matches the stored record (verbose runs only).
    Unchanged,
    /// Hash changed while the mtime did not: the bitrot signal.
    Corrupted,
    /// Index envelope failed its checksum and was not repaired.
    DamagedIndex,
    /// Non-fatal error (unreadable file, stat failure, save failure).
    Error,
    /// Index file removed by a purge run (verbose runs only).
    Deleted,
}

/// How serious a status event is, for rendering and for deciding what a
/// clean run looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Status {
    /// One-character symbol used by the console layer, matching the event
    /// vocabulary consumed by scripts (`a`, `u`, `r`, `E`, ...).
    pub fn symbol(self) -> char {
        match self {
            Status::Added => 'a',
            Status::UnknownAdded => '?',
            Status::Updated => 'u',
            Status::Repaired => 'r',
            Status::Unchanged => ' ',
            Status::Corrupted => 'E',
            Status::DamagedIndex => 'F',
            Status::Error => 'w',
            Status::Deleted => 'd',
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Status::Corrupted | Status::DamagedIndex => Severity::Error,
            Status::Error => Severity::Warning,
            _ => Severity::Info,
        }
    }
}

/// Sink for status events. Implementations must be shareable across the
/// concurrently processed subtrees.
pub trait StatusSink: Send + Sync {
    fn status(&self, status: Status, path: &Path);
}

/// Sink that discards every event.
pub struct NullSink;

impl StatusSink for NullSink {
    fn status(&self, _status: Status, _path: &Path) {}
}
