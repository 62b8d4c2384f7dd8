// rotcheck - bitrot detection library
// Maintains a checksum-protected content-hash index per directory and flags
// files whose bytes changed without a matching mtime change.

pub mod config;
pub mod error;
pub mod hasher;
pub mod ignore;
pub mod index;
pub mod limiter;
pub mod purge;
pub mod scan;
pub mod status;
pub mod verify;

use std::path::Path;
use std::sync::Arc;

pub use config::Config;
pub use error::{HashError, IndexError, PurgeError, ScanError, VerifyError};
pub use hasher::{ContentHasher, HashStrategy};
pub use index::{FileRecord, IndexStore};
pub use limiter::HashLimiter;
pub use purge::PurgeEngine;
pub use scan::DirectoryScanner;
pub use status::{NullSink, Severity, Status, StatusSink};
pub use verify::VerifyEngine;

/// Verify a tree rooted at `root`, reporting every classification through
/// `sink`. Returns the number of suspected corruptions found.
///
/// The hash strategy is probed once here and the concurrency limiter is
/// shared across the whole recursive traversal.
pub async fn verify(
    root: &Path,
    config: &Config,
    sink: Arc<dyn StatusSink>,
) -> Result<u64, VerifyError> {
    let limiter = HashLimiter::new(config.max_parallel_hashes);
    let hasher = ContentHasher::new(hasher::detect_strategy(), limiter);
    VerifyEngine::new(config.clone(), hasher, sink)
        .verify(root.to_path_buf())
        .await
}

/// Delete every index file under `root`. Returns how many were removed.
pub async fn purge(
    root: &Path,
    config: &Config,
    sink: Arc<dyn StatusSink>,
) -> Result<u64, PurgeError> {
    PurgeEngine::new(config.clone(), sink)
        .purge(root.to_path_buf())
        .await
}
