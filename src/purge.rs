// Purge engine
// Recursively deletes index files when a subtree should no longer be
// tracked. Structurally the same walk as verification, with no hashing.

use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::config::Config;
use crate::error::PurgeError;
use crate::index::IndexStore;
use crate::scan::DirectoryScanner;
use crate::status::{Status, StatusSink};

/// Recursive index deleter.
pub struct PurgeEngine {
    config: Config,
    scanner: DirectoryScanner,
    sink: Arc<dyn StatusSink>,
}

impl PurgeEngine {
    pub fn new(config: Config, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            config,
            scanner: DirectoryScanner::new(Arc::clone(&sink)),
            sink,
        }
    }

    /// Delete the index files in `dir` and everything below it, returning
    /// how many existed. The exclusion list still applies to recursion.
    pub fn purge(&self, dir: PathBuf) -> BoxFuture<'_, Result<u64, PurgeError>> {
        async move {
            let (deleted, scanned) =
                tokio::join!(IndexStore::delete(&dir), self.scanner.scan(&dir));

            let mut count = 0;
            if deleted? {
                count += 1;
                if self.config.verbose {
                    self.sink.status(Status::Deleted, &dir);
                }
            }

            let scan = scanned?;
            let subtree_results = join_all(
                scan.dirs
                    .iter()
                    .map(|name| self.purge(dir.join(name))),
            )
            .await;

            let mut first_err = None;
            for result in subtree_results {
                match result {
                    Ok(c) => count += c,
                    Err(e) => {
                        if first_err.is_none() {
                            first_err = Some(e);
                        }
                    }
                }
            }

            match first_err {
                Some(e) => Err(e),
                None => Ok(count),
            }
        }
        .boxed()
    }
}
