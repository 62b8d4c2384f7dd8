// Verification engine
// Recursively walks a tree, compares fresh content hashes against each
// directory's persisted index, classifies every file and persists the
// updated index. Returns the corruption count for the whole subtree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::{join_all, BoxFuture};
use futures::FutureExt;

use crate::config::Config;
use crate::error::VerifyError;
use crate::hasher::ContentHasher;
use crate::index::{FileRecord, IndexStore, INDEX_NAME};
use crate::scan::{DirectoryScanner, ScanResult};
use crate::status::{Status, StatusSink};

/// Recursive verification orchestrator.
///
/// Subdirectories fan out freely — every subtree runs concurrently with its
/// siblings — while all hash work contends for the single limiter inside the
/// shared `ContentHasher`.
pub struct VerifyEngine {
    config: Config,
    hasher: ContentHasher,
    scanner: DirectoryScanner,
    sink: Arc<dyn StatusSink>,
}

impl VerifyEngine {
    pub fn new(config: Config, hasher: ContentHasher, sink: Arc<dyn StatusSink>) -> Self {
        Self {
            config,
            hasher,
            scanner: DirectoryScanner::new(Arc::clone(&sink)),
            sink,
        }
    }

    /// Verify `dir` and everything below it, returning the number of
    /// suspected corruptions found.
    ///
    /// A damaged index without overwrite permission fails this directory's
    /// subtree only; siblings still run to completion and their events are
    /// reported before the error propagates.
    pub fn verify(&self, dir: PathBuf) -> BoxFuture<'_, Result<u64, VerifyError>> {
        async move {
            let scan = self.scanner.scan(&dir).await?;

            // This directory's own files and its subdirectories are
            // independent; process both branches concurrently.
            let own = self.verify_files(&scan);
            let subtrees = join_all(
                scan.dirs
                    .iter()
                    .map(|name| self.verify(dir.join(name))),
            );
            let (own_result, subtree_results) = tokio::join!(own, subtrees);

            let mut count = 0;
            let mut first_err = None;

            match own_result {
                Ok(c) => count += c,
                Err(e) => first_err = Some(e),
            }
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

    /// Hash, classify and re-persist the files of one directory. The index
    /// load runs concurrently with the hash computations.
    async fn verify_files(&self, scan: &ScanResult) -> Result<u64, VerifyError> {
        let dir = &scan.path;

        let hashes = join_all(scan.files.iter().map(|meta| {
            let path = dir.join(&meta.name);
            async move { (meta, self.hasher.hash_file(&path).await) }
        }));
        let (hash_results, loaded) = tokio::join!(hashes, IndexStore::load(dir));

        let previous = match loaded {
            Ok(records) => records,
            Err(e) => {
                if self.config.overwrite {
                    // Forced repair: rebuild the index from scratch.
                    self.sink.status(Status::Repaired, dir);
                    Vec::new()
                } else {
                    self.sink.status(Status::DamagedIndex, dir);
                    return Err(e.into());
                }
            }
        };
        let previous: HashMap<&str, &FileRecord> =
            previous.iter().map(|r| (r.name.as_str(), r)).collect();

        let mut next = Vec::with_capacity(hash_results.len());
        let mut corrupted = 0u64;

        for (meta, hash_result) in hash_results {
            let path = dir.join(&meta.name);

            let current_hash = match hash_result {
                Ok(hash) => hash,
                Err(_) => {
                    // Unreadable file: report and keep the prior record, if
                    // any, rather than dropping a known-good hash.
                    self.sink.status(Status::Error, &path);
                    if let Some(prev) = previous.get(meta.name.as_str()) {
                        next.push((*prev).clone());
                    }
                    continue;
                }
            };

            match previous.get(meta.name.as_str()) {
                None => {
                    let status = if self.config.readonly {
                        Status::UnknownAdded
                    } else {
                        Status::Added
                    };
                    self.sink.status(status, &path);
                    next.push(FileRecord {
                        name: meta.name.clone(),
                        modified: meta.modified,
                        md5: current_hash,
                    });
                }
                Some(prev) if prev.md5 == current_hash => {
                    if self.config.verbose {
                        self.sink.status(Status::Unchanged, &path);
                    }
                    next.push(FileRecord {
                        name: meta.name.clone(),
                        modified: meta.modified,
                        md5: current_hash,
                    });
                }
                Some(prev) => {
                    if meta.modified == prev.modified {
                        // Content changed without an edit signal: bitrot.
                        if self.config.overwrite {
                            self.sink.status(Status::Repaired, &path);
                            next.push(FileRecord {
                                name: meta.name.clone(),
                                modified: meta.modified,
                                md5: current_hash,
                            });
                        } else {
                            // Do not adopt the suspect hash.
                            self.sink.status(Status::Corrupted, &path);
                            corrupted += 1;
                            next.push((*prev).clone());
                        }
                    } else {
                        self.sink.status(Status::Updated, &path);
                        next.push(FileRecord {
                            name: meta.name.clone(),
                            modified: meta.modified,
                            md5: current_hash,
                        });
                    }
                }
            }
        }

        // Persist even when nothing changed, refreshing the envelope
        // timestamp and format version. A write failure is reported but not
        // fatal: this run's classification already happened in memory.
        if !self.config.readonly && IndexStore::save(dir, &next).await.is_err() {
            self.sink.status(Status::Error, &dir.join(INDEX_NAME));
        }

        Ok(corrupted)
    }
}
