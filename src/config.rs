// Run configuration
// Immutable for the duration of one verify/purge pass

/// Options controlling a single verification or purge run.
///
/// A `Config` is built once by the caller and threaded through every
/// recursive call; nothing in the core mutates it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Accept suspect hashes instead of flagging them: a hash change with an
    /// unchanged mtime is recorded as "repaired" rather than counted as
    /// corruption, and a damaged index envelope is rebuilt from scratch.
    pub overwrite: bool,
    /// Never write index files; new files are reported as unknown (`?`).
    pub readonly: bool,
    /// Also report unchanged files and deleted index files.
    pub verbose: bool,
    /// Upper bound on hash computations in flight process-wide.
    pub max_parallel_hashes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overwrite: false,
            readonly: false,
            verbose: false,
            max_parallel_hashes: 10,
        }
    }
}
