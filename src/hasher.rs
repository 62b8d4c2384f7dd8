// Content hashing module
// Two interchangeable digest strategies: delegate to a native md5 utility
// as a subprocess, or stream the file through an in-process MD5 accumulator.
// The strategy is probed once at startup; every call is gated through the
// shared HashLimiter.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use md5::{Digest, Md5};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::error::HashError;
use crate::limiter::HashLimiter;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// A way of producing a hex content digest for one file.
#[async_trait]
pub trait HashStrategy: Send + Sync {
    async fn digest(&self, path: &Path) -> Result<String, HashError>;
}

/// Delegates to a platform digest utility (`md5 -q` on macOS, `md5sum -b`
/// elsewhere) and parses the digest token from its stdout.
pub struct NativeMd5 {
    program: String,
    flag: &'static str,
}

impl NativeMd5 {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            flag: if program == "md5" { "-q" } else { "-b" },
        }
    }
}

#[async_trait]
impl HashStrategy for NativeMd5 {
    async fn digest(&self, path: &Path) -> Result<String, HashError> {
        let output = Command::new(&self.program)
            .arg(self.flag)
            .arg(path)
            .output()
            .await
            .map_err(|e| HashError::Spawn {
                program: self.program.clone(),
                path: path.to_path_buf(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(HashError::Exit {
                program: self.program.clone(),
                path: path.to_path_buf(),
                status: output.status.to_string(),
            });
        }

        // `md5 -q` prints the bare digest; `md5sum -b` prints "digest *file".
        // Either way the digest is the first token of the first line.
        let stdout = String::from_utf8_lossy(&output.stdout);
        stdout
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().next())
            .map(|token| token.to_string())
            .ok_or_else(|| HashError::EmptyOutput {
                program: self.program.clone(),
                path: path.to_path_buf(),
            })
    }
}

/// Streams the file through an in-process MD5 accumulator. Fallback when no
/// native utility is on PATH.
pub struct StreamingMd5;

#[async_trait]
impl HashStrategy for StreamingMd5 {
    async fn digest(&self, path: &Path) -> Result<String, HashError> {
        let read_err = |e| HashError::Read {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).await.map_err(read_err)?;
        let mut hasher = Md5::new();
        let mut buffer = vec![0u8; READ_BUFFER_SIZE];

        loop {
            let bytes_read = file.read(&mut buffer).await.map_err(read_err)?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(bytes_to_hex(&hasher.finalize()))
    }
}

/// Probe the platform for a native digest utility and pick the strategy for
/// this run. Resolved once at startup, never re-checked per call.
pub fn detect_strategy() -> Arc<dyn HashStrategy> {
    let program = if cfg!(target_os = "macos") {
        "md5"
    } else {
        "md5sum"
    };

    if find_in_path(program).is_some() {
        Arc::new(NativeMd5::new(program))
    } else {
        Arc::new(StreamingMd5)
    }
}

fn find_in_path(program: &str) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

/// File hasher with the concurrency gate baked in: every digest, regardless
/// of which directory requested it, contends for the same limiter slots.
#[derive(Clone)]
pub struct ContentHasher {
    strategy: Arc<dyn HashStrategy>,
    limiter: HashLimiter,
}

impl ContentHasher {
    pub fn new(strategy: Arc<dyn HashStrategy>, limiter: HashLimiter) -> Self {
        Self { strategy, limiter }
    }

    /// Compute the hex content digest of `path`, waiting for a limiter slot
    /// first.
    pub async fn hash_file(&self, path: &Path) -> Result<String, HashError> {
        self.limiter.run(self.strategy.digest(path)).await
    }
}

/// MD5 of a UTF-8 string, used for the index envelope checksum.
pub fn md5_hex(text: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(text.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Convert bytes to hexadecimal string
fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
