// Per-directory exclusion list
// One literal entry name per line; no globs or path expressions. A listed
// name excludes the matching immediate child from scanning entirely.

use std::collections::HashSet;
use std::io;
use std::path::Path;

/// Name of the per-directory exclusion file.
pub const IGNORE_NAME: &str = ".rotignore";

/// Load the exclusion set for `dir`. Blank lines and `#` comments are
/// skipped; trailing carriage returns are stripped. A missing file yields an
/// empty set.
pub async fn load(dir: &Path) -> Result<HashSet<String>, io::Error> {
    let text = match tokio::fs::read_to_string(dir.join(IGNORE_NAME)).await {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HashSet::new()),
        Err(e) => return Err(e),
    };

    Ok(text
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.to_string())
        .collect())
}
