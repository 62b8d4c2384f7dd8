// Tests for the content hashing strategies and the limiter gate.

use std::sync::Arc;

use tempfile::tempdir;

use rotcheck::hasher::{md5_hex, StreamingMd5};
use rotcheck::{ContentHasher, HashLimiter, HashStrategy};

#[tokio::test]
async fn streaming_md5_matches_known_vectors() {
    let dir = tempdir().unwrap();

    let empty = dir.path().join("empty");
    std::fs::write(&empty, "").unwrap();
    assert_eq!(
        StreamingMd5.digest(&empty).await.unwrap(),
        "d41d8cd98f00b204e9800998ecf8427e"
    );

    let abc = dir.path().join("abc");
    std::fs::write(&abc, "abc").unwrap();
    assert_eq!(
        StreamingMd5.digest(&abc).await.unwrap(),
        "900150983cd24fb0d6963f7d28e17f72"
    );
}

#[tokio::test]
async fn streaming_md5_fails_for_missing_file() {
    let dir = tempdir().unwrap();
    assert!(StreamingMd5.digest(&dir.path().join("nope")).await.is_err());
}

#[test]
fn md5_hex_matches_known_vector() {
    assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
    assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
}

#[tokio::test]
async fn detected_strategy_agrees_with_streaming() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("f.txt");
    std::fs::write(&file, "The quick brown fox jumps over the lazy dog").unwrap();

    // Whichever strategy the platform probe picks, the digest is the same.
    let detected = rotcheck::hasher::detect_strategy();
    assert_eq!(
        detected.digest(&file).await.unwrap(),
        StreamingMd5.digest(&file).await.unwrap()
    );
}

#[tokio::test]
async fn a_failing_task_does_not_block_the_limiter() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good");
    std::fs::write(&good, "ok").unwrap();

    let hasher = ContentHasher::new(Arc::new(StreamingMd5), HashLimiter::new(1));

    // The failure releases its slot; the next call still goes through.
    assert!(hasher.hash_file(&dir.path().join("missing")).await.is_err());
    assert!(hasher.hash_file(&good).await.is_ok());
}
