// Tests for the purge engine: recursive index deletion.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::tempdir;

use rotcheck::{Config, Status, StatusSink};

#[derive(Default)]
struct Collector {
    events: Mutex<Vec<(Status, PathBuf)>>,
}

impl StatusSink for Collector {
    fn status(&self, status: Status, path: &Path) {
        self.events.lock().unwrap().push((status, path.to_path_buf()));
    }
}

async fn track(root: &Path) {
    rotcheck::verify(root, &Config::default(), Arc::new(Collector::default()))
        .await
        .unwrap();
}

#[tokio::test]
async fn purge_removes_every_index_in_the_tree() {
    let dir = tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("top.txt"), "x").unwrap();
    std::fs::write(nested.join("deep.txt"), "y").unwrap();
    track(dir.path()).await;

    assert!(dir.path().join(".rotcheck").exists());
    assert!(nested.join(".rotcheck").exists());

    let removed = rotcheck::purge(dir.path(), &Config::default(), Arc::new(Collector::default()))
        .await
        .unwrap();

    // Root, a/ and a/b/ each had an index.
    assert_eq!(removed, 3);
    assert!(!dir.path().join(".rotcheck").exists());
    assert!(!nested.join(".rotcheck").exists());
    // File content is untouched.
    assert!(dir.path().join("top.txt").exists());
    assert!(nested.join("deep.txt").exists());
}

#[tokio::test]
async fn purge_counts_nothing_when_untracked() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("sub")).unwrap();

    let removed = rotcheck::purge(dir.path(), &Config::default(), Arc::new(Collector::default()))
        .await
        .unwrap();
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn verbose_purge_reports_each_deletion() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("f.txt"), "x").unwrap();
    track(dir.path()).await;

    let sink = Arc::new(Collector::default());
    let config = Config {
        verbose: true,
        ..Config::default()
    };
    let removed = rotcheck::purge(dir.path(), &config, sink.clone()).await.unwrap();

    assert_eq!(removed, 1);
    let events = sink.events.lock().unwrap();
    assert!(events.iter().any(|(s, _)| *s == Status::Deleted));
}

#[tokio::test]
async fn purge_respects_the_exclusion_list() {
    let dir = tempdir().unwrap();
    let kept = dir.path().join("kept");
    std::fs::create_dir_all(&kept).unwrap();
    std::fs::write(kept.join("f.txt"), "x").unwrap();
    track(dir.path()).await;

    // Exclude the subdirectory, then purge: its index must survive.
    std::fs::write(dir.path().join(".rotignore"), "kept\n").unwrap();
    let removed = rotcheck::purge(dir.path(), &Config::default(), Arc::new(Collector::default()))
        .await
        .unwrap();

    assert_eq!(removed, 1);
    assert!(kept.join(".rotcheck").exists());
}
