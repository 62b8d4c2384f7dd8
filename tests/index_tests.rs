// Tests for the index envelope: round-trip, tamper detection, legacy
// tolerance and deletion.

use rotcheck::{FileRecord, IndexError, IndexStore};
use tempfile::tempdir;

fn sample_records() -> Vec<FileRecord> {
    vec![
        FileRecord {
            name: "a.txt".to_string(),
            modified: 1_700_000_000_000,
            md5: "0cc175b9c0f1b6a831c399e269772661".to_string(),
        },
        FileRecord {
            name: "b.bin".to_string(),
            modified: 1_700_000_060_000,
            md5: "92eb5ffee6ae2fec3ad71c777531578f".to_string(),
        },
    ]
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let dir = tempdir().unwrap();
    let records = sample_records();

    IndexStore::save(dir.path(), &records).await.unwrap();
    let loaded = IndexStore::load(dir.path()).await.unwrap();

    assert_eq!(loaded, records);
}

#[tokio::test]
async fn missing_index_is_empty() {
    let dir = tempdir().unwrap();
    let loaded = IndexStore::load(dir.path()).await.unwrap();
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn save_leaves_no_temp_file() {
    let dir = tempdir().unwrap();
    IndexStore::save(dir.path(), &sample_records()).await.unwrap();

    assert!(dir.path().join(".rotcheck").exists());
    assert!(!dir.path().join(".rotcheck.tmp").exists());
}

#[tokio::test]
async fn tampered_data_is_detected() {
    let dir = tempdir().unwrap();
    IndexStore::save(dir.path(), &sample_records()).await.unwrap();

    // Flip one byte of the data payload without touching the stored md5.
    let file = dir.path().join(".rotcheck");
    let mut envelope: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    let data = envelope["data"].as_str().unwrap().replace("a.txt", "a.txz");
    envelope["data"] = serde_json::Value::String(data);
    std::fs::write(&file, serde_json::to_string(&envelope).unwrap()).unwrap();

    match IndexStore::load(dir.path()).await {
        Err(IndexError::Damaged { .. }) => {}
        other => panic!("expected Damaged, got {:?}", other),
    }
}

#[tokio::test]
async fn unparseable_envelope_is_damaged() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join(".rotcheck"), "not json at all").unwrap();

    assert!(matches!(
        IndexStore::load(dir.path()).await,
        Err(IndexError::Damaged { .. })
    ));
}

#[tokio::test]
async fn legacy_envelope_without_ts_skips_checksum() {
    let dir = tempdir().unwrap();
    // Pre-checksum format: no ts field, md5 deliberately wrong.
    let legacy = r#"{"data":"[{\"name\":\"a.txt\",\"mod\":1,\"md5\":\"abc\"}]","md5":"bogus","v":"1.0.0"}"#;
    std::fs::write(dir.path().join(".rotcheck"), legacy).unwrap();

    let loaded = IndexStore::load(dir.path()).await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "a.txt");
}

#[tokio::test]
async fn delete_reports_whether_index_existed() {
    let dir = tempdir().unwrap();

    assert!(!IndexStore::delete(dir.path()).await.unwrap());

    IndexStore::save(dir.path(), &sample_records()).await.unwrap();
    assert!(IndexStore::delete(dir.path()).await.unwrap());
    assert!(!dir.path().join(".rotcheck").exists());
}
