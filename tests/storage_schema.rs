use cogbot::storage::{self, Storage};
use std::fs;
use std::path::PathBuf;

fn temp_db(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cogbot-{}-{}.db", name, std::process::id()))
}

#[test]
fn schema_application_is_idempotent() {
    let path = temp_db("idempotent");
    let _ = fs::remove_file(&path);

    storage::apply_schema(&path).unwrap();
    {
        let store = Storage::open(&path).unwrap();
        assert!(store.blacklist_add(7).unwrap());
        store.warn_add(7, 1, 2, "spamming").unwrap();
    }

    // A restart runs the script again over the live file.
    storage::apply_schema(&path).unwrap();

    let store = Storage::open(&path).unwrap();
    assert!(store.is_blacklisted(7).unwrap());
    let warns = store.warns_for(7, 1).unwrap();
    assert_eq!(warns.len(), 1);
    assert_eq!(warns[0].reason, "spamming");

    drop(store);
    let _ = fs::remove_file(&path);
}
