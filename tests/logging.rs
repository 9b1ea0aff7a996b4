use std::{fs, thread::sleep, time::Duration};

use tempfile::tempdir;

#[test]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("graph.log");

    let guard = content_graph::logging::init(true, Some(path.as_path()));
    assert!(guard.is_some());
    tracing::info!("graph log line");

    sleep(Duration::from_millis(100));
    drop(guard);

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("graph log line"));
}
