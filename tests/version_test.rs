mod common;

use common::{connect, spawn_server, spawn_server_with_reset};
use stash::registry::Registry;

#[test]
fn versions_start_at_one_and_increase() {
    let mut registry = Registry::new(false);
    assert_eq!(registry.record_write("a.txt"), 1);
    assert_eq!(registry.record_write("a.txt"), 2);
    assert_eq!(registry.record_write("a.txt"), 3);
    assert_eq!(registry.lookup("a.txt"), Some(3));
    assert_eq!(registry.lookup("b.txt"), None);
}

#[test]
fn forget_keeps_the_counter_by_default() {
    let mut registry = Registry::new(false);
    registry.record_write("a.txt");
    registry.record_write("a.txt");
    registry.forget("a.txt");
    assert_eq!(registry.lookup("a.txt"), None);
    // A later write resumes past the old counter.
    assert_eq!(registry.record_write("a.txt"), 3);
}

#[test]
fn forget_resets_when_configured() {
    let mut registry = Registry::new(true);
    registry.record_write("a.txt");
    registry.record_write("a.txt");
    registry.forget("a.txt");
    assert_eq!(registry.lookup("a.txt"), None);
    assert_eq!(registry.record_write("a.txt"), 1);
}

#[tokio::test]
async fn repeated_writes_increment_version() {
    let server = spawn_server().await;
    let mut conn = connect(&server).await;

    // The write reply is a bare OK; the version only shows through LS.
    for round in 1..=3u64 {
        conn.write("counted.txt", b"content").await.unwrap();
        assert_eq!(conn.ls("counted.txt").await.unwrap(), round);
    }
}

#[tokio::test]
async fn removed_path_resumes_past_old_version() {
    let server = spawn_server().await;
    let mut conn = connect(&server).await;

    conn.write("a.txt", b"one").await.unwrap();
    conn.write("a.txt", b"two").await.unwrap();
    conn.rm("a.txt").await.unwrap();

    let err = conn.ls("a.txt").await.unwrap_err();
    assert!(err.to_string().contains("not found"));

    conn.write("a.txt", b"three").await.unwrap();
    assert_eq!(conn.ls("a.txt").await.unwrap(), 3);
}

#[tokio::test]
async fn removed_path_restarts_at_one_when_resetting() {
    let server = spawn_server_with_reset(true).await;
    let mut conn = connect(&server).await;

    conn.write("a.txt", b"one").await.unwrap();
    conn.write("a.txt", b"two").await.unwrap();
    conn.rm("a.txt").await.unwrap();

    conn.write("a.txt", b"fresh").await.unwrap();
    assert_eq!(conn.ls("a.txt").await.unwrap(), 1);
}
