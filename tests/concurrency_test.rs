mod common;

use common::{connect, random_bytes, spawn_server};
use scli::client::Connection;

const WRITERS: usize = 8;

#[tokio::test]
async fn concurrent_writers_on_distinct_paths() {
    let server = spawn_server().await;
    let addr = server.addr.to_string();

    let mut tasks = Vec::new();
    for writer in 0..WRITERS {
        let addr = addr.clone();
        let content = random_bytes(3 * 1024 + writer);
        tasks.push(tokio::spawn(async move {
            let name = format!("writer-{}.bin", writer);
            let mut conn = Connection::open(&addr).await.unwrap();
            conn.write(&name, &content).await.unwrap();
            (name, content)
        }));
    }

    let mut conn = connect(&server).await;
    for task in tasks {
        let (name, content) = task.await.unwrap();
        assert_eq!(conn.get(&name).await.unwrap(), content);
        assert_eq!(conn.ls(&name).await.unwrap(), 1);
    }
}

#[tokio::test]
async fn concurrent_writers_on_one_path() {
    let server = spawn_server().await;
    let addr = server.addr.to_string();

    let mut tasks = Vec::new();
    for writer in 0..WRITERS {
        let addr = addr.clone();
        let content = random_bytes(2 * 1024 + writer);
        tasks.push(tokio::spawn(async move {
            let mut conn = Connection::open(&addr).await.unwrap();
            conn.write("contested.bin", &content).await.unwrap();
            content
        }));
    }

    let mut contents = Vec::new();
    for task in tasks {
        contents.push(task.await.unwrap());
    }

    // Writes serialize; the file is some writer's content in full.
    let mut conn = connect(&server).await;
    let got = conn.get("contested.bin").await.unwrap();
    assert!(contents.iter().any(|content| content == &got));
    assert_eq!(conn.ls("contested.bin").await.unwrap(), WRITERS as u64);
}

#[tokio::test]
async fn rm_then_get_reports_not_found() {
    let server = spawn_server().await;
    let mut conn = connect(&server).await;

    conn.write("doomed.txt", b"short lived").await.unwrap();
    conn.rm("doomed.txt").await.unwrap();

    let err = conn.get("doomed.txt").await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}
