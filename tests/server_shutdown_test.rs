// ABOUTME: Integration test for graceful server shutdown with attached SSE clients
// ABOUTME: Serves on an ephemeral port and checks the server exits once the signal fires
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_router, create_test_service};
use std::time::Duration;
use task_log_stream::server;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// Open a raw HTTP/1.1 SSE request and wait until the greeting arrives
async fn open_raw_stream(addr: std::net::SocketAddr, task_id: &str) -> TcpStream {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /api/logs/stream/{task_id} HTTP/1.1\r\nHost: localhost\r\nAccept: text/event-stream\r\n\r\n"
    );
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut received = String::new();
    let mut buf = [0_u8; 4096];
    tokio::time::timeout(Duration::from_secs(2), async {
        while !received.contains("CONNECTION") {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before greeting");
            received.push_str(&String::from_utf8_lossy(&buf[..n]));
        }
    })
    .await
    .expect("greeting not received");

    socket
}

#[tokio::test]
async fn test_shutdown_with_open_stream_finishes() {
    let service = create_test_service();
    let app = create_test_router(&service);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (trigger, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(listener, app, service.clone(), async move {
        let _ = signal.await;
    }));

    let _socket = open_raw_stream(addr, "task-1").await;
    assert!(service.has_connection("task-1"));

    trigger.send(()).unwrap();

    let finished = tokio::time::timeout(Duration::from_secs(3), handle).await;
    assert!(finished.is_ok(), "server did not exit after shutdown signal");
    finished.unwrap().unwrap().unwrap();
    assert_eq!(service.active_connection_count(), 0);
}

#[tokio::test]
async fn test_shutdown_without_clients_finishes() {
    let service = create_test_service();
    let app = create_test_router(&service);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();

    let (trigger, signal) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(listener, app, service, async move {
        let _ = signal.await;
    }));

    trigger.send(()).unwrap();

    let finished = tokio::time::timeout(Duration::from_secs(3), handle).await;
    assert!(finished.is_ok());
    finished.unwrap().unwrap().unwrap();
}
