//! Raw TCP gateways for tests that need a server which never answers.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Accepts connections and never answers.
pub async fn silent_server() -> String {
    stub_server(&["/"], "").await
}

/// Answers every request with `200` and `body`, except requests whose path
/// starts with one of `hang_paths`: those connections are held open unanswered.
pub async fn stub_server(hang_paths: &[&str], body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hang_paths: Vec<String> = hang_paths.iter().map(|p| p.to_string()).collect();
    let body = body.to_string();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let hang_paths = hang_paths.clone();
            let body = body.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let head = String::from_utf8_lossy(&buf[..n]);
                let path = head.split_whitespace().nth(1).unwrap_or("");

                if hang_paths.iter().any(|p| path.starts_with(p.as_str())) {
                    std::future::pending::<()>().await;
                }

                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", addr)
}
