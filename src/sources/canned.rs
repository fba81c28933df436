use crate::common::*;

/// Serves the same body on every fetch.
#[derive(Debug, Clone)]
pub struct CannedSource(Bytes);

impl CannedSource {
    pub fn new<B: Into<Bytes>>(body: B) -> CannedSource {
        CannedSource(body.into())
    }
}

impl FeedSource for CannedSource {
    fn fetch(&self) -> BoxFuture<'_, RssResult<Bytes>> {
        futures::future::ready(Ok(self.0.clone())).boxed()
    }
}

/// Starts an upstream that promises more body than it sends, then hangs up.
pub async fn truncated_upstream() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let _ = stream
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 1024\r\n\r\n[{\"page\": ",
                )
                .await;
            let _ = stream.shutdown().await;
        }
    });

    format!("http://{}/content.json", addr)
}
