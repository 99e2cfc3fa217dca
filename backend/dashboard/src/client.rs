use thiserror::Error;

pub const LOAD_FAILED: &str = "Failed to load data";

/// Whatever went wrong, the viewer only ever sees [`LOAD_FAILED`].
#[derive(Error, Debug)]
#[error("Failed to load data")]
pub struct LoadError {
    #[from]
    source: reqwest::Error,
}

impl LoadError {
    pub fn cause(&self) -> &reqwest::Error {
        &self.source
    }
}

/// One GET against the backend, expecting `string[][]`.
pub async fn fetch_rows(url: &str) -> Result<Vec<Vec<String>>, LoadError> {
    let rows = reqwest::get(url)
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Answers a single request with a canned HTTP response.
    async fn serve_once(response: impl Into<String>) -> String {
        let response = response.into();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{address}/api/sweepstakes")
    }

    #[tokio::test]
    async fn test_rows() {
        let body = r#"[["0xAB","t","1"]]"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let rows = fetch_rows(&serve_once(response).await).await.unwrap();

        assert_eq!(rows, vec![vec!["0xAB", "t", "1"]]);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let error = fetch_rows(&format!("http://{address}/")).await.unwrap_err();

        assert_eq!(error.to_string(), LOAD_FAILED);
        assert!(error.cause().is_connect());
    }

    #[tokio::test]
    async fn test_server_error() {
        let url = serve_once(
            "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;

        let error = fetch_rows(&url).await.unwrap_err();

        assert_eq!(error.to_string(), LOAD_FAILED);
        assert!(error.cause().is_status());
    }

    #[tokio::test]
    async fn test_not_rows() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\n\
             content-length: 2\r\nconnection: close\r\n\r\n{}",
        )
        .await;

        let error = fetch_rows(&url).await.unwrap_err();

        assert_eq!(error.to_string(), LOAD_FAILED);
        assert!(error.cause().is_decode());
    }
}
