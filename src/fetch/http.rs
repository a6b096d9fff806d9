//! reqwest-backed fetcher for the working paper archive

use super::{paper_url, DocumentFetcher, FetchError};
use crate::config::DEFAULT_BASE_URL;

pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// One pooled client for the whole run, default redirect policy
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paper-scan/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl DocumentFetcher for HttpFetcher {
    fn url_for(&self, id: u64) -> String {
        paper_url(&self.base_url, id)
    }

    async fn fetch(&self, id: u64) -> Result<Vec<u8>, FetchError> {
        let url = self.url_for(id);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        log::debug!("Downloaded {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn local_fetcher(base: &str) -> HttpFetcher {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpFetcher::with_client(client, base)
    }

    /// Serve exactly one canned HTTP response, returning the request line
    async fn serve_once(response: &'static [u8]) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });

        (base, handle)
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let (base, server) = serve_once(
            b"HTTP/1.1 200 OK\r\nContent-Type: application/pdf\r\nContent-Length: 9\r\nConnection: close\r\n\r\n%PDF-1.4\n",
        )
        .await;

        let fetcher = local_fetcher(&base);
        let body = fetcher.fetch(100).await.unwrap();
        assert_eq!(body, b"%PDF-1.4\n");

        let request_line = server.await.unwrap();
        assert_eq!(
            request_line,
            "GET /system/files/working_papers/w100/w100.pdf HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_reports_status() {
        let (base, server) = serve_once(
            b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        )
        .await;

        let fetcher = local_fetcher(&base);
        let err = fetcher.fetch(101).await.unwrap_err();
        assert!(err.is_not_found());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_reports_transport_failure() {
        // Bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let fetcher = local_fetcher(&base);
        let err = fetcher.fetch(102).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_url_for_uses_base() {
        let fetcher = HttpFetcher::new("http://mirror.local/").unwrap();
        assert_eq!(fetcher.base_url(), "http://mirror.local");
        assert_eq!(
            fetcher.url_for(42),
            "http://mirror.local/system/files/working_papers/w42/w42.pdf"
        );
        assert_eq!(
            HttpFetcher::default().url_for(1),
            "https://www.nber.org/system/files/working_papers/w1/w1.pdf"
        );
    }
}
