//! Document fetching
//!
//! Builds the archive address for a paper number and downloads the PDF.
//! No retries and no timeout override: a failed paper is reported once
//! and the caller decides what to do with it.

pub mod http;

pub use http::HttpFetcher;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Server answered with a non-success status (404 for unknown papers)
    #[error("HTTP error {status} for {url}")]
    Http { url: String, status: u16 },

    /// Connection, TLS or body read failure
    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Address of paper `id`: `<base>/system/files/working_papers/w<id>/w<id>.pdf`
pub fn paper_url(base_url: &str, id: u64) -> String {
    format!(
        "{}/system/files/working_papers/w{id}/w{id}.pdf",
        base_url.trim_end_matches('/')
    )
}

/// Source of raw document bytes
#[allow(async_fn_in_trait)]
pub trait DocumentFetcher {
    /// Address the document will be requested from
    fn url_for(&self, id: u64) -> String;

    /// Download the full body of document `id`
    async fn fetch(&self, id: u64) -> Result<Vec<u8>, FetchError>;
}
