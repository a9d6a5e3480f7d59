//! Acquisition of the intraday market table.
//!
//! The upstream site publishes the current day's report as a spreadsheet
//! linked from a market page. [`ReportSource`] walks that pipeline each
//! invocation:
//!
//! 1. fetch the market page HTML,
//! 2. locate the report attachment link ([`page`]),
//! 3. download the spreadsheet (bounded, streamed),
//! 4. decode it into a [`Table`] ([`sheet`]).
//!
//! No decision logic lives here - the output is handed to the resolver via
//! the [`TableSource`] seam, and any failure simply surfaces as a
//! [`FetchError`] for the retry layer to absorb.

mod page;
mod sheet;

pub use page::find_report_link;
pub use sheet::parse_sheet;

use std::time::Duration;

use async_trait::async_trait;
use blockwatch_core::TableSource;
use blockwatch_types::Table;
use futures_util::StreamExt;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// Acquisition failure. All variants are non-fatal to the run: the retry
/// orchestrator logs them and tries again, and the resolver degrades
/// gracefully when nothing usable comes back.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("download exceeded the {limit_bytes} byte limit")]
    TooLarge { limit_bytes: u64 },

    #[error("report attachment container not found in market page")]
    MissingAttachmentContainer,

    #[error("report attachment link has no usable href")]
    MissingAttachmentLink,

    #[error("report link {href:?} does not resolve against {base}: {source}")]
    BadLink {
        href: String,
        base: Url,
        #[source]
        source: url::ParseError,
    },

    #[error("could not decode spreadsheet: {0}")]
    Sheet(#[from] calamine::Error),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error("worksheet has no header row")]
    MissingHeaderRow,
}

/// Where and how to fetch the report.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// The market page listing the report attachment.
    pub page_url: Url,
    /// Base URL the attachment href is joined against.
    pub base_url: Url,
    /// Zero-based worksheet row holding the column headers.
    pub header_row: usize,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header value.
    pub user_agent: String,
    /// Upper bound on the spreadsheet download size.
    pub max_download_bytes: u64,
}

impl FetchConfig {
    #[must_use]
    pub fn new(page_url: Url, base_url: Url) -> Self {
        Self {
            page_url,
            base_url,
            header_row: 5,
            timeout: Duration::from_secs(10),
            user_agent: concat!("blockwatch/", env!("CARGO_PKG_VERSION")).to_string(),
            max_download_bytes: 10 * 1024 * 1024,
        }
    }
}

/// The acquisition collaborator: produces a fresh [`Table`] per call.
#[derive(Debug)]
pub struct ReportSource {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ReportSource {
    /// # Errors
    ///
    /// [`FetchError::Client`] when the HTTP client cannot be constructed.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, config })
    }

    /// Run the full acquisition pipeline once.
    pub async fn acquire(&self) -> Result<Table, FetchError> {
        let html = self.fetch_text(self.config.page_url.clone()).await?;
        let link = page::find_report_link(&html, &self.config.base_url)?;
        info!(%link, "downloading market report");
        let bytes = self.fetch_bytes(link).await?;
        debug!(bytes = bytes.len(), "report downloaded");
        sheet::parse_sheet(&bytes, self.config.header_row)
    }

    async fn fetch_text(&self, url: Url) -> Result<String, FetchError> {
        let response = self.get_checked(url.clone()).await?;
        response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })
    }

    /// Streamed download with a hard size cap, so a misbehaving upstream
    /// cannot balloon memory.
    async fn fetch_bytes(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let limit_bytes = self.config.max_download_bytes;
        let response = self.get_checked(url.clone()).await?;

        let mut body: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;
            if (body.len() + chunk.len()) as u64 > limit_bytes {
                return Err(FetchError::TooLarge { limit_bytes });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    async fn get_checked(&self, url: Url) -> Result<reqwest::Response, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl TableSource for ReportSource {
    type Error = FetchError;

    async fn produce(&mut self) -> Result<Table, FetchError> {
        self.acquire().await
    }
}
