use std::time::Duration;

use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use tracing::debug;

use crate::error::{Result, ScrapeError};

const BROWSER_UA: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| Client::builder().build().map_err(ScrapeError::Client))
}

/// Source of raw page text. Scrapers only see pages through this trait.
pub trait PageFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        (**self).fetch(url, timeout)
    }
}

/// Blocking GET against the live site.
#[derive(Debug, Clone, Copy)]
pub struct HttpFetcher {
    client: &'static Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, timeout: Duration) -> Result<String> {
        debug!(url, timeout_secs = timeout.as_secs(), "fetching page");
        let network = |source: reqwest::Error| ScrapeError::Network {
            url: url.to_string(),
            source,
        };
        let resp = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_UA)
            .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .timeout(timeout)
            .send()
            .map_err(network)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().map_err(network)?;
        debug!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
