// ABOUTME: Blocking HTTP client for the Qiita Team API
// ABOUTME: Paginates the user's items and downloads images with the bearer token

use crate::images::ImageFetcher;
use crate::storage::write_atomic;
use crate::{Error, Item, Result};
use reqwest::blocking::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const PER_PAGE: u32 = 100;
pub const DEFAULT_MAX_PAGES: u32 = 50;

const ITEMS_ENDPOINT: &str = "/authenticated_user/items";

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}

/// `https://<team>.qiita.com/api/v2`
pub fn team_base_url(team: &str) -> String {
    format!("https://{}.qiita.com/api/v2", team)
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    max_pages: u32,
}

impl ApiClient {
    pub fn new(token: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("qiita-export/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(ApiClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Raise (or lower) the pagination ceiling. Zero is treated as one page.
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    fn get(&self, url: &str) -> Result<Response> {
        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(Error::Api {
                endpoint: url.to_string(),
                status: status.as_u16(),
                message: truncate_str(&message, 100),
            });
        }

        Ok(response)
    }

    pub fn fetch_page(&self, page: u32) -> Result<Vec<Item>> {
        let url = format!(
            "{}{}?per_page={}&page={}",
            self.base_url, ITEMS_ENDPOINT, PER_PAGE, page
        );

        let body = self.get(&url)?.text()?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(
                page,
                body = %truncate_str(&body, 500),
                "failed to parse items page: {}",
                e
            );
            Error::Parse(e)
        })
    }

    /// Every item of the authenticated user, in API order.
    ///
    /// Stops at the first empty page or after `max_pages` requests.
    pub fn fetch_all_items(&self) -> Result<Vec<Item>> {
        let mut items = Vec::new();

        for page in 1..=self.max_pages {
            let batch = self.fetch_page(page)?;
            if batch.is_empty() {
                return Ok(items);
            }

            info!(page, count = batch.len(), "fetched items page");
            let full = batch.len() as u32 >= PER_PAGE;
            items.extend(batch);

            if page == self.max_pages && full {
                warn!(
                    max_pages = self.max_pages,
                    "page limit reached; items beyond {} are not exported",
                    items.len()
                );
            }
        }

        Ok(items)
    }

    fn is_api_host(&self, url: &str) -> bool {
        let host = |s: &str| -> Option<String> {
            url::Url::parse(s).ok()?.host_str().map(str::to_owned)
        };
        matches!((host(url), host(&self.base_url)), (Some(a), Some(b)) if a == b)
    }
}

impl ImageFetcher for ApiClient {
    fn download_image(&self, url: &str, dest: &Path) -> Result<()> {
        if !self.is_api_host(url) {
            warn!(url, "sending API token to a host other than the API");
        }

        let bytes = self.get(url)?.bytes()?;
        write_atomic(dest, &bytes)?;

        debug!(path = %dest.display(), bytes = bytes.len(), "saved image");
        Ok(())
    }
}
