use async_trait::async_trait;
use log::{debug, warn};

use crate::error::FetchError;
use crate::models::{VoterPage, VoterRecord};

/// Page size sent when the whole dataset is wanted. Servers that cap the page
/// size are walked page by page until `totalRecords` rows have arrived.
pub const UNBOUNDED_LIMIT: u32 = 1_000_000;

/// Where the dashboard gets its voters from.
#[async_trait]
pub trait VoterSource: Send + Sync {
    /// The complete dataset in store order.
    async fn fetch_all(&self) -> Result<Vec<VoterRecord>, FetchError>;

    /// One server-paginated page, optionally narrowed by a free-text search.
    async fn fetch_page(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<VoterPage, FetchError>;
}

/// `VoterSource` backed by the `GET /voters` listing endpoint.
pub struct HttpVoterSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpVoterSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl VoterSource for HttpVoterSource {
    async fn fetch_all(&self) -> Result<Vec<VoterRecord>, FetchError> {
        let first = self.fetch_page(1, UNBOUNDED_LIMIT, None).await?;
        let total = first.pagination.total_records;
        let mut has_next = first.pagination.has_next_page;
        let mut voters = first.data;

        if (voters.len() as u64) < total {
            warn!(
                "{}/voters returned {} of {} voter(s) in one page; fetching the rest",
                self.base_url,
                voters.len(),
                total
            );
        }

        let mut page: u32 = 1;
        while has_next && (voters.len() as u64) < total {
            page = match page.checked_add(1) {
                Some(next) => next,
                None => break,
            };
            let next = self.fetch_page(page, UNBOUNDED_LIMIT, None).await?;
            if next.data.is_empty() {
                break;
            }
            has_next = next.pagination.has_next_page;
            voters.extend(next.data);
        }

        if (voters.len() as u64) < total {
            warn!(
                "Only {} of {} voter(s) could be fetched from {}/voters",
                voters.len(),
                total,
                self.base_url
            );
        }
        Ok(voters)
    }

    async fn fetch_page(
        &self,
        page: u32,
        limit: u32,
        search: Option<&str>,
    ) -> Result<VoterPage, FetchError> {
        let url = format!("{}/voters", self.base_url);

        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.to_string()));
        }

        let resp = self.client.get(&url).query(&query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let page: VoterPage = resp.json().await?;
        debug!(
            "Fetched {} voter(s) from {} (page {} of {})",
            page.data.len(),
            url,
            page.pagination.current_page,
            page.pagination.total_pages
        );
        Ok(page)
    }
}
