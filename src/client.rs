use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FeedError, NetworkError, Result};
use crate::query::PageSource;
use crate::responses::Page;

const USERS_PATH: &str = "api/users/GetUsersList";

pub struct UserClient {
    http: Client,
    endpoint: Url,
}

impl UserClient {
    /// `api_url` must end with a slash, see [`crate::config::parse_api_url`].
    pub fn new(api_url: &Url) -> Result<Self> {
        let endpoint = api_url
            .join(USERS_PATH)
            .map_err(|_| FeedError::InvalidUrl(api_url.to_string()))?;

        Ok(Self {
            http: Client::new(),
            endpoint,
        })
    }

    #[cfg(test)]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub async fn fetch_users(
        &self,
        skip: usize,
        take: usize,
    ) -> std::result::Result<Page, NetworkError> {
        debug!(url = %self.endpoint, skip, take, "Fetching users page");

        let response = self
            .http
            .get(self.endpoint.clone())
            .query(&[("take", take), ("skip", skip)])
            .send()
            .await
            .map_err(|e| NetworkError::transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), skip, "Users request failed");
            return Err(NetworkError::status(status.as_u16(), &body));
        }

        let page: Page = response
            .json()
            .await
            .map_err(|e| NetworkError::transport(&e))?;

        debug!(received = page.users.len(), total = page.total, "Users page received");
        Ok(page)
    }
}

impl PageSource for UserClient {
    async fn fetch_page(&self, skip: usize, take: usize) -> std::result::Result<Page, NetworkError> {
        self.fetch_users(skip, take).await
    }
}
