use async_trait::async_trait;
use contracts::domain::a001_customer::Customer;

use crate::shared::api_utils::read_json;
use crate::shared::config::Config;
use crate::shared::debounce::SearchSource;
use crate::shared::error::ApiError;

/// HTTP-клиент для поиска покупателей
pub struct CustomerApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl CustomerApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api.base_url.clone())
    }

    /// Поиск покупателей по имени или email
    /// Endpoint: GET /user/search/{query}
    pub async fn search_customers(&self, query: &str) -> Result<Vec<Customer>, ApiError> {
        let url = format!(
            "{}/user/search/{}",
            self.base_url,
            urlencoding::encode(query)
        );

        tracing::debug!("Searching customers: {}", url);
        let response = self.client.get(&url).send().await?;
        read_json(response, "customer search").await
    }
}

#[async_trait]
impl SearchSource for CustomerApiClient {
    type Item = Customer;

    async fn search(&self, query: &str) -> Result<Vec<Customer>, ApiError> {
        self.search_customers(query).await
    }
}
