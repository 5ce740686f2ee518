use async_trait::async_trait;
use contracts::domain::a002_product::Product;

use crate::shared::api_utils::read_json;
use crate::shared::config::Config;
use crate::shared::debounce::SearchSource;
use crate::shared::error::ApiError;

/// HTTP-клиент для поиска товаров
pub struct ProductApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProductApiClient {
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

    /// Поиск товаров по названию
    /// Endpoint: GET /product/search/{query}
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let url = format!(
            "{}/product/search/{}",
            self.base_url,
            urlencoding::encode(query)
        );

        tracing::debug!("Searching products: {}", url);
        let response = self.client.get(&url).send().await?;
        read_json(response, "product search").await
    }
}

#[async_trait]
impl SearchSource for ProductApiClient {
    type Item = Product;

    async fn search(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.search_products(query).await
    }
}
