use async_trait::async_trait;
use contracts::domain::a003_order::{Order, OrderId, OrderListResponse, SubmitOrderRequest};
use contracts::shared::indicators::SalesPoint;

use crate::shared::api_utils::{build_query, read_json, read_ok, with_query};
use crate::shared::config::Config;
use crate::shared::error::ApiError;

/// Репозиторий заказов. Абстракция над backend API, чтобы контроллер
/// списка и дашборды можно было тестировать без сети.
#[async_trait]
pub trait OrderApi: Send + Sync {
    /// Получить один заказ по id
    async fn get_one(&self, id: OrderId) -> Result<Order, ApiError>;

    /// Получить страницу заказов с фильтрами
    async fn get_many(
        &self,
        filters: &[(String, String)],
        page: usize,
        limit: usize,
    ) -> Result<OrderListResponse, ApiError>;

    /// Полнотекстовый поиск заказов
    async fn search(&self, query: &str) -> Result<Vec<Order>, ApiError>;

    /// Создать заказ
    async fn create(&self, payload: &SubmitOrderRequest) -> Result<Order, ApiError>;

    /// Обновить заказ
    async fn update(&self, id: OrderId, payload: &SubmitOrderRequest) -> Result<Order, ApiError>;

    /// Удалить один заказ
    async fn delete_one(&self, id: OrderId) -> Result<(), ApiError>;

    /// Удалить несколько заказов. Контракт — всё или ничего: частичный
    /// успех наружу не отдаётся.
    async fn delete_many(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, ApiError>;

    /// Помесячная серия продаж за всё время
    async fn total_sales(&self) -> Result<Vec<SalesPoint>, ApiError>;

    /// Помесячная серия возвратов за всё время
    async fn total_refunds(&self) -> Result<Vec<SalesPoint>, ApiError>;

    /// Помесячная серия продаж за год
    async fn sales_in_year(&self, year: i32) -> Result<Vec<SalesPoint>, ApiError>;
}

/// HTTP-клиент для работы с заказами
#[derive(Clone)]
pub struct OrderApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl OrderApiClient {
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
}

#[async_trait]
impl OrderApi for OrderApiClient {
    async fn get_one(&self, id: OrderId) -> Result<Order, ApiError> {
        let url = format!("{}/order/{}", self.base_url, id.value());
        let response = self.client.get(&url).send().await?;
        read_json(response, "order fetch").await
    }

    async fn get_many(
        &self,
        filters: &[(String, String)],
        page: usize,
        limit: usize,
    ) -> Result<OrderListResponse, ApiError> {
        let mut params = filters.to_vec();
        params.push(("page".to_string(), page.to_string()));
        params.push(("limit".to_string(), limit.to_string()));

        let url = with_query(&format!("{}/order", self.base_url), &build_query(&params));
        tracing::debug!("Fetching orders: {}", url);

        let response = self.client.get(&url).send().await?;
        read_json(response, "order list").await
    }

    async fn search(&self, query: &str) -> Result<Vec<Order>, ApiError> {
        let url = format!(
            "{}/order/search/{}",
            self.base_url,
            urlencoding::encode(query)
        );
        let response = self.client.get(&url).send().await?;
        read_json(response, "order search").await
    }

    async fn create(&self, payload: &SubmitOrderRequest) -> Result<Order, ApiError> {
        let url = format!("{}/order", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;
        read_json(response, "order create").await
    }

    async fn update(&self, id: OrderId, payload: &SubmitOrderRequest) -> Result<Order, ApiError> {
        let url = format!("{}/order/{}", self.base_url, id.value());
        let response = self.client.put(&url).json(payload).send().await?;
        read_json(response, "order update").await
    }

    async fn delete_one(&self, id: OrderId) -> Result<(), ApiError> {
        let url = format!("{}/order/{}", self.base_url, id.value());
        let response = self.client.delete(&url).send().await?;
        read_ok(response, "order delete").await
    }

    async fn delete_many(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, ApiError> {
        // Каждое удаление уходит отдельной задачей, барьер ниже ждёт все
        let mut dispatched = Vec::with_capacity(ids.len());
        for &id in ids {
            let api = self.clone();
            dispatched.push((id, tokio::spawn(async move { api.delete_one(id).await })));
        }

        join_delete_batch(dispatched).await
    }

    async fn total_sales(&self) -> Result<Vec<SalesPoint>, ApiError> {
        let url = format!("{}/order/total-sales", self.base_url);
        let response = self.client.get(&url).send().await?;
        read_json(response, "total sales").await
    }

    async fn total_refunds(&self) -> Result<Vec<SalesPoint>, ApiError> {
        let url = format!("{}/order/total-refunds", self.base_url);
        let response = self.client.get(&url).send().await?;
        read_json(response, "total refunds").await
    }

    async fn sales_in_year(&self, year: i32) -> Result<Vec<SalesPoint>, ApiError> {
        let url = format!("{}/order/sales-in-months-of-year/{}", self.base_url, year);
        let response = self.client.get(&url).send().await?;
        read_json(response, "yearly sales").await
    }
}

/// Дождаться всех отправленных удалений.
///
/// Удаления, уже ушедшие на сервер, не отменяются: даже после первой
/// ошибки остальные задачи дорабатывают до конца. Успех — только когда
/// удалились все; иначе наружу уходит первая ошибка.
async fn join_delete_batch(
    dispatched: Vec<(OrderId, tokio::task::JoinHandle<Result<(), ApiError>>)>,
) -> Result<Vec<OrderId>, ApiError> {
    let mut deleted = Vec::with_capacity(dispatched.len());
    let mut first_error: Option<ApiError> = None;

    for (id, handle) in dispatched {
        match handle.await {
            Ok(Ok(())) => deleted.push(id),
            Ok(Err(e)) => {
                tracing::error!("Failed to delete order {}: {}", id.value(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
            Err(e) => {
                tracing::error!("Delete task for order {} failed to join: {}", id.value(), e);
                if first_error.is_none() {
                    first_error = Some(ApiError::server(e.to_string()));
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(deleted),
    }
}
