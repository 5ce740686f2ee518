use std::sync::Arc;

use contracts::shared::indicators::{calculate_growth, SalesPoint, TrendDirection};

use crate::domain::a003_order::api::OrderApi;
use crate::shared::error::ApiError;

/// One headline figure with its month-over-month trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendStat {
    /// Value of the most recent month in the series
    pub latest: f64,
    pub growth: f64,
    pub growth_percentage: f64,
    pub direction: TrendDirection,
}

/// Sales summary card data for one year.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesSummary {
    pub total_sales: TrendStat,
    pub total_refunds: TrendStat,
    pub monthly: Vec<SalesPoint>,
}

/// Builds the sales summary out of the three aggregate series the order
/// repository exposes.
pub struct SalesSummaryService {
    api: Arc<dyn OrderApi>,
}

impl SalesSummaryService {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self { api }
    }

    /// The three queries go out concurrently; any failure fails the load.
    pub async fn load(&self, year: i32) -> Result<SalesSummary, ApiError> {
        let (sales, refunds, monthly) = tokio::join!(
            self.api.total_sales(),
            self.api.total_refunds(),
            self.api.sales_in_year(year),
        );

        Ok(SalesSummary {
            total_sales: derive_stat(&sales?),
            total_refunds: derive_stat(&refunds?),
            monthly: monthly?,
        })
    }
}

/// Latest value and trend of one monthly series.
pub fn derive_stat(series: &[SalesPoint]) -> TrendStat {
    let indicator = calculate_growth(series, |point| point.sales);

    TrendStat {
        latest: series.last().map(|point| point.sales).unwrap_or(0.0),
        growth: indicator.growth,
        growth_percentage: indicator.growth_percentage,
        direction: TrendDirection::from_percentage(indicator.growth_percentage),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::domain::a003_order::{Order, OrderId, OrderListResponse, SubmitOrderRequest};
    use std::sync::Mutex;

    fn series(values: &[f64]) -> Vec<SalesPoint> {
        values
            .iter()
            .map(|&sales| SalesPoint { month: None, sales })
            .collect()
    }

    #[test]
    fn test_derive_stat_for_growing_series() {
        let stat = derive_stat(&series(&[100.0, 150.0]));
        assert_eq!(stat.latest, 150.0);
        assert_eq!(stat.growth, 0.05);
        assert_eq!(stat.growth_percentage, 50.0);
        assert_eq!(stat.direction, TrendDirection::Upward);
    }

    #[test]
    fn test_derive_stat_for_shrinking_series() {
        let stat = derive_stat(&series(&[150.0, 100.0]));
        assert_eq!(stat.latest, 100.0);
        assert_eq!(stat.direction, TrendDirection::Downward);
    }

    #[test]
    fn test_derive_stat_for_empty_series() {
        let stat = derive_stat(&[]);
        assert_eq!(stat.latest, 0.0);
        assert_eq!(stat.growth, 0.0);
        assert_eq!(stat.growth_percentage, 0.0);
        assert_eq!(stat.direction, TrendDirection::Upward);
    }

    struct CannedApi {
        sales: Vec<SalesPoint>,
        refunds: Result<Vec<SalesPoint>, ApiError>,
        monthly: Vec<SalesPoint>,
        requested_year: Mutex<Option<i32>>,
    }

    #[async_trait]
    impl OrderApi for CannedApi {
        async fn get_one(&self, _id: OrderId) -> Result<Order, ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn get_many(
            &self,
            _filters: &[(String, String)],
            _page: usize,
            _limit: usize,
        ) -> Result<OrderListResponse, ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn search(&self, _query: &str) -> Result<Vec<Order>, ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn create(&self, _payload: &SubmitOrderRequest) -> Result<Order, ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn update(
            &self,
            _id: OrderId,
            _payload: &SubmitOrderRequest,
        ) -> Result<Order, ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn delete_one(&self, _id: OrderId) -> Result<(), ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn delete_many(&self, _ids: &[OrderId]) -> Result<Vec<OrderId>, ApiError> {
            unimplemented!("not exercised by the dashboard")
        }

        async fn total_sales(&self) -> Result<Vec<SalesPoint>, ApiError> {
            Ok(self.sales.clone())
        }

        async fn total_refunds(&self) -> Result<Vec<SalesPoint>, ApiError> {
            self.refunds.clone()
        }

        async fn sales_in_year(&self, year: i32) -> Result<Vec<SalesPoint>, ApiError> {
            *self.requested_year.lock().unwrap() = Some(year);
            Ok(self.monthly.clone())
        }
    }

    #[tokio::test]
    async fn test_load_combines_all_three_series() {
        let api = Arc::new(CannedApi {
            sales: series(&[100.0, 150.0]),
            refunds: Ok(series(&[50.0, 25.0])),
            monthly: series(&[10.0, 20.0, 30.0]),
            requested_year: Mutex::new(None),
        });
        let dyn_api: Arc<dyn OrderApi> = api.clone();

        let summary = SalesSummaryService::new(dyn_api).load(2024).await.unwrap();

        assert_eq!(summary.total_sales.latest, 150.0);
        assert_eq!(summary.total_sales.direction, TrendDirection::Upward);
        assert_eq!(summary.total_refunds.latest, 25.0);
        assert_eq!(summary.total_refunds.direction, TrendDirection::Downward);
        assert_eq!(summary.monthly.len(), 3);
        assert_eq!(*api.requested_year.lock().unwrap(), Some(2024));
    }

    #[tokio::test]
    async fn test_load_fails_when_any_series_fails() {
        let api = Arc::new(CannedApi {
            sales: series(&[100.0]),
            refunds: Err(ApiError::server("refunds unavailable")),
            monthly: series(&[10.0]),
            requested_year: Mutex::new(None),
        });
        let dyn_api: Arc<dyn OrderApi> = api;

        let result = SalesSummaryService::new(dyn_api).load(2024).await;

        assert_eq!(result, Err(ApiError::server("refunds unavailable")));
    }
}
