use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use contracts::domain::a003_order::{Order, OrderId, SubmitOrderRequest};
use contracts::enums::DeliveryStatus;

use crate::domain::a003_order::api::OrderApi;

/// Флаги выполняющихся операций списка
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpFlags {
    pub fetch: bool,
    pub create: bool,
    pub update: bool,
    pub delete: bool,
}

/// Сообщения об ошибках по операциям. Каждая операция пишет только в
/// свой слот, поэтому результаты могут приходить в любом порядке.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpErrors {
    pub fetch: Option<String>,
    pub create: Option<String>,
    pub update: Option<String>,
    pub delete: Option<String>,
}

/// Текущий фильтр списка заказов
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderListFilter {
    pub delivery_status: Option<DeliveryStatus>,
    /// Номер страницы, с единицы
    pub page: usize,
    pub rows_per_page: usize,
}

impl Default for OrderListFilter {
    fn default() -> Self {
        Self {
            delivery_status: None,
            page: 1,
            rows_per_page: 10,
        }
    }
}

/// Состояние списка заказов.
///
/// Выбор строк живёт рядом со строками, а не внутри них: перезагрузка
/// страницы его сбрасывает, в сериализацию он не попадает.
#[derive(Debug, Clone, Default)]
pub struct OrderListState {
    pub items: Vec<Order>,
    pub selected: HashSet<OrderId>,
    /// Полное число заказов под текущим фильтром (со слов сервера)
    pub total_count: usize,
    pub filter: OrderListFilter,
    pub loading: OpFlags,
    pub errors: OpErrors,
    /// Локальная копия могла разойтись с сервером; снимается при fetch
    pub stale: bool,
}

impl OrderListState {
    // ------------------------------------------------------------------
    // Fetch
    // ------------------------------------------------------------------

    pub fn begin_fetch(&mut self) {
        self.loading.fetch = true;
        self.errors.fetch = None;
    }

    pub fn finish_fetch(&mut self, items: Vec<Order>, total_count: usize) {
        self.items = items;
        self.total_count = total_count;
        self.selected.clear();
        self.stale = false;
        self.loading.fetch = false;
    }

    pub fn fail_fetch(&mut self, message: String) {
        self.errors.fetch = Some(message);
        self.loading.fetch = false;
    }

    // ------------------------------------------------------------------
    // Create / update
    // ------------------------------------------------------------------

    pub fn begin_create(&mut self) {
        self.loading.create = true;
        self.errors.create = None;
    }

    /// Новый заказ встаёт первой строкой и не выбран. Страница после
    /// вставки длиннее серверной, так что помечаем её устаревшей.
    pub fn finish_create(&mut self, order: Order) {
        self.items.insert(0, order);
        self.stale = true;
        self.loading.create = false;
    }

    pub fn fail_create(&mut self, message: String) {
        self.errors.create = Some(message);
        self.loading.create = false;
    }

    pub fn begin_update(&mut self) {
        self.loading.update = true;
        self.errors.update = None;
    }

    pub fn finish_update(&mut self) {
        self.stale = true;
        self.loading.update = false;
    }

    pub fn fail_update(&mut self, message: String) {
        self.errors.update = Some(message);
        self.loading.update = false;
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    pub fn begin_delete(&mut self) {
        self.loading.delete = true;
        self.errors.delete = None;
    }

    pub fn finish_delete(&mut self, deleted: &[OrderId]) {
        self.items.retain(|order| !deleted.contains(&order.id));
        for id in deleted {
            self.selected.remove(id);
        }
        self.stale = true;
        self.loading.delete = false;
    }

    pub fn fail_delete(&mut self, message: String) {
        self.errors.delete = Some(message);
        self.loading.delete = false;
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn toggle_select(&mut self, id: OrderId) {
        if !self.selected.insert(id) {
            self.selected.remove(&id);
        }
    }

    /// Есть выбранные строки — снять всё; нет — выбрать все на странице
    pub fn toggle_select_all(&mut self) {
        if self.selected.is_empty() {
            self.selected = self.items.iter().map(|order| order.id).collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn selected_ids(&self) -> Vec<OrderId> {
        self.selected.iter().copied().collect()
    }

    // ------------------------------------------------------------------
    // Filter
    // ------------------------------------------------------------------

    pub fn set_delivery_status(&mut self, status: Option<DeliveryStatus>) {
        self.filter.delivery_status = status;
    }

    pub fn set_page(&mut self, page: usize) {
        self.filter.page = page;
    }

    /// Смена размера страницы возвращает на первую
    pub fn set_rows_per_page(&mut self, rows_per_page: usize) {
        self.filter.rows_per_page = rows_per_page;
        self.filter.page = 1;
    }

    /// Пары имя/значение для query string. Неустановленный фильтр уходит
    /// пустым значением и отбрасывается при сборке строки запроса.
    pub fn filter_params(&self) -> Vec<(String, String)> {
        vec![(
            "delivery_status".to_string(),
            self.filter
                .delivery_status
                .map(|status| status.code().to_string())
                .unwrap_or_default(),
        )]
    }
}

/// Контроллер списка заказов.
///
/// Держит состояние под мьютексом и репозиторий за трейтом. Ошибки
/// наружу не выходят: каждая операция записывает исход в свой слот.
#[derive(Clone)]
pub struct OrderListController {
    api: Arc<dyn OrderApi>,
    state: Arc<Mutex<OrderListState>>,
}

impl OrderListController {
    pub fn new(api: Arc<dyn OrderApi>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(OrderListState::default())),
        }
    }

    /// Снимок состояния для отображения
    pub fn snapshot(&self) -> OrderListState {
        self.lock().clone()
    }

    // Блокировка не переживает await: каждый вызов берёт её заново
    fn lock(&self) -> MutexGuard<'_, OrderListState> {
        self.state.lock().expect("order list state poisoned")
    }

    /// Перечитать текущую страницу с сервера
    pub async fn refetch(&self) {
        let (filters, page, limit) = {
            let mut state = self.lock();
            state.begin_fetch();
            (
                state.filter_params(),
                state.filter.page,
                state.filter.rows_per_page,
            )
        };

        match self.api.get_many(&filters, page, limit).await {
            Ok(response) => self.lock().finish_fetch(response.items, response.total),
            Err(e) => self.lock().fail_fetch(e.to_string()),
        }
    }

    pub async fn set_delivery_status(&self, status: Option<DeliveryStatus>) {
        self.lock().set_delivery_status(status);
        self.refetch().await;
    }

    pub async fn set_page(&self, page: usize) {
        self.lock().set_page(page);
        self.refetch().await;
    }

    pub async fn set_rows_per_page(&self, rows_per_page: usize) {
        self.lock().set_rows_per_page(rows_per_page);
        self.refetch().await;
    }

    pub async fn create(&self, payload: &SubmitOrderRequest) {
        self.lock().begin_create();

        match self.api.create(payload).await {
            Ok(order) => self.lock().finish_create(order),
            Err(e) => self.lock().fail_create(e.to_string()),
        }
    }

    pub async fn update(&self, id: OrderId, payload: &SubmitOrderRequest) {
        self.lock().begin_update();

        match self.api.update(id, payload).await {
            Ok(_) => self.lock().finish_update(),
            Err(e) => self.lock().fail_update(e.to_string()),
        }
    }

    /// Удалить выбранные заказы одним батчем.
    ///
    /// Пустой выбор — no-op без запроса. Батч «всё или ничего»: при
    /// ошибке строки остаются на месте, сообщение ложится в слот delete.
    pub async fn delete_selected(&self) {
        let ids = self.lock().selected_ids();
        if ids.is_empty() {
            return;
        }

        self.lock().begin_delete();

        match self.api.delete_many(&ids).await {
            Ok(deleted) => self.lock().finish_delete(&deleted),
            Err(e) => self.lock().fail_delete(e.to_string()),
        }
    }

    pub fn toggle_select(&self, id: OrderId) {
        self.lock().toggle_select(id);
    }

    pub fn toggle_select_all(&self) {
        self.lock().toggle_select_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::ApiError;
    use async_trait::async_trait;
    use contracts::domain::a001_customer::{Address, CustomerId};
    use contracts::domain::a003_order::{Billing, OrderListResponse, OrderState, Shipping};
    use contracts::domain::common::EntityMetadata;
    use contracts::shared::indicators::SalesPoint;

    fn order() -> Order {
        Order {
            id: OrderId::new_v4(),
            customer: CustomerId::new_v4(),
            lines: Vec::new(),
            shipping: Shipping {
                address: Address::default(),
            },
            billing: Billing {
                address: Address::default(),
                payment_method: contracts::enums::PaymentMethod::CashOnDelivery,
                transaction_id: None,
                paid_amount: 0.0,
            },
            state: OrderState {
                delivery_status: None,
                status_changed_at: None,
            },
            metadata: EntityMetadata::new(),
        }
    }

    fn payload(customer: CustomerId) -> SubmitOrderRequest {
        SubmitOrderRequest {
            customer,
            products: Vec::new(),
            delivery_status: DeliveryStatus::Processing,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            shipping: Shipping {
                address: Address::default(),
            },
            billing: Billing {
                address: Address::default(),
                payment_method: contracts::enums::PaymentMethod::Card,
                transaction_id: None,
                paid_amount: 0.0,
            },
        }
    }

    #[derive(Default)]
    struct MockOrderApi {
        page: Mutex<Vec<Order>>,
        total: Mutex<usize>,
        fail_fetch: Mutex<bool>,
        fail_create: Mutex<bool>,
        fail_delete: Mutex<bool>,
        get_many_calls: Mutex<Vec<(Vec<(String, String)>, usize, usize)>>,
        delete_calls: Mutex<Vec<Vec<OrderId>>>,
    }

    impl MockOrderApi {
        fn serve_page(&self, items: Vec<Order>) {
            *self.total.lock().unwrap() = items.len();
            *self.page.lock().unwrap() = items;
        }
    }

    #[async_trait]
    impl OrderApi for MockOrderApi {
        async fn get_one(&self, _id: OrderId) -> Result<Order, ApiError> {
            unimplemented!("not exercised by the controller")
        }

        async fn get_many(
            &self,
            filters: &[(String, String)],
            page: usize,
            limit: usize,
        ) -> Result<OrderListResponse, ApiError> {
            self.get_many_calls
                .lock()
                .unwrap()
                .push((filters.to_vec(), page, limit));

            if *self.fail_fetch.lock().unwrap() {
                return Err(ApiError::server("backend down"));
            }

            Ok(OrderListResponse {
                items: self.page.lock().unwrap().clone(),
                total: *self.total.lock().unwrap(),
            })
        }

        async fn search(&self, _query: &str) -> Result<Vec<Order>, ApiError> {
            unimplemented!("not exercised by the controller")
        }

        async fn create(&self, payload: &SubmitOrderRequest) -> Result<Order, ApiError> {
            if *self.fail_create.lock().unwrap() {
                return Err(ApiError::server("create rejected"));
            }

            let mut created = order();
            created.customer = payload.customer;
            Ok(created)
        }

        async fn update(
            &self,
            _id: OrderId,
            payload: &SubmitOrderRequest,
        ) -> Result<Order, ApiError> {
            let mut updated = order();
            updated.customer = payload.customer;
            Ok(updated)
        }

        async fn delete_one(&self, _id: OrderId) -> Result<(), ApiError> {
            unimplemented!("not exercised by the controller")
        }

        async fn delete_many(&self, ids: &[OrderId]) -> Result<Vec<OrderId>, ApiError> {
            self.delete_calls.lock().unwrap().push(ids.to_vec());

            if *self.fail_delete.lock().unwrap() {
                return Err(ApiError::server("delete failed"));
            }

            Ok(ids.to_vec())
        }

        async fn total_sales(&self) -> Result<Vec<SalesPoint>, ApiError> {
            unimplemented!("not exercised by the controller")
        }

        async fn total_refunds(&self) -> Result<Vec<SalesPoint>, ApiError> {
            unimplemented!("not exercised by the controller")
        }

        async fn sales_in_year(&self, _year: i32) -> Result<Vec<SalesPoint>, ApiError> {
            unimplemented!("not exercised by the controller")
        }
    }

    fn controller_with(api: Arc<MockOrderApi>) -> OrderListController {
        let dyn_api: Arc<dyn OrderApi> = api;
        OrderListController::new(dyn_api)
    }

    #[tokio::test]
    async fn test_refetch_replaces_items_and_clears_selection() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order(), order()]);
        let controller = controller_with(api.clone());

        controller.refetch().await;
        let first_id = controller.snapshot().items[0].id;
        controller.toggle_select(first_id);

        api.serve_page(vec![order()]);
        controller.refetch().await;

        let state = controller.snapshot();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.total_count, 1);
        assert!(state.selected.is_empty());
        assert!(!state.stale);
        assert!(!state.loading.fetch);
        assert_eq!(state.errors.fetch, None);
    }

    #[tokio::test]
    async fn test_default_page_and_limit_reach_the_api() {
        let api = Arc::new(MockOrderApi::default());
        let controller = controller_with(api.clone());

        controller.refetch().await;

        let calls = api.get_many_calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                vec![("delivery_status".to_string(), String::new())],
                1,
                10
            )
        );
    }

    #[tokio::test]
    async fn test_failed_fetch_lands_in_its_own_slot() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;

        *api.fail_fetch.lock().unwrap() = true;
        controller.refetch().await;

        let state = controller.snapshot();
        assert_eq!(state.errors.fetch.as_deref(), Some("backend down"));
        assert!(!state.loading.fetch);
        // Строки последнего удачного ответа остаются на экране
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.errors.create, None);
        assert_eq!(state.errors.delete, None);
    }

    #[tokio::test]
    async fn test_create_prepends_unselected_row() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;
        let existing_id = controller.snapshot().items[0].id;

        let customer = CustomerId::new_v4();
        controller.create(&payload(customer)).await;

        let state = controller.snapshot();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items[0].customer, customer);
        assert_eq!(state.items[1].id, existing_id);
        assert!(state.selected.is_empty());
        // Вставленная строка делает страницу длиннее серверной
        assert!(state.stale);
        assert!(!state.loading.create);
        assert_eq!(state.errors.create, None);

        // Следующий fetch возвращает авторитетную страницу
        controller.refetch().await;
        assert!(!controller.snapshot().stale);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_items_and_records_error() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;

        *api.fail_create.lock().unwrap() = true;
        controller.create(&payload(CustomerId::new_v4())).await;

        let state = controller.snapshot();
        assert_eq!(state.items.len(), 1);
        assert!(!state.stale);
        assert_eq!(state.errors.create.as_deref(), Some("create rejected"));
        assert!(!state.loading.create);
    }

    #[tokio::test]
    async fn test_update_marks_state_stale() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;
        let id = controller.snapshot().items[0].id;

        controller.update(id, &payload(CustomerId::new_v4())).await;
        assert!(controller.snapshot().stale);

        // Следующий fetch снимает флаг
        controller.refetch().await;
        assert!(!controller.snapshot().stale);
    }

    #[tokio::test]
    async fn test_delete_selected_removes_rows_and_marks_stale() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order(), order(), order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;

        let ids: Vec<OrderId> = controller.snapshot().items.iter().map(|o| o.id).collect();
        controller.toggle_select(ids[0]);
        controller.toggle_select(ids[2]);
        controller.delete_selected().await;

        let state = controller.snapshot();
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].id, ids[1]);
        assert!(state.selected.is_empty());
        assert!(state.stale);
        assert!(!state.loading.delete);
        assert_eq!(state.errors.delete, None);
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_rows_and_selection_intact() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order(), order(), order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;

        let ids: Vec<OrderId> = controller.snapshot().items.iter().map(|o| o.id).collect();
        controller.toggle_select(ids[0]);
        controller.toggle_select(ids[1]);

        *api.fail_delete.lock().unwrap() = true;
        controller.delete_selected().await;

        let state = controller.snapshot();
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.selected.len(), 2);
        assert!(!state.stale);
        assert_eq!(state.errors.delete.as_deref(), Some("delete failed"));
        assert!(!state.loading.delete);
    }

    #[tokio::test]
    async fn test_empty_selection_delete_is_noop() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;

        controller.delete_selected().await;

        assert!(api.delete_calls.lock().unwrap().is_empty());
        let state = controller.snapshot();
        assert_eq!(state.errors.delete, None);
        assert!(!state.loading.delete);
    }

    #[tokio::test]
    async fn test_toggle_select_all_clears_when_any_selected() {
        let api = Arc::new(MockOrderApi::default());
        api.serve_page(vec![order(), order(), order()]);
        let controller = controller_with(api.clone());
        controller.refetch().await;

        let first_id = controller.snapshot().items[0].id;
        controller.toggle_select(first_id);
        controller.toggle_select_all();
        assert!(controller.snapshot().selected.is_empty());

        controller.toggle_select_all();
        assert_eq!(controller.snapshot().selected.len(), 3);
    }

    #[tokio::test]
    async fn test_rows_per_page_change_resets_page() {
        let api = Arc::new(MockOrderApi::default());
        let controller = controller_with(api.clone());

        controller.set_page(3).await;
        controller.set_rows_per_page(25).await;

        let calls = api.get_many_calls.lock().unwrap();
        assert_eq!((calls[0].1, calls[0].2), (3, 10));
        assert_eq!((calls[1].1, calls[1].2), (1, 25));
        drop(calls);

        let filter = controller.snapshot().filter;
        assert_eq!(filter.page, 1);
        assert_eq!(filter.rows_per_page, 25);
    }

    #[tokio::test]
    async fn test_delivery_status_filter_reaches_the_api_as_code() {
        let api = Arc::new(MockOrderApi::default());
        let controller = controller_with(api.clone());

        controller
            .set_delivery_status(Some(DeliveryStatus::PendingPayment))
            .await;
        {
            let calls = api.get_many_calls.lock().unwrap();
            assert_eq!(
                calls[0].0,
                vec![("delivery_status".to_string(), "pending_payment".to_string())]
            );
        }

        controller.set_delivery_status(None).await;
        {
            let calls = api.get_many_calls.lock().unwrap();
            assert_eq!(
                calls[1].0,
                vec![("delivery_status".to_string(), String::new())]
            );
        }
    }
}
