use crate::domain::a001_customer::aggregate::CustomerId;
use crate::domain::a003_order::aggregate::{Billing, Order, OrderLine, Shipping};
use crate::enums::delivery_status::DeliveryStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Submission payload
// ============================================================================

/// Тело POST /order и PUT /order/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOrderRequest {
    /// Покупатель
    pub customer: CustomerId,
    /// Строки заказа
    pub products: Vec<OrderLine>,
    pub delivery_status: DeliveryStatus,
    /// Дата заказа (YYYY-MM-DD)
    pub created_at: NaiveDate,
    pub shipping: Shipping,
    pub billing: Billing,
}

// ============================================================================
// List response
// ============================================================================

/// Страница списка заказов
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub items: Vec<Order>,
    /// Полное число заказов под текущим фильтром
    pub total: usize,
}

// ============================================================================
// Draft validation
// ============================================================================

/// Ошибки проверки черновика перед отправкой
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Покупатель не выбран
    MissingCustomer,
    /// В заказе нет ни одной строки
    NoItems,
    /// transaction_id содержит недопустимые символы
    InvalidTransactionId,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingCustomer => write!(f, "No customer selected for the order"),
            ValidationError::NoItems => write!(f, "Order has no items"),
            ValidationError::InvalidTransactionId => {
                write!(f, "Transaction id must be alphanumeric")
            }
        }
    }
}

impl std::error::Error for ValidationError {}
