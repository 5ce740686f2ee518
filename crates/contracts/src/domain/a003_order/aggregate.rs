use crate::domain::a001_customer::aggregate::{Address, CustomerId};
use crate::domain::a002_product::aggregate::ProductId;
use crate::domain::common::{AggregateId, EntityMetadata};
use crate::enums::delivery_status::DeliveryStatus;
use crate::enums::payment_method::PaymentMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for OrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(OrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Выбранный терм одной вариантной оси ("Color" -> "Red")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantSelection {
    pub name: String,
    pub term: String,
}

/// Строка заказа (позиция)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Ссылка на товар
    pub product: ProductId,
    /// Название товара на момент добавления
    pub title: String,
    /// Базовая цена
    pub price: f64,
    /// Цена со скидкой
    #[serde(default)]
    pub selling_price: Option<f64>,
    /// URL изображения
    #[serde(default)]
    pub media: Option<String>,
    /// По одному терму на каждую ось товара, в порядке осей
    #[serde(default)]
    pub selected_variants: Vec<VariantSelection>,
    /// Количество (>= 1)
    pub count: u32,
}

impl OrderLine {
    /// Действующая цена за единицу
    pub fn effective_price(&self) -> f64 {
        self.selling_price.unwrap_or(self.price)
    }

    /// Сумма за строку
    pub fn line_total(&self) -> f64 {
        self.effective_price() * self.count as f64
    }
}

// ============================================================================
// Billing / Shipping
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Billing {
    pub address: Address,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Равна сумме строк заказа на момент отправки
    pub paid_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipping {
    pub address: Address,
}

// ============================================================================
// State
// ============================================================================

/// Статус доставки и временная метка его изменения
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OrderState {
    #[serde(default)]
    pub delivery_status: Option<DeliveryStatus>,
    #[serde(default)]
    pub status_changed_at: Option<DateTime<Utc>>,
}

impl OrderState {
    /// Сменить статус; метка обновляется только при реальной смене
    pub fn set_delivery_status(&mut self, status: Option<DeliveryStatus>) {
        if self.delivery_status != status {
            self.delivery_status = status;
            self.status_changed_at = Some(Utc::now());
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Заказ (агрегат)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,

    /// Покупатель
    pub customer: CustomerId,

    /// Строки заказа, в порядке добавления
    pub lines: Vec<OrderLine>,

    pub shipping: Shipping,

    pub billing: Billing,

    /// Статус доставки
    #[serde(default)]
    pub state: OrderState,

    #[serde(default)]
    pub metadata: EntityMetadata,
}

impl Order {
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    pub fn touch_updated(&mut self) {
        self.metadata.touch();
    }

    /// Сумма заказа
    pub fn order_total(&self) -> f64 {
        self.lines.iter().map(|line| line.line_total()).sum()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.lines.is_empty() {
            return Err("Order must contain at least one line".into());
        }
        let mut products = HashSet::new();
        for line in &self.lines {
            if !products.insert(line.product) {
                return Err(format!(
                    "Product {} appears on more than one line",
                    line.product.as_string()
                ));
            }
            if line.count < 1 {
                return Err(format!("Line {} has zero quantity", line.title));
            }
            let mut axes = HashSet::new();
            for selection in &line.selected_variants {
                if !axes.insert(selection.name.as_str()) {
                    return Err(format!(
                        "Line {} selects axis {} more than once",
                        line.title, selection.name
                    ));
                }
            }
        }
        Ok(())
    }
}
