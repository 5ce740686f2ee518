use serde::{Deserialize, Serialize};

/// Статусы доставки заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Processing,
    PendingPayment,
    OnHold,
    Completed,
    Cancelled,
    Refunded,
}

impl DeliveryStatus {
    /// Получить код статуса (как на проводе)
    pub fn code(&self) -> &'static str {
        match self {
            DeliveryStatus::Processing => "processing",
            DeliveryStatus::PendingPayment => "pending_payment",
            DeliveryStatus::OnHold => "on_hold",
            DeliveryStatus::Completed => "completed",
            DeliveryStatus::Cancelled => "cancelled",
            DeliveryStatus::Refunded => "refunded",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            DeliveryStatus::Processing => "Processing",
            DeliveryStatus::PendingPayment => "Pending payment",
            DeliveryStatus::OnHold => "On hold",
            DeliveryStatus::Completed => "Completed",
            DeliveryStatus::Cancelled => "Cancelled",
            DeliveryStatus::Refunded => "Refunded",
        }
    }

    /// Получить все статусы
    pub fn all() -> Vec<DeliveryStatus> {
        vec![
            DeliveryStatus::Processing,
            DeliveryStatus::PendingPayment,
            DeliveryStatus::OnHold,
            DeliveryStatus::Completed,
            DeliveryStatus::Cancelled,
            DeliveryStatus::Refunded,
        ]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "processing" => Some(DeliveryStatus::Processing),
            "pending_payment" => Some(DeliveryStatus::PendingPayment),
            "on_hold" => Some(DeliveryStatus::OnHold),
            "completed" => Some(DeliveryStatus::Completed),
            "cancelled" => Some(DeliveryStatus::Cancelled),
            "refunded" => Some(DeliveryStatus::Refunded),
            _ => None,
        }
    }
}

impl ToString for DeliveryStatus {
    fn to_string(&self) -> String {
        self.code().to_string()
    }
}
