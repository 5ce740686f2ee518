use serde::{Deserialize, Serialize};

/// Способы оплаты заказа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    CashOnDelivery,
}

impl PaymentMethod {
    /// Получить код способа оплаты
    pub fn code(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::CashOnDelivery => "cash_on_delivery",
        }
    }

    /// Получить человекочитаемое название
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::CashOnDelivery => "Cash on delivery",
        }
    }

    /// Получить все способы оплаты
    pub fn all() -> Vec<PaymentMethod> {
        vec![PaymentMethod::Card, PaymentMethod::CashOnDelivery]
    }

    /// Парсинг из строки
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "card" => Some(PaymentMethod::Card),
            "cash_on_delivery" => Some(PaymentMethod::CashOnDelivery),
            _ => None,
        }
    }
}

impl ToString for PaymentMethod {
    fn to_string(&self) -> String {
        self.code().to_string()
    }
}
