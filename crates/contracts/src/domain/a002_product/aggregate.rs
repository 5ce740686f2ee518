use crate::domain::common::AggregateId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub Uuid);

impl ProductId {
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

impl AggregateId for ProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Variant axes
// ============================================================================

/// Вариантная ось товара (например "Color" с термами "Red"/"Blue")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAxis {
    pub name: String,
    pub terms: Vec<String>,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Снимок товара, каким его видит форма заказа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Базовая цена
    pub price: f64,
    /// Цена со скидкой; при наличии имеет приоритет над базовой
    #[serde(default)]
    pub selling_price: Option<f64>,
    /// URL основного изображения
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantAxis>,
}

impl Product {
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Действующая цена за единицу
    pub fn effective_price(&self) -> f64 {
        self.selling_price.unwrap_or(self.price)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Product title must not be empty".into());
        }
        if self.price < 0.0 {
            return Err("Product price must not be negative".into());
        }
        let mut seen = HashSet::new();
        for axis in &self.variants {
            if !seen.insert(axis.name.as_str()) {
                return Err(format!("Duplicate variant axis: {}", axis.name));
            }
            if axis.terms.is_empty() {
                return Err(format!("Variant axis {} has no terms", axis.name));
            }
        }
        Ok(())
    }
}
