use crate::domain::common::AggregateId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
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

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Address
// ============================================================================

/// Почтовый адрес покупателя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Address {
    pub full_name: String,
    pub phone_no: String,
    pub property_type: String,
    pub country: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub zip_code: String,
    /// Адрес по умолчанию для счетов
    #[serde(default)]
    pub default_billing_address: bool,
    /// Адрес по умолчанию для доставки
    #[serde(default)]
    pub default_shipping_address: bool,
}

// ============================================================================
// Aggregate Root
// ============================================================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub addresses: Vec<Address>,
}

impl Customer {
    pub fn to_string_id(&self) -> String {
        self.id.as_string()
    }

    /// Первый адрес с флагом default_billing_address
    pub fn default_billing(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.default_billing_address)
    }

    /// Первый адрес с флагом default_shipping_address
    pub fn default_shipping(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.default_shipping_address)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.full_name.trim().is_empty() {
            return Err("Customer name must not be empty".into());
        }
        let billing_defaults = self
            .addresses
            .iter()
            .filter(|a| a.default_billing_address)
            .count();
        if billing_defaults > 1 {
            return Err("Only one address may be the default billing address".into());
        }
        let shipping_defaults = self
            .addresses
            .iter()
            .filter(|a| a.default_shipping_address)
            .count();
        if shipping_defaults > 1 {
            return Err("Only one address may be the default shipping address".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(city: &str, billing: bool, shipping: bool) -> Address {
        Address {
            full_name: "Jane Doe".to_string(),
            phone_no: "555-0101".to_string(),
            property_type: "house".to_string(),
            country: "US".to_string(),
            state: "CA".to_string(),
            city: city.to_string(),
            address: "1 Main St".to_string(),
            zip_code: "90210".to_string(),
            default_billing_address: billing,
            default_shipping_address: shipping,
        }
    }

    fn customer(addresses: Vec<Address>) -> Customer {
        Customer {
            id: CustomerId::new_v4(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            addresses,
        }
    }

    #[test]
    fn test_default_address_helpers() {
        let c = customer(vec![
            address("Fresno", false, true),
            address("Ibarra", true, false),
        ]);
        assert_eq!(c.default_billing().unwrap().city, "Ibarra");
        assert_eq!(c.default_shipping().unwrap().city, "Fresno");
    }

    #[test]
    fn test_no_flagged_address() {
        let c = customer(vec![address("Fresno", false, false)]);
        assert!(c.default_billing().is_none());
        assert!(c.default_shipping().is_none());
    }

    #[test]
    fn test_validate_rejects_duplicate_default_flags() {
        let c = customer(vec![
            address("Fresno", true, false),
            address("Ibarra", true, false),
        ]);
        assert!(c.validate().is_err());

        let c = customer(vec![
            address("Fresno", true, true),
            address("Ibarra", false, false),
        ]);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_id_string_round_trip() {
        let id = CustomerId::new_v4();
        assert_eq!(CustomerId::from_string(&id.as_string()), Ok(id));
        assert!(CustomerId::from_string("not-a-uuid").is_err());
    }
}
