pub mod delivery_status;
pub mod payment_method;

pub use delivery_status::DeliveryStatus;
pub use payment_method::PaymentMethod;
