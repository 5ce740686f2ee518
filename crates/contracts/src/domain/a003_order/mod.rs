pub mod aggregate;
pub mod dto;

pub use aggregate::{Billing, Order, OrderId, OrderLine, OrderState, Shipping, VariantSelection};
pub use dto::{OrderListResponse, SubmitOrderRequest, ValidationError};
