pub mod aggregate;

pub use aggregate::{Address, Customer, CustomerId};
