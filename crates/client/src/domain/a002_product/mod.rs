pub mod api;

pub use api::ProductApiClient;
