pub mod api;
pub mod draft;
pub mod state;

pub use api::{OrderApi, OrderApiClient};
pub use draft::OrderDraft;
pub use state::{OrderListController, OrderListFilter, OrderListState};
