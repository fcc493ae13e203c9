//! Shared pieces of the sensor dashboard: device service types and client,
//! and the device table state machinery.

pub mod api;
pub mod auth;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod map;
pub mod metric;
pub mod req;
pub mod search_params;
pub mod sort;
pub mod table;
pub mod validate;

pub use api::ApiClient;
pub use error::{ApiError, Result, TableError, UnknownDeviceType, ValidationErrors};
pub use filter::TypeSelection;
pub use search_params::{SortDirection, TableParams};
pub use sort::StringOrder;
pub use table::{paginate, PageItem, TablePage};
