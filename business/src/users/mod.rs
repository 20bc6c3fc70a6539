//! Users list domain: paginated listing per status tab, row selection and
//! spreadsheet export.
//!
//! - [`types`]: wire types for the `/user` endpoints
//! - [`api`]: typed HTTP calls
//! - [`page_cache`] and [`selection`]: the state kept for one mounted view
//! - [`view`]: immutable view snapshot with pure update functions
//! - [`controller`]: owns the snapshot and runs fetches and downloads

pub mod api;
pub mod controller;
pub mod export;
pub mod page_cache;
pub mod selection;
pub mod types;
pub mod view;

pub use api::{ApiResult, UsersApi, UsersApiError};
pub use controller::UsersController;
pub use export::ExportError;
pub use page_cache::{Page, PageCache};
pub use selection::SelectionSet;
pub use types::{
    ExportSelection, ListUsersResponse, PageKey, UserId, UserRecord, UserStatus,
};
pub use view::{EMPTY_PAGE_MESSAGE, Notification, UsersView};
