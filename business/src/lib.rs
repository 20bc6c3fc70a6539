//! Business layer for the roster users view.
//!
//! Rendering code reads [`UsersView`] through the [`UsersController`] and
//! calls its entry points; everything stateful or networked lives here.

mod config;
pub mod http;
pub mod users;

pub use config::{BusinessConfig, DEFAULT_EXPORT_FILE_NAME, DEFAULT_PAGE_SIZE};
pub use users::{
    ExportError, ExportSelection, ListUsersResponse, Notification, Page, PageCache, PageKey,
    SelectionSet, UserId, UserRecord, UserStatus, UsersApi, UsersApiError, UsersController,
    UsersView,
};
