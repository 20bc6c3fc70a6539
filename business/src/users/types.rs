//! Wire types for the `/user` endpoints.
//!
//! Responses are decoded into these types at the API boundary; anything that
//! does not match the shape is rejected there instead of reaching the cache.

use std::fmt;
use std::num::NonZeroU32;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ustr::Ustr;

/// Status tab partitioning the user list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum UserStatus {
    #[default]
    #[serde(rename = "new")]
    New,
    #[serde(rename = "inProgress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl UserStatus {
    /// Tabs in display order.
    pub const ALL: [UserStatus; 3] = [Self::New, Self::InProgress, Self::Completed];

    /// Value sent as the `status` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        }
    }

    /// Tab caption: the wire value with its first letter capitalised.
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a user record (`_id` on the wire).
///
/// Interned with `Ustr`: ids are cloned into the selection and compared on
/// every render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Ustr);

impl UserId {
    pub fn new(id: &str) -> Self {
        Self(Ustr::from(id))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Ok(Self::new(&id))
    }
}

/// A user row. Extra fields sent by the server are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub fullname: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
    pub role: String,
}

/// Cache key of one page: a status tab and a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey {
    pub status: UserStatus,
    pub page: NonZeroU32,
}

impl PageKey {
    /// Returns `None` for page 0.
    pub fn new(status: UserStatus, page: u32) -> Option<Self> {
        NonZeroU32::new(page).map(|page| Self { status, page })
    }

    pub const fn first(status: UserStatus) -> Self {
        Self {
            status,
            page: NonZeroU32::MIN,
        }
    }

    pub const fn page_number(&self) -> u32 {
        self.page.get()
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.status, self.page)
    }
}

/// Body of `GET /user/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserRecord>,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

/// Literal the export endpoint accepts in place of an id list.
pub const EXPORT_ALL_SENTINEL: &str = "All";

/// Which users an export should contain.
///
/// Serialises to the bare id array or to the `"All"` sentinel, the two shapes
/// the export endpoint accepts for `userIds`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportSelection {
    Selected(Vec<UserId>),
    All,
}

impl Serialize for ExportSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Selected(ids) => ids.serialize(serializer),
            Self::All => serializer.serialize_str(EXPORT_ALL_SENTINEL),
        }
    }
}

/// Body of `POST /user/download-selected-users`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadUsersRequest<'a> {
    #[serde(rename = "userIds")]
    pub user_ids: &'a ExportSelection,
}
