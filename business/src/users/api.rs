//! Users API client.
//!
//! Performs the network IO behind the users view: listing one page of a status
//! tab and requesting a spreadsheet export. Results are typed; callers decide
//! whether a failure is logged, folded into state, or shown to the user.

use thiserror::Error;
use ustr::Ustr;

use crate::BusinessConfig;
use crate::http::{Client, HttpError};
use crate::users::types::{DownloadUsersRequest, ExportSelection, ListUsersResponse, PageKey};

#[derive(Debug, Error)]
pub enum UsersApiError {
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("API returned status: {0}")]
    Status(u16),
    #[error("Failed to parse {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Fetch task ended without a result")]
    Aborted,
}

/// A typed API result.
pub type ApiResult<T> = Result<T, UsersApiError>;

/// Client for the `/user` endpoints of one backend.
#[derive(Debug, Clone)]
pub struct UsersApi {
    base_url: Ustr,
}

impl UsersApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: Ustr::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn from_config(config: &BusinessConfig) -> Self {
        Self::new(config.api_url())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// GET `/user/?page={n}&limit={size}&status={status}`
    pub async fn list_users(&self, key: PageKey, limit: u32) -> ApiResult<ListUsersResponse> {
        let url = format!("{}/user/", self.base_url);

        let response = Client::get(url)
            .query("page", key.page)
            .query("limit", limit)
            .query("status", key.status)
            .send()
            .await?;

        if !response.is_success() {
            return Err(UsersApiError::Status(response.status));
        }

        response.json().map_err(|source| UsersApiError::Decode {
            what: "ListUsersResponse",
            source,
        })
    }

    /// POST `/user/download-selected-users`
    /// Body: `{ "userIds": [..] | "All" }`
    ///
    /// Returns the raw spreadsheet bytes.
    pub async fn download_users(&self, selection: &ExportSelection) -> ApiResult<Vec<u8>> {
        let url = format!("{}/user/download-selected-users", self.base_url);

        let request = Client::post(url)
            .json(&DownloadUsersRequest {
                user_ids: selection,
            })
            .map_err(UsersApiError::Encode)?;

        let response = request.send().await?;

        if !response.is_success() {
            return Err(UsersApiError::Status(response.status));
        }

        log::debug!(
            "Export payload received: {} bytes, content-type={:?}",
            response.body.len(),
            response.header("content-type")
        );
        Ok(response.into_body())
    }
}
