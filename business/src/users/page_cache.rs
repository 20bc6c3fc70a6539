//! Client-side cache of fetched user pages.
//!
//! Pages are keyed by status tab and page number. Once a page is stored it is
//! never re-fetched, replaced or evicted for the lifetime of the cache.

use std::collections::{BTreeMap, HashMap};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::users::api::UsersApi;
use crate::users::types::{ListUsersResponse, PageKey, UserRecord, UserStatus};

/// Records of one page, shared between cache snapshots.
pub type Page = Arc<[UserRecord]>;

#[derive(Debug, Clone, Default)]
pub struct PageCache {
    pages: HashMap<UserStatus, BTreeMap<NonZeroU32, Page>>,
    total_pages: HashMap<UserStatus, u32>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached records for `key`, or `None` on a miss.
    pub fn get_page(&self, key: PageKey) -> Option<Page> {
        self.pages
            .get(&key.status)
            .and_then(|pages| pages.get(&key.page))
            .cloned()
    }

    pub fn contains(&self, key: PageKey) -> bool {
        self.pages
            .get(&key.status)
            .is_some_and(|pages| pages.contains_key(&key.page))
    }

    /// Last total page count the server reported for `status`.
    pub fn total_pages(&self, status: UserStatus) -> Option<u32> {
        self.total_pages.get(&status).copied()
    }

    /// Number of cached pages across all statuses.
    pub fn len(&self) -> usize {
        self.pages.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cache with `response` stored under `key`.
    ///
    /// A key that is already populated keeps its first result; the late
    /// response is dropped together with its total page count.
    #[must_use]
    pub fn store(mut self, key: PageKey, response: ListUsersResponse) -> Self {
        if self.contains(key) {
            log::debug!("Page {key} already cached, dropping duplicate response");
            return self;
        }

        let ListUsersResponse { users, total_pages } = response;
        log::info!(
            "Cached page {key}: {} users, {total_pages} total pages",
            users.len()
        );

        self.pages
            .entry(key.status)
            .or_default()
            .insert(key.page, Page::from(users));
        self.total_pages.insert(key.status, total_pages);
        self
    }

    /// Returns the page for `key`, fetching it from `api` on a miss.
    ///
    /// A failed fetch is logged and yields an empty page; the cache is left
    /// untouched so the page is requested again next time.
    pub async fn fetch_and_store(
        &mut self,
        api: &UsersApi,
        key: PageKey,
        page_size: NonZeroU32,
    ) -> Page {
        if let Some(page) = self.get_page(key) {
            log::debug!("Page {key} served from cache");
            return page;
        }

        match api.list_users(key, page_size.get()).await {
            Ok(response) => {
                *self = std::mem::take(self).store(key, response);
                self.get_page(key).unwrap_or_else(|| Page::from(Vec::new()))
            }
            Err(err) => {
                log::error!("Error fetching users for page {key}: {err}");
                Page::from(Vec::new())
            }
        }
    }
}
