//! Snapshot of the users view and the pure functions that advance it.
//!
//! Every update consumes the current [`UsersView`] and returns the next one,
//! so the whole view can be driven and asserted on without a renderer. Side
//! effects (fetching, downloading) live in the controller, which feeds their
//! outcomes back in through [`UsersView::page_loaded`],
//! [`UsersView::page_failed`] and [`UsersView::notify`].

use std::num::NonZeroU32;

use crate::config::DEFAULT_PAGE_SIZE;
use crate::users::page_cache::{Page, PageCache};
use crate::users::selection::SelectionSet;
use crate::users::types::{ListUsersResponse, PageKey, UserId, UserStatus};

/// Shown instead of rows when the displayed page is empty.
pub const EMPTY_PAGE_MESSAGE: &str = "No tasks found";

/// Blocking notice the renderer must show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// An export could not be downloaded or saved.
    DownloadFailed { reason: String },
}

impl Notification {
    pub fn download_failed(reason: impl Into<String>) -> Self {
        Self::DownloadFailed {
            reason: reason.into(),
        }
    }

    /// Text shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            Self::DownloadFailed { .. } => "Failed to download users.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct UsersView {
    tab: UserStatus,
    page: NonZeroU32,
    page_size: NonZeroU32,
    cache: PageCache,
    selection: SelectionSet,
    notifications: Vec<Notification>,
}

impl Default for UsersView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl UsersView {
    /// Fresh view on the first page of the `new` tab.
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            tab: UserStatus::default(),
            page: NonZeroU32::MIN,
            page_size,
            cache: PageCache::new(),
            selection: SelectionSet::new(),
            notifications: Vec::new(),
        }
    }

    // =====================
    // Updates
    // =====================

    /// Shows `status` from its first page.
    #[must_use]
    pub fn switch_tab(mut self, status: UserStatus) -> Self {
        self.tab = status;
        self.page = NonZeroU32::MIN;
        self
    }

    /// Advances one page when the current page is full.
    #[must_use]
    pub fn next_page(mut self) -> Self {
        if self.can_go_next() {
            self.page = self.page.saturating_add(1);
        }
        self
    }

    /// Goes back one page, stopping at page 1.
    #[must_use]
    pub fn previous_page(mut self) -> Self {
        if let Some(prev) = NonZeroU32::new(self.page.get() - 1) {
            self.page = prev;
        }
        self
    }

    #[must_use]
    pub fn toggle_user(mut self, id: UserId, included: bool) -> Self {
        self.selection.toggle(id, included);
        self
    }

    /// Checks or unchecks every user on the displayed page.
    #[must_use]
    pub fn select_all_on_page(mut self, included: bool) -> Self {
        let ids: Vec<UserId> = self.visible_users().iter().map(|user| user.id).collect();
        self.selection.select_all_on_page(ids, included);
        self
    }

    /// Folds a successful fetch for `key` into the cache.
    ///
    /// `key` need not be the displayed page; late responses are kept.
    #[must_use]
    pub fn page_loaded(mut self, key: PageKey, response: ListUsersResponse) -> Self {
        self.cache = self.cache.store(key, response);
        self
    }

    /// Records a failed fetch. The cache is left as it was, so the page stays
    /// empty until it is requested again.
    #[must_use]
    pub fn page_failed(self, key: PageKey, error: &dyn std::error::Error) -> Self {
        log::error!("Error fetching users for page {key}: {error}");
        self
    }

    #[must_use]
    pub fn notify(mut self, notification: Notification) -> Self {
        log::warn!("{}", notification.message());
        self.notifications.push(notification);
        self
    }

    /// Drains pending notifications; the renderer shows each one once.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    // =====================
    // Reads
    // =====================

    pub fn tab(&self) -> UserStatus {
        self.tab
    }

    pub fn page(&self) -> u32 {
        self.page.get()
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    pub fn current_key(&self) -> PageKey {
        PageKey {
            status: self.tab,
            page: self.page,
        }
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Records of the displayed page; empty until it has been fetched.
    pub fn visible_users(&self) -> Page {
        self.cache
            .get_page(self.current_key())
            .unwrap_or_else(|| Page::from(Vec::new()))
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.cache.total_pages(self.tab)
    }

    pub fn can_go_previous(&self) -> bool {
        self.page.get() > 1
    }

    /// A short page means there is nothing after it.
    pub fn can_go_next(&self) -> bool {
        self.visible_users().len() >= self.page_size.get() as usize
    }

    /// Header checkbox state for the displayed page.
    pub fn is_page_selected(&self) -> bool {
        self.selection
            .all_selected(self.visible_users().iter().map(|user| user.id))
    }

    /// `Pages: {page}/{total}`, with the total blank until it is known.
    pub fn page_label(&self) -> String {
        let total = self
            .total_pages()
            .map(|total| total.to_string())
            .unwrap_or_default();
        format!("Pages: {}/{total}", self.page)
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.visible_users()
            .is_empty()
            .then_some(EMPTY_PAGE_MESSAGE)
    }

    /// Route opened when a user row is clicked.
    pub fn detail_route(id: UserId) -> String {
        format!("/dashboard/read/{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::types::UserRecord;

    fn full_page(prefix: &str, len: usize, total_pages: u32) -> ListUsersResponse {
        ListUsersResponse {
            users: (0..len)
                .map(|i| UserRecord {
                    id: UserId::new(&format!("{prefix}{i}")),
                    fullname: format!("User {i}"),
                    company_name: "Acme".to_string(),
                    role: "Tester".to_string(),
                })
                .collect(),
            total_pages,
        }
    }

    fn sized(page_size: u32) -> UsersView {
        UsersView::new(NonZeroU32::new(page_size).unwrap())
    }

    fn ids(raw: &[&str]) -> Vec<UserId> {
        raw.iter().map(|id| UserId::new(id)).collect()
    }

    #[test]
    fn test_initial_view() {
        let view = UsersView::default();
        assert_eq!(view.tab(), UserStatus::New);
        assert_eq!(view.page(), 1);
        assert_eq!(view.page_size().get(), 50);
        assert!(view.visible_users().is_empty());
        assert_eq!(view.empty_message(), Some(EMPTY_PAGE_MESSAGE));
        assert_eq!(view.page_label(), "Pages: 1/");
        assert!(!view.can_go_previous());
        assert!(!view.can_go_next());
    }

    #[test]
    fn test_loaded_first_page_of_new() {
        let key = PageKey::first(UserStatus::New);
        let view = sized(50).page_loaded(key, full_page("n", 50, 3));

        assert_eq!(view.visible_users().len(), 50);
        assert_eq!(view.total_pages(), Some(3));
        assert_eq!(view.page_label(), "Pages: 1/3");
        assert_eq!(view.empty_message(), None);
        assert!(view.can_go_next());
    }

    #[test]
    fn test_next_page_blocked_on_short_page() {
        let key = PageKey::first(UserStatus::New);
        let view = sized(50)
            .page_loaded(key, full_page("n", 12, 1))
            .next_page();

        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_smallest_page_size_pages_one_row_at_a_time() {
        let key = PageKey::first(UserStatus::New);
        let view = UsersView::new(NonZeroU32::MIN).page_loaded(key, full_page("n", 1, 4));

        assert_eq!(view.page_size().get(), 1);
        assert!(view.can_go_next());
        assert_eq!(view.next_page().page(), 2);
    }

    #[test]
    fn test_previous_page_clamps_at_one() {
        let key = PageKey::first(UserStatus::New);
        let view = sized(2)
            .page_loaded(key, full_page("n", 2, 2))
            .next_page();
        assert_eq!(view.page(), 2);
        assert!(view.can_go_previous());

        let view = view.previous_page().previous_page();
        assert_eq!(view.page(), 1);
    }

    #[test]
    fn test_switch_tab_resets_page() {
        let key = PageKey::first(UserStatus::New);
        let view = sized(2)
            .page_loaded(key, full_page("n", 2, 5))
            .next_page()
            .switch_tab(UserStatus::Completed);

        assert_eq!(view.tab(), UserStatus::Completed);
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), None);
    }

    #[test]
    fn test_selection_survives_navigation() {
        let page1 = PageKey::first(UserStatus::New);
        let page2 = PageKey::new(UserStatus::New, 2).unwrap();
        let view = sized(2)
            .page_loaded(page1, full_page("a", 2, 2))
            .toggle_user(UserId::new("u1"), true)
            .toggle_user(UserId::new("u3"), true)
            .next_page()
            .page_loaded(page2, full_page("b", 2, 2))
            .toggle_user(UserId::new("u9"), true)
            .switch_tab(UserStatus::InProgress);

        assert_eq!(view.selection().to_vec(), ids(&["u1", "u3", "u9"]));
    }

    #[test]
    fn test_select_all_on_page_only_touches_visible_rows() {
        let key = PageKey::first(UserStatus::New);
        let view = sized(50)
            .page_loaded(key, full_page("n", 3, 1))
            .toggle_user(UserId::new("other"), true)
            .select_all_on_page(true);

        assert!(view.is_page_selected());
        assert_eq!(view.selection().len(), 4);

        let view = view.select_all_on_page(false);
        assert!(!view.is_page_selected());
        assert_eq!(view.selection().to_vec(), ids(&["other"]));
    }

    #[test]
    fn test_select_all_on_empty_page_is_noop() {
        let view = UsersView::default().select_all_on_page(true);
        assert!(view.selection().is_empty());
        assert!(!view.is_page_selected());
    }

    #[test]
    fn test_page_failed_leaves_cache_empty() {
        let key = PageKey::first(UserStatus::New);
        let err = std::io::Error::other("connection refused");
        let view = UsersView::default().page_failed(key, &err);

        assert!(view.cache().is_empty());
        assert_eq!(view.total_pages(), None);
        assert_eq!(view.empty_message(), Some(EMPTY_PAGE_MESSAGE));
    }

    #[test]
    fn test_late_response_for_other_page_is_kept() {
        let stale = PageKey::new(UserStatus::New, 3).unwrap();
        let view = UsersView::default()
            .switch_tab(UserStatus::Completed)
            .page_loaded(stale, full_page("s", 1, 3));

        assert!(view.cache().contains(stale));
        assert!(view.visible_users().is_empty());
    }

    #[test]
    fn test_notifications_drain_once() {
        let mut view = UsersView::default().notify(Notification::download_failed("status 500"));
        assert_eq!(view.notifications().len(), 1);
        assert_eq!(view.notifications()[0].message(), "Failed to download users.");

        let drained = view.take_notifications();
        assert_eq!(drained.len(), 1);
        assert!(view.take_notifications().is_empty());
    }

    #[test]
    fn test_detail_route() {
        assert_eq!(
            UsersView::detail_route(UserId::new("abc123")),
            "/dashboard/read/abc123"
        );
    }
}
