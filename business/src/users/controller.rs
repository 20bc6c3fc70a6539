//! Owner of the users view and the side effects behind it.
//!
//! The controller holds the current [`UsersView`] snapshot. Navigation swaps in
//! the next snapshot and then makes sure the page now on screen is being
//! fetched. Fetches run as background tasks and report back over a `flume`
//! channel; [`UsersController::poll`] folds finished fetches into the view on
//! the owner's thread, so the view itself is never shared.

use std::collections::HashSet;
use std::path::PathBuf;

use flume::{Receiver, Sender};

use crate::BusinessConfig;
use crate::users::api::{ApiResult, UsersApi, UsersApiError};
use crate::users::export::{ExportError, export_users};
use crate::users::page_cache::Page;
use crate::users::types::{ExportSelection, ListUsersResponse, PageKey, UserId, UserStatus};
use crate::users::view::{Notification, UsersView};

/// Outcome of one background page fetch.
#[derive(Debug)]
struct PageFetched {
    key: PageKey,
    result: ApiResult<ListUsersResponse>,
}

/// Sender half handed to a background fetch.
///
/// If the task ends without calling [`FetchGuard::finish`] (it panicked or was
/// cancelled), dropping the guard reports [`UsersApiError::Aborted`] so the key
/// still leaves the in-flight set.
struct FetchGuard {
    key: PageKey,
    send: Option<Sender<PageFetched>>,
}

impl FetchGuard {
    fn new(key: PageKey, send: Sender<PageFetched>) -> Self {
        Self {
            key,
            send: Some(send),
        }
    }

    fn finish(mut self, result: ApiResult<ListUsersResponse>) {
        if let Some(send) = self.send.take() {
            report(&send, self.key, result);
        }
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        if let Some(send) = self.send.take() {
            log::warn!("Fetch of page {} ended without a result", self.key);
            report(&send, self.key, Err(UsersApiError::Aborted));
        }
    }
}

fn report(send: &Sender<PageFetched>, key: PageKey, result: ApiResult<ListUsersResponse>) {
    if send.send(PageFetched { key, result }).is_err() {
        log::debug!("Users view dropped before page {key} arrived");
    }
}

pub struct UsersController {
    config: BusinessConfig,
    api: UsersApi,
    view: UsersView,
    in_flight: HashSet<PageKey>,
    send: Sender<PageFetched>,
    recv: Receiver<PageFetched>,
}

impl UsersController {
    pub fn new(config: BusinessConfig) -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            api: UsersApi::from_config(&config),
            view: UsersView::new(config.page_size),
            config,
            in_flight: HashSet::new(),
            send,
            recv,
        }
    }

    pub fn view(&self) -> &UsersView {
        &self.view
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    /// Keys requested but not yet folded into the view.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    fn update(&mut self, f: impl FnOnce(UsersView) -> UsersView) {
        let view = std::mem::take(&mut self.view);
        self.view = f(view);
    }

    /// Starts loading the initial page.
    pub fn mount(&mut self) {
        self.ensure_current_page();
    }

    pub fn switch_tab(&mut self, status: UserStatus) {
        self.update(|view| view.switch_tab(status));
        self.ensure_current_page();
    }

    pub fn next_page(&mut self) {
        self.update(UsersView::next_page);
        self.ensure_current_page();
    }

    pub fn previous_page(&mut self) {
        self.update(UsersView::previous_page);
        self.ensure_current_page();
    }

    pub fn toggle_user(&mut self, id: UserId, included: bool) {
        self.update(|view| view.toggle_user(id, included));
    }

    pub fn select_all_on_page(&mut self, included: bool) {
        self.update(|view| view.select_all_on_page(included));
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.view.take_notifications()
    }

    /// Requests the displayed page unless it is cached or already on its way.
    pub fn ensure_current_page(&mut self) {
        let key = self.view.current_key();
        if self.view.cache().contains(key) {
            log::debug!("Page {key} served from cache");
            return;
        }
        if !self.in_flight.insert(key) {
            log::debug!("Page {key} already requested");
            return;
        }

        log::debug!("Fetching page {key}");
        let api = self.api.clone();
        let guard = FetchGuard::new(key, self.send.clone());
        let limit = self.view.page_size().get();
        spawn(async move {
            let result = api.list_users(key, limit).await;
            guard.finish(result);
        });
    }

    /// Folds every finished fetch into the view without waiting.
    ///
    /// Returns how many fetches were applied.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(fetched) = self.recv.try_recv() {
            self.apply(fetched);
            applied += 1;
        }
        applied
    }

    /// Waits until every requested page has resolved.
    pub async fn settle(&mut self) {
        while !self.in_flight.is_empty() {
            match self.recv.recv_async().await {
                Ok(fetched) => self.apply(fetched),
                // Unreachable while `self.send` is alive.
                Err(_) => break,
            }
        }
    }

    /// Waits until the background fetch of `key`, if any, has resolved.
    async fn settle_key(&mut self, key: PageKey) {
        while self.in_flight.contains(&key) {
            match self.recv.recv_async().await {
                Ok(fetched) => self.apply(fetched),
                Err(_) => break,
            }
        }
    }

    fn apply(&mut self, fetched: PageFetched) {
        let PageFetched { key, result } = fetched;
        self.in_flight.remove(&key);
        match result {
            Ok(response) => self.update(|view| view.page_loaded(key, response)),
            Err(err) => self.update(|view| view.page_failed(key, &err)),
        }
    }

    /// Returns the page for `key`, fetching it inline on a miss.
    ///
    /// A cached page never triggers a request, and neither does a key whose
    /// background fetch is still running; that fetch is awaited instead. On
    /// failure the page is empty and the cache is unchanged.
    pub async fn fetch_and_store(&mut self, key: PageKey) -> Page {
        self.settle_key(key).await;
        if let Some(page) = self.view.cache().get_page(key) {
            log::debug!("Page {key} served from cache");
            return page;
        }

        let result = self.api.list_users(key, self.view.page_size().get()).await;
        self.apply(PageFetched { key, result });
        self.view
            .cache()
            .get_page(key)
            .unwrap_or_else(|| Page::from(Vec::new()))
    }

    /// Exports the checked users.
    pub async fn download_selected(&mut self) -> Result<PathBuf, ExportError> {
        let selection = ExportSelection::Selected(self.view.selection().to_vec());
        self.download(selection).await
    }

    /// Exports every user regardless of selection.
    pub async fn download_all(&mut self) -> Result<PathBuf, ExportError> {
        self.download(ExportSelection::All).await
    }

    async fn download(&mut self, selection: ExportSelection) -> Result<PathBuf, ExportError> {
        let result = export_users(
            &self.api,
            &selection,
            self.config.download_dir(),
            &self.config.export_file_name,
        )
        .await;

        if let Err(err) = &result {
            log::error!("Download failed: {err}");
            let notification = Notification::download_failed(err.to_string());
            self.update(|view| view.notify(notification));
        }
        result
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn spawn(fut: impl Future<Output = ()> + Send + 'static) {
    drop(tokio::spawn(fut));
}

#[cfg(target_arch = "wasm32")]
fn spawn(fut: impl Future<Output = ()> + 'static) {
    wasm_bindgen_futures::spawn_local(fut);
}
