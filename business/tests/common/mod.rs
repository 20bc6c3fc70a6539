//! Shared fixtures for users controller integration tests.

#![allow(dead_code)]

use std::num::NonZeroU32;

use roster_business::{BusinessConfig, UsersController};
use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A controller pointed at a mock server, saving exports into a temp dir.
pub struct TestContext {
    /// Mock server must be retained to keep HTTP endpoints alive during tests.
    pub mock_server: MockServer,
    pub controller: UsersController,
    pub download_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_page_size(50).await
    }

    pub async fn with_page_size(page_size: u32) -> Self {
        let page_size = NonZeroU32::new(page_size).expect("page size must be non-zero");
        Self::with_config(|config| config.page_size = page_size).await
    }

    /// Default test config, adjusted by `customize` before the controller is built.
    pub async fn with_config(customize: impl FnOnce(&mut BusinessConfig)) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let mock_server = MockServer::start().await;
        let download_dir = tempfile::tempdir().expect("temp dir");

        let mut config = BusinessConfig::new(mock_server.uri());
        config.download_dir = download_dir.path().to_path_buf();
        customize(&mut config);

        Self {
            controller: UsersController::new(config),
            mock_server,
            download_dir,
        }
    }

    /// Serves `users` for one page of `status`, expecting exactly `times` requests.
    pub async fn mock_page(
        &self,
        status: &str,
        page: u32,
        users: Vec<Value>,
        total_pages: u32,
        times: u64,
    ) {
        Mock::given(method("GET"))
            .and(path("/user/"))
            .and(query_param("status", status))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "users": users,
                "totalPages": total_pages,
            })))
            .expect(times)
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_page_error(&self, status: &str, page: u32, code: u16) {
        Mock::given(method("GET"))
            .and(path("/user/"))
            .and(query_param("status", status))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(code))
            .mount(&self.mock_server)
            .await;
    }
}

pub fn user(id: &str) -> Value {
    json!({
        "_id": id,
        "fullname": format!("User {id}"),
        "companyName": "Acme",
        "role": "Engineer",
    })
}

/// `count` users with ids `{prefix}0..{prefix}{count-1}`.
pub fn users(prefix: &str, count: usize) -> Vec<Value> {
    (0..count).map(|i| user(&format!("{prefix}{i}"))).collect()
}
