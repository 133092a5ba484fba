//! Integration test helpers
//!
//! Spawns the full application on a random port with an in-memory database
//! and a fixed set of directory users.

#![allow(dead_code)]

use std::sync::{Arc, LazyLock};

use roster_core::{EmployeeStore, NewEmployee, RosterConfig, StaticAuthenticator};
use roster_web::{AppState, RosterServer};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const MANAGER: (&str, &str) = ("alice@x.com", "alice-pw");
pub const STAFF: (&str, &str) = ("bob@x.com", "bob-pw");
/// Known to the directory but absent from the employee table
pub const OUTSIDER: (&str, &str) = ("carol@x.com", "carol-pw");

// Initialise tracing only once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(std::io::sink)
            .finish();
        tracing::subscriber::set_global_default(subscriber).ok();
    }
});

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub store: EmployeeStore,
    pub upload_dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// GET a page and return its body, asserting a 200
    pub async fn get_page(&self, path: &str) -> String {
        let response = self.get(path).await;
        assert_eq!(response.status().as_u16(), 200, "GET {}", path);
        response.text().await.expect("Failed to read body.")
    }

    pub async fn post_login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Sign in as the seeded manager and drain the welcome flash
    pub async fn login_as_manager(&self) {
        let response = self.post_login(MANAGER.0, MANAGER.1).await;
        assert_is_redirect_to(&response, "/");
        self.get_page("/").await;
    }

    pub async fn post_upload(&self, file_name: &str, contents: &str) -> reqwest::Response {
        let part = reqwest::multipart::Part::bytes(contents.as_bytes().to_vec())
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .expect("Invalid mime type.");
        let form = reqwest::multipart::Form::new().part("file", part);

        self.client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_option(&self, choice: &str) -> reqwest::Response {
        self.client
            .post(self.url("/options"))
            .form(&[("dropdown", choice)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn employee_emails(&self) -> Vec<String> {
        self.store
            .list()
            .await
            .expect("Failed to list employees.")
            .into_iter()
            .map(|employee| employee.email)
            .collect()
    }
}

/// Start the application with a seeded manager and staff member
pub async fn spawn_app() -> TestApp {
    LazyLock::force(&TRACING);

    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir.");

    let mut config = RosterConfig::default();
    config.database.url = "sqlite::memory:".to_string();
    config.uploads.dir = upload_dir.path().to_path_buf();
    config.server.secret_key = "integration-test-secret".to_string();

    let store = EmployeeStore::connect(&config.database.url)
        .await
        .expect("Failed to connect to database.");
    store
        .insert(&NewEmployee::new("Alice", MANAGER.0, "Manager"))
        .await
        .unwrap();
    store
        .insert(&NewEmployee::new("Bob", STAFF.0, "Staff"))
        .await
        .unwrap();

    let directory = StaticAuthenticator::new()
        .with_user(MANAGER.0, MANAGER.1)
        .with_user(STAFF.0, STAFF.1)
        .with_user(OUTSIDER.0, OUTSIDER.1);

    let state = AppState::with_parts(config, store.clone(), Arc::new(directory))
        .await
        .expect("Failed to build state.");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(RosterServer::from_state(state).serve(listener));

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client,
        store,
        upload_dir,
    }
}

/// Assert the response is a redirect
pub fn assert_is_redirect_to(response: &reqwest::Response, location: &str) {
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(response.headers().get("Location").unwrap(), location);
}
