//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in process: repositories come from the in-memory store, blobs
//! go to a temporary directory and the job queue has no background worker, so
//! tests drain it explicitly.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use hearth_api::auth::ApiToken;
use hearth_api::setup::routes::setup_routes;
use hearth_api::state::{AppState, DbState, MediaState};
use hearth_core::config::SiteConfig;
use hearth_core::models::{NewStaffUser, StaffUser};
use hearth_core::Config;
use hearth_db::{MemoryDatabase, StaffRepositoryTrait};
use hearth_storage::{LocalStorage, Storage};
use hearth_worker::{JobQueue, JobQueueConfig, NotificationFanout, StaffNotifier};
use std::sync::Arc;
use tempfile::TempDir;

pub const STORAGE_BASE_URL: &str = "http://localhost:4000/storage";

/// A signed-in staff member and the raw token to send.
pub struct TestStaff {
    pub user: StaffUser,
    pub token: String,
}

/// Test application: server, backing stores and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub db: Arc<MemoryDatabase>,
    pub storage: Arc<dyn Storage>,
    pub state: Arc<AppState>,
    pub staff: TestStaff,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn bearer(&self) -> String {
        self.staff.token.clone()
    }

    /// Run every queued job through the real notifier, without email.
    pub async fn drain_jobs(&self) -> usize {
        let notifier = StaffNotifier::new(
            self.db.clone(),
            self.db.clone(),
            None,
            &self.state.config,
        );
        self.state
            .job_queue
            .drain(Arc::new(notifier))
            .await
            .expect("Failed to drain job queue")
    }
}

pub fn test_config(storage_path: &str, staff_mailbox: Option<&str>) -> Config {
    let mut site = SiteConfig::default();
    site.local_storage_path = storage_path.to_string();
    site.local_storage_base_url = STORAGE_BASE_URL.to_string();
    if let Some(mailbox) = staff_mailbox {
        site.email_notifications_enabled = true;
        site.staff_mailbox = Some(mailbox.to_string());
    }
    Config::from(site)
}

pub async fn create_staff(db: &MemoryDatabase, name: &str, email: &str) -> TestStaff {
    let user = StaffRepositoryTrait::create(
        db,
        NewStaffUser {
            name: name.to_string(),
            email: email.to_string(),
            api_token_hash: None,
        },
    )
    .await
    .expect("Failed to create staff user");

    let token = ApiToken::generate(user.id);
    StaffRepositoryTrait::set_api_token_hash(db, user.id, &token.secret_hash())
        .await
        .expect("Failed to store token hash");

    TestStaff {
        user,
        token: token.to_string(),
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(None).await
}

/// Like [`setup_test_app`], with staff emails routed to `staff_mailbox`.
pub async fn setup_test_app_with(staff_mailbox: Option<&str>) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().into_owned();
    let config = test_config(&storage_path, staff_mailbox);

    let db = Arc::new(MemoryDatabase::new());
    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path(), STORAGE_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );

    let job_queue = Arc::new(JobQueue::new_no_worker(
        db.clone(),
        JobQueueConfig::from_config(&config),
    ));
    let fanout = NotificationFanout::from_config(job_queue.clone(), &config);

    let state = Arc::new(AppState {
        config: config.clone(),
        db: DbState::shared(db.clone(), None),
        media: MediaState::new(storage.clone(), &config),
        fanout,
        job_queue,
    });

    let router = setup_routes(&config, state.clone())
        .await
        .expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to create test server");

    let staff = create_staff(&db, "Dana Whitfield", "dana@hearth.test").await;

    TestApp {
        server,
        db,
        storage,
        state,
        staff,
        _temp_dir: temp_dir,
    }
}
