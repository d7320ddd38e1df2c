//! Shared test utilities and fixtures
//!
//! Common infrastructure for integration tests: a wiremock-backed Rise API,
//! an `ApiClient` pointed at it, and recording collaborators.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;
use rise_engine::{FixedClock, FlowServices, Navigator, Screen, ToastQueue};
use rise_providers::{ApiClient, ApiConfig};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-token";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

pub fn days_out(days: u64) -> NaiveDate {
    today().checked_add_days(chrono::Days::new(days)).unwrap()
}

/// Start a mock server that simulates the Rise API
pub async fn start_rise_mock() -> MockServer {
    MockServer::start().await
}

pub fn client_for(server: &MockServer) -> ApiClient {
    client_with_timeout(server, Duration::from_secs(5))
}

pub fn client_with_timeout(server: &MockServer, timeout: Duration) -> ApiClient {
    let config = ApiConfig::new(&server.uri())
        .unwrap()
        .with_token(Some(TEST_TOKEN.to_string()))
        .with_timeout(timeout);
    ApiClient::new(config).unwrap()
}

/// Mount a JSON response for `verb path`.
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}

#[derive(Default)]
pub struct RecordingNavigator {
    exits: AtomicUsize,
    screens: Mutex<Vec<Screen>>,
}

impl RecordingNavigator {
    pub fn exits(&self) -> usize {
        self.exits.load(Ordering::SeqCst)
    }

    pub fn screens(&self) -> Vec<Screen> {
        self.screens.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn exit(&self) {
        self.exits.fetch_add(1, Ordering::SeqCst);
    }

    fn navigate_to(&self, screen: Screen) {
        self.screens.lock().unwrap().push(screen);
    }
}

pub struct Harness {
    pub navigator: Arc<RecordingNavigator>,
    pub toasts: Arc<ToastQueue>,
    pub services: FlowServices,
}

pub fn harness(client: ApiClient) -> Harness {
    let navigator = Arc::new(RecordingNavigator::default());
    let toasts = Arc::new(ToastQueue::new());
    let services = FlowServices {
        mutations: Arc::new(client),
        navigator: navigator.clone(),
        notifier: toasts.clone(),
        clock: Arc::new(FixedClock(today())),
    };
    Harness {
        navigator,
        toasts,
        services,
    }
}
