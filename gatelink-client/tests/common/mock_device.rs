use std::time::Duration;

use gatelink_client::Controller;
use gatelink_client::configs::{Device, Logger, Poller, Settings};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Request timeout used against the mock device; delays above it time out.
pub const REQUEST_TIMEOUT_MS: u64 = 300;

pub struct MockDevice {
    pub server: MockServer,
    pub controller: Controller,
}

impl MockDevice {
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let controller = Controller::from_settings(&settings_for(&server.uri())).unwrap();

        Self { server, controller }
    }

    pub async fn reply(&self, verb: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/{verb}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn status(&self, gate: i64, light: i64) {
        self.reply(
            "getstatus",
            json!({ "code": 9, "gateStatus": gate, "lightStatus": light }),
        )
        .await;
    }

    pub async fn fail(&self, verb: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(format!("/{verb}")))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    pub async fn hang(&self, verb: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{verb}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "code": 9, "gateStatus": 1, "lightStatus": 1 }))
                    .set_delay(Duration::from_millis(REQUEST_TIMEOUT_MS * 5)),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn accept_settings(&self, code: i64) {
        Mock::given(method("POST"))
            .and(path("/setsettings"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "code": code })))
            .mount(&self.server)
            .await;
    }

    pub async fn reset(&self) {
        self.server.reset().await;
    }

    /// Bodies of every `POST /setsettings` the device received.
    pub async fn saved_bodies(&self) -> Vec<Vec<u8>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == "/setsettings")
            .map(|request| request.body)
            .collect()
    }
}

pub fn settings_for(base_url: &str) -> Settings {
    Settings {
        logger: Logger {
            level: "debug".to_string(),
        },
        device: Device {
            base_url: base_url.to_string(),
            request_timeout_ms: REQUEST_TIMEOUT_MS,
            connect_timeout_ms: REQUEST_TIMEOUT_MS,
        },
        poller: Poller { interval_ms: 1000 },
    }
}

pub fn sample_settings() -> Value {
    json!({
        "enableL": true,
        "lightOnTime": 90,
        "lightOffTime": 1439,
        "lightDuration": 20,
        "password": "cancello",
        "behavior": "auto"
    })
}
