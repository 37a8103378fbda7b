use std::net::SocketAddr;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

use smtp_config_api::config::{self, Config};

pub const API_KEY: &str = "test-api-key";
pub const ADMIN_KEY: &str = "test-admin-key";

/// A running test server instance bound to a random local port.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// GET with an optional bearer token.
    pub async fn get(&self, path: &str, token: Option<&str>) -> (Value, StatusCode) {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        send(req).await
    }

    pub async fn post(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        send(self.client.post(self.url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn put(&self, path: &str, token: &str, body: &Value) -> (Value, StatusCode) {
        send(self.client.put(self.url(path)).bearer_auth(token).json(body)).await
    }

    pub async fn delete(&self, path: &str, token: &str) -> (Value, StatusCode) {
        send(self.client.delete(self.url(path)).bearer_auth(token)).await
    }

    /// Create a configuration with the admin key, asserting success.
    pub async fn create_config(&self, code: &str) -> Value {
        let payload = email_config(code);
        let (body, status) = self.post(&format!("/config/{code}"), ADMIN_KEY, &payload).await;
        assert_eq!(status, StatusCode::OK, "create config failed: {body}");
        payload
    }
}

async fn send(req: reqwest::RequestBuilder) -> (Value, StatusCode) {
    let resp = req.send().await.expect("request failed");
    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(json!(null));
    (body, status)
}

/// A complete, valid configuration payload for `code`.
pub fn email_config(code: &str) -> Value {
    json!({
        "smtp_server": "smtp.gmail.com",
        "smtp_port": 587,
        "smtp_username": "mailer@example.com",
        "smtp_password": "super-secret-app-password",
        "use_tls": true,
        "use_ssl": false,
        "from_email": "noreply@example.com",
        "organization_name": format!("Organization {code}"),
        "organization_code": code,
    })
}

pub fn test_config() -> Config {
    Config {
        api_key: API_KEY.to_string(),
        admin_key: ADMIN_KEY.to_string(),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        max_body_size: 16 * 1024,
        log_level: "warn".to_string(),
        initial_configs: Default::default(),
    }
}

/// Spawn a test app with an empty store.
pub async fn spawn_app() -> TestApp {
    spawn_with(test_config()).await
}

/// Spawn a test app seeded from an `INITIAL_CONFIG`-style JSON document.
pub async fn spawn_seeded(initial_config: &Value) -> TestApp {
    let initial_configs = config::parse_initial_config(&initial_config.to_string())
        .expect("seed should be valid");
    spawn_with(Config {
        initial_configs,
        ..test_config()
    })
    .await
}

pub async fn spawn_with(config: Config) -> TestApp {
    let app = smtp_config_api::build_app(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    TestApp {
        addr,
        client: Client::new(),
    }
}
