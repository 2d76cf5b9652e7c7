use chrono::Duration;
use commander::{
    auth::{Clock, CredentialEntry, SystemClock},
    configuration::Settings,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use lazy_static::lazy_static;
use reqwest::Method;
use secrecy::Secret;
use serde_json::Value;
use std::sync::Arc;

lazy_static! {
    static ref TRACING: () = {
        let default_filter_level = "info".to_string();
        let subscriber_name = "test".to_string();

        if std::env::var("TEST_LOG").is_ok() {
            let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
            init_subscriber(subscriber).expect("Failed to init subscriber");
        } else {
            let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
            init_subscriber(subscriber).expect("Failed to init subscriber");
        };
    };
}

// Lowest cost bcrypt accepts; keeps logins fast in tests.
const TEST_BCRYPT_COST: u32 = 4;

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.api_client
            .post(&format!("{}/api/login/authenticate", &self.address))
            .json(&serde_json::json!({ "userName": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Logs in and returns the token, panicking on failure.
    pub async fn token_for(&self, username: &str, password: &str) -> String {
        let response = self.login(username, password).await;
        assert_eq!(response.status().as_u16(), 200);
        response.text().await.expect("Failed to read token")
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> reqwest::Response {
        let mut builder = self
            .api_client
            .request(method, &format!("{}{}", &self.address, path));
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder.send().await.expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        self.request(Method::GET, path, token, None).await
    }
}

pub fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        // Wildcard port, the system will find available port
        port: 0,
        jwt_secret: Secret::new("integration-test-secret".to_string()),
        token_ttl: Duration::hours(24),
        bcrypt_cost: TEST_BCRYPT_COST,
        credentials: vec![
            CredentialEntry::with_password("admin", "pass", "Administrator"),
            CredentialEntry::with_password("user", "pass", "User"),
        ],
        seed_commands: true,
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_clock(Arc::new(SystemClock)).await
}

pub async fn spawn_app_with_clock(clock: Arc<dyn Clock>) -> TestApp {
    lazy_static::initialize(&TRACING);

    let api_client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let app = Application::build_with_clock(test_settings(), clock)
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());

    let _ = tokio::spawn(app.run_until_stopped());
    TestApp {
        address,
        api_client,
    }
}
