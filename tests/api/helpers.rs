use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Result;
use leadhub::{config::get_or_init_config, database::DbManager, App, AppState};
use serde_json::Value;
use tokio::net::TcpListener;

/// Trying to bind port 0 will trigger an OS scan for an available port
/// which will then be bound to the application.
const TEST_SOCK_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 0);

pub struct TestApp {
    pub addr: SocketAddr,
    pub dm: DbManager,
    pub http_client: reqwest::Client,
}

impl TestApp {
    /// Spawns the full application on a random port with a freshly migrated,
    /// uniquely named test database.
    pub async fn spawn() -> Result<TestApp> {
        let config = get_or_init_config();

        let dm = DbManager::test_init(config).await?;
        let app_state = AppState::new(dm.clone(), &config.net_config);

        let listener = TcpListener::bind(&TEST_SOCK_ADDR).await?;
        let addr = listener.local_addr()?;

        tokio::spawn(leadhub::serve(App::new(app_state, listener)));

        Ok(TestApp {
            addr,
            dm,
            http_client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self.http_client.get(self.url(path)).send().await?)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?)
    }

    /// Subscribes `email` and reads the issued token straight from the
    /// database, standing in for the unimplemented confirmation email.
    pub async fn subscribe_and_fetch_token(&self, email: &str) -> Result<String> {
        let res = self
            .post_json("/api/subscribe", &serde_json::json!({ "email": email }))
            .await?;
        assert_eq!(res.status(), reqwest::StatusCode::OK);

        let token: String = sqlx::query_scalar("SELECT token FROM subscribers WHERE email = $1")
            .bind(email)
            .fetch_one(self.dm.db())
            .await?;
        Ok(token)
    }
}
