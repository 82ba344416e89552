//! Test helpers for integration tests
//!
//! Spawns the mock AMA server on an ephemeral port and hands out clients
//! pointed at it.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ama_http::ApiClient;
use ama_stream::WsConnector;
use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::server::MockAma;

/// Default wait for asynchronous effects
pub const WAIT: Duration = Duration::from_secs(5);

/// Mock server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: Arc<MockAma>,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new mock server
    pub async fn start() -> Result<Self> {
        let state = MockAma::new();
        let app = state.router();

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// REST root, as the SDK expects it
    pub fn api_url(&self) -> String {
        format!("{}/api", self.base_url())
    }

    /// WebSocket root
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.addr)
    }

    pub fn api_client(&self) -> ApiClient {
        ApiClient::with_client(self.client.clone(), self.api_url())
    }

    pub fn ws_connector(&self) -> WsConnector {
        WsConnector::new(self.ws_url())
    }

    /// Make a raw GET request against the server root
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// An address nothing listens on
pub async fn closed_port_url() -> Result<String> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}/api"))
}

/// Poll `check` until it returns true or `WAIT` elapses
pub async fn wait_until<F, Fut>(mut check: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + WAIT;
    while !check().await {
        if tokio::time::Instant::now() >= deadline {
            anyhow::bail!("Condition not met within {:?}", WAIT);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    Ok(())
}

/// Await `future`, failing after `WAIT`
pub async fn within<T>(future: impl Future<Output = T>) -> Result<T> {
    tokio::time::timeout(WAIT, future)
        .await
        .map_err(|_| anyhow::anyhow!("Timed out after {:?}", WAIT))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}
