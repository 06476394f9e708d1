#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use stockguard_client::{ApiClient, SessionContext};

pub struct StubServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl StubServer {
    /// Serve `app` on an ephemeral port.
    pub async fn spawn(app: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    pub fn client(&self, session: SessionContext) -> ApiClient {
        ApiClient::new(self.base_url.clone(), session)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Base URL of a port nothing listens on.
pub async fn dead_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Poll `check` until it holds or ~2s pass.
pub async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    check()
}

pub fn thinner_json() -> serde_json::Value {
    serde_json::json!({
        "product_name": "HEMPEL THINNER",
        "material": "Solvent",
        "location": "A1",
        "total_litres": 20,
        "date_received": "2024-01-01",
        "best_before_date": "2025-01-01"
    })
}
