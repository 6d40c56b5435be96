#![allow(dead_code)]

use std::net::SocketAddr;

use anyhow::{Context, Result};
use orgres_api::handlers::PageLimits;
use orgres_api::server::{self, Stores};
use uuid::Uuid;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

impl TestServer {
    /// Serve a fresh app on an ephemeral port for the lifetime of the test runtime
    pub async fn spawn_with(stores: Stores) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let addr = listener.local_addr()?;
        let app = server::app(stores, PageLimits::default());

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            base_url: format!("http://{}", addr),
        })
    }

    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(Stores::memory()).await
    }
}

/// Unique name in the style `test<suffix>`
pub fn random_name() -> String {
    format!("test{}", &Uuid::new_v4().simple().to_string()[..8])
}
