//! In-process test server

use filegate_storage::{handlers, GatewayState, ObjectStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// Gateway routes served on an ephemeral localhost port
pub struct TestServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Serve the gateway over `store` with the default form limit
    pub async fn start(store: Arc<dyn ObjectStore>) -> Result<Self, TestError> {
        Self::start_with_limit(store, handlers::DEFAULT_MAX_FORM_BYTES).await
    }

    pub async fn start_with_limit(
        store: Arc<dyn ObjectStore>,
        max_form_bytes: usize,
    ) -> Result<Self, TestError> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(TestError::Bind)?;
        let addr = listener.local_addr().map_err(TestError::Bind)?;

        let app = handlers::routes(max_form_bytes).with_state(Arc::new(GatewayState::new(store)));
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Test server stopped");
            }
        });

        info!(%addr, "FileGate test server ready");
        Ok(Self {
            base_url: format!("http://{}", addr),
            handle,
        })
    }

    /// Get a client for this server
    pub fn client(&self) -> crate::FileGateClient {
        crate::FileGateClient::new(self.base_url.clone())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Errors that can occur with test server
#[derive(Debug, thiserror::Error)]
pub enum TestError {
    #[error("Failed to bind test listener: {0}")]
    Bind(#[source] std::io::Error),
}
