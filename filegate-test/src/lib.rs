//! Test utilities for FileGate
//!
//! - Serve the gateway routes in-process on a random port
//! - Record and fail object store calls on demand
//!
//! ## Usage
//!
//! ```rust,no_run
//! use filegate_test::{RecordingStore, TestServer};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let store = Arc::new(RecordingStore::new("sisdis"));
//! let server = TestServer::start(store.clone()).await.unwrap();
//!
//! let reply = server.client().upload("42", "docs", "a.txt", b"hi").await.unwrap();
//! assert!(reply.status.is_success());
//! # }
//! ```

pub mod client;
pub mod server;
pub mod store;

pub use client::{ClientError, FileGateClient, GatewayResponse};
pub use server::{TestError, TestServer};
pub use store::{RecordingStore, StoreCall};
