//! Object storage services for FileGate
//!
//! This crate binds the upload/delete HTTP endpoints to an [`ObjectStore`]
//! backend: in-memory for development and tests, or AWS S3.

pub mod handlers;
pub mod service;
pub mod storage;

pub use handlers::GatewayState;
pub use service::{DeleteService, UploadResult, UploadService};
pub use storage::{EphemeralStore, ObjectStore, S3Settings, S3Store, UrlStrategy};
