//! Core types for FileGate
//!
//! This crate provides the storage key policy and the error taxonomy shared by
//! every FileGate crate.

pub mod error;
pub mod key;

pub use error::{BoxError, ErrorKind, GatewayError, Result};
pub use key::{build_folder_prefix, build_upload_key, StorageKey};
