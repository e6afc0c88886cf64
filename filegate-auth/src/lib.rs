//! Provider credentials and URL signing for FileGate
//!
//! Loads the access key pair from the credentials file and implements AWS
//! Signature Version 4 query-string presigning for object URLs.

pub mod credentials;
pub mod sigv4;

pub use credentials::{Credentials, CredentialsError};
pub use sigv4::{presign_get_object, virtual_host, SigV4Error};
