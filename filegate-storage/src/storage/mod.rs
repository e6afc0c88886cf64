//! Object store backends

mod ephemeral;
mod s3;
mod traits;
mod url;

#[cfg(test)]
mod tests;

pub use ephemeral::EphemeralStore;
pub use s3::{S3Settings, S3Store};
pub use traits::{ObjectStore, DEFAULT_PAGE_SIZE};
pub use url::{public_url, UrlStrategy};
