//! Object URL policy

use std::time::Duration;

/// How `put` builds the URL handed back to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStrategy {
    /// `https://{bucket}.s3.amazonaws.com/{key}`, computed locally, never expires
    Public,

    /// SigV4 signed GET URL valid for `expires_in`
    Presigned { expires_in: Duration },
}

impl UrlStrategy {
    /// Default lifetime of a presigned URL: 15 hours
    pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(15 * 60 * 60);

    pub fn presigned(expires_in: Duration) -> Self {
        Self::Presigned { expires_in }
    }
}

impl Default for UrlStrategy {
    fn default() -> Self {
        Self::presigned(Self::DEFAULT_PRESIGN_EXPIRY)
    }
}

/// Virtual-hosted URL for an object; the key is used verbatim
pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}
