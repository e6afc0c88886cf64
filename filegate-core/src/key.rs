//! Storage key construction
//!
//! Uploads land under `{user_id}/{folder_name}/{filename}`. Folder deletion
//! lists by the raw folder name, so the match is an unanchored prefix: the
//! prefix `docs` also covers `docs-old/...`.
//!
//! Segments are not validated. Empty segments yield degenerate keys such as
//! `//file.txt`, and those are stored as given.

use std::borrow::Borrow;
use std::fmt;

/// Path-like identifier of an object inside the bucket
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for StorageKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for StorageKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<&str> for StorageKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Build the key an uploaded file is stored under
pub fn build_upload_key(user_id: &str, folder_name: &str, filename: &str) -> StorageKey {
    StorageKey(format!("{user_id}/{folder_name}/{filename}"))
}

/// Build the listing prefix used to delete a whole folder
pub fn build_folder_prefix(folder_name: &str) -> StorageKey {
    StorageKey(folder_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_key_layout() {
        let key = build_upload_key("42", "photos", "cat.png");
        assert_eq!(key.as_str(), "42/photos/cat.png");
    }

    #[test]
    fn test_upload_key_is_deterministic() {
        let a = build_upload_key("u", "f", "x.txt");
        let b = build_upload_key("u", "f", "x.txt");
        assert_eq!(a, b);
    }

    #[test]
    fn test_upload_key_keeps_empty_segments() {
        assert_eq!(build_upload_key("", "", "file.txt").as_str(), "//file.txt");
        assert_eq!(build_upload_key("u", "", "file.txt").as_str(), "u//file.txt");
        assert_eq!(build_upload_key("u", "f", "").as_str(), "u/f/");
        assert_eq!(build_upload_key("", "", "").as_str(), "//");
    }

    #[test]
    fn test_upload_key_is_verbatim() {
        // No escaping or normalisation of separators or spaces
        let key = build_upload_key("a/b", "my folder", "../x y.txt");
        assert_eq!(key.as_str(), "a/b/my folder/../x y.txt");
    }

    #[test]
    fn test_folder_prefix_is_identity() {
        assert_eq!(build_folder_prefix("42/photos").as_str(), "42/photos");
        assert!(build_folder_prefix("").is_empty());
    }
}
