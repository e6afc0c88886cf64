//! Tests for the in-memory object store

use super::*;
use bytes::Bytes;
use filegate_auth::Credentials;
use filegate_core::{build_folder_prefix, build_upload_key, StorageKey};
use std::time::Duration;

/// Test helper to create storage
fn storage() -> EphemeralStore {
    EphemeralStore::new("sisdis")
}

fn key(k: &str) -> StorageKey {
    StorageKey::from(k)
}

// =============================================================================
// PUT
// =============================================================================

mod put_tests {
    use super::*;

    #[tokio::test]
    async fn test_put_stores_content() {
        let s = storage();
        s.put(&key("1/docs/a.txt"), Bytes::from("hello")).await.unwrap();
        assert_eq!(s.get("1/docs/a.txt"), Some(Bytes::from("hello")));
    }

    #[tokio::test]
    async fn test_put_returns_public_url() {
        let s = storage();
        let url = s.put(&key("1/docs/a.txt"), Bytes::from("x")).await.unwrap();
        assert_eq!(url, "https://sisdis.s3.amazonaws.com/1/docs/a.txt");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let s = storage();
        s.put(&key("k"), Bytes::from("v1")).await.unwrap();
        s.put(&key("k"), Bytes::from("v2")).await.unwrap();
        assert_eq!(s.get("k"), Some(Bytes::from("v2")));
        assert_eq!(s.len(), 1);
    }

    #[tokio::test]
    async fn test_put_empty_body() {
        let s = storage();
        s.put(&key("empty"), Bytes::new()).await.unwrap();
        assert_eq!(s.get("empty"), Some(Bytes::new()));
    }

    #[tokio::test]
    async fn test_put_degenerate_key() {
        let s = storage();
        let k = build_upload_key("", "", "file.txt");
        let url = s.put(&k, Bytes::from("x")).await.unwrap();
        assert!(s.contains("//file.txt"));
        assert_eq!(url, "https://sisdis.s3.amazonaws.com///file.txt");
    }

    #[tokio::test]
    async fn test_put_presigned_url() {
        let s = storage().with_presigned_urls(
            Credentials::new("AKIDEXAMPLE", "secret"),
            "us-east-1",
            Duration::from_secs(900),
        );
        let url = s.put(&key("1/docs/a.txt"), Bytes::from("x")).await.unwrap();
        assert!(url.starts_with("https://sisdis.s3.amazonaws.com/1/docs/a.txt?"));
        assert!(url.contains("X-Amz-Expires=900"));
        assert!(url.contains("X-Amz-Credential=AKIDEXAMPLE%2F"));
        assert!(url.contains("&X-Amz-Signature="));
    }

    #[tokio::test]
    async fn test_put_presign_failure_is_upload_error() {
        let s = storage().with_presigned_urls(
            Credentials::new("AKIDEXAMPLE", "secret"),
            "us-east-1",
            Duration::ZERO,
        );
        let err = s.put(&key("k"), Bytes::from("x")).await.unwrap_err();
        assert_eq!(err.kind(), filegate_core::ErrorKind::Upload);
        assert_eq!(err.key(), Some("k"));
    }
}

// =============================================================================
// DELETE
// =============================================================================

mod delete_tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_delete_is_gone() {
        let s = storage();
        let k = build_upload_key("7", "pics", "cat.png");
        s.put(&k, Bytes::from("meow")).await.unwrap();
        assert!(s.contains(k.as_str()));

        s.delete(&k).await.unwrap();
        assert!(!s.contains(k.as_str()));
        assert_eq!(s.get(k.as_str()), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let s = storage();
        s.delete(&key("nope")).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_only_touches_one_key() {
        let s = storage();
        s.put(&key("a/1"), Bytes::from("1")).await.unwrap();
        s.put(&key("a/10"), Bytes::from("10")).await.unwrap();
        s.delete(&key("a/1")).await.unwrap();
        assert_eq!(s.keys(), vec!["a/10".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_many_in_order() {
        let s = storage();
        for k in ["a/1", "a/2", "b/1"] {
            s.put(&key(k), Bytes::from("x")).await.unwrap();
        }
        s.delete_many(&[key("a/1"), key("a/2")]).await.unwrap();
        assert_eq!(s.keys(), vec!["b/1".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_many_empty() {
        let s = storage();
        s.put(&key("a/1"), Bytes::from("x")).await.unwrap();
        s.delete_many(&[]).await.unwrap();
        assert_eq!(s.len(), 1);
    }
}

// =============================================================================
// LIST
// =============================================================================

mod list_tests {
    use super::*;

    async fn seeded(keys: &[&str]) -> EphemeralStore {
        let s = storage();
        for k in keys {
            s.put(&key(k), Bytes::from("x")).await.unwrap();
        }
        s
    }

    #[tokio::test]
    async fn test_list_by_prefix_sorted() {
        let s = seeded(&["a/2", "b/1", "a/1"]).await;
        let keys = s.list_by_prefix(&build_folder_prefix("a")).await.unwrap();
        assert_eq!(keys, vec![key("a/1"), key("a/2")]);
    }

    #[tokio::test]
    async fn test_list_prefix_is_unanchored() {
        let s = seeded(&["docs/1", "docs-old/1", "doc"]).await;
        let keys = s.list_by_prefix(&key("docs")).await.unwrap();
        assert_eq!(keys, vec![key("docs-old/1"), key("docs/1")]);
    }

    #[tokio::test]
    async fn test_list_empty_prefix_matches_everything() {
        let s = seeded(&["x", "y/z"]).await;
        let keys = s.list_by_prefix(&key("")).await.unwrap();
        assert_eq!(keys.len(), 2);
    }

    #[tokio::test]
    async fn test_list_no_match() {
        let s = seeded(&["a/1"]).await;
        assert!(s.list_by_prefix(&key("z")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_single_page_limit() {
        let s = seeded(&["p/1", "p/2", "p/3", "p/4", "p/5"]).await.with_page_size(2);
        let keys = s.list_by_prefix(&key("p/")).await.unwrap();
        assert_eq!(keys, vec![key("p/1"), key("p/2")]);
    }

    #[tokio::test]
    async fn test_list_all_pages() {
        let s = seeded(&["p/1", "p/2", "p/3", "p/4", "p/5"])
            .await
            .with_page_size(2)
            .with_list_all_pages(true);
        let keys = s.list_by_prefix(&key("p/")).await.unwrap();
        assert_eq!(keys.len(), 5);
    }
}
