#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use url::Url;

    use crate::model::{CacheKey, Response};
    use crate::storage::{Bucket, BucketStore, DiskStore, MatchOptions, MemoryStore};

    fn key(path: &str) -> CacheKey {
        CacheKey::get(&Url::parse(&format!("https://example.com/app/{path}")).unwrap())
    }

    fn response(body: &str) -> Response {
        Response::new(
            200,
            "OK",
            vec![("content-type".to_string(), "text/plain".to_string())],
            Bytes::from(body.to_string()),
        )
    }

    #[tokio::test]
    async fn test_memory_round_trip_and_overwrite() {
        let store = MemoryStore::new();
        let bucket = store.open("assets-v1").await.unwrap();

        bucket.put(key("a.js"), response("one")).await.unwrap();
        bucket.put(key("a.js"), response("two")).await.unwrap();

        let found = bucket
            .lookup(&key("a.js"), MatchOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.body, Bytes::from("two"));
        assert!(bucket
            .lookup(&key("b.js"), MatchOptions::default())
            .await
            .unwrap()
            .is_none());
    }

    /// Test that identity is exact by default and query-insensitive on
    /// request.
    #[tokio::test]
    async fn test_memory_ignore_query_match() {
        let store = MemoryStore::new();
        let bucket = store.open("assets-v1").await.unwrap();
        bucket.put(key("a.js?v=1"), response("versioned")).await.unwrap();

        assert!(bucket
            .lookup(&key("a.js?v=2"), MatchOptions::default())
            .await
            .unwrap()
            .is_none());
        assert!(bucket
            .lookup(&key("a.js?v=2"), MatchOptions { ignore_query: true })
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_memory_list_and_delete() {
        let store = MemoryStore::new();
        store.open("assets-v1").await.unwrap();
        store.open("assets-v2").await.unwrap();

        let mut names = store.list().await.unwrap();
        names.sort();
        assert_eq!(names, vec!["assets-v1".to_string(), "assets-v2".to_string()]);

        assert!(store.delete("assets-v1").await.unwrap());
        assert!(!store.delete("assets-v1").await.unwrap());
        assert!(!store.contains("assets-v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_memory_entry_delete_and_keys() {
        let store = MemoryStore::new();
        let bucket = store.open("assets-v1").await.unwrap();
        bucket.put(key("a.js"), response("a")).await.unwrap();
        bucket.put(key("b.js"), response("b")).await.unwrap();

        assert!(bucket.delete(&key("a.js")).await.unwrap());
        assert!(!bucket.delete(&key("a.js")).await.unwrap());

        let keys = bucket.keys().await.unwrap();
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].url(), "https://example.com/app/b.js");
    }

    /// Test that disk entries survive reopening the store, statuses and
    /// headers included.
    #[tokio::test]
    async fn test_disk_round_trip_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = DiskStore::new(dir.path());
            let bucket = store.open("assets-v1").await.unwrap();
            bucket.put(key("a.js"), response("persisted")).await.unwrap();
        }

        let store = DiskStore::new(dir.path());
        let bucket = store.open("assets-v1").await.unwrap();
        let found = bucket
            .lookup(&key("a.js"), MatchOptions::default())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.body, Bytes::from("persisted"));
        assert_eq!(found.status, 200);
        assert_eq!(found.header("content-type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_disk_bucket_delete_removes_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let bucket = store.open("assets-v1").await.unwrap();
        bucket.put(key("a.js"), response("gone soon")).await.unwrap();

        assert!(store.delete("assets-v1").await.unwrap());
        assert!(!store.contains("assets-v1").await.unwrap());
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.delete("assets-v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_disk_rejects_traversal_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());

        assert!(store.open("../escape").await.is_err());
        assert!(store.delete("a/b").await.is_err());
        assert!(store.open("").await.is_err());
    }

    #[tokio::test]
    async fn test_disk_keys_lists_stored_identities() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let bucket = store.open("assets-v1").await.unwrap();
        bucket.put(key("a.js"), response("a")).await.unwrap();
        bucket.put(key("b.js"), response("b")).await.unwrap();

        let mut keys = bucket.keys().await.unwrap();
        keys.sort_by(|x, y| x.url().cmp(y.url()));
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].url(), "https://example.com/app/a.js");
        assert_eq!(keys[1].url(), "https://example.com/app/b.js");
    }

    #[tokio::test]
    async fn test_disk_ignore_query_scans_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = DiskStore::new(dir.path());
        let bucket = store.open("assets-v1").await.unwrap();
        bucket.put(key("a.js?v=1"), response("versioned")).await.unwrap();

        assert!(bucket
            .lookup(&key("a.js?v=9"), MatchOptions { ignore_query: true })
            .await
            .unwrap()
            .is_some());
    }
}
