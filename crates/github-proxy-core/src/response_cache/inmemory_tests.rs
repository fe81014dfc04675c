use super::*;

fn response(body: &str) -> CachedResponse {
    CachedResponse {
        status: 200,
        headers: vec![("etag".to_string(), "\"abc\"".to_string())],
        body: body.as_bytes().to_vec(),
    }
}

#[tokio::test]
async fn miss_on_empty_cache() {
    let cache = InMemoryResponseCache::new(10);
    let key = CacheKey::new("/users/octocat", None, None);
    assert!(cache.get_raw(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn set_then_get_round_trips() {
    let cache = InMemoryResponseCache::new(10);
    let key = CacheKey::new("/users/octocat", None, None);
    cache
        .set_raw(&key, response("hello"), Duration::from_secs(60))
        .await
        .unwrap();

    let got = cache.get_raw(&key).await.unwrap().expect("present");
    assert_eq!(got.body, b"hello");
}

#[tokio::test]
async fn entries_expire_after_ttl() {
    let cache = InMemoryResponseCache::new(10);
    let key = CacheKey::new("/users/octocat", None, None);
    cache
        .set_raw(&key, response("hello"), Duration::from_millis(0))
        .await
        .unwrap();

    // TTL of zero means the entry is already expired by the time we look.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    assert!(cache.get_raw(&key).await.unwrap().is_none());
}

#[tokio::test]
async fn distinct_query_strings_do_not_collide() {
    let cache = InMemoryResponseCache::new(10);
    let page1 = CacheKey::new("/repos/x/y/pulls", Some("state=closed&page=1".into()), None);
    let page2 = CacheKey::new("/repos/x/y/pulls", Some("state=closed&page=2".into()), None);

    cache
        .set_raw(&page1, response("page-1"), Duration::from_secs(60))
        .await
        .unwrap();

    assert!(cache.get_raw(&page2).await.unwrap().is_none());
    assert_eq!(cache.get_raw(&page1).await.unwrap().unwrap().body, b"page-1");
}

#[tokio::test]
async fn distinct_media_types_do_not_collide() {
    let cache = InMemoryResponseCache::new(10);
    let raw = CacheKey::new("/repos/x/y", None, Some("application/vnd.github.raw".into()));
    let json = CacheKey::new(
        "/repos/x/y",
        None,
        Some("application/vnd.github.v3+json".into()),
    );

    cache
        .set_raw(&raw, response("raw-body"), Duration::from_secs(60))
        .await
        .unwrap();

    assert!(cache.get_raw(&json).await.unwrap().is_none());
}

#[tokio::test]
async fn overflow_evicts_oldest_entry() {
    let cache = InMemoryResponseCache::new(1);
    let first = CacheKey::new("/first", None, None);
    let second = CacheKey::new("/second", None, None);

    cache
        .set_raw(&first, response("first"), Duration::from_secs(60))
        .await
        .unwrap();
    cache
        .set_raw(&second, response("second"), Duration::from_secs(60))
        .await
        .unwrap();

    assert!(cache.get_raw(&first).await.unwrap().is_none());
    assert!(cache.get_raw(&second).await.unwrap().is_some());
}
