use super::*;

#[test]
fn rejects_malformed_connection_url() {
    let result = RedisResponseCache::new("not-a-redis-url");
    assert!(result.is_err());
}

#[test]
fn accepts_well_formed_redis_url() {
    let result = RedisResponseCache::new("redis://127.0.0.1:6379");
    assert!(result.is_ok());
}

// Exercising get_raw/set_raw against a real server is covered by the
// black-box scenarios under github-proxy-api/tests, which run against a
// docker-compose Redis instance rather than assuming one is reachable from
// a plain unit test run.
#[tokio::test]
#[ignore = "requires a reachable Redis instance"]
async fn round_trips_a_cached_response() {
    let cache = RedisResponseCache::new("redis://127.0.0.1:6379").unwrap();
    let key = CacheKey::new("/users/octocat", None, None);
    let response = CachedResponse {
        status: 200,
        headers: vec![("etag".to_string(), "\"abc\"".to_string())],
        body: b"hello".to_vec(),
    };

    cache
        .set_raw(&key, response.clone(), Duration::from_secs(60))
        .await
        .unwrap();

    let got = cache.get_raw(&key).await.unwrap().expect("present");
    assert_eq!(got, response);
}
