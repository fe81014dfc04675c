use super::*;
use crate::credential::CredentialOrigin;

fn key(name: &str) -> CredentialKey {
    CredentialKey::new(CredentialOrigin::App, name)
}

#[test]
fn fresh_map_does_not_contain_unmarked_key() {
    let map = RateLimitMap::new(10, Duration::minutes(1));
    assert!(!map.contains(&key("a")));
}

#[test]
fn marked_key_is_contained_until_reset_plus_padding() {
    let map = RateLimitMap::new(10, Duration::seconds(0));
    map.mark(key("a"), Utc::now() + Duration::hours(1));
    assert!(map.contains(&key("a")));
}

#[test]
fn marking_in_the_past_evicts_immediately() {
    let map = RateLimitMap::new(10, Duration::seconds(0));
    map.mark(key("a"), Utc::now() - Duration::hours(1));
    assert!(!map.contains(&key("a")));
}

#[test]
fn remarking_overwrites_reset_instant() {
    let map = RateLimitMap::new(10, Duration::seconds(0));
    map.mark(key("a"), Utc::now() - Duration::hours(1));
    assert!(!map.contains(&key("a")));
    map.mark(key("a"), Utc::now() + Duration::hours(1));
    assert!(map.contains(&key("a")));
    assert_eq!(map.len(), 1);
}

#[test]
fn overflow_evicts_earliest_reset_first() {
    let map = RateLimitMap::new(2, Duration::minutes(5));
    map.mark(key("soonest"), Utc::now() + Duration::minutes(1));
    map.mark(key("later"), Utc::now() + Duration::hours(1));
    map.mark(key("newest"), Utc::now() + Duration::hours(2));

    assert_eq!(map.len(), 2);
    assert!(!map.contains(&key("soonest")));
    assert!(map.contains(&key("later")));
    assert!(map.contains(&key("newest")));
}

#[test]
fn distinct_origins_with_same_name_are_independent() {
    let map = RateLimitMap::new(10, Duration::seconds(0));
    let app_key = CredentialKey::new(CredentialOrigin::App, "shared");
    let pat_key = CredentialKey::new(CredentialOrigin::Pat, "shared");

    map.mark(app_key.clone(), Utc::now() + Duration::hours(1));

    assert!(map.contains(&app_key));
    assert!(!map.contains(&pat_key));
}
