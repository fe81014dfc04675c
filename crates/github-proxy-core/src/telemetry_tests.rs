use super::*;
use crate::credential::CredentialOrigin;

#[test]
fn noop_sink_does_not_panic() {
    let sink = NoopTelemetrySink;
    let key = CredentialKey::new(CredentialOrigin::Pat, "alice");
    sink.on_inbound_request("alice", "GET", Some(CacheHit::Hit));
    sink.on_inbound_request("alice", "POST", None);
    drop(key);
}
