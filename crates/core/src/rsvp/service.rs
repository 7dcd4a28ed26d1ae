//! RSVP service
//!
//! The remote attendee record at `events/{eventId}/attendees/{uid}` is the
//! source of truth. The optional on-device flag `rsvp:{uid}:{eventId}` is only a
//! hint; how far it is trusted is set by [`RsvpCachePolicy`].

use std::sync::Arc;

use eventide_domain::constants::rsvp_cache_key;
use eventide_domain::{
    Attendee, AuthUser, EventideError, FieldValue, OrderBy, Result, RsvpCachePolicy, RsvpState,
};
use tracing::{debug, info, warn};

use crate::auth::AuthProvider;
use crate::cache_ports::KeyValueCache;
use crate::document_ports::DocumentStore;
use crate::utils::{fields, paths};

/// RSVP status service
pub struct RsvpService {
    auth: Arc<dyn AuthProvider>,
    documents: Arc<dyn DocumentStore>,
    cache: Option<Arc<dyn KeyValueCache>>,
    policy: RsvpCachePolicy,
}

impl RsvpService {
    /// Service without an on-device cache; every status check is remote.
    pub fn new(auth: Arc<dyn AuthProvider>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { auth, documents, cache: None, policy: RsvpCachePolicy::default() }
    }

    pub fn with_cache(mut self, cache: Arc<dyn KeyValueCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_policy(mut self, policy: RsvpCachePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Record the current user as attending `event_id`. Repeating it simply
    /// overwrites the record.
    pub async fn rsvp(&self, event_id: &str) -> Result<()> {
        let user = self.require_user()?;
        let record = fields([
            ("uid", FieldValue::from(user.uid.as_str())),
            ("email", FieldValue::from(user.email.clone())),
            ("rsvpedAt", FieldValue::ServerTimestamp),
        ]);
        self.documents.set(&paths::attendee(event_id, &user.uid)?, record).await?;
        self.write_hint(&user.uid, event_id, true).await;
        info!(event_id, uid = %user.uid, "RSVP recorded");
        Ok(())
    }

    /// Remove the current user's attendance record. Absent records are fine.
    pub async fn cancel(&self, event_id: &str) -> Result<()> {
        let user = self.require_user()?;
        self.documents.delete(&paths::attendee(event_id, &user.uid)?).await?;
        self.write_hint(&user.uid, event_id, false).await;
        info!(event_id, uid = %user.uid, "RSVP cancelled");
        Ok(())
    }

    /// Whether the current user is attending `event_id`. Always `false`
    /// without a session.
    pub async fn is_rsvped(&self, event_id: &str) -> Result<bool> {
        let Some(user) = self.auth.current_user() else {
            return Ok(false);
        };

        if self.policy == RsvpCachePolicy::TrustCachedPositive
            && self.read_hint(&user.uid, event_id).await == Some(true)
        {
            debug!(event_id, "RSVP answered from cache");
            return Ok(true);
        }

        let found = self.documents.get(&paths::attendee(event_id, &user.uid)?).await?.is_some();
        match self.policy {
            RsvpCachePolicy::TrustCachedPositive if found => {
                self.write_hint(&user.uid, event_id, true).await
            }
            RsvpCachePolicy::TrustCachedPositive => {}
            RsvpCachePolicy::ConfirmWithRemote => {
                self.write_hint(&user.uid, event_id, found).await
            }
        }
        Ok(found)
    }

    pub async fn state(&self, event_id: &str) -> Result<RsvpState> {
        self.is_rsvped(event_id).await.map(RsvpState::from_flag)
    }

    /// Flip `current` and return the new state.
    pub async fn toggle(&self, event_id: &str, current: RsvpState) -> Result<RsvpState> {
        match current {
            RsvpState::Rsvped => {
                self.cancel(event_id).await?;
                Ok(RsvpState::NotRsvped)
            }
            RsvpState::NotRsvped => {
                self.rsvp(event_id).await?;
                Ok(RsvpState::Rsvped)
            }
        }
    }

    /// Attendees of `event_id`, most recent RSVP first.
    pub async fn list_attendees(&self, event_id: &str) -> Result<Vec<Attendee>> {
        let documents = self
            .documents
            .list(&paths::attendees(event_id)?, Some(OrderBy::desc("rsvpedAt")))
            .await?;
        Ok(documents
            .into_iter()
            .map(|doc| Attendee {
                uid: doc.get_str("uid").map_or_else(|| doc.id.clone(), str::to_string),
                email: doc.get_str("email").map(str::to_string),
                rsvped_at: doc.get_timestamp("rsvpedAt"),
            })
            .collect())
    }

    fn require_user(&self) -> Result<AuthUser> {
        self.auth.current_user().ok_or(EventideError::AuthenticationRequired)
    }

    async fn read_hint(&self, uid: &str, event_id: &str) -> Option<bool> {
        let cache = self.cache.as_ref()?;
        match cache.get_bool(&rsvp_cache_key(uid, event_id)).await {
            Ok(hint) => hint,
            Err(err) => {
                warn!(event_id, error = %err, "Failed to read RSVP hint");
                None
            }
        }
    }

    async fn write_hint(&self, uid: &str, event_id: &str, rsvped: bool) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(err) = cache.set_bool(&rsvp_cache_key(uid, event_id), rsvped).await {
            warn!(event_id, error = %err, "Failed to write RSVP hint");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{InMemoryAuthProvider, InMemoryDocumentStore, InMemoryKeyValueCache};

    struct Harness {
        documents: Arc<InMemoryDocumentStore>,
        cache: Arc<InMemoryKeyValueCache>,
        service: RsvpService,
    }

    fn harness(auth: InMemoryAuthProvider, policy: RsvpCachePolicy) -> Harness {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let cache = Arc::new(InMemoryKeyValueCache::new());
        let service = RsvpService::new(Arc::new(auth), documents.clone())
            .with_cache(cache.clone())
            .with_policy(policy);
        Harness { documents, cache, service }
    }

    fn signed_in(policy: RsvpCachePolicy) -> Harness {
        harness(InMemoryAuthProvider::signed_in("abc123", Some("a@b.c")), policy)
    }

    #[tokio::test]
    async fn rsvp_writes_record_and_hint() {
        let h = signed_in(RsvpCachePolicy::default());

        h.service.rsvp("evt-42").await.unwrap();

        let record = h.documents.fields_at("events/evt-42/attendees/abc123").unwrap();
        assert_eq!(record["uid"], FieldValue::from("abc123"));
        assert_eq!(record["email"], FieldValue::from("a@b.c"));
        assert!(matches!(record["rsvpedAt"], FieldValue::Timestamp(_)));
        assert_eq!(h.cache.peek_bool("rsvp:abc123:evt-42"), Some(true));
        assert!(h.service.is_rsvped("evt-42").await.unwrap());
    }

    #[tokio::test]
    async fn rsvp_twice_keeps_a_single_record() {
        let h = signed_in(RsvpCachePolicy::default());
        h.service.rsvp("evt-42").await.unwrap();
        h.service.rsvp("evt-42").await.unwrap();
        assert_eq!(h.service.list_attendees("evt-42").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn cancel_removes_record_and_clears_hint() {
        let h = signed_in(RsvpCachePolicy::default());
        h.service.rsvp("evt-42").await.unwrap();

        h.service.cancel("evt-42").await.unwrap();
        h.service.cancel("evt-42").await.unwrap();

        assert!(h.documents.fields_at("events/evt-42/attendees/abc123").is_none());
        assert_eq!(h.cache.peek_bool("rsvp:abc123:evt-42"), Some(false));
        assert!(!h.service.is_rsvped("evt-42").await.unwrap());
    }

    #[tokio::test]
    async fn anonymous_writes_fail_and_reads_are_false() {
        let h = harness(InMemoryAuthProvider::new(), RsvpCachePolicy::default());
        h.cache.seed_bool("rsvp:abc123:evt-42", true);

        assert_eq!(h.service.rsvp("evt-42").await, Err(EventideError::AuthenticationRequired));
        assert_eq!(h.service.cancel("evt-42").await, Err(EventideError::AuthenticationRequired));
        assert!(!h.service.is_rsvped("evt-42").await.unwrap());
        assert!(h.documents.is_empty());
    }

    #[tokio::test]
    async fn remote_hit_is_cached_but_miss_is_not() {
        let h = signed_in(RsvpCachePolicy::default());
        h.documents.seed("events/e1/attendees/abc123", fields([("uid", "abc123".into())]));

        assert!(h.service.is_rsvped("e1").await.unwrap());
        assert_eq!(h.cache.peek_bool("rsvp:abc123:e1"), Some(true));

        assert!(!h.service.is_rsvped("e2").await.unwrap());
        assert!(!h.cache.contains("rsvp:abc123:e2"));
    }

    #[tokio::test]
    async fn trusted_positive_hint_skips_remote() {
        let h = signed_in(RsvpCachePolicy::TrustCachedPositive);
        h.cache.seed_bool("rsvp:abc123:evt-42", true);
        h.documents.set_offline(true);

        // Stale but answered without touching the (unreachable) store.
        assert!(h.service.is_rsvped("evt-42").await.unwrap());
    }

    #[tokio::test]
    async fn confirm_policy_corrects_stale_hint() {
        let h = signed_in(RsvpCachePolicy::ConfirmWithRemote);
        h.cache.seed_bool("rsvp:abc123:evt-42", true);

        assert!(!h.service.is_rsvped("evt-42").await.unwrap());
        assert_eq!(h.cache.peek_bool("rsvp:abc123:evt-42"), Some(false));
    }

    #[tokio::test]
    async fn cache_faults_do_not_fail_rsvp() {
        let h = signed_in(RsvpCachePolicy::default());
        h.cache.fail_writes(true);
        h.cache.fail_reads(true);

        h.service.rsvp("evt-42").await.unwrap();
        assert!(h.service.is_rsvped("evt-42").await.unwrap());
    }

    #[tokio::test]
    async fn remote_fault_propagates() {
        let h = signed_in(RsvpCachePolicy::default());
        h.documents.set_offline(true);
        assert!(matches!(
            h.service.rsvp("evt-42").await,
            Err(EventideError::RemoteUnavailable(_))
        ));
        assert!(!h.cache.contains("rsvp:abc123:evt-42"));
    }

    #[tokio::test]
    async fn works_without_cache() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let service = RsvpService::new(
            Arc::new(InMemoryAuthProvider::signed_in("abc123", None)),
            documents.clone(),
        );
        service.rsvp("evt-42").await.unwrap();
        assert_eq!(service.state("evt-42").await.unwrap(), RsvpState::Rsvped);
    }

    #[tokio::test]
    async fn toggle_flips_state() {
        let h = signed_in(RsvpCachePolicy::default());
        let state = h.service.toggle("evt-42", RsvpState::NotRsvped).await.unwrap();
        assert_eq!(state, RsvpState::Rsvped);
        let state = h.service.toggle("evt-42", state).await.unwrap();
        assert_eq!(state, RsvpState::NotRsvped);
        assert!(h.documents.is_empty());
    }

    #[tokio::test]
    async fn attendees_newest_first() {
        let documents = Arc::new(InMemoryDocumentStore::new());
        let first = RsvpService::new(
            Arc::new(InMemoryAuthProvider::signed_in("u1", Some("one@x.io"))),
            documents.clone(),
        );
        let second =
            RsvpService::new(Arc::new(InMemoryAuthProvider::signed_in("u2", None)), documents);

        first.rsvp("evt-42").await.unwrap();
        second.rsvp("evt-42").await.unwrap();

        let attendees = first.list_attendees("evt-42").await.unwrap();
        let uids: Vec<_> = attendees.iter().map(|a| a.uid.as_str()).collect();
        assert_eq!(uids, ["u2", "u1"]);
        assert_eq!(attendees[1].email.as_deref(), Some("one@x.io"));
        assert!(attendees[0].rsvped_at > attendees[1].rsvped_at);
    }
}
