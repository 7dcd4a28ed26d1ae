//! End-to-end flows over the real adapters: REST auth and documents against
//! a mock backend, with the SQLite cache on a temp directory.

use std::sync::Arc;

use eventide_core::testing::sample_event;
use eventide_core::{AuthProvider, FavoritesStore, KeyValueCache, PushRegistration, RsvpService};
use eventide_domain::RsvpCachePolicy;
use eventide_infra::{
    CallableFavoriteNotifier, HttpClient, RestAuthProvider, RestDocumentStore,
    SqliteKeyValueCache,
};
use serde_json::json;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Backend {
    server: MockServer,
    auth: Arc<RestAuthProvider>,
    documents: Arc<RestDocumentStore>,
    cache: Arc<SqliteKeyValueCache>,
    _dir: TempDir,
}

impl Backend {
    async fn signed_in() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/accounts:signInWithPassword"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "localId": "abc123",
                "email": "a@b.c",
                "idToken": "id-tok"
            })))
            .mount(&server)
            .await;

        let http = HttpClient::new().unwrap();
        let auth = Arc::new(RestAuthProvider::new(
            http.clone(),
            format!("{}/auth", server.uri()),
            Some("web-key".into()),
        ));
        auth.sign_in_with_password("a@b.c", "pw").await.unwrap();

        let documents = Arc::new(
            RestDocumentStore::new(http, &format!("{}/docs", server.uri()), auth.clone()).unwrap(),
        );
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(SqliteKeyValueCache::open(dir.path().join("cache.db"), 2).unwrap());

        Self { server, auth, documents, cache, _dir: dir }
    }

    fn rsvp(&self, policy: RsvpCachePolicy) -> RsvpService {
        RsvpService::new(self.auth.clone(), self.documents.clone())
            .with_cache(self.cache.clone())
            .with_policy(policy)
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn rsvp_writes_record_and_answers_from_cache() {
    let backend = Backend::signed_in().await;
    Mock::given(method("PUT"))
        .and(path("/docs/events/evt-42/attendees/abc123"))
        .and(header("authorization", "Bearer id-tok"))
        .and(body_partial_json(json!({"fields": {
            "uid": {"stringValue": "abc123"},
            "email": {"stringValue": "a@b.c"}
        }})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/docs/events/evt-42/attendees/abc123"))
        .respond_with(ResponseTemplate::new(404))
        .expect(0)
        .mount(&backend.server)
        .await;

    let rsvp = backend.rsvp(RsvpCachePolicy::TrustCachedPositive);
    rsvp.rsvp("evt-42").await.unwrap();

    assert!(rsvp.is_rsvped("evt-42").await.unwrap());
}

#[tokio::test(flavor = "multi_thread")]
async fn confirm_policy_reads_remote_and_rewrites_hint() {
    let backend = Backend::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/docs/events/evt-7/attendees/abc123"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&backend.server)
        .await;

    backend.cache.set_bool("rsvp:abc123:evt-7", true).await.unwrap();

    let confirming = backend.rsvp(RsvpCachePolicy::ConfirmWithRemote);
    assert!(!confirming.is_rsvped("evt-7").await.unwrap());
    assert_eq!(backend.cache.get_bool("rsvp:abc123:evt-7").await.unwrap(), Some(false));
}

#[tokio::test(flavor = "multi_thread")]
async fn favorites_persist_and_notify_registered_device() {
    let backend = Backend::signed_in().await;
    Mock::given(method("PATCH"))
        .and(path("/docs/users/abc123"))
        .and(body_partial_json(json!({"fields": {"fcmToken": {"stringValue": "device-1"}}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/functions/notifyOnFavorite"))
        .and(body_partial_json(json!({"data": {"eventName": "Event evt-1", "fcmToken": "device-1"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": {"success": true}})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let push = PushRegistration::new(
        backend.auth.clone(),
        backend.documents.clone(),
        backend.cache.clone(),
    );
    push.register_token("device-1").await.unwrap();

    let notifier = Arc::new(CallableFavoriteNotifier::new(
        HttpClient::new().unwrap(),
        format!("{}/functions", backend.server.uri()),
        backend.auth.clone(),
    ));
    let favorites = FavoritesStore::load(backend.cache.clone()).await.with_notifier(notifier);
    assert!(favorites.add_favorite(sample_event("evt-1")).await);

    let reloaded = FavoritesStore::load(backend.cache.clone()).await;
    let ids: Vec<_> = reloaded.list_favorites().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, ["evt-1"]);
}
