//! Shared test helpers for `eventide-core` integration tests.
//!
//! Wires every service against one set of in-memory adapters so scenarios
//! can exercise them together.

use std::sync::Arc;

use eventide_core::testing::{
    InMemoryAuthProvider, InMemoryDocumentStore, InMemoryKeyValueCache, RecordingNotifier,
};
use eventide_core::{
    AuthService, ChatService, FavoritesStore, PushRegistration, RsvpService,
};
use eventide_domain::RsvpCachePolicy;
use tracing_subscriber::EnvFilter;

/// Route service logs to the test harness; `RUST_LOG` picks the level.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct App {
    pub auth_provider: Arc<InMemoryAuthProvider>,
    pub documents: Arc<InMemoryDocumentStore>,
    pub cache: Arc<InMemoryKeyValueCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub auth: AuthService,
    pub rsvp: RsvpService,
    pub chat: ChatService,
    pub favorites: FavoritesStore,
    pub push: PushRegistration,
}

impl App {
    pub async fn start(auth_provider: InMemoryAuthProvider, policy: RsvpCachePolicy) -> Self {
        Self::start_with(
            Arc::new(auth_provider),
            Arc::new(InMemoryDocumentStore::new()),
            Arc::new(InMemoryKeyValueCache::new()),
            policy,
        )
        .await
    }

    /// Start against existing backends, e.g. to simulate a second device or
    /// a restart.
    pub async fn start_with(
        auth_provider: Arc<InMemoryAuthProvider>,
        documents: Arc<InMemoryDocumentStore>,
        cache: Arc<InMemoryKeyValueCache>,
        policy: RsvpCachePolicy,
    ) -> Self {
        init_logging();
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = AuthService::new(auth_provider.clone(), documents.clone(), cache.clone());
        auth.restore().await;
        let rsvp = RsvpService::new(auth_provider.clone(), documents.clone())
            .with_cache(cache.clone())
            .with_policy(policy);
        let chat = ChatService::new(auth_provider.clone(), documents.clone());
        let favorites = FavoritesStore::load(cache.clone()).await.with_notifier(notifier.clone());
        let push = PushRegistration::new(auth_provider.clone(), documents.clone(), cache.clone());

        Self { auth_provider, documents, cache, notifier, auth, rsvp, chat, favorites, push }
    }
}
