//! Dependency container for one CLI invocation

use std::sync::Arc;

use eventide_core::{
    AdminEventService, AuthService, ChatService, EventFeed, FavoritesStore, PushRegistration,
    RsvpService,
};
use eventide_domain::{Config, Result};
use eventide_infra::{
    CallableFavoriteNotifier, FcmPushGateway, HttpClient, RapidApiEventSource, RestAuthProvider,
    RestDocumentStore, SqliteKeyValueCache,
};
use tracing::debug;

/// Services wired against the configured backends. The persisted session is
/// restored before any command runs.
pub struct AppContext {
    pub config: Config,
    pub auth: AuthService,
    pub rsvp: RsvpService,
    pub chat: ChatService,
    pub feed: EventFeed,
    pub favorites: FavoritesStore,
    pub push: PushRegistration,
    pub admin: AdminEventService,
    http: HttpClient,
}

impl AppContext {
    pub async fn new(config: Config) -> Result<Self> {
        let http = HttpClient::from_config(&config.http)?;

        let provider = Arc::new(RestAuthProvider::from_config(http.clone(), &config.backend));
        let documents = Arc::new(RestDocumentStore::new(
            http.clone(),
            &config.backend.documents_url,
            provider.clone(),
        )?);
        let cache = Arc::new(SqliteKeyValueCache::from_config(&config.cache)?);
        let source = Arc::new(RapidApiEventSource::new(http.clone(), config.events_api.clone()));
        let notifier = Arc::new(CallableFavoriteNotifier::from_config(
            http.clone(),
            &config.backend,
            provider.clone(),
        ));

        let auth = AuthService::new(provider.clone(), documents.clone(), cache.clone());
        if let Some(user) = auth.restore().await {
            debug!(uid = %user.uid, "Session restored");
        }

        let rsvp = RsvpService::new(provider.clone(), documents.clone())
            .with_cache(cache.clone())
            .with_policy(config.cache.rsvp_policy);
        let chat = ChatService::new(provider.clone(), documents.clone());
        let favorites = FavoritesStore::load(cache.clone()).await.with_notifier(notifier);
        let push = PushRegistration::new(provider, documents.clone(), cache);
        let admin = AdminEventService::new(documents);

        Ok(Self {
            config,
            auth,
            rsvp,
            chat,
            feed: EventFeed::new(source),
            favorites,
            push,
            admin,
            http,
        })
    }

    /// Messaging gateway for running the favorite notification handler
    /// locally. Needs `messaging_token` in the backend config.
    pub fn push_gateway(&self) -> FcmPushGateway {
        FcmPushGateway::from_config(self.http.clone(), &self.config.backend)
    }

    /// Sign out, dropping favorites too when configured to.
    pub async fn sign_out(&self) -> Result<()> {
        self.auth.sign_out().await?;
        if self.config.cache.clear_favorites_on_sign_out {
            self.favorites.clear().await;
        }
        Ok(())
    }
}
