//! In-memory port implementations for tests.
//!
//! Enabled for this crate's own tests and, through the `test-utils` feature,
//! for downstream integration tests. Each double can be switched into a
//! failing mode to exercise fault paths.

use std::cmp::Ordering as CmpOrdering;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use eventide_domain::{
    AuthUser, Document, DocumentPath, EventSummary, EventideError, FieldValue, Fields, OrderBy,
    Result, Session, SortDirection,
};
use parking_lot::Mutex;

use crate::auth::AuthProvider;
use crate::cache_ports::KeyValueCache;
use crate::document_ports::DocumentStore;
use crate::events::EventSource;
use crate::notifications::{FavoriteNotifier, PushGateway, PushMessage};

// ============================================================================
// Key-value cache
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum CachedValue {
    Bool(bool),
    Text(String),
}

/// `HashMap`-backed cache with a switchable write fault.
#[derive(Default)]
pub struct InMemoryKeyValueCache {
    entries: Mutex<HashMap<String, CachedValue>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryKeyValueCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `EventideError::Storage`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent read fail with `EventideError::Storage`.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Seed a boolean without going through the port.
    pub fn seed_bool(&self, key: &str, value: bool) {
        self.entries.lock().insert(key.to_string(), CachedValue::Bool(value));
    }

    /// Seed a string without going through the port.
    pub fn seed_string(&self, key: &str, value: &str) {
        self.entries.lock().insert(key.to_string(), CachedValue::Text(value.to_string()));
    }

    pub fn peek_bool(&self, key: &str) -> Option<bool> {
        match self.entries.lock().get(key) {
            Some(CachedValue::Bool(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn peek_string(&self, key: &str) -> Option<String> {
        match self.entries.lock().get(key) {
            Some(CachedValue::Text(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(EventideError::Storage("simulated write failure".into()));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(EventideError::Storage("simulated read failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueCache for InMemoryKeyValueCache {
    async fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        self.check_read()?;
        Ok(self.peek_bool(key))
    }

    async fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.check_write()?;
        self.seed_bool(key, value);
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.check_read()?;
        Ok(self.peek_string(key))
    }

    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.check_write()?;
        self.seed_string(key, value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.check_write()?;
        self.entries.lock().remove(key);
        Ok(())
    }
}

// ============================================================================
// Document store
// ============================================================================

/// `BTreeMap`-backed document store.
///
/// Server timestamps come from a deterministic clock that advances one
/// second per resolved write, so ordering by timestamp follows write order.
pub struct InMemoryDocumentStore {
    documents: Mutex<BTreeMap<DocumentPath, Fields>>,
    offline: AtomicBool,
    clock: AtomicI64,
    next_id: AtomicI64,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self {
            documents: Mutex::new(BTreeMap::new()),
            offline: AtomicBool::new(false),
            clock: AtomicI64::new(1_735_689_600), // 2025-01-01T00:00:00Z
            next_id: AtomicI64::new(1),
        }
    }
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `RemoteUnavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Raw fields of a stored document.
    pub fn fields_at(&self, path: &str) -> Option<Fields> {
        let path = DocumentPath::parse(path).ok()?;
        self.documents.lock().get(&path).cloned()
    }

    /// Insert or replace a document without going through the port.
    pub fn seed(&self, path: &str, fields: Fields) {
        if let Ok(path) = DocumentPath::parse(path) {
            let fields = self.resolve(fields);
            self.documents.lock().insert(path, fields);
        }
    }

    pub fn len(&self) -> usize {
        self.documents.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EventideError::RemoteUnavailable("document store offline".into()));
        }
        Ok(())
    }

    fn now(&self) -> DateTime<Utc> {
        let secs = self.clock.fetch_add(1, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0).single().unwrap_or_else(Utc::now)
    }

    fn resolve(&self, fields: Fields) -> Fields {
        let now = self.now();
        fields.into_iter().map(|(name, value)| (name, value.resolve(now))).collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>> {
        self.check_online()?;
        path.ensure_document()?;
        Ok(self
            .documents
            .lock()
            .get(path)
            .map(|fields| Document { id: path.leaf().to_string(), fields: fields.clone() }))
    }

    async fn set(&self, path: &DocumentPath, fields: Fields) -> Result<()> {
        self.check_online()?;
        path.ensure_document()?;
        let fields = self.resolve(fields);
        self.documents.lock().insert(path.clone(), fields);
        Ok(())
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<()> {
        self.check_online()?;
        path.ensure_document()?;
        let fields = self.resolve(fields);
        self.documents.lock().entry(path.clone()).or_default().extend(fields);
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> Result<()> {
        self.check_online()?;
        path.ensure_document()?;
        self.documents.lock().remove(path);
        Ok(())
    }

    async fn add(&self, collection: &DocumentPath, fields: Fields) -> Result<String> {
        self.check_online()?;
        collection.ensure_collection()?;
        let id = format!("doc-{:04}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let path = collection.child(id.clone())?;
        let fields = self.resolve(fields);
        self.documents.lock().insert(path, fields);
        Ok(id)
    }

    async fn list(
        &self,
        collection: &DocumentPath,
        order: Option<OrderBy>,
    ) -> Result<Vec<Document>> {
        self.check_online()?;
        collection.ensure_collection()?;
        let mut documents: Vec<Document> = self
            .documents
            .lock()
            .iter()
            .filter(|(path, _)| path.parent().as_ref() == Some(collection))
            .map(|(path, fields)| Document { id: path.leaf().to_string(), fields: fields.clone() })
            .collect();

        if let Some(order) = order {
            documents.sort_by(|a, b| {
                let ordering = compare_fields(a.get(&order.field), b.get(&order.field));
                match order.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
        Ok(documents)
    }
}

fn compare_fields(a: Option<&FieldValue>, b: Option<&FieldValue>) -> CmpOrdering {
    match (a, b) {
        (Some(FieldValue::Timestamp(a)), Some(FieldValue::Timestamp(b))) => a.cmp(b),
        (Some(FieldValue::Number(a)), Some(FieldValue::Number(b))) => a.total_cmp(b),
        (Some(FieldValue::String(a)), Some(FieldValue::String(b))) => a.cmp(b),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        _ => CmpOrdering::Equal,
    }
}

// ============================================================================
// Auth provider
// ============================================================================

/// Auth provider with an in-memory account table.
#[derive(Default)]
pub struct InMemoryAuthProvider {
    accounts: Mutex<HashMap<String, (String, AuthUser)>>,
    session: Mutex<Option<Session>>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that already has `uid` signed in.
    pub fn signed_in(uid: &str, email: Option<&str>) -> Self {
        let provider = Self::new();
        provider.restore_session(session_for(AuthUser {
            uid: uid.to_string(),
            email: email.map(str::to_string),
            display_name: None,
        }));
        provider
    }

    /// Register an account without signing it in.
    pub fn with_account(self, email: &str, password: &str, uid: &str) -> Self {
        let user = AuthUser {
            uid: uid.to_string(),
            email: Some(email.to_string()),
            display_name: None,
        };
        self.accounts.lock().insert(email.to_string(), (password.to_string(), user));
        self
    }

    fn start(&self, user: AuthUser) -> Session {
        let session = session_for(user);
        *self.session.lock() = Some(session.clone());
        session
    }
}

fn session_for(user: AuthUser) -> Session {
    Session { id_token: format!("token-{}", user.uid), refresh_token: None, user }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let user = {
            let accounts = self.accounts.lock();
            match accounts.get(email) {
                Some((stored, user)) if stored == password => user.clone(),
                Some(_) => return Err(EventideError::Auth("INVALID_PASSWORD".into())),
                None => return Err(EventideError::Auth("EMAIL_NOT_FOUND".into())),
            }
        };
        Ok(self.start(user))
    }

    async fn sign_up_with_password(&self, email: &str, password: &str) -> Result<Session> {
        let user = {
            let mut accounts = self.accounts.lock();
            if accounts.contains_key(email) {
                return Err(EventideError::Auth("EMAIL_EXISTS".into()));
            }
            let user = AuthUser {
                uid: format!("uid-{}", accounts.len() + 1),
                email: Some(email.to_string()),
                display_name: None,
            };
            accounts.insert(email.to_string(), (password.to_string(), user.clone()));
            user
        };
        Ok(self.start(user))
    }

    async fn sign_in_with_id_token(&self, provider_id: &str, id_token: &str) -> Result<Session> {
        let user = AuthUser {
            uid: format!("{provider_id}:{id_token}"),
            email: Some(format!("{id_token}@example.com")),
            display_name: Some("Google User".into()),
        };
        Ok(self.start(user))
    }

    fn current_session(&self) -> Option<Session> {
        self.session.lock().clone()
    }

    fn restore_session(&self, session: Session) {
        *self.session.lock() = Some(session);
    }

    async fn sign_out(&self) -> Result<()> {
        *self.session.lock() = None;
        Ok(())
    }
}

// ============================================================================
// Event source
// ============================================================================

/// Event source returning a fixed batch, or failing on demand.
#[derive(Default)]
pub struct StaticEventSource {
    events: Mutex<Vec<EventSummary>>,
    failing: AtomicBool,
    calls: Mutex<Vec<(String, String)>>,
}

impl StaticEventSource {
    pub fn new(events: Vec<EventSummary>) -> Self {
        Self { events: Mutex::new(events), ..Self::default() }
    }

    pub fn failing() -> Self {
        let source = Self::default();
        source.failing.store(true, Ordering::SeqCst);
        source
    }

    pub fn fail(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    /// `(city, state)` pairs requested so far.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_events(&self, city: &str, state: &str) -> Result<Vec<EventSummary>> {
        self.calls.lock().push((city.to_string(), state.to_string()));
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventideError::RemoteUnavailable("connection reset".into()));
        }
        Ok(self.events.lock().clone())
    }
}

// ============================================================================
// Push
// ============================================================================

/// Push gateway that records every message.
#[derive(Default)]
pub struct RecordingPushGateway {
    sent: Mutex<Vec<PushMessage>>,
    failing: AtomicBool,
}

impl RecordingPushGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl PushGateway for RecordingPushGateway {
    async fn send(&self, message: PushMessage) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventideError::RemoteUnavailable("messaging unavailable".into()));
        }
        self.sent.lock().push(message);
        Ok(())
    }
}

/// Favorite notifier that records `(event_name, token)` pairs.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, fail: bool) {
        self.failing.store(fail, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl FavoriteNotifier for RecordingNotifier {
    async fn notify_favorited(&self, event_name: &str, token: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(EventideError::RemoteUnavailable("function unavailable".into()));
        }
        self.calls.lock().push((event_name.to_string(), token.to_string()));
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Event fixture with plausible Atlanta data.
pub fn sample_event(id: &str) -> EventSummary {
    EventSummary {
        id: id.to_string(),
        name: format!("Event {id}"),
        summary: "An evening downtown".to_string(),
        start_date: "2025-06-01".to_string(),
        start_time: "19:00".to_string(),
        end_time: "22:00".to_string(),
        latitude: 33.749,
        longitude: -84.388,
        address: "Atlanta, GA".to_string(),
        event_url: None,
        tickets_url: None,
        category: None,
    }
}
