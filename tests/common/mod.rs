#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use aakkai_portal::auth::{
    AuthError, AuthEvent, BoxFuture, IdentityProvider, OAuthProvider, ProfileStore, ProviderSession,
};
use aakkai_portal::db::{Database, StoreError, StoreResult};
use aakkai_portal::models::{CreateProfileInput, Role, TeamMemberProfile};
use tokio::sync::broadcast;

/// Identity provider that knows a fixed set of access tokens.
pub struct FakeProvider {
    users: Mutex<HashMap<String, ProviderSession>>,
    held: Mutex<Option<ProviderSession>>,
    revoked: Mutex<Vec<String>>,
    events: broadcast::Sender<AuthEvent>,
}

impl FakeProvider {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            users: Mutex::new(HashMap::new()),
            held: Mutex::new(None),
            revoked: Mutex::new(Vec::new()),
            events,
        }
    }

    pub fn with_user(self, token: &str, subject_id: &str, email: &str) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(token.to_string(), ProviderSession::new(token, subject_id, email));
        self
    }

    pub fn with_session(self, session: ProviderSession) -> Self {
        self.users
            .lock()
            .unwrap()
            .insert(session.access_token.clone(), session);
        self
    }

    pub fn hold(&self, token: &str) {
        let session = self.users.lock().unwrap().get(token).cloned();
        *self.held.lock().unwrap() = session;
    }

    pub fn revoked(&self) -> Vec<String> {
        self.revoked.lock().unwrap().clone()
    }
}

impl IdentityProvider for FakeProvider {
    fn get_session(&self) -> BoxFuture<'_, Result<Option<ProviderSession>, AuthError>> {
        Box::pin(async move { Ok(self.held.lock().unwrap().clone()) })
    }

    fn get_user<'a>(
        &'a self,
        access_token: &'a str,
    ) -> BoxFuture<'a, Result<Option<ProviderSession>, AuthError>> {
        Box::pin(async move {
            if self.revoked.lock().unwrap().iter().any(|t| t == access_token) {
                return Ok(None);
            }
            Ok(self.users.lock().unwrap().get(access_token).cloned())
        })
    }

    fn set_session<'a>(
        &'a self,
        access_token: &'a str,
    ) -> BoxFuture<'a, Result<ProviderSession, AuthError>> {
        Box::pin(async move {
            let session = self
                .users
                .lock()
                .unwrap()
                .get(access_token)
                .cloned()
                .ok_or_else(|| AuthError::Provider("access token was rejected".into()))?;
            *self.held.lock().unwrap() = Some(session.clone());
            let _ = self.events.send(AuthEvent::signed_in(session.clone()));
            Ok(session)
        })
    }

    fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> Result<String, AuthError> {
        Ok(format!(
            "https://auth.test/authorize?provider={}&redirect_to={}",
            provider.as_str(),
            redirect_to
        ))
    }

    fn sign_out<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            self.revoked.lock().unwrap().push(access_token.to_string());
            *self.held.lock().unwrap() = None;
            let _ = self.events.send(AuthEvent::signed_out());
            Ok(())
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

/// Database-backed store that can be told to fail and counts inserts.
pub struct FlakyStore {
    pub db: Database,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub role_inserts: AtomicUsize,
    pub profile_inserts: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::over(Database::open_memory().expect("Failed to create test database"))
    }

    pub fn over(db: Database) -> Self {
        Self {
            db,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            role_inserts: AtomicUsize::new(0),
            profile_inserts: AtomicUsize::new(0),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn read(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated read outage".into()));
        }
        Ok(())
    }

    fn write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("simulated write outage".into()));
        }
        Ok(())
    }
}

impl ProfileStore for FlakyStore {
    fn find_role(&self, user_id: &str) -> StoreResult<Option<Role>> {
        self.read()?;
        ProfileStore::find_role(&self.db, user_id)
    }

    fn insert_role(&self, user_id: &str, role: Role) -> StoreResult<()> {
        self.write()?;
        ProfileStore::insert_role(&self.db, user_id, role)?;
        self.role_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn find_profile(&self, user_id: &str) -> StoreResult<Option<TeamMemberProfile>> {
        self.read()?;
        ProfileStore::find_profile(&self.db, user_id)
    }

    fn claim_profile(&self, user_id: &str, email: &str) -> StoreResult<Option<TeamMemberProfile>> {
        self.write()?;
        ProfileStore::claim_profile(&self.db, user_id, email)
    }

    fn insert_profile(&self, input: CreateProfileInput) -> StoreResult<TeamMemberProfile> {
        self.write()?;
        let profile = ProfileStore::insert_profile(&self.db, input)?;
        self.profile_inserts.fetch_add(1, Ordering::SeqCst);
        Ok(profile)
    }

    fn set_availability(&self, user_id: &str, is_available: bool) -> StoreResult<bool> {
        self.write()?;
        ProfileStore::set_availability(&self.db, user_id, is_available)
    }
}

pub fn provider() -> Arc<FakeProvider> {
    Arc::new(
        FakeProvider::new()
            .with_user("admin-token", "sub-admin", "admin@aakkai.com")
            .with_user("member-token", "sub-member", "team@aakkai.com")
            .with_user("other-token", "sub-other", "other@aakkai.com")
            .with_user("mixed-token", "sub-mixed", "Nila@Aakkai.com"),
    )
}
