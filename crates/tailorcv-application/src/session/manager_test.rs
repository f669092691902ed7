use super::{SessionManager, SessionPhase};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tailorcv_core::auth::AuthGateway;
use tailorcv_core::error::{Result, TailorCvError};
use tailorcv_core::route::{decide_path, RouteDecision, SIGN_IN_PATH};
use tailorcv_core::session::{Session, SessionStore};
use tailorcv_core::user::User;

fn user(id: &str, generation_count: u32) -> User {
    User {
        id: id.to_string(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        profile_picture_url: String::new(),
        is_premium: false,
        generation_count,
        created_at: None,
        last_generated_at: None,
        upgraded_at: None,
    }
}

// Mock SessionStore for testing
struct MockSessionStore {
    session: Mutex<Option<Session>>,
}

impl MockSessionStore {
    fn empty() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }

    fn holding(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    fn stored(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.lock().unwrap().clone())
    }

    async fn save(&self, session: &Session) -> Result<()> {
        *self.session.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

// Mock AuthGateway with canned, repeatable responses
struct MockAuthGateway {
    verify_result: std::result::Result<User, TailorCvError>,
    exchange_result: std::result::Result<Session, TailorCvError>,
    invalidate_result: std::result::Result<(), TailorCvError>,
    invalidate_calls: AtomicUsize,
}

impl MockAuthGateway {
    fn new() -> Self {
        Self {
            verify_result: Err(TailorCvError::auth("not configured")),
            exchange_result: Err(TailorCvError::auth("not configured")),
            invalidate_result: Ok(()),
            invalidate_calls: AtomicUsize::new(0),
        }
    }

    fn verifying(mut self, result: std::result::Result<User, TailorCvError>) -> Self {
        self.verify_result = result;
        self
    }

    fn exchanging(mut self, result: std::result::Result<Session, TailorCvError>) -> Self {
        self.exchange_result = result;
        self
    }

    fn invalidating(mut self, result: std::result::Result<(), TailorCvError>) -> Self {
        self.invalidate_result = result;
        self
    }
}

#[async_trait]
impl AuthGateway for MockAuthGateway {
    async fn verify(&self, _token: &str) -> Result<User> {
        self.verify_result.clone()
    }

    async fn exchange(&self, _credential: &str) -> Result<Session> {
        self.exchange_result.clone()
    }

    async fn invalidate(&self, _token: &str) -> Result<()> {
        self.invalidate_calls.fetch_add(1, Ordering::SeqCst);
        self.invalidate_result.clone()
    }
}

#[tokio::test]
async fn test_bootstrap_without_persisted_session() {
    let store = Arc::new(MockSessionStore::empty());
    let auth = Arc::new(MockAuthGateway::new());
    let manager = SessionManager::new(store, auth);

    assert_eq!(manager.phase().await, SessionPhase::Loading);
    assert!(manager.bootstrap().await.is_none());
    assert_eq!(manager.phase().await, SessionPhase::SignedOut);
}

#[tokio::test]
async fn test_bootstrap_refreshes_stale_user() {
    let stale = Session::new("abc", user("u1", 1));
    let store = Arc::new(MockSessionStore::holding(stale));
    let auth = Arc::new(MockAuthGateway::new().verifying(Ok(user("u1", 5))));
    let manager = SessionManager::new(store.clone(), auth);

    let session = manager.bootstrap().await.unwrap();
    assert_eq!(session.user.generation_count, 5);

    // the mirror was healed too
    let stored = store.stored().unwrap();
    assert_eq!(stored.token, "abc");
    assert_eq!(stored.user.generation_count, 5);
}

#[tokio::test]
async fn test_bootstrap_clears_rejected_session() {
    let store = Arc::new(MockSessionStore::holding(Session::new("abc", user("u1", 0))));
    let auth =
        Arc::new(MockAuthGateway::new().verifying(Err(TailorCvError::auth("Not authenticated"))));
    let manager = SessionManager::new(store.clone(), auth);

    assert!(manager.bootstrap().await.is_none());
    assert_eq!(manager.phase().await, SessionPhase::SignedOut);
    assert!(store.stored().is_none());
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let store = Arc::new(MockSessionStore::holding(Session::new("abc", user("u1", 2))));
    let auth = Arc::new(MockAuthGateway::new().verifying(Ok(user("u1", 2))));
    let manager = SessionManager::new(store, auth);

    let first = manager.bootstrap().await.unwrap();
    let second = manager.bootstrap().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(manager.phase().await, SessionPhase::SignedIn(second));
}

#[tokio::test]
async fn test_login_persists_and_publishes() {
    let store = Arc::new(MockSessionStore::empty());
    let auth = Arc::new(
        MockAuthGateway::new().exchanging(Ok(Session::new("tok1", user("u1", 0)))),
    );
    let manager = SessionManager::new(store.clone(), auth);

    let session = manager.login("google-credential").await.unwrap();
    assert_eq!(session.token, "tok1");
    assert_eq!(session.user.id, "u1");

    assert_eq!(manager.phase().await, SessionPhase::SignedIn(session));
    let stored = store.stored().unwrap();
    assert_eq!(stored.token, "tok1");
    assert_eq!(stored.user.id, "u1");
}

#[tokio::test]
async fn test_login_failure_leaves_state_unchanged() {
    let store = Arc::new(MockSessionStore::empty());
    let auth =
        Arc::new(MockAuthGateway::new().exchanging(Err(TailorCvError::auth("Invalid token"))));
    let manager = SessionManager::new(store.clone(), auth);
    manager.bootstrap().await;

    let err = manager.login("bad-credential").await.unwrap_err();
    assert!(err.is_auth());
    assert_eq!(manager.phase().await, SessionPhase::SignedOut);
    assert!(store.stored().is_none());
}

#[tokio::test]
async fn test_logout_without_connectivity_still_signs_out() {
    let store = Arc::new(MockSessionStore::holding(Session::new("abc", user("u1", 0))));
    let auth = Arc::new(
        MockAuthGateway::new()
            .verifying(Ok(user("u1", 0)))
            .invalidating(Err(TailorCvError::transient("connection refused"))),
    );
    let manager = SessionManager::new(store.clone(), auth.clone());

    manager.bootstrap().await.unwrap();
    manager.logout().await;

    assert_eq!(auth.invalidate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(manager.phase().await, SessionPhase::SignedOut);
    assert!(store.stored().is_none());

    // protected navigation now redirects to sign-in
    assert_eq!(
        decide_path(manager.session().await.as_ref(), "/generate"),
        RouteDecision::Redirect(SIGN_IN_PATH)
    );
}

#[tokio::test]
async fn test_bootstrap_after_shutdown_does_not_publish() {
    let store = Arc::new(MockSessionStore::holding(Session::new("abc", user("u1", 0))));
    let auth = Arc::new(MockAuthGateway::new().verifying(Ok(user("u1", 0))));
    let manager = SessionManager::new(store, auth);

    manager.shutdown();
    manager.bootstrap().await;

    // the torn-down shell never observes a phase change
    assert_eq!(manager.phase().await, SessionPhase::Loading);
}
