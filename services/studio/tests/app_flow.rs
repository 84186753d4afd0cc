//! End-to-end flows through the `App` controller with in-memory ports.

use async_trait::async_trait;
use design_review_core::{
    auth::{AuthError, AuthMode},
    credentials::{CredentialStore, CURRENT_USER_KEY},
    evaluator::{Evaluator, EVALUATION_FAILURE_MESSAGE},
    memory::MemoryKvStore,
    ports::{KeyValueStore, PortError, PortResult, TextGenerationService},
    wizard::{WizardError, WizardStep},
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use studio_lib::app::{App, View};

/// Replies with queued responses in order.
struct QueuedGenerator {
    replies: Mutex<Vec<PortResult<String>>>,
    calls: AtomicUsize,
}

impl QueuedGenerator {
    fn new(mut replies: Vec<PortResult<String>>) -> Arc<Self> {
        replies.reverse();
        Arc::new(Self {
            replies: Mutex::new(replies),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl TextGenerationService for QueuedGenerator {
    async fn generate_json(&self, _: &str, _: &serde_json::Value) -> PortResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(PortError::Unexpected("no reply queued".into())))
    }
}

/// Wraps `MemoryKvStore`; writes to the session identity key fail while
/// `fail_identity_writes` is set.
#[derive(Default)]
struct IdentityWriteFailingKv {
    inner: MemoryKvStore,
    fail_identity_writes: AtomicBool,
}

impl KeyValueStore for IdentityWriteFailingKv {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        if key == CURRENT_USER_KEY && self.fail_identity_writes.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("disk full".into()));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        self.inner.remove(key)
    }
}

fn app(kv: Arc<MemoryKvStore>, generator: Arc<QueuedGenerator>) -> App {
    App::new(CredentialStore::new(kv), Evaluator::new(generator))
}

fn sign_up(app: &mut App, email: &str) {
    app.switch_auth_mode(AuthMode::Signup);
    let form = app.auth_form_mut();
    form.name = "Ada Lovelace".into();
    form.email = email.into();
    form.password = "Str0ng#Pass".into();
    form.confirm_password = "Str0ng#Pass".into();
    app.submit_auth().unwrap();
}

fn fill_wizard(app: &mut App, problem: &str) {
    assert!(app.new_design());
    let wizard = app.wizard_mut().unwrap();
    for value in [problem, "100M redirects/day", "API + KV store", "Base62 ids"] {
        wizard.edit(value).unwrap();
        if wizard.step() != Some(WizardStep::Decisions) {
            wizard.next().unwrap();
        }
    }
}

#[tokio::test]
async fn signup_persists_sanitized_identity_and_seeds_designs() {
    let kv = Arc::new(MemoryKvStore::new());
    let mut app = app(kv.clone(), QueuedGenerator::new(vec![]));
    assert_eq!(app.view(), View::Auth);

    sign_up(&mut app, "ada@example.com");
    assert_eq!(app.view(), View::Dashboard);
    assert_eq!(app.session().designs().len(), 2);

    let stored = kv.get(CURRENT_USER_KEY).unwrap().unwrap();
    assert!(stored.contains("ada@example.com"));
    assert!(!stored.contains("password"));
    assert!(!stored.contains("Str0ng#Pass"));
}

#[tokio::test]
async fn restore_resumes_persisted_session() {
    let kv = Arc::new(MemoryKvStore::new());
    {
        let mut first = app(kv.clone(), QueuedGenerator::new(vec![]));
        sign_up(&mut first, "ada@example.com");
    }

    let mut second = app(kv.clone(), QueuedGenerator::new(vec![]));
    assert!(second.restore());
    assert_eq!(second.view(), View::Dashboard);
    assert_eq!(
        second.session().user().map(|u| u.email.as_str()),
        Some("ada@example.com")
    );
}

#[tokio::test]
async fn corrupt_persisted_session_starts_at_auth() {
    let kv = Arc::new(MemoryKvStore::new());
    kv.set(CURRENT_USER_KEY, "{oops").unwrap();

    let mut app = app(kv.clone(), QueuedGenerator::new(vec![]));
    assert!(!app.restore());
    assert_eq!(app.view(), View::Auth);
    assert_eq!(kv.get(CURRENT_USER_KEY).unwrap(), None);
}

#[tokio::test]
async fn completed_wizard_prepends_design() {
    let generator = QueuedGenerator::new(vec![Ok(
        r#"{"score": 7.5, "feedback": "Solid approach"}"#.to_string()
    )]);
    let mut app = app(Arc::new(MemoryKvStore::new()), generator.clone());
    sign_up(&mut app, "ada@example.com");

    fill_wizard(&mut app, "Design a URL shortener");
    let design = app.submit_wizard().await.unwrap();

    assert_eq!(design.title, "Design a URL shortener");
    assert_eq!(design.evaluation.as_ref().map(|e| e.score), Some(7.5));
    assert_eq!(app.view(), View::Dashboard);
    assert!(app.wizard().is_none());
    assert_eq!(app.session().designs()[0], design);
    assert_eq!(app.session().designs().len(), 3);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);

    app.select_design(&design.id).unwrap();
    let markdown = app.export_selected().unwrap();
    assert!(markdown.starts_with("# System Design: Design a URL shortener"));
    assert!(markdown.contains("**Score:** 7.5 / 10.0"));
}

#[tokio::test]
async fn failed_evaluation_keeps_wizard_open_then_retries() {
    let generator = QueuedGenerator::new(vec![
        Ok("definitely not json".to_string()),
        Err(PortError::MissingCredential),
        Ok(r#"{"score": 6.0, "feedback": "Needs caching"}"#.to_string()),
    ]);
    let mut app = app(Arc::new(MemoryKvStore::new()), generator.clone());
    sign_up(&mut app, "ada@example.com");
    fill_wizard(&mut app, "Design a URL shortener");
    let draft = app.wizard().unwrap().draft().clone();

    for _ in 0..2 {
        let err = app.submit_wizard().await.unwrap_err();
        assert!(matches!(err, WizardError::Evaluation(_)));
        assert_eq!(app.view(), View::Wizard);
        let wizard = app.wizard().unwrap();
        assert_eq!(wizard.step(), Some(WizardStep::Decisions));
        assert_eq!(wizard.draft(), &draft);
        assert_eq!(wizard.error(), Some(EVALUATION_FAILURE_MESSAGE));
        assert_eq!(app.session().designs().len(), 2);
    }

    app.submit_wizard().await.unwrap();
    assert_eq!(app.session().designs().len(), 3);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn cancel_returns_to_dashboard_without_side_effects() {
    let generator = QueuedGenerator::new(vec![]);
    let mut app = app(Arc::new(MemoryKvStore::new()), generator.clone());
    sign_up(&mut app, "ada@example.com");
    fill_wizard(&mut app, "Design a URL shortener");

    app.cancel_wizard().unwrap();
    assert_eq!(app.view(), View::Dashboard);
    assert!(app.wizard().is_none());
    assert_eq!(app.session().designs().len(), 2);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn logout_clears_everything_before_next_login() {
    let kv = Arc::new(MemoryKvStore::new());
    let generator = QueuedGenerator::new(vec![Ok(
        r#"{"score": 7.5, "feedback": "Solid approach"}"#.to_string()
    )]);
    let mut app = app(kv.clone(), generator);
    sign_up(&mut app, "ada@example.com");
    fill_wizard(&mut app, "Design a URL shortener");
    let design = app.submit_wizard().await.unwrap();

    app.logout();
    assert_eq!(app.view(), View::Auth);
    assert!(!app.session().is_active());
    assert!(app.session().designs().is_empty());
    assert_eq!(kv.get(CURRENT_USER_KEY).unwrap(), None);

    sign_up(&mut app, "bob@example.com");
    assert!(app.session().find_design(&design.id).is_none());
    assert_eq!(app.session().designs().len(), 2);
}

#[tokio::test]
async fn failed_login_stays_on_auth_view() {
    let kv = Arc::new(MemoryKvStore::new());
    let mut app = app(kv.clone(), QueuedGenerator::new(vec![]));
    sign_up(&mut app, "ada@example.com");
    app.logout();

    app.switch_auth_mode(AuthMode::Login);
    app.auth_form_mut().email = "ada@example.com".into();
    app.auth_form_mut().password = "Wr0ng#Pass".into();
    assert!(matches!(app.submit_auth(), Err(AuthError::InvalidCredentials)));
    assert_eq!(app.view(), View::Auth);
    assert_eq!(app.auth_form().auth_error(), Some("Invalid email or password."));
    assert_eq!(kv.get(CURRENT_USER_KEY).unwrap(), None);

    app.auth_form_mut().password = "Str0ng#Pass".into();
    app.submit_auth().unwrap();
    assert_eq!(app.view(), View::Dashboard);
}

#[tokio::test]
async fn signup_whose_identity_write_fails_moves_form_to_login() {
    let kv = Arc::new(IdentityWriteFailingKv::default());
    kv.fail_identity_writes.store(true, Ordering::SeqCst);
    let mut app = App::new(
        CredentialStore::new(kv.clone()),
        Evaluator::new(QueuedGenerator::new(vec![])),
    );

    app.switch_auth_mode(AuthMode::Signup);
    let form = app.auth_form_mut();
    form.name = "Ada Lovelace".into();
    form.email = "ada@example.com".into();
    form.password = "Str0ng#Pass".into();
    form.confirm_password = "Str0ng#Pass".into();

    assert!(matches!(app.submit_auth(), Err(AuthError::Storage(_))));
    assert_eq!(app.view(), View::Auth);
    assert!(!app.session().is_active());
    assert_eq!(app.auth_form().mode(), AuthMode::Login);
    assert_eq!(app.auth_form().email, "ada@example.com");

    kv.fail_identity_writes.store(false, Ordering::SeqCst);
    app.auth_form_mut().password = "Str0ng#Pass".into();
    app.submit_auth().unwrap();
    assert_eq!(app.view(), View::Dashboard);
    assert_eq!(CredentialStore::new(kv).list_users().len(), 1);
}
