//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::path::PathBuf;

use tarjama::Translator;
use tera::Tera;

use crate::account::{AccountError, AccountService, LoginRequest, RegisterRequest};
use crate::locale::Locale;
use crate::notification::NotificationSink;
use crate::session::ClientSession;
use crate::translation::Translate;

pub fn translations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("translations")
}

pub fn templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

pub fn translator() -> Translator {
    crate::translation::initialize_translator(&translations_dir())
        .expect("translations should load")
}

pub fn engine() -> Tera {
    crate::templating::initialize_engine(&templates_dir(), translator())
        .expect("templates should parse")
}

/// How the stub answers `create_user` and `login`.
#[derive(Debug, Clone, Copy, Default)]
pub enum StubReply {
    #[default]
    Ok,
    Reject(&'static str),
    Unavailable,
}

impl StubReply {
    fn result(self) -> Result<(), AccountError> {
        match self {
            StubReply::Ok => Ok(()),
            StubReply::Reject(code) => Err(AccountError::Rejected {
                status: 400,
                code: Some(code.to_string()),
            }),
            StubReply::Unavailable => Err(AccountError::Decode("connection reset".to_string())),
        }
    }
}

#[derive(Default)]
pub struct StubAccountService {
    reply: StubReply,
    preference: Option<Result<Option<Locale>, ()>>,
    fail_preference_updates: bool,
    calls: RefCell<Vec<String>>,
    last_registration: RefCell<Option<RegisterRequest>>,
}

impl StubAccountService {
    pub fn replying(mut self, reply: StubReply) -> Self {
        self.reply = reply;
        self
    }

    /// `Err(())` makes the lookup fail.
    pub fn with_preference(mut self, preference: Result<Option<Locale>, ()>) -> Self {
        self.preference = Some(preference);
        self
    }

    pub fn failing_preference_updates(mut self) -> Self {
        self.fail_preference_updates = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn last_registration(&self) -> Option<RegisterRequest> {
        self.last_registration.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl AccountService for StubAccountService {
    async fn create_user(&self, request: &RegisterRequest) -> Result<(), AccountError> {
        self.record(format!("create_user:{}", request.username));
        *self.last_registration.borrow_mut() = Some(request.clone());
        self.reply.result()
    }

    async fn login(&self, request: &LoginRequest) -> Result<(), AccountError> {
        self.record(format!("login:{}", request.username));
        self.reply.result()
    }

    async fn language_preference(&self, username: &str) -> Result<Option<Locale>, AccountError> {
        self.record(format!("language_preference:{username}"));
        match self.preference {
            None | Some(Ok(None)) => Ok(None),
            Some(Ok(Some(locale))) => Ok(Some(locale)),
            Some(Err(())) => Err(AccountError::Decode("service unavailable".to_string())),
        }
    }

    async fn set_language_preference(
        &self,
        username: &str,
        locale: Locale,
    ) -> Result<(), AccountError> {
        self.record(format!("set_language_preference:{username}:{locale}"));
        if self.fail_preference_updates {
            return Err(AccountError::Rejected {
                status: 503,
                code: None,
            });
        }
        Ok(())
    }
}

/// In-memory [`ClientSession`].
#[derive(Default)]
pub struct MemorySession {
    cookie: RefCell<Option<String>>,
    user: RefCell<Option<String>>,
    resolved: Option<Locale>,
}

impl MemorySession {
    pub fn signed_in(username: &str) -> Self {
        let session = Self::default();
        session.sign_in(username);
        session
    }

    pub fn with_cookie(self, value: &str) -> Self {
        *self.cookie.borrow_mut() = Some(value.to_string());
        self
    }

    pub fn with_resolved_locale(mut self, locale: Locale) -> Self {
        self.resolved = Some(locale);
        self
    }
}

impl ClientSession for MemorySession {
    fn locale_cookie(&self) -> Option<String> {
        self.cookie.borrow().clone()
    }

    fn set_locale_cookie(&self, locale: Locale) {
        *self.cookie.borrow_mut() = Some(locale.code().to_string());
    }

    fn authenticated_user(&self) -> Option<String> {
        self.user.borrow().clone()
    }

    fn sign_in(&self, username: &str) {
        *self.user.borrow_mut() = Some(username.to_string());
    }

    fn sign_out(&self) {
        *self.user.borrow_mut() = None;
    }

    fn resolved_locale(&self) -> Option<Locale> {
        self.resolved
    }
}

#[derive(Default)]
pub struct RecordingSink {
    errors: RefCell<Vec<String>>,
    successes: RefCell<Vec<String>>,
}

impl RecordingSink {
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn show_error(&self, text: String) {
        self.errors.borrow_mut().push(text);
    }

    fn show_success(&self, text: String) {
        self.successes.borrow_mut().push(text);
    }
}

/// Translates every key to itself.
pub struct EchoMessages;

impl Translate for EchoMessages {
    fn text(&self, key: &str) -> String {
        key.to_string()
    }
}
