pub mod in_flight;

use crate::account::{AccountError, AccountService, LoginRequest, RegisterRequest};
use crate::form::user::{LoginFormData, RegisterFormData};
use crate::locale::LocaleResolver;
use crate::session::ClientSession;
use crate::translation::MessageKey;

pub use in_flight::InFlight;

/// How a submission ended, as the message to show for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(MessageKey),
    Failure(MessageKey),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn key(&self) -> MessageKey {
        match *self {
            Outcome::Success(key) | Outcome::Failure(key) => key,
        }
    }
}

/// Sends validated forms to the account service and maps the answer to a message.
pub struct SubmissionPipeline<'a, S> {
    accounts: &'a S,
}

impl<'a, S: AccountService> SubmissionPipeline<'a, S> {
    pub fn new(accounts: &'a S) -> Self {
        Self { accounts }
    }

    /// Creates the account in the visitor's resolved locale.
    pub async fn register(&self, form: RegisterFormData, session: &impl ClientSession) -> Outcome {
        let language = LocaleResolver::new(self.accounts).resolve(session).await;
        let request = RegisterRequest::new(form, language);

        match self.accounts.create_user(&request).await {
            Ok(()) => {
                log::info!("registered account {}", request.username);
                Outcome::Success(MessageKey::Success)
            }
            Err(err) => {
                log::warn!("registration of {} failed: {err}", request.username);
                Outcome::Failure(registration_failure(&err))
            }
        }
    }

    /// Signs the visitor in and records them in the session on success.
    pub async fn login(&self, form: LoginFormData, session: &impl ClientSession) -> Outcome {
        let request = LoginRequest::from(form);

        match self.accounts.login(&request).await {
            Ok(()) => {
                log::info!("{} signed in", request.username);
                session.sign_in(&request.username);
                Outcome::Success(MessageKey::Success)
            }
            Err(err) => {
                log::warn!("sign-in of {} failed: {err}", request.username);
                Outcome::Failure(login_failure(&err))
            }
        }
    }
}

pub fn registration_failure(err: &AccountError) -> MessageKey {
    match err.code() {
        Some("USERNAME_EXISTS") => MessageKey::UsernameExists,
        Some("EMAIL_EXISTS") => MessageKey::EmailExists,
        _ => MessageKey::GenericFailure,
    }
}

pub fn login_failure(err: &AccountError) -> MessageKey {
    match err.code() {
        Some("INVALID_CREDENTIALS") => MessageKey::InvalidCredentials,
        _ => MessageKey::GenericFailure,
    }
}
