pub mod client;

use serde::Serialize;

use crate::form::user::{LoginFormData, RegisterFormData};
use crate::locale::Locale;

pub use client::HttpAccountService;

/// Payload sent to create an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub language: Locale,
}

impl RegisterRequest {
    pub fn new(form: RegisterFormData, language: Locale) -> Self {
        Self {
            username: form.username,
            email: form.email,
            password: form.password,
            language,
        }
    }
}

/// Payload sent to sign in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl From<LoginFormData> for LoginRequest {
    fn from(form: LoginFormData) -> Self {
        Self {
            username: form.username,
            password: form.password,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(
        "account service rejected the request ({status}): {}",
        .code.as_deref().unwrap_or("no error code")
    )]
    Rejected { status: u16, code: Option<String> },

    #[error("account service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("couldn't decode account service response: {0}")]
    Decode(String),
}

impl AccountError {
    /// The business error code reported by the service, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            AccountError::Rejected { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// The user-account service the pages talk to.
///
/// Every operation is a single call; callers decide what a failure means.
#[allow(async_fn_in_trait)]
pub trait AccountService {
    async fn create_user(&self, request: &RegisterRequest) -> Result<(), AccountError>;

    async fn login(&self, request: &LoginRequest) -> Result<(), AccountError>;

    /// The stored language of `username`, `None` when they never picked one.
    async fn language_preference(&self, username: &str) -> Result<Option<Locale>, AccountError>;

    async fn set_language_preference(
        &self,
        username: &str,
        locale: Locale,
    ) -> Result<(), AccountError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_serializes_language_code() {
        let form = RegisterFormData {
            username: "budi".to_string(),
            email: "budi@example.com".to_string(),
            password: "Secret123".to_string(),
            confirmation_password: "Secret123".to_string(),
        };

        let value = serde_json::to_value(RegisterRequest::new(form, Locale::Id)).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "username": "budi",
                "email": "budi@example.com",
                "password": "Secret123",
                "language": "id",
            })
        );
    }

    #[test]
    fn test_rejected_error_exposes_code() {
        let err = AccountError::Rejected {
            status: 409,
            code: Some("EMAIL_EXISTS".to_string()),
        };
        assert_eq!(err.code(), Some("EMAIL_EXISTS"));
        assert_eq!(
            err.to_string(),
            "account service rejected the request (409): EMAIL_EXISTS"
        );

        let err = AccountError::Decode("truncated body".to_string());
        assert_eq!(err.code(), None);
    }
}
