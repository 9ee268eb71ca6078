use serde::{Serialize, Serializer};

/// Stable identifier of a user-facing message.
///
/// Resolved to text only when rendering, through the active locale's catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    UsernameRequired,
    UsernameMinLength,
    UsernameMaxLength,
    EmailRequired,
    EmailValid,
    PasswordRequired,
    PasswordUppercase,
    PasswordLowercase,
    PasswordNumber,
    PasswordMinLength,
    ConfirmPasswordRequired,
    ConfirmPasswordMustMatch,
    Success,
    UsernameExists,
    EmailExists,
    InvalidCredentials,
    InProgress,
    GenericFailure,
}

impl MessageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::UsernameRequired => "errors.username.required",
            MessageKey::UsernameMinLength => "errors.username.minLength",
            MessageKey::UsernameMaxLength => "errors.username.maxLength",
            MessageKey::EmailRequired => "errors.email.required",
            MessageKey::EmailValid => "errors.email.valid",
            MessageKey::PasswordRequired => "errors.password.required",
            MessageKey::PasswordUppercase => "errors.password.uppercase",
            MessageKey::PasswordLowercase => "errors.password.lowercase",
            MessageKey::PasswordNumber => "errors.password.number",
            MessageKey::PasswordMinLength => "errors.password.minLength",
            MessageKey::ConfirmPasswordRequired => "errors.confirmPassword.required",
            MessageKey::ConfirmPasswordMustMatch => "errors.confirmPassword.mustMatch",
            MessageKey::Success => "response.success",
            MessageKey::UsernameExists => "response.errors.USERNAME_EXISTS",
            MessageKey::EmailExists => "response.errors.EMAIL_EXISTS",
            MessageKey::InvalidCredentials => "response.errors.INVALID_CREDENTIALS",
            MessageKey::InProgress => "response.errors.inProgress",
            MessageKey::GenericFailure => "response.errors.generic",
        }
    }
}

impl Serialize for MessageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
