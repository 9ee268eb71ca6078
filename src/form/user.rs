use serde::Deserialize;

use crate::form::{Field, Form, Rule, Schema};
use crate::translation::MessageKey;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 50;
pub const PASSWORD_MIN_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegisterField {
    Username,
    Email,
    Password,
    ConfirmationPassword,
}

impl Field for RegisterField {
    const ALL: &'static [Self] = &[
        RegisterField::Username,
        RegisterField::Email,
        RegisterField::Password,
        RegisterField::ConfirmationPassword,
    ];

    fn name(self) -> &'static str {
        match self {
            RegisterField::Username => "username",
            RegisterField::Email => "email",
            RegisterField::Password => "password",
            RegisterField::ConfirmationPassword => "confirmationPassword",
        }
    }

    fn is_secret(self) -> bool {
        matches!(
            self,
            RegisterField::Password | RegisterField::ConfirmationPassword
        )
    }
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterFormData {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmation_password: String,
}

impl Form for RegisterFormData {
    type Field = RegisterField;

    fn value(&self, field: RegisterField) -> &str {
        match field {
            RegisterField::Username => &self.username,
            RegisterField::Email => &self.email,
            RegisterField::Password => &self.password,
            RegisterField::ConfirmationPassword => &self.confirmation_password,
        }
    }

    fn set_value(&mut self, field: RegisterField, value: String) {
        match field {
            RegisterField::Username => self.username = value,
            RegisterField::Email => self.email = value,
            RegisterField::Password => self.password = value,
            RegisterField::ConfirmationPassword => self.confirmation_password = value,
        }
    }

    fn schema() -> Schema<RegisterField> {
        Schema::new()
            .field(
                RegisterField::Username,
                [
                    (Rule::Required, MessageKey::UsernameRequired),
                    (
                        Rule::MinLength(USERNAME_MIN_LENGTH),
                        MessageKey::UsernameMinLength,
                    ),
                    (
                        Rule::MaxLength(USERNAME_MAX_LENGTH),
                        MessageKey::UsernameMaxLength,
                    ),
                ],
            )
            .field(
                RegisterField::Email,
                [
                    (Rule::Required, MessageKey::EmailRequired),
                    (Rule::Email, MessageKey::EmailValid),
                ],
            )
            .field(
                RegisterField::Password,
                [
                    (Rule::Required, MessageKey::PasswordRequired),
                    (Rule::Uppercase, MessageKey::PasswordUppercase),
                    (Rule::Lowercase, MessageKey::PasswordLowercase),
                    (Rule::Digit, MessageKey::PasswordNumber),
                    (
                        Rule::MinLength(PASSWORD_MIN_LENGTH),
                        MessageKey::PasswordMinLength,
                    ),
                ],
            )
            .field(
                RegisterField::ConfirmationPassword,
                [
                    (Rule::Required, MessageKey::ConfirmPasswordRequired),
                    (
                        Rule::Matches(RegisterField::Password),
                        MessageKey::ConfirmPasswordMustMatch,
                    ),
                ],
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Username,
    Password,
}

impl Field for LoginField {
    const ALL: &'static [Self] = &[LoginField::Username, LoginField::Password];

    fn name(self) -> &'static str {
        match self {
            LoginField::Username => "username",
            LoginField::Password => "password",
        }
    }

    fn is_secret(self) -> bool {
        self == LoginField::Password
    }
}

#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoginFormData {
    pub username: String,
    pub password: String,
}

impl Form for LoginFormData {
    type Field = LoginField;

    fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Username => &self.username,
            LoginField::Password => &self.password,
        }
    }

    fn set_value(&mut self, field: LoginField, value: String) {
        match field {
            LoginField::Username => self.username = value,
            LoginField::Password => self.password = value,
        }
    }

    fn schema() -> Schema<LoginField> {
        Schema::new()
            .field(
                LoginField::Username,
                [(Rule::Required, MessageKey::UsernameRequired)],
            )
            .field(
                LoginField::Password,
                [(Rule::Required, MessageKey::PasswordRequired)],
            )
    }
}
