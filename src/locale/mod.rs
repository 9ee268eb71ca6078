pub mod resolver;

use std::fmt;
use std::str::FromStr;

use actix_utils::future::{ready, Ready};
use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

pub use resolver::LocaleResolver;

/// Name of the cookie holding the visitor's chosen locale.
pub const LOCALE_COOKIE: &str = "LOCALE";

/// A supported UI language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Id,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unsupported locale `{0}`")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::Id];

    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Id => "id",
        }
    }

    /// Name of the language written in that language, used by the language picker.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Id => "Bahasa Indonesia",
        }
    }

    /// Parses a locale code, returning `None` for anything outside the supported set.
    pub fn from_code(code: &str) -> Option<Locale> {
        let code = code.trim();

        Locale::ALL
            .into_iter()
            .find(|locale| locale.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Locale::from_code(s).ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

/// The locale resolved for the current request by the session context middleware.
impl FromRequest for Locale {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let locale = req.extensions().get::<Locale>().copied().unwrap_or_default();

        ready(Ok(locale))
    }
}
