use std::cell::Cell;

use actix_session::{Session, SessionExt};
use actix_utils::future::{ready, Ready};
use actix_web::{
    cookie::Cookie, dev::Payload, Error, FromRequest, HttpMessage, HttpRequest,
    HttpResponseBuilder,
};

use crate::locale::{Locale, LOCALE_COOKIE};

const USERNAME_KEY: &str = "username";

/// Per-visitor client state: the locale cookie and who is signed in.
///
/// Passed explicitly to whatever needs to read or change it.
pub trait ClientSession {
    fn locale_cookie(&self) -> Option<String>;

    fn set_locale_cookie(&self, locale: Locale);

    fn authenticated_user(&self) -> Option<String>;

    fn sign_in(&self, username: &str);

    fn sign_out(&self);

    /// The locale already worked out for this request, if any.
    fn resolved_locale(&self) -> Option<Locale> {
        None
    }
}

/// [`ClientSession`] backed by the request's cookies and the actix session.
///
/// Cookie writes are buffered until [`RequestSession::write_cookies`] is called
/// on the outgoing response.
pub struct RequestSession {
    session: Session,
    locale_cookie: Option<String>,
    pending_locale: Cell<Option<Locale>>,
    resolved_locale: Option<Locale>,
}

impl RequestSession {
    pub fn new(session: Session, locale_cookie: Option<String>) -> Self {
        Self {
            session,
            locale_cookie,
            pending_locale: Cell::new(None),
            resolved_locale: None,
        }
    }

    /// Remembers the locale the session middleware resolved, so later lookups skip the service.
    pub fn with_resolved_locale(mut self, locale: Option<Locale>) -> Self {
        self.resolved_locale = locale;
        self
    }

    pub fn write_cookies(&self, response: &mut HttpResponseBuilder) {
        if let Some(locale) = self.pending_locale.get() {
            response.cookie(
                Cookie::build(LOCALE_COOKIE, locale.code())
                    .path("/")
                    .permanent()
                    .finish(),
            );
        }
    }
}

impl ClientSession for RequestSession {
    fn locale_cookie(&self) -> Option<String> {
        match self.pending_locale.get() {
            Some(locale) => Some(locale.code().to_string()),
            None => self.locale_cookie.clone(),
        }
    }

    fn set_locale_cookie(&self, locale: Locale) {
        self.pending_locale.set(Some(locale));
    }

    fn authenticated_user(&self) -> Option<String> {
        self.session.get::<String>(USERNAME_KEY).unwrap_or(None)
    }

    fn sign_in(&self, username: &str) {
        if let Err(err) = self.session.insert(USERNAME_KEY, username) {
            log::warn!("couldn't store signed-in user in session: {err}");
        }
    }

    fn sign_out(&self) {
        self.session.remove(USERNAME_KEY);
    }

    fn resolved_locale(&self) -> Option<Locale> {
        self.resolved_locale
    }
}

impl FromRequest for RequestSession {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let locale_cookie = req
            .cookie(LOCALE_COOKIE)
            .map(|cookie| cookie.value().to_string());

        let resolved_locale = req.extensions().get::<Locale>().copied();

        ready(Ok(
            RequestSession::new(req.get_session(), locale_cookie)
                .with_resolved_locale(resolved_locale),
        ))
    }
}
