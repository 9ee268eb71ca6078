use actix_utils::future::{ready, Ready};
use actix_web::{dev::Payload, Error, FromRequest, HttpMessage, HttpRequest};

/// Who is making the request, as far as the session tells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityToken {
    Anonymous,
    Authenticated { username: String },
}

impl SecurityToken {
    pub fn username(&self) -> Option<&str> {
        match self {
            SecurityToken::Authenticated { username } => Some(username),
            SecurityToken::Anonymous => None,
        }
    }
}

impl From<Option<String>> for SecurityToken {
    fn from(username: Option<String>) -> Self {
        match username {
            Some(username) => SecurityToken::Authenticated { username },
            None => SecurityToken::Anonymous,
        }
    }
}

impl FromRequest for SecurityToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .extensions()
            .get::<SecurityToken>()
            .cloned()
            .unwrap_or(SecurityToken::Anonymous);

        ready(Ok(token))
    }
}
