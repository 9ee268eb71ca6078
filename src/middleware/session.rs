use crate::account::HttpAccountService;
use crate::locale::{Locale, LocaleResolver, LOCALE_COOKIE};
use crate::security::SecurityToken;
use crate::session::{ClientSession, RequestSession};
use actix_session::SessionExt;
use actix_utils::future::{ready, Ready};
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use std::{future::Future, pin::Pin, rc::Rc};

/// Resolves who the visitor is and which locale they get, once per request.
///
/// Later extractors reuse the resolved locale instead of asking the account service again.
pub struct SessionContextMiddleware;

// Middleware Service
pub struct SessionContextService<S> {
    service: Rc<S>,
}

impl<S, B> Transform<S, ServiceRequest> for SessionContextMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionContextService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionContextService {
            service: Rc::new(service),
        }))
    }
}

impl<S, B> Service<ServiceRequest> for SessionContextService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let locale_cookie = req
                .cookie(LOCALE_COOKIE)
                .map(|cookie| cookie.value().to_string());
            let session = RequestSession::new(req.get_session(), locale_cookie);

            let token = SecurityToken::from(session.authenticated_user());

            let locale = match req.app_data::<web::Data<HttpAccountService>>().cloned() {
                Some(accounts) => LocaleResolver::new(accounts.get_ref()).resolve(&session).await,
                None => {
                    log::warn!("no account service configured, resolving locale from cookie only");
                    session
                        .locale_cookie()
                        .and_then(|code| Locale::from_code(&code))
                        .unwrap_or_default()
                }
            };

            req.extensions_mut().insert::<SecurityToken>(token);
            req.extensions_mut().insert::<Locale>(locale);

            service.call(req).await
        })
    }
}
