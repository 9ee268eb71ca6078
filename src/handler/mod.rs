pub mod user;

use actix_session::Session;
use actix_web::{error, http::header, web, HttpResponse, Result};
use serde::{Deserialize, Serialize};
use tarjama::Translator;
use tera::Tera;

use crate::account::HttpAccountService;
use crate::locale::{Locale, LocaleResolver, UnsupportedLocale};
use crate::notification::{NotificationSink, SessionNotifications};
use crate::security::SecurityToken;
use crate::session::{ClientSession, RequestSession};
use crate::translation::{Messages, Translate, LOGIN_DOMAIN};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .service(
            web::resource("/login")
                .route(web::get().to(user::login_ui))
                .route(web::post().to(user::login)),
        )
        .service(web::resource("/login/validate").route(web::post().to(user::validate_login)))
        .service(
            web::resource("/register")
                .route(web::get().to(user::register_ui))
                .route(web::post().to(user::register)),
        )
        .service(
            web::resource("/register/validate").route(web::post().to(user::validate_register)),
        )
        .service(web::resource("/locale").route(web::post().to(change_locale)))
        .service(web::resource("/logout").route(web::get().to(logout)));
}

#[derive(Serialize)]
struct LocaleOption {
    code: &'static str,
    name: &'static str,
}

/// Variables every page needs. Drains the queued notifications.
pub(crate) fn page_context(
    locale: Locale,
    token: &SecurityToken,
    session: &Session,
) -> tera::Context {
    let locales = Locale::ALL.map(|locale| LocaleOption {
        code: locale.code(),
        name: locale.native_name(),
    });

    let mut context = tera::Context::new();
    context.insert("locale", locale.code());
    context.insert("locales", &locales);
    context.insert("username", &token.username());
    context.insert(
        "notifications",
        &SessionNotifications::new(session.clone()).drain(),
    );
    context
}

pub(crate) fn render(tera: &Tera, template: &str, context: &tera::Context) -> Result<String> {
    tera.render(template, context).map_err(|err| {
        log::error!("couldn't render {template}: {err:?}");
        error::ErrorInternalServerError(err)
    })
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header((header::LOCATION, location))
        .finish()
}

async fn index() -> HttpResponse {
    see_other("/login")
}

#[derive(Deserialize, Debug)]
pub struct LocaleFormData {
    pub locale: String,
    #[serde(default)]
    pub redirect: String,
}

/// Only same-site paths; anything else goes back to the home page.
fn local_path(redirect: &str) -> &str {
    if redirect.starts_with('/') && !redirect.starts_with("//") && !redirect.contains('\\') {
        redirect
    } else {
        "/"
    }
}

async fn change_locale(
    client: RequestSession,
    accounts: web::Data<HttpAccountService>,
    form: web::Form<LocaleFormData>,
) -> Result<HttpResponse> {
    let locale = form
        .locale
        .parse::<Locale>()
        .map_err(|err: UnsupportedLocale| error::ErrorBadRequest(err))?;

    LocaleResolver::new(accounts.get_ref())
        .persist(locale, &client)
        .await;

    let mut response = HttpResponse::SeeOther();
    response.append_header((header::LOCATION, local_path(&form.redirect)));
    client.write_cookies(&mut response);

    Ok(response.finish())
}

async fn logout(
    token: SecurityToken,
    locale: Locale,
    client: RequestSession,
    session: Session,
    translator: web::Data<Translator>,
) -> HttpResponse {
    if let SecurityToken::Authenticated { username } = token {
        log::info!("{username} signed out");
        client.sign_out();

        let messages = Messages::new(&translator, locale, LOGIN_DOMAIN);
        SessionNotifications::new(session).show_success(messages.text("loggedOut"));
    }

    see_other("/login")
}

pub async fn not_found(
    token: SecurityToken,
    locale: Locale,
    session: Session,
    tera: web::Data<Tera>,
) -> Result<HttpResponse> {
    let context = page_context(locale, &token, &session);
    let content = render(&tera, "not_found.html", &context)?;

    Ok(HttpResponse::NotFound()
        .content_type("text/html")
        .body(content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_path_rejects_foreign_targets() {
        assert_eq!(local_path("/register"), "/register");
        assert_eq!(local_path("/login?next=1"), "/login?next=1");
        assert_eq!(local_path(""), "/");
        assert_eq!(local_path("https://evil.example"), "/");
        assert_eq!(local_path("//evil.example"), "/");
        assert_eq!(local_path("/\\evil.example"), "/");
    }
}
