use std::collections::BTreeMap;

use actix_session::Session;
use actix_web::{error, http::StatusCode, web, HttpResponse, Result};
use serde::Deserialize;
use tarjama::Translator;
use tera::Tera;

use super::{page_context, render, see_other};
use crate::account::HttpAccountService;
use crate::form::user::{LoginFormData, RegisterFormData};
use crate::form::{Field, Form, FormController, SubmitResult};
use crate::locale::Locale;
use crate::notification::{NotificationSink, SessionNotifications};
use crate::security::SecurityToken;
use crate::session::RequestSession;
use crate::submission::{InFlight, SubmissionPipeline};
use crate::translation::{MessageKey, Messages, Translate, LOGIN_DOMAIN, REGISTER_DOMAIN};

/// A blur event: the whole form, the field that lost focus and the fields
/// touched before it (comma separated).
#[derive(Deserialize, Debug)]
pub struct BlurData<V> {
    #[serde(flatten)]
    values: V,
    field: String,
    #[serde(default)]
    touched: String,
}

fn render_form<V: Form>(
    tera: &Tera,
    template: &str,
    controller: &FormController<V>,
    locale: Locale,
    token: &SecurityToken,
    session: &Session,
    status: StatusCode,
) -> Result<HttpResponse> {
    let values: BTreeMap<&str, &str> = <V::Field as Field>::ALL
        .iter()
        .filter(|field| !field.is_secret())
        .map(|field| (field.name(), controller.values().value(*field)))
        .collect();
    let errors: BTreeMap<&str, MessageKey> = controller
        .visible_errors()
        .map(|(field, key)| (field.name(), key))
        .collect();

    let mut context = page_context(locale, token, session);
    context.insert("values", &values);
    context.insert("errors", &errors);

    let content = render(tera, template, &context)?;

    Ok(HttpResponse::build(status)
        .content_type("text/html")
        .body(content))
}

/// Redirects after a successful submit, otherwise renders the form again
/// with what the user entered.
#[allow(clippy::too_many_arguments)]
fn respond<V: Form>(
    result: SubmitResult,
    path: &str,
    tera: &Tera,
    template: &str,
    controller: &FormController<V>,
    locale: Locale,
    token: &SecurityToken,
    session: &Session,
) -> Result<HttpResponse> {
    match result {
        SubmitResult::Completed(outcome) if outcome.is_success() => Ok(see_other(path)),
        SubmitResult::Invalid => render_form(
            tera,
            template,
            controller,
            locale,
            token,
            session,
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        SubmitResult::Busy => render_form(
            tera,
            template,
            controller,
            locale,
            token,
            session,
            StatusCode::CONFLICT,
        ),
        _ => render_form(
            tera,
            template,
            controller,
            locale,
            token,
            session,
            StatusCode::OK,
        ),
    }
}

/// One submission per account at a time: the same username posted again while the
/// first is still with the account service comes back `Busy`.
fn in_flight_key(form: &str, username: &str) -> String {
    format!("{form}:{}", username.trim().to_lowercase())
}

fn report_busy(messages: &impl Translate, sink: &impl NotificationSink) -> SubmitResult {
    sink.show_error(messages.text(MessageKey::InProgress.as_str()));
    SubmitResult::Busy
}

/// Revalidates after a blur and returns the errors visible now, translated.
fn blur<V: Form>(data: BlurData<V>, messages: &impl Translate) -> Result<HttpResponse> {
    let field = <V::Field as Field>::from_name(&data.field)
        .ok_or_else(|| error::ErrorBadRequest(format!("unknown field `{}`", data.field)))?;
    let touched = data
        .touched
        .split(',')
        .filter_map(|name| <V::Field as Field>::from_name(name.trim()));

    let mut controller = FormController::restore(data.values, touched);
    controller.blur(field);

    let errors: BTreeMap<&str, String> = controller
        .visible_errors()
        .map(|(field, key)| (field.name(), messages.text(key.as_str())))
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "errors": errors })))
}

pub async fn login_ui(
    token: SecurityToken,
    locale: Locale,
    session: Session,
    tera: web::Data<Tera>,
) -> Result<HttpResponse> {
    render_form(
        &tera,
        "login.html",
        &FormController::<LoginFormData>::new(),
        locale,
        &token,
        &session,
        StatusCode::OK,
    )
}

#[allow(clippy::too_many_arguments)]
pub async fn login(
    token: SecurityToken,
    locale: Locale,
    client: RequestSession,
    session: Session,
    accounts: web::Data<HttpAccountService>,
    translator: web::Data<Translator>,
    tera: web::Data<Tera>,
    in_flight: web::Data<InFlight>,
    form: web::Form<LoginFormData>,
) -> Result<HttpResponse> {
    let mut controller = FormController::<LoginFormData>::new();
    controller.fill(&form);

    let messages = Messages::new(&translator, locale, LOGIN_DOMAIN);
    let notifications = SessionNotifications::new(session.clone());
    let pipeline = SubmissionPipeline::new(accounts.get_ref());

    let result = match in_flight.claim(in_flight_key("login", &form.username)) {
        Some(_claim) => {
            let pipeline = &pipeline;
            let client = &client;
            controller
                .submit(
                    move |values| pipeline.login(values, client),
                    &messages,
                    &notifications,
                )
                .await
        }
        None => report_busy(&messages, &notifications),
    };

    respond(
        result,
        "/login",
        &tera,
        "login.html",
        &controller,
        locale,
        &token,
        &session,
    )
}

pub async fn validate_login(
    locale: Locale,
    translator: web::Data<Translator>,
    form: web::Form<BlurData<LoginFormData>>,
) -> Result<HttpResponse> {
    blur(
        form.into_inner(),
        &Messages::new(&translator, locale, LOGIN_DOMAIN),
    )
}

pub async fn register_ui(
    token: SecurityToken,
    locale: Locale,
    session: Session,
    tera: web::Data<Tera>,
) -> Result<HttpResponse> {
    render_form(
        &tera,
        "register.html",
        &FormController::<RegisterFormData>::new(),
        locale,
        &token,
        &session,
        StatusCode::OK,
    )
}

#[allow(clippy::too_many_arguments)]
pub async fn register(
    token: SecurityToken,
    locale: Locale,
    client: RequestSession,
    session: Session,
    accounts: web::Data<HttpAccountService>,
    translator: web::Data<Translator>,
    tera: web::Data<Tera>,
    in_flight: web::Data<InFlight>,
    form: web::Form<RegisterFormData>,
) -> Result<HttpResponse> {
    let mut controller = FormController::<RegisterFormData>::new();
    controller.fill(&form);

    let messages = Messages::new(&translator, locale, REGISTER_DOMAIN);
    let notifications = SessionNotifications::new(session.clone());
    let pipeline = SubmissionPipeline::new(accounts.get_ref());

    let result = match in_flight.claim(in_flight_key("register", &form.username)) {
        Some(_claim) => {
            let pipeline = &pipeline;
            let client = &client;
            controller
                .submit(
                    move |values| pipeline.register(values, client),
                    &messages,
                    &notifications,
                )
                .await
        }
        None => report_busy(&messages, &notifications),
    };

    respond(
        result,
        "/register",
        &tera,
        "register.html",
        &controller,
        locale,
        &token,
        &session,
    )
}

pub async fn validate_register(
    locale: Locale,
    translator: web::Data<Translator>,
    form: web::Form<BlurData<RegisterFormData>>,
) -> Result<HttpResponse> {
    blur(
        form.into_inner(),
        &Messages::new(&translator, locale, REGISTER_DOMAIN),
    )
}
