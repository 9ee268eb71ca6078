use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::{cookie, web, App, HttpServer};

use storefront::account::HttpAccountService;
use storefront::config::Config;
use storefront::submission::InFlight;
use storefront::{handler, middleware, templating, translation};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;

    let translator = translation::initialize_translator(&config.translations_dir)
        .map_err(std::io::Error::other)?;
    let tera = templating::initialize_engine(&config.templates_dir, translator.clone())
        .map_err(std::io::Error::other)?;
    let accounts = HttpAccountService::new(
        &config.account_service_url,
        config.account_service_timeout,
    )
    .map_err(std::io::Error::other)?;

    let accounts = web::Data::new(accounts);
    let translator = web::Data::new(translator);
    let tera = web::Data::new(tera);
    let in_flight = web::Data::new(InFlight::new());
    let session_key = config.session_key();

    log::info!(
        "starting HTTP server at http://{}:{}, account service at {}",
        config.bind_address,
        config.port,
        config.account_service_url
    );

    HttpServer::new(move || {
        App::new()
            .app_data(accounts.clone())
            .app_data(translator.clone())
            .app_data(tera.clone())
            .app_data(in_flight.clone())
            .wrap(middleware::session::SessionContextMiddleware)
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), session_key.clone())
                    .cookie_secure(false)
                    .session_lifecycle(
                        PersistentSession::default().session_ttl(cookie::time::Duration::hours(2)),
                    )
                    .build(),
            )
            .wrap(actix_web::middleware::Logger::default())
            .configure(handler::configure)
            .default_service(web::route().to(handler::not_found))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .workers(num_cpus::get() * 2)
    .run()
    .await
}
