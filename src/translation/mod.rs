pub mod key;

use std::path::Path;

use tarjama::{context::Context, Translator};

use crate::locale::Locale;

pub use key::MessageKey;

/// Catalogue domain of the registration page.
pub const REGISTER_DOMAIN: &str = "register";
/// Catalogue domain of the login page.
pub const LOGIN_DOMAIN: &str = "login";

pub fn initialize_translator(directory: &Path) -> anyhow::Result<Translator> {
    let catalogue = tarjama::loader::toml::load_sync(directory.to_path_buf()).map_err(|err| {
        anyhow::anyhow!(
            "couldn't load translations from {}: {err:?}",
            directory.display()
        )
    })?;

    Ok(Translator::with_catalogue_bag(catalogue))
}

/// Turns message keys into display text.
pub trait Translate {
    fn text(&self, key: &str) -> String;
}

/// One catalogue domain of the translator, in one locale.
pub struct Messages<'a> {
    translator: &'a Translator,
    locale: Locale,
    domain: &'a str,
}

impl<'a> Messages<'a> {
    pub fn new(translator: &'a Translator, locale: Locale, domain: &'a str) -> Self {
        Self {
            translator,
            locale,
            domain,
        }
    }
}

impl Translate for Messages<'_> {
    /// Missing translations fall back to the key itself.
    fn text(&self, key: &str) -> String {
        match self
            .translator
            .trans(self.locale.code(), self.domain, key, Context::new(vec![], None))
        {
            Ok(text) => text,
            Err(err) => {
                log::warn!(
                    "missing translation {}/{key} for {}: {err}",
                    self.domain,
                    self.locale
                );
                key.to_string()
            }
        }
    }
}
