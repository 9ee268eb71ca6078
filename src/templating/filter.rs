use std::collections::HashMap;

use tarjama::{context::Context, Translator};
use tera::{Error, Filter, Result, Value};

/// `{{ key | trans(locale=locale, domain="register") }}`
pub struct TranslatorFilter {
    translator: Translator,
    default_domain: String,
}

impl TranslatorFilter {
    pub fn new(translator: Translator) -> Self {
        Self {
            translator,
            default_domain: "common".to_string(),
        }
    }
}

fn str_arg<'a>(args: &'a HashMap<String, Value>, name: &str) -> Result<Option<&'a str>> {
    match args.get(name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(Error::msg(format!(
            "trans: `{name}` must be a string, got {other}"
        ))),
    }
}

impl Filter for TranslatorFilter {
    fn filter(&self, value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
        let id = value
            .as_str()
            .ok_or_else(|| Error::msg(format!("trans: message key must be a string, got {value}")))?;
        let locale = str_arg(args, "locale")?
            .ok_or_else(|| Error::msg("trans: missing `locale` argument"))?;
        let domain = str_arg(args, "domain")?.unwrap_or(&self.default_domain);

        match self
            .translator
            .trans(locale, domain, id, Context::new(vec![], None))
        {
            Ok(s) => Ok(Value::String(s)),
            Err(e) => {
                log::warn!("missing translation {domain}/{id} for {locale}: {e}");
                Ok(Value::String(id.to_string()))
            }
        }
    }
}
