use std::path::Path;

use anyhow::Context;
use tarjama::Translator;
use tera::Tera;

pub mod filter;

pub fn initialize_engine(templates: &Path, translator: Translator) -> anyhow::Result<Tera> {
    let pattern = templates.join("**").join("*.html");
    let mut tera = Tera::new(&pattern.to_string_lossy())
        .with_context(|| format!("couldn't parse templates in {}", templates.display()))?;

    tera.autoescape_on(vec![".html"]);
    tera.register_filter("trans", filter::TranslatorFilter::new(translator));

    Ok(tera)
}
