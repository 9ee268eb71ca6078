use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::account::{AccountError, AccountService, LoginRequest, RegisterRequest};
use crate::locale::Locale;

#[derive(Debug, Serialize, Deserialize)]
struct LanguageBody {
    language: Option<String>,
}

/// [`AccountService`] reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAccountService {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpAccountService {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("invalid account service URL `{base_url}`"))?;
        if base_url.cannot_be_a_base() {
            bail!("account service URL `{base_url}` cannot be used as a base");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("couldn't build account service HTTP client")?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        url
    }
}

impl AccountService for HttpAccountService {
    async fn create_user(&self, request: &RegisterRequest) -> Result<(), AccountError> {
        let response = self
            .client
            .post(self.endpoint(&["user"]))
            .json(request)
            .send()
            .await?;

        expect_success(response).await.map(drop)
    }

    async fn login(&self, request: &LoginRequest) -> Result<(), AccountError> {
        let response = self
            .client
            .post(self.endpoint(&["user", "login"]))
            .json(request)
            .send()
            .await?;

        expect_success(response).await.map(drop)
    }

    async fn language_preference(&self, username: &str) -> Result<Option<Locale>, AccountError> {
        let response = self
            .client
            .get(self.endpoint(&["user", username, "language"]))
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT
        ) {
            return Ok(None);
        }

        let body: LanguageBody = expect_success(response)
            .await?
            .json()
            .await
            .map_err(|err| AccountError::Decode(err.to_string()))?;

        let locale = body.language.as_deref().and_then(|code| {
            let locale = Locale::from_code(code);
            if locale.is_none() {
                log::debug!("account service returned unsupported language {code:?}");
            }
            locale
        });

        Ok(locale)
    }

    async fn set_language_preference(
        &self,
        username: &str,
        locale: Locale,
    ) -> Result<(), AccountError> {
        let body = LanguageBody {
            language: Some(locale.code().to_string()),
        };

        let response = self
            .client
            .put(self.endpoint(&["user", username, "language"]))
            .json(&body)
            .send()
            .await?;

        expect_success(response).await.map(drop)
    }
}

async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response, AccountError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(AccountError::Rejected {
        status: status.as_u16(),
        code: parse_error_code(&body),
    })
}

/// Extracts an error code such as `USERNAME_EXISTS` from an error body.
///
/// Accepts the bare code, a JSON string, or a JSON object with a `code` field.
fn parse_error_code(body: &str) -> Option<String> {
    let body = body.trim();

    let candidate = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(code)) => code,
        Ok(Value::Object(fields)) => fields.get("code")?.as_str()?.to_string(),
        Ok(_) => return None,
        Err(_) => body.to_string(),
    };

    let is_code = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');

    is_code.then_some(candidate)
}
