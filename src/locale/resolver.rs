use crate::account::AccountService;
use crate::locale::Locale;
use crate::session::ClientSession;

/// Works out which language to speak to the visitor in, and remembers their choice.
pub struct LocaleResolver<'a, S> {
    accounts: &'a S,
}

impl<'a, S: AccountService> LocaleResolver<'a, S> {
    pub fn new(accounts: &'a S) -> Self {
        Self { accounts }
    }

    /// Cookie first, then the signed-in user's stored preference, then the default.
    ///
    /// A locale the session already resolved for this request stands in for the lookup.
    ///
    /// Never fails: an unreadable cookie or a failed lookup counts as "no preference".
    pub async fn resolve(&self, session: &impl ClientSession) -> Locale {
        if let Some(value) = session.locale_cookie() {
            match Locale::from_code(&value) {
                Some(locale) => return locale,
                None => log::debug!("ignoring unsupported locale cookie value {value:?}"),
            }
        }

        if let Some(locale) = session.resolved_locale() {
            return locale;
        }

        if let Some(username) = session.authenticated_user() {
            match self.accounts.language_preference(&username).await {
                Ok(Some(locale)) => return locale,
                Ok(None) => {}
                Err(err) => {
                    log::warn!("couldn't fetch language preference for {username}: {err}")
                }
            }
        }

        Locale::default()
    }

    /// Stores the locale in the cookie, and for signed-in users also on the account.
    ///
    /// The account update is best effort; the cookie is written regardless.
    pub async fn persist(&self, locale: Locale, session: &impl ClientSession) {
        session.set_locale_cookie(locale);

        let Some(username) = session.authenticated_user() else {
            return;
        };

        if let Err(err) = self
            .accounts
            .set_language_preference(&username, locale)
            .await
        {
            log::warn!("couldn't store language preference for {username}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemorySession, StubAccountService};

    #[actix_web::test]
    async fn test_resolve_without_cookie_or_preference_returns_default() {
        let accounts = StubAccountService::default();
        let session = MemorySession::default();

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::En);
    }

    #[actix_web::test]
    async fn test_resolve_prefers_cookie() {
        let accounts = StubAccountService::default().with_preference(Ok(Some(Locale::En)));
        let session = MemorySession::signed_in("budi").with_cookie("id");

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::Id);
        assert!(accounts.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_resolve_ignores_unsupported_cookie() {
        let accounts = StubAccountService::default();
        let session = MemorySession::default().with_cookie("klingon");

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::En);
    }

    #[actix_web::test]
    async fn test_resolve_falls_back_to_stored_preference() {
        let accounts = StubAccountService::default().with_preference(Ok(Some(Locale::Id)));
        let session = MemorySession::signed_in("budi");

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::Id);
        assert_eq!(accounts.calls(), vec!["language_preference:budi".to_string()]);
    }

    #[actix_web::test]
    async fn test_resolve_reuses_locale_resolved_earlier() {
        let accounts = StubAccountService::default().with_preference(Ok(Some(Locale::En)));
        let session = MemorySession::signed_in("budi").with_resolved_locale(Locale::Id);

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::Id);
        assert!(accounts.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_resolve_swallows_lookup_failure() {
        let accounts = StubAccountService::default().with_preference(Err(()));
        let session = MemorySession::signed_in("budi");

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::En);
    }

    #[actix_web::test]
    async fn test_resolve_skips_lookup_for_anonymous_visitors() {
        let accounts = StubAccountService::default().with_preference(Ok(Some(Locale::Id)));
        let session = MemorySession::default();

        let locale = LocaleResolver::new(&accounts).resolve(&session).await;

        assert_eq!(locale, Locale::En);
        assert!(accounts.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_persist_anonymous_only_writes_cookie() {
        let accounts = StubAccountService::default();
        let session = MemorySession::default();

        LocaleResolver::new(&accounts)
            .persist(Locale::Id, &session)
            .await;

        assert_eq!(session.locale_cookie().as_deref(), Some("id"));
        assert!(accounts.calls().is_empty());
    }

    #[actix_web::test]
    async fn test_persist_signed_in_updates_account() {
        let accounts = StubAccountService::default();
        let session = MemorySession::signed_in("budi");

        LocaleResolver::new(&accounts)
            .persist(Locale::Id, &session)
            .await;

        assert_eq!(session.locale_cookie().as_deref(), Some("id"));
        assert_eq!(
            accounts.calls(),
            vec!["set_language_preference:budi:id".to_string()]
        );
    }

    #[actix_web::test]
    async fn test_persist_keeps_cookie_when_account_update_fails() {
        let accounts = StubAccountService::default().failing_preference_updates();
        let session = MemorySession::signed_in("budi");

        LocaleResolver::new(&accounts)
            .persist(Locale::Id, &session)
            .await;

        assert_eq!(session.locale_cookie().as_deref(), Some("id"));
    }
}
