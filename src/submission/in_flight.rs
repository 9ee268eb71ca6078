use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Submissions currently waiting on the account service, shared by every worker.
///
/// A key names one account action, e.g. `register:budi`. While a key is
/// claimed, a second submission for it is refused instead of reaching the service.
#[derive(Debug, Default)]
pub struct InFlight {
    keys: Mutex<HashSet<String>>,
}

/// Holds a key until dropped.
#[derive(Debug)]
pub struct Claim<'a> {
    in_flight: &'a InFlight,
    key: String,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key`, or returns `None` while another submission holds it.
    pub fn claim(&self, key: impl Into<String>) -> Option<Claim<'_>> {
        let key = key.into();
        if !self.keys().insert(key.clone()) {
            log::debug!("submission {key} already in flight");
            return None;
        }

        Some(Claim {
            in_flight: self,
            key,
        })
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.keys().contains(key)
    }

    fn keys(&self) -> MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.in_flight.keys().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_refused_until_release() {
        let in_flight = InFlight::new();

        let claim = in_flight.claim("register:budi");
        assert!(claim.is_some());
        assert!(in_flight.claim("register:budi").is_none());
        assert!(in_flight.is_claimed("register:budi"));

        drop(claim);

        assert!(!in_flight.is_claimed("register:budi"));
        assert!(in_flight.claim("register:budi").is_some());
    }

    #[test]
    fn test_keys_are_independent() {
        let in_flight = InFlight::new();

        let _register = in_flight.claim("register:budi").unwrap();

        assert!(in_flight.claim("login:budi").is_some());
        assert!(in_flight.claim("register:sari").is_some());
    }
}
