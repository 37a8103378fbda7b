use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Which static credential a bearer token matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Read,
    Admin,
}

/// The two static secrets loaded at startup.
#[derive(Clone)]
pub struct ApiKeys {
    api_key: String,
    admin_key: String,
}

impl ApiKeys {
    pub fn new(api_key: impl Into<String>, admin_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            admin_key: admin_key.into(),
        }
    }

    /// Resolve a presented token to an access level.
    ///
    /// Both keys are always compared so the time taken does not depend on
    /// which one (if any) matched.
    pub fn authenticate(&self, token: &str) -> Option<AccessLevel> {
        let is_admin = constant_time_eq(token, &self.admin_key);
        let is_read = constant_time_eq(token, &self.api_key);

        if is_admin {
            Some(AccessLevel::Admin)
        } else if is_read {
            Some(AccessLevel::Read)
        } else {
            None
        }
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys").finish_non_exhaustive()
    }
}

// Digests are fixed-length, so neither key's length shows in the timing.
fn constant_time_eq(presented: &str, expected: &str) -> bool {
    let presented = Sha256::digest(presented.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    presented.as_slice().ct_eq(expected.as_slice()).into()
}
