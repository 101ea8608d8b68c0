use opus_vault_spec::{Identity, IdentityProvider, Result, VaultError};
use std::collections::HashMap;

/// Token table mapping opaque bearer tokens to identities.
///
/// Tokens are registered at construction and never change afterwards.
/// Lookups fail closed: an unknown token is denied, not distinguished.
#[derive(Debug, Default, Clone)]
pub struct StaticTokenProvider {
    identities: HashMap<String, Identity>,
}

impl StaticTokenProvider {
    /// Construct an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token for the given identity.
    pub fn register(mut self, token: impl Into<String>, identity: Identity) -> Self {
        self.identities.insert(token.into(), identity);
        self
    }
}

impl IdentityProvider for StaticTokenProvider {
    fn authenticate(&self, token: &str) -> Result<Identity> {
        self.identities
            .get(token)
            .cloned()
            .ok_or(VaultError::AccessDenied {
                action: "authenticate",
            })
    }
}
