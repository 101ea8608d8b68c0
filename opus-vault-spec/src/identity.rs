use crate::error::{Result, VaultError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Validates that the provided value is non-empty and contains only supported characters.
pub(crate) fn validate_component(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::EmptyComponent { field });
    }

    if !value
        .chars()
        .all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.'))
    {
        return Err(VaultError::InvalidCharacters {
            field,
            value: value.to_string(),
        });
    }

    Ok(())
}

/// Role attached to an authenticated identity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May act on every record and enumerate all of them.
    Admin,
    /// May act only on records they own.
    User,
}

impl Role {
    /// Returns true when the role grants administrative access.
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Validated identifier for a vault user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(String);

impl UserId {
    /// Construct a validated user id.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        validate_component(&value, "user id")?;
        Ok(Self(value))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated caller attached to every operation.
///
/// Supplied per call by the external identity provider; the vault never
/// stores credentials.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
}

impl Identity {
    /// Pair a user id with its role.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Identifier of the caller.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Role granted by the identity provider.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Convenience check for administrative access.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Authentication interface implemented by external identity systems.
///
/// Callers hand the provider an opaque credential token and receive the
/// resolved identity. Raw passwords never reach the vault; failures map to
/// [`VaultError::AccessDenied`].
pub trait IdentityProvider: Send + Sync {
    /// Resolve an opaque credential token into an identity.
    fn authenticate(&self, token: &str) -> Result<Identity>;
}

impl<T> IdentityProvider for Arc<T>
where
    T: IdentityProvider + ?Sized,
{
    fn authenticate(&self, token: &str) -> Result<Identity> {
        (**self).authenticate(token)
    }
}

impl<T> IdentityProvider for Box<T>
where
    T: IdentityProvider + ?Sized,
{
    fn authenticate(&self, token: &str) -> Result<Identity> {
        (**self).authenticate(token)
    }
}
