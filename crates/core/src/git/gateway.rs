//! The contract between the resolver/runner and git configuration.

use crate::errors::GatewayError;
use crate::models::Identity;

/// Config level an identity property is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local,
}

/// The `user.*` property being read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Name,
    Email,
}

impl Property {
    /// Fully qualified git config key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "user.name",
            Self::Email => "user.email",
        }
    }
}

impl std::fmt::Display for Property {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
        }
    }
}

/// Reads and writes identity properties of the current repository.
///
/// Unset values are returned as empty strings; errors mean git itself could
/// not be queried.
pub trait IdentityGateway {
    /// Read `user.<property>` at `scope`.
    fn identity(&self, scope: Scope, property: Property) -> Result<String, GatewayError>;

    /// Read `remote.origin.url` at local scope.
    fn remote_url(&self) -> Result<String, GatewayError>;

    /// Write `user.<property>` at local scope.
    ///
    /// A failed write is reported as [`GatewayError::PersistFailed`].
    fn set_identity(&self, property: Property, value: &str) -> Result<(), GatewayError>;

    /// Read name and email together at `scope`.
    fn identity_pair(&self, scope: Scope) -> Result<Identity, GatewayError> {
        Ok(Identity {
            name: self.identity(scope, Property::Name)?,
            email: self.identity(scope, Property::Email)?,
        })
    }
}
