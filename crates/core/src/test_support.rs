//! In-memory fixtures shared by the unit tests.

use std::cell::RefCell;

use crate::errors::GatewayError;
use crate::git::{IdentityGateway, Property, Scope};
use crate::models::{Identity, Passport};

/// Gateway over fixed values that records every local write.
#[derive(Default)]
pub struct MemoryGateway {
    pub global: Identity,
    pub local: RefCell<Identity>,
    pub remote: String,
    pub writes: RefCell<Vec<(Property, String)>>,
    pub global_reads: RefCell<usize>,
    /// Make `set_identity` fail.
    pub reject_writes: bool,
    /// Make `set_identity` fail for this property only.
    pub reject_property: Option<Property>,
}

impl MemoryGateway {
    pub fn with_remote(remote: &str) -> Self {
        Self { remote: remote.into(), ..Self::default() }
    }
}

impl IdentityGateway for MemoryGateway {
    fn identity(&self, scope: Scope, property: Property) -> Result<String, GatewayError> {
        let value = match scope {
            Scope::Global => {
                *self.global_reads.borrow_mut() += 1;
                self.global.clone()
            }
            Scope::Local => self.local.borrow().clone(),
        };
        Ok(match property {
            Property::Name => value.name,
            Property::Email => value.email,
        })
    }

    fn remote_url(&self) -> Result<String, GatewayError> {
        Ok(self.remote.clone())
    }

    fn set_identity(&self, property: Property, value: &str) -> Result<(), GatewayError> {
        if self.reject_writes || self.reject_property == Some(property) {
            return Err(GatewayError::PersistFailed {
                property: property.to_string(),
                source: git2::Error::from_str("config file locked"),
            });
        }
        self.writes.borrow_mut().push((property, value.to_string()));
        let mut local = self.local.borrow_mut();
        match property {
            Property::Name => local.name = value.to_string(),
            Property::Email => local.email = value.to_string(),
        }
        Ok(())
    }
}

/// Scenario passports: alice on github.com, bob on gitlab.com.
pub fn sample_passports() -> Vec<Passport> {
    vec![
        Passport {
            id: 0,
            name: "alice".into(),
            email: "a@x.com".into(),
            service: "github.com".into(),
        },
        Passport {
            id: 1,
            name: "bob".into(),
            email: "b@y.com".into(),
            service: "gitlab.com".into(),
        },
    ]
}
