//! Candidate pool resolution.
//!
//! Decision order, each branch terminal:
//! 1. Local `user.name` and `user.email` already set: stop, nothing to do.
//! 2. Remote URL set: offer the passports whose `service` equals the remote
//!    host. With no match, offer every passport plus the global identity.
//! 3. No remote URL: offer every passport plus the global identity.
//!
//! The global identity is only offered when both its name and email are set.

use tracing::{debug, info, warn};

use crate::config::PassportConfig;
use crate::errors::GatewayError;
use crate::git::remote_url::remote_host;
use crate::git::{IdentityGateway, Scope};
use crate::models::{CandidatePool, Identity, Passport};

/// Shown in place of the remote URL when `remote.origin.url` is unset.
pub const REMOTE_NOT_SET: &str = "«remote.origin.url» is not set";

/// Outcome of [`IdentityResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The repository already has a local identity.
    Provisioned {
        active: Identity,
        remote_url: Option<String>,
    },
    /// A pool of candidates to choose from.
    Candidates {
        pool: CandidatePool,
        origin: PoolOrigin,
    },
}

/// Which branch produced a candidate pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolOrigin {
    /// One or more passports match the remote host.
    RemoteMatch { remote_url: String },
    /// A remote is set but no passport matches its host.
    NoMatch { remote_url: String },
    /// No remote is configured.
    NoRemote,
}

impl Resolution {
    /// Remote URL for display, or [`REMOTE_NOT_SET`].
    pub fn remote_display(&self) -> &str {
        match self {
            Self::Provisioned { remote_url: Some(url), .. }
            | Self::Candidates { origin: PoolOrigin::RemoteMatch { remote_url: url }, .. }
            | Self::Candidates { origin: PoolOrigin::NoMatch { remote_url: url }, .. } => url.as_str(),
            _ => REMOTE_NOT_SET,
        }
    }
}

/// Builds the candidate pool for the current repository.
pub struct IdentityResolver<'a, G: IdentityGateway> {
    config: &'a PassportConfig,
    gateway: &'a G,
}

impl<'a, G: IdentityGateway> IdentityResolver<'a, G> {
    pub fn new(config: &'a PassportConfig, gateway: &'a G) -> Self {
        Self { config, gateway }
    }

    /// Resolve the candidates given the active identity and remote URL.
    ///
    /// The gateway is only consulted for the global identity, and only when
    /// the fallback pool is built. Nothing is written.
    pub fn resolve(&self, active: &Identity, remote_url: &str) -> Result<Resolution, GatewayError> {
        let remote = (!remote_url.is_empty()).then(|| remote_url.to_string());

        if active.is_complete() {
            info!(identity = %active, "local identity already set");
            return Ok(Resolution::Provisioned { active: active.clone(), remote_url: remote });
        }

        let passports = &self.config.passports;

        let Some(remote_url) = remote else {
            debug!("no remote url, offering all passports");
            let pool = self.fallback_pool(passports)?;
            return Ok(Resolution::Candidates { pool, origin: PoolOrigin::NoRemote });
        };

        let host = remote_host(&remote_url);
        let matches = host.map(|h| matching_passports(passports, h)).unwrap_or_default();

        if matches.is_empty() {
            debug!(?host, "no passport matches remote host");
            let pool = self.fallback_pool(passports)?;
            Ok(Resolution::Candidates { pool, origin: PoolOrigin::NoMatch { remote_url } })
        } else {
            debug!(?host, count = matches.len(), "passports match remote host");
            let pool = CandidatePool::build(matches, None);
            Ok(Resolution::Candidates { pool, origin: PoolOrigin::RemoteMatch { remote_url } })
        }
    }

    fn fallback_pool(&self, passports: &[Passport]) -> Result<CandidatePool, GatewayError> {
        let global = self.gateway.identity_pair(Scope::Global)?;
        let pool = CandidatePool::build(passports.iter().cloned(), Some(global));
        if pool.is_empty() {
            warn!("no passports configured and no global identity set; only quitting is possible");
        }
        Ok(pool)
    }
}

/// Passports whose `service` is exactly `host`, ids preserved.
pub fn matching_passports(passports: &[Passport], host: &str) -> Vec<Passport> {
    passports.iter().filter(|p| p.service == host).cloned().collect()
}
