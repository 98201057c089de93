//! Domain model types used throughout git-passport.
//!
//! These types bridge the configuration loader, the identity resolver, and
//! the candidate selector.

use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Passport
// ---------------------------------------------------------------------------

/// A user-maintained identity profile tied to a hosting service.
///
/// `id` is the passport's 0-based position in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passport {
    pub id: usize,
    pub name: String,
    pub email: String,
    /// Hostname of the hosting service, e.g. `github.com`.
    pub service: String,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A git `user.name` / `user.email` pair read from a config scope.
///
/// Used both for the global identity and for the repository's active
/// (local) identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self { name: name.into(), email: email.into() }
    }

    /// Both name and email are set.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.email.is_empty()
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

// ---------------------------------------------------------------------------
// Candidate pool
// ---------------------------------------------------------------------------

/// One selectable entry in a [`CandidatePool`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    Passport(Passport),
    /// The global identity, offered as a fallback.
    Global(Identity),
}

impl Candidate {
    pub fn name(&self) -> &str {
        match self {
            Self::Passport(p) => &p.name,
            Self::Global(g) => &g.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Self::Passport(p) => &p.email,
            Self::Global(g) => &g.email,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }

    /// The identity this candidate would write to local scope.
    pub fn identity(&self) -> Identity {
        Identity::new(self.name(), self.email())
    }
}

/// The candidates offered for selection in a single run.
///
/// Keys are passport ids plus at most one synthetic key for the global
/// identity. Once built the pool cannot be modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePool {
    entries: BTreeMap<usize, Candidate>,
}

impl CandidatePool {
    /// Build a pool from passports, keyed by their ids.
    ///
    /// When `global` is given and complete it is appended at key
    /// `passports.len()`.
    pub fn build<I>(passports: I, global: Option<Identity>) -> Self
    where
        I: IntoIterator<Item = Passport>,
    {
        let mut entries: BTreeMap<usize, Candidate> = passports
            .into_iter()
            .map(|p| (p.id, Candidate::Passport(p)))
            .collect();

        if let Some(identity) = global.filter(Identity::is_complete) {
            let key = entries.len();
            // Ids are contiguous when the whole passport list is offered, so
            // `len` is the next free ordinal.
            debug_assert!(entries.keys().all(|k| *k < key));
            entries.insert(key, Candidate::Global(identity));
        }

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: usize) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: usize) -> Option<&Candidate> {
        self.entries.get(&key)
    }

    /// Keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.keys().copied()
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Candidate)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}
