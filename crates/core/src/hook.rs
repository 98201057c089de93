//! The pre-commit hook run, stage by stage.
//!
//! ```text
//! INIT -> CHECK_ACTIVE -> DONE_ACTIVE
//!                      -> RESOLVE -> SELECT -> PERSIST -> DONE
//!                                          -> QUIT
//! any stage -> FATAL
//! ```
//!
//! Every stage returns a `Result`; the caller maps the terminal state to an
//! exit status.

use tracing::{debug, info, warn};

use crate::config::PassportConfig;
use crate::errors::{GatewayError, PassportError, TerminalError};
use crate::git::{IdentityGateway, Property, Scope};
use crate::models::{CandidatePool, Identity};
use crate::resolver::{IdentityResolver, PoolOrigin, Resolution};
use crate::selector::{CandidateSelector, Choice, Prompter};

/// States of a single hook run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    CheckActive,
    DoneActive,
    Resolve,
    Select,
    Persist,
    Done,
    Quit,
    Fatal,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::DoneActive | Self::Done | Self::Quit | Self::Fatal)
    }
}

/// How a run ended without a fatal error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// `enable_hook` is off.
    Disabled,
    /// A local identity was already set; nothing was written.
    AlreadyProvisioned { active: Identity, remote: String },
    /// The chosen candidate was written to local scope.
    Persisted { key: usize, identity: Identity },
    /// The user quit the prompt; nothing was written.
    Quit,
}

impl Outcome {
    /// Terminal state this outcome corresponds to.
    pub fn state(&self) -> RunState {
        match self {
            Self::Disabled => RunState::Init,
            Self::AlreadyProvisioned { .. } => RunState::DoneActive,
            Self::Persisted { .. } => RunState::Done,
            Self::Quit => RunState::Quit,
        }
    }

    /// Whether the hook should let the commit proceed.
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Quit)
    }
}

/// What to do when writing the local identity fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PersistPolicy {
    /// Abort the run with the write error.
    ///
    /// Writes are not transactional: `user.email` is written first, so a
    /// failure on `user.name` leaves the email set. The next run sees an
    /// incomplete local identity and prompts again.
    #[default]
    Strict,
    /// Log a warning and report the selection as persisted.
    BestEffort,
}

/// Receives the messages shown to the user while the run progresses.
pub trait Reporter {
    /// Called once, right before prompting, with the pool and its rendering.
    fn candidates(&mut self, origin: &PoolOrigin, remote: &str, pool: &CandidatePool, table: &str);
}

/// Drives one hook run against a gateway.
pub struct HookRunner<'a, G: IdentityGateway> {
    config: &'a PassportConfig,
    gateway: &'a G,
    policy: PersistPolicy,
}

impl<'a, G: IdentityGateway> HookRunner<'a, G> {
    pub fn new(config: &'a PassportConfig, gateway: &'a G) -> Self {
        Self { config, gateway, policy: PersistPolicy::default() }
    }

    pub fn with_policy(mut self, policy: PersistPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Run the hook to a terminal state.
    ///
    /// `open_prompt` is only called when a selection is actually needed, so
    /// runs that end early never touch the terminal.
    pub fn run<P, F, R>(&self, open_prompt: F, reporter: &mut R) -> Result<Outcome, PassportError>
    where
        P: Prompter,
        F: FnOnce() -> Result<P, TerminalError>,
        R: Reporter,
    {
        debug!(state = ?RunState::Init, "hook run started");
        if !self.config.settings.enabled {
            info!("hook disabled in configuration");
            return Ok(Outcome::Disabled);
        }

        debug!(state = ?RunState::CheckActive);
        let active = self.gateway.identity_pair(Scope::Local)?;
        let remote_url = self.gateway.remote_url()?;

        debug!(state = ?RunState::Resolve);
        let resolution = IdentityResolver::new(self.config, self.gateway).resolve(&active, &remote_url)?;
        let remote = resolution.remote_display().to_string();

        let (pool, origin) = match resolution {
            Resolution::Provisioned { active, .. } => {
                debug!(state = ?RunState::DoneActive);
                return Ok(Outcome::AlreadyProvisioned { active, remote });
            }
            Resolution::Candidates { pool, origin } => (pool, origin),
        };

        debug!(state = ?RunState::Select, candidates = pool.len());
        let choice = self.select(pool, &origin, &remote, open_prompt, reporter)?;
        let (key, identity) = match choice {
            Choice::Quit => {
                info!("selection cancelled");
                return Ok(Outcome::Quit);
            }
            Choice::Chosen { key, candidate } => (key, candidate.identity()),
        };

        debug!(state = ?RunState::Persist, key);
        self.persist(&identity)?;

        debug!(state = ?RunState::Done);
        Ok(Outcome::Persisted { key, identity })
    }

    fn select<P, F, R>(
        &self,
        pool: CandidatePool,
        origin: &PoolOrigin,
        remote: &str,
        open_prompt: F,
        reporter: &mut R,
    ) -> Result<Choice, TerminalError>
    where
        P: Prompter,
        F: FnOnce() -> Result<P, TerminalError>,
        R: Reporter,
    {
        let selector = CandidateSelector::new(pool);
        reporter.candidates(origin, remote, selector.pool(), &selector.render());
        let mut prompt = open_prompt()?;
        selector.select(&mut prompt)
    }

    fn persist(&self, identity: &Identity) -> Result<(), GatewayError> {
        for (property, value) in [(Property::Email, &identity.email), (Property::Name, &identity.name)] {
            match self.gateway.set_identity(property, value) {
                Ok(()) => {}
                Err(e) if self.policy == PersistPolicy::BestEffort => {
                    warn!(error = %e, "could not persist local identity, continuing");
                }
                Err(e) => return Err(e),
            }
        }
        info!(identity = %identity, "local identity persisted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::Settings;
    use crate::selector::LinePrompt;
    use crate::test_support::{sample_passports, MemoryGateway};

    #[derive(Default)]
    struct Recorder {
        shown: Vec<(PoolOrigin, String, String)>,
    }

    impl Reporter for Recorder {
        fn candidates(&mut self, origin: &PoolOrigin, remote: &str, _pool: &CandidatePool, table: &str) {
            self.shown.push((origin.clone(), remote.to_string(), table.to_string()));
        }
    }

    fn config(enabled: bool) -> PassportConfig {
        PassportConfig {
            settings: Settings { enabled, prompt_delay: Duration::ZERO },
            passports: sample_passports(),
        }
    }

    fn answers(input: &'static str) -> impl FnOnce() -> Result<LinePrompt<&'static [u8], Vec<u8>>, TerminalError> {
        move || Ok(LinePrompt::new(input.as_bytes(), Vec::new()))
    }

    fn no_terminal() -> Result<LinePrompt<&'static [u8], Vec<u8>>, TerminalError> {
        panic!("terminal must not be opened")
    }

    #[test]
    fn test_scenario_a_remote_match_persists_choice() {
        let config = config(true);
        let gateway = MemoryGateway::with_remote("https://github.com/acme/project.git");
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .run(answers("1\n0\n"), &mut recorder)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Persisted { key: 0, identity: Identity::new("alice", "a@x.com") }
        );
        assert_eq!(outcome.state(), RunState::Done);
        assert_eq!(
            *gateway.writes.borrow(),
            vec![(Property::Email, "a@x.com".to_string()), (Property::Name, "alice".to_string())]
        );
        let (origin, remote, table) = &recorder.shown[0];
        assert!(matches!(origin, PoolOrigin::RemoteMatch { .. }));
        assert_eq!(remote, "https://github.com/acme/project.git");
        assert!(!table.contains("bob"));
    }

    #[test]
    fn test_scenario_b_no_match_lists_all() {
        let config = config(true);
        let gateway = MemoryGateway::with_remote("https://bitbucket.org/team/repo.git");
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .run(answers("2\n1\n"), &mut recorder)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Persisted { key: 1, identity: Identity::new("bob", "b@y.com") }
        );
        assert!(matches!(recorder.shown[0].0, PoolOrigin::NoMatch { .. }));
    }

    #[test]
    fn test_scenario_c_no_remote_offers_global() {
        let config = config(true);
        let gateway = MemoryGateway {
            global: Identity::new("carol", "c@z.com"),
            ..MemoryGateway::default()
        };
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .run(answers("2\n"), &mut recorder)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::Persisted { key: 2, identity: Identity::new("carol", "c@z.com") }
        );
        let (origin, remote, table) = &recorder.shown[0];
        assert_eq!(*origin, PoolOrigin::NoRemote);
        assert_eq!(remote, crate::resolver::REMOTE_NOT_SET);
        assert!(table.contains("global"));
    }

    #[test]
    fn test_scenario_d_already_provisioned_never_writes() {
        let config = config(true);
        let gateway = MemoryGateway {
            local: Identity::new("zoe", "z@q.com").into(),
            remote: "https://github.com/acme/project.git".into(),
            ..MemoryGateway::default()
        };
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .run(no_terminal, &mut recorder)
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::AlreadyProvisioned {
                active: Identity::new("zoe", "z@q.com"),
                remote: "https://github.com/acme/project.git".into(),
            }
        );
        assert_eq!(outcome.state(), RunState::DoneActive);
        assert!(gateway.writes.borrow().is_empty());
        assert!(recorder.shown.is_empty());
    }

    #[test]
    fn test_disabled_hook_does_nothing() {
        let config = config(false);
        let gateway = MemoryGateway::default();
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .run(no_terminal, &mut recorder)
            .unwrap();

        assert_eq!(outcome, Outcome::Disabled);
        assert_eq!(outcome.state(), RunState::Init);
        assert!(outcome.is_success());
        assert!(gateway.writes.borrow().is_empty());
    }

    #[test]
    fn test_quit_writes_nothing() {
        let config = config(true);
        let gateway = MemoryGateway::default();
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .run(answers("x\nq\n"), &mut recorder)
            .unwrap();

        assert_eq!(outcome, Outcome::Quit);
        assert!(!outcome.is_success());
        assert!(outcome.state().is_terminal());
        assert!(gateway.writes.borrow().is_empty());
    }

    #[test]
    fn test_missing_terminal_is_fatal() {
        let config = config(true);
        let gateway = MemoryGateway::default();
        let mut recorder = Recorder::default();

        let result = HookRunner::new(&config, &gateway).run(
            || -> Result<LinePrompt<&'static [u8], Vec<u8>>, TerminalError> {
                Err(TerminalError::Unavailable(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no tty",
                )))
            },
            &mut recorder,
        );

        assert!(matches!(
            result,
            Err(PassportError::Terminal(TerminalError::Unavailable(_)))
        ));
        // The candidates are still shown before the terminal is needed.
        assert_eq!(recorder.shown.len(), 1);
        assert!(gateway.writes.borrow().is_empty());
    }

    #[test]
    fn test_strict_policy_fails_on_write_error() {
        let config = config(true);
        let gateway = MemoryGateway { reject_writes: true, ..MemoryGateway::default() };
        let mut recorder = Recorder::default();

        let result = HookRunner::new(&config, &gateway).run(answers("0\n"), &mut recorder);

        assert!(matches!(
            result,
            Err(PassportError::Gateway(GatewayError::PersistFailed { .. }))
        ));
    }

    #[test]
    fn test_strict_policy_keeps_partial_write() {
        let config = config(true);
        let gateway = MemoryGateway {
            reject_property: Some(Property::Name),
            ..MemoryGateway::default()
        };
        let mut recorder = Recorder::default();

        let result = HookRunner::new(&config, &gateway).run(answers("0\n"), &mut recorder);

        assert!(matches!(
            result,
            Err(PassportError::Gateway(GatewayError::PersistFailed { ref property, .. })) if property == "name"
        ));
        assert_eq!(*gateway.writes.borrow(), vec![(Property::Email, "a@x.com".to_string())]);
        // Half-written identity is not complete, so the next run resolves again.
        let local = gateway.identity_pair(Scope::Local).unwrap();
        assert!(!local.is_complete());
    }

    #[test]
    fn test_best_effort_policy_ignores_write_error() {
        let config = config(true);
        let gateway = MemoryGateway { reject_writes: true, ..MemoryGateway::default() };
        let mut recorder = Recorder::default();

        let outcome = HookRunner::new(&config, &gateway)
            .with_policy(PersistPolicy::BestEffort)
            .run(answers("0\n"), &mut recorder)
            .unwrap();

        assert!(matches!(outcome, Outcome::Persisted { key: 0, .. }));
        assert!(gateway.writes.borrow().is_empty());
    }
}
