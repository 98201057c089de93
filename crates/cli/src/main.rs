//! git-passport pre-commit hook.
//!
//! Picks the local committer identity for the current repository from the
//! passports in `~/.git_passport.toml`. Install it as `.git/hooks/pre-commit`
//! (or call it from one); it takes no arguments.

mod report;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gitpassport_core::hook::Outcome;
use gitpassport_core::{GitConfigGateway, HookRunner, PassportConfig, TerminalPrompt};

use crate::report::ConsoleReporter;

const CONFIG_FILE_NAME: &str = ".git_passport.toml";
const CONFIG_ENV: &str = "GIT_PASSPORT_CONFIG";

/// Choose a git identity ("passport") for the current repository.
#[derive(Parser, Debug)]
#[command(name = "git-passport", version, about)]
struct Cli {}

fn main() -> ExitCode {
    // Keep hook output clean unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let _cli = Cli::parse();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", style::error(&format!("{:#}", e)));
            eprintln!("{}", style::dim("~Quitting~"));
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let config_path = config_path()?;

    if !config_path.exists() {
        PassportConfig::write_default(&config_path).with_context(|| {
            format!("failed to write sample configuration to {}", config_path.display())
        })?;
        println!("{}", style::warn("No configuration file found."));
        println!("  Generated a sample configuration at {}", config_path.display());
        println!("  Edit it to add your passports, then commit again.");
        return Ok(ExitCode::FAILURE);
    }

    let config = PassportConfig::load_from_file(&config_path)
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;

    // The repository is only looked up once the hook is known to be enabled.
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let gateway = GitConfigGateway::new(cwd);

    let outcome = HookRunner::new(&config, &gateway)
        .run(TerminalPrompt::open, &mut ConsoleReporter)
        .context("hook run failed")?;

    debug!(state = ?outcome.state(), "hook run finished");
    report::print_outcome(&outcome);
    if let Outcome::AlreadyProvisioned { .. } = outcome {
        std::thread::sleep(config.settings.prompt_delay);
    }

    Ok(if outcome.is_success() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// `$GIT_PASSPORT_CONFIG`, or `~/.git_passport.toml`.
fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(expand_tilde(PathBuf::from(path)));
    }
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(CONFIG_FILE_NAME))
}

/// Expand a leading `~/` to the user's home directory.
fn expand_tilde(path: PathBuf) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_rejects_arguments() {
        assert!(Cli::try_parse_from(["git-passport"]).is_ok());
        assert!(Cli::try_parse_from(["git-passport", "extra"]).is_err());
        assert!(Cli::try_parse_from(["git-passport", "--config", "x"]).is_err());
    }

    #[test]
    fn test_expand_tilde() {
        let plain = PathBuf::from("/etc/git_passport.toml");
        assert_eq!(expand_tilde(plain.clone()), plain);

        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                expand_tilde(PathBuf::from("~/.git_passport.toml")),
                home.join(".git_passport.toml")
            );
        }
    }
}
