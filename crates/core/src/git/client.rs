//! Git configuration access via `git2`.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use git2::{Config, ConfigLevel, ErrorCode, Repository};
use tracing::{debug, info, instrument};

use super::gateway::{IdentityGateway, Property, Scope};
use crate::errors::GatewayError;

const REMOTE_URL_KEY: &str = "remote.origin.url";

/// [`IdentityGateway`] backed by the repository's git configuration files.
///
/// The global scope is what `git config --global` reads: the XDG file
/// (`$XDG_CONFIG_HOME/git/config`) overlaid by `~/.gitconfig`.
pub struct GitConfigGateway {
    start: PathBuf,
    repo: OnceCell<Repository>,
    global_files: Option<Vec<(ConfigLevel, PathBuf)>>,
}

impl GitConfigGateway {
    /// Gateway for the repository containing `path`, found on first use.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { start: path.into(), repo: OnceCell::new(), global_files: None }
    }

    /// Find the repository containing `path` (usually the working directory).
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Self, GatewayError> {
        let gateway = Self::new(path.as_ref());
        gateway.repo()?;
        Ok(gateway)
    }

    /// Read `~/.gitconfig` from `path` instead.
    pub fn with_global_config<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with_global_file(ConfigLevel::Global, path.into())
    }

    /// Read the XDG git config from `path` instead.
    pub fn with_xdg_config<P: Into<PathBuf>>(self, path: P) -> Self {
        self.with_global_file(ConfigLevel::XDG, path.into())
    }

    fn with_global_file(mut self, level: ConfigLevel, path: PathBuf) -> Self {
        self.global_files.get_or_insert_with(Vec::new).push((level, path));
        self
    }

    /// Path of the repository's `.git` directory.
    pub fn repo_path(&self) -> Result<&Path, GatewayError> {
        Ok(self.repo()?.path())
    }

    fn repo(&self) -> Result<&Repository, GatewayError> {
        if let Some(repo) = self.repo.get() {
            return Ok(repo);
        }
        let repo = Repository::discover(&self.start)
            .map_err(|_| GatewayError::RepositoryNotFound(self.start.display().to_string()))?;
        info!(path = %repo.path().display(), "opened git repository");
        Ok(self.repo.get_or_init(|| repo))
    }

    fn local_config(&self) -> Result<Config, GatewayError> {
        Ok(self.repo()?.config()?.open_level(ConfigLevel::Local)?)
    }

    fn global_config(&self) -> Result<Config, GatewayError> {
        let mut config = Config::new()?;
        for (level, path) in self.global_files() {
            if path.is_file() {
                config.add_file(&path, level, false)?;
            }
        }
        Ok(config)
    }

    /// Files making up the global scope, lowest priority first.
    fn global_files(&self) -> Vec<(ConfigLevel, PathBuf)> {
        if let Some(files) = &self.global_files {
            return files.clone();
        }
        [(ConfigLevel::XDG, Config::find_xdg()), (ConfigLevel::Global, Config::find_global())]
            .into_iter()
            .filter_map(|(level, path)| path.ok().map(|path| (level, path)))
            .collect()
    }

    fn config_for(&self, scope: Scope) -> Result<Config, GatewayError> {
        match scope {
            Scope::Global => self.global_config(),
            Scope::Local => self.local_config(),
        }
    }
}

impl IdentityGateway for GitConfigGateway {
    #[instrument(skip(self))]
    fn identity(&self, scope: Scope, property: Property) -> Result<String, GatewayError> {
        let value = read_string(self.config_for(scope), property.key())?;
        debug!(set = !value.is_empty(), "read identity property");
        Ok(value)
    }

    #[instrument(skip(self))]
    fn remote_url(&self) -> Result<String, GatewayError> {
        let url = read_string(self.local_config(), REMOTE_URL_KEY)?;
        debug!(%url, "read remote url");
        Ok(url)
    }

    #[instrument(skip(self, value))]
    fn set_identity(&self, property: Property, value: &str) -> Result<(), GatewayError> {
        let mut config = self.local_config()?;
        config
            .set_str(property.key(), value)
            .map_err(|source| GatewayError::PersistFailed {
                property: property.to_string(),
                source,
            })?;
        info!(key = property.key(), "set local identity property");
        Ok(())
    }
}

/// Read `key`, mapping a missing config file or missing key to `""`.
fn read_string(config: Result<Config, GatewayError>, key: &str) -> Result<String, GatewayError> {
    let config = match config {
        Ok(config) => config,
        Err(GatewayError::Git2Error(e)) if e.code() == ErrorCode::NotFound => {
            return Ok(String::new())
        }
        Err(e) => return Err(e),
    };
    match config.get_string(key) {
        Ok(value) => Ok(value),
        Err(e) if e.code() == ErrorCode::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}
