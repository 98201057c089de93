//! TOML-based passport configuration.
//!
//! The file holds a `General` table with the hook settings and any number of
//! passport tables (every table whose name contains `Passport`). Passport ids
//! follow the order of the tables in the file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::models::Passport;

const GENERAL_SECTION: &str = "General";
const PASSPORT_PATTERN: &str = "Passport";

const GENERAL_KEYS: &[&str] = &["enable_hook", "sleep_duration"];
const PASSPORT_KEYS: &[&str] = &["email", "name", "service"];

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Hook behaviour settings from the `General` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// When false the hook exits immediately.
    pub enabled: bool,

    /// How long to keep the active identity on screen before exiting.
    pub prompt_delay: Duration,
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Validated settings plus the ordered passport list.
///
/// Built once at startup and passed by reference to the resolver and the
/// selector.
#[derive(Debug, Clone, PartialEq)]
pub struct PassportConfig {
    pub settings: Settings,
    pub passports: Vec<Passport>,
}

#[derive(Debug, Deserialize)]
struct PassportSection {
    email: String,
    name: String,
    service: String,
}

impl PassportConfig {
    /// Load and validate a [`PassportConfig`] from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading passport configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;

        debug!(passports = config.passports.len(), "passport configuration parsed");
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = contents
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;

        let mut settings = None;
        let mut passports = Vec::new();

        for (section, value) in table {
            let toml::Value::Table(body) = value else {
                return Err(ConfigError::UnknownSection(section));
            };

            if section == GENERAL_SECTION {
                settings = Some(parse_general(&body)?);
            } else if section.contains(PASSPORT_PATTERN) {
                let id = passports.len();
                passports.push(parse_passport(id, &section, body)?);
            } else {
                return Err(ConfigError::UnknownSection(section));
            }
        }

        let settings =
            settings.ok_or_else(|| ConfigError::MissingSection(GENERAL_SECTION.into()))?;

        Ok(Self { settings, passports })
    }

    /// Write the sample configuration to `path`. Refuses to overwrite.
    pub fn write_default<P: AsRef<Path>>(path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
        file.write_all(Self::default_template().as_bytes())?;
        info!(path = %path.display(), "wrote sample passport configuration");
        Ok(())
    }

    /// The sample configuration written on first run.
    pub fn default_template() -> &'static str {
        r#"# git-passport configuration
#
# Every table whose name contains "Passport" is one identity. Passport IDs
# follow the order of the tables in this file, starting at 0.

[General]
enable_hook = true
sleep_duration = 1.5

["Passport 0"]
email = "email_0@example.com"
name = "name_0"
service = "github.com"

["Passport 1"]
email = "email_1@example.com"
name = "name_1"
service = "gitlab.com"
"#
    }
}

// ---------------------------------------------------------------------------
// Section parsing
// ---------------------------------------------------------------------------

fn check_keys(section: &str, body: &toml::Table, allowed: &[&str]) -> Result<(), ConfigError> {
    if let Some(key) = body.keys().find(|k| !allowed.contains(&k.as_str())) {
        return Err(ConfigError::UnknownKey {
            section: section.into(),
            key: key.clone(),
        });
    }
    if let Some(key) = allowed.iter().find(|k| !body.contains_key(**k)) {
        return Err(ConfigError::MissingKey {
            section: section.into(),
            key: (*key).into(),
        });
    }
    Ok(())
}

fn parse_general(body: &toml::Table) -> Result<Settings, ConfigError> {
    check_keys(GENERAL_SECTION, body, GENERAL_KEYS)?;

    let enabled = match &body["enable_hook"] {
        toml::Value::Boolean(b) => *b,
        toml::Value::String(s) if s == "True" => true,
        toml::Value::String(s) if s == "False" => false,
        _ => {
            return Err(ConfigError::InvalidValue {
                field: "General.enable_hook".into(),
                detail: "expecting true or false".into(),
            })
        }
    };

    // `try_from_secs_f64` rejects negative, non-finite and out of range values.
    let prompt_delay = match &body["sleep_duration"] {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    .ok_or_else(|| ConfigError::InvalidValue {
        field: "General.sleep_duration".into(),
        detail: "expecting a non-negative number of seconds".into(),
    })?;

    Ok(Settings { enabled, prompt_delay })
}

fn parse_passport(id: usize, section: &str, body: toml::Table) -> Result<Passport, ConfigError> {
    check_keys(section, &body, PASSPORT_KEYS)?;

    let parsed: PassportSection =
        toml::Value::Table(body)
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidValue {
                field: section.into(),
                detail: e.to_string(),
            })?;

    Ok(Passport {
        id,
        name: parsed.name,
        email: parsed.email,
        service: parsed.service,
    })
}
