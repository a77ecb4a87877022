use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

pub const LINK_VAR: &str = "SURFDRIVE_LINK";
pub const PASSWORD_VAR: &str = "SURFDRIVE_PASSWORD";

const OUTPUT_DIR: &str = "raw_data";
const OUTPUT_FILE: &str = "reddit_pol.csv";

/// Share location and credential, resolved once at startup.
#[derive(Clone)]
pub struct ShareConfig {
    pub link: String,
    pub password: String,
}

impl ShareConfig {
    pub fn new(link: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            password: password.into(),
        }
    }

    /// Resolves both values through `lookup`. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).filter(|value| !value.is_empty());

        match (required(LINK_VAR), required(PASSWORD_VAR)) {
            (Some(link), Some(password)) => Ok(Self { link, password }),
            _ => Err(ConfigError::Missing),
        }
    }
}

impl fmt::Debug for ShareConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShareConfig")
            .field("link", &self.link)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Directory holding this crate's `Cargo.toml`, fixed at compile time.
///
/// The path is the build machine's checkout. A binary copied elsewhere still
/// writes under that path, so run the tool from the checkout it was built in.
pub fn project_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn output_path(project_root: &Path) -> PathBuf {
    project_root.join(OUTPUT_DIR).join(OUTPUT_FILE)
}

/// Loads `.env` from the project root, then from the working directory.
/// Variables already set in the process win over both.
pub fn load_dotenv(project_root: &Path) {
    match dotenvy::from_path(project_root.join(".env")) {
        Ok(()) => log::info!("Loaded .env from {:?}", project_root),
        Err(e) if e.not_found() => {}
        Err(e) => log::warn!("Ignoring unreadable .env in {:?}: {}", project_root, e),
    }

    if let Ok(path) = dotenvy::dotenv() {
        log::info!("Loaded .env from {:?}", path);
    }
}
