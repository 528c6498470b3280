//! Finding and reading `migration-grader.toml`.
//!
//! A [`ConfigFile`] is the raw TOML text together with where it came from.
//! The text is kept raw because two readers consume it: [`load_config`]
//! for the base settings and the declarative detector loader for
//! `[[prop-removal]]` style sections.

use std::fmt;
use std::path::{Path, PathBuf};

use migration_grader_core::{Config, Grader};
use tracing::{debug, info};

use crate::runner::{build_grader, load_config, RunError};

/// Project-level file names, most preferred first.
pub const PROJECT_FILE_NAMES: [&str; 2] = ["migration-grader.toml", ".migration-grader.toml"];

/// Overrides the per-user configuration directory.
pub const CONFIG_DIR_ENV: &str = "MIGRATION_GRADER_CONFIG_DIR";

/// Which search location supplied the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Named on the command line.
    Explicit,
    /// Found in the project directory.
    Project,
    /// Found in the per-user directory.
    User,
    /// Nothing found; built-in defaults apply.
    Builtin,
}

impl fmt::Display for ConfigOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "explicit",
            Self::Project => "project",
            Self::User => "user",
            Self::Builtin => "built-in defaults",
        })
    }
}

/// Locations searched for a configuration file.
#[derive(Debug, Clone, Default)]
pub struct SearchPaths {
    /// `--config` value. When set, nothing else is searched and the file
    /// must exist.
    pub explicit: Option<PathBuf>,
    /// Directory checked for [`PROJECT_FILE_NAMES`].
    pub project_dir: PathBuf,
    /// Directory checked for `config.toml`.
    pub user_dir: Option<PathBuf>,
}

impl SearchPaths {
    /// Search paths rooted at `project_dir`, with the user directory taken
    /// from `$MIGRATION_GRADER_CONFIG_DIR` or `~/.migration-grader`.
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>, explicit: Option<PathBuf>) -> Self {
        let user_dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(".migration-grader")));
        Self {
            explicit,
            project_dir: project_dir.into(),
            user_dir,
        }
    }

    /// Implicit candidates in priority order.
    fn implicit(&self) -> impl Iterator<Item = (ConfigOrigin, PathBuf)> + '_ {
        PROJECT_FILE_NAMES
            .into_iter()
            .map(|name| (ConfigOrigin::Project, self.project_dir.join(name)))
            .chain(
                self.user_dir
                    .iter()
                    .map(|dir| (ConfigOrigin::User, dir.join("config.toml"))),
            )
    }
}

/// Raw configuration text and its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Where the text came from.
    pub origin: ConfigOrigin,
    /// The file read, if any.
    pub path: Option<PathBuf>,
    /// TOML content; empty for built-in defaults.
    pub content: String,
}

impl ConfigFile {
    /// No file: every shipped detector with default weights.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            origin: ConfigOrigin::Builtin,
            path: None,
            content: String::new(),
        }
    }

    /// Reads `path`, recording `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Read`] if the file cannot be read.
    pub fn read(origin: ConfigOrigin, path: &Path) -> Result<Self, RunError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            origin,
            path: Some(path.to_path_buf()),
            content,
        })
    }

    /// Finds the first configuration in `search` and reads it.
    ///
    /// An explicit path wins and is read even if it does not exist, so a
    /// typo surfaces as an error. Otherwise the project names are tried,
    /// then the user directory, then built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Read`] if the chosen file cannot be read.
    pub fn discover(search: &SearchPaths) -> Result<Self, RunError> {
        if let Some(path) = &search.explicit {
            return Self::read(ConfigOrigin::Explicit, path);
        }

        let Some((origin, path)) = search.implicit().find(|(_, path)| path.is_file()) else {
            debug!("No configuration file found, using built-in defaults");
            return Ok(Self::builtin());
        };
        match origin {
            ConfigOrigin::User => info!("Using user config: {}", path.display()),
            _ => debug!("Using {} config: {}", origin, path.display()),
        }
        Self::read(origin, &path)
    }

    /// Parses the base settings.
    ///
    /// # Errors
    ///
    /// See [`load_config`].
    pub fn config(&self) -> Result<Config, RunError> {
        load_config(&self.content)
    }

    /// Builds a grader from this file.
    ///
    /// # Errors
    ///
    /// See [`build_grader`].
    pub fn grader(&self) -> Result<Grader, RunError> {
        build_grader(&self.content)
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} ({})", path.display(), self.origin),
            None => write!(f, "{}", self.origin),
        }
    }
}
