//! File-based configuration source.

use std::path::{Path, PathBuf};

use super::placeholder::resolve_from_env;
use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// A configuration source that loads from a TOML file.
///
/// The location may contain `${VAR}` or `${VAR:default}` placeholders,
/// resolved against the environment when the file is loaded. There is no
/// escape for a literal `${`. Locations that are not valid UTF-8 are loaded
/// as given. Required files that don't exist cause an error; optional files
/// that don't exist are skipped.
///
/// Unless named explicitly, the source is called `file [<location>]` with
/// the location as registered, before placeholder resolution.
#[derive(Debug, Clone)]
pub struct FileSource {
    name: Option<String>,
    location: PathBuf,
    required: bool,
}

impl FileSource {
    pub fn new(location: impl AsRef<Path>, required: bool) -> Self {
        Self {
            name: None,
            location: location.as_ref().to_path_buf(),
            required,
        }
    }

    pub fn named(name: impl Into<String>, location: impl AsRef<Path>, required: bool) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new(location, required)
        }
    }

    fn resolved_path(&self) -> Result<PathBuf, ConfigError> {
        match self.location.to_str() {
            Some(location) => Ok(PathBuf::from(resolve_from_env(location)?)),
            None => Ok(self.location.clone()),
        }
    }
}

impl ConfigSource for FileSource {
    fn name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("file [{}]", self.location.display()),
        }
    }

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        let path = self.resolved_path()?;
        match load_config_file(&path, self.required)? {
            Some(table) => Ok(vec![ConfigEntry::root(table)]),
            None => {
                tracing::debug!(path = %path.display(), "skipping missing optional config file");
                Ok(vec![])
            }
        }
    }
}

/// Loads and parses a TOML config file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_config_file(path: &Path, required: bool) -> Result<Option<toml::Table>, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ConfigError::FileNotFound(path.to_path_buf()))
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
