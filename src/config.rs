use std::path::Path;

use crate::error::Error;

/// File name of the project configuration at the source root.
pub const CONFIG_FILE_NAME: &str = ".srcref.toml";

/// Project configuration loaded from `.srcref.toml`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Marker file that makes a directory a package root.
    pub build_file_name: String,
    /// Directory names pruned from the package walk.
    pub ignore: Vec<String>,
    /// Treat the source root as a package even without a marker file.
    pub root_is_package: bool,
}

/// Raw TOML structure for `.srcref.toml`. Absent keys take the defaults.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct SrcrefTomlConfig {
    /// Overrides `Config::build_file_name`.
    build_file_name: Option<String>,
    /// Overrides `Config::ignore`.
    ignore: Option<Vec<String>>,
    /// Overrides `Config::root_is_package`.
    root_is_package: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            build_file_name: "BUCK".to_string(),
            ignore: vec![".git".to_string(), ".hg".to_string(), "buck-out".to_string()],
            root_is_package: true,
        };
    }
}

impl Config {
    /// Load config from `.srcref.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; a config the
    /// user wrote is never silently replaced by defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        return Self::parse(&content);
    }

    /// Parse config from TOML content, filling in defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: SrcrefTomlConfig = toml::from_str(content)?;
        let defaults = Self::default();
        return Ok(Self {
            build_file_name: raw.build_file_name.unwrap_or(defaults.build_file_name),
            ignore: raw.ignore.unwrap_or(defaults.ignore),
            root_is_package: raw.root_is_package.unwrap_or(defaults.root_is_package),
        });
    }

    /// Whether a directory with this file name is pruned from the walk.
    pub fn is_ignored(&self, dir_name: &str) -> bool {
        return self.ignore.iter().any(|name| name == dir_name);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "tests")]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.build_file_name, "BUCK");
        assert!(config.root_is_package);
        assert!(config.is_ignored(".git"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = Config::parse("build_file_name = \"BUILD\"\n").unwrap();
        assert_eq!(config.build_file_name, "BUILD");
        assert!(config.is_ignored("buck-out"));
        assert!(config.root_is_package);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "build_file_name = [").unwrap();
        assert!(matches!(Config::load(dir.path()), Err(Error::TomlDe(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(Config::parse("marker = \"BUCK\"\n"), Err(Error::TomlDe(_))));
    }
}
