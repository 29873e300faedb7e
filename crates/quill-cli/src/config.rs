//! Discovery and loading of the analyzer configuration file.
//!
//! A file named on the command line always wins. Otherwise `quill/config.toml`
//! under the working directory is used, then `config.toml` in the platform
//! config directory. With none of them present the defaults apply.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use quill::{QuillError, config::AnalyzerConfig};

const LOCAL_CONFIG: &str = "quill/config.toml";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration in {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("configuration file not found: {}", .0.display())]
    MissingFile(PathBuf),
}

impl From<ConfigError> for QuillError {
    fn from(err: ConfigError) -> Self {
        let kind = match err {
            ConfigError::Parse { .. } => io::ErrorKind::InvalidData,
            ConfigError::MissingFile(_) => io::ErrorKind::NotFound,
        };
        QuillError::Io(io::Error::new(kind, err.to_string()))
    }
}

/// Where the configuration is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    Explicit(PathBuf),
    Local(PathBuf),
    System(PathBuf),
    Defaults,
}

impl ConfigSource {
    fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(path)
            | ConfigSource::Local(path)
            | ConfigSource::System(path) => Some(path),
            ConfigSource::Defaults => None,
        }
    }

    fn origin(&self) -> &'static str {
        match self {
            ConfigSource::Explicit(_) => "command line",
            ConfigSource::Local(_) => "working directory",
            ConfigSource::System(_) => "platform directory",
            ConfigSource::Defaults => "defaults",
        }
    }
}

fn locate(explicit: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.is_file() {
        return ConfigSource::Local(local);
    }

    match ProjectDirs::from("com", "quill", "quill") {
        Some(dirs) => {
            let system = dirs.config_dir().join(CONFIG_FILE);
            if system.is_file() {
                return ConfigSource::System(system);
            }
            debug!(path = system.display().to_string(); "No configuration in platform directory");
        }
        None => debug!("Platform config directory is unknown"),
    }
    ConfigSource::Defaults
}

/// Load the analyzer configuration.
///
/// # Errors
///
/// Fails when an explicitly named file is missing, or when the chosen file
/// cannot be read or is not a valid configuration.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AnalyzerConfig, QuillError> {
    let source = locate(explicit_path.as_ref().map(|path| path.as_ref()));
    let Some(path) = source.path() else {
        debug!("Using default configuration");
        return Ok(AnalyzerConfig::default());
    };
    info!(
        path = path.display().to_string(),
        origin = source.origin();
        "Loading configuration"
    );

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        Err(err) => return Err(err.into()),
    };

    toml::from_str(&content).map_err(|err| {
        ConfigError::Parse {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }
        .into()
    })
}
