use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "https://validator-api.semweb.yandex.ru/v1.1/document_parser";
pub const API_KEY_VAR: &str = "YANDEX_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Read {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("failed to parse config {path}: {source}")]
	Parse {
		path: PathBuf,
		source: toml::de::Error,
	},
	#[error("invalid endpoint URL '{0}': {1}")]
	InvalidEndpoint(String, url::ParseError),
	#[error("failed to load {path}: {source}")]
	Dotenv {
		path: PathBuf,
		source: dotenvy::Error,
	},
	#[error("invalid value for {var}: '{value}'")]
	InvalidVar { var: String, value: String },
}

/// Run settings, built once at startup and handed to the components that need them.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
	pub api_key: Option<String>,
	pub language: String,
	pub endpoint: String,
	pub delay_ms: u64,
	pub timeout_secs: u64,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			api_key: None,
			language: "en".into(),
			endpoint: DEFAULT_ENDPOINT.into(),
			delay_ms: 500,
			timeout_secs: 30,
		}
	}
}

impl fmt::Debug for Config {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Config")
			.field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
			.field("language", &self.language)
			.field("endpoint", &self.endpoint)
			.field("delay_ms", &self.delay_ms)
			.field("timeout_secs", &self.timeout_secs)
			.finish()
	}
}

impl Config {
	/// Loads the config file, then applies environment overrides. Variables
	/// set in the process environment win over those in `./.env`.
	///
	/// An explicit `path` must exist. Without one, the per-user config file is
	/// used when present and defaults otherwise.
	pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let config = match path {
			Some(p) => Self::from_file(p)?,
			None => {
				let default_path = config_path();
				if default_path.exists() {
					Self::from_file(&default_path)?
				} else {
					Self::default()
				}
			}
		};
		let dotenv = read_dotenv(Path::new(".env"))?;
		config.with_env_from(|var| std::env::var(var).ok().or_else(|| dotenv.get(var).cloned()))
	}

	pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
		let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
			path: path.to_path_buf(),
			source,
		})?;
		toml::from_str(&content).map_err(|source| ConfigError::Parse {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Applies environment overrides using `lookup` to read variables.
	pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		if let Some(key) = lookup(API_KEY_VAR).filter(|k| !k.is_empty()) {
			self.api_key = Some(key);
		}
		if let Some(lang) = lookup("SCHEMA_LINT_LANG").filter(|l| !l.is_empty()) {
			self.language = lang;
		}
		if let Some(endpoint) = lookup("SCHEMA_LINT_ENDPOINT").filter(|e| !e.is_empty()) {
			self.endpoint = endpoint;
		}
		if let Some(delay) = lookup("SCHEMA_LINT_DELAY_MS") {
			self.delay_ms = parse_var("SCHEMA_LINT_DELAY_MS", &delay)?;
		}
		if let Some(timeout) = lookup("SCHEMA_LINT_TIMEOUT_SECS") {
			self.timeout_secs = parse_var("SCHEMA_LINT_TIMEOUT_SECS", &timeout)?;
		}
		Ok(self)
	}

	pub fn endpoint_url(&self) -> Result<Url, ConfigError> {
		Url::parse(&self.endpoint)
			.map_err(|e| ConfigError::InvalidEndpoint(self.endpoint.clone(), e))
	}

	pub fn delay(&self) -> Duration {
		Duration::from_millis(self.delay_ms)
	}

	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

fn parse_var(var: &str, value: &str) -> Result<u64, ConfigError> {
	value.trim().parse().map_err(|_| ConfigError::InvalidVar {
		var: var.to_string(),
		value: value.to_string(),
	})
}

/// Reads `KEY=value` pairs from a dotenv file without touching the process
/// environment. A missing file yields no variables.
pub fn read_dotenv(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
	let to_error = |source| ConfigError::Dotenv {
		path: path.to_path_buf(),
		source,
	};

	let iter = match dotenvy::from_path_iter(path) {
		Ok(iter) => iter,
		Err(e) if e.not_found() => return Ok(HashMap::new()),
		Err(e) => return Err(to_error(e)),
	};

	iter.collect::<Result<HashMap<_, _>, _>>().map_err(to_error)
}

fn config_path() -> PathBuf {
	if let Some(config_dir) = dirs::config_dir() {
		config_dir.join("schema-lint").join("config.toml")
	} else {
		PathBuf::from(".schema-lint.toml")
	}
}
