use std::path::PathBuf;

use thiserror::Error;

use crate::batch::{BatchAggregator, Outcome};
use crate::client::{ClientInitError, ValidatorClient, ValidatorOptions};
use crate::config::{Config, ConfigError};
use crate::fileset::{expand, FileSetError};
use crate::output::{eprint, render_report, ReportFormat};
use crate::pacing::Pacer;

/// Exit code for failures outside the batch loop.
pub const EXIT_UNEXPECTED: u8 = 3;

/// Errors raised before any document is submitted.
#[derive(Error, Debug)]
pub enum LintError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error(transparent)]
	FileSet(#[from] FileSetError),
	#[error("failed to set up validator client: {0}")]
	Client(#[source] reqwest::Error),
}

impl From<ClientInitError> for LintError {
	fn from(err: ClientInitError) -> Self {
		match err {
			ClientInitError::Config(e) => LintError::Config(e),
			ClientInitError::Http(e) => LintError::Client(e),
		}
	}
}

#[derive(Debug, Clone, Default)]
pub struct LintArgs {
	pub pattern: String,
	pub config: Option<PathBuf>,
	pub api_key: Option<String>,
	pub language: Option<String>,
	pub endpoint: Option<String>,
	pub delay_ms: Option<u64>,
	pub pretty: bool,
	pub all_errors: bool,
	pub format: ReportFormat,
}

impl LintArgs {
	/// Folds the command-line overrides into a loaded configuration.
	pub fn apply(&self, mut config: Config) -> Config {
		if let Some(endpoint) = &self.endpoint {
			config.endpoint = endpoint.clone();
		}
		if let Some(delay_ms) = self.delay_ms {
			config.delay_ms = delay_ms;
		}
		config
	}

	pub fn options(&self) -> ValidatorOptions {
		ValidatorOptions {
			api_key: self.api_key.clone(),
			language: self.language.clone(),
			pretty: Some(self.pretty),
			only_errors: Some(!self.all_errors),
		}
	}
}

/// Expands `pattern` and validates every matching document.
pub async fn lint<P: Pacer>(
	pattern: &str,
	config: &Config,
	options: &ValidatorOptions,
	pacer: P,
) -> Result<Outcome, LintError> {
	let files = expand(pattern)?;
	let client = ValidatorClient::new(config, options)?;
	let aggregator = BatchAggregator::new(client, pacer);
	Ok(aggregator.aggregate(&files).await)
}

/// Runs a lint and reports the outcome, returning the process exit code.
pub async fn run(args: &LintArgs) -> u8 {
	let config = match Config::load(args.config.as_deref()) {
		Ok(c) => args.apply(c),
		Err(e) => {
			eprint(&format!("Error: {}", e));
			return EXIT_UNEXPECTED;
		}
	};
	tracing::debug!(?config, "loaded configuration");

	let pacer = crate::pacing::FixedDelay(config.delay());
	let outcome = match lint(&args.pattern, &config, &args.options(), pacer).await {
		Ok(outcome) => outcome,
		Err(e) => {
			eprint(&format!("Error: {}", e));
			return EXIT_UNEXPECTED;
		}
	};

	report(&outcome, args.format)
}

fn report(outcome: &Outcome, format: ReportFormat) -> u8 {
	match outcome {
		Outcome::Clean => {}
		Outcome::ValidationFailures(report) => match render_report(report, format) {
			Ok(rendered) => eprint(&rendered),
			Err(e) => {
				eprint(&format!("Error: failed to render report: {}", e));
				return EXIT_UNEXPECTED;
			}
		},
		Outcome::Fatal(fatal) => eprint(&format!("Error: {}", fatal)),
	}
	outcome.exit_code()
}
