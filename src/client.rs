//! Client for the remote structured-data validator.
//!
//! Each document is posted as `text/plain` to the configured endpoint with
//! the `apikey`, `lang`, `pretty` and `only_errors` query parameters. The
//! validator answers with JSON; the reported problems for JSON-LD markup live
//! under `data["json-ld"][0]["#error"]`.

use std::future::Future;
use std::path::PathBuf;

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::{Config, ConfigError};
use crate::normalize::{normalize_all, NormalizeError};
use crate::types::{DocumentRef, NormalizedError};

#[derive(Error, Debug)]
pub enum ValidatorError {
	#[error("failed to read {path}: {source}")]
	DocumentRead {
		path: PathBuf,
		source: std::io::Error,
	},
	#[error("HTTP error calling {endpoint}: {source}")]
	Transport {
		endpoint: String,
		source: reqwest::Error,
	},
	#[error("validator {endpoint} returned {status}: {body}")]
	Status {
		endpoint: String,
		status: u16,
		body: String,
	},
	#[error("unexpected response from {endpoint}: {source}")]
	MalformedResponse {
		endpoint: String,
		source: serde_json::Error,
	},
	#[error(transparent)]
	MalformedErrorShape(#[from] NormalizeError),
}

#[derive(Error, Debug)]
pub enum ClientInitError {
	#[error(transparent)]
	Config(#[from] ConfigError),
	#[error("failed to build HTTP client: {0}")]
	Http(#[source] reqwest::Error),
}

/// Broad class of a failure that stops a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalKind {
	DocumentRead,
	Transport,
	MalformedErrorShape,
}

impl ValidatorError {
	pub fn kind(&self) -> FatalKind {
		match self {
			ValidatorError::DocumentRead { .. } => FatalKind::DocumentRead,
			ValidatorError::Transport { .. }
			| ValidatorError::Status { .. }
			| ValidatorError::MalformedResponse { .. } => FatalKind::Transport,
			ValidatorError::MalformedErrorShape(_) => FatalKind::MalformedErrorShape,
		}
	}
}

/// Per-run overrides of the request parameters. Unset fields fall back to
/// the configuration (`api_key`, `language`) or to `true` (`pretty`,
/// `only_errors`).
#[derive(Debug, Clone, Default)]
pub struct ValidatorOptions {
	pub api_key: Option<String>,
	pub language: Option<String>,
	pub pretty: Option<bool>,
	pub only_errors: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
	pub api_key: String,
	pub language: String,
	pub pretty: bool,
	pub only_errors: bool,
}

impl ValidatorOptions {
	pub fn resolve(&self, config: &Config) -> RequestParams {
		RequestParams {
			api_key: self
				.api_key
				.clone()
				.or_else(|| config.api_key.clone())
				.unwrap_or_default(),
			language: self.language.clone().unwrap_or_else(|| config.language.clone()),
			pretty: self.pretty.unwrap_or(true),
			only_errors: self.only_errors.unwrap_or(true),
		}
	}
}

pub fn request_url(endpoint: &Url, params: &RequestParams) -> Url {
	let mut url = endpoint.clone();
	url.query_pairs_mut()
		.append_pair("apikey", &params.api_key)
		.append_pair("lang", &params.language)
		.append_pair("pretty", bool_param(params.pretty))
		.append_pair("only_errors", bool_param(params.only_errors));
	url
}

fn bool_param(value: bool) -> &'static str {
	if value {
		"true"
	} else {
		"false"
	}
}

const MAX_BODY_CHARS: usize = 200;

/// Collapses an error response body onto one line and caps its length.
pub fn summarize_body(body: &str) -> String {
	let collapsed = body.split_whitespace().collect::<Vec<_>>().join(" ");
	if collapsed.chars().count() <= MAX_BODY_CHARS {
		return collapsed;
	}
	let mut short: String = collapsed.chars().take(MAX_BODY_CHARS).collect();
	short.push_str("...");
	short
}

// -- Response schema ----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ParserResponse {
	#[serde(default)]
	data: Option<ParserData>,
}

#[derive(Debug, Deserialize)]
struct ParserData {
	#[serde(rename = "json-ld", default)]
	json_ld: Option<Vec<JsonLdNode>>,
}

#[derive(Debug, Deserialize)]
struct JsonLdNode {
	#[serde(rename = "#error", default)]
	errors: Option<Vec<Value>>,
}

impl ParserResponse {
	fn into_raw_errors(self) -> Vec<Value> {
		self.data
			.and_then(|data| data.json_ld)
			.and_then(|nodes| nodes.into_iter().next())
			.and_then(|node| node.errors)
			.unwrap_or_default()
	}
}

/// Decodes a validator response body into normalized errors.
///
/// A missing `data`, `json-ld` or `#error` field means the document has no
/// reported problems.
pub fn decode_response(endpoint: &str, body: &str) -> Result<Vec<NormalizedError>, ValidatorError> {
	let response: ParserResponse =
		serde_json::from_str(body).map_err(|source| ValidatorError::MalformedResponse {
			endpoint: endpoint.to_string(),
			source,
		})?;
	Ok(normalize_all(&response.into_raw_errors())?)
}

// -- Client -------------------------------------------------------------------

/// Something that can validate one document and report its problems.
pub trait DocumentValidator {
	fn validate(
		&self,
		doc: &DocumentRef,
	) -> impl Future<Output = Result<Vec<NormalizedError>, ValidatorError>>;
}

#[derive(Debug, Clone)]
pub struct ValidatorClient {
	http: reqwest::Client,
	endpoint: String,
	url: Url,
}

impl ValidatorClient {
	pub fn new(config: &Config, options: &ValidatorOptions) -> Result<Self, ClientInitError> {
		let endpoint = config.endpoint_url()?;
		let params = options.resolve(config);
		if params.api_key.is_empty() {
			tracing::warn!(
				"no API key configured (set {}); the validator will likely reject requests",
				crate::config::API_KEY_VAR
			);
		}

		let http = reqwest::Client::builder()
			.timeout(config.timeout())
			.build()
			.map_err(ClientInitError::Http)?;

		Ok(Self {
			http,
			endpoint: config.endpoint.clone(),
			url: request_url(&endpoint, &params),
		})
	}

	pub async fn submit(&self, doc: &DocumentRef) -> Result<Vec<NormalizedError>, ValidatorError> {
		let body = tokio::fs::read_to_string(doc.path())
			.await
			.map_err(|source| ValidatorError::DocumentRead {
				path: doc.path().to_path_buf(),
				source,
			})?;

		tracing::debug!(file = %doc, bytes = body.len(), "submitting document");

		let resp = self
			.http
			.post(self.url.clone())
			.header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
			.body(body)
			.send()
			.await
			.map_err(|source| ValidatorError::Transport {
				endpoint: self.endpoint.clone(),
				source: source.without_url(),
			})?;

		if !resp.status().is_success() {
			let status = resp.status().as_u16();
			let body = resp.text().await.unwrap_or_default();
			return Err(ValidatorError::Status {
				endpoint: self.endpoint.clone(),
				status,
				body: summarize_body(&body),
			});
		}

		let text = resp.text().await.map_err(|source| ValidatorError::Transport {
			endpoint: self.endpoint.clone(),
			source: source.without_url(),
		})?;

		let errors = decode_response(&self.endpoint, &text)?;
		tracing::debug!(file = %doc, errors = errors.len(), "validator responded");
		Ok(errors)
	}
}

impl DocumentValidator for ValidatorClient {
	async fn validate(&self, doc: &DocumentRef) -> Result<Vec<NormalizedError>, ValidatorError> {
		self.submit(doc).await
	}
}
