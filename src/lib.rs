pub mod batch;
pub mod client;
pub mod commands;
pub mod config;
pub mod fileset;
pub mod normalize;
pub mod output;
pub mod pacing;
pub mod sanitize;
pub mod types;

pub use batch::{BatchAggregator, FatalBatchError, Outcome};
pub use client::{
	decode_response, request_url, summarize_body, ClientInitError, DocumentValidator, FatalKind,
	RequestParams, ValidatorClient, ValidatorError, ValidatorOptions,
};
pub use commands::lint::{lint, LintArgs, LintError};
pub use config::{Config, ConfigError};
pub use fileset::{expand, FileSetError};
pub use normalize::{canonical_key, normalize, normalize_all, NormalizeError};
pub use output::{render_report, ReportFormat};
pub use pacing::{FixedDelay, NoDelay, PacedSequencer, Pacer};
pub use sanitize::sanitize;
pub use types::*;
