use thiserror::Error;

use crate::client::{DocumentValidator, FatalKind, ValidatorError};
use crate::pacing::{PacedSequencer, Pacer};
use crate::types::{BatchReport, DocumentRef, FileResult};

#[derive(Error, Debug)]
#[error("{file}: {source}")]
pub struct FatalBatchError {
	pub file: DocumentRef,
	#[source]
	pub source: ValidatorError,
}

impl FatalBatchError {
	pub fn kind(&self) -> FatalKind {
		self.source.kind()
	}
}

#[derive(Debug)]
pub enum Outcome {
	Clean,
	ValidationFailures(BatchReport),
	Fatal(FatalBatchError),
}

impl Outcome {
	pub fn exit_code(&self) -> u8 {
		match self {
			Outcome::Clean => 0,
			Outcome::ValidationFailures(_) => 1,
			Outcome::Fatal(_) => 2,
		}
	}

	pub fn is_clean(&self) -> bool {
		matches!(self, Outcome::Clean)
	}

	pub fn report(&self) -> Option<&BatchReport> {
		match self {
			Outcome::ValidationFailures(report) => Some(report),
			_ => None,
		}
	}
}

/// Validates a file set one document at a time and collects failing files.
pub struct BatchAggregator<V, P> {
	validator: V,
	sequencer: PacedSequencer<P>,
}

impl<V: DocumentValidator, P: Pacer> BatchAggregator<V, P> {
	pub fn new(validator: V, pacer: P) -> Self {
		Self {
			validator,
			sequencer: PacedSequencer::new(pacer),
		}
	}

	pub async fn aggregate(&self, files: &[DocumentRef]) -> Outcome {
		let validator = &self.validator;
		let results = self
			.sequencer
			.run(files, |file| async move {
				let result = validator.validate(&file).await;
				match result {
					Ok(errors) => Ok(FileResult { file, errors }),
					Err(source) => Err(FatalBatchError { file, source }),
				}
			})
			.await;

		let results = match results {
			Ok(results) => results,
			Err(fatal) => {
				tracing::error!(file = %fatal.file, kind = ?fatal.kind(), "batch aborted");
				return Outcome::Fatal(fatal);
			}
		};

		let mut report = BatchReport::new();
		for result in results {
			report.record(result);
		}

		tracing::info!(
			files = files.len(),
			failed = report.len(),
			errors = report.error_count(),
			"batch complete"
		);

		if report.is_empty() {
			Outcome::Clean
		} else {
			Outcome::ValidationFailures(report)
		}
	}
}
