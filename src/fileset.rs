use thiserror::Error;

use crate::types::DocumentRef;

#[derive(Error, Debug)]
pub enum FileSetError {
	#[error("invalid pattern '{pattern}': {source}")]
	Pattern {
		pattern: String,
		source: glob::PatternError,
	},
	#[error("cannot access {0}")]
	Access(#[from] glob::GlobError),
}

/// Expands a glob pattern into the documents to validate, in enumeration
/// order. Directories that match the pattern are skipped.
pub fn expand(pattern: &str) -> Result<Vec<DocumentRef>, FileSetError> {
	let paths = glob::glob(pattern).map_err(|source| FileSetError::Pattern {
		pattern: pattern.to_string(),
		source,
	})?;

	let mut docs = Vec::new();
	for entry in paths {
		let path = entry?;
		if path.is_dir() {
			continue;
		}
		docs.push(DocumentRef::new(path));
	}

	tracing::debug!(pattern, files = docs.len(), "expanded file set");
	Ok(docs)
}
