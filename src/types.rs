use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DocumentRef(PathBuf);

impl DocumentRef {
	pub fn new<P: Into<PathBuf>>(path: P) -> Self {
		Self(path.into())
	}

	pub fn path(&self) -> &Path {
		&self.0
	}
}

impl fmt::Display for DocumentRef {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.display())
	}
}

impl AsRef<Path> for DocumentRef {
	fn as_ref(&self) -> &Path {
		&self.0
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedError(Map<String, Value>);

impl NormalizedError {
	pub fn new() -> Self {
		Self(Map::new())
	}

	pub fn insert(&mut self, key: String, value: Value) {
		self.0.insert(key, value);
	}

	pub fn get(&self, key: &str) -> Option<&Value> {
		self.0.get(key)
	}

	pub fn message(&self) -> Option<&str> {
		self.0.get(crate::normalize::MESSAGE_KEY).and_then(Value::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
		self.0.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.0.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<Map<String, Value>> for NormalizedError {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
	pub file: DocumentRef,
	pub errors: Vec<NormalizedError>,
}

impl FileResult {
	pub fn passed(&self) -> bool {
		self.errors.is_empty()
	}
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BatchReport(Vec<FileResult>);

impl BatchReport {
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn record(&mut self, result: FileResult) -> bool {
		if result.passed() {
			return false;
		}
		self.0.push(result);
		true
	}

	pub fn results(&self) -> &[FileResult] {
		&self.0
	}

	pub fn error_count(&self) -> usize {
		self.0.iter().map(|r| r.errors.len()).sum()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
