use std::io::{self, Write};

use serde_json::Value;

use crate::normalize::MESSAGE_KEY;
use crate::types::{BatchReport, NormalizedError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
	#[default]
	Json,
	Text,
}

pub fn eprint(s: &str) {
	let _ = writeln!(io::stderr(), "{}", s);
}

pub fn render_report(report: &BatchReport, format: ReportFormat) -> Result<String, serde_json::Error> {
	match format {
		ReportFormat::Json => serde_json::to_string_pretty(report),
		ReportFormat::Text => Ok(render_text(report)),
	}
}

fn render_text(report: &BatchReport) -> String {
	let mut lines = Vec::new();

	for result in report.results() {
		lines.push(result.file.to_string());
		for error in &result.errors {
			lines.push(format!("  {}", format_error(error)));
		}
	}

	lines.push(format!(
		"{} error(s) in {} file(s)",
		report.error_count(),
		report.len()
	));
	lines.join("\n")
}

/// One-line form of an error: the message first, then the other fields as
/// `key=value`.
pub fn format_error(error: &NormalizedError) -> String {
	let mut parts = Vec::new();

	if let Some(message) = error.message() {
		parts.push(message.to_string());
	}

	for (key, value) in error.iter() {
		if key == MESSAGE_KEY && value.is_string() {
			continue;
		}
		let value = match value {
			Value::String(s) => s.clone(),
			other => other.to_string(),
		};
		parts.push(format!("{}={}", key, value));
	}

	parts.join(" ")
}
