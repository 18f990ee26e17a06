use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use schema_lint::commands::lint::{self, LintArgs};
use schema_lint::output::ReportFormat;

#[derive(Parser)]
#[command(name = "schema-lint")]
#[command(about = "Validate structured-data documents against a remote schema validator")]
#[command(version)]
struct Cli {
	/// Glob pattern selecting the documents to validate
	pattern: String,

	#[arg(long, value_name = "LANG")]
	lang: Option<String>,

	#[arg(long, value_name = "KEY", help = "Validator API key (overrides YANDEX_API_KEY)")]
	api_key: Option<String>,

	#[arg(long, value_name = "URL")]
	endpoint: Option<String>,

	#[arg(long, value_name = "MS", help = "Pause between submissions")]
	delay_ms: Option<u64>,

	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	#[arg(long, help = "Ask the validator for pretty-printed output")]
	pretty: bool,

	#[arg(long, help = "Request the full validator output, not only errors")]
	all_errors: bool,

	#[arg(long, value_enum, default_value_t = ReportFormat::Json)]
	format: ReportFormat,

	/// Increase log verbosity (-v, -vv, -vvv)
	#[arg(short, long, action = clap::ArgAction::Count)]
	verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
	let cli = Cli::parse();

	let filter = match cli.verbose {
		0 => EnvFilter::new("warn"),
		1 => EnvFilter::new("info"),
		2 => EnvFilter::new("debug"),
		_ => EnvFilter::new("trace"),
	};
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_target(false)
		.with_writer(std::io::stderr)
		.init();

	let args = LintArgs {
		pattern: cli.pattern,
		config: cli.config,
		api_key: cli.api_key,
		language: cli.lang,
		endpoint: cli.endpoint,
		delay_ms: cli.delay_ms,
		pretty: cli.pretty,
		all_errors: cli.all_errors,
		format: cli.format,
	};

	ExitCode::from(lint::run(&args).await)
}
