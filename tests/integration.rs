//! Integration tests for schema-lint
//!
//! These tests write sample documents into temporary directories and run the
//! full pipeline (glob expansion, submission, aggregation) against a mock
//! validator.

use std::fs;
use std::path::Path;

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use schema_lint::{
	lint, BatchAggregator, Config, DocumentRef, FatalKind, NoDelay, Outcome, ValidatorClient,
	ValidatorOptions,
};

const PARSER_PATH: &str = "/v1.1/document_parser";

fn config_for(server: &MockServer) -> Config {
	Config {
		api_key: Some("test-key".into()),
		endpoint: format!("{}{}", server.uri(), PARSER_PATH),
		delay_ms: 0,
		timeout_secs: 5,
		..Config::default()
	}
}

fn write_doc(root: &Path, name: &str, body: &str) {
	fs::write(root.join(name), body).unwrap();
}

fn pattern(tmp: &TempDir) -> String {
	format!("{}/*.jsonld", tmp.path().display())
}

fn clean_response() -> ResponseTemplate {
	ResponseTemplate::new(200).set_body_json(json!({
		"id": "doc",
		"data": { "json-ld": [{ "@context": "http://schema.org/" }] }
	}))
}

fn error_response(message: &str, path: &str) -> ResponseTemplate {
	ResponseTemplate::new(200).set_body_json(json!({
		"data": {
			"json-ld": [{
				"#error": [{ "#message": message, "#path": path, "#type": "invalid" }]
			}]
		}
	}))
}

// ============================================================================
// Clean runs
// ============================================================================

#[tokio::test]
async fn test_clean_corpus_is_repeatably_clean() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path(PARSER_PATH))
		.respond_with(clean_response())
		.expect(4)
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", r#"{"@type": "Thing"}"#);
	write_doc(tmp.path(), "b.jsonld", r#"{"@type": "Person"}"#);

	let config = config_for(&server);
	for _ in 0..2 {
		let outcome = lint(&pattern(&tmp), &config, &ValidatorOptions::default(), NoDelay)
			.await
			.unwrap();
		assert!(outcome.is_clean());
		assert_eq!(outcome.exit_code(), 0);
	}
}

#[tokio::test]
async fn test_empty_file_set_makes_no_requests() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(clean_response())
		.expect(0)
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	let outcome = lint(&pattern(&tmp), &config_for(&server), &ValidatorOptions::default(), NoDelay)
		.await
		.unwrap();
	assert!(outcome.is_clean());
}

#[tokio::test]
async fn test_response_without_data_is_clean() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", "{}");

	let outcome = lint(&pattern(&tmp), &config_for(&server), &ValidatorOptions::default(), NoDelay)
		.await
		.unwrap();
	assert!(outcome.is_clean());
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_request_carries_document_and_parameters() {
	let server = MockServer::start().await;
	let document = r#"{"@context": "http://schema.org", "@type": "Organization"}"#;

	Mock::given(method("POST"))
		.and(path(PARSER_PATH))
		.and(query_param("apikey", "test-key"))
		.and(query_param("lang", "ru"))
		.and(query_param("pretty", "false"))
		.and(query_param("only_errors", "true"))
		.and(header("content-type", "text/plain"))
		.and(body_string(document))
		.respond_with(clean_response())
		.expect(1)
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "org.jsonld", document);

	let options = ValidatorOptions {
		language: Some("ru".into()),
		pretty: Some(false),
		..ValidatorOptions::default()
	};
	let outcome = lint(&pattern(&tmp), &config_for(&server), &options, NoDelay)
		.await
		.unwrap();
	assert!(outcome.is_clean());
}

// ============================================================================
// Validation failures
// ============================================================================

#[tokio::test]
async fn test_failures_reported_in_file_order() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(body_string_contains("\"A\""))
		.respond_with(error_response("<b>name</b> is required", "/name"))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(body_string_contains("\"OK\""))
		.respond_with(clean_response())
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(body_string_contains("\"B\""))
		.respond_with(error_response("bad url", "/url"))
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", r#"{"name": "A"}"#);
	write_doc(tmp.path(), "b.jsonld", r#"{"name": "B"}"#);
	write_doc(tmp.path(), "c.jsonld", r#"{"name": "OK"}"#);

	let outcome = lint(&pattern(&tmp), &config_for(&server), &ValidatorOptions::default(), NoDelay)
		.await
		.unwrap();
	assert_eq!(outcome.exit_code(), 1);

	let report = outcome.report().unwrap();
	assert_eq!(report.len(), 2);
	assert_eq!(report.results()[0].file, DocumentRef::new(tmp.path().join("a.jsonld")));
	assert_eq!(report.results()[1].file, DocumentRef::new(tmp.path().join("b.jsonld")));

	let first = serde_json::to_value(&report.results()[0].errors[0]).unwrap();
	assert_eq!(
		first,
		json!({ "message": "name is required", "path": "/name", "type": "invalid" })
	);
	assert_eq!(report.results()[1].errors[0].message(), Some("bad url"));
}

// ============================================================================
// Fatal errors
// ============================================================================

#[tokio::test]
async fn test_unreadable_file_halts_batch() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(error_response("bad", "/x"))
		.expect(1)
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", "{}");
	write_doc(tmp.path(), "c.jsonld", "{}");

	let files = vec![
		DocumentRef::new(tmp.path().join("a.jsonld")),
		DocumentRef::new(tmp.path().join("b.jsonld")),
		DocumentRef::new(tmp.path().join("c.jsonld")),
	];
	let client = ValidatorClient::new(&config_for(&server), &ValidatorOptions::default()).unwrap();
	let outcome = BatchAggregator::new(client, NoDelay).aggregate(&files).await;

	assert_eq!(outcome.exit_code(), 2);
	match outcome {
		Outcome::Fatal(fatal) => {
			assert_eq!(fatal.file, files[1]);
			assert_eq!(fatal.kind(), FatalKind::DocumentRead);
		}
		other => panic!("expected fatal outcome, got {:?}", other),
	}
}

#[tokio::test]
async fn test_rejected_request_halts_batch() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(403).set_body_string("invalid apikey"))
		.expect(1)
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", "{}");
	write_doc(tmp.path(), "b.jsonld", "{}");

	let outcome = lint(&pattern(&tmp), &config_for(&server), &ValidatorOptions::default(), NoDelay)
		.await
		.unwrap();

	match outcome {
		Outcome::Fatal(fatal) => {
			assert_eq!(fatal.kind(), FatalKind::Transport);
			assert!(fatal.to_string().contains("403"));
			assert!(fatal.to_string().contains("invalid apikey"));
		}
		other => panic!("expected fatal outcome, got {:?}", other),
	}
}

#[tokio::test]
async fn test_malformed_error_record_is_fatal() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"data": { "json-ld": [{ "#error": ["not a record"] }] }
		})))
		.mount(&server)
		.await;

	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", "{}");

	let outcome = lint(&pattern(&tmp), &config_for(&server), &ValidatorOptions::default(), NoDelay)
		.await
		.unwrap();
	match outcome {
		Outcome::Fatal(fatal) => assert_eq!(fatal.kind(), FatalKind::MalformedErrorShape),
		other => panic!("expected fatal outcome, got {:?}", other),
	}
}

#[tokio::test]
async fn test_unreachable_validator_is_fatal() {
	let tmp = TempDir::new().unwrap();
	write_doc(tmp.path(), "a.jsonld", "{}");

	let config = Config {
		endpoint: "http://127.0.0.1:1/parse".into(),
		timeout_secs: 2,
		..Config::default()
	};
	let outcome = lint(&pattern(&tmp), &config, &ValidatorOptions::default(), NoDelay)
		.await
		.unwrap();
	match outcome {
		Outcome::Fatal(fatal) => assert_eq!(fatal.kind(), FatalKind::Transport),
		other => panic!("expected fatal outcome, got {:?}", other),
	}
}
