use regex::Regex;
use std::sync::OnceLock;

// Elements whose text content is dropped along with the tags.
const NON_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "textarea", "option"];

fn tag_pattern() -> &'static Regex {
	static TAG: OnceLock<Regex> = OnceLock::new();
	TAG.get_or_init(|| {
		Regex::new(r"(?s)<!--.*?-->|<![^>]*>|</?[A-Za-z][^>]*>").expect("valid tag pattern")
	})
}

fn non_text_patterns() -> &'static [Regex] {
	static NON_TEXT: OnceLock<Vec<Regex>> = OnceLock::new();
	NON_TEXT.get_or_init(|| {
		NON_TEXT_ELEMENTS
			.iter()
			.map(|name| {
				Regex::new(&format!(r"(?is)<{name}\b[^>]*>.*?</{name}\s*>"))
					.expect("valid element pattern")
			})
			.collect()
	})
}

/// Strips all markup from validator text, keeping only the text content.
/// A `<` not followed by a tag name is text and is kept.
pub fn sanitize(text: &str) -> String {
	let mut out = text.to_string();
	// Removing a tag can join the pieces of another one, so repeat until stable.
	loop {
		let next = strip_once(&out);
		if next == out {
			return out;
		}
		out = next;
	}
}

fn strip_once(text: &str) -> String {
	let mut out = text.to_string();
	for pattern in non_text_patterns() {
		if pattern.is_match(&out) {
			out = pattern.replace_all(&out, "").into_owned();
		}
	}
	tag_pattern().replace_all(&out, "").into_owned()
}
