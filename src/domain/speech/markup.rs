use super::input::VoiceName;
use html2text::from_read;
use once_cell::sync::Lazy;
use regex::Regex;

const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Wrap plain text in an SSML document spoken by `voice`
pub fn build_ssml(text: &str, voice: &VoiceName) -> String {
    format!(
        "<speak version=\"1.0\" xmlns=\"{}\" xml:lang=\"{}\"><voice name=\"{}\">{}</voice></speak>",
        SSML_NAMESPACE,
        voice.locale(),
        voice.as_str(),
        escape_xml(text.trim())
    )
}

/// Escape the five XML special characters
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Extract the text that will actually be spoken from an SSML document:
/// tags removed, entities decoded, whitespace collapsed.
pub fn spoken_text(ssml: &str) -> String {
    // Tags can sit inside a word (`Hel<break/>lo`), so they vanish without a gap
    let without_tags = TAG_PATTERN.replace_all(ssml, "");

    // Only text and entity references are left for html2text to decode
    let decoded = from_read(without_tags.as_bytes(), usize::MAX);
    let normalized = WHITESPACE_PATTERN.replace_all(&decoded, " ");

    normalized.trim().to_string()
}
