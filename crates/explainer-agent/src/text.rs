//! Cleanup and parsing helpers for model replies.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Default chunk length, in characters
pub const DEFAULT_CHUNK_LEN: usize = 2000;

static MARKDOWN_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_]*|#+").expect("static regex"));

static JSON_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```json|```").expect("static regex"));

static DANGLING_OBJECT_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\}").expect("static regex"));

static DANGLING_ARRAY_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\]").expect("static regex"));

/// Strip code-fence openers and heading markers, then trim.
pub fn clean_text(text: &str) -> String {
    MARKDOWN_NOISE.replace_all(text, "").trim().to_string()
}

/// Split `text` into consecutive chunks of at most `max_len` characters.
///
/// A `max_len` of zero is treated as one.
pub fn chunk_text(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_len)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Pull a JSON object out of a chatty model reply.
///
/// Fences are removed and the slice between the first `{` and the last `}`
/// is parsed. If that fails, trailing commas are dropped and parsing is
/// retried once.
pub fn safe_parse_json(text: &str) -> Option<Value> {
    if text.is_empty() {
        return None;
    }

    let unfenced = JSON_FENCE.replace_all(text, "");
    let unfenced = unfenced.trim();

    let start = unfenced.find('{')?;
    let end = unfenced.rfind('}')?;
    if end < start {
        return None;
    }
    let candidate = &unfenced[start..=end];

    if let Ok(value) = serde_json::from_str(candidate) {
        return Some(value);
    }

    let repaired = DANGLING_OBJECT_COMMA.replace_all(candidate, "}");
    let repaired = DANGLING_ARRAY_COMMA.replace_all(&repaired, "]");
    serde_json::from_str(&repaired).ok()
}
