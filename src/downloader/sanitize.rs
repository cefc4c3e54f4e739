// Filename sanitizer: map an arbitrary media title to a safe path component

use regex::Regex;

/// Fallback when sanitizing leaves nothing usable
const FALLBACK_NAME: &str = "download";

/// Strip characters that are unsafe in a filename on common filesystems,
/// collapse runs of whitespace, and trim trailing dots/spaces (Windows
/// rejects those even when the characters themselves are legal).
pub fn sanitize_title(title: &str) -> String {
    lazy_static::lazy_static! {
        static ref UNSAFE_RE: Regex = Regex::new(r#"[\\/*?:"<>|\x00-\x1f]"#).unwrap();
        static ref SPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }

    let stripped = UNSAFE_RE.replace_all(title, "");
    let collapsed = SPACE_RE.replace_all(stripped.trim(), " ");
    let trimmed = collapsed.trim_end_matches(['.', ' ']).to_string();

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed
    }
}
