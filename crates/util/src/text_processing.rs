//! Secret redaction for anything that may end up in a log file or on screen.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Returns compiled regex patterns for detecting sensitive information.
///
/// Each pattern captures the non-secret prefix in group 1 so it can be kept
/// while the secret itself is replaced.
pub fn get_redact_patterns() -> &'static Vec<Regex> {
    static REDACT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(build_redact_patterns);

    &REDACT_PATTERNS
}

fn build_redact_patterns() -> Vec<Regex> {
    [
        r"(?i)(authorization:\s*)([^\s]+(?:\s+[^\s]+)?)",
        r"(?i)((?:^|\b)Bearer\s+)([A-Za-z0-9\-._~+/]+=*)",
        r"(?i)([A-Z0-9_]*?(?:KEY|TOKEN|SECRET|PASSWORD)=)([^\s&]+)",
        r"(?i)((?:access_token|api_key|token)=)([^\s&]+)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
}

/// Redacts values that look like secrets in a string.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in get_redact_patterns() {
        redacted = pattern
            .replace_all(&redacted, |caps: &Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{prefix}<redacted>")
            })
            .into_owned();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_authorization_headers() {
        let out = redact_sensitive("authorization: Bearer abc.def.ghi");
        assert_eq!(out, "authorization: <redacted>");
    }

    #[test]
    fn redacts_bare_bearer_tokens() {
        let out = redact_sensitive("sending request with Bearer s3cr3t-token");
        assert!(!out.contains("s3cr3t-token"), "{out}");
        assert!(out.contains("Bearer <redacted>"), "{out}");
    }

    #[test]
    fn redacts_env_style_assignments() {
        let out = redact_sensitive("FLOWDECK_API_TOKEN=abcdef other=value");
        assert_eq!(out, "FLOWDECK_API_TOKEN=<redacted> other=value");
    }

    #[test]
    fn leaves_ordinary_text_alone() {
        let text = "retry requested for execution exec-42";
        assert_eq!(redact_sensitive(text), text);
    }
}
