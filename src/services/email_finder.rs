use regex::Regex;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("invalid email pattern"))
}

/// Return the first email-shaped substring in the text.
///
/// `None` is an expected outcome (resume without contact details), handled by
/// the caller as a validation failure rather than an exceptional condition.
pub fn find_email(text: &str) -> Option<String> {
    email_pattern().find(text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_first_email() {
        let text = "Jane Doe\njane.doe@example.com\nbackup: other@mail.org";
        assert_eq!(find_email(text), Some("jane.doe@example.com".to_string()));
    }

    #[test]
    fn test_no_email_returns_none() {
        assert_eq!(find_email("no contact details here"), None);
        assert_eq!(find_email(""), None);
    }

    #[test]
    fn test_dots_and_hyphens_in_both_parts() {
        assert_eq!(
            find_email("reach me at first-last.name@sub.domain-two.com today"),
            Some("first-last.name@sub.domain-two.com".to_string())
        );
    }

    #[test]
    fn test_email_embedded_in_punctuation() {
        assert_eq!(
            find_email("(email: a_b@c.io)"),
            Some("a_b@c.io".to_string())
        );
    }
}
