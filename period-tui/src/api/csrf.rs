//! CSRF token lookup. The hidden `csrfmiddlewaretoken` form field rendered
//! into the index page wins; the `csrftoken` cookie is the fallback.

use regex::Regex;
use std::sync::LazyLock;

pub const CSRF_COOKIE: &str = "csrftoken";
pub const CSRF_FIELD: &str = "csrfmiddlewaretoken";

static HIDDEN_INPUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<input[^>]*\bname\s*=\s*["']csrfmiddlewaretoken["'][^>]*>"#)
        .expect("hidden input pattern is valid")
});

static VALUE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bvalue\s*=\s*["']([^"']*)["']"#).expect("value pattern is valid")
});

/// Extract the hidden CSRF field's value from an HTML page.
pub fn extract_form_token(html: &str) -> Option<String> {
    let input = HIDDEN_INPUT_RE.find(html)?;
    let value = VALUE_ATTR_RE.captures(input.as_str())?.get(1)?.as_str();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Look up a cookie in a `Cookie:` header value (`a=1; b=2`).
pub fn cookie_from_header(header: &str, name: &str) -> Option<String> {
    parse_cookie_header(header)
        .into_iter()
        .find(|(cookie_name, _)| cookie_name == name)
        .map(|(_, value)| value)
}

pub fn parse_cookie_header(header: &str) -> Vec<(String, String)> {
    header
        .split(';')
        .filter_map(|segment| {
            let mut parts = segment.trim().splitn(2, '=');
            let name = parts.next()?.trim();
            let value = parts.next()?.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Pick the token to submit: form field, then cookie, then empty.
pub fn resolve_token(form_token: Option<&str>, cookie_header: Option<&str>) -> String {
    if let Some(token) = form_token.filter(|t| !t.is_empty()) {
        return token.to_string();
    }
    cookie_header
        .and_then(|header| cookie_from_header(header, CSRF_COOKIE))
        .unwrap_or_default()
}
