use once_cell::sync::Lazy;
use regex::Regex;

/// Removes Slack inline markup such as `<@U123>`, `<#C42|general>` or
/// `<https://example.com|label>` and trims the result.
///
/// Text without any `<...>` tags comes back trimmed and otherwise untouched.
#[must_use]
pub fn strip_markup(text: &str) -> String {
    static TAG_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex compile"));

    TAG_RE.replace_all(text, "").trim().to_string()
}
