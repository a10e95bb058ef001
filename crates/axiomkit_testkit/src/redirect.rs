//! Matchers for generated HTML redirect pages.

use regex::Regex;

/// Regex source matching a `window.location.replace("<url>"` call.
pub fn pattern_redir(url: &str) -> String {
    format!(r#"window\.location\.replace\(\s*"{}""#, regex::escape(url))
}

/// Compiled form of [`pattern_redir`].
pub fn match_redir(url: &str) -> Result<Regex, regex::Error> {
    Regex::new(&pattern_redir(url))
}
