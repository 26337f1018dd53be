// Ordinal message templates
//
// Placeholders are `{N}`. Distinct ordinals are ranked ascending and the
// k-th ranked placeholder receives argument k-1, wherever it sits in the
// text. Placeholders ranked past the last argument stay as written.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeSet;

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

/// Distinct ordinals in `template`, ascending.
pub fn placeholders(template: &str) -> Vec<u64> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps[1].parse::<u64>().ok())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Render `template` with positional `args`.
///
/// ```
/// use folio_validation::format_message;
///
/// let out = format_message("{2} is not valid for {1}", &["isbn", "978"]);
/// assert_eq!(out, "978 is not valid for isbn");
/// ```
pub fn format_message<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    if args.is_empty() {
        return template.to_string();
    }

    let ranked = placeholders(template);

    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let rank = caps[1]
                .parse::<u64>()
                .ok()
                .and_then(|ordinal| ranked.binary_search(&ordinal).ok());

            match rank.and_then(|rank| args.get(rank)) {
                Some(arg) => arg.as_ref().to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Formatter handle for callers that take the formatter as a dependency.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter;

impl MessageFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format<S: AsRef<str>>(&self, template: &str, args: &[S]) -> String {
        format_message(template, args)
    }
}
