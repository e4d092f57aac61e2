//! Quote-aware splitting of command lines.
//!
//! Only one quote character and the two separators below are recognised.
//! Quoted text is kept verbatim, quotes included, so that later stages can
//! decide whether to strip them.

/// Quote character that protects separators.
pub const QUOTE: char = '"';

/// Separates labeled argument pieces.
pub const ARGUMENT_SEPARATOR: char = ',';

/// Ends an argument segment so that a subcommand can follow.
pub const TERMINATOR: char = ';';

/// Split `input` on `separator`, re-merging fields that sit inside a quoted span.
///
/// A field containing an odd number of `quote` characters opens (or closes) a
/// quoted span; fields inside a span are appended to the previous segment
/// together with the separator that was consumed. An unterminated quote makes
/// the last segment absorb everything that follows.
///
/// # Example
///
/// ```
/// use tally_command::tokenize::split_quoted;
///
/// assert_eq!(
///     split_quoted(r#"a,"b,c",d"#, ',', '"'),
///     vec!["a", "\"b,c\"", "d"]
/// );
/// ```
pub fn split_quoted(input: &str, separator: char, quote: char) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    let mut quoted = false;

    for field in input.split(separator) {
        match segments.last_mut() {
            Some(last) if quoted => {
                last.push(separator);
                last.push_str(field);
            }
            _ => segments.push(field.to_string()),
        }
        if field.matches(quote).count() % 2 == 1 {
            quoted = !quoted;
        }
    }

    segments
}

/// Byte length of the token at the start of `s`, which must not begin with
/// whitespace. A token ends at whitespace or at a terminator.
fn token_len(s: &str) -> usize {
    s.find(|c: char| c.is_whitespace() || c == TERMINATOR)
        .unwrap_or(s.len())
}

/// The leading token of `s`, or `""`. A token ends at whitespace or at a
/// terminator, so `list;` yields `list`.
pub fn first_token(s: &str) -> &str {
    let s = s.trim_start();
    &s[..token_len(s)]
}

/// `s` without its leading token, trimmed. A terminator right after the
/// token is kept: `list; export` yields `; export`.
pub fn strip_token(s: &str) -> &str {
    let s = s.trim_start();
    s[token_len(s)..].trim()
}

/// Split off the argument segment that ends at the first unquoted terminator.
///
/// Returns the segment and, when a terminator was found, everything after it.
pub fn split_terminator(s: &str) -> (String, Option<String>) {
    let mut parts = split_quoted(s, TERMINATOR, QUOTE).into_iter();
    let segment = parts.next().unwrap_or_default();
    let rest: Vec<String> = parts.collect();
    if rest.is_empty() {
        (segment, None)
    } else {
        (segment, Some(rest.join(&TERMINATOR.to_string())))
    }
}

/// Trim `s` and remove one pair of surrounding quotes.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    s.strip_prefix(QUOTE)
        .and_then(|inner| inner.strip_suffix(QUOTE))
        .unwrap_or(s)
}

/// Case-insensitive token comparison.
pub(crate) fn same_token(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
