//! Footer rendering.
//!
//! A footer template has two substitution slots filled with the gitmeta
//! version and the generation timestamp. Supported placeholders:
//!
//! - `%s` takes the next value in order
//! - `%1$s` / `%2$s` take a value by position
//! - `%n` is a line break, `%%` a literal percent sign
//!
//! An absent version renders as the empty string.

use crate::error::{GitMetaError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use regex::{Captures, Regex};
use std::fmt::Display;
use std::sync::LazyLock;

/// A run of backslashes followed by `n`.
static ESCAPED_NEWLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\+n").expect("valid regex"));

/// Turn literal two-character `\n` sequences into line breaks.
///
/// Only a lone backslash escapes: `\\n` is kept as is.
pub fn unescape_newlines(template: &str) -> String {
    ESCAPED_NEWLINE
        .replace_all(template, |caps: &Captures<'_>| {
            if &caps[0] == "\\n" {
                "\n".to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Render `now` with a strftime pattern, rejecting invalid patterns.
pub fn format_timestamp<Tz>(now: &DateTime<Tz>, date_format: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(GitMetaError::Config(format!(
            "invalid date format '{}'",
            date_format
        )));
    }
    Ok(now.format(date_format).to_string())
}

/// Substitute `values` into `template`.
pub fn format_template(template: &str, values: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut next = 0usize;
    let mut chars = template.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }

        match chars.peek().map(|&(_, c)| c) {
            Some('s') => {
                chars.next();
                out.push_str(values.get(next).copied().unwrap_or(""));
                next += 1;
            }
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(d) if d.is_ascii_digit() => {
                let rest = &template[start + 1..];
                match parse_positional(rest) {
                    Some((index, consumed)) => {
                        out.push_str(values.get(index).copied().unwrap_or(""));
                        for _ in 0..consumed {
                            chars.next();
                        }
                    }
                    None => out.push('%'),
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

/// Parse `N$s` at the start of `rest`; returns the zero-based index and the
/// number of characters consumed.
fn parse_positional(rest: &str) -> Option<(usize, usize)> {
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    let after = &rest[digits.len()..];
    if !after.starts_with("$s") {
        return None;
    }
    let position: usize = digits.parse().ok()?;
    let index = position.checked_sub(1)?;
    Some((index, digits.len() + 2))
}

/// Render the footer, or `None` when the template is empty.
pub fn render_footer<Tz>(
    template: &str,
    version: Option<&str>,
    now: &DateTime<Tz>,
    date_format: &str,
) -> Result<Option<String>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if template.is_empty() {
        return Ok(None);
    }

    let timestamp = format_timestamp(now, date_format)?;
    let template = unescape_newlines(template);
    Ok(Some(format_template(
        &template,
        &[version.unwrap_or(""), &timestamp],
    )))
}
