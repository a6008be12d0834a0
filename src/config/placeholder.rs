//! `${NAME}` placeholders in source locations.
//!
//! `${NAME:default}` falls back to `default` when `NAME` is not set.
//! A `$` not followed by `{` is kept as is; there is no escape sequence.

use std::iter::Peekable;
use std::str::Chars;

use super::ConfigError;

/// Resolves placeholders in `location` against the process environment.
pub fn resolve_from_env(location: &str) -> Result<String, ConfigError> {
    resolve_placeholders(location, |name| std::env::var(name).ok())
}

/// Resolves placeholders in `location` using `lookup`.
pub fn resolve_placeholders<F>(location: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut result = String::with_capacity(location.len());
    let mut chars = location.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        if chars.next_if_eq(&'{').is_none() {
            result.push('$');
            continue;
        }

        let body = consume_until(&mut chars, '}')
            .ok_or_else(|| ConfigError::UnclosedPlaceholder(location.to_string()))?;
        let (name, default) = match body.split_once(':') {
            Some((name, default)) => (name, Some(default)),
            None => (body.as_str(), None),
        };
        if name.is_empty() {
            return Err(ConfigError::InvalidPlaceholder(location.to_string()));
        }

        let value = lookup(name)
            .or_else(|| default.map(str::to_string))
            .ok_or_else(|| ConfigError::UnresolvedPlaceholder {
                name: name.to_string(),
                location: location.to_string(),
            })?;
        result.push_str(&value);
    }

    Ok(result)
}

fn consume_until(chars: &mut Peekable<Chars>, delim: char) -> Option<String> {
    let mut body = String::new();
    for ch in chars.by_ref() {
        if ch == delim {
            return Some(body);
        }
        body.push(ch);
    }
    None
}
