use toml::Value;

use super::source::{ConfigEntry, ConfigSource};
use super::ConfigError;

/// Environment variables under `<prefix><separator>`, e.g. `APP__DATABASE__PORT`.
///
/// Remaining segments become a lowercase config path and values are coerced
/// to boolean, integer or float where they look like one.
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
    separator: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            separator: separator.into(),
        }
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> String {
        format!("env [{}]", self.prefix)
    }

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        if self.separator.is_empty() {
            return Err(ConfigError::EmptySeparator(self.name()));
        }

        let prefix_with_sep = format!("{}{}", self.prefix, self.separator);
        let mut entries = Vec::new();

        for (key, value) in std::env::vars_os() {
            let (Some(key), Some(value)) = (key.to_str(), value.to_str()) else {
                tracing::debug!(key = ?key, "skipping non UTF-8 environment variable");
                continue;
            };
            let Some(path_str) = key.strip_prefix(&prefix_with_sep) else {
                continue;
            };
            if path_str.is_empty() {
                continue;
            }

            let path = path_str
                .split(self.separator.as_str())
                .map(str::to_lowercase)
                .collect();
            entries.push(ConfigEntry::at_path(path, coerce_value(value)));
        }

        // vars_os() order is platform dependent
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}

/// Picks the most specific TOML type the text parses as, falling back to a string.
fn coerce_value(s: &str) -> Value {
    parse_bool(s)
        .map(Value::Boolean)
        .or_else(|| parse_integer(s).map(Value::Integer))
        .or_else(|| parse_float(s).map(Value::Float))
        .unwrap_or_else(|| Value::String(s.to_string()))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Optional minus, then digits only; `+1` and `1_000` stay strings.
fn parse_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Requires a decimal point, so `inf`, `NaN` and `1e5` stay strings.
fn parse_float(s: &str) -> Option<f64> {
    s.contains('.').then(|| s.parse().ok()).flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("TRUE"), Value::Boolean(true));
        assert_eq!(coerce_value("false"), Value::Boolean(false));
        assert_eq!(coerce_value("-42"), Value::Integer(-42));
        assert_eq!(coerce_value("1.5"), Value::Float(1.5));
        assert_eq!(coerce_value("1e5"), Value::String("1e5".into()));
        assert_eq!(coerce_value("localhost"), Value::String("localhost".into()));
        assert_eq!(coerce_value("-"), Value::String("-".into()));
        assert_eq!(coerce_value("+1"), Value::String("+1".into()));
        assert_eq!(coerce_value("NaN"), Value::String("NaN".into()));
        assert_eq!(
            coerce_value("99999999999999999999"),
            Value::String("99999999999999999999".into())
        );
    }

    #[test]
    fn test_env_source_name() {
        assert_eq!(EnvSource::new("APP", "__").name(), "env [APP]");
    }

    #[test]
    fn test_env_source_entries() {
        temp_env::with_vars(
            [
                ("CPENVTEST__DATABASE__PORT", Some("5432")),
                ("CPENVTEST__DEBUG", Some("true")),
                ("CPENVTEST__", Some("ignored")),
                ("CPENVTESTX__OTHER", Some("ignored")),
            ],
            || {
                let entries = EnvSource::new("CPENVTEST", "__").entries().unwrap();

                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].path, ["database", "port"]);
                assert_eq!(entries[0].value, Value::Integer(5432));
                assert_eq!(entries[1].path, ["debug"]);
                assert_eq!(entries[1].value, Value::Boolean(true));
            },
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_env_source_skips_non_utf8_variables() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        temp_env::with_vars(
            [
                (
                    OsStr::new("CPNONUTF8_UNRELATED"),
                    Some(OsStr::from_bytes(b"\xff\xfe")),
                ),
                (OsStr::new("CPNONUTF8__BROKEN"), Some(OsStr::from_bytes(b"\xff"))),
                (OsStr::new("CPNONUTF8__NAME"), Some(OsStr::new("ok"))),
            ],
            || {
                let entries = EnvSource::new("CPNONUTF8", "__").entries().unwrap();

                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].path, ["name"]);
                assert_eq!(entries[0].value, Value::String("ok".into()));
            },
        );
    }

    #[test]
    fn test_env_source_empty_separator() {
        let result = EnvSource::new("APP", "").entries();
        assert!(matches!(result, Err(ConfigError::EmptySeparator(name)) if name == "env [APP]"));
    }
}
