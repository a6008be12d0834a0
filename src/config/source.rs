use toml::{Table, Value};

use super::ConfigError;

/// A value contributed by a source, placed at `path` in the merged table.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub path: Vec<String>,
    pub value: Value,
}

impl ConfigEntry {
    pub fn root(table: Table) -> Self {
        Self {
            path: Vec::new(),
            value: Value::Table(table),
        }
    }

    pub fn at_path(path: Vec<String>, value: Value) -> Self {
        Self { path, value }
    }
}

/// A named property source in the loading pipeline.
///
/// The name identifies the source to priority resolvers and must be unique
/// among the sources of one [`Config`](super::Config).
pub trait ConfigSource: Send + Sync + std::fmt::Debug {
    fn name(&self) -> String;

    fn entries(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

/// Merges `value` into `table` at `path`, creating intermediate tables.
///
/// Tables are merged recursively; anything else replaces what was there.
pub fn merge_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        if let Value::Table(overlay) = value {
            deep_merge(table, overlay);
        }
        return;
    };

    if rest.is_empty() {
        merge_key(table, first.clone(), value);
        return;
    }

    let nested = table
        .entry(first.clone())
        .or_insert_with(|| Value::Table(Table::new()));
    if !nested.is_table() {
        *nested = Value::Table(Table::new());
    }
    if let Value::Table(nested) = nested {
        merge_at_path(nested, rest, value);
    }
}

fn deep_merge(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        merge_key(base, key, value);
    }
}

/// Table into table recurses; any other pair replaces the existing value.
fn merge_key(table: &mut Table, key: String, value: Value) {
    match (table.get_mut(&key), value) {
        (Some(Value::Table(base)), Value::Table(overlay)) => deep_merge(base, overlay),
        (_, value) => {
            table.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(s: &str) -> Table {
        toml::from_str(s).unwrap()
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_root_merge_is_deep() {
        let mut base = table("[server]\nhost = \"a\"\nport = 1");
        merge_at_path(&mut base, &[], Value::Table(table("[server]\nport = 2")));

        assert_eq!(base["server"]["host"].as_str(), Some("a"));
        assert_eq!(base["server"]["port"].as_integer(), Some(2));
    }

    #[test]
    fn test_nested_path_creates_tables() {
        let mut base = Table::new();
        merge_at_path(&mut base, &path(&["database", "pool", "size"]), Value::Integer(4));

        assert_eq!(base["database"]["pool"]["size"].as_integer(), Some(4));
    }

    #[test]
    fn test_scalar_replaced_by_nested_path() {
        let mut base = table("database = \"sqlite\"");
        merge_at_path(&mut base, &path(&["database", "host"]), Value::String("db".into()));

        assert_eq!(base["database"]["host"].as_str(), Some("db"));
    }

    #[test]
    fn test_table_at_path_merges_into_existing_table() {
        let mut base = table("[server]\nhost = \"a\"\nport = 1");
        merge_at_path(&mut base, &path(&["server"]), Value::Table(table("port = 2")));

        assert_eq!(base["server"]["host"].as_str(), Some("a"));
        assert_eq!(base["server"]["port"].as_integer(), Some(2));
    }

    #[test]
    fn test_arrays_are_replaced() {
        let mut base = table("hosts = [\"a\", \"b\"]");
        merge_at_path(&mut base, &[], Value::Table(table("hosts = [\"c\"]")));

        assert_eq!(base["hosts"].as_array().map(Vec::len), Some(1));
    }
}
