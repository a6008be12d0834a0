use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::env::EnvSource;
use super::file::FileSource;
use super::source::{merge_at_path, ConfigSource};
use super::ConfigError;
use crate::order::{Placement, PriorityResolver, PropertySourceDescriptor};

/// A registered source and the priority it declares, if any.
#[derive(Debug)]
struct Registration {
    source: Box<dyn ConfigSource>,
    priority: Option<i32>,
}

/// Builder for loading configuration from named, prioritized sources.
///
/// Without priorities, sources are merged in registration order with later
/// sources overriding earlier ones. Nested tables are merged recursively;
/// other values (including arrays) are replaced entirely.
///
/// Priorities change that order. Before anything is loaded, the sources are
/// described in precedence order (last registered first) and reordered: a
/// source declaring a priority through [`with_priority`](Self::with_priority)
/// or getting one from the [`resolver`](Self::with_resolver) moves ahead of
/// every source without one, lower values first.
///
/// ## Example
///
/// ```no_run
/// use config_precedence::Config;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     name: String,
///     port: u16,
/// }
///
/// // local.toml is registered first but still wins over the environment
/// let config: MyConfig = Config::builder()
///     .with_file("config/local.toml", false)
///     .with_priority(0)
///     .with_file("config/default.toml", true)
///     .with_env("MYAPP", "__")
///     .build()?;
/// # Ok::<(), config_precedence::ConfigError>(())
/// ```
#[derive(Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct Config {
    sources: Vec<Registration>,
    resolver: Option<Box<dyn PriorityResolver>>,
    placement: Placement,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("sources", &self.sources)
            .field("resolver", &self.resolver.as_ref().map(|_| "<resolver>"))
            .field("placement", &self.placement)
            .finish()
    }
}

impl Config {
    /// Creates a new configuration builder.
    pub fn builder() -> Self {
        Self::default()
    }

    /// Adds a TOML file named `file [<path>]`.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// The path may contain `${VAR}` or `${VAR:default}` placeholders.
    pub fn with_file(self, path: impl AsRef<Path>, required: bool) -> Self {
        self.with_source(FileSource::new(path, required))
    }

    /// Adds a TOML file under an explicit source name.
    pub fn with_named_file(
        self,
        name: impl Into<String>,
        path: impl AsRef<Path>,
        required: bool,
    ) -> Self {
        self.with_source(FileSource::named(name, path, required))
    }

    /// Loads environment variables with the given prefix, named `env [<prefix>]`.
    ///
    /// With `MYAPP__DATABASE__HOST=localhost`, `with_env("MYAPP", "__")`
    /// sets `database.host`. Values are coerced to integer, float or
    /// boolean where possible.
    pub fn with_env(self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.with_source(EnvSource::new(prefix, separator))
    }

    /// Adds a custom source.
    pub fn with_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.sources.push(Registration {
            source: Box::new(source),
            priority: None,
        });
        self
    }

    /// Declares the priority of the most recently added source.
    ///
    /// A declared priority takes precedence over the resolver. Has no effect
    /// before any source is added.
    pub fn with_priority(mut self, priority: i32) -> Self {
        match self.sources.last_mut() {
            Some(registration) => registration.priority = Some(priority),
            None => tracing::debug!(priority, "no source to attach priority to"),
        }
        self
    }

    /// Resolves priorities for sources that don't declare one.
    pub fn with_resolver(mut self, resolver: impl PriorityResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    /// Returns the sources in the order they will take precedence, first wins.
    ///
    /// `original_index` counts from the last registered source.
    pub fn precedence(&self) -> Result<Vec<PropertySourceDescriptor>, ConfigError> {
        let descriptors = self
            .sources
            .iter()
            .rev()
            .enumerate()
            .map(|(original_index, registration)| PropertySourceDescriptor {
                name: registration.source.name(),
                priority: registration.priority,
                original_index,
            })
            .collect();

        let custom = self.resolver.as_deref();
        let resolver = |descriptor: &PropertySourceDescriptor| {
            descriptor
                .priority
                .or_else(|| custom.and_then(|r| r.resolve(descriptor)))
        };

        Ok(self.placement.apply(descriptors, &resolver)?)
    }

    /// Builds the configuration by ordering, loading, merging, and deserializing.
    ///
    /// This performs deserialization once at build time rather than on each access,
    /// making subsequent config reads zero-cost.
    pub fn build<T: DeserializeOwned>(self) -> Result<T, ConfigError> {
        let order = self.precedence()?;
        tracing::debug!(
            order = ?order.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            "resolved configuration source precedence"
        );

        let mut merged = toml::Table::new();
        let last = self.sources.len().saturating_sub(1);

        // Lowest precedence first so that higher ones overwrite it.
        for descriptor in order.iter().rev() {
            let registration = &self.sources[last - descriptor.original_index];
            for entry in registration.source.entries()? {
                merge_at_path(&mut merged, &entry.path, entry.value);
            }
        }

        let value = toml::Value::Table(merged);
        value.try_into().map_err(ConfigError::DeserializeError)
    }
}
