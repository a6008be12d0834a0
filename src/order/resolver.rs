//! Strategies mapping a property source to its priority.

use std::collections::HashMap;

use serde::Deserialize;

use super::PropertySourceDescriptor;

/// Maps a descriptor to an explicit priority.
///
/// Lower values are placed earlier and therefore take precedence. `None`
/// leaves the source at the neutral rank, after every explicit priority.
pub trait PriorityResolver: Send + Sync {
    fn resolve(&self, descriptor: &PropertySourceDescriptor) -> Option<i32>;

    /// Falls back to `other` when this resolver has no opinion.
    fn or<R: PriorityResolver>(self, other: R) -> Or<Self, R>
    where
        Self: Sized,
    {
        Or {
            first: self,
            second: other,
        }
    }
}

impl<F> PriorityResolver for F
where
    F: Fn(&PropertySourceDescriptor) -> Option<i32> + Send + Sync,
{
    fn resolve(&self, descriptor: &PropertySourceDescriptor) -> Option<i32> {
        self(descriptor)
    }
}

/// Uses the priority the descriptor declares for itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredPriority;

impl PriorityResolver for DeclaredPriority {
    fn resolve(&self, descriptor: &PropertySourceDescriptor) -> Option<i32> {
        descriptor.priority
    }
}

/// See [`PriorityResolver::or`].
#[derive(Debug, Clone)]
pub struct Or<A, B> {
    first: A,
    second: B,
}

impl<A: PriorityResolver, B: PriorityResolver> PriorityResolver for Or<A, B> {
    fn resolve(&self, descriptor: &PropertySourceDescriptor) -> Option<i32> {
        self.first
            .resolve(descriptor)
            .or_else(|| self.second.resolve(descriptor))
    }
}

/// Explicit registration list of source names and their priorities.
///
/// Deserializes from a `[priorities]` table:
///
/// ```toml
/// [priorities]
/// "env [APP]" = -10
/// "file [config/local.toml]" = 0
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PriorityTable {
    #[serde(default)]
    priorities: HashMap<String, i32>,
}

impl PriorityTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn insert(mut self, name: impl Into<String>, priority: i32) -> Self {
        self.priorities.insert(name.into(), priority);
        self
    }

    pub fn get(&self, name: &str) -> Option<i32> {
        self.priorities.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, i32)> for PriorityTable {
    fn from_iter<I: IntoIterator<Item = (S, i32)>>(iter: I) -> Self {
        Self {
            priorities: iter
                .into_iter()
                .map(|(name, priority)| (name.into(), priority))
                .collect(),
        }
    }
}

impl PriorityResolver for PriorityTable {
    fn resolve(&self, descriptor: &PropertySourceDescriptor) -> Option<i32> {
        self.get(&descriptor.name)
    }
}

/// Priorities derived from an [`ImportGraph`](super::ImportGraph).
///
/// A source's priority is its position in the graph's property source order.
#[derive(Debug, Clone, Default)]
pub struct ImportOrder {
    positions: HashMap<String, i32>,
}

impl ImportOrder {
    pub(super) fn new(order: Vec<String>) -> Self {
        Self {
            positions: order.into_iter().zip(0..).collect(),
        }
    }
}

impl PriorityResolver for ImportOrder {
    fn resolve(&self, descriptor: &PropertySourceDescriptor) -> Option<i32> {
        self.positions.get(&descriptor.name).copied()
    }
}
