//! Precedence derived from imports between configuration units.
//!
//! A unit that imports another one is more specific than it, so its property
//! sources win. Walking the import graph breadth first from its roots gives
//! the order in which units (and their sources) take precedence.

use std::collections::{HashMap, HashSet, VecDeque};

use super::ImportOrder;

/// A named group of property sources that may import other units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigurationUnit {
    name: String,
    property_sources: Vec<String>,
    imports: Vec<String>,
}

impl ConfigurationUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declares a property source. Sources declared later in the same unit
    /// take precedence over earlier ones.
    pub fn with_property_source(mut self, source: impl Into<String>) -> Self {
        self.property_sources.push(source.into());
        self
    }

    pub fn with_import(mut self, unit: impl Into<String>) -> Self {
        self.imports.push(unit.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_sources(&self) -> &[String] {
        &self.property_sources
    }

    pub fn imports(&self) -> &[String] {
        &self.imports
    }
}

/// Import graph over a set of [`ConfigurationUnit`]s.
#[derive(Debug, Clone)]
pub struct ImportGraph {
    units: Vec<ConfigurationUnit>,
    children: Vec<Vec<usize>>,
}

impl ImportGraph {
    /// Builds the graph. Units are sorted by name so the result does not
    /// depend on registration order.
    ///
    /// Imports of unknown units are ignored, as are imports of a name shared
    /// by several units.
    pub fn new(units: impl IntoIterator<Item = ConfigurationUnit>) -> Self {
        let mut units: Vec<ConfigurationUnit> = units.into_iter().collect();
        units.sort_by(|a, b| a.name.cmp(&b.name));

        // None marks a name claimed by more than one unit.
        let mut by_name: HashMap<&str, Option<usize>> = HashMap::with_capacity(units.len());
        for (idx, unit) in units.iter().enumerate() {
            by_name
                .entry(unit.name.as_str())
                .and_modify(|slot| *slot = None)
                .or_insert(Some(idx));
        }

        let children: Vec<Vec<usize>> = units
            .iter()
            .map(|unit| {
                unit.imports
                    .iter()
                    .filter_map(|import| match by_name.get(import.as_str()) {
                        Some(Some(idx)) => Some(*idx),
                        Some(None) => {
                            tracing::debug!(
                                unit = %unit.name,
                                import = %import,
                                "ignoring ambiguous import"
                            );
                            None
                        }
                        None => {
                            tracing::debug!(
                                unit = %unit.name,
                                import = %import,
                                "ignoring unknown import"
                            );
                            None
                        }
                    })
                    .collect()
            })
            .collect();

        Self { units, children }
    }

    /// Units in precedence order.
    ///
    /// Roots (units nobody imports) come in name order, each followed by a
    /// breadth-first walk of its imports. Units reachable only through an
    /// import cycle are walked last, again in name order.
    pub fn sorted_units(&self) -> Vec<&ConfigurationUnit> {
        self.walk_order()
            .into_iter()
            .map(|idx| &self.units[idx])
            .collect()
    }

    /// Property sources of all units in precedence order, each listed once.
    ///
    /// A source declared by several units takes the position of its last
    /// occurrence, i.e. the least specific unit declaring it.
    pub fn property_source_order(&self) -> Vec<String> {
        let mut flattened = Vec::new();
        for unit in self.sorted_units() {
            let mut in_unit = HashSet::new();
            flattened.extend(
                unit.property_sources
                    .iter()
                    .rev()
                    .filter(|&source| in_unit.insert(source.as_str())),
            );
        }

        let mut seen = HashSet::new();
        let mut order: Vec<String> = flattened
            .into_iter()
            .rev()
            .filter(|&source| seen.insert(source.as_str()))
            .cloned()
            .collect();
        order.reverse();
        order
    }

    /// A resolver giving each source its position in
    /// [`property_source_order`](Self::property_source_order).
    pub fn resolver(&self) -> ImportOrder {
        ImportOrder::new(self.property_source_order())
    }

    fn walk_order(&self) -> Vec<usize> {
        let mut imported = vec![false; self.units.len()];
        for &child in self.children.iter().flatten() {
            imported[child] = true;
        }

        let mut visited = vec![false; self.units.len()];
        let mut order = Vec::with_capacity(self.units.len());

        for root in (0..self.units.len()).filter(|&idx| !imported[idx]) {
            self.breadth_first(root, &mut visited, &mut order);
        }
        for idx in 0..self.units.len() {
            self.breadth_first(idx, &mut visited, &mut order);
        }

        order
    }

    fn breadth_first(&self, start: usize, visited: &mut [bool], order: &mut Vec<usize>) {
        if visited[start] {
            return;
        }
        visited[start] = true;
        order.push(start);

        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for &child in &self.children[node] {
                if !visited[child] {
                    visited[child] = true;
                    order.push(child);
                    queue.push_back(child);
                }
            }
        }
    }
}
