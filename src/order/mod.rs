//! Precedence ordering of named property sources.
//!
//! The pipeline hands over its sources as [`PropertySourceDescriptor`]s in
//! precedence order (first wins). A [`PriorityResolver`] maps each one to an
//! optional priority and [`reorder`] sorts them by it.

mod descriptor;
mod error;
mod graph;
mod reorder;
mod resolver;

pub use descriptor::{describe, PropertySourceDescriptor};
pub use error::OrderError;
pub use graph::{ConfigurationUnit, ImportGraph};
pub use reorder::{reorder, reorder_anchored, Placement};
pub use resolver::{DeclaredPriority, ImportOrder, Or, PriorityResolver, PriorityTable};
