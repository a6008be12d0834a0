pub mod config;
pub mod order;

pub use config::{Config, ConfigError};
pub use order::{
    reorder, reorder_anchored, OrderError, Placement, PriorityResolver, PropertySourceDescriptor,
};
