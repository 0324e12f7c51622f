//! Rendering a (filtered) view or a grouped aggregation to CSV.

mod group;
mod writer;

pub use group::{group_records, GroupRow};
pub use writer::{write_groups, write_records};
