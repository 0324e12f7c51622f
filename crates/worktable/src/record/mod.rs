//! Records and the ordered record store.

mod row;
mod store;

pub use row::{Priority, Record, RowStatus};
pub use store::RecordStore;
