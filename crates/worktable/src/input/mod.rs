//! Loading a dataset into a ready editing session.

mod detect;
mod loader;

pub use detect::{detect_amount_column, detect_classification_column};
pub use loader::{Loader, LoaderConfig};
