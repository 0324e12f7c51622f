//! Priority classification: the built-in base heuristic plus
//! user-maintained override rules.

mod engine;
mod rule;
mod store;

pub use engine::RuleEngine;
pub use rule::Rule;
pub use store::{RuleStore, Settings};
