//! Pipeline entry points.
//!
//! - `ChangeEvaluator`: decide whether the watched page changed
//! - `run_check`: evaluate, then notify on change

pub mod check;
pub mod evaluate;

pub use check::{CheckOutcome, run_check};
pub use evaluate::ChangeEvaluator;
