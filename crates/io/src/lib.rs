//!
//! A crate containing IO related functionality. This includes the reading and
//! writing of automata in the JSON format, the output of automata as Graphviz
//! diagrams, and the reading of word lists.
//!

mod error;
mod line_iterator;

pub mod dot;
pub mod json;
pub mod word_list;

pub use error::*;
