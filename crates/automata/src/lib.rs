//!
//! A crate containing finite automata related functionality. This includes
//! nondeterministic and deterministic finite automata, the subset construction
//! that turns the former into the latter, and the simulation of both on words.
//!
//! This crate does not use unsafe code.

#![forbid(unsafe_code)]

mod automaton;
mod dfa;
mod error;
mod evaluation;
mod nfa;
mod random_nfa;
mod state_set;
mod subset_construction;
mod validation;
mod words;

pub use automaton::*;
pub use dfa::*;
pub use error::*;
pub use nfa::*;
pub use random_nfa::*;
pub use state_set::*;
pub use subset_construction::*;
pub use validation::*;
pub use words::*;
