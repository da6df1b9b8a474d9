use std::fmt;

use log::debug;

use crate::subset_name;
use crate::Nfa;
use crate::State;
use crate::StateSet;
use crate::Symbol;

/// The classification of a nondeterministic automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Determinism {
    /// Every state has exactly one transition for every symbol.
    Deterministic,
    Nondeterministic(NondeterminismReason),
}

/// A witness for the nondeterminism of an automaton.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NondeterminismReason {
    /// The pair leads to more than one state.
    MultipleDestinations {
        state: State,
        symbol: Symbol,
        destinations: StateSet,
    },

    /// The pair has no transition at all. A deterministic automaton must be
    /// total, so a partial automaton is classified as nondeterministic.
    MissingTransition { state: State, symbol: Symbol },
}

impl Determinism {
    pub fn is_nondeterministic(&self) -> bool {
        matches!(self, Determinism::Nondeterministic(_))
    }
}

impl Nfa {
    /// Classifies the automaton, reporting multiple destinations before
    /// missing transitions. Within each rule the first offending pair in
    /// canonical order is the witness.
    pub fn determinism(&self) -> Determinism {
        if let Some((state, symbol, destinations)) = self
            .transitions()
            .find(|(_, _, destinations)| destinations.len() > 1)
        {
            debug!("Found multiple destinations for ({state}, {symbol})");
            return Determinism::Nondeterministic(NondeterminismReason::MultipleDestinations {
                state: state.clone(),
                symbol: symbol.clone(),
                destinations: destinations.clone(),
            });
        }

        for state in self.states() {
            for symbol in self.alphabet() {
                if self.transition(state, symbol).is_empty() {
                    debug!("Found missing transition for ({state}, {symbol})");
                    return Determinism::Nondeterministic(NondeterminismReason::MissingTransition {
                        state: state.clone(),
                        symbol: symbol.clone(),
                    });
                }
            }
        }

        Determinism::Deterministic
    }
}

impl fmt::Display for NondeterminismReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NondeterminismReason::MultipleDestinations {
                state,
                symbol,
                destinations,
            } => write!(
                f,
                "multiple destinations for δ({state}, {symbol}) = {}",
                subset_name(destinations)
            ),
            NondeterminismReason::MissingTransition { state, symbol } => {
                write!(f, "missing transition, δ({state}, {symbol}) is not defined")
            }
        }
    }
}

impl fmt::Display for Determinism {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Determinism::Deterministic => write!(f, "the automaton is deterministic"),
            Determinism::Nondeterministic(reason) => write!(f, "{reason}"),
        }
    }
}
