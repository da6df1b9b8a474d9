use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::is_valid_symbol;
use crate::parse_word;
use crate::AutomatonError;
use crate::State;
use crate::Symbol;

/// The edges of an automaton grouped by (origin, destination), with all the
/// symbols that lead from the origin to the destination.
pub type Edges = BTreeMap<(State, State), BTreeSet<Symbol>>;

/// The common interface of nondeterministic and deterministic automata, as far
/// as simulation and visualisation are concerned.
pub trait FiniteAutomaton {
    /// Returns the set of states.
    fn states(&self) -> &BTreeSet<State>;

    /// Returns the alphabet.
    fn alphabet(&self) -> &BTreeSet<Symbol>;

    /// Returns the initial state.
    fn initial_state(&self) -> &str;

    /// Returns the set of final (accepting) states.
    fn final_states(&self) -> &BTreeSet<State>;

    /// Returns true iff the automaton accepts the given word.
    fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool;

    /// Returns the transition relation grouped by (origin, destination).
    fn edges(&self) -> Edges;

    /// Returns true iff the given state is a final state.
    fn is_final(&self, state: &str) -> bool {
        self.final_states().contains(state)
    }

    /// Splits the text into symbols of the alphabet and evaluates the result,
    /// see [parse_word].
    fn accepts_text(&self, input: &str) -> bool {
        self.accepts(&parse_word(input, self.alphabet()))
    }
}

/// Checks the parts that nondeterministic and deterministic automata have in
/// common: a non-empty set of states, a non-empty alphabet of valid symbols, a
/// declared initial state and declared final states.
pub(crate) fn check_components(
    states: &BTreeSet<State>,
    alphabet: &BTreeSet<Symbol>,
    initial_state: &str,
    final_states: &BTreeSet<State>,
) -> Result<(), AutomatonError> {
    if states.is_empty() {
        return Err(AutomatonError::NoStates);
    }

    if states.contains("") {
        return Err(AutomatonError::InvalidStateLabel(String::new()));
    }

    if alphabet.is_empty() {
        return Err(AutomatonError::EmptyAlphabet);
    }

    if let Some(symbol) = alphabet.iter().find(|symbol| !is_valid_symbol(symbol)) {
        return Err(AutomatonError::ReservedSymbol(symbol.clone()));
    }

    if !states.contains(initial_state) {
        return Err(AutomatonError::UnknownInitialState(initial_state.to_string()));
    }

    if let Some(state) = final_states.iter().find(|state| !states.contains(*state)) {
        return Err(AutomatonError::UnknownFinalState(state.clone()));
    }

    Ok(())
}

/// Checks that a transition only refers to declared states and symbols.
pub(crate) fn check_transition<'a>(
    states: &BTreeSet<State>,
    alphabet: &BTreeSet<Symbol>,
    from: &str,
    symbol: &str,
    destinations: impl IntoIterator<Item = &'a State>,
) -> Result<(), AutomatonError> {
    if !states.contains(from) {
        return Err(AutomatonError::UnknownState(from.to_string()));
    }

    if !alphabet.contains(symbol) {
        return Err(AutomatonError::UnknownSymbol(symbol.to_string()));
    }

    for to in destinations {
        if !states.contains(to) {
            return Err(AutomatonError::UnknownState(to.clone()));
        }
    }

    Ok(())
}
