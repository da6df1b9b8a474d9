use std::collections::BTreeSet;

use itertools::Itertools;

/// The label of a state.
pub type State = String;

/// The label of an alphabet symbol.
pub type Symbol = String;

/// A set of states, ordered such that its canonical name is well defined.
pub type StateSet = BTreeSet<State>;

/// The name of the state that corresponds to the empty subset.
pub const EMPTY_SET_LABEL: &str = "∅";

/// The marker used to denote the empty word, never a symbol.
pub const EMPTY_WORD: &str = "ε";

/// Returns the canonical name of a subset of states, `{q0,q1}` for a non-empty
/// set and [EMPTY_SET_LABEL] for the empty set.
pub fn subset_name(subset: &StateSet) -> State {
    if subset.is_empty() {
        EMPTY_SET_LABEL.to_string()
    } else {
        format!("{{{}}}", subset.iter().join(","))
    }
}

/// Returns true iff the label can be used for a state of a nondeterministic
/// automaton without the canonical subset names becoming ambiguous.
pub fn is_valid_state_label(label: &str) -> bool {
    !label.is_empty() && label != EMPTY_SET_LABEL && !label.contains([',', '{', '}'])
}

/// Returns true iff the label can be used as an alphabet symbol.
pub fn is_valid_symbol(symbol: &str) -> bool {
    !symbol.is_empty() && symbol != EMPTY_WORD
}
