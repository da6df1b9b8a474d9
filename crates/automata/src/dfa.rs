use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::fmt;

use itertools::Itertools;

use crate::check_components;
use crate::check_transition;
use crate::AutomatonError;
use crate::Edges;
use crate::FiniteAutomaton;
use crate::State;
use crate::Symbol;

/// A deterministic finite automaton, in which a pair of a state and a symbol
/// leads to at most one state.
///
/// Automata obtained by the subset construction are total, but a
/// deterministic automaton in general may leave transitions undefined, in
/// which case the word is rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa {
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    transitions: BTreeMap<State, BTreeMap<Symbol, State>>,

    initial_state: State,
    final_states: BTreeSet<State>,
}

impl Dfa {
    /// Creates a deterministic automaton from its components, and checks that
    /// they are consistent.
    ///
    /// Unlike for [crate::Nfa] the set of final states may be empty, since the
    /// subset construction yields such automata for languages that are empty.
    pub fn new(
        states: BTreeSet<State>,
        alphabet: BTreeSet<Symbol>,
        transitions: BTreeMap<(State, Symbol), State>,
        initial_state: State,
        final_states: BTreeSet<State>,
    ) -> Result<Dfa, AutomatonError> {
        check_components(&states, &alphabet, &initial_state, &final_states)?;

        let mut nested: BTreeMap<State, BTreeMap<Symbol, State>> = BTreeMap::new();
        for ((from, symbol), to) in transitions {
            check_transition(&states, &alphabet, &from, &symbol, [&to])?;
            nested.entry(from).or_default().insert(symbol, to);
        }

        Ok(Dfa::from_parts(states, alphabet, nested, initial_state, final_states))
    }

    /// Creates the automaton without checking its components.
    pub(crate) fn from_parts(
        states: BTreeSet<State>,
        alphabet: BTreeSet<Symbol>,
        transitions: BTreeMap<State, BTreeMap<Symbol, State>>,
        initial_state: State,
        final_states: BTreeSet<State>,
    ) -> Dfa {
        Dfa {
            states,
            alphabet,
            transitions,
            initial_state,
            final_states,
        }
    }

    /// Returns the set of states.
    pub fn states(&self) -> &BTreeSet<State> {
        &self.states
    }

    /// Returns the alphabet.
    pub fn alphabet(&self) -> &BTreeSet<Symbol> {
        &self.alphabet
    }

    /// Returns the initial state.
    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    /// Returns the set of final states.
    pub fn final_states(&self) -> &BTreeSet<State> {
        &self.final_states
    }

    /// Returns the state reached from `state` on `symbol`, if any.
    pub fn transition(&self, state: &str, symbol: &str) -> Option<&str> {
        self.transitions
            .get(state)
            .and_then(|outgoing| outgoing.get(symbol))
            .map(String::as_str)
    }

    /// Iterates over all defined transitions (from, symbol, to) in canonical order.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Symbol, &State)> + '_ {
        self.transitions.iter().flat_map(|(from, outgoing)| {
            outgoing.iter().map(move |(symbol, to)| (from, symbol, to))
        })
    }

    /// Returns the number of defined transitions.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions.values().map(BTreeMap::len).sum()
    }

    /// Returns true iff every state has a transition for every symbol.
    pub fn is_total(&self) -> bool {
        self.states.iter().all(|state| {
            self.alphabet
                .iter()
                .all(|symbol| self.transition(state, symbol).is_some())
        })
    }

    /// Returns the states that are reachable from the initial state.
    pub fn reachable_states(&self) -> BTreeSet<&str> {
        let mut reachable: BTreeSet<&str> = BTreeSet::new();
        let mut queue = VecDeque::from([self.initial_state.as_str()]);

        while let Some(state) = queue.pop_front() {
            if !reachable.insert(state) {
                continue;
            }

            for symbol in &self.alphabet {
                if let Some(next) = self.transition(state, symbol) {
                    if !reachable.contains(next) {
                        queue.push_back(next);
                    }
                }
            }
        }

        reachable
    }
}

impl FiniteAutomaton for Dfa {
    fn states(&self) -> &BTreeSet<State> {
        Dfa::states(self)
    }

    fn alphabet(&self) -> &BTreeSet<Symbol> {
        Dfa::alphabet(self)
    }

    fn initial_state(&self) -> &str {
        Dfa::initial_state(self)
    }

    fn final_states(&self) -> &BTreeSet<State> {
        Dfa::final_states(self)
    }

    fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        Dfa::accepts(self, word)
    }

    fn edges(&self) -> Edges {
        let mut edges = Edges::new();
        for (from, symbol, to) in self.transitions() {
            edges
                .entry((from.clone(), to.clone()))
                .or_default()
                .insert(symbol.clone());
        }

        edges
    }
}

/// Collects the components of a deterministic automaton from raw labels.
#[derive(Default, Debug, Clone)]
pub struct DfaBuilder {
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    transitions: BTreeMap<(State, Symbol), State>,
    initial_state: State,
    final_states: BTreeSet<State>,
}

impl DfaBuilder {
    pub fn new() -> DfaBuilder {
        DfaBuilder::default()
    }

    pub fn states<S: Into<State>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn alphabet<S: Into<Symbol>>(mut self, symbols: impl IntoIterator<Item = S>) -> Self {
        self.alphabet.extend(symbols.into_iter().map(Into::into));
        self
    }

    pub fn initial_state(mut self, state: impl Into<State>) -> Self {
        self.initial_state = state.into();
        self
    }

    pub fn final_states<S: Into<State>>(mut self, states: impl IntoIterator<Item = S>) -> Self {
        self.final_states.extend(states.into_iter().map(Into::into));
        self
    }

    /// Sets the transition of `from` on `symbol`, replacing an earlier one.
    pub fn transition(
        mut self,
        from: impl Into<State>,
        symbol: impl Into<Symbol>,
        to: impl Into<State>,
    ) -> Self {
        self.transitions.insert((from.into(), symbol.into()), to.into());
        self
    }

    pub fn build(self) -> Result<Dfa, AutomatonError> {
        Dfa::new(
            self.states,
            self.alphabet,
            self.transitions,
            self.initial_state,
            self.final_states,
        )
    }
}

impl fmt::Display for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of states: {}", self.states.len())?;
        writeln!(f, "Number of symbols: {}", self.alphabet.len())?;
        write!(f, "Number of transitions: {}", self.num_of_transitions())
    }
}

impl fmt::Debug for Dfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self)?;
        writeln!(f, "States: {}", self.states.iter().format(", "))?;
        writeln!(f, "Alphabet: {}", self.alphabet.iter().format(", "))?;
        writeln!(f, "Initial state: {}", self.initial_state)?;
        writeln!(f, "Final states: {}", self.final_states.iter().format(", "))?;

        for (from, symbol, to) in self.transitions() {
            writeln!(f, "{from} --[{symbol}]-> {to}")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_partial_dfa() {
        let dfa = DfaBuilder::new()
            .states(["s0", "s1", "s2"])
            .alphabet(["0", "1"])
            .initial_state("s0")
            .final_states(["s1"])
            .transition("s0", "1", "s1")
            .transition("s1", "0", "s0")
            .build()
            .unwrap();

        assert_eq!(dfa.transition("s0", "1"), Some("s1"));
        assert_eq!(dfa.transition("s0", "0"), None);
        assert!(!dfa.is_total());

        let reachable: Vec<&str> = dfa.reachable_states().into_iter().collect();
        assert_eq!(reachable, vec!["s0", "s1"]);
    }

    #[test]
    fn test_dfa_without_final_states() {
        let dfa = DfaBuilder::new()
            .states(["s0"])
            .alphabet(["a"])
            .initial_state("s0")
            .transition("s0", "a", "s0")
            .build()
            .unwrap();

        assert!(dfa.is_total());
        assert!(dfa.final_states().is_empty());
    }

    #[test]
    fn test_invalid_dfa() {
        let result = DfaBuilder::new()
            .states(["s0"])
            .alphabet(["a"])
            .initial_state("s0")
            .transition("s0", "a", "s1")
            .build();

        assert_eq!(result, Err(AutomatonError::UnknownState("s1".into())));
    }
}
