use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::check_components;
use crate::check_transition;
use crate::is_valid_state_label;
use crate::AutomatonError;
use crate::Edges;
use crate::FiniteAutomaton;
use crate::State;
use crate::StateSet;
use crate::Symbol;

/// The destination set of every undefined transition.
static NO_STATES: StateSet = StateSet::new();

/// A nondeterministic finite automaton, in which a pair of a state and a
/// symbol leads to any number of states.
///
/// The automaton is immutable once constructed. Transitions that lead to the
/// empty set are not stored, so an absent transition and a transition to the
/// empty set are indistinguishable.
#[derive(Clone, PartialEq, Eq)]
pub struct Nfa {
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    transitions: BTreeMap<State, BTreeMap<Symbol, StateSet>>,

    initial_state: State,
    final_states: BTreeSet<State>,
}

impl Nfa {
    /// Creates a nondeterministic automaton from its components, and checks
    /// that they are consistent.
    ///
    /// The states and the alphabet must be non-empty, the initial state and
    /// the (at least one) final states must be states, and the transitions
    /// may only refer to states and symbols of the automaton. State labels
    /// must be usable in canonical subset names, see [is_valid_state_label].
    pub fn new(
        states: BTreeSet<State>,
        alphabet: BTreeSet<Symbol>,
        transitions: BTreeMap<(State, Symbol), StateSet>,
        initial_state: State,
        final_states: BTreeSet<State>,
    ) -> Result<Nfa, AutomatonError> {
        check_components(&states, &alphabet, &initial_state, &final_states)?;

        if let Some(state) = states.iter().find(|state| !is_valid_state_label(state)) {
            return Err(AutomatonError::InvalidStateLabel(state.clone()));
        }

        if final_states.is_empty() {
            return Err(AutomatonError::NoFinalStates);
        }

        let mut nested: BTreeMap<State, BTreeMap<Symbol, StateSet>> = BTreeMap::new();
        for ((from, symbol), destinations) in transitions {
            check_transition(&states, &alphabet, &from, &symbol, &destinations)?;

            if !destinations.is_empty() {
                nested.entry(from).or_default().insert(symbol, destinations);
            }
        }

        Ok(Nfa::from_parts(states, alphabet, nested, initial_state, final_states))
    }

    /// Creates the automaton without checking its components.
    pub(crate) fn from_parts(
        states: BTreeSet<State>,
        alphabet: BTreeSet<Symbol>,
        transitions: BTreeMap<State, BTreeMap<Symbol, StateSet>>,
        initial_state: State,
        final_states: BTreeSet<State>,
    ) -> Nfa {
        Nfa {
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

    /// Returns the states reached from `state` on `symbol`, which is empty
    /// when no transition is defined.
    pub fn transition(&self, state: &str, symbol: &str) -> &StateSet {
        self.transitions
            .get(state)
            .and_then(|outgoing| outgoing.get(symbol))
            .unwrap_or(&NO_STATES)
    }

    /// Returns the union of the transitions of all the given states on `symbol`.
    pub fn move_states(&self, states: &StateSet, symbol: &str) -> StateSet {
        let mut result = StateSet::new();
        for state in states {
            result.extend(self.transition(state, symbol).iter().cloned());
        }

        result
    }

    /// Returns true iff one of the given states is a final state.
    pub fn contains_final(&self, states: &StateSet) -> bool {
        states.iter().any(|state| self.final_states.contains(state))
    }

    /// Iterates over all defined transitions (from, symbol, destinations) in
    /// canonical order.
    pub fn transitions(&self) -> impl Iterator<Item = (&State, &Symbol, &StateSet)> + '_ {
        self.transitions.iter().flat_map(|(from, outgoing)| {
            outgoing
                .iter()
                .map(move |(symbol, destinations)| (from, symbol, destinations))
        })
    }

    /// Returns the number of (from, symbol, to) triples.
    pub fn num_of_transitions(&self) -> usize {
        self.transitions()
            .map(|(_, _, destinations)| destinations.len())
            .sum()
    }
}

impl FiniteAutomaton for Nfa {
    fn states(&self) -> &BTreeSet<State> {
        Nfa::states(self)
    }

    fn alphabet(&self) -> &BTreeSet<Symbol> {
        Nfa::alphabet(self)
    }

    fn initial_state(&self) -> &str {
        Nfa::initial_state(self)
    }

    fn final_states(&self) -> &BTreeSet<State> {
        Nfa::final_states(self)
    }

    fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        Nfa::accepts(self, word)
    }

    fn edges(&self) -> Edges {
        let mut edges = Edges::new();
        for (from, symbol, destinations) in self.transitions() {
            for to in destinations {
                edges
                    .entry((from.clone(), to.clone()))
                    .or_default()
                    .insert(symbol.clone());
            }
        }

        edges
    }
}

/// Collects the components of a nondeterministic automaton from raw labels.
///
/// # Example
///
/// ```
/// use nfadfa_automata::NfaBuilder;
///
/// let nfa = NfaBuilder::new()
///     .states(["q0", "q1"])
///     .alphabet(["a"])
///     .initial_state("q0")
///     .final_states(["q1"])
///     .transition("q0", "a", ["q0", "q1"])
///     .build()
///     .unwrap();
///
/// assert!(nfa.accepts(&["a"]));
/// ```
#[derive(Default, Debug, Clone)]
pub struct NfaBuilder {
    states: BTreeSet<State>,
    alphabet: BTreeSet<Symbol>,
    transitions: BTreeMap<(State, Symbol), StateSet>,
    initial_state: State,
    final_states: BTreeSet<State>,
}

impl NfaBuilder {
    pub fn new() -> NfaBuilder {
        NfaBuilder::default()
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

    /// Adds the destinations to the transition of `from` on `symbol`, earlier
    /// destinations for the same pair are kept.
    pub fn transition<S: Into<State>>(
        mut self,
        from: impl Into<State>,
        symbol: impl Into<Symbol>,
        destinations: impl IntoIterator<Item = S>,
    ) -> Self {
        self.transitions
            .entry((from.into(), symbol.into()))
            .or_default()
            .extend(destinations.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<Nfa, AutomatonError> {
        Nfa::new(
            self.states,
            self.alphabet,
            self.transitions,
            self.initial_state,
            self.final_states,
        )
    }
}

impl fmt::Display for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of states: {}", self.states.len())?;
        writeln!(f, "Number of symbols: {}", self.alphabet.len())?;
        write!(f, "Number of transitions: {}", self.num_of_transitions())
    }
}

impl fmt::Debug for Nfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self)?;
        writeln!(f, "States: {}", self.states.iter().format(", "))?;
        writeln!(f, "Alphabet: {}", self.alphabet.iter().format(", "))?;
        writeln!(f, "Initial state: {}", self.initial_state)?;
        writeln!(f, "Final states: {}", self.final_states.iter().format(", "))?;

        for (from, symbol, destinations) in self.transitions() {
            for to in destinations {
                writeln!(f, "{from} --[{symbol}]-> {to}")?;
            }
        }

        Ok(())
    }
}
