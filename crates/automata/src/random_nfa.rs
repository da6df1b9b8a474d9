use std::collections::BTreeMap;
use std::collections::BTreeSet;

use rand::Rng;

use crate::Nfa;
use crate::State;
use crate::StateSet;
use crate::Symbol;

/// Generates a nondeterministic automaton with states `q0, q1, ...`, symbols
/// `a, b, ...` and for every state at most `outdegree` outgoing transitions.
/// The initial state is `q0` and at least one state is final.
///
/// # Panics
///
/// When there are no states, or the number of symbols is not in 1..=26.
pub fn random_nfa(
    rng: &mut impl Rng,
    num_of_states: usize,
    num_of_symbols: u32,
    outdegree: usize,
) -> Nfa {
    assert!(num_of_states > 0, "An automaton needs at least one state");
    assert!(
        (1..=26).contains(&num_of_symbols),
        "The symbols are lower case letters"
    );

    let states: Vec<State> = (0..num_of_states).map(|i| format!("q{i}")).collect();

    // Introduce lower case letters for the symbols.
    let alphabet: Vec<Symbol> = (0..num_of_symbols)
        .filter_map(|i| char::from_digit(i + 10, 36))
        .map(String::from)
        .collect();

    let mut transitions: BTreeMap<State, BTreeMap<Symbol, StateSet>> = BTreeMap::new();
    for from in &states {
        // Introduce outgoing transitions for this state based on the desired out degree.
        for _ in 0..rng.random_range(0..=outdegree) {
            let symbol = &alphabet[rng.random_range(0..alphabet.len())];
            let to = &states[rng.random_range(0..states.len())];

            transitions
                .entry(from.clone())
                .or_default()
                .entry(symbol.clone())
                .or_default()
                .insert(to.clone());
        }
    }

    let mut final_states: BTreeSet<State> = states
        .iter()
        .filter(|_| rng.random_bool(0.3))
        .cloned()
        .collect();
    if final_states.is_empty() {
        final_states.insert(states[rng.random_range(0..states.len())].clone());
    }

    Nfa::from_parts(
        states.iter().cloned().collect(),
        alphabet.into_iter().collect(),
        transitions,
        "q0".to_string(),
        final_states,
    )
}
