use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::fmt;

use log::debug;
use log::trace;
use rustc_hash::FxHashSet;

use crate::subset_name;
use crate::Dfa;
use crate::Nfa;
use crate::State;
use crate::StateSet;
use crate::Symbol;

/// A step of the subset construction, in the order in which it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionEvent {
    /// The subset of the initial state became the initial state.
    Initial { state: State, is_final: bool },

    /// A transition of the deterministic automaton was recorded.
    Transition { from: State, symbol: Symbol, to: State },

    /// A new subset was discovered and will be explored.
    Discovered { state: State, is_final: bool },
}

/// Converts the nondeterministic automaton into a deterministic automaton
/// whose states are the subsets of states reachable from `{initial}`.
///
/// Every subset gets a transition for every symbol, the empty subset included,
/// so the result is total. Subsets that cannot be reached are never created.
pub fn subset_construction(nfa: &Nfa) -> Dfa {
    convert(nfa, |_| {})
}

/// Same as [subset_construction], but also returns the steps that were taken.
pub fn subset_construction_traced(nfa: &Nfa) -> (Dfa, Vec<ConversionEvent>) {
    let mut events = Vec::new();
    let dfa = convert(nfa, |event| events.push(event));
    (dfa, events)
}

fn convert(nfa: &Nfa, mut report: impl FnMut(ConversionEvent)) -> Dfa {
    let mut states: BTreeSet<State> = BTreeSet::new();
    let mut final_states: BTreeSet<State> = BTreeSet::new();
    let mut transitions: BTreeMap<State, BTreeMap<Symbol, State>> = BTreeMap::new();

    let initial_subset = StateSet::from([nfa.initial_state().to_string()]);
    let initial_state = subset_name(&initial_subset);
    let initial_is_final = nfa.contains_final(&initial_subset);

    states.insert(initial_state.clone());
    if initial_is_final {
        final_states.insert(initial_state.clone());
    }
    report(ConversionEvent::Initial {
        state: initial_state.clone(),
        is_final: initial_is_final,
    });

    // The subsets are identified by their contents, the names only follow.
    let mut discovered: FxHashSet<StateSet> = FxHashSet::default();
    discovered.insert(initial_subset.clone());
    let mut queue = VecDeque::from([initial_subset]);

    while let Some(subset) = queue.pop_front() {
        let name = subset_name(&subset);
        let outgoing = transitions.entry(name.clone()).or_default();

        for symbol in nfa.alphabet() {
            let target = nfa.move_states(&subset, symbol);
            let target_name = subset_name(&target);

            trace!("δ({name}, {symbol}) = {target_name}");
            outgoing.insert(symbol.clone(), target_name.clone());
            report(ConversionEvent::Transition {
                from: name.clone(),
                symbol: symbol.clone(),
                to: target_name.clone(),
            });

            if !discovered.contains(&target) {
                let is_final = nfa.contains_final(&target);

                states.insert(target_name.clone());
                if is_final {
                    final_states.insert(target_name.clone());
                }
                report(ConversionEvent::Discovered {
                    state: target_name,
                    is_final,
                });

                discovered.insert(target.clone());
                queue.push_back(target);
            }
        }
    }

    debug!(
        "Subset construction resulted in {} states, of which {} are final",
        states.len(),
        final_states.len()
    );

    Dfa::from_parts(
        states,
        nfa.alphabet().clone(),
        transitions,
        initial_state,
        final_states,
    )
}

impl fmt::Display for ConversionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionEvent::Initial { state, is_final } => {
                write!(f, "initial state {state}")?;
                if *is_final {
                    write!(f, " (final)")?;
                }
                Ok(())
            }
            ConversionEvent::Transition { from, symbol, to } => {
                write!(f, "δ({from}, {symbol}) = {to}")
            }
            ConversionEvent::Discovered { state, is_final } => {
                write!(f, "discovered {state}")?;
                if *is_final {
                    write!(f, " (final)")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_log::test;

    use crate::enumerate_words;
    use crate::random_nfa;
    use crate::FiniteAutomaton;
    use crate::NfaBuilder;
    use crate::EMPTY_SET_LABEL;

    use super::*;

    fn ends_in_ab() -> Nfa {
        NfaBuilder::new()
            .states(["q0", "q1", "q2"])
            .alphabet(["a", "b"])
            .initial_state("q0")
            .final_states(["q2"])
            .transition("q0", "a", ["q0", "q1"])
            .transition("q0", "b", ["q0"])
            .transition("q1", "b", ["q2"])
            .build()
            .unwrap()
    }

    fn labels(states: &BTreeSet<State>) -> Vec<&str> {
        states.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_ends_in_ab() {
        let dfa = subset_construction(&ends_in_ab());

        assert_eq!(labels(dfa.states()), vec!["{q0,q1}", "{q0,q2}", "{q0}"]);
        assert_eq!(labels(dfa.final_states()), vec!["{q0,q2}"]);
        assert_eq!(dfa.initial_state(), "{q0}");

        assert_eq!(dfa.transition("{q0}", "a"), Some("{q0,q1}"));
        assert_eq!(dfa.transition("{q0}", "b"), Some("{q0}"));
        assert_eq!(dfa.transition("{q0,q1}", "a"), Some("{q0,q1}"));
        assert_eq!(dfa.transition("{q0,q1}", "b"), Some("{q0,q2}"));
        assert_eq!(dfa.transition("{q0,q2}", "a"), Some("{q0,q1}"));
        assert_eq!(dfa.transition("{q0,q2}", "b"), Some("{q0}"));

        assert!(dfa.accepts(&["a", "b"]));
        assert!(!dfa.accepts(&["a"]));
    }

    #[test]
    fn test_dead_state() {
        let nfa = NfaBuilder::new()
            .states(["q0", "q1"])
            .alphabet(["a", "b"])
            .initial_state("q0")
            .final_states(["q1"])
            .transition("q0", "a", ["q1"])
            .build()
            .unwrap();

        let dfa = subset_construction(&nfa);

        assert_eq!(labels(dfa.states()), vec!["{q0}", "{q1}", EMPTY_SET_LABEL]);
        assert_eq!(dfa.transition("{q0}", "b"), Some(EMPTY_SET_LABEL));
        assert_eq!(dfa.transition(EMPTY_SET_LABEL, "a"), Some(EMPTY_SET_LABEL));
        assert_eq!(dfa.transition(EMPTY_SET_LABEL, "b"), Some(EMPTY_SET_LABEL));
        assert!(dfa.is_total());
        assert!(!dfa.is_final(EMPTY_SET_LABEL));
    }

    #[test]
    fn test_initial_final() {
        let nfa = NfaBuilder::new()
            .states(["q0"])
            .alphabet(["a"])
            .initial_state("q0")
            .final_states(["q0"])
            .transition("q0", "a", ["q0"])
            .build()
            .unwrap();

        let dfa = subset_construction(&nfa);
        assert_eq!(labels(dfa.final_states()), vec!["{q0}"]);
        assert!(dfa.accepts::<&str>(&[]));
    }

    #[test]
    fn test_deterministic_input_is_isomorphic() {
        let nfa = NfaBuilder::new()
            .states(["q0", "q1"])
            .alphabet(["a", "b"])
            .initial_state("q0")
            .final_states(["q1"])
            .transition("q0", "a", ["q1"])
            .transition("q0", "b", ["q0"])
            .transition("q1", "a", ["q1"])
            .transition("q1", "b", ["q0"])
            .build()
            .unwrap();

        let dfa = subset_construction(&nfa);

        assert_eq!(dfa.states().len(), 2);
        assert_eq!(dfa.num_of_transitions(), 4);
        for (from, symbol, to) in nfa.transitions() {
            let expected = subset_name(to);
            assert_eq!(
                dfa.transition(&format!("{{{from}}}"), symbol),
                Some(expected.as_str())
            );
        }
    }

    #[test]
    fn test_unreachable_states_are_not_created() {
        let nfa = NfaBuilder::new()
            .states(["q0", "q1", "unreachable"])
            .alphabet(["a"])
            .initial_state("q0")
            .final_states(["q1"])
            .transition("q0", "a", ["q1"])
            .transition("q1", "a", ["q1"])
            .transition("unreachable", "a", ["q0", "q1"])
            .build()
            .unwrap();

        let dfa = subset_construction(&nfa);

        assert_eq!(labels(dfa.states()), vec!["{q0}", "{q1}"]);
        assert_eq!(dfa.reachable_states().len(), dfa.states().len());
    }

    #[test]
    fn test_trace() {
        let (dfa, events) = subset_construction_traced(&ends_in_ab());

        assert_eq!(
            events.first(),
            Some(&ConversionEvent::Initial {
                state: "{q0}".into(),
                is_final: false
            })
        );

        let num_of_recorded = events
            .iter()
            .filter(|event| matches!(event, ConversionEvent::Transition { .. }))
            .count();
        assert_eq!(num_of_recorded, dfa.num_of_transitions());

        assert!(events.contains(&ConversionEvent::Discovered {
            state: "{q0,q2}".into(),
            is_final: true
        }));
        assert_eq!(events[1].to_string(), "δ({q0}, a) = {q0,q1}");
    }

    #[test]
    fn test_random_nfa_agreement() {
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..50 {
            let nfa = random_nfa(&mut rng, 5, 2, 3);
            let dfa = subset_construction(&nfa);

            assert!(dfa.is_total(), "{dfa:?}");
            assert_eq!(dfa.reachable_states().len(), dfa.states().len());
            assert_eq!(dfa, subset_construction(&nfa), "Conversion is not deterministic");

            for word in enumerate_words(nfa.alphabet(), 6) {
                assert_eq!(
                    nfa.accepts(&word),
                    dfa.accepts(&word),
                    "Disagreement on {word:?} for {nfa:?}"
                );
            }
        }
    }
}
