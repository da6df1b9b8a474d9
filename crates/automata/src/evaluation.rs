use log::trace;

use crate::Dfa;
use crate::Nfa;
use crate::StateSet;

impl Nfa {
    /// Simulates the automaton on the given word by tracking the set of
    /// states it can be in.
    ///
    /// A symbol outside of the alphabet rejects the word, and the simulation
    /// stops as soon as the set of current states becomes empty.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let mut current = StateSet::from([self.initial_state().to_string()]);

        for symbol in word {
            let symbol = symbol.as_ref();
            if !self.alphabet().contains(symbol) {
                trace!("Symbol {symbol} is not in the alphabet");
                return false;
            }

            current = self.move_states(&current, symbol);
            if current.is_empty() {
                trace!("No transition on symbol {symbol}");
                return false;
            }
        }

        self.contains_final(&current)
    }
}

impl Dfa {
    /// Simulates the automaton on the given word. A symbol outside of the
    /// alphabet, or an undefined transition, rejects the word.
    pub fn accepts<S: AsRef<str>>(&self, word: &[S]) -> bool {
        let mut current = self.initial_state();

        for symbol in word {
            let symbol = symbol.as_ref();
            if !self.alphabet().contains(symbol) {
                trace!("Symbol {symbol} is not in the alphabet");
                return false;
            }

            match self.transition(current, symbol) {
                Some(next) => current = next,
                None => {
                    trace!("No transition from {current} on symbol {symbol}");
                    return false;
                }
            }
        }

        self.final_states().contains(current)
    }
}
