use thiserror::Error;

/// The reasons for rejecting the components of an automaton at construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    #[error("The automaton must have at least one state")]
    NoStates,

    #[error("The alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("The automaton must have at least one final state")]
    NoFinalStates,

    #[error("Initial state {0} is not one of the states")]
    UnknownInitialState(String),

    #[error("Final state {0} is not one of the states")]
    UnknownFinalState(String),

    #[error("Transition refers to state {0} which is not one of the states")]
    UnknownState(String),

    #[error("Transition refers to symbol {0} which is not in the alphabet")]
    UnknownSymbol(String),

    #[error("Symbol {0:?} is empty or reserved for the empty word")]
    ReservedSymbol(String),

    #[error("State label {0:?} is empty, reserved or contains one of ',', '{{' and '}}'")]
    InvalidStateLabel(String),
}
