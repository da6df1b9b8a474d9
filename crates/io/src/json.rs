use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use log::debug;
use log::trace;
use nfadfa_automata::Dfa;
use nfadfa_automata::Nfa;
use nfadfa_automata::State;
use nfadfa_automata::StateSet;
use nfadfa_automata::Symbol;
use serde::Deserialize;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::open_file;
use crate::IOError;

/// The persisted form of an automaton, the field names are part of the format.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct AutomatonRecord {
    #[serde(rename = "estados")]
    states: Vec<State>,

    #[serde(rename = "alfabeto")]
    alphabet: Vec<Symbol>,

    #[serde(rename = "estado_inicial")]
    initial_state: State,

    #[serde(rename = "estados_finales")]
    final_states: Vec<State>,

    #[serde(rename = "transiciones")]
    transitions: Vec<TransitionRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
struct TransitionRecord {
    #[serde(rename = "origen")]
    from: State,

    #[serde(rename = "simbolo")]
    symbol: Symbol,

    #[serde(rename = "destinos")]
    destinations: Vec<State>,
}

/// Reads a nondeterministic automaton in the JSON format:
///
/// ```json
/// {
///     "estados": ["q0", "q1"],
///     "alfabeto": ["a"],
///     "estado_inicial": "q0",
///     "estados_finales": ["q1"],
///     "transiciones": [
///         { "origen": "q0", "simbolo": "a", "destinos": ["q0", "q1"] }
///     ]
/// }
/// ```
///
/// Every list is read as a set. Several records for the same origin and symbol
/// are merged into the union of their destinations, as
/// [nfadfa_automata::NfaBuilder::transition] does, so a later record never
/// replaces an earlier one. Records without destinations are ignored.
pub fn read_nfa(reader: impl Read) -> Result<Nfa, IOError> {
    let record: AutomatonRecord = serde_json::from_reader(BufReader::new(reader))?;

    let mut transitions: BTreeMap<(State, Symbol), StateSet> = BTreeMap::new();
    for transition in record.transitions {
        trace!(
            "Read transition ({}, {}) -> {:?}",
            transition.from,
            transition.symbol,
            transition.destinations
        );

        transitions
            .entry((transition.from, transition.symbol))
            .or_default()
            .extend(transition.destinations);
    }

    let nfa = Nfa::new(
        record.states.into_iter().collect(),
        record.alphabet.into_iter().collect(),
        transitions,
        record.initial_state,
        record.final_states.into_iter().collect(),
    )?;

    debug!("Read nondeterministic automaton\n{nfa}");
    Ok(nfa)
}

/// Writes the nondeterministic automaton in the JSON format of [read_nfa],
/// with every list in sorted order.
pub fn write_nfa(writer: impl Write, nfa: &Nfa) -> Result<(), IOError> {
    let record = AutomatonRecord {
        states: nfa.states().iter().cloned().collect(),
        alphabet: nfa.alphabet().iter().cloned().collect(),
        initial_state: nfa.initial_state().to_string(),
        final_states: nfa.final_states().iter().cloned().collect(),
        transitions: nfa
            .transitions()
            .map(|(from, symbol, destinations)| TransitionRecord {
                from: from.clone(),
                symbol: symbol.clone(),
                destinations: destinations.iter().cloned().collect(),
            })
            .collect(),
    };

    write_record(writer, &record)
}

/// Reads a deterministic automaton in the JSON format of [read_nfa], where
/// every transition record has exactly one destination.
pub fn read_dfa(reader: impl Read) -> Result<Dfa, IOError> {
    let record: AutomatonRecord = serde_json::from_reader(BufReader::new(reader))?;

    let mut transitions: BTreeMap<(State, Symbol), State> = BTreeMap::new();
    for transition in record.transitions {
        let [to] = <[State; 1]>::try_from(transition.destinations).map_err(|destinations| {
            IOError::NotDeterministic {
                from: transition.from.clone(),
                symbol: transition.symbol.clone(),
                count: destinations.len(),
            }
        })?;

        let key = (transition.from, transition.symbol);
        if let Some(previous) = transitions.get(&key) {
            if *previous != to {
                return Err(IOError::NotDeterministic {
                    from: key.0,
                    symbol: key.1,
                    count: 2,
                });
            }
        }

        transitions.insert(key, to);
    }

    let dfa = Dfa::new(
        record.states.into_iter().collect(),
        record.alphabet.into_iter().collect(),
        transitions,
        record.initial_state,
        record.final_states.into_iter().collect(),
    )?;

    debug!("Read deterministic automaton\n{dfa}");
    Ok(dfa)
}

/// Writes the deterministic automaton in the JSON format of [read_dfa].
pub fn write_dfa(writer: impl Write, dfa: &Dfa) -> Result<(), IOError> {
    let record = AutomatonRecord {
        states: dfa.states().iter().cloned().collect(),
        alphabet: dfa.alphabet().iter().cloned().collect(),
        initial_state: dfa.initial_state().to_string(),
        final_states: dfa.final_states().iter().cloned().collect(),
        transitions: dfa
            .transitions()
            .map(|(from, symbol, to)| TransitionRecord {
                from: from.clone(),
                symbol: symbol.clone(),
                destinations: vec![to.clone()],
            })
            .collect(),
    };

    write_record(writer, &record)
}

/// Loads a nondeterministic automaton from the file at the given path.
pub fn load_nfa(path: impl AsRef<Path>) -> Result<Nfa, IOError> {
    read_nfa(open_file(path.as_ref())?)
}

/// Loads a deterministic automaton from the file at the given path.
pub fn load_dfa(path: impl AsRef<Path>) -> Result<Dfa, IOError> {
    read_dfa(open_file(path.as_ref())?)
}

/// Saves the nondeterministic automaton to the file at the given path.
pub fn save_nfa(path: impl AsRef<Path>, nfa: &Nfa) -> Result<(), IOError> {
    write_nfa(BufWriter::new(File::create(path)?), nfa)
}

/// Saves the deterministic automaton to the file at the given path.
pub fn save_dfa(path: impl AsRef<Path>, dfa: &Dfa) -> Result<(), IOError> {
    write_dfa(BufWriter::new(File::create(path)?), dfa)
}

/// Writes the record indented by four spaces, followed by a newline.
fn write_record(mut writer: impl Write, record: &AutomatonRecord) -> Result<(), IOError> {
    {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
        record.serialize(&mut serializer)?;
    }

    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use nfadfa_automata::subset_construction;
    use nfadfa_automata::AutomatonError;
    use nfadfa_automata::FiniteAutomaton;
    use temp_dir::TempDir;
    use test_log::test;

    use super::*;

    const ENDS_IN_AB: &str = indoc! {r#"
        {
            "estados": ["q0", "q1", "q2"],
            "alfabeto": ["a", "b"],
            "estado_inicial": "q0",
            "estados_finales": ["q2"],
            "transiciones": [
                {"origen": "q0", "simbolo": "a", "destinos": ["q1", "q0"]},
                {"origen": "q0", "simbolo": "b", "destinos": ["q0"]},
                {"origen": "q1", "simbolo": "b", "destinos": ["q2"]}
            ]
        }
    "#};

    #[test]
    fn test_read_nfa() {
        let nfa = read_nfa(ENDS_IN_AB.as_bytes()).unwrap();

        assert_eq!(nfa.states().len(), 3);
        assert_eq!(nfa.transition("q0", "a").len(), 2);
        assert!(nfa.accepts_text("ab"));
        assert!(!nfa.accepts_text("a"));
    }

    #[test]
    fn test_write_nfa_sorted() {
        let nfa = read_nfa(ENDS_IN_AB.as_bytes()).unwrap();

        let mut buffer = Vec::new();
        write_nfa(&mut buffer, &nfa).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        assert!(text.starts_with("{\n    \"estados\": [\n        \"q0\","));
        let destinations = "\"destinos\": [\n                \"q0\",\n                \"q1\"\n";
        assert!(text.contains(destinations));
        assert_eq!(read_nfa(text.as_bytes()).unwrap(), nfa);
    }

    #[test]
    fn test_merge_duplicate_records() {
        let input = indoc! {r#"
            {
                "estados": ["q0", "q1", "q1"],
                "alfabeto": ["a"],
                "estado_inicial": "q0",
                "estados_finales": ["q1"],
                "transiciones": [
                    {"origen": "q0", "simbolo": "a", "destinos": ["q0"]},
                    {"origen": "q0", "simbolo": "a", "destinos": ["q1"]},
                    {"origen": "q1", "simbolo": "a", "destinos": []}
                ]
            }
        "#};

        let nfa = read_nfa(input.as_bytes()).unwrap();
        assert_eq!(nfa.states().len(), 2);
        assert_eq!(nfa.transition("q0", "a").len(), 2);
        assert!(nfa.transition("q1", "a").is_empty());
    }

    #[test]
    fn test_later_record_does_not_replace() {
        let input = indoc! {r#"
            {
                "estados": ["q0", "q1"],
                "alfabeto": ["a"],
                "estado_inicial": "q0",
                "estados_finales": ["q1"],
                "transiciones": [
                    {"origen": "q0", "simbolo": "a", "destinos": ["q1"]},
                    {"origen": "q0", "simbolo": "a", "destinos": ["q0"]}
                ]
            }
        "#};

        let nfa = read_nfa(input.as_bytes()).unwrap();
        assert!(nfa.transition("q0", "a").contains("q1"));
        assert!(nfa.accepts_text("a"));
    }

    #[test]
    fn test_invalid_nfa() {
        let input = indoc! {r#"
            {
                "estados": ["q0"],
                "alfabeto": ["a"],
                "estado_inicial": "q1",
                "estados_finales": ["q0"],
                "transiciones": []
            }
        "#};

        let result = read_nfa(input.as_bytes());
        assert!(matches!(
            result,
            Err(IOError::InvalidAutomaton(AutomatonError::UnknownInitialState(_)))
        ));

        assert!(matches!(read_nfa("{}".as_bytes()), Err(IOError::Json(_))));
    }

    #[test]
    fn test_dfa_roundtrip() {
        let nfa = read_nfa(ENDS_IN_AB.as_bytes()).unwrap();
        let dfa = subset_construction(&nfa);

        let mut buffer = Vec::new();
        write_dfa(&mut buffer, &dfa).unwrap();

        assert_eq!(read_dfa(buffer.as_slice()).unwrap(), dfa);
    }

    #[test]
    fn test_dfa_multiple_destinations() {
        let result = read_dfa(ENDS_IN_AB.as_bytes());

        assert!(matches!(
            result,
            Err(IOError::NotDeterministic { count: 2, .. })
        ));
    }

    #[test]
    fn test_save_and_load() {
        let directory = TempDir::new().unwrap();
        let nfa = read_nfa(ENDS_IN_AB.as_bytes()).unwrap();
        let dfa = subset_construction(&nfa);

        let nfa_path = directory.child("ends_in_ab.json");
        save_nfa(&nfa_path, &nfa).unwrap();
        assert_eq!(load_nfa(&nfa_path).unwrap(), nfa);

        let dfa_path = directory.child("ends_in_ab_dfa.json");
        save_dfa(&dfa_path, &dfa).unwrap();
        assert_eq!(load_dfa(&dfa_path).unwrap(), dfa);

        // The saved file is identical to the output of the writer.
        let mut buffer = Vec::new();
        write_nfa(&mut buffer, &nfa).unwrap();
        assert_eq!(std::fs::read(&nfa_path).unwrap(), buffer);
    }

    #[test]
    fn test_missing_file() {
        let result = load_nfa("this/file/does/not/exist.json");
        assert!(matches!(result, Err(IOError::NotFound(_))));
    }
}
