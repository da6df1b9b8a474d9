use std::io;
use std::io::Write;
use std::path::Path;

use anyhow::bail;
use log::info;
use nfadfa_automata::enumerate_words;
use nfadfa_automata::format_word;
use nfadfa_automata::parse_word;
use nfadfa_automata::Dfa;
use nfadfa_automata::FiniteAutomaton;
use nfadfa_automata::Nfa;
use nfadfa_automata::NfaBuilder;
use nfadfa_automata::Word;
use nfadfa_io::word_list::load_words;
use nfadfa_io::IOError;

/// The maximum length of generated words when no other source is given.
pub const DEFAULT_MAX_LENGTH: usize = 3;

/// The words to evaluate, from the command line, a file, and generated ones.
#[derive(Debug, Default, Clone)]
pub struct WordSources<'a> {
    pub words: &'a [String],
    pub file: Option<&'a Path>,
    pub max_length: Option<usize>,
}

/// Collects the words of all sources, in the order command line, file and
/// generated. Without any source all words up to [DEFAULT_MAX_LENGTH] are
/// generated.
pub fn collect_words(
    automaton: &impl FiniteAutomaton,
    sources: &WordSources<'_>,
) -> Result<Vec<Word>, IOError> {
    let alphabet = automaton.alphabet();
    let mut result: Vec<Word> = sources
        .words
        .iter()
        .map(|text| parse_word(text, alphabet))
        .collect();

    if let Some(path) = sources.file {
        let lines = load_words(path)?;
        info!("Loaded {} words from {}", lines.len(), path.display());
        result.extend(lines.iter().map(|text| parse_word(text, alphabet)));
    }

    let max_length = match sources.max_length {
        Some(max_length) => Some(max_length),
        None if sources.words.is_empty() && sources.file.is_none() => Some(DEFAULT_MAX_LENGTH),
        None => None,
    };

    if let Some(max_length) = max_length {
        let generated = enumerate_words(alphabet, max_length);
        info!("Generated {} words up to length {max_length}", generated.len());
        result.extend(generated);
    }

    Ok(result)
}

/// Builds a nondeterministic automaton from raw labels. Every transition is
/// written as `origin,symbol,destination...`, and transitions for the same
/// origin and symbol are combined.
pub fn build_nfa(
    states: &[String],
    alphabet: &[String],
    initial_state: &str,
    final_states: &[String],
    transitions: &[String],
) -> anyhow::Result<Nfa> {
    let mut builder = NfaBuilder::new()
        .states(states.iter().map(|state| state.trim()))
        .alphabet(alphabet.iter().map(|symbol| symbol.trim()))
        .initial_state(initial_state.trim())
        .final_states(final_states.iter().map(|state| state.trim()));

    for text in transitions {
        let mut fields = text.split(',').map(str::trim);
        let (Some(from), Some(symbol)) = (fields.next(), fields.next()) else {
            bail!("Transition '{text}' is not of the form origin,symbol,destination...");
        };

        builder = builder.transition(from, symbol, fields);
    }

    Ok(builder.build()?)
}

/// Writes whether the automaton is deterministic, with the reason if it is not.
pub fn write_determinism(mut f: impl Write, nfa: &Nfa) -> io::Result<()> {
    let determinism = nfa.determinism();

    if determinism.is_nondeterministic() {
        writeln!(f, "The automaton is nondeterministic: {determinism}")
    } else {
        writeln!(f, "The automaton is deterministic")
    }
}

/// The outcome of a word on the nondeterministic automaton and on the result
/// of its conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub word: Word,
    pub nfa: bool,
    pub dfa: bool,
}

impl Comparison {
    pub fn agrees(&self) -> bool {
        self.nfa == self.dfa
    }
}

/// Evaluates every word on both automata.
pub fn compare(nfa: &Nfa, dfa: &Dfa, words: &[Word]) -> Vec<Comparison> {
    words
        .iter()
        .map(|word| Comparison {
            word: word.clone(),
            nfa: nfa.accepts(word),
            dfa: dfa.accepts(word),
        })
        .collect()
}

/// Writes the comparisons as a table and returns true iff the automata agree
/// on every word.
pub fn write_comparison(mut f: impl Write, comparisons: &[Comparison]) -> io::Result<bool> {
    writeln!(f, "{:<15} {:<12} {:<12} {:<8}", "Word", "NFA", "DFA", "Agrees")?;
    writeln!(f, "{}", "-".repeat(52))?;

    for comparison in comparisons {
        writeln!(
            f,
            "{:<15} {:<12} {:<12} {:<8}",
            format!("'{}'", format_word(&comparison.word)),
            verdict(comparison.nfa),
            verdict(comparison.dfa),
            if comparison.agrees() { "yes" } else { "NO" }
        )?;
    }

    let agree = comparisons.iter().all(Comparison::agrees);
    if agree {
        writeln!(f, "\nBoth automata agree on all {} words.", comparisons.len())?;
    } else {
        let num_of_disagreements = comparisons.iter().filter(|c| !c.agrees()).count();
        writeln!(f, "\nThe automata disagree on {num_of_disagreements} words.")?;
    }

    Ok(agree)
}

/// Evaluates every word on the automaton and writes the verdicts.
pub fn write_evaluation(
    mut f: impl Write,
    name: &str,
    automaton: &impl FiniteAutomaton,
    words: &[Word],
) -> io::Result<()> {
    writeln!(f, "Evaluating on {name}")?;
    writeln!(f, "{}", "-".repeat(40))?;

    for word in words {
        writeln!(
            f,
            "  '{}' -> {}",
            format_word(word),
            verdict(automaton.accepts(word))
        )?;
    }

    Ok(())
}

fn verdict(accepted: bool) -> &'static str {
    if accepted {
        "ACCEPTED"
    } else {
        "REJECTED"
    }
}
