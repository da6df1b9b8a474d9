use std::collections::BTreeSet;

use itertools::Itertools;

use crate::Symbol;
use crate::EMPTY_WORD;

/// A finite sequence of symbols.
pub type Word = Vec<Symbol>;

/// Returns all words over the alphabet of at most `max_length` symbols,
/// ordered by length and then by the order of the alphabet. The first word is
/// always the empty word.
pub fn enumerate_words(alphabet: &BTreeSet<Symbol>, max_length: usize) -> Vec<Word> {
    let mut words = vec![Word::new()];

    for length in 1..=max_length {
        words.extend(
            (0..length)
                .map(|_| alphabet.iter().cloned())
                .multi_cartesian_product(),
        );
    }

    words
}

/// Splits the text into symbols. When every symbol of the alphabet is a single
/// character the text is split into characters, otherwise it is split on
/// whitespace. The text [EMPTY_WORD] denotes the empty word.
pub fn parse_word(input: &str, alphabet: &BTreeSet<Symbol>) -> Word {
    if input == EMPTY_WORD {
        return Word::new();
    }

    if alphabet.iter().all(|symbol| symbol.chars().count() == 1) {
        input.chars().map(String::from).collect()
    } else {
        input.split_whitespace().map(String::from).collect()
    }
}

/// Formats a word such that [parse_word] reads it back, and the empty word as
/// [EMPTY_WORD].
pub fn format_word<S: AsRef<str>>(word: &[S]) -> String {
    if word.is_empty() {
        EMPTY_WORD.to_string()
    } else if word.iter().all(|symbol| symbol.as_ref().chars().count() == 1) {
        word.iter().map(|symbol| symbol.as_ref()).collect::<String>()
    } else {
        word.iter().map(|symbol| symbol.as_ref()).join(" ")
    }
}
