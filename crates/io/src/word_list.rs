use std::io::Read;
use std::path::Path;

use log::debug;
use streaming_iterator::StreamingIterator;

use crate::error::open_file;
use crate::line_iterator::LineIterator;
use crate::IOError;

/// Reads a newline separated list of words. Every line is trimmed and blank
/// lines are skipped.
pub fn read_words(reader: impl Read) -> Result<Vec<String>, IOError> {
    let mut lines = LineIterator::new(reader);
    let mut words = Vec::new();

    while let Some(line) = lines.next() {
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }

    if let Some(error) = lines.take_error() {
        return Err(error.into());
    }

    debug!("Read {} words", words.len());
    Ok(words)
}

/// Reads the list of words from the file at the given path.
pub fn load_words(path: impl AsRef<Path>) -> Result<Vec<String>, IOError> {
    read_words(open_file(path.as_ref())?)
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use test_log::test;

    use super::*;

    #[test]
    fn test_read_words() {
        let input = indoc! {"
            ab
              aab  

            b
        "};

        let words = read_words(input.as_bytes()).unwrap();
        assert_eq!(words, vec!["ab", "aab", "b"]);
    }

    #[test]
    fn test_missing_word_file() {
        let result = load_words("this/file/does/not/exist.txt");
        assert!(matches!(result, Err(IOError::NotFound(_))));
    }
}
