use std::path::Path;
use std::path::PathBuf;

use test_case::test_case;
use test_log::test;

use nfa2dfa::collect_words;
use nfa2dfa::compare;
use nfa2dfa::write_comparison;
use nfa2dfa::Comparison;
use nfa2dfa::WordSources;
use nfadfa_automata::subset_construction;
use nfadfa_io::json::load_nfa;

fn model(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../models").join(name)
}

#[test_case("ends_in_ab.json", 5 ; "ends in ab")]
#[test_case("third_from_last.json", 6 ; "third from last")]
#[test_case("divisible_by_three.json", 6 ; "divisible by three")]
#[test_case("contains_aba.json", 5 ; "contains aba")]
fn test_compare_model(name: &str, max_length: usize) {
    let nfa = load_nfa(model(name)).unwrap();
    let dfa = subset_construction(&nfa);

    let sources = WordSources {
        max_length: Some(max_length),
        ..Default::default()
    };
    let words = collect_words(&nfa, &sources).unwrap();
    let comparisons = compare(&nfa, &dfa, &words);

    assert!(comparisons.iter().all(Comparison::agrees));
    assert!(write_comparison(std::io::sink(), &comparisons).unwrap());
}

#[test]
fn test_words_file() {
    let nfa = load_nfa(model("ends_in_ab.json")).unwrap();
    let dfa = subset_construction(&nfa);

    let path = model("words.txt");
    let sources = WordSources {
        file: Some(path.as_path()),
        ..Default::default()
    };

    let words = collect_words(&nfa, &sources).unwrap();
    assert_eq!(words.len(), 5);

    let accepted: Vec<bool> = compare(&nfa, &dfa, &words)
        .iter()
        .map(|comparison| comparison.dfa)
        .collect();
    assert_eq!(accepted, vec![true, true, true, false, false]);
}
