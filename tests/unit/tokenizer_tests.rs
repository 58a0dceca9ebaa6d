use fastembed_native::embed::WordHashTokenizer;
use fastembed_native::embed::tokenizer::{CLS_TOKEN_ID, SEP_TOKEN_ID};
use fastembed_native::test_utils::{TestCase, run_table_tests};

#[test]
fn token_count_table() -> Result<(), String> {
    let cases = vec![
        TestCase::new("single_word", "hello", Some(3usize)),
        TestCase::new("punctuation_split", "don't stop", Some(5)),
        TestCase::new("whitespace_runs", "  a \t b\n\nc  ", Some(5)),
        TestCase::new("only_punct", "?!", Some(2)),
        TestCase::new("empty", "", None),
    ];

    run_table_tests(cases, |text| {
        WordHashTokenizer::default()
            .encode_ids(text.as_bytes())
            .ok()
            .map(|ids| ids.len())
    })
}

#[test]
fn sequences_are_framed() {
    let ids = WordHashTokenizer::default()
        .encode_ids(b"The quick brown fox")
        .unwrap();
    assert_eq!(ids.first(), Some(&CLS_TOKEN_ID));
    assert_eq!(ids.last(), Some(&SEP_TOKEN_ID));
    assert!(ids[1..ids.len() - 1].iter().all(|id| (100..30_528 + 100).contains(id)));
}

#[test]
fn long_text_respects_max_length() {
    let text = "word ".repeat(1000);
    let tokenizer = WordHashTokenizer::new(30_528, 64);
    let encoded = tokenizer.encode(text.as_bytes()).unwrap();
    assert_eq!(encoded.len(), 64);
    assert_eq!(encoded.attention_mask.len(), 64);
}
