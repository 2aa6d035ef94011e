//! Tokenization, stopword removal and lemmatization
//!
//! A light rule-based pipeline for preparing cleaned text for word counts and
//! downstream NLP. The part-of-speech guess is suffix based and only steers
//! which lemmatization rules apply.
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// English stopwords
pub const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

/// Irregular verb forms and their lemma
const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("was", "be"), ("were", "be"), ("is", "be"), ("are", "be"), ("been", "be"), ("am", "be"),
    ("has", "have"), ("had", "have"), ("did", "do"), ("does", "do"), ("done", "do"),
    ("went", "go"), ("gone", "go"), ("paid", "pay"), ("bought", "buy"), ("sold", "sell"),
    ("made", "make"), ("took", "take"), ("taken", "take"), ("rose", "rise"), ("risen", "rise"),
    ("fell", "fall"), ("fallen", "fall"), ("grew", "grow"), ("grown", "grow"), ("lost", "lose"),
    ("spent", "spend"), ("held", "hold"), ("left", "leave"), ("got", "get"), ("gotten", "get"),
    ("saw", "see"), ("seen", "see"), ("said", "say"), ("came", "come"), ("gave", "give"),
    ("given", "give"), ("knew", "know"), ("known", "know"), ("thought", "think"),
    ("told", "tell"), ("found", "find"), ("kept", "keep"), ("began", "begin"),
    ("begun", "begin"), ("brought", "bring"), ("built", "build"), ("sent", "send"),
    ("lent", "lend"), ("owed", "owe"), ("borrowed", "borrow"),
];

/// Irregular noun plurals and their lemma
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("men", "man"), ("women", "woman"), ("children", "child"), ("feet", "foot"),
    ("teeth", "tooth"), ("mice", "mouse"), ("geese", "goose"), ("lives", "life"),
    ("halves", "half"), ("shelves", "shelf"), ("wives", "wife"), ("knives", "knife"),
];

/// Nouns ending in `s` that are not plurals
const INVARIANT_NOUNS: &[&str] = &[
    "news", "series", "species", "means", "economics", "politics", "physics", "mathematics",
    "gas", "bias", "chaos", "plus", "thus", "always", "perhaps", "whereas", "overseas",
];

/// Irregular comparatives
const IRREGULAR_ADJECTIVES: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "al", "ic", "less"];

lazy_static! {
    static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();

    static ref IRREGULAR_VERB_MAP: HashMap<&'static str, &'static str> =
        IRREGULAR_VERBS.iter().copied().collect();

    static ref IRREGULAR_NOUN_MAP: HashMap<&'static str, &'static str> =
        IRREGULAR_NOUNS.iter().copied().collect();

    static ref IRREGULAR_ADJECTIVE_MAP: HashMap<&'static str, &'static str> =
        IRREGULAR_ADJECTIVES.iter().copied().collect();

    /// Words (with inner apostrophes) or single non-space symbols
    static ref TOKEN_REGEX: Regex = Regex::new(
        r"[\p{L}\p{N}]+(?:['’][\p{L}]+)*|[^\s\p{L}\p{N}]"
    ).unwrap();
}

/// Coarse part of speech used to pick lemmatization rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

/// Switches for each preprocessing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub remove_stopwords: bool,
    pub lemmatize: bool,
    pub remove_punctuation: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            lemmatize: true,
            remove_punctuation: true,
        }
    }
}

/// Lowercase, strip punctuation, tokenize, drop stopwords, lemmatize
pub fn preprocess_tokens(text: &str, options: &PreprocessOptions) -> Vec<String> {
    let mut text = text.to_lowercase();

    if options.remove_punctuation {
        text.retain(|c| !c.is_ascii_punctuation());
    }

    let mut tokens = tokenize(&text);

    if options.remove_stopwords {
        tokens.retain(|token| !is_stopword(token));
    }

    if options.lemmatize {
        tokens = tokens
            .into_iter()
            .map(|token| {
                let pos = guess_pos(&token);
                lemmatize(&token, pos)
            })
            .collect();
    }

    tokens
}

/// [`preprocess_tokens`] joined with single spaces
pub fn preprocess(text: &str, options: &PreprocessOptions) -> String {
    preprocess_tokens(text, options).join(" ")
}

/// Split NFC-normalized text into word and symbol tokens
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text.nfc().collect();
    TOKEN_REGEX
        .find_iter(&normalized)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn is_stopword(token: &str) -> bool {
    STOPWORD_SET.contains(token)
}

/// Guess a part of speech from the word's shape
pub fn guess_pos(word: &str) -> PartOfSpeech {
    if IRREGULAR_VERB_MAP.contains_key(word) {
        return PartOfSpeech::Verb;
    }
    if IRREGULAR_ADJECTIVE_MAP.contains_key(word) {
        return PartOfSpeech::Adjective;
    }

    let len = word.chars().count();
    if (word.ends_with("ing") && len > 4) || (word.ends_with("ed") && len > 3) {
        PartOfSpeech::Verb
    } else if word.ends_with("ly") && len > 3 {
        PartOfSpeech::Adverb
    } else if ADJECTIVE_SUFFIXES
        .iter()
        .any(|suffix| word.ends_with(suffix) && len > suffix.len() + 2)
    {
        PartOfSpeech::Adjective
    } else {
        PartOfSpeech::Noun
    }
}

/// Reduce a lowercase word to its dictionary form
pub fn lemmatize(word: &str, pos: PartOfSpeech) -> String {
    match pos {
        PartOfSpeech::Noun => lemmatize_noun(word),
        PartOfSpeech::Verb => lemmatize_verb(word),
        PartOfSpeech::Adjective => IRREGULAR_ADJECTIVE_MAP
            .get(word)
            .map(|lemma| lemma.to_string())
            .unwrap_or_else(|| word.to_string()),
        PartOfSpeech::Adverb => word.to_string(),
    }
}

fn lemmatize_noun(word: &str) -> String {
    if let Some(lemma) = IRREGULAR_NOUN_MAP.get(word) {
        return lemma.to_string();
    }
    if word.len() <= 3 || INVARIANT_NOUNS.contains(&word) || !word.is_ascii() {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return format!("{}y", stem);
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => word.to_string(),
    }
}

fn lemmatize_verb(word: &str) -> String {
    if let Some(lemma) = IRREGULAR_VERB_MAP.get(word) {
        return lemma.to_string();
    }
    if !word.is_ascii() {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ing") {
        if stem.len() >= 2 {
            return restore_stem(stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ied") {
        return format!("{}y", stem);
    }
    if let Some(stem) = word.strip_suffix("ed") {
        if stem.len() >= 2 {
            return restore_stem(stem);
        }
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 3 && !word.ends_with("ss") {
        if let Some(stem) = word.strip_suffix('s') {
            return stem.to_string();
        }
    }
    word.to_string()
}

fn is_vowel(c: u8) -> bool {
    matches!(c, b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Undo consonant doubling (`runn` → `run`) or restore a silent `e` (`trad` → `trade`)
fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();

    if n >= 2 && bytes[n - 1] == bytes[n - 2] && !is_vowel(bytes[n - 1]) {
        if !matches!(bytes[n - 1], b'l' | b's' | b'z') {
            return stem[..n - 1].to_string();
        }
        return stem.to_string();
    }

    if ends_cvc(bytes) && vowel_groups(bytes) == 1 {
        return format!("{}e", stem);
    }

    stem.to_string()
}

/// Consonant-vowel-consonant ending, last consonant not w/x/y
fn ends_cvc(bytes: &[u8]) -> bool {
    let n = bytes.len();
    n >= 3
        && !is_vowel(bytes[n - 3])
        && is_vowel(bytes[n - 2])
        && !is_vowel(bytes[n - 1])
        && !matches!(bytes[n - 1], b'w' | b'x' | b'y')
}

fn vowel_groups(bytes: &[u8]) -> usize {
    let mut groups = 0;
    let mut in_vowel = false;
    for &b in bytes {
        let vowel = is_vowel(b);
        if vowel && !in_vowel {
            groups += 1;
        }
        in_vowel = vowel;
    }
    groups
}
