//! Lexical resources
//!
//! Static dictionaries (first names, surnames, hospitals, cities) loaded
//! into hash sets, plus the phonetic index built from the name lists. Built
//! once at engine construction and shared read-only across concurrently
//! running filters (`Arc<Lexicon>`), so no synchronization is needed on the
//! scan path.
//!
//! The embedded dictionaries ship inside the binary; larger site-specific
//! lists can be loaded from a directory of flat text files (one entry per
//! line, `#` comments ignored) with [`Lexicon::from_dir`].

pub mod phonetic;

use crate::domain::{Result, ScrubError};
use phonetic::{PhoneticIndex, PhoneticMatch};
use std::collections::HashSet;
use std::path::Path;

const EMBEDDED_FIRST_NAMES: &str = include_str!("../../data/first_names.txt");
const EMBEDDED_SURNAMES: &str = include_str!("../../data/surnames.txt");
const EMBEDDED_HOSPITALS: &str = include_str!("../../data/hospitals.txt");
const EMBEDDED_CITIES: &str = include_str!("../../data/cities.txt");

/// Read-only dictionary bundle shared by all filters.
#[derive(Debug)]
pub struct Lexicon {
    first_names: HashSet<String>,
    surnames: HashSet<String>,
    hospitals: HashSet<String>,
    cities: HashSet<String>,
    first_index: PhoneticIndex,
    surname_index: PhoneticIndex,
}

/// Dictionary sizes, for diagnostics and the CLI.
#[derive(Debug, Clone, Copy)]
pub struct LexiconStats {
    pub first_names: usize,
    pub surnames: usize,
    pub hospitals: usize,
    pub cities: usize,
}

impl Lexicon {
    /// Build the lexicon from the dictionaries embedded in the binary.
    pub fn embedded() -> Self {
        Self::from_entries(
            parse_list(EMBEDDED_FIRST_NAMES),
            parse_list(EMBEDDED_SURNAMES),
            parse_list(EMBEDDED_HOSPITALS),
            parse_list(EMBEDDED_CITIES),
        )
    }

    /// Load dictionaries from `<dir>/first_names.txt`, `surnames.txt`,
    /// `hospitals.txt`, and `cities.txt`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::Lexicon`] when a file is missing or unreadable
    /// or when a name list comes out empty.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |file: &str| -> Result<Vec<String>> {
            let path = dir.join(file);
            let contents = std::fs::read_to_string(&path).map_err(|e| {
                ScrubError::Lexicon(format!("failed to read {}: {}", path.display(), e))
            })?;
            Ok(parse_list(&contents))
        };

        let first_names = read("first_names.txt")?;
        let surnames = read("surnames.txt")?;
        let hospitals = read("hospitals.txt")?;
        let cities = read("cities.txt")?;

        if first_names.is_empty() || surnames.is_empty() {
            return Err(ScrubError::Lexicon(format!(
                "name dictionaries in {} are empty",
                dir.display()
            )));
        }

        Ok(Self::from_entries(first_names, surnames, hospitals, cities))
    }

    fn from_entries(
        first_names: Vec<String>,
        surnames: Vec<String>,
        hospitals: Vec<String>,
        cities: Vec<String>,
    ) -> Self {
        let first_index = PhoneticIndex::build(&first_names);
        let surname_index = PhoneticIndex::build(&surnames);
        Self {
            first_names: first_names.into_iter().collect(),
            surnames: surnames.into_iter().collect(),
            hospitals: hospitals.into_iter().collect(),
            cities: cities.into_iter().collect(),
            first_index,
            surname_index,
        }
    }

    pub fn is_first_name(&self, word: &str) -> bool {
        self.first_names.contains(&word.trim().to_ascii_lowercase())
    }

    pub fn is_surname(&self, word: &str) -> bool {
        self.surnames.contains(&word.trim().to_ascii_lowercase())
    }

    pub fn is_city(&self, phrase: &str) -> bool {
        self.cities.contains(&phrase.trim().to_ascii_lowercase())
    }

    pub fn is_hospital(&self, phrase: &str) -> bool {
        self.hospitals.contains(&phrase.trim().to_ascii_lowercase())
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> {
        self.cities.iter().map(String::as_str)
    }

    pub fn hospitals(&self) -> impl Iterator<Item = &str> {
        self.hospitals.iter().map(String::as_str)
    }

    /// Dictionary membership tolerant of OCR character confusions: tries the
    /// raw lowercase token, then the confusion-normalized form, then the
    /// normalized form with doubled characters collapsed.
    pub fn first_name_with_ocr(&self, word: &str) -> bool {
        in_dict_with_ocr(&self.first_names, word)
    }

    pub fn surname_with_ocr(&self, word: &str) -> bool {
        in_dict_with_ocr(&self.surnames, word)
    }

    /// Fuzzy-match a token against both name indexes, keeping the better hit.
    pub fn match_any_name(&self, token: &str) -> Option<PhoneticMatch> {
        let first = self.first_index.lookup(token);
        let surname = self.surname_index.lookup(token);
        match (first, surname) {
            (None, None) => None,
            (Some(m), None) => Some(m),
            (None, Some(m)) => Some(m),
            (Some(a), Some(b)) => {
                if a.confidence >= b.confidence {
                    Some(a)
                } else {
                    Some(b)
                }
            }
        }
    }

    pub fn stats(&self) -> LexiconStats {
        LexiconStats {
            first_names: self.first_names.len(),
            surnames: self.surnames.len(),
            hospitals: self.hospitals.len(),
            cities: self.cities.len(),
        }
    }
}

fn parse_list(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.to_ascii_lowercase())
        .collect()
}

/// Map OCR look-alike characters onto letters for dictionary comparison.
pub fn normalize_for_dict(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        let mapped = match ch {
            '@' => 'a',
            '0' => 'o',
            '1' => 'l',
            '3' => 'e',
            '$' => 's',
            '8' => 'b',
            '9' => 'g',
            '5' => 's',
            '|' => 'l',
            'I' => 'l',
            _ => ch,
        };
        out.push(mapped.to_ascii_lowercase());
    }
    out
}

/// Collapse immediately repeated characters ("Jjohn" -> "John" after
/// normalization), the second OCR fallback.
pub fn deduplicate_chars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;
    for ch in input.chars() {
        if Some(ch) == prev {
            continue;
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}

fn in_dict_with_ocr(set: &HashSet<String>, word: &str) -> bool {
    let lower = word.trim().to_ascii_lowercase();
    if lower.is_empty() {
        return false;
    }
    if set.contains(&lower) {
        return true;
    }

    let normalized = normalize_for_dict(&lower);
    if normalized != lower && set.contains(&normalized) {
        return true;
    }

    let deduped = deduplicate_chars(&normalized);
    deduped != normalized && set.contains(&deduped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_lexicon_loads() {
        let lex = Lexicon::embedded();
        let stats = lex.stats();
        assert!(stats.first_names > 100);
        assert!(stats.surnames > 100);
        assert!(stats.hospitals > 10);
        assert!(stats.cities > 10);
    }

    #[test]
    fn test_dictionary_membership() {
        let lex = Lexicon::embedded();
        assert!(lex.is_first_name("John"));
        assert!(lex.is_surname("Smith"));
        assert!(lex.is_city("Boston"));
        assert!(!lex.is_first_name("inhibitor"));
    }

    #[test]
    fn test_ocr_tolerant_membership() {
        let lex = Lexicon::embedded();
        assert!(lex.first_name_with_ocr("J0hn"));
        assert!(lex.surname_with_ocr("5mith"));
        assert!(!lex.surname_with_ocr("x9z2"));
    }

    #[test]
    fn test_char_dedup() {
        assert_eq!(deduplicate_chars("jjohn"), "john");
        assert_eq!(deduplicate_chars("smith"), "smith");
    }

    #[test]
    fn test_phonetic_any_name_prefers_higher_confidence() {
        let lex = Lexicon::embedded();
        let m = lex.match_any_name("Jhon").expect("near-miss should match");
        assert!(m.confidence >= 0.75);
    }

    #[test]
    fn test_from_dir_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Lexicon::from_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ScrubError::Lexicon(_)));
    }

    #[test]
    fn test_from_dir_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        for (file, body) in [
            ("first_names.txt", "John\nJane\n# comment\n"),
            ("surnames.txt", "Smith\n"),
            ("hospitals.txt", "General Hospital\n"),
            ("cities.txt", "Springfield\n"),
        ] {
            std::fs::write(dir.path().join(file), body).unwrap();
        }

        let lex = Lexicon::from_dir(dir.path()).unwrap();
        assert!(lex.is_first_name("jane"));
        assert!(lex.is_hospital("General Hospital"));
    }
}
