//! Phonetic name index
//!
//! Double-metaphone index over the name dictionaries with a length-bucket
//! blocking scheme so fuzzy lookup stays near O(1) instead of scanning the
//! whole surname list per candidate token. Matching cascades from exact
//! dictionary hit to primary code, secondary code, and finally a bounded
//! Levenshtein pass for short tokens.

use rphonetic::{DoubleMetaphone, Encoder};
use std::collections::{HashMap, HashSet};

const MAX_LEVENSHTEIN_DISTANCE: usize = 2;
const MIN_NAME_LENGTH: usize = 2;

/// How a fuzzy candidate matched the dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Exact dictionary membership after OCR normalization
    Exact,
    /// Primary double-metaphone code bucket
    PhoneticPrimary,
    /// Alternate double-metaphone code bucket
    PhoneticSecondary,
    /// Bounded edit-distance fallback (short tokens only)
    Levenshtein,
}

/// A successful fuzzy dictionary match.
#[derive(Debug, Clone)]
pub struct PhoneticMatch {
    /// Dictionary entry the token resolved to
    pub matched: String,
    /// Confidence tier for the match kind
    pub confidence: f64,
    pub kind: MatchKind,
}

#[derive(Debug, Default)]
pub struct PhoneticIndex {
    primary: HashMap<String, Vec<String>>,
    secondary: HashMap<String, Vec<String>>,
    names: HashSet<String>,
    names_by_len: HashMap<usize, Vec<String>>,
}

impl PhoneticIndex {
    /// Build the index from raw dictionary entries. Entries are trimmed and
    /// lowercased; duplicates and sub-minimum tokens are skipped.
    pub fn build<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut index = PhoneticIndex::default();
        let dm = DoubleMetaphone::default();

        for name in names {
            let normalized = name.as_ref().trim().to_ascii_lowercase();
            if normalized.len() < MIN_NAME_LENGTH {
                continue;
            }
            if !index.names.insert(normalized.clone()) {
                continue;
            }

            index
                .names_by_len
                .entry(normalized.len())
                .or_default()
                .push(normalized.clone());

            let primary = dm.encode(&normalized);
            let secondary = dm.encode_alternate(&normalized);

            if !primary.is_empty() {
                index
                    .primary
                    .entry(primary.clone())
                    .or_default()
                    .push(normalized.clone());
            }

            if !secondary.is_empty() && secondary != primary {
                index.secondary.entry(secondary).or_default().push(normalized);
            }
        }

        index
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, normalized: &str) -> bool {
        self.names.contains(normalized)
    }

    /// Match a raw token against the index.
    pub fn lookup(&self, input: &str) -> Option<PhoneticMatch> {
        let normalized = normalize_ocr(input);
        if normalized.len() < MIN_NAME_LENGTH {
            return None;
        }

        if self.names.contains(&normalized) {
            return Some(PhoneticMatch {
                matched: normalized,
                confidence: 1.0,
                kind: MatchKind::Exact,
            });
        }

        let dm = DoubleMetaphone::default();
        let primary = dm.encode(&normalized);
        let secondary = dm.encode_alternate(&normalized);

        if !primary.is_empty() {
            if let Some(candidates) = self.primary.get(&primary) {
                if let Some(best) = find_closest_match(&normalized, candidates) {
                    return Some(PhoneticMatch {
                        matched: best,
                        confidence: 0.9,
                        kind: MatchKind::PhoneticPrimary,
                    });
                }
            }
        }

        if !secondary.is_empty() {
            if let Some(candidates) = self.secondary.get(&secondary) {
                if let Some(best) = find_closest_match(&normalized, candidates) {
                    return Some(PhoneticMatch {
                        matched: best,
                        confidence: 0.85,
                        kind: MatchKind::PhoneticSecondary,
                    });
                }
            }
        }

        // Unbucketed edit distance is too loose on long tokens.
        if normalized.len() <= 6 {
            if let Some(best) = self.find_levenshtein_match(&normalized) {
                return Some(PhoneticMatch {
                    matched: best,
                    confidence: 0.75,
                    kind: MatchKind::Levenshtein,
                });
            }
        }

        None
    }

    fn find_levenshtein_match(&self, input: &str) -> Option<String> {
        let len = input.len();
        if len < MIN_NAME_LENGTH {
            return None;
        }

        let min_len = MIN_NAME_LENGTH.max(len.saturating_sub(2));
        let max_len = len + 2;

        let mut best_match: Option<&String> = None;
        let mut best_dist = MAX_LEVENSHTEIN_DISTANCE + 1;
        let input_b = input.as_bytes();

        for l in min_len..=max_len {
            if let Some(candidates) = self.names_by_len.get(&l) {
                for cand in candidates {
                    let d =
                        levenshtein_bounded(input_b, cand.as_bytes(), MAX_LEVENSHTEIN_DISTANCE);
                    if d < best_dist {
                        best_dist = d;
                        best_match = Some(cand);
                        if d <= 1 {
                            break;
                        }
                    }
                }
            }
            if best_dist <= 1 {
                break;
            }
        }

        if best_dist <= MAX_LEVENSHTEIN_DISTANCE {
            best_match.cloned()
        } else {
            None
        }
    }
}

/// Lowercase and collapse common OCR character confusions before lookup.
pub fn normalize_ocr(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut last_was_space = false;

    for ch in input.chars() {
        let mapped = match ch {
            '0' => 'o',
            '1' | '|' => 'l',
            '!' => 'i',
            '@' => 'a',
            '$' => 's',
            '3' => 'e',
            '4' => 'a',
            '5' => 's',
            '6' => 'g',
            '7' => 't',
            '8' => 'b',
            '9' => 'g',
            _ => ch,
        };

        let lower = mapped.to_ascii_lowercase();
        if lower.is_ascii_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        out.push(lower);
    }

    out.trim().to_string()
}

/// Levenshtein distance with an early exit once every cell in a row exceeds
/// `max`; returns `max + 1` when the bound is blown.
pub fn levenshtein_bounded(a: &[u8], b: &[u8], max: usize) -> usize {
    let (a, b) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let m = a.len();
    let n = b.len();
    if n.saturating_sub(m) > max {
        return max + 1;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr: Vec<usize> = vec![0; n + 1];

    for i in 1..=m {
        curr[0] = i;
        let mut row_min = curr[0];
        let a_ch = a[i - 1];
        for j in 1..=n {
            let cost = if a_ch == b[j - 1] { 0 } else { 1 };
            let v = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
            curr[j] = v;
            row_min = row_min.min(v);
        }

        if row_min > max {
            return max + 1;
        }

        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

fn find_closest_match(input: &str, candidates: &[String]) -> Option<String> {
    if candidates.is_empty() {
        return None;
    }

    let input_b = input.as_bytes();
    let mut best: Option<&String> = None;
    let mut best_dist = MAX_LEVENSHTEIN_DISTANCE + 1;

    for cand in candidates {
        let d = levenshtein_bounded(input_b, cand.as_bytes(), MAX_LEVENSHTEIN_DISTANCE);
        if d < best_dist {
            best_dist = d;
            best = Some(cand);
            if d <= 1 {
                break;
            }
        }
    }

    if best_dist <= MAX_LEVENSHTEIN_DISTANCE {
        best.cloned()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> PhoneticIndex {
        PhoneticIndex::build(["Smith", "Johnson", "Katherine", "Lee"])
    }

    #[test]
    fn test_exact_match() {
        let m = index().lookup("smith").unwrap();
        assert_eq!(m.kind, MatchKind::Exact);
        assert_eq!(m.confidence, 1.0);
    }

    #[test]
    fn test_ocr_normalized_exact_match() {
        // '5'->'s', '1'->'l' brings the token back onto the dictionary.
        let m = index().lookup("5mith").unwrap();
        assert_eq!(m.kind, MatchKind::Exact);
    }

    #[test]
    fn test_phonetic_match_on_misspelling() {
        let m = index().lookup("Smyth").unwrap();
        assert!(matches!(
            m.kind,
            MatchKind::PhoneticPrimary | MatchKind::PhoneticSecondary
        ));
        assert_eq!(m.matched, "smith");
        assert!(m.confidence >= 0.85);
    }

    #[test]
    fn test_levenshtein_fallback_only_for_short_tokens() {
        // "Katherene" is 9 chars; the edit-distance fallback must not fire.
        let idx = index();
        if let Some(m) = idx.lookup("Katherene") {
            assert_ne!(m.kind, MatchKind::Levenshtein);
        }
    }

    #[test]
    fn test_no_match_for_unrelated_token() {
        assert!(index().lookup("ventilator").is_none());
    }

    #[test]
    fn test_bounded_levenshtein() {
        assert_eq!(levenshtein_bounded(b"smith", b"smyth", 2), 1);
        assert_eq!(levenshtein_bounded(b"smith", b"zzzzz", 2), 3);
    }
}
