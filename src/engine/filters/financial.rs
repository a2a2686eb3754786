//! Financial identifier filters: credit/debit cards and account numbers

use crate::domain::{PhiCategory, Span};
use crate::engine::filters::validators::luhn_ok;
use crate::lexicon::Lexicon;
use crate::policy::Policy;
use once_cell::sync::Lazy;
use regex::Regex;

static CARD_GROUPED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}[- ]\d{4}[- ]\d{4}[- ]\d{4}\b").expect("invalid grouped card pattern")
});

static CARD_AMEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{4}[- ]\d{6}[- ]\d{5}\b").expect("invalid amex card pattern")
});

static CARD_CONTIGUOUS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{15,16}\b").expect("invalid contiguous card pattern"));

static ACCOUNT_LABELED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:account|acct|acc)\s*(?:no|number|#)?\s*[:#]\s*(\d{6,17})\b")
        .expect("invalid labeled account pattern")
});

static IBAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b").expect("invalid iban pattern")
});

pub fn scan_credit_card(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for m in CARD_GROUPED.find_iter(text) {
        if luhn_ok(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::CreditCard, 0.95, "credit-card"));
        }
    }
    for m in CARD_AMEX.find_iter(text) {
        if luhn_ok(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::CreditCard, 0.95, "credit-card"));
        }
    }
    // Bare digit runs overlap MRNs and account numbers, so the checksum
    // gate carries more of the weight here.
    for m in CARD_CONTIGUOUS.find_iter(text) {
        if luhn_ok(m.as_str()) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::CreditCard, 0.85, "credit-card"));
        }
    }
    spans
}

pub fn scan_account(text: &str, _policy: &Policy, _lexicon: &Lexicon) -> Vec<Span> {
    let mut spans = Vec::new();
    for caps in ACCOUNT_LABELED.captures_iter(text) {
        if let Some(m) = caps.get(1) {
            spans.push(Span::new(m.start(), m.end(), PhiCategory::Account, 0.9, "account"));
        }
    }
    for m in IBAN_RE.find_iter(text) {
        spans.push(Span::new(m.start(), m.end(), PhiCategory::Account, 0.85, "account"));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use test_case::test_case;

    fn setup() -> (Policy, Arc<Lexicon>) {
        (Policy::default(), Arc::new(Lexicon::embedded()))
    }

    #[test_case("card 4111-1111-1111-1111 on file", 1 ; "grouped visa")]
    #[test_case("card 4111111111111111 on file", 1 ; "contiguous visa")]
    #[test_case("card 3782-822463-10005 on file", 1 ; "amex grouping")]
    #[test_case("card 4111-1111-1111-1112 on file", 0 ; "checksum failure")]
    fn test_credit_card(text: &str, expected: usize) {
        let (policy, lex) = setup();
        assert_eq!(scan_credit_card(text, &policy, &lex).len(), expected);
    }

    #[test]
    fn test_contiguous_run_without_checksum_ignored() {
        let (policy, lex) = setup();
        // 16 digits that fail Luhn stay untouched; could be an MRN.
        assert!(scan_credit_card("ref 1234567890123456", &policy, &lex).is_empty());
    }

    #[test]
    fn test_labeled_account() {
        let (policy, lex) = setup();
        let text = "Account #: 0012345678";
        let spans = scan_account(text, &policy, &lex);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].slice(text), "0012345678");
    }

    #[test]
    fn test_iban() {
        let (policy, lex) = setup();
        assert_eq!(
            scan_account("wire to DE89370400440532013000", &policy, &lex).len(),
            1
        );
    }
}
