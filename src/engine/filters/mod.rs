//! Detection filters
//!
//! Each filter is a pure function from text to candidate spans; the closed
//! [`FilterKind`] enum is the dispatch table the coordinator fans out over.
//! Filters never see each other's output. Overlap and disagreement are the
//! resolver's problem.

pub mod contact;
pub mod financial;
pub mod government;
pub mod identity;
pub mod medical;
pub mod technical;
pub mod validators;

use crate::domain::{PhiCategory, Span};
use crate::lexicon::phonetic::MatchKind;
use crate::lexicon::Lexicon;
use crate::policy::Policy;

/// Every detector the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    ExactName,
    FormattedName,
    TitledName,
    FamilyName,
    PhoneticName,
    Ssn,
    Passport,
    License,
    Phone,
    Fax,
    Email,
    Address,
    Zip,
    City,
    Mrn,
    Npi,
    HealthPlan,
    Age,
    Date,
    RelativeDate,
    Hospital,
    CreditCard,
    Account,
    IpAddress,
    Url,
    Device,
    Vehicle,
    Biometric,
    UniqueId,
}

/// All filters in registration order.
pub const ALL_FILTERS: [FilterKind; 29] = [
    FilterKind::ExactName,
    FilterKind::FormattedName,
    FilterKind::TitledName,
    FilterKind::FamilyName,
    FilterKind::PhoneticName,
    FilterKind::Ssn,
    FilterKind::Passport,
    FilterKind::License,
    FilterKind::Phone,
    FilterKind::Fax,
    FilterKind::Email,
    FilterKind::Address,
    FilterKind::Zip,
    FilterKind::City,
    FilterKind::Mrn,
    FilterKind::Npi,
    FilterKind::HealthPlan,
    FilterKind::Age,
    FilterKind::Date,
    FilterKind::RelativeDate,
    FilterKind::Hospital,
    FilterKind::CreditCard,
    FilterKind::Account,
    FilterKind::IpAddress,
    FilterKind::Url,
    FilterKind::Device,
    FilterKind::Vehicle,
    FilterKind::Biometric,
    FilterKind::UniqueId,
];

impl FilterKind {
    /// Stable identifier used in span provenance and logs.
    pub fn name(self) -> &'static str {
        match self {
            FilterKind::ExactName => "exact-name",
            FilterKind::FormattedName => "formatted-name",
            FilterKind::TitledName => "titled-name",
            FilterKind::FamilyName => "family-name",
            FilterKind::PhoneticName => "phonetic-name",
            FilterKind::Ssn => "ssn",
            FilterKind::Passport => "passport",
            FilterKind::License => "license",
            FilterKind::Phone => "phone",
            FilterKind::Fax => "fax",
            FilterKind::Email => "email",
            FilterKind::Address => "address",
            FilterKind::Zip => "zip",
            FilterKind::City => "city",
            FilterKind::Mrn => "mrn",
            FilterKind::Npi => "npi",
            FilterKind::HealthPlan => "health-plan",
            FilterKind::Age => "age",
            FilterKind::Date => "date",
            FilterKind::RelativeDate => "relative-date",
            FilterKind::Hospital => "hospital",
            FilterKind::CreditCard => "credit-card",
            FilterKind::Account => "account",
            FilterKind::IpAddress => "ip",
            FilterKind::Url => "url",
            FilterKind::Device => "device",
            FilterKind::Vehicle => "vehicle",
            FilterKind::Biometric => "biometric",
            FilterKind::UniqueId => "unique-id",
        }
    }

    /// The category every span from this filter carries.
    pub fn category(self) -> PhiCategory {
        match self {
            FilterKind::ExactName
            | FilterKind::FormattedName
            | FilterKind::TitledName
            | FilterKind::FamilyName
            | FilterKind::PhoneticName => PhiCategory::Name,
            FilterKind::Ssn => PhiCategory::Ssn,
            FilterKind::Passport => PhiCategory::Passport,
            FilterKind::License => PhiCategory::License,
            FilterKind::Phone => PhiCategory::Phone,
            FilterKind::Fax => PhiCategory::Fax,
            FilterKind::Email => PhiCategory::Email,
            FilterKind::Address => PhiCategory::Address,
            FilterKind::Zip => PhiCategory::Zip,
            FilterKind::City => PhiCategory::City,
            FilterKind::Mrn => PhiCategory::Mrn,
            FilterKind::Npi => PhiCategory::Npi,
            FilterKind::HealthPlan => PhiCategory::HealthPlan,
            FilterKind::Age => PhiCategory::Age,
            FilterKind::Date => PhiCategory::Date,
            FilterKind::RelativeDate => PhiCategory::RelativeDate,
            FilterKind::Hospital => PhiCategory::Hospital,
            FilterKind::CreditCard => PhiCategory::CreditCard,
            FilterKind::Account => PhiCategory::Account,
            FilterKind::IpAddress => PhiCategory::IpAddress,
            FilterKind::Url => PhiCategory::Url,
            FilterKind::Device => PhiCategory::Device,
            FilterKind::Vehicle => PhiCategory::Vehicle,
            FilterKind::Biometric => PhiCategory::Biometric,
            FilterKind::UniqueId => PhiCategory::UniqueId,
        }
    }

    /// A filter runs only when its category is enabled by the policy.
    pub fn enabled(self, policy: &Policy) -> bool {
        policy.is_enabled(self.category())
    }

    /// Run the detector over the full input.
    pub fn scan(self, text: &str, policy: &Policy, lexicon: &Lexicon) -> Vec<Span> {
        match self {
            FilterKind::ExactName => identity::scan_exact_name(text, policy, lexicon),
            FilterKind::FormattedName => identity::scan_formatted_name(text, policy, lexicon),
            FilterKind::TitledName => identity::scan_titled_name(text, policy, lexicon),
            FilterKind::FamilyName => identity::scan_family_name(text, policy, lexicon),
            FilterKind::PhoneticName => identity::scan_phonetic_name(text, policy, lexicon),
            FilterKind::Ssn => government::scan_ssn(text, policy, lexicon),
            FilterKind::Passport => government::scan_passport(text, policy, lexicon),
            FilterKind::License => government::scan_license(text, policy, lexicon),
            FilterKind::Phone => contact::scan_phone(text, policy, lexicon),
            FilterKind::Fax => contact::scan_fax(text, policy, lexicon),
            FilterKind::Email => contact::scan_email(text, policy, lexicon),
            FilterKind::Address => contact::scan_address(text, policy, lexicon),
            FilterKind::Zip => contact::scan_zip(text, policy, lexicon),
            FilterKind::City => contact::scan_city(text, policy, lexicon),
            FilterKind::Mrn => medical::scan_mrn(text, policy, lexicon),
            FilterKind::Npi => medical::scan_npi(text, policy, lexicon),
            FilterKind::HealthPlan => medical::scan_health_plan(text, policy, lexicon),
            FilterKind::Age => medical::scan_age(text, policy, lexicon),
            FilterKind::Date => medical::scan_date(text, policy, lexicon),
            FilterKind::RelativeDate => medical::scan_relative_date(text, policy, lexicon),
            FilterKind::Hospital => medical::scan_hospital(text, policy, lexicon),
            FilterKind::CreditCard => financial::scan_credit_card(text, policy, lexicon),
            FilterKind::Account => financial::scan_account(text, policy, lexicon),
            FilterKind::IpAddress => technical::scan_ip(text, policy, lexicon),
            FilterKind::Url => technical::scan_url(text, policy, lexicon),
            FilterKind::Device => technical::scan_device(text, policy, lexicon),
            FilterKind::Vehicle => technical::scan_vehicle(text, policy, lexicon),
            FilterKind::Biometric => technical::scan_biometric(text, policy, lexicon),
            FilterKind::UniqueId => technical::scan_unique_id(text, policy, lexicon),
        }
    }
}

/// Filters active under a policy, in registration order.
pub fn active_filters(policy: &Policy) -> Vec<FilterKind> {
    ALL_FILTERS.iter().copied().filter(|f| f.enabled(policy)).collect()
}

const CONTEXT_WINDOW: usize = 100;

/// Case-insensitive keyword search in a window around a match. Used by
/// filters whose patterns are too generic to stand alone.
pub(crate) fn has_context(text: &str, start: usize, end: usize, keywords: &[&str]) -> bool {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while to < text.len() && !text.is_char_boundary(to) {
        to += 1;
    }

    let window = text[from..to].to_lowercase();
    keywords.iter().any(|k| window.contains(k))
}

/// Resolve a capitalized pair through the phonetic index. Returns the
/// weaker of the two match confidences, or `None` when either half misses
/// or both halves are already exact dictionary hits.
pub(crate) fn phonetic_name_pair(lexicon: &Lexicon, first: &str, last: &str) -> Option<f64> {
    let a = lexicon.match_any_name(first)?;
    let b = lexicon.match_any_name(last)?;
    if a.kind == MatchKind::Exact && b.kind == MatchKind::Exact {
        return None;
    }
    Some(a.confidence.min(b.confidence))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_filter_has_unique_name() {
        let mut names: Vec<&str> = ALL_FILTERS.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ALL_FILTERS.len());
    }

    #[test]
    fn test_disabling_category_removes_its_filters() {
        let mut policy = Policy::default();
        let all = active_filters(&policy).len();
        policy.enabled.remove(&PhiCategory::Name);
        let without_names = active_filters(&policy);
        assert_eq!(without_names.len(), all - 5);
        assert!(without_names.iter().all(|f| f.category() != PhiCategory::Name));
    }

    #[test]
    fn test_context_window_clamps_to_text() {
        assert!(has_context("DEA number 12345", 11, 16, &["dea"]));
        assert!(!has_context("plain 12345 text", 6, 11, &["dea"]));
    }

    #[test]
    fn test_context_window_respects_char_boundaries() {
        let text = "é".repeat(120) + " dea 1234563";
        let start = text.len() - 7;
        assert!(has_context(&text, start, text.len(), &["dea"]));
    }
}
