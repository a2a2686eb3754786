//! PHI category enumeration

use serde::{Deserialize, Serialize};

/// Closed set of PHI categories covering the HIPAA Safe Harbor identifiers
/// that are derivable from free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhiCategory {
    /// Names (patient, family member, provider)
    Name,
    /// Social Security Numbers
    Ssn,
    /// Passport numbers
    Passport,
    /// Certificate/license numbers, including DEA registrations
    License,
    /// Telephone numbers
    Phone,
    /// Fax numbers
    Fax,
    /// Email addresses
    Email,
    /// Street addresses
    Address,
    /// ZIP codes
    Zip,
    /// City names (geographic subdivision smaller than state)
    City,
    /// Hospital and facility names
    Hospital,
    /// Medical Record Numbers
    Mrn,
    /// National Provider Identifiers
    Npi,
    /// Health plan beneficiary numbers
    HealthPlan,
    /// Account numbers
    Account,
    /// Credit card numbers
    CreditCard,
    /// Calendar dates
    Date,
    /// Relative date references ("last week", "3 days ago")
    RelativeDate,
    /// Ages subject to the Safe Harbor age rule
    Age,
    /// IP addresses (v4 and v6)
    IpAddress,
    /// Web URLs
    Url,
    /// Device identifiers and serial numbers
    Device,
    /// Vehicle identifiers (VIN, license plates)
    Vehicle,
    /// Biometric-context markers (keyword-triggered, not biometric data)
    Biometric,
    /// Any other labeled unique identifying number or code
    UniqueId,
}

/// All categories, in display order.
pub const ALL_PHI_TYPES: [PhiCategory; 25] = [
    PhiCategory::Name,
    PhiCategory::Ssn,
    PhiCategory::Passport,
    PhiCategory::License,
    PhiCategory::Phone,
    PhiCategory::Fax,
    PhiCategory::Email,
    PhiCategory::Address,
    PhiCategory::Zip,
    PhiCategory::City,
    PhiCategory::Hospital,
    PhiCategory::Mrn,
    PhiCategory::Npi,
    PhiCategory::HealthPlan,
    PhiCategory::Account,
    PhiCategory::CreditCard,
    PhiCategory::Date,
    PhiCategory::RelativeDate,
    PhiCategory::Age,
    PhiCategory::IpAddress,
    PhiCategory::Url,
    PhiCategory::Device,
    PhiCategory::Vehicle,
    PhiCategory::Biometric,
    PhiCategory::UniqueId,
];

impl PhiCategory {
    /// Human-readable label, also used as the bracket-tag text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "NAME",
            Self::Ssn => "SSN",
            Self::Passport => "PASSPORT",
            Self::License => "LICENSE",
            Self::Phone => "PHONE",
            Self::Fax => "FAX",
            Self::Email => "EMAIL",
            Self::Address => "ADDRESS",
            Self::Zip => "ZIP",
            Self::City => "CITY",
            Self::Hospital => "HOSPITAL",
            Self::Mrn => "MRN",
            Self::Npi => "NPI",
            Self::HealthPlan => "HEALTH_PLAN",
            Self::Account => "ACCOUNT",
            Self::CreditCard => "CREDIT_CARD",
            Self::Date => "DATE",
            Self::RelativeDate => "RELATIVE_DATE",
            Self::Age => "AGE",
            Self::IpAddress => "IP_ADDRESS",
            Self::Url => "URL",
            Self::Device => "DEVICE",
            Self::Vehicle => "VEHICLE",
            Self::Biometric => "BIOMETRIC",
            Self::UniqueId => "UNIQUE_ID",
        }
    }

    /// Parse a label as produced by [`PhiCategory::label`].
    ///
    /// Accepts any case; used when validating `enabled_types`/`disabled_types`
    /// in engine configuration and policy documents.
    pub fn parse_label(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        ALL_PHI_TYPES.iter().copied().find(|c| c.label() == upper)
    }

    /// Structural specificity used as the cross-category tie-break when
    /// overlapping spans contest a region. Hard identifiers outrank generic
    /// matches because a false negative on them costs more.
    pub fn specificity(&self) -> u32 {
        match self {
            Self::Ssn => 100,
            Self::Mrn => 95,
            Self::CreditCard => 90,
            Self::Account | Self::License | Self::Passport | Self::HealthPlan | Self::Npi => 85,
            Self::Email => 80,
            Self::Phone | Self::Fax | Self::IpAddress | Self::Url => 75,
            Self::Device | Self::Vehicle | Self::Biometric => 70,
            Self::Date => 60,
            Self::Zip => 55,
            Self::Address => 50,
            Self::City | Self::Hospital => 45,
            Self::Age | Self::RelativeDate => 40,
            Self::Name => 35,
            Self::UniqueId => 30,
        }
    }
}

impl std::fmt::Display for PhiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        for category in ALL_PHI_TYPES {
            assert_eq!(PhiCategory::parse_label(category.label()), Some(category));
        }
    }

    #[test]
    fn test_parse_label_case_insensitive() {
        assert_eq!(PhiCategory::parse_label("ssn"), Some(PhiCategory::Ssn));
        assert_eq!(
            PhiCategory::parse_label(" health_plan "),
            Some(PhiCategory::HealthPlan)
        );
        assert_eq!(PhiCategory::parse_label("BOGUS"), None);
    }

    #[test]
    fn test_specificity_total_order_for_hard_identifiers() {
        assert!(PhiCategory::Ssn.specificity() > PhiCategory::Mrn.specificity());
        assert!(PhiCategory::Mrn.specificity() > PhiCategory::Name.specificity());
        assert!(PhiCategory::Date.specificity() > PhiCategory::Age.specificity());
    }

    #[test]
    fn test_serde_screaming_snake_case() {
        let json = serde_json::to_string(&PhiCategory::HealthPlan).unwrap();
        assert_eq!(json, "\"HEALTH_PLAN\"");
        let back: PhiCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PhiCategory::HealthPlan);
    }
}
