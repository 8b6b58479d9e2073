use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilingStatus {
    #[default]
    #[serde(rename = "single", alias = "S")]
    Single,
    #[serde(rename = "married_joint", alias = "MFJ")]
    MarriedFilingJointly,
    #[serde(rename = "married_separate", alias = "MFS")]
    MarriedFilingSeparately,
    #[serde(rename = "head_of_household", alias = "HOH", alias = "head_household")]
    HeadOfHousehold,
    #[serde(
        rename = "qualifying_widow",
        alias = "QSS",
        alias = "qualifying_surviving_spouse"
    )]
    QualifyingSurvivingSpouse,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 5] = [
        Self::Single,
        Self::MarriedFilingJointly,
        Self::MarriedFilingSeparately,
        Self::HeadOfHousehold,
        Self::QualifyingSurvivingSpouse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Single => "S",
            Self::MarriedFilingJointly => "MFJ",
            Self::MarriedFilingSeparately => "MFS",
            Self::HeadOfHousehold => "HOH",
            Self::QualifyingSurvivingSpouse => "QSS",
        }
    }

    /// Snake-case name used in serialized inputs and table files.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::MarriedFilingJointly => "married_joint",
            Self::MarriedFilingSeparately => "married_separate",
            Self::HeadOfHousehold => "head_of_household",
            Self::QualifyingSurvivingSpouse => "qualifying_widow",
        }
    }

    /// Accepts either the short code (`MFJ`) or the snake-case name
    /// (`married_joint`). Matching is case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "single" => Some(Self::Single),
            "mfj" | "married_joint" => Some(Self::MarriedFilingJointly),
            "mfs" | "married_separate" => Some(Self::MarriedFilingSeparately),
            "hoh" | "head_of_household" | "head_household" => Some(Self::HeadOfHousehold),
            "qss" | "qualifying_widow" | "qualifying_surviving_spouse" => {
                Some(Self::QualifyingSurvivingSpouse)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for FilingStatus {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A value kept per filing status.
///
/// `single` is mandatory; every other status may be left empty, in which case
/// lookups fall back to the `single` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingStatusTable<T> {
    pub single: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub married_joint: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub married_separate: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_of_household: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifying_widow: Option<T>,
}

impl<T> FilingStatusTable<T> {
    /// Creates a table holding only the `single` entry.
    pub fn single_only(single: T) -> Self {
        Self {
            single,
            married_joint: None,
            married_separate: None,
            head_of_household: None,
            qualifying_widow: None,
        }
    }

    /// Returns the entry stored for `status` itself, without fallback.
    pub fn entry(
        &self,
        status: FilingStatus,
    ) -> Option<&T> {
        match status {
            FilingStatus::Single => Some(&self.single),
            FilingStatus::MarriedFilingJointly => self.married_joint.as_ref(),
            FilingStatus::MarriedFilingSeparately => self.married_separate.as_ref(),
            FilingStatus::HeadOfHousehold => self.head_of_household.as_ref(),
            FilingStatus::QualifyingSurvivingSpouse => self.qualifying_widow.as_ref(),
        }
    }

    /// Returns the entry for `status`, falling back to `single` when the
    /// status has no entry of its own.
    pub fn get(
        &self,
        status: FilingStatus,
    ) -> &T {
        match self.entry(status) {
            Some(value) => value,
            None => {
                debug!(filing_status = %status, "no entry for filing status; using single");
                &self.single
            }
        }
    }

    /// Stores `value` for `status`, replacing any existing entry.
    pub fn set(
        &mut self,
        status: FilingStatus,
        value: T,
    ) {
        match status {
            FilingStatus::Single => self.single = value,
            FilingStatus::MarriedFilingJointly => self.married_joint = Some(value),
            FilingStatus::MarriedFilingSeparately => self.married_separate = Some(value),
            FilingStatus::HeadOfHousehold => self.head_of_household = Some(value),
            FilingStatus::QualifyingSurvivingSpouse => self.qualifying_widow = Some(value),
        }
    }

    /// Iterates over the entries that are actually present.
    pub fn entries(&self) -> impl Iterator<Item = (FilingStatus, &T)> {
        FilingStatus::ALL
            .into_iter()
            .filter_map(move |status| self.entry(status).map(|value| (status, value)))
    }
}
