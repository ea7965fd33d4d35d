use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::models::{PersonnelRecord, RiskCategory, RoleGroup, Sex};

pub const ALL: &str = "All";

/// Named preset applied before field filters and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuickFilter {
    #[default]
    None,
    Leadership,
    Female,
    Retiring(i32),
    Critical,
    /// `high` or `medium` risk.
    Moderate,
    Low,
}

impl QuickFilter {
    pub fn matches(&self, record: &PersonnelRecord) -> bool {
        match self {
            QuickFilter::None => true,
            QuickFilter::Leadership => record.role_group == RoleGroup::Leadership,
            QuickFilter::Female => record.sex == Sex::F,
            QuickFilter::Retiring(year) => record.retires_in(*year),
            QuickFilter::Critical => record.risk_category == RiskCategory::Critical,
            QuickFilter::Moderate => record.risk_category.is_moderate(),
            QuickFilter::Low => record.risk_category == RiskCategory::Low,
        }
    }
}

impl fmt::Display for QuickFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuickFilter::None => f.write_str("None"),
            QuickFilter::Leadership => f.write_str("Leadership"),
            QuickFilter::Female => f.write_str("Female"),
            QuickFilter::Retiring(year) => write!(f, "Retiring{year:04}"),
            QuickFilter::Critical => f.write_str("Critical"),
            QuickFilter::Moderate => f.write_str("Moderate"),
            QuickFilter::Low => f.write_str("Low"),
        }
    }
}

impl FromStr for QuickFilter {
    type Err = Error;

    /// Accepts the preset names case-insensitively; `Retiring2026` carries its
    /// year.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lowered = value.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "none" | "" => Ok(QuickFilter::None),
            "leadership" => Ok(QuickFilter::Leadership),
            "female" => Ok(QuickFilter::Female),
            "critical" => Ok(QuickFilter::Critical),
            "moderate" => Ok(QuickFilter::Moderate),
            "low" => Ok(QuickFilter::Low),
            other => other
                .strip_prefix("retiring")
                .filter(|year| year.len() == 4)
                .and_then(|year| year.parse::<i32>().ok())
                .map(QuickFilter::Retiring)
                .ok_or_else(|| Error::invalid_field("quickFilter", value)),
        }
    }
}

/// A field filter selection; `All` places no constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T: FromStr> Selection<T> {
    /// `"All"` maps to [`Selection::All`]; anything else must parse as `T`.
    pub fn parse(value: &str) -> Result<Self, T::Err> {
        if value == ALL {
            Ok(Selection::All)
        } else {
            value.parse().map(Selection::Only)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldFilters {
    pub sbu: Selection<String>,
    pub grade_level: Selection<String>,
    pub location: Selection<String>,
    pub sex: Selection<Sex>,
}

impl FieldFilters {
    pub fn matches(&self, record: &PersonnelRecord) -> bool {
        self.sbu.admits(&record.sbu)
            && self.grade_level.admits(&record.grade_level)
            && self.location.admits(&record.location)
            && self.sex.admits(&record.sex)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterCriteria {
    pub quick_filter: QuickFilter,
    pub field_filters: FieldFilters,
    pub search_term: String,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.quick_filter == QuickFilter::None
            && self.field_filters == FieldFilters::default()
            && self.search_term.trim().is_empty()
    }

    /// Quick filter, then field filters, then search.
    pub fn predicate(&self) -> impl Fn(&PersonnelRecord) -> bool + '_ {
        let term = self.search_term.trim().to_lowercase();
        move |record: &PersonnelRecord| {
            self.quick_filter.matches(record)
                && self.field_filters.matches(record)
                && contains_term(record, &term)
        }
    }
}

/// Case-insensitive substring match against every attribute's text form.
pub fn matches_search(record: &PersonnelRecord, term: &str) -> bool {
    contains_term(record, &term.trim().to_lowercase())
}

/// `term` must already be trimmed and lower-cased.
fn contains_term(record: &PersonnelRecord, term: &str) -> bool {
    term.is_empty()
        || record
            .field_values()
            .iter()
            .any(|value| value.to_lowercase().contains(term))
}

/// Filtered view of `records`, keeping store order.
pub fn apply<'a>(records: &'a [PersonnelRecord], criteria: &FilterCriteria) -> Vec<&'a PersonnelRecord> {
    let keep = criteria.predicate();
    records.iter().filter(|record| keep(record)).collect()
}

/// Positions in `records` of the rows [`apply`] would return.
pub fn matching_indices(records: &[PersonnelRecord], criteria: &FilterCriteria) -> Vec<usize> {
    let keep = criteria.predicate();
    records
        .iter()
        .enumerate()
        .filter(|(_, record)| keep(record))
        .map(|(index, _)| index)
        .collect()
}

/// Dropdown choices for each field filter: `All` then distinct values in
/// first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub sbus: Vec<String>,
    pub grades: Vec<String>,
    pub locations: Vec<String>,
    pub sexes: Vec<String>,
}

pub fn filter_options(records: &[PersonnelRecord]) -> FilterOptions {
    fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
        let mut out = vec![ALL.to_string()];
        for value in values {
            if !out.iter().skip(1).any(|existing| existing == value) {
                out.push(value.to_string());
            }
        }
        out
    }

    FilterOptions {
        sbus: distinct(records.iter().map(|r| r.sbu.as_str())),
        grades: distinct(records.iter().map(|r| r.grade_level.as_str())),
        locations: distinct(records.iter().map(|r| r.location.as_str())),
        sexes: vec![ALL.to_string(), "M".to_string(), "F".to_string()],
    }
}
