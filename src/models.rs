use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    M,
    F,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::M => "M",
            Sex::F => "F",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "M" => Ok(Sex::M),
            "F" => Ok(Sex::F),
            other => Err(Error::invalid_field("sex", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleGroup {
    Leadership,
    #[serde(rename = "Technical Expert")]
    TechnicalExpert,
    Specialist,
}

impl RoleGroup {
    /// Matrix row order.
    pub const ALL: [RoleGroup; 3] = [
        RoleGroup::Leadership,
        RoleGroup::TechnicalExpert,
        RoleGroup::Specialist,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleGroup::Leadership => "Leadership",
            RoleGroup::TechnicalExpert => "Technical Expert",
            RoleGroup::Specialist => "Specialist",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            RoleGroup::Leadership => 0,
            RoleGroup::TechnicalExpert => 1,
            RoleGroup::Specialist => 2,
        }
    }
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleGroup {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Leadership" => Ok(RoleGroup::Leadership),
            "Technical Expert" | "TechnicalExpert" => Ok(RoleGroup::TechnicalExpert),
            "Specialist" => Ok(RoleGroup::Specialist),
            other => Err(Error::invalid_field("roleGroup", other)),
        }
    }
}

/// Knowledge-loss urgency, ordered `Critical > High > Medium > Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskCategory {
    Critical,
    High,
    Medium,
    Low,
}

impl RiskCategory {
    /// Matrix column order.
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Critical,
        RiskCategory::High,
        RiskCategory::Medium,
        RiskCategory::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Critical => "critical",
            RiskCategory::High => "high",
            RiskCategory::Medium => "medium",
            RiskCategory::Low => "low",
        }
    }

    pub fn urgency(&self) -> u8 {
        match self {
            RiskCategory::Critical => 3,
            RiskCategory::High => 2,
            RiskCategory::Medium => 1,
            RiskCategory::Low => 0,
        }
    }

    /// High and medium together form the "moderate" band.
    pub fn is_moderate(&self) -> bool {
        matches!(self, RiskCategory::High | RiskCategory::Medium)
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            RiskCategory::Critical => 0,
            RiskCategory::High => 1,
            RiskCategory::Medium => 2,
            RiskCategory::Low => 3,
        }
    }
}

impl PartialOrd for RiskCategory {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RiskCategory {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.urgency().cmp(&other.urgency())
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "critical" => Ok(RiskCategory::Critical),
            "high" => Ok(RiskCategory::High),
            "medium" => Ok(RiskCategory::Medium),
            "low" => Ok(RiskCategory::Low),
            other => Err(Error::invalid_field("riskCategory", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonnelRecord {
    pub designation: String,
    pub retirement_date: String,
    pub discipline: String,
    pub grade_level: String,
    pub id_no: u32,
    pub location: String,
    pub area: String,
    pub qualification: String,
    pub sbu: String,
    pub sex: Sex,
    pub role_group: RoleGroup,
    pub risk_category: RiskCategory,
}

/// Column headers of the tabular form of a record, in field order.
pub const RECORD_HEADERS: [&str; 12] = [
    "Designation",
    "RetirementDate",
    "Discipline",
    "GradeLevel",
    "ID",
    "Location",
    "Area",
    "Qualification",
    "SBU",
    "Sex",
    "RoleGroup",
    "RiskCategory",
];

impl PersonnelRecord {
    /// Every attribute as text, in [`RECORD_HEADERS`] order.
    pub fn field_values(&self) -> [Cow<'_, str>; 12] {
        [
            Cow::Borrowed(self.designation.as_str()),
            Cow::Borrowed(self.retirement_date.as_str()),
            Cow::Borrowed(self.discipline.as_str()),
            Cow::Borrowed(self.grade_level.as_str()),
            Cow::Owned(self.id_no.to_string()),
            Cow::Borrowed(self.location.as_str()),
            Cow::Borrowed(self.area.as_str()),
            Cow::Borrowed(self.qualification.as_str()),
            Cow::Borrowed(self.sbu.as_str()),
            Cow::Borrowed(self.sex.as_str()),
            Cow::Borrowed(self.role_group.as_str()),
            Cow::Borrowed(self.risk_category.as_str()),
        ]
    }

    pub fn retires_in(&self, year: i32) -> bool {
        self.retirement_date.starts_with(&format!("{year:04}"))
    }

    pub fn retirement_on(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.retirement_date, "%Y-%m-%d").ok()
    }

    /// Whole calendar months from `as_of` to the retirement month; negative
    /// once retired.
    pub fn months_to_retirement(&self, as_of: NaiveDate) -> Option<i64> {
        let date = self.retirement_on()?;
        let years = i64::from(date.year() - as_of.year());
        let months = i64::from(date.month()) - i64::from(as_of.month());
        Some(years * 12 + months)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersonnelRecord {
        PersonnelRecord {
            designation: "MGR, PETROLEUM ENGINEERING".to_string(),
            retirement_date: "2026-03-14".to_string(),
            discipline: "Reservoir Engineering".to_string(),
            grade_level: "M5".to_string(),
            id_no: 20145,
            location: "Port Harcourt".to_string(),
            area: "Engineering".to_string(),
            qualification: "B.ENG PETROLEUM ENGINEERING 1992".to_string(),
            sbu: "NEPL".to_string(),
            sex: Sex::F,
            role_group: RoleGroup::TechnicalExpert,
            risk_category: RiskCategory::Critical,
        }
    }

    #[test]
    fn urgency_orders_critical_first() {
        let mut categories = RiskCategory::ALL.to_vec();
        categories.sort();
        assert_eq!(
            categories,
            vec![
                RiskCategory::Low,
                RiskCategory::Medium,
                RiskCategory::High,
                RiskCategory::Critical
            ]
        );
        assert!(RiskCategory::Critical > RiskCategory::High);
    }

    #[test]
    fn field_values_follow_header_order() {
        let record = sample();
        let values = record.field_values();
        assert_eq!(values[4], "20145");
        assert_eq!(values[10], "Technical Expert");
        assert_eq!(values[11], "critical");
        assert_eq!(values.len(), RECORD_HEADERS.len());
    }

    #[test]
    fn enums_parse_their_display_text() {
        for role in RoleGroup::ALL {
            assert_eq!(role.as_str().parse::<RoleGroup>().unwrap(), role);
        }
        for risk in RiskCategory::ALL {
            assert_eq!(risk.as_str().parse::<RiskCategory>().unwrap(), risk);
        }
        assert!("Critical".parse::<RiskCategory>().is_err());
        assert!("X".parse::<Sex>().is_err());
    }

    #[test]
    fn months_to_retirement_counts_calendar_months() {
        let record = sample();
        let as_of = NaiveDate::from_ymd_opt(2025, 10, 30).unwrap();
        assert_eq!(record.months_to_retirement(as_of), Some(5));
        assert!(record.retires_in(2026));
        assert!(!record.retires_in(2027));
    }

    #[test]
    fn unparsable_retirement_date_yields_none() {
        let mut record = sample();
        record.retirement_date = "Sept 2026".to_string();
        assert!(record.retirement_on().is_none());
    }
}
