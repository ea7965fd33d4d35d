use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{PersonnelRecord, RoleGroup, RiskCategory, Sex};

/// Read-only personnel dataset, loaded once per session.
#[derive(Debug, Clone)]
pub struct RecordStore {
    records: Vec<PersonnelRecord>,
}

impl RecordStore {
    pub fn from_records(records: Vec<PersonnelRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id_no) {
                return Err(Error::DuplicateId(record.id_no));
            }
        }
        debug!(records = records.len(), "record store ready");
        Ok(Self { records })
    }

    /// The built-in heatmap dataset.
    pub fn seeded() -> Self {
        Self {
            records: seed_records(),
        }
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let store = Self::from_reader(file)?;
        info!(path = %path.display(), records = store.len(), "loaded personnel dataset");
        Ok(store)
    }

    /// Reads the same twelve-column layout the export adapter writes.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        #[derive(Deserialize)]
        struct CsvRow {
            #[serde(rename = "Designation")]
            designation: String,
            #[serde(rename = "RetirementDate")]
            retirement_date: String,
            #[serde(rename = "Discipline")]
            discipline: String,
            #[serde(rename = "GradeLevel")]
            grade_level: String,
            #[serde(rename = "ID")]
            id_no: u32,
            #[serde(rename = "Location")]
            location: String,
            #[serde(rename = "Area")]
            area: String,
            #[serde(rename = "Qualification")]
            qualification: String,
            #[serde(rename = "SBU")]
            sbu: String,
            #[serde(rename = "Sex")]
            sex: String,
            #[serde(rename = "RoleGroup")]
            role_group: String,
            #[serde(rename = "RiskCategory")]
            risk_category: String,
        }

        let mut reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in reader.deserialize::<CsvRow>() {
            let row = result?;
            records.push(PersonnelRecord {
                designation: row.designation,
                retirement_date: row.retirement_date,
                discipline: row.discipline,
                grade_level: row.grade_level,
                id_no: row.id_no,
                location: row.location,
                area: row.area,
                qualification: row.qualification,
                sbu: row.sbu,
                sex: row.sex.parse::<Sex>()?,
                role_group: row.role_group.parse::<RoleGroup>()?,
                risk_category: row.risk_category.parse::<RiskCategory>()?,
            });
        }

        Self::from_records(records)
    }

    /// Full dataset in load order.
    pub fn all(&self) -> &[PersonnelRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn seed_records() -> Vec<PersonnelRecord> {
    let rows = [
        (
            "CHIEF, CORP LAW & BOARD MATTERS - LGL",
            "2026-09-14",
            "Leadership",
            "M3",
            19683,
            "Abuja",
            "GCEO, Legal",
            "B.L 1989, FSLC 1977, LL.B 1989, WASC 1983",
            "CHQ",
            Sex::M,
            RoleGroup::Leadership,
            RiskCategory::Critical,
        ),
        (
            "MD, NNPC FOUNDATION",
            "2026-12-24",
            "Leadership",
            "M3",
            15805,
            "Abuja",
            "Foundation",
            "B.L 1988, LL.B 1987",
            "CHQ",
            Sex::M,
            RoleGroup::Leadership,
            RiskCategory::High,
        ),
        (
            "MGR, PETROLEUM ENGINEERING",
            "2026-03-14",
            "Reservoir Engineering",
            "M5",
            20145,
            "Port Harcourt",
            "Engineering",
            "B.ENG PETROLEUM ENGINEERING 1992, M.SC RESERVOIR ENGINEERING",
            "NEPL",
            Sex::F,
            RoleGroup::TechnicalExpert,
            RiskCategory::Critical,
        ),
        (
            "DM, OPERATIONS & MAINTENANCE",
            "2026-08-19",
            "Maintenance Engineering",
            "M6",
            21234,
            "Warri",
            "Operations",
            "HND MECHANICAL ENGINEERING 1994",
            "NEPL",
            Sex::M,
            RoleGroup::Specialist,
            RiskCategory::Medium,
        ),
        (
            "LEAD PRODUCTION OPERATOR",
            "2027-01-09",
            "Production Operations",
            "SS1",
            22345,
            "Lagos",
            "Production",
            "HND CHEMICAL ENGINEERING 2005",
            "KRPC",
            Sex::F,
            RoleGroup::Specialist,
            RiskCategory::Low,
        ),
    ];

    rows.into_iter()
        .map(
            |(
                designation,
                retirement_date,
                discipline,
                grade_level,
                id_no,
                location,
                area,
                qualification,
                sbu,
                sex,
                role_group,
                risk_category,
            )| PersonnelRecord {
                designation: designation.to_string(),
                retirement_date: retirement_date.to_string(),
                discipline: discipline.to_string(),
                grade_level: grade_level.to_string(),
                id_no,
                location: location.to_string(),
                area: area.to_string(),
                qualification: qualification.to_string(),
                sbu: sbu.to_string(),
                sex,
                role_group,
                risk_category,
            },
        )
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Designation,RetirementDate,Discipline,GradeLevel,ID,Location,Area,Qualification,SBU,Sex,RoleGroup,RiskCategory\n";

    #[test]
    fn seeded_store_keeps_dataset_order() {
        let store = RecordStore::seeded();
        let ids: Vec<u32> = store.all().iter().map(|r| r.id_no).collect();
        assert_eq!(ids, vec![19683, 15805, 20145, 21234, 22345]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut records = RecordStore::seeded().all().to_vec();
        records.push(records[0].clone());
        let err = RecordStore::from_records(records).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(19683)));
    }

    #[test]
    fn reads_export_layout() {
        let csv = format!(
            "{HEADER}\"ENGINEER, \"\"PIPELINES\"\"\",2030-01-01,Pipelines,M7,1,Kaduna,Ops,B.ENG,KRPC,F,Technical Expert,high\n"
        );
        let store = RecordStore::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        let record = &store.all()[0];
        assert_eq!(record.designation, "ENGINEER, \"PIPELINES\"");
        assert_eq!(record.role_group, RoleGroup::TechnicalExpert);
        assert_eq!(record.risk_category, RiskCategory::High);
    }

    #[test]
    fn reports_unknown_enum_text() {
        let csv = format!("{HEADER}A,2030-01-01,B,M7,1,C,D,E,KRPC,X,Specialist,low\n");
        let err = RecordStore::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InvalidField { field: "sex", .. }));
    }
}
