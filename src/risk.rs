use std::collections::HashMap;

use serde::Serialize;

use crate::models::{PersonnelRecord, RiskCategory, RoleGroup, Sex};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub total: usize,
    pub leadership: usize,
    pub critical: usize,
    pub moderate: usize,
    pub low: usize,
    pub retiring: usize,
    pub female: usize,
    pub unique_sbus: usize,
}

fn count_where(rows: &[&PersonnelRecord], predicate: impl Fn(&PersonnelRecord) -> bool) -> usize {
    rows.iter().filter(|record| predicate(record)).count()
}

pub fn summary_counts(rows: &[&PersonnelRecord], retiring_year: i32) -> SummaryCounts {
    let mut sbus: Vec<&str> = rows.iter().map(|r| r.sbu.as_str()).collect();
    sbus.sort_unstable();
    sbus.dedup();

    SummaryCounts {
        total: rows.len(),
        leadership: count_where(rows, |r| r.role_group == RoleGroup::Leadership),
        critical: count_where(rows, |r| r.risk_category == RiskCategory::Critical),
        moderate: count_where(rows, |r| r.risk_category.is_moderate()),
        low: count_where(rows, |r| r.risk_category == RiskCategory::Low),
        retiring: count_where(rows, |r| r.retires_in(retiring_year)),
        female: count_where(rows, |r| r.sex == Sex::F),
        unique_sbus: sbus.len(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskTally {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub total: usize,
}

impl RiskTally {
    pub fn add(&mut self, category: RiskCategory) {
        match category {
            RiskCategory::Critical => self.critical += 1,
            RiskCategory::High => self.high += 1,
            RiskCategory::Medium => self.medium += 1,
            RiskCategory::Low => self.low += 1,
        }
        self.total += 1;
    }

    pub fn get(&self, category: RiskCategory) -> usize {
        match category {
            RiskCategory::Critical => self.critical,
            RiskCategory::High => self.high,
            RiskCategory::Medium => self.medium,
            RiskCategory::Low => self.low,
        }
    }

    pub fn moderate(&self) -> usize {
        self.high + self.medium
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SbuRisk {
    pub sbu: String,
    #[serde(flatten)]
    pub tally: RiskTally,
}

/// Risk counts per SBU, in order of each SBU's first appearance in `rows`.
pub fn risk_by_sbu(rows: &[&PersonnelRecord]) -> Vec<SbuRisk> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<SbuRisk> = Vec::new();

    for record in rows {
        let index = *positions.entry(record.sbu.as_str()).or_insert_with(|| {
            groups.push(SbuRisk {
                sbu: record.sbu.clone(),
                tally: RiskTally::default(),
            });
            groups.len() - 1
        });
        groups[index].tally.add(record.risk_category);
    }

    groups
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GradeCount {
    pub grade: String,
    pub count: usize,
}

/// Head count per grade level, first-seen order.
pub fn distribution_by_grade(rows: &[&PersonnelRecord]) -> Vec<GradeCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut grades: Vec<GradeCount> = Vec::new();

    for record in rows {
        let index = *positions
            .entry(record.grade_level.as_str())
            .or_insert_with(|| {
                grades.push(GradeCount {
                    grade: record.grade_level.clone(),
                    count: 0,
                });
                grades.len() - 1
            });
        grades[index].count += 1;
    }

    grades
}

/// `count / total * 100` rounded to one decimal; `None` when `total` is zero.
pub fn share_percent(count: usize, total: usize) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let percent = count as f64 / total as f64 * 100.0;
    Some((percent * 10.0).round() / 10.0)
}

pub fn format_share(count: usize, total: usize) -> String {
    match share_percent(count, total) {
        Some(percent) => format!("{percent:.1}%"),
        None => "—".to_string(),
    }
}

/// Role group × risk category grid of records. High and medium stay separate
/// columns; [`RiskMatrix::moderate`] recombines them.
#[derive(Debug, Clone, Default)]
pub struct RiskMatrix<'a> {
    cells: [[Vec<&'a PersonnelRecord>; 4]; 3],
}

impl<'a> RiskMatrix<'a> {
    pub fn cell(&self, role: RoleGroup, risk: RiskCategory) -> &[&'a PersonnelRecord] {
        &self.cells[role.index()][risk.index()]
    }

    pub fn count(&self, role: RoleGroup, risk: RiskCategory) -> usize {
        self.cell(role, risk).len()
    }

    /// High-risk records followed by medium-risk ones.
    pub fn moderate(&self, role: RoleGroup) -> Vec<&'a PersonnelRecord> {
        self.cell(role, RiskCategory::High)
            .iter()
            .chain(self.cell(role, RiskCategory::Medium))
            .copied()
            .collect()
    }

    pub fn total(&self) -> usize {
        self.cells.iter().flatten().map(Vec::len).sum()
    }
}

pub fn risk_matrix<'a>(rows: &[&'a PersonnelRecord]) -> RiskMatrix<'a> {
    let mut matrix = RiskMatrix::default();
    for record in rows {
        matrix.cells[record.role_group.index()][record.risk_category.index()].push(*record);
    }
    matrix
}
