use std::fmt::Write;

use chrono::NaiveDate;

use crate::kpi::{KpiBoard, MetricKey};
use crate::models::{PersonnelRecord, RiskCategory, RoleGroup};
use crate::risk;

const UPCOMING_LIMIT: usize = 10;

fn designations(records: &[&PersonnelRecord]) -> String {
    if records.is_empty() {
        return "—".to_string();
    }
    let names: Vec<&str> = records.iter().map(|r| r.designation.as_str()).collect();
    format!("{} ({})", records.len(), names.join("; "))
}

fn format_reading(value: f64, unit: &str) -> String {
    if value == 0.0 {
        "--".to_string()
    } else {
        format!("{value:.1}{unit}")
    }
}

/// Markdown risk report for the filtered rows, optionally with the KPI
/// scorecard appended.
pub fn build_report(
    scope: Option<&str>,
    rows: &[&PersonnelRecord],
    retiring_year: i32,
    as_of: NaiveDate,
    board: Option<&KpiBoard>,
) -> String {
    let counts = risk::summary_counts(rows, retiring_year);
    let by_sbu = risk::risk_by_sbu(rows);
    let by_grade = risk::distribution_by_grade(rows);
    let matrix = risk::risk_matrix(rows);

    let mut output = String::new();
    let scope_label = scope.unwrap_or("all personnel");

    let _ = writeln!(output, "# Knowledge Risk Report");
    let _ = writeln!(
        output,
        "Generated {} for {} ({} records)",
        as_of, scope_label, counts.total
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Leadership positions: {}", counts.leadership);
    let _ = writeln!(output, "- Critical risk: {}", counts.critical);
    let _ = writeln!(output, "- Moderate risk: {}", counts.moderate);
    let _ = writeln!(output, "- Lower risk: {}", counts.low);
    let _ = writeln!(output, "- Retiring in {}: {}", retiring_year, counts.retiring);
    let _ = writeln!(output, "- Female personnel: {}", counts.female);
    let _ = writeln!(output, "- SBUs represented: {}", counts.unique_sbus);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk by SBU");
    if by_sbu.is_empty() {
        let _ = writeln!(output, "No personnel match this view.");
    } else {
        for group in &by_sbu {
            let t = group.tally;
            let _ = writeln!(
                output,
                "- {} ({}): critical {}, high {}, medium {}, low {}",
                group.sbu, t.total, t.critical, t.high, t.medium, t.low
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Personnel by Grade");
    if by_grade.is_empty() {
        let _ = writeln!(output, "No personnel match this view.");
    } else {
        for grade in &by_grade {
            let _ = writeln!(
                output,
                "- {}: {} ({})",
                grade.grade,
                grade.count,
                risk::format_share(grade.count, counts.total)
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Matrix");
    let _ = writeln!(output, "| Role | Critical | Moderate | Low |");
    let _ = writeln!(output, "| --- | --- | --- | --- |");
    for role in RoleGroup::ALL {
        let _ = writeln!(
            output,
            "| {} | {} | {} | {} |",
            role,
            designations(matrix.cell(role, RiskCategory::Critical)),
            designations(&matrix.moderate(role)),
            designations(matrix.cell(role, RiskCategory::Low)),
        );
    }

    let mut upcoming: Vec<(NaiveDate, &PersonnelRecord)> = rows
        .iter()
        .filter_map(|record| record.retirement_on().map(|date| (date, *record)))
        .filter(|(date, _)| *date >= as_of)
        .collect();
    upcoming.sort_by(|a, b| a.0.cmp(&b.0));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Upcoming Retirements");
    if upcoming.is_empty() {
        let _ = writeln!(output, "No upcoming retirements in this view.");
    } else {
        for (date, record) in upcoming.iter().take(UPCOMING_LIMIT) {
            let months = record.months_to_retirement(as_of).unwrap_or_default();
            let _ = writeln!(
                output,
                "- {} ({}, {}) on {} ({} months, {})",
                record.designation, record.sbu, record.location, date, months, record.risk_category
            );
        }
    }

    if let Some(board) = board {
        let _ = writeln!(output);
        let _ = writeln!(output, "## KPI Scorecard");
        match board.overall_health() {
            Some(score) => {
                let _ = writeln!(output, "Overall KM health: {score}%");
            }
            None => {
                let _ = writeln!(output, "Overall KM health: --");
            }
        }
        for key in MetricKey::ALL {
            let metric = board.metric(key);
            let _ = writeln!(
                output,
                "- {}: {} (target {}{}, {})",
                key.title(),
                format_reading(board.current_value(key), key.unit()),
                metric.target,
                key.unit(),
                board.status(key)
            );
        }
    }

    output
}
