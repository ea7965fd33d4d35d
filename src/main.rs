use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use km_risk_analytics::chart::{self, ChartData};
use km_risk_analytics::config::Settings;
use km_risk_analytics::filter::{self, FieldFilters, FilterCriteria, QuickFilter, Selection};
use km_risk_analytics::kpi::{Category, KpiInput, MetricKey};
use km_risk_analytics::models::{RiskCategory, RoleGroup, Sex};
use km_risk_analytics::session::{CustodianGate, Session};
use km_risk_analytics::store::RecordStore;
use km_risk_analytics::workshop::Checklist;
use km_risk_analytics::{export, logging, report, risk};

#[derive(Parser)]
#[command(name = "km-analytics", version)]
#[command(about = "Knowledge risk heatmap and KM KPI analytics", long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Personnel CSV replacing the built-in dataset
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// None, Leadership, Female, Retiring or Retiring<Year>, Critical, Moderate, Low
    #[arg(long, default_value = "None")]
    quick: String,
    #[arg(long, default_value = "All")]
    sbu: String,
    #[arg(long, default_value = "All")]
    grade: String,
    #[arg(long, default_value = "All")]
    location: String,
    #[arg(long, default_value = "All")]
    sex: String,
    /// Case-insensitive text matched against every field
    #[arg(long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn criteria(&self, reporting_year: i32) -> anyhow::Result<FilterCriteria> {
        let quick_filter = if self.quick.trim().eq_ignore_ascii_case("retiring") {
            QuickFilter::Retiring(reporting_year)
        } else {
            self.quick.parse()?
        };

        Ok(FilterCriteria {
            quick_filter,
            field_filters: FieldFilters {
                sbu: Selection::parse(&self.sbu)?,
                grade_level: Selection::parse(&self.grade)?,
                location: Selection::parse(&self.location)?,
                sex: Selection::<Sex>::parse(&self.sex)?,
            },
            search_term: self.search.clone(),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List the filtered personnel records
    List {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Summary counts, SBU breakdown, grade distribution and risk matrix
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long)]
        json: bool,
    },
    /// Show the values each field filter accepts
    Options,
    /// Export the filtered records as CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown risk report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        /// KPI entries to include as a scorecard
        #[arg(long)]
        kpi_input: Option<PathBuf>,
        /// Custodian secret, required when the KPI input changes targets
        #[arg(long, env = "KM_UNLOCK", hide_env_values = true)]
        unlock: Option<String>,
        #[arg(long, default_value = "risk-report.md")]
        out: PathBuf,
    },
    /// Evaluate KPI entries and print the scorecard or chart data
    Kpi {
        /// JSON file of monthly values and targets
        #[arg(long)]
        input: Option<PathBuf>,
        /// Custodian secret, required when the input changes targets
        #[arg(long, env = "KM_UNLOCK", hide_env_values = true)]
        unlock: Option<String>,
        /// `dashboard`, a category id or a metric key
        #[arg(long)]
        chart: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show the capture-workshop checklist progress
    Workshop {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref()).context("failed to load settings")?;
    if let Some(dataset) = cli.dataset {
        settings.dataset = Some(dataset);
    }
    logging::init(&settings.logging, cli.verbose, cli.quiet)?;

    let store = match &settings.dataset {
        Some(path) => RecordStore::from_csv_path(path)
            .with_context(|| format!("failed to load dataset {}", path.display()))?,
        None => RecordStore::seeded(),
    };
    let mut session = Session::new(
        store,
        CustodianGate::new(settings.custodian_secret.clone()),
        settings.zero_policy,
        settings.reporting_year,
    );

    match cli.command {
        Commands::List { filters, json } => {
            session.set_criteria(filters.criteria(session.reporting_year())?);
            let rows = session.rows();
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
                return Ok(());
            }
            if rows.is_empty() {
                println!("No personnel match these filters.");
                return Ok(());
            }
            println!("Personnel database - {} records:", rows.len());
            for record in rows {
                println!(
                    "- [{}] {} ({}, {}, {}) retires {} - {} / {}",
                    record.id_no,
                    record.designation,
                    record.sbu,
                    record.grade_level,
                    record.location,
                    record.retirement_date,
                    record.role_group,
                    record.risk_category
                );
            }
        }
        Commands::Summary { filters, json } => {
            session.set_criteria(filters.criteria(session.reporting_year())?);
            print_summary(&session, json)?;
        }
        Commands::Options => {
            let options = filter::filter_options(session.store().all());
            println!("SBU: {}", options.sbus.join(", "));
            println!("Grade: {}", options.grades.join(", "));
            println!("Location: {}", options.locations.join(", "));
            println!("Sex: {}", options.sexes.join(", "));
        }
        Commands::Export { filters, out } => {
            session.set_criteria(filters.criteria(session.reporting_year())?);
            let rows = session.rows();
            match out {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("failed to create {}", path.display()))?;
                    export::write_csv(&rows, file)?;
                    println!("Exported {} records to {}.", rows.len(), path.display());
                }
                None => export::write_csv(&rows, std::io::stdout().lock())?,
            }
        }
        Commands::Report {
            filters,
            kpi_input,
            unlock,
            out,
        } => {
            let criteria = filters.criteria(session.reporting_year())?;
            let scope = (!criteria.is_unconstrained()).then(|| describe(&criteria));
            session.set_criteria(criteria);
            load_kpi(&mut session, kpi_input, unlock)?;
            let board_for_report = session.board().has_data().then(|| session.board());
            let report = report::build_report(
                scope.as_deref(),
                &session.rows(),
                session.reporting_year(),
                chrono::Local::now().date_naive(),
                board_for_report,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Kpi {
            input,
            unlock,
            chart,
            json,
        } => {
            load_kpi(&mut session, input, unlock)?;
            match chart {
                Some(name) => {
                    let data = chart_for(&session, &name)?;
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
                None => print_scorecard(&session, json)?,
            }
        }
        Commands::Workshop { json } => {
            let checklist = Checklist::default();
            let progress = checklist.progress();
            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
                return Ok(());
            }
            println!(
                "Workshop checklist: {} of {} tasks completed ({})",
                progress.overall.completed,
                progress.overall.total,
                risk::format_share(progress.overall.completed, progress.overall.total)
            );
            for section in &progress.sections {
                println!(
                    "- {}: {}/{} completed, {} in progress, {} not started",
                    section.title,
                    section.progress.completed,
                    section.progress.total,
                    section.progress.in_progress + section.progress.started,
                    section.progress.not_started
                );
            }
        }
    }

    Ok(())
}

fn describe(criteria: &FilterCriteria) -> String {
    let mut parts = Vec::new();
    if criteria.quick_filter != QuickFilter::None {
        parts.push(format!("quick filter {}", criteria.quick_filter));
    }
    let fields = &criteria.field_filters;
    if let Selection::Only(sbu) = &fields.sbu {
        parts.push(format!("SBU {sbu}"));
    }
    if let Selection::Only(grade) = &fields.grade_level {
        parts.push(format!("grade {grade}"));
    }
    if let Selection::Only(location) = &fields.location {
        parts.push(format!("location {location}"));
    }
    if let Selection::Only(sex) = &fields.sex {
        parts.push(format!("sex {sex}"));
    }
    if !criteria.search_term.trim().is_empty() {
        parts.push(format!("search \"{}\"", criteria.search_term.trim()));
    }
    parts.join(", ")
}

/// Enters custodian mode if asked, then applies the KPI input file.
fn load_kpi(session: &mut Session, input: Option<PathBuf>, unlock: Option<String>) -> anyhow::Result<()> {
    if let Some(secret) = unlock {
        if !session.unlock(&secret) {
            bail!("custodian secret rejected");
        }
    }
    let Some(path) = input else {
        return Ok(());
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let input: KpiInput = serde_json::from_str(&content)
        .with_context(|| format!("invalid KPI input {}", path.display()))?;
    session
        .apply_kpi_input(&input)
        .with_context(|| format!("failed to apply {}", path.display()))?;
    Ok(())
}

fn chart_for(session: &Session, name: &str) -> anyhow::Result<ChartData> {
    let board = session.board();
    if name.eq_ignore_ascii_case("dashboard") {
        return Ok(chart::dashboard_chart(board));
    }
    if let Ok(category) = name.parse::<Category>() {
        return Ok(chart::category_chart(board, category));
    }
    let key = name.parse::<MetricKey>()?;
    Ok(chart::metric_chart(board, key))
}

fn print_summary(session: &Session, json: bool) -> anyhow::Result<()> {
    let counts = session.summary();
    let by_sbu = session.risk_by_sbu();
    let by_grade = session.distribution_by_grade();
    let matrix = session.risk_matrix();

    if json {
        let matrix_json: serde_json::Map<String, serde_json::Value> = RoleGroup::ALL
            .into_iter()
            .map(|role| {
                let cells: serde_json::Map<String, serde_json::Value> = RiskCategory::ALL
                    .into_iter()
                    .map(|risk| {
                        let ids: Vec<u32> = matrix.cell(role, risk).iter().map(|r| r.id_no).collect();
                        (risk.to_string(), serde_json::json!(ids))
                    })
                    .collect();
                (role.to_string(), serde_json::Value::Object(cells))
            })
            .collect();
        let value = serde_json::json!({
            "summary": counts,
            "riskBySbu": by_sbu,
            "distributionByGrade": by_grade,
            "riskMatrix": matrix_json,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("Records: {} across {} SBUs", counts.total, counts.unique_sbus);
    println!(
        "Leadership: {} | Critical: {} | Moderate: {} | Low: {} | Retiring in {}: {} | Female: {}",
        counts.leadership,
        counts.critical,
        counts.moderate,
        counts.low,
        session.reporting_year(),
        counts.retiring,
        counts.female
    );

    println!();
    println!("Risk by SBU:");
    for group in &by_sbu {
        let t = group.tally;
        println!(
            "- {} ({}): critical {}, high {}, medium {}, low {}",
            group.sbu, t.total, t.critical, t.high, t.medium, t.low
        );
    }

    println!();
    println!("Personnel by grade:");
    for grade in &by_grade {
        println!(
            "- {}: {} ({})",
            grade.grade,
            grade.count,
            risk::format_share(grade.count, counts.total)
        );
    }

    println!();
    println!("Risk matrix (critical / moderate / low):");
    for role in RoleGroup::ALL {
        println!(
            "- {}: {} / {} / {}",
            role,
            matrix.count(role, RiskCategory::Critical),
            matrix.moderate(role).len(),
            matrix.count(role, RiskCategory::Low)
        );
    }

    Ok(())
}

fn print_scorecard(session: &Session, json: bool) -> anyhow::Result<()> {
    let board = session.board();
    let dashboard = board.dashboard();

    if json {
        let metrics: Vec<serde_json::Value> = MetricKey::ALL
            .into_iter()
            .map(|key| {
                serde_json::json!({
                    "key": key,
                    "currentValue": board.current_value(key),
                    "target": board.metric(key).target,
                    "status": board.status(key),
                    "monthsReported": board.months_reported(key),
                })
            })
            .collect();
        let value = serde_json::json!({ "dashboard": dashboard, "metrics": metrics });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    match dashboard.overall_health {
        Some(score) => println!("Overall KM health: {score}%"),
        None => println!("Overall KM health: --"),
    }
    for category in Category::ALL {
        println!();
        println!("{}:", category.name());
        for key in category.metrics() {
            let metric = board.metric(key);
            println!(
                "- {}: {}{} (target {}{}, {}, {} months reported)",
                key,
                board.current_value(key),
                key.unit(),
                metric.target,
                key.unit(),
                board.status(key),
                board.months_reported(key)
            );
        }
    }

    Ok(())
}
