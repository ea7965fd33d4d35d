use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::filter::{self, FilterCriteria};
use crate::kpi::{KpiBoard, KpiInput, MetricKey, ZeroPolicy, MONTH_COUNT};
use crate::models::PersonnelRecord;
use crate::risk::{self, GradeCount, RiskMatrix, SbuRisk, SummaryCounts};
use crate::store::RecordStore;

/// Shared-secret switch for target editing. Plain string equality.
#[derive(Debug, Clone)]
pub struct CustodianGate {
    secret: String,
}

impl CustodianGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn check(&self, attempt: &str) -> bool {
        !self.secret.is_empty() && attempt == self.secret
    }
}

/// Everything one user works with: the dataset, the current filter, the KPI
/// board and whether custodian mode is on.
#[derive(Debug, Clone)]
pub struct Session {
    store: RecordStore,
    criteria: FilterCriteria,
    visible: Vec<usize>,
    board: KpiBoard,
    gate: CustodianGate,
    custodian: bool,
    reporting_year: i32,
}

impl Session {
    pub fn new(store: RecordStore, gate: CustodianGate, policy: ZeroPolicy, reporting_year: i32) -> Self {
        let visible = (0..store.len()).collect();
        Self {
            store,
            criteria: FilterCriteria::default(),
            visible,
            board: KpiBoard::new(policy),
            gate,
            custodian: false,
            reporting_year,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn reporting_year(&self) -> i32 {
        self.reporting_year
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Re-filters only when the criteria actually changed.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if criteria == self.criteria {
            return;
        }
        self.visible = filter::matching_indices(self.store.all(), &criteria);
        debug!(?criteria, visible = self.visible.len(), "filter criteria changed");
        self.criteria = criteria;
    }

    /// Current filtered view, in store order.
    pub fn rows(&self) -> Vec<&PersonnelRecord> {
        let records = self.store.all();
        self.visible.iter().map(|index| &records[*index]).collect()
    }

    pub fn summary(&self) -> SummaryCounts {
        risk::summary_counts(&self.rows(), self.reporting_year)
    }

    pub fn risk_by_sbu(&self) -> Vec<SbuRisk> {
        risk::risk_by_sbu(&self.rows())
    }

    pub fn distribution_by_grade(&self) -> Vec<GradeCount> {
        risk::distribution_by_grade(&self.rows())
    }

    pub fn risk_matrix(&self) -> RiskMatrix<'_> {
        risk::risk_matrix(&self.rows())
    }

    pub fn board(&self) -> &KpiBoard {
        &self.board
    }

    pub fn unlock(&mut self, attempt: &str) -> bool {
        self.custodian = self.gate.check(attempt);
        if self.custodian {
            info!("custodian mode enabled");
        } else {
            warn!("custodian unlock rejected");
        }
        self.custodian
    }

    pub fn lock(&mut self) {
        self.custodian = false;
    }

    pub fn is_custodian(&self) -> bool {
        self.custodian
    }

    pub fn set_monthly_value(&mut self, key: MetricKey, month: usize, value: f64) -> Result<()> {
        self.board.set_monthly_value(key, month, value)
    }

    pub fn set_target(&mut self, key: MetricKey, value: f64) -> Result<()> {
        if !self.custodian {
            return Err(Error::CustodianRequired);
        }
        self.board.set_target(key, value);
        Ok(())
    }

    /// Applies bulk entries; targets need custodian mode. Either every entry
    /// lands or the board is left as it was.
    pub fn apply_kpi_input(&mut self, input: &KpiInput) -> Result<()> {
        if !input.targets.is_empty() && !self.custodian {
            return Err(Error::CustodianRequired);
        }
        if input.values.values().any(|months| months.len() > MONTH_COUNT) {
            return Err(Error::MonthOutOfRange { month: MONTH_COUNT });
        }

        let mut board = self.board.clone();
        for (key, months) in &input.values {
            for (month, value) in months.iter().enumerate() {
                match value {
                    Some(value) => board.set_monthly_value(*key, month, *value)?,
                    None => board.clear_monthly_value(*key, month)?,
                }
            }
        }
        for (key, target) in &input.targets {
            board.set_target(*key, *target);
        }
        self.board = board;

        info!(
            metrics = input.values.len(),
            targets = input.targets.len(),
            "applied KPI entries"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{QuickFilter, Selection};

    fn session() -> Session {
        Session::new(
            RecordStore::seeded(),
            CustodianGate::new("open-sesame"),
            ZeroPolicy::Sentinel,
            2026,
        )
    }

    #[test]
    fn starts_with_the_full_dataset() {
        let session = session();
        assert_eq!(session.rows().len(), 5);
        assert!(session.criteria().is_unconstrained());
    }

    #[test]
    fn criteria_changes_refresh_the_view() {
        let mut session = session();
        session.set_criteria(FilterCriteria {
            quick_filter: QuickFilter::Critical,
            ..Default::default()
        });
        let ids: Vec<u32> = session.rows().iter().map(|r| r.id_no).collect();
        assert_eq!(ids, vec![19683, 20145]);
        assert_eq!(session.summary().critical, 2);

        session.set_criteria(FilterCriteria {
            field_filters: crate::filter::FieldFilters {
                sbu: Selection::Only("NEPL".to_string()),
                ..Default::default()
            },
            ..Default::default()
        });
        let groups = session.risk_by_sbu();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].tally.total, 2);
    }

    #[test]
    fn memoised_view_matches_fresh_filtering() {
        let mut session = session();
        let criteria = FilterCriteria {
            search_term: "engineering".to_string(),
            ..Default::default()
        };
        session.set_criteria(criteria.clone());
        session.set_criteria(criteria.clone());
        let fresh = filter::apply(session.store().all(), &criteria);
        assert_eq!(session.rows(), fresh);
    }

    #[test]
    fn targets_require_custodian_mode() {
        let mut session = session();
        let err = session.set_target(MetricKey::ReuseRate, 30.0).unwrap_err();
        assert!(matches!(err, Error::CustodianRequired));

        assert!(!session.unlock("wrong"));
        assert!(session.unlock("open-sesame"));
        session.set_target(MetricKey::ReuseRate, 30.0).unwrap();
        assert_eq!(session.board().metric(MetricKey::ReuseRate).target, 30.0);

        session.lock();
        assert!(!session.is_custodian());
    }

    #[test]
    fn empty_secret_never_unlocks() {
        let gate = CustodianGate::new("");
        assert!(!gate.check(""));
    }

    #[test]
    fn monthly_values_are_open_to_everyone() {
        let mut session = session();
        session.set_monthly_value(MetricKey::ReuseRate, 0, 12.0).unwrap();
        assert_eq!(session.board().current_value(MetricKey::ReuseRate), 12.0);
    }

    #[test]
    fn bulk_input_applies_values_and_gates_targets() {
        let mut session = session();
        let input: KpiInput = serde_json::from_str(
            r#"{ "values": { "reuseRate": [10, 20] }, "targets": { "reuseRate": 15 } }"#,
        )
        .unwrap();

        let before = session.board().clone();
        assert!(matches!(
            session.apply_kpi_input(&input),
            Err(Error::CustodianRequired)
        ));
        assert_eq!(session.board(), &before);
        assert_eq!(session.board().current_value(MetricKey::ReuseRate), 0.0);

        session.unlock("open-sesame");
        session.apply_kpi_input(&input).unwrap();
        assert_eq!(session.board().current_value(MetricKey::ReuseRate), 20.0);
        assert_eq!(session.board().metric(MetricKey::ReuseRate).target, 15.0);
    }

    #[test]
    fn bulk_input_rejects_thirteenth_month() {
        let mut session = session();
        let input = KpiInput {
            values: [
                (MetricKey::CreationRate, vec![Some(5.0); 3]),
                (MetricKey::ReuseRate, vec![Some(1.0); 13]),
                (MetricKey::RemovalRate, vec![Some(50.0)]),
            ]
            .into_iter()
            .collect(),
            ..Default::default()
        };
        assert!(matches!(
            session.apply_kpi_input(&input),
            Err(Error::MonthOutOfRange { month: 12 })
        ));
        assert!(!session.board().has_data());
    }
}
