//! Monthly KPI series: current value, target status and composite health.
//!
//! Each metric holds twelve month slots (Jan..Dec). A slot is either unset or
//! holds a non-negative finite reading. Under [`ZeroPolicy::Sentinel`] a stored
//! zero is read back as unset, so a blank month and a reported zero behave the
//! same; [`ZeroPolicy::Reported`] keeps zero as a real reading.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const MONTH_COUNT: usize = 12;

pub const MONTHS: [&str; MONTH_COUNT] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Warning band width as a fraction of target.
const WARNING_BAND: f64 = 0.2;

/// Composite scores are percentages.
const SCORE_CEILING: f64 = 100.0;

/// Rescales the 1–5 quality rating onto 20–100.
const QUALITY_SCALE: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKey {
    CreationRate,
    RetentionRate,
    ParticipationRate,
    CollaborationIndex,
    FactPackDownloadRate,
    AssetDownloadRate,
    ReuseRate,
    PlatformAdoptionRate,
    ResponseTime,
    ProcessImprovementRate,
    DecisionMakingContribution,
    QualityIndex,
    RemovalRate,
}

impl MetricKey {
    pub const ALL: [MetricKey; 13] = [
        MetricKey::CreationRate,
        MetricKey::RetentionRate,
        MetricKey::ParticipationRate,
        MetricKey::CollaborationIndex,
        MetricKey::FactPackDownloadRate,
        MetricKey::AssetDownloadRate,
        MetricKey::ReuseRate,
        MetricKey::PlatformAdoptionRate,
        MetricKey::ResponseTime,
        MetricKey::ProcessImprovementRate,
        MetricKey::DecisionMakingContribution,
        MetricKey::QualityIndex,
        MetricKey::RemovalRate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::CreationRate => "creationRate",
            MetricKey::RetentionRate => "retentionRate",
            MetricKey::ParticipationRate => "participationRate",
            MetricKey::CollaborationIndex => "collaborationIndex",
            MetricKey::FactPackDownloadRate => "factPackDownloadRate",
            MetricKey::AssetDownloadRate => "assetDownloadRate",
            MetricKey::ReuseRate => "reuseRate",
            MetricKey::PlatformAdoptionRate => "platformAdoptionRate",
            MetricKey::ResponseTime => "responseTime",
            MetricKey::ProcessImprovementRate => "processImprovementRate",
            MetricKey::DecisionMakingContribution => "decisionMakingContribution",
            MetricKey::QualityIndex => "qualityIndex",
            MetricKey::RemovalRate => "removalRate",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricKey::CreationRate => "Knowledge Asset Creation Rate",
            MetricKey::RetentionRate => "Critical Knowledge Retention Rate",
            MetricKey::ParticipationRate => "Employee Participation Rate in KM Activities",
            MetricKey::CollaborationIndex => "Collaboration Index (Cross-Functional Knowledge Sharing)",
            MetricKey::FactPackDownloadRate => "KM Fact Pack Download Rate",
            MetricKey::AssetDownloadRate => "Knowledge Asset Download Rate",
            MetricKey::ReuseRate => "Knowledge Reuse Rate",
            MetricKey::PlatformAdoptionRate => "KM Platform Adoption Rate",
            MetricKey::ResponseTime => "KM Response Time (Speed of Finding Knowledge)",
            MetricKey::ProcessImprovementRate => "KM-Driven Process Improvement Rate",
            MetricKey::DecisionMakingContribution => "Knowledge Contribution to Decision-Making",
            MetricKey::QualityIndex => "Knowledge Asset Quality Index",
            MetricKey::RemovalRate => "Outdated Knowledge Asset Removal Rate",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MetricKey::CreationRate => "(Total new knowledge assets created ÷ Total employees) × 100",
            MetricKey::RetentionRate => "(Knowledge assets from departing employees ÷ Departing employees with critical knowledge) × 100",
            MetricKey::ParticipationRate => "(Employees engaged in KM activities ÷ Total employees) × 100",
            MetricKey::CollaborationIndex => "(Total cross-BU KM initiatives ÷ Total KM initiatives) × 100",
            MetricKey::FactPackDownloadRate => "(Total Fact Pack downloads ÷ Total employees) × 100",
            MetricKey::AssetDownloadRate => "(Total downloads of knowledge assets ÷ Total available knowledge assets) × 100",
            MetricKey::ReuseRate => "(Times a knowledge asset is referenced or applied ÷ Total available knowledge assets) × 100",
            MetricKey::PlatformAdoptionRate => "(Active KM system users ÷ Total employees) × 100",
            MetricKey::ResponseTime => "Average time (in minutes) taken to find a relevant knowledge asset",
            MetricKey::ProcessImprovementRate => "(Business processes improved due to KM insights ÷ Total KM initiatives) × 100",
            MetricKey::DecisionMakingContribution => "(Strategic decisions influenced by KM insights ÷ Total strategic decisions made) × 100",
            MetricKey::QualityIndex => "Average employee rating of knowledge assets on a scale of 1–5",
            MetricKey::RemovalRate => "(Outdated assets removed ÷ Total knowledge assets) × 100",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MetricKey::ResponseTime => " min",
            MetricKey::QualityIndex => "/5",
            _ => "%",
        }
    }

    pub fn default_target(&self) -> f64 {
        match self {
            MetricKey::CreationRate => 15.0,
            MetricKey::RetentionRate => 90.0,
            MetricKey::ParticipationRate => 70.0,
            MetricKey::CollaborationIndex => 40.0,
            MetricKey::FactPackDownloadRate => 60.0,
            MetricKey::AssetDownloadRate => 20.0,
            MetricKey::ReuseRate => 25.0,
            MetricKey::PlatformAdoptionRate => 80.0,
            MetricKey::ResponseTime => 5.0,
            MetricKey::ProcessImprovementRate => 30.0,
            MetricKey::DecisionMakingContribution => 60.0,
            MetricKey::QualityIndex => 4.0,
            MetricKey::RemovalRate => 95.0,
        }
    }

    /// Lower readings are better.
    pub fn is_reverse(&self) -> bool {
        matches!(self, MetricKey::ResponseTime)
    }

    /// Whether the metric feeds the composite health score. Response time is
    /// in minutes and has no percentage form.
    pub fn in_health(&self) -> bool {
        !matches!(self, MetricKey::ResponseTime)
    }

    /// Percentage form of a reading.
    pub fn normalize(&self, value: f64) -> f64 {
        match self {
            MetricKey::QualityIndex => value * QUALITY_SCALE,
            _ => value,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            MetricKey::CreationRate | MetricKey::RetentionRate => Category::CreationRetention,
            MetricKey::ParticipationRate | MetricKey::CollaborationIndex => {
                Category::SharingParticipation
            }
            MetricKey::FactPackDownloadRate | MetricKey::AssetDownloadRate | MetricKey::ReuseRate => {
                Category::AccessUtilization
            }
            MetricKey::PlatformAdoptionRate | MetricKey::ResponseTime => Category::SystemAdoption,
            MetricKey::ProcessImprovementRate | MetricKey::DecisionMakingContribution => {
                Category::BusinessValue
            }
            MetricKey::QualityIndex | MetricKey::RemovalRate => Category::QualityRelevance,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        MetricKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| Error::UnknownMetric(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    CreationRetention,
    SharingParticipation,
    AccessUtilization,
    SystemAdoption,
    BusinessValue,
    QualityRelevance,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::CreationRetention,
        Category::SharingParticipation,
        Category::AccessUtilization,
        Category::SystemAdoption,
        Category::BusinessValue,
        Category::QualityRelevance,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::CreationRetention => "creation",
            Category::SharingParticipation => "sharing",
            Category::AccessUtilization => "access",
            Category::SystemAdoption => "adoption",
            Category::BusinessValue => "value",
            Category::QualityRelevance => "quality",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::CreationRetention => "Creation & Retention",
            Category::SharingParticipation => "Sharing & Participation",
            Category::AccessUtilization => "Access & Utilization",
            Category::SystemAdoption => "System Adoption",
            Category::BusinessValue => "Business Value",
            Category::QualityRelevance => "Quality & Relevance",
        }
    }

    pub fn metrics(&self) -> impl Iterator<Item = MetricKey> + '_ {
        MetricKey::ALL
            .into_iter()
            .filter(move |key| key.category() == *self)
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|category| {
                category.id().eq_ignore_ascii_case(value) || category.name().eq_ignore_ascii_case(value)
            })
            .ok_or_else(|| Error::UnknownCategory(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Status {
    /// No reading yet.
    Unset,
    OnTarget,
    Warning,
    Critical,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Status::Unset => "unset",
            Status::OnTarget => "on target",
            Status::Warning => "warning",
            Status::Critical => "critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroPolicy {
    /// A stored zero reads as "not yet entered".
    #[default]
    Sentinel,
    /// A stored zero is a genuine reading.
    Reported,
}

/// Drops non-finite and negative input.
pub fn sanitize(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

/// Text-field parsing; anything that is not a usable number becomes 0.
pub fn parse_reading(text: &str) -> f64 {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(sanitize)
        .unwrap_or(0.0)
}

/// Mean of the strictly positive entries, capped at 100; 0 when there are none.
pub fn avg_non_zero(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|value| **value > 0.0)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).min(SCORE_CEILING)
}

/// Status of a reading, where 0 means no reading.
pub fn classify(value: f64, target: f64, is_reverse: bool) -> Status {
    if value == 0.0 {
        return Status::Unset;
    }
    grade(value, target, is_reverse)
}

fn grade(value: f64, target: f64, is_reverse: bool) -> Status {
    if is_reverse {
        if value <= target {
            Status::OnTarget
        } else if value <= target * (1.0 + WARNING_BAND) {
            Status::Warning
        } else {
            Status::Critical
        }
    } else if value >= target {
        Status::OnTarget
    } else if value >= target * (1.0 - WARNING_BAND) {
        Status::Warning
    } else {
        Status::Critical
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KpiMetric {
    pub key: MetricKey,
    pub target: f64,
    months: [Option<f64>; MONTH_COUNT],
}

impl KpiMetric {
    fn new(key: MetricKey) -> Self {
        Self {
            key,
            target: key.default_target(),
            months: [None; MONTH_COUNT],
        }
    }

    pub fn unit(&self) -> &'static str {
        self.key.unit()
    }

    pub fn is_reverse(&self) -> bool {
        self.key.is_reverse()
    }

    /// Month slots with unset months as 0.
    pub fn monthly_values(&self) -> [f64; MONTH_COUNT] {
        self.months.map(|slot| slot.unwrap_or(0.0))
    }

    pub fn slot(&self, month: usize) -> Option<f64> {
        self.months.get(month).copied().flatten()
    }

    fn reading(&self, month: usize, policy: ZeroPolicy) -> Option<f64> {
        let value = self.slot(month)?;
        match policy {
            ZeroPolicy::Sentinel if value <= 0.0 => None,
            _ => Some(value),
        }
    }

    /// Most recent reported month's value.
    pub fn latest_reading(&self, policy: ZeroPolicy) -> Option<f64> {
        (0..MONTH_COUNT)
            .rev()
            .find_map(|month| self.reading(month, policy))
    }

    pub fn months_reported(&self, policy: ZeroPolicy) -> usize {
        (0..MONTH_COUNT)
            .filter(|month| self.reading(*month, policy).is_some())
            .count()
    }
}

/// The per-session set of tracked metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiBoard {
    metrics: Vec<KpiMetric>,
    policy: ZeroPolicy,
}

impl Default for KpiBoard {
    fn default() -> Self {
        Self::new(ZeroPolicy::default())
    }
}

impl KpiBoard {
    pub fn new(policy: ZeroPolicy) -> Self {
        Self {
            metrics: MetricKey::ALL.into_iter().map(KpiMetric::new).collect(),
            policy,
        }
    }

    pub fn policy(&self) -> ZeroPolicy {
        self.policy
    }

    pub fn metric(&self, key: MetricKey) -> &KpiMetric {
        &self.metrics[key.index()]
    }

    pub fn metrics(&self) -> &[KpiMetric] {
        &self.metrics
    }

    /// Invalid readings leave the month unset.
    pub fn set_monthly_value(&mut self, key: MetricKey, month: usize, value: f64) -> Result<()> {
        if month >= MONTH_COUNT {
            return Err(Error::MonthOutOfRange { month });
        }
        let slot = sanitize(value);
        debug!(metric = %key, month = MONTHS[month], value = ?slot, "monthly value set");
        self.metrics[key.index()].months[month] = slot;
        Ok(())
    }

    pub fn clear_monthly_value(&mut self, key: MetricKey, month: usize) -> Result<()> {
        if month >= MONTH_COUNT {
            return Err(Error::MonthOutOfRange { month });
        }
        self.metrics[key.index()].months[month] = None;
        Ok(())
    }

    /// Callers gate this behind custodian mode; invalid input becomes 0.
    pub fn set_target(&mut self, key: MetricKey, value: f64) {
        let target = sanitize(value).unwrap_or(0.0);
        debug!(metric = %key, target, "target set");
        self.metrics[key.index()].target = target;
    }

    pub fn current_value(&self, key: MetricKey) -> f64 {
        self.metric(key).latest_reading(self.policy).unwrap_or(0.0)
    }

    pub fn status(&self, key: MetricKey) -> Status {
        let metric = self.metric(key);
        match metric.latest_reading(self.policy) {
            Some(value) => grade(value, metric.target, key.is_reverse()),
            None => Status::Unset,
        }
    }

    pub fn months_reported(&self, key: MetricKey) -> usize {
        self.metric(key).months_reported(self.policy)
    }

    pub fn has_data(&self) -> bool {
        self.metrics
            .iter()
            .any(|metric| metric.latest_reading(self.policy).is_some())
    }

    /// Rounded mean of every health metric's normalised current value; `None`
    /// until any metric has a reading. Metrics without readings count as 0.
    pub fn overall_health(&self) -> Option<u32> {
        if !self.has_data() {
            return None;
        }
        let values: Vec<f64> = MetricKey::ALL
            .into_iter()
            .filter(MetricKey::in_health)
            .map(|key| key.normalize(self.current_value(key)))
            .collect();
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(mean.round() as u32)
    }

    /// Per-month [`avg_non_zero`] of the category's health metrics.
    pub fn category_trend(&self, category: Category) -> [f64; MONTH_COUNT] {
        let members: Vec<&KpiMetric> = category
            .metrics()
            .filter(MetricKey::in_health)
            .map(|key| self.metric(key))
            .collect();

        std::array::from_fn(|month| {
            let values: Vec<f64> = members
                .iter()
                .map(|metric| {
                    metric
                        .reading(month, self.policy)
                        .map(|value| metric.key.normalize(value))
                        .unwrap_or(0.0)
                })
                .collect();
            avg_non_zero(&values)
        })
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard {
            overall_health: self.overall_health(),
            participation_rate: self.current_value(MetricKey::ParticipationRate),
            response_time: self.current_value(MetricKey::ResponseTime),
            quality_index: self.current_value(MetricKey::QualityIndex),
        }
    }
}

/// Headline cards of the KPI dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub overall_health: Option<u32>,
    pub participation_rate: f64,
    pub response_time: f64,
    pub quality_index: f64,
}

/// Bulk KPI entries, e.g. read from a JSON file. A `null` month clears it.
/// Entries may be numbers or text; text goes through [`parse_reading`] and
/// anything else reads as 0.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KpiInput {
    #[serde(deserialize_with = "lenient_series")]
    pub values: HashMap<MetricKey, Vec<Option<f64>>>,
    #[serde(deserialize_with = "lenient_targets")]
    pub targets: HashMap<MetricKey, f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawReading {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl RawReading {
    fn value(self) -> f64 {
        match self {
            RawReading::Number(value) => value,
            RawReading::Text(text) => parse_reading(&text),
            RawReading::Other(_) => 0.0,
        }
    }
}

fn lenient_series<'de, D>(deserializer: D) -> std::result::Result<HashMap<MetricKey, Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<MetricKey, Vec<Option<RawReading>>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, months)| {
            let months = months
                .into_iter()
                .map(|month| month.map(RawReading::value))
                .collect();
            (key, months)
        })
        .collect())
}

fn lenient_targets<'de, D>(deserializer: D) -> std::result::Result<HashMap<MetricKey, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = HashMap::<MetricKey, RawReading>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(|(key, target)| (key, target.value())).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(key: MetricKey, values: &[(usize, f64)]) -> KpiBoard {
        let mut board = KpiBoard::default();
        for (month, value) in values {
            board.set_monthly_value(key, *month, *value).unwrap();
        }
        board
    }

    #[test]
    fn avg_non_zero_ignores_blanks_and_caps() {
        assert_eq!(avg_non_zero(&[]), 0.0);
        assert_eq!(avg_non_zero(&[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(avg_non_zero(&[50.0, 0.0, 100.0]), 75.0);
        assert_eq!(avg_non_zero(&[150.0, 150.0]), 100.0);
    }

    #[test]
    fn current_value_is_latest_reported_month() {
        let board = board_with(MetricKey::ReuseRate, &[(2, 5.0)]);
        assert_eq!(board.current_value(MetricKey::ReuseRate), 5.0);
        assert_eq!(board.current_value(MetricKey::RemovalRate), 0.0);

        let board = board_with(MetricKey::ReuseRate, &[(2, 5.0), (7, 9.0), (9, 0.0)]);
        assert_eq!(board.current_value(MetricKey::ReuseRate), 9.0);
    }

    #[test]
    fn status_boundaries_for_regular_metric() {
        assert_eq!(classify(56.0, 70.0, false), Status::Warning);
        assert_eq!(classify(55.9, 70.0, false), Status::Critical);
        assert_eq!(classify(70.0, 70.0, false), Status::OnTarget);
        assert_eq!(classify(0.0, 70.0, false), Status::Unset);
    }

    #[test]
    fn status_boundaries_for_reverse_metric() {
        assert_eq!(classify(5.0, 5.0, true), Status::OnTarget);
        assert_eq!(classify(6.0, 5.0, true), Status::Warning);
        assert_eq!(classify(6.1, 5.0, true), Status::Critical);
        assert_eq!(classify(2.0, 5.0, true), Status::OnTarget);
    }

    #[test]
    fn board_status_uses_metric_target() {
        let mut board = board_with(MetricKey::ParticipationRate, &[(0, 56.0)]);
        assert_eq!(board.status(MetricKey::ParticipationRate), Status::Warning);
        board.set_target(MetricKey::ParticipationRate, 50.0);
        assert_eq!(board.status(MetricKey::ParticipationRate), Status::OnTarget);

        let board = board_with(MetricKey::ResponseTime, &[(4, 7.0)]);
        assert_eq!(board.status(MetricKey::ResponseTime), Status::Critical);
        assert_eq!(board.status(MetricKey::CreationRate), Status::Unset);
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let mut board = KpiBoard::default();
        let err = board.set_monthly_value(MetricKey::ReuseRate, 12, 4.0).unwrap_err();
        assert!(matches!(err, Error::MonthOutOfRange { month: 12 }));
        assert!(board.clear_monthly_value(MetricKey::ReuseRate, 99).is_err());
    }

    #[test]
    fn invalid_readings_are_coerced_to_unset() {
        let board = board_with(
            MetricKey::ReuseRate,
            &[(0, -3.0), (1, f64::NAN), (2, f64::INFINITY)],
        );
        assert_eq!(board.metric(MetricKey::ReuseRate).monthly_values(), [0.0; MONTH_COUNT]);

        let mut board = KpiBoard::default();
        board.set_target(MetricKey::ReuseRate, f64::NEG_INFINITY);
        assert_eq!(board.metric(MetricKey::ReuseRate).target, 0.0);

        assert_eq!(parse_reading(" 42.5 "), 42.5);
        assert_eq!(parse_reading("abc"), 0.0);
        assert_eq!(parse_reading("-1"), 0.0);
    }

    #[test]
    fn overall_health_is_unset_until_first_reading() {
        let mut board = KpiBoard::default();
        assert_eq!(board.overall_health(), None);

        board.set_monthly_value(MetricKey::RetentionRate, 3, 60.0).unwrap();
        assert_eq!(board.overall_health(), Some(5));
    }

    #[test]
    fn overall_health_rescales_quality_index() {
        let mut board = KpiBoard::default();
        for key in MetricKey::ALL.into_iter().filter(MetricKey::in_health) {
            board.set_monthly_value(key, 0, 80.0).unwrap();
        }
        board.set_monthly_value(MetricKey::QualityIndex, 0, 4.0).unwrap();
        assert_eq!(board.overall_health(), Some(80));
    }

    #[test]
    fn reported_policy_keeps_zero_readings() {
        let mut board = KpiBoard::new(ZeroPolicy::Reported);
        board.set_monthly_value(MetricKey::ReuseRate, 0, 20.0).unwrap();
        board.set_monthly_value(MetricKey::ReuseRate, 1, 0.0).unwrap();
        assert_eq!(board.current_value(MetricKey::ReuseRate), 0.0);
        assert_eq!(board.status(MetricKey::ReuseRate), Status::Critical);
        assert_eq!(board.months_reported(MetricKey::ReuseRate), 2);

        let mut legacy = KpiBoard::default();
        legacy.set_monthly_value(MetricKey::ReuseRate, 0, 20.0).unwrap();
        legacy.set_monthly_value(MetricKey::ReuseRate, 1, 0.0).unwrap();
        assert_eq!(legacy.current_value(MetricKey::ReuseRate), 20.0);
        assert_eq!(legacy.months_reported(MetricKey::ReuseRate), 1);
    }

    #[test]
    fn category_trend_averages_reported_members() {
        let mut board = KpiBoard::default();
        board.set_monthly_value(MetricKey::CreationRate, 0, 50.0).unwrap();
        board.set_monthly_value(MetricKey::RetentionRate, 0, 100.0).unwrap();
        board.set_monthly_value(MetricKey::RetentionRate, 1, 90.0).unwrap();

        let trend = board.category_trend(Category::CreationRetention);
        assert_eq!(trend[0], 75.0);
        assert_eq!(trend[1], 90.0);
        assert_eq!(trend[2], 0.0);
    }

    #[test]
    fn quality_trend_uses_percentage_scale() {
        let board = board_with(MetricKey::QualityIndex, &[(5, 4.5)]);
        let trend = board.category_trend(Category::QualityRelevance);
        assert_eq!(trend[5], 90.0);
    }

    #[test]
    fn catalogue_has_twelve_health_metrics() {
        assert_eq!(MetricKey::ALL.iter().filter(|k| k.in_health()).count(), 12);
        assert_eq!(Category::AccessUtilization.metrics().count(), 3);
        assert_eq!("RESPONSETIME".parse::<MetricKey>().unwrap(), MetricKey::ResponseTime);
        assert_eq!("quality".parse::<Category>().unwrap(), Category::QualityRelevance);
        assert!("bogus".parse::<MetricKey>().is_err());
    }

    #[test]
    fn kpi_input_deserializes_camel_case_keys() {
        let input: KpiInput = serde_json::from_str(
            r#"{ "values": { "reuseRate": [10, null, 12] }, "targets": { "responseTime": 4 } }"#,
        )
        .unwrap();
        assert_eq!(input.values[&MetricKey::ReuseRate], vec![Some(10.0), None, Some(12.0)]);
        assert_eq!(input.targets[&MetricKey::ResponseTime], 4.0);
    }

    #[test]
    fn kpi_input_coerces_unparsable_entries_to_zero() {
        let input: KpiInput = serde_json::from_str(
            r#"{ "values": { "reuseRate": ["abc", " 12 ", 10, null, true] },
                 "targets": { "reuseRate": "n/a", "removalRate": "90" } }"#,
        )
        .unwrap();
        assert_eq!(
            input.values[&MetricKey::ReuseRate],
            vec![Some(0.0), Some(12.0), Some(10.0), None, Some(0.0)]
        );
        assert_eq!(input.targets[&MetricKey::ReuseRate], 0.0);
        assert_eq!(input.targets[&MetricKey::RemovalRate], 90.0);
    }
}
