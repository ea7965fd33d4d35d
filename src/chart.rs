use serde::Serialize;

use crate::kpi::{Category, KpiBoard, MetricKey, MONTHS, MONTH_COUNT};

/// One named line of twelve monthly points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: [f64; MONTH_COUNT],
}

/// What a chart renderer consumes: month labels plus series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub labels: [&'static str; MONTH_COUNT],
    pub series: Vec<Series>,
}

impl ChartData {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            labels: MONTHS,
            series: Vec::new(),
        }
    }

    fn push(&mut self, name: impl Into<String>, values: [f64; MONTH_COUNT]) {
        self.series.push(Series {
            name: name.into(),
            values,
        });
    }
}

/// Monthly readings against a flat target line.
pub fn metric_chart(board: &KpiBoard, key: MetricKey) -> ChartData {
    let metric = board.metric(key);
    let mut chart = ChartData::new(key.title());
    chart.push(key.as_str(), metric.monthly_values());
    chart.push("target", [metric.target; MONTH_COUNT]);
    chart
}

/// Each member metric plus the category trend.
pub fn category_chart(board: &KpiBoard, category: Category) -> ChartData {
    let mut chart = ChartData::new(category.name());
    for key in category.metrics() {
        chart.push(key.as_str(), board.metric(key).monthly_values());
    }
    chart.push("trend", board.category_trend(category));
    chart
}

/// One trend line per category.
pub fn dashboard_chart(board: &KpiBoard) -> ChartData {
    let mut chart = ChartData::new("KM Performance Trends");
    for category in Category::ALL {
        chart.push(category.name(), board.category_trend(category));
    }
    chart
}
