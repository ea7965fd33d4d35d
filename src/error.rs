use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Month index outside Jan..Dec.
    #[error("month index {month} is out of range (expected 0..=11)")]
    MonthOutOfRange { month: usize },

    #[error("target changes require custodian mode")]
    CustodianRequired,

    #[error("unknown KPI metric: {0}")]
    UnknownMetric(String),

    #[error("unknown KPI category: {0}")]
    UnknownCategory(String),

    #[error("duplicate personnel id {0} in dataset")]
    DuplicateId(u32),

    #[error("invalid value {value:?} for field {field}")]
    InvalidField { field: &'static str, value: String },

    #[error("unknown workshop task id {0}")]
    UnknownTask(u32),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn invalid_field(field: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidField {
            field,
            value: value.into(),
        }
    }
}
