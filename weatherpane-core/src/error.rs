use std::fmt;

/// Reasons a weather payload cannot become a [`WeatherRecord`](crate::WeatherRecord).
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("Weather response is missing required field `{0}`")]
    MissingField(String),

    #[error("Weather response contains no weather conditions")]
    EmptyConditions,

    #[error("Weather response field `{field}` is invalid: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Weather response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which external call a pipeline error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Location,
    Weather,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Location => f.write_str("location"),
            Stage::Weather => f.write_str("weather"),
        }
    }
}

/// Errors that halt the pipeline. Each one ends up as the single error shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Network error while fetching {stage}: {source}")]
    Network {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("{stage} request failed with status {status}: {body}")]
    HttpStatus {
        stage: Stage,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Malformed {stage} response: {reason}")]
    MalformedResponse { stage: Stage, reason: String },

    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl PipelineError {
    /// True for transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, PipelineError::Network { .. } | PipelineError::HttpStatus { .. })
    }
}
