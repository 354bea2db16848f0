use thiserror::Error;

use crate::datagov::Resource;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to fetch {resource}: {source}")]
    Network {
        resource: Resource,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {resource}: HTTP {status}")]
    Status { resource: Resource, status: u16 },

    #[error("invalid {resource} format: {reason}")]
    MalformedResponse { resource: Resource, reason: String },

    #[error("four-day outlook has no forecast days")]
    NoForecastData,

    #[error("\"{0}\" is not a known area")]
    RegionNotFound(String),

    #[error("no location entered")]
    EmptyLocation,

    #[error("forecast day {index} is out of range for {len} days")]
    DayOutOfRange { index: usize, len: usize },

    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed<S: Into<String>>(resource: Resource, reason: S) -> Self {
        Self::MalformedResponse {
            resource,
            reason: reason.into(),
        }
    }

    /// Transport failures and non-success statuses both count as network errors.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Status { .. })
    }

    /// Message shown inline in the UI.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network {
                resource: Resource::AreaForecast,
                ..
            }
            | Self::Status {
                resource: Resource::AreaForecast,
                ..
            }
            | Self::MalformedResponse {
                resource: Resource::AreaForecast,
                ..
            } => "Failed to fetch area weather data. Please try again.".to_string(),
            Self::Network { .. } => {
                "Failed to fetch weather data. Please try again.".to_string()
            }
            Self::Status { status, .. } => format!("Failed to fetch weather data: {status}"),
            Self::MalformedResponse { .. } => "Invalid weather data format".to_string(),
            Self::NoForecastData => "No forecast data available".to_string(),
            Self::RegionNotFound(name) => format!(
                "\"{name}\" is not found in Singapore areas. Would you like to select from available areas?"
            ),
            Self::EmptyLocation => "Please enter a location".to_string(),
            Self::DayOutOfRange { .. } => "That forecast day is not available.".to_string(),
            Self::Terminal(_) => "The terminal could not be updated.".to_string(),
        }
    }
}
