use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("http {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("page has {found} script elements, wanted index {index}")]
    MissingScript { index: usize, found: usize },

    #[error("no quoted payload in script element {index}")]
    MissingDelimiter { index: usize },

    #[error("bad escape sequence at byte {position}: {reason}")]
    Escape { position: usize, reason: String },

    #[error("invalid {what} json")]
    Json {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("field {field} has unusable value {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("player {id} is not in the league roster")]
    UnknownPlayer { id: String },

    #[error("record {index} has no key {key:?}")]
    MissingKey { index: usize, key: String },

    #[error("invalid gameweek range {start}..={end}")]
    InvalidRange { start: usize, end: usize },
}

impl ScrapeError {
    pub(crate) fn escape(position: usize, reason: impl Into<String>) -> Self {
        ScrapeError::Escape {
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn json(what: &'static str, source: serde_json::Error) -> Self {
        ScrapeError::Json { what, source }
    }

    /// Page markup no longer matches what the scrapers expect.
    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            ScrapeError::MissingScript { .. } | ScrapeError::MissingDelimiter { .. }
        )
    }

    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            ScrapeError::Escape { .. } | ScrapeError::Json { .. } | ScrapeError::InvalidField { .. }
        )
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ScrapeError::Client(_) | ScrapeError::Network { .. } | ScrapeError::Status { .. }
        )
    }
}
