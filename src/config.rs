use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://understat.com";
const DEFAULT_LEAGUE: &str = "EPL";
const DEFAULT_SEASON: &str = "2018";
const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub league: String,
    /// Understat season key, the year the season starts in.
    pub season: String,
    pub timeout: Duration,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            league: DEFAULT_LEAGUE.to_string(),
            season: DEFAULT_SEASON.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ScrapeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let opt = |key: &str| {
            lookup(key)
                .map(|val| val.trim().to_string())
                .filter(|val| !val.is_empty())
        };
        let defaults = Self::default();
        let timeout_secs = opt("UNDERSTAT_TIMEOUT_SECS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS)
            .clamp(1, 120);

        Self {
            base_url: opt("UNDERSTAT_BASE_URL")
                .map(|val| val.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            league: opt("UNDERSTAT_LEAGUE").unwrap_or(defaults.league),
            season: opt("UNDERSTAT_SEASON").unwrap_or(defaults.season),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn with_season(mut self, season: impl Into<String>) -> Self {
        self.season = season.into();
        self
    }

    pub fn team_url(&self, slug: &str) -> String {
        format!("{}/team/{slug}/{}", self.base_url, self.season)
    }

    pub fn player_url(&self, player_id: &str) -> String {
        format!("{}/player/{player_id}", self.base_url)
    }

    pub fn league_url(&self) -> String {
        format!("{}/league/{}/{}", self.base_url, self.league, self.season)
    }
}
