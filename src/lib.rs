pub mod combine;
pub mod config;
pub mod embedded_json;
pub mod error;
pub mod fields;
pub mod gameweek;
pub mod http_client;
pub mod league_roster;
pub mod league_teams;
pub mod player_matches;
pub mod team_xg;

pub use config::ScrapeConfig;
pub use error::{Result, ScrapeError};
pub use gameweek::GameweekRange;
pub use http_client::{HttpFetcher, PageFetcher};
pub use league_roster::LeagueRoster;
pub use league_teams::LeagueTeams;
pub use player_matches::PlayerScraper;
pub use team_xg::TeamXgScraper;
