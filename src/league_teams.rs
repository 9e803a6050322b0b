use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::ScrapeConfig;
use crate::embedded_json::{PageScript, extract_payload};
use crate::error::{Result, ScrapeError};
use crate::fields::flex_string;
use crate::http_client::PageFetcher;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawTeam {
    #[serde(deserialize_with = "flex_string")]
    pub id: String,
    pub title: String,
    /// Per-match rows as understat sends them.
    #[serde(default)]
    pub history: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueTeam {
    pub id: String,
    pub team_name: String,
    pub fixtures: Vec<Value>,
}

/// Every team on a league page as `(key, team)` pairs, in payload order.
#[derive(Debug, Clone, Default)]
pub struct LeagueTeams {
    teams: Vec<(String, RawTeam)>,
}

impl LeagueTeams {
    pub fn fetch<F: PageFetcher + ?Sized>(fetcher: &F, config: &ScrapeConfig) -> Result<Self> {
        let html = fetcher.fetch(&config.league_url(), config.timeout)?;
        let teams = Self::parse(&html)?;
        info!(league = %config.league, teams = teams.len(), "league teams loaded");
        Ok(teams)
    }

    pub fn parse(html: &str) -> Result<Self> {
        let raw: Map<String, Value> = extract_payload(html, PageScript::LeagueTeams)?;
        Self::from_payload(raw)
    }

    /// `payload` keeps its key order (serde_json `preserve_order`).
    pub fn from_payload(payload: Map<String, Value>) -> Result<Self> {
        let teams = payload
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value::<RawTeam>(value)
                    .map(|team| (key, team))
                    .map_err(|err| ScrapeError::json(PageScript::LeagueTeams.label(), err))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { teams })
    }

    pub fn from_teams(teams: Vec<(String, RawTeam)>) -> Self {
        Self { teams }
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams_data(&self) -> &[(String, RawTeam)] {
        &self.teams
    }

    /// Matches on the team's own `id` field, not the map key.
    pub fn get_team_data(&self, id: &str) -> Option<&RawTeam> {
        self.teams.iter().map(|(_, t)| t).find(|t| t.id == id)
    }

    pub fn team_by_title(&self, title: &str) -> Option<&RawTeam> {
        self.teams.iter().map(|(_, t)| t).find(|t| t.title == title)
    }

    pub fn scrape(&self) -> Vec<LeagueTeam> {
        self.teams
            .iter()
            .map(|(_, t)| LeagueTeam {
                id: t.id.clone(),
                team_name: t.title.clone(),
                fixtures: t.history.clone(),
            })
            .collect()
    }
}
