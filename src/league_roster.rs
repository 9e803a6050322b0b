use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ScrapeConfig;
use crate::embedded_json::{PageScript, extract_payload};
use crate::error::{Result, ScrapeError};
use crate::fields::flex_string;
use crate::http_client::PageFetcher;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(rename = "id", deserialize_with = "flex_string")]
    pub player_id: String,
    pub player_name: String,
    #[serde(rename = "team_title")]
    pub team_name: String,
}

impl RosterEntry {
    /// Players who moved mid-season are listed as `"Fulham,Chelsea"`.
    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.team_name
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }

    pub fn plays_for(&self, team: &str) -> bool {
        self.teams().any(|t| t == team)
    }
}

/// Snapshot of every player on a league page, with lookups built once.
#[derive(Debug, Clone, Default)]
pub struct LeagueRoster {
    players: Vec<RosterEntry>,
    name_to_id: HashMap<String, String>,
    id_to_name: HashMap<String, String>,
    id_to_team: HashMap<String, String>,
}

impl LeagueRoster {
    pub fn fetch<F: PageFetcher + ?Sized>(fetcher: &F, config: &ScrapeConfig) -> Result<Self> {
        let html = fetcher.fetch(&config.league_url(), config.timeout)?;
        let roster = Self::parse(&html)?;
        info!(
            league = %config.league,
            season = %config.season,
            players = roster.len(),
            "league roster loaded"
        );
        Ok(roster)
    }

    pub fn parse(html: &str) -> Result<Self> {
        let players: Vec<RosterEntry> = extract_payload(html, PageScript::LeaguePlayers)?;
        Ok(Self::from_players(players))
    }

    /// Duplicate names keep the id seen last.
    pub fn from_players(players: Vec<RosterEntry>) -> Self {
        let mut name_to_id = HashMap::with_capacity(players.len());
        let mut id_to_name = HashMap::with_capacity(players.len());
        let mut id_to_team = HashMap::with_capacity(players.len());
        for p in &players {
            name_to_id.insert(p.player_name.clone(), p.player_id.clone());
            id_to_name.insert(p.player_id.clone(), p.player_name.clone());
            id_to_team.insert(p.player_id.clone(), p.team_name.clone());
        }
        Self {
            players,
            name_to_id,
            id_to_name,
            id_to_team,
        }
    }

    pub fn players(&self) -> &[RosterEntry] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player(&self, player_id: &str) -> Option<&RosterEntry> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn require_player(&self, player_id: &str) -> Result<&RosterEntry> {
        self.player(player_id).ok_or_else(|| ScrapeError::UnknownPlayer {
            id: player_id.to_string(),
        })
    }

    pub fn name_id_map(&self) -> &HashMap<String, String> {
        &self.name_to_id
    }

    pub fn id_name_map(&self) -> &HashMap<String, String> {
        &self.id_to_name
    }

    pub fn id_team_map(&self) -> &HashMap<String, String> {
        &self.id_to_team
    }
}
