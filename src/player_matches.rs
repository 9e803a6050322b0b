use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::embedded_json::{PageScript, extract_payload};
use crate::error::{Result, ScrapeError};
use crate::fields::{flex_f64, flex_string, flex_u32};
use crate::gameweek::GameweekRange;
use crate::http_client::PageFetcher;
use crate::league_roster::{LeagueRoster, RosterEntry};

const MATCH_DATE_FORMAT: &str = "%Y-%m-%d";

/// One row of a player page's `matchesData`, every league and season mixed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayerMatch {
    #[serde(default, deserialize_with = "flex_string")]
    pub id: String,
    #[serde(deserialize_with = "flex_string")]
    pub season: String,
    pub date: String,
    pub h_team: String,
    pub a_team: String,
    #[serde(deserialize_with = "flex_u32")]
    pub h_goals: u32,
    #[serde(deserialize_with = "flex_u32")]
    pub a_goals: u32,
    #[serde(deserialize_with = "flex_u32")]
    pub goals: u32,
    #[serde(default, deserialize_with = "flex_u32")]
    pub assists: u32,
    #[serde(deserialize_with = "flex_u32")]
    pub key_passes: u32,
    pub position: String,
    #[serde(deserialize_with = "flex_u32")]
    pub npg: u32,
    #[serde(rename = "npxG", deserialize_with = "flex_f64")]
    pub npxg: f64,
    #[serde(deserialize_with = "flex_u32")]
    pub shots: u32,
    #[serde(deserialize_with = "flex_u32")]
    pub time: u32,
    #[serde(rename = "xA", deserialize_with = "flex_f64")]
    pub xa: f64,
    #[serde(rename = "xG", deserialize_with = "flex_f64")]
    pub xg: f64,
    #[serde(rename = "xGBuildup", deserialize_with = "flex_f64")]
    pub xg_buildup: f64,
    #[serde(rename = "xGChain", deserialize_with = "flex_f64")]
    pub xg_chain: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMatchRecord {
    pub match_id: String,
    pub date: NaiveDate,
    /// The single club the player turned out for. This and the fields up to
    /// `opponent_goals` are `None` when the roster club played neither side,
    /// or both sides (a transferred player facing a former club).
    pub team: Option<String>,
    pub was_home: Option<bool>,
    pub opponent: Option<String>,
    pub team_goals: Option<u32>,
    pub opponent_goals: Option<u32>,
    pub goals: u32,
    pub assists: u32,
    pub key_passes: u32,
    pub position: String,
    pub non_penalty_goals: u32,
    #[serde(rename = "non_penalty_xG")]
    pub non_penalty_xg: f64,
    pub shots: u32,
    pub minutes_played: u32,
    #[serde(rename = "xA")]
    pub xa: f64,
    #[serde(rename = "xG")]
    pub xg: f64,
    #[serde(rename = "xG_buildup")]
    pub xg_buildup: f64,
    #[serde(rename = "xG_chain")]
    pub xg_chain: f64,
}

/// A season record labelled with the player it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerGameweek {
    pub name: String,
    #[serde(flatten)]
    pub record: PlayerMatchRecord,
}

/// Family name for display and file naming: everything after the first
/// space, transliterated to ASCII.
pub fn surname(full_name: &str) -> String {
    let part = full_name
        .trim()
        .split_once(' ')
        .map(|(_, rest)| rest.trim())
        .filter(|rest| !rest.is_empty())
        .unwrap_or(full_name.trim());
    deunicode::deunicode(part)
}

/// Keep `season` rows and resolve home/away against the player's club.
///
/// Only the `season` key of other seasons' rows is read, so their shape may
/// drift without breaking the scrape.
pub fn normalize_matches(
    raw: Vec<Value>,
    season: &str,
    player: &RosterEntry,
) -> Result<Vec<PlayerMatchRecord>> {
    raw.into_iter()
        .filter(|row| row_season(row).as_deref() == Some(season))
        .map(|row| {
            let m: RawPlayerMatch = serde_json::from_value(row)
                .map_err(|err| ScrapeError::json(PageScript::PlayerMatches.label(), err))?;
            normalize_match(m, player)
        })
        .collect()
}

fn row_season(row: &Value) -> Option<String> {
    match row.get("season")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn normalize_match(m: RawPlayerMatch, player: &RosterEntry) -> Result<PlayerMatchRecord> {
    let date = NaiveDate::parse_from_str(m.date.trim(), MATCH_DATE_FORMAT).map_err(|_| {
        ScrapeError::InvalidField {
            field: "date",
            value: m.date.clone(),
        }
    })?;

    let home = player.plays_for(&m.h_team);
    let away = player.plays_for(&m.a_team);
    let (team, was_home, opponent, team_goals, opponent_goals) = match (home, away) {
        (true, false) => (
            Some(m.h_team),
            Some(true),
            Some(m.a_team),
            Some(m.h_goals),
            Some(m.a_goals),
        ),
        (false, true) => (
            Some(m.a_team),
            Some(false),
            Some(m.h_team),
            Some(m.a_goals),
            Some(m.h_goals),
        ),
        (true, true) => {
            warn!(
                player = %player.player_name,
                team = %player.team_name,
                home = %m.h_team,
                away = %m.a_team,
                %date,
                "player's clubs played each other, side unknown"
            );
            (None, None, None, None, None)
        }
        (false, false) => {
            warn!(
                player = %player.player_name,
                team = %player.team_name,
                home = %m.h_team,
                away = %m.a_team,
                %date,
                "player's club played neither side"
            );
            (None, None, None, None, None)
        }
    };

    Ok(PlayerMatchRecord {
        match_id: m.id,
        date,
        team,
        was_home,
        opponent,
        team_goals,
        opponent_goals,
        goals: m.goals,
        assists: m.assists,
        key_passes: m.key_passes,
        position: m.position,
        non_penalty_goals: m.npg,
        non_penalty_xg: m.npxg,
        shots: m.shots,
        minutes_played: m.time,
        xa: m.xa,
        xg: m.xg,
        xg_buildup: m.xg_buildup,
        xg_chain: m.xg_chain,
    })
}

/// One player's matches for the configured season, loaded on construction.
#[derive(Debug, Clone)]
pub struct PlayerScraper {
    player: RosterEntry,
    last_name: String,
    season: String,
    matches: Vec<PlayerMatchRecord>,
}

impl PlayerScraper {
    /// Resolve `player_id` in `roster`, then fetch and normalize the player page.
    pub fn new<F: PageFetcher + ?Sized>(
        fetcher: &F,
        config: &ScrapeConfig,
        roster: &LeagueRoster,
        player_id: &str,
    ) -> Result<Self> {
        let player = roster.require_player(player_id)?.clone();
        let html = fetcher.fetch(&config.player_url(player_id), config.timeout)?;
        let scraper = Self::from_page(&html, &config.season, player)?;
        info!(
            player = %scraper.name(),
            season = %scraper.season,
            matches = scraper.matches.len(),
            "player matches loaded"
        );
        Ok(scraper)
    }

    pub fn from_page(html: &str, season: &str, player: RosterEntry) -> Result<Self> {
        let raw: Vec<Value> = extract_payload(html, PageScript::PlayerMatches)?;
        let matches = normalize_matches(raw, season, &player)?;
        Ok(Self {
            last_name: surname(&player.player_name),
            season: season.to_string(),
            player,
            matches,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player.player_id
    }

    pub fn name(&self) -> &str {
        &self.player.player_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn team(&self) -> &str {
        &self.player.team_name
    }

    pub fn season(&self) -> &str {
        &self.season
    }

    pub fn season_matches(&self) -> &[PlayerMatchRecord] {
        &self.matches
    }

    /// Records in page order; understat lists a player's latest match first.
    pub fn scrape(&self, range: GameweekRange) -> Vec<PlayerGameweek> {
        range
            .slice(&self.matches)
            .iter()
            .map(|record| PlayerGameweek {
                name: self.player.player_name.clone(),
                record: record.clone(),
            })
            .collect()
    }
}
