use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::ScrapeConfig;
use crate::embedded_json::{PageScript, extract_payload};
use crate::error::Result;
use crate::fields::{flex_opt_f64, flex_string};
use crate::gameweek::GameweekRange;
use crate::http_client::PageFetcher;

#[derive(Debug, Clone, Deserialize)]
pub struct RawFixture {
    pub h: RawSide,
    pub a: RawSide,
    #[serde(rename = "xG")]
    pub xg: RawSideXg,
    #[serde(default)]
    pub datetime: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSide {
    #[serde(deserialize_with = "flex_string")]
    pub id: String,
    pub title: String,
}

// Unplayed fixtures carry null xG.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSideXg {
    #[serde(default, deserialize_with = "flex_opt_f64")]
    pub h: Option<f64>,
    #[serde(default, deserialize_with = "flex_opt_f64")]
    pub a: Option<f64>,
}

/// One season fixture, numbered by its position on the team page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamFixture {
    #[serde(rename = "gw")]
    pub gameweek: usize,
    pub home_team: String,
    pub home_id: String,
    pub away_team: String,
    pub away_id: String,
    #[serde(rename = "home_xG")]
    pub home_xg: Option<f64>,
    #[serde(rename = "away_xG")]
    pub away_xg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kickoff: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl TeamFixture {
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home_team == team {
            Some(Side::Home)
        } else if self.away_team == team {
            Some(Side::Away)
        } else {
            None
        }
    }
}

/// A fixture seen from one team. A team that played neither side leaves
/// everything but the gameweek empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamXgRecord {
    #[serde(rename = "gw")]
    pub gameweek: usize,
    #[serde(rename = "xG")]
    pub xg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub was_home: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,
}

impl TeamXgRecord {
    pub fn is_mismatch(&self) -> bool {
        self.was_home.is_none()
    }
}

/// Gameweeks are positions in the payload. Understat lists a team's fixtures
/// in date order and nothing here checks that.
pub fn normalize_fixtures(raw: Vec<RawFixture>) -> Vec<TeamFixture> {
    raw.into_iter()
        .enumerate()
        .map(|(i, f)| TeamFixture {
            gameweek: i + 1,
            home_team: f.h.title,
            home_id: f.h.id,
            away_team: f.a.title,
            away_id: f.a.id,
            home_xg: f.xg.h,
            away_xg: f.xg.a,
            kickoff: f.datetime,
        })
        .collect()
}

pub fn parse_team_page(html: &str) -> Result<Vec<TeamFixture>> {
    let raw: Vec<RawFixture> = extract_payload(html, PageScript::TeamDates)?;
    Ok(normalize_fixtures(raw))
}

pub fn team_perspective(fixtures: &[TeamFixture], team: &str) -> Vec<TeamXgRecord> {
    fixtures
        .iter()
        .map(|f| match f.side_of(team) {
            Some(Side::Home) => TeamXgRecord {
                gameweek: f.gameweek,
                xg: f.home_xg,
                was_home: Some(true),
                opponent: Some(f.away_team.clone()),
            },
            Some(Side::Away) => TeamXgRecord {
                gameweek: f.gameweek,
                xg: f.away_xg,
                was_home: Some(false),
                opponent: Some(f.home_team.clone()),
            },
            None => {
                warn!(
                    team,
                    gameweek = f.gameweek,
                    home = %f.home_team,
                    away = %f.away_team,
                    "team played neither side of fixture"
                );
                TeamXgRecord {
                    gameweek: f.gameweek,
                    xg: None,
                    was_home: None,
                    opponent: None,
                }
            }
        })
        .collect()
}

/// understat URL slugs are team titles with `_` for spaces.
pub fn team_name_from_slug(slug: &str) -> String {
    slug.replace('_', " ")
}

pub struct TeamXgScraper<F> {
    fetcher: F,
    config: ScrapeConfig,
    slug: String,
    team_name: String,
}

impl<F: PageFetcher> TeamXgScraper<F> {
    pub fn new(fetcher: F, config: ScrapeConfig, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        let team_name = team_name_from_slug(&slug);
        Self {
            fetcher,
            config,
            slug,
            team_name,
        }
    }

    /// Override the title matched against fixtures when it differs from the slug.
    pub fn with_team_name(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = team_name.into();
        self
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn url(&self) -> String {
        self.config.team_url(&self.slug)
    }

    /// Fetch the team page and return every season fixture.
    pub fn fixtures(&self) -> Result<Vec<TeamFixture>> {
        let html = self.fetcher.fetch(&self.url(), self.config.timeout)?;
        let fixtures = parse_team_page(&html)?;
        info!(team = %self.team_name, count = fixtures.len(), "team fixtures parsed");
        Ok(fixtures)
    }

    pub fn scrape(&self, range: GameweekRange) -> Result<Vec<TeamXgRecord>> {
        let fixtures = self.fixtures()?;
        Ok(team_perspective(range.slice(&fixtures), &self.team_name))
    }
}
