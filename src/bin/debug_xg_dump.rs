use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use understat_xg::combine::columns;
use understat_xg::{
    GameweekRange, HttpFetcher, LeagueRoster, LeagueTeams, PlayerScraper, ScrapeConfig,
    TeamXgScraper,
};

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = ScrapeConfig::from_env();
    let range = GameweekRange::new(
        env_usize("DEBUG_GW_START").unwrap_or(1),
        env_usize("DEBUG_GW_END").unwrap_or(4),
    )
    .context("invalid DEBUG_GW_START/DEBUG_GW_END")?;
    let as_columns = env_flag("DEBUG_COLUMNS");
    let fetcher = HttpFetcher::new()?;

    let team = opt_env("DEBUG_TEAM").unwrap_or_else(|| "Arsenal".to_string());
    let records = TeamXgScraper::new(fetcher, config.clone(), &team)
        .scrape(range)
        .with_context(|| format!("scrape team {team}"))?;
    if as_columns {
        println!("{}", serde_json::to_string(&columns(&records)?)?);
    } else {
        for rec in &records {
            println!("{}", serde_json::to_string(rec)?);
        }
    }

    if let Some(player_id) = opt_env("DEBUG_PLAYER_ID") {
        let roster = LeagueRoster::fetch(&fetcher, &config).context("fetch league roster")?;
        let player = PlayerScraper::new(&fetcher, &config, &roster, &player_id)
            .with_context(|| format!("scrape player {player_id}"))?;
        eprintln!(
            "{} ({}) {}: {} matches in {}",
            player.name(),
            player.last_name(),
            player.team(),
            player.season_matches().len(),
            player.season()
        );
        for row in player.scrape(range) {
            println!("{}", serde_json::to_string(&row)?);
        }
    }

    if env_flag("DEBUG_LEAGUE_TEAMS") {
        let teams = LeagueTeams::fetch(&fetcher, &config).context("fetch league teams")?;
        for team in teams.scrape() {
            println!("{} {}: {} fixtures", team.id, team.team_name, team.fixtures.len());
        }
    }

    Ok(())
}

fn opt_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}

fn env_usize(key: &str) -> Option<usize> {
    opt_env(key).and_then(|v| v.trim().parse::<usize>().ok())
}

fn env_flag(key: &str) -> bool {
    opt_env(key)
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}
