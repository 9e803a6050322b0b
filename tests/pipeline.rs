mod common;

use serde_json::json;
use understat_xg::embedded_json::extract_and_decode;
use understat_xg::{
    GameweekRange, LeagueRoster, LeagueTeams, PlayerScraper, ScrapeConfig, TeamXgScraper,
};

use common::{
    FakeFetcher, arsenal_season, fixture, league_page, player_match, player_page, team_page,
    understat_page,
};

const TEAM_URL: &str = "https://understat.com/team/Arsenal/2018";
const LEAGUE_URL: &str = "https://understat.com/league/EPL/2018";
const PLAYER_URL: &str = "https://understat.com/player/8260";

fn arsenal_fetcher() -> FakeFetcher {
    FakeFetcher::default().with_page(TEAM_URL, team_page(arsenal_season()))
}

#[test]
fn team_scrape_default_range_returns_four_gameweeks() {
    let fetcher = arsenal_fetcher();
    let scraper = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal");
    let recs = scraper.scrape(GameweekRange::default()).expect("scrape");

    let gws: Vec<usize> = recs.iter().map(|r| r.gameweek).collect();
    assert_eq!(gws, vec![1, 2, 3, 4]);
    assert_eq!(recs[1].xg, Some(1.16));
    assert_eq!(recs[1].was_home, Some(false));
    assert_eq!(recs[3].opponent.as_deref(), Some("Cardiff"));
}

#[test]
fn team_scrape_sub_range_returns_second_and_third_fixture() {
    let fetcher = arsenal_fetcher();
    let scraper = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal");
    let recs = scraper.scrape(GameweekRange::new(2, 3).unwrap()).expect("scrape");

    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].gameweek, 2);
    assert_eq!(recs[0].opponent.as_deref(), Some("Chelsea"));
    assert_eq!(recs[1].gameweek, 3);
    assert_eq!(recs[1].opponent.as_deref(), Some("West Ham"));
}

#[test]
fn team_scrape_first_gameweek_matches_expected_json() {
    let fetcher = arsenal_fetcher();
    let scraper = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal");
    let recs = scraper.scrape(GameweekRange::single(1).unwrap()).expect("scrape");

    assert_eq!(
        serde_json::to_value(&recs).unwrap(),
        json!([{"gw": 1, "xG": 1.5, "was_home": true, "opponent": "Fulham"}])
    );
}

#[test]
fn team_scrape_fetches_on_every_call_not_on_construction() {
    let fetcher = arsenal_fetcher();
    let scraper = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal");
    assert_eq!(fetcher.hits(TEAM_URL), 0);
    scraper.scrape(GameweekRange::default()).unwrap();
    scraper.scrape(GameweekRange::default()).unwrap();
    assert_eq!(fetcher.hits(TEAM_URL), 2);
}

#[test]
fn team_missing_from_fixture_yields_empty_xg() {
    let page = team_page(json!([fixture(
        ("Everton", "72"),
        ("Fulham", "1"),
        (json!("1.1"), json!("0.9"))
    )]));
    let fetcher = FakeFetcher::default().with_page(TEAM_URL, page);
    let recs = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal")
        .scrape(GameweekRange::default())
        .expect("scrape");

    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].xg, None);
    assert!(recs[0].is_mismatch());
}

#[test]
fn team_name_override_and_slug_with_underscores() {
    let url = "https://understat.com/team/Manchester_City/2018";
    let page = team_page(json!([fixture(
        ("Manchester City", "88"),
        ("Huddersfield", "246"),
        (json!("4.29"), json!("0.31"))
    )]));
    let fetcher = FakeFetcher::default().with_page(url, page);
    let scraper = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Manchester_City");
    assert_eq!(scraper.team_name(), "Manchester City");
    let recs = scraper.scrape(GameweekRange::default()).unwrap();
    assert_eq!(recs[0].xg, Some(4.29));

    let renamed = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Manchester_City")
        .with_team_name("Huddersfield");
    let recs = renamed.scrape(GameweekRange::default()).unwrap();
    assert_eq!(recs[0].was_home, Some(false));
}

#[test]
fn missing_page_is_a_network_error_and_changed_markup_a_structure_error() {
    let fetcher = FakeFetcher::default();
    let err = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal")
        .scrape(GameweekRange::default())
        .unwrap_err();
    assert!(err.is_network());

    let fetcher = FakeFetcher::default().with_page(TEAM_URL, "<html><body></body></html>".into());
    let err = TeamXgScraper::new(&fetcher, ScrapeConfig::default(), "Arsenal")
        .scrape(GameweekRange::default())
        .unwrap_err();
    assert!(err.is_structure());
}

#[test]
fn roster_and_teams_read_different_scripts_of_the_league_page() {
    let fetcher = FakeFetcher::default().with_page(LEAGUE_URL, league_page());
    let config = ScrapeConfig::default();

    let roster = LeagueRoster::fetch(&fetcher, &config).expect("roster");
    assert_eq!(roster.len(), 4);
    assert_eq!(
        roster.name_id_map().get("Harry Kane").map(String::as_str),
        Some("647")
    );
    for (id, name) in roster.id_name_map() {
        assert_eq!(roster.name_id_map().get(name), Some(id));
    }

    let teams = LeagueTeams::fetch(&fetcher, &config).expect("teams");
    assert_eq!(teams.len(), 2);
    let arsenal = teams.get_team_data("83").expect("arsenal");
    assert_eq!(arsenal.history.len(), 1);
    assert!(teams.scrape().iter().any(|t| t.team_name == "Fulham"));

    assert_eq!(fetcher.hits(LEAGUE_URL), 2);
}

#[test]
fn player_scraper_filters_season_and_labels_rows() {
    let mut matches = Vec::new();
    for i in 0..10 {
        let season = if i % 5 < 3 { "2018" } else { "2017" };
        let date = format!("2019-0{}-1{}", 1 + i % 5, i % 10);
        matches.push(player_match(season, &date, "Fulham", "Cardiff", "0.61"));
    }
    let fetcher = FakeFetcher::default()
        .with_page(LEAGUE_URL, league_page())
        .with_page(PLAYER_URL, player_page(json!(matches)));
    let config = ScrapeConfig::default();
    let roster = LeagueRoster::fetch(&fetcher, &config).unwrap();

    let player = PlayerScraper::new(&fetcher, &config, &roster, "8260").expect("player");
    assert_eq!(player.season_matches().len(), 6);
    assert_eq!(player.name(), "Aleksandar Mitrović");
    assert_eq!(player.last_name(), "Mitrovic");
    assert_eq!(player.team(), "Fulham");

    let rows = player.scrape(GameweekRange::new(2, 3).unwrap());
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].record, player.season_matches()[1]);
    let out = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(out["name"], "Aleksandar Mitrović");
    assert_eq!(out["was_home"], true);
    assert_eq!(out["opponent"], "Cardiff");
    assert_eq!(out["xG"], 0.61);
    assert_eq!(out["minutes_played"], 90);
}

#[test]
fn player_scraper_reuses_the_shared_roster() {
    let fetcher = FakeFetcher::default()
        .with_page(LEAGUE_URL, league_page())
        .with_page(PLAYER_URL, player_page(json!([])))
        .with_page(
            "https://understat.com/player/5220",
            player_page(json!([player_match("2018", "2018-09-01", "Fulham", "Brighton", "0.3")])),
        );
    let config = ScrapeConfig::default();
    let roster = LeagueRoster::fetch(&fetcher, &config).unwrap();

    PlayerScraper::new(&fetcher, &config, &roster, "8260").unwrap();
    let schurrle = PlayerScraper::new(&fetcher, &config, &roster, "5220").unwrap();
    assert_eq!(schurrle.last_name(), "Schurrle");
    assert_eq!(fetcher.hits(LEAGUE_URL), 1);
}

#[test]
fn unknown_player_is_a_lookup_miss_before_any_page_fetch() {
    let fetcher = FakeFetcher::default().with_page(LEAGUE_URL, league_page());
    let config = ScrapeConfig::default();
    let roster = LeagueRoster::fetch(&fetcher, &config).unwrap();

    let err = PlayerScraper::new(&fetcher, &config, &roster, "1").unwrap_err();
    assert_eq!(err.to_string(), "player 1 is not in the league roster");
    assert_eq!(fetcher.requests.borrow().len(), 1);
}

#[test]
fn extraction_round_trips_through_understat_style_escaping() {
    let value = json!({"title": "Brighton & Hove Albion", "quote": "it's", "ü": [1, 2.5, null]});
    let html = understat_page(&[("teamsData", value.clone())]);
    assert_eq!(extract_and_decode(&html, 0).unwrap(), value);
    assert_eq!(
        extract_and_decode(&html, 0).unwrap(),
        extract_and_decode(&html, 0).unwrap()
    );
}

#[test]
fn player_page_with_odd_rows_from_other_seasons_still_scrapes() {
    let mut old = player_match("2014", "2015-05-24", "Anderlecht", "Gent", "0.4");
    let fields = old.as_object_mut().unwrap();
    fields.remove("xGBuildup");
    fields.remove("xGChain");
    let matches = json!([
        player_match("2018", "2019-04-27", "Fulham", "Cardiff", "0.57"),
        old,
    ]);
    let fetcher = FakeFetcher::default()
        .with_page(LEAGUE_URL, league_page())
        .with_page(PLAYER_URL, player_page(matches));
    let config = ScrapeConfig::default();
    let roster = LeagueRoster::fetch(&fetcher, &config).unwrap();

    let player = PlayerScraper::new(&fetcher, &config, &roster, "8260").expect("player");
    assert_eq!(player.season_matches().len(), 1);
    assert_eq!(player.season_matches()[0].team.as_deref(), Some("Fulham"));
}
