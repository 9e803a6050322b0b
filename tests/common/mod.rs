#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use serde_json::{Value, json};
use understat_xg::{PageFetcher, Result, ScrapeError};

/// Serves canned pages and remembers what was asked for.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, String>,
    pub requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn hits(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|u| *u == url).count()
    }
}

impl PageFetcher for FakeFetcher {
    fn fetch(&self, url: &str, _timeout: Duration) -> Result<String> {
        self.requests.borrow_mut().push(url.to_string());
        self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Escape JSON text the way understat does inside `JSON.parse('...')`.
pub fn js_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() || ch == ' ' {
            out.push(ch);
        } else if (ch as u32) < 0x100 {
            out.push_str(&format!("\\x{:02X}", ch as u32));
        } else {
            let mut buf = [0u16; 2];
            for unit in ch.encode_utf16(&mut buf) {
                out.push_str(&format!("\\u{unit:04X}"));
            }
        }
    }
    out
}

pub fn understat_page(payloads: &[(&str, Value)]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Understat</title></head><body><div class=\"page-wrapper\">",
    );
    for (var, value) in payloads {
        html.push_str(&format!(
            "<script>\n\tvar {var}\t= JSON.parse('{}');\n</script>",
            js_escape(&value.to_string())
        ));
    }
    html.push_str("</div></body></html>");
    html
}

pub fn fixture(home: (&str, &str), away: (&str, &str), xg: (Value, Value)) -> Value {
    json!({
        "id": "9197",
        "isResult": true,
        "side": "h",
        "h": {"id": home.1, "title": home.0, "short_title": "H"},
        "a": {"id": away.1, "title": away.0, "short_title": "A"},
        "goals": {"h": "2", "a": "0"},
        "xG": {"h": xg.0, "a": xg.1},
        "datetime": "2018-08-11 14:00:00"
    })
}

pub fn arsenal_season() -> Value {
    json!([
        fixture(("Arsenal", "2"), ("Fulham", "1"), (json!(1.5), json!(0.8))),
        fixture(("Chelsea", "80"), ("Arsenal", "2"), (json!("2.46"), json!("1.16"))),
        fixture(("Arsenal", "2"), ("West Ham", "81"), (json!("1.79"), json!("1.03"))),
        fixture(("Cardiff", "227"), ("Arsenal", "2"), (json!("1.52"), json!("2.44"))),
    ])
}

pub fn team_page(fixtures: Value) -> String {
    understat_page(&[("datesData", fixtures)])
}

pub fn roster_players() -> Value {
    json!([
        {"id": "647", "player_name": "Harry Kane", "team_title": "Tottenham", "games": "28"},
        {"id": "318", "player_name": "Pierre-Emerick Aubameyang", "team_title": "Arsenal", "games": "36"},
        {"id": "8260", "player_name": "Aleksandar Mitrović", "team_title": "Fulham", "games": "37"},
        {"id": "5220", "player_name": "André Schürrle", "team_title": "Fulham", "games": "24"}
    ])
}

pub fn league_teams() -> Value {
    json!({
        "83": {"id": "83", "title": "Arsenal", "history": [
            {"h_a": "h", "xG": 1.14, "xGA": 2.21, "scored": 0, "missed": 2, "date": "2018-08-12 15:00:00"}
        ]},
        "228": {"id": "228", "title": "Fulham", "history": []}
    })
}

pub fn league_page() -> String {
    understat_page(&[
        ("datesData", json!([])),
        ("teamsData", league_teams()),
        ("playersData", roster_players()),
    ])
}

pub fn player_match(season: &str, date: &str, home: &str, away: &str, xg: &str) -> Value {
    json!({
        "goals": "1", "shots": "4", "xG": xg, "time": "90", "position": "FW",
        "h_team": home, "a_team": away, "h_goals": "3", "a_goals": "1",
        "date": date, "id": "9501", "season": season, "roster_id": "28101",
        "xA": "0.12", "assists": "1", "key_passes": "2", "npg": "1",
        "npxG": xg, "xGChain": "0.9", "xGBuildup": "0.2"
    })
}

pub fn player_page(matches: Value) -> String {
    understat_page(&[
        ("groupsData", json!({})),
        ("minMaxPlayerStats", json!({})),
        ("shotsData", json!([])),
        ("matchesData", matches),
    ])
}
