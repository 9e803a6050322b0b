//! Pulls the JSON payloads understat embeds in its pages.
//!
//! Every page carries its data as `var xData = JSON.parse('...')` inside a
//! `<script>` element, with the JSON text hidden behind JavaScript string
//! escapes (`\x22` for `"` and so on). Which script holds which payload is
//! fixed per page type, see [`PageScript`].

use std::iter::Peekable;
use std::str::CharIndices;

use scraper::{ElementRef, Html};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ScrapeError};

/// Known payload positions, counted over all `<script>` elements on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageScript {
    /// Season fixtures on `/team/{slug}/{season}`.
    TeamDates,
    /// ID-keyed team histories on `/league/{league}/{season}`.
    LeagueTeams,
    /// Player list on `/league/{league}/{season}`.
    LeaguePlayers,
    /// Per-match history on `/player/{id}`.
    PlayerMatches,
}

impl PageScript {
    pub const fn index(self) -> usize {
        match self {
            PageScript::TeamDates => 0,
            PageScript::LeagueTeams => 1,
            PageScript::LeaguePlayers => 2,
            PageScript::PlayerMatches => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            PageScript::TeamDates => "team fixtures",
            PageScript::LeagueTeams => "league teams",
            PageScript::LeaguePlayers => "league players",
            PageScript::PlayerMatches => "player matches",
        }
    }
}

/// Extract, unescape and parse the payload of the `script_index`-th script.
pub fn extract_and_decode(html: &str, script_index: usize) -> Result<Value> {
    let json = decoded_payload(html, script_index)?;
    serde_json::from_str(&json).map_err(|err| ScrapeError::json("embedded", err))
}

/// Typed variant of [`extract_and_decode`] for a known page script.
pub fn extract_payload<T: DeserializeOwned>(html: &str, script: PageScript) -> Result<T> {
    let json = decoded_payload(html, script.index())?;
    serde_json::from_str(&json).map_err(|err| ScrapeError::json(script.label(), err))
}

fn decoded_payload(html: &str, script_index: usize) -> Result<String> {
    let source = script_source(html, script_index)?;
    let raw = quoted_payload(&source).ok_or(ScrapeError::MissingDelimiter {
        index: script_index,
    })?;
    let json = unescape_js(raw)?;
    debug!(script_index, bytes = json.len(), "decoded embedded payload");
    Ok(json)
}

/// Rendered source of the `index`-th script element, tags included.
pub fn script_source(html: &str, index: usize) -> Result<String> {
    let document = Html::parse_document(html);
    let scripts: Vec<ElementRef> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "script")
        .collect();
    let found = scripts.len();
    scripts
        .get(index)
        .map(|el| el.html())
        .ok_or(ScrapeError::MissingScript { index, found })
}

/// Text strictly between the first two single quotes.
///
/// A raw `'` inside the payload ends it early; understat escapes them as
/// `\x27`, so this only bites if the markup changes.
pub fn quoted_payload(source: &str) -> Option<&str> {
    let start = source.find('\'')? + 1;
    let len = source[start..].find('\'')?;
    Some(&source[start..start + len])
}

/// Decode JavaScript string-literal escapes into plain text.
pub fn unescape_js(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some((_, esc)) = chars.next() else {
            return Err(ScrapeError::escape(pos, "trailing backslash"));
        };
        let decoded = match esc {
            'x' => hex_char(read_hex(&mut chars, pos, 2)?, pos)?,
            'u' => unicode_char(&mut chars, pos)?,
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            '0' => '\0',
            '\\' | '\'' | '"' | '/' => esc,
            other => return Err(ScrapeError::escape(pos, format!("unknown escape \\{other}"))),
        };
        out.push(decoded);
    }

    Ok(out)
}

fn read_hex(chars: &mut Peekable<CharIndices>, pos: usize, digits: usize) -> Result<u32> {
    let mut code = 0u32;
    for _ in 0..digits {
        let Some((_, c)) = chars.next() else {
            return Err(ScrapeError::escape(pos, "truncated hex escape"));
        };
        let digit = c
            .to_digit(16)
            .ok_or_else(|| ScrapeError::escape(pos, format!("non-hex digit {c:?}")))?;
        code = code * 16 + digit;
    }
    Ok(code)
}

fn hex_char(code: u32, pos: usize) -> Result<char> {
    char::from_u32(code).ok_or_else(|| ScrapeError::escape(pos, format!("invalid code point {code:#x}")))
}

fn unicode_char(chars: &mut Peekable<CharIndices>, pos: usize) -> Result<char> {
    let hi = read_hex(chars, pos, 4)?;
    if (0xDC00..0xE000).contains(&hi) {
        return Err(ScrapeError::escape(pos, "unpaired low surrogate"));
    }
    if !(0xD800..0xDC00).contains(&hi) {
        return hex_char(hi, pos);
    }

    let backslash = chars.next().map(|(_, c)| c);
    let marker = chars.next().map(|(_, c)| c);
    if backslash != Some('\\') || marker != Some('u') {
        return Err(ScrapeError::escape(pos, "unpaired high surrogate"));
    }
    let lo = read_hex(chars, pos, 4)?;
    if !(0xDC00..0xE000).contains(&lo) {
        return Err(ScrapeError::escape(pos, "invalid low surrogate"));
    }
    hex_char(0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00), pos)
}
