use serde::Serialize;

use crate::error::{Result, ScrapeError};

/// 1-indexed inclusive gameweek window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameweekRange {
    start: usize,
    end: usize,
}

impl Default for GameweekRange {
    fn default() -> Self {
        Self { start: 1, end: 4 }
    }
}

impl GameweekRange {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start == 0 || end < start {
            return Err(ScrapeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn single(gameweek: usize) -> Result<Self> {
        Self::new(gameweek, gameweek)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The part of `items` this window covers; windows past the end shrink.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let lo = (self.start - 1).min(items.len());
        let hi = self.end.min(items.len());
        &items[lo..hi]
    }
}
