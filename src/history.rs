//! Watch history stored as a JSON list of `[id, title]` pairs

use crate::config::home_file;
use crate::core::stream::ContentId;
use crate::error::TubeError;
use std::collections::BTreeSet;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::debug;

/// History file name inside the home directory
pub const HISTORY_FILE: &str = ".yt_history";

/// One watched video
pub type HistoryEntry = (ContentId, String);

/// File-backed watch history.
///
/// Indices handed in and out are 1-based and the list is kept dense: deleting
/// an entry renumbers everything after it.
#[derive(Debug, Clone)]
pub struct History {
    path: PathBuf,
}

impl History {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// History in the user's home directory
    pub fn default_location() -> Result<Self, TubeError> {
        Ok(Self::new(home_file(HISTORY_FILE)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry in insertion order
    pub fn read(&self) -> Result<Vec<HistoryEntry>, TubeError> {
        if !self.path.exists() {
            return Err(TubeError::History("No history file found.".to_string()));
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .map_err(|_| TubeError::History("Error reading history".to_string()))
    }

    /// Entry at a 1-based index
    pub fn get(&self, index: usize) -> Result<HistoryEntry, TubeError> {
        let mut entries = self.read()?;
        if index == 0 || index > entries.len() {
            return Err(TubeError::History(format!("No match for '{}'", index)));
        }
        Ok(entries.swap_remove(index - 1))
    }

    /// Record a watched video once; returns whether it was added.
    ///
    /// Re-watching an already recorded video leaves the order untouched.
    pub fn append(&self, id: &ContentId, title: &str) -> Result<bool, TubeError> {
        let mut entries = if self.path.exists() {
            self.read()?
        } else {
            Vec::new()
        };

        if entries.iter().any(|(known, _)| known == id) {
            debug!("{} already in history", id);
            return Ok(false);
        }

        entries.push((id.clone(), title.to_string()));
        self.write(&entries)?;
        Ok(true)
    }

    /// Remove all given 1-based positions in one step.
    ///
    /// Nothing is written when any position is out of range.
    pub fn delete(&self, positions: &[usize]) -> Result<(), TubeError> {
        let entries = self.read()?;
        let doomed: BTreeSet<usize> = positions.iter().copied().collect();

        if let Some(bad) = doomed.iter().find(|&&pos| pos == 0 || pos > entries.len()) {
            return Err(TubeError::History(format!(
                "Failed to delete history: invalid index {}",
                bad
            )));
        }

        let kept: Vec<HistoryEntry> = entries
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !doomed.contains(&(i + 1)))
            .map(|(_, entry)| entry)
            .collect();
        self.write(&kept)
    }

    /// Remove an inclusive span of 1-based positions.
    ///
    /// The span is checked against the history length before it is expanded.
    /// An empty span removes nothing.
    pub fn delete_range(&self, span: &RangeInclusive<usize>) -> Result<(), TubeError> {
        if span.is_empty() {
            return Ok(());
        }
        let len = self.read()?.len();
        if *span.start() == 0 || *span.end() > len {
            return Err(TubeError::History(format!(
                "Failed to delete history: invalid index range {}-{}",
                span.start(),
                span.end()
            )));
        }
        self.delete(&span.clone().collect::<Vec<_>>())
    }

    /// Remove the most recent entry
    pub fn delete_last(&self) -> Result<(), TubeError> {
        let mut entries = self.read()?;
        if entries.pop().is_none() {
            return Err(TubeError::History("History is empty".to_string()));
        }
        self.write(&entries)
    }

    /// Apply a parsed deletion request
    pub fn apply(&self, deletion: &Deletion) -> Result<(), TubeError> {
        match deletion {
            Deletion::Last => self.delete_last(),
            Deletion::Range(span) => self.delete_range(span),
            Deletion::Positions(positions) => self.delete(positions),
        }
    }

    fn write(&self, entries: &[HistoryEntry]) -> Result<(), TubeError> {
        fs::write(&self.path, serde_json::to_string(entries)?)?;
        Ok(())
    }
}

/// What `delhist` should remove
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deletion {
    Last,
    /// Inclusive `N-M` span
    Range(RangeInclusive<usize>),
    Positions(Vec<usize>),
}

/// Parse `delhist` arguments: `last`, an inclusive `N-M` range, or a list of
/// positions given as separate arguments or as one quoted argument.
pub fn parse_deletion(args: &[String]) -> Result<Deletion, TubeError> {
    let first = args
        .first()
        .ok_or_else(|| TubeError::History("No history positions given".to_string()))?;

    if first.eq_ignore_ascii_case("last") {
        return Ok(Deletion::Last);
    }

    if first.contains('-') {
        let span = first
            .split('-')
            .map(parse_position)
            .collect::<Result<Vec<_>, _>>()?;
        return match span.as_slice() {
            [start, end] => Ok(Deletion::Range(*start..=*end)),
            [single] => Ok(Deletion::Positions(vec![*single])),
            _ => Err(TubeError::History(
                "Deletion range may only contain start and end positions".to_string(),
            )),
        };
    }

    let words: Vec<&str> = if first.contains(char::is_whitespace) {
        first.split_whitespace().collect()
    } else {
        args.iter().map(String::as_str).collect()
    };

    words
        .into_iter()
        .map(parse_position)
        .collect::<Result<Vec<_>, _>>()
        .map(Deletion::Positions)
}

fn parse_position(word: &str) -> Result<usize, TubeError> {
    word.trim()
        .parse()
        .map_err(|_| TubeError::History("History positions must be integers".to_string()))
}
