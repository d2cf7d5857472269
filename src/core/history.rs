//! Conversion history: a capped in-memory log with an optional JSON-lines file behind it.
//!
//! Each persisted line is one serialized [`ConversionRecord`]. Lines in the older
//! human-readable form (`[06/12/2025 20:15] 300 USD → 375.00 CAD (Rate: 1.2500)`)
//! are still understood when reading, but only feed statistics.

use crate::core::converter::ConversionRecord;
use crate::core::error::{Result, XchangeError};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const MAX_RECORDS: usize = 20;

/// The part of a conversion that statistics are computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionData {
    pub amount: Decimal,
    pub from: String,
    pub to: String,
}

impl From<&ConversionRecord> for ConversionData {
    fn from(record: &ConversionRecord) -> Self {
        ConversionData {
            amount: record.amount,
            from: record.from.clone(),
            to: record.to.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStats {
    pub count: usize,
    /// `None` when the amounts do not fit in a `Decimal`.
    pub total_amount: Option<Decimal>,
    pub top_from: String,
    pub top_to: String,
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    /// Newest first.
    records: Vec<ConversionRecord>,
}

impl HistoryStore {
    pub fn in_memory() -> Self {
        HistoryStore::default()
    }

    /// An empty history that will still persist to `path`.
    pub fn empty_at(path: impl Into<PathBuf>) -> Self {
        HistoryStore {
            path: Some(path.into()),
            records: Vec::new(),
        }
    }

    /// Restores the most recent records from `path`. A missing file is an empty history.
    /// Unrecognised lines are skipped; a file with no recognisable line is corrupt.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No history file at {}, starting fresh", path.display());
                return Ok(Self::empty_at(path));
            }
            Err(e) => return Err(e.into()),
        };

        let mut restored = Vec::new();
        let mut recognised = 0;
        let mut first_bad = None;
        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<ConversionRecord>(line) {
                Ok(record) => {
                    recognised += 1;
                    restored.push(record);
                }
                Err(_) if parse_line(line).is_some() => {
                    recognised += 1;
                    debug!("Skipping display-format history line {}", index + 1);
                }
                Err(e) => {
                    warn!(
                        "Skipping unrecognised line {} in {}: {}",
                        index + 1,
                        path.display(),
                        e
                    );
                    first_bad.get_or_insert((index + 1, e.to_string()));
                }
            }
        }

        // Nothing recognisable at all: not a history file.
        if let (0, Some((line, reason))) = (recognised, first_bad) {
            return Err(XchangeError::HistoryCorrupt { line, reason });
        }

        // The file is chronological; memory is newest first.
        restored.reverse();
        restored.truncate(MAX_RECORDS);
        debug!(
            "Loaded {} conversion records from {}",
            restored.len(),
            path.display()
        );
        Ok(HistoryStore {
            path: Some(path),
            records: restored,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepends `record`, evicting the oldest entry past [`MAX_RECORDS`].
    pub fn record(&mut self, record: ConversionRecord) {
        self.records.insert(0, record);
        self.records.truncate(MAX_RECORDS);
    }

    /// Appends the serialized `records` that the file does not already contain.
    /// Returns how many lines were written.
    pub fn append(&self, records: &[ConversionRecord]) -> Result<usize> {
        let Some(path) = &self.path else {
            return Ok(0);
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        let mut existing: HashSet<String> =
            content.lines().map(|l| l.trim_end().to_string()).collect();

        let mut new_lines = Vec::new();
        for record in records {
            let line = serde_json::to_string(record).map_err(std::io::Error::other)?;
            if existing.insert(line.clone()) {
                new_lines.push(line);
            }
        }

        if new_lines.is_empty() {
            debug!("No new history records to append");
            return Ok(0);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        // An unterminated last line would swallow the first new record.
        if !content.is_empty() && !content.ends_with('\n') {
            writeln!(file)?;
        }
        for line in &new_lines {
            writeln!(file, "{line}")?;
        }
        debug!(
            "Appended {} history records to {}",
            new_lines.len(),
            path.display()
        );
        Ok(new_lines.len())
    }

    /// Persists the in-memory records, oldest first.
    pub fn save(&self) -> Result<usize> {
        let chronological: Vec<ConversionRecord> = self.records.iter().rev().cloned().collect();
        self.append(&chronological)
    }

    /// Every parseable entry of the backing file, or the in-memory records when
    /// there is no file.
    pub fn persisted(&self) -> Result<Vec<ConversionData>> {
        let Some(path) = &self.path else {
            return Ok(self.records.iter().map(ConversionData::from).collect());
        };
        match fs::read_to_string(path) {
            Ok(content) => Ok(content.lines().filter_map(parse_persisted).collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Drops every record and removes the backing file. When the file cannot be
    /// removed it is truncated instead.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        let Some(path) = &self.path else {
            return Ok(());
        };
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(
                    "Could not delete {}: {}, writing an empty history instead",
                    path.display(),
                    e
                );
                fs::write(path, "")?;
                Ok(())
            }
        }
    }
}

/// Recovers amount and currencies from a display-format history line.
pub fn parse_line(line: &str) -> Option<ConversionData> {
    let (_timestamp, rest) = line.split_once("] ")?;
    let (source, rest) = rest.split_once(" → ")?;
    let (target, rate) = rest.split_once(" (Rate: ")?;
    if rate.is_empty() {
        return None;
    }

    let mut source = source.split(' ');
    let amount: Decimal = source.next()?.parse().ok()?;
    let from = source.next().filter(|s| !s.is_empty())?;

    let mut target = target.split(' ');
    let _result = target.next()?;
    let to = target.next().filter(|s| !s.is_empty())?;

    Some(ConversionData {
        amount,
        from: from.to_string(),
        to: to.to_string(),
    })
}

/// Parses a persisted line in either the JSON or the display format.
pub fn parse_persisted(line: &str) -> Option<ConversionData> {
    let line = line.trim_end();
    serde_json::from_str::<ConversionRecord>(line)
        .ok()
        .map(|record| ConversionData::from(&record))
        .or_else(|| parse_line(line))
}

/// Totals and most used currencies. Ties go to the currency seen first.
pub fn statistics(data: &[ConversionData]) -> Option<HistoryStats> {
    if data.is_empty() {
        return None;
    }
    let total_amount = data
        .iter()
        .try_fold(Decimal::ZERO, |acc, d| acc.checked_add(d.amount));
    Some(HistoryStats {
        count: data.len(),
        total_amount,
        top_from: most_frequent(data.iter().map(|d| d.from.as_str()))?,
        top_to: most_frequent(data.iter().map(|d| d.to.as_str()))?,
    })
}

fn most_frequent<'a>(codes: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut groups: Vec<(&str, usize)> = Vec::new();
    for code in codes {
        match groups.iter_mut().find(|(c, _)| *c == code) {
            Some((_, count)) => *count += 1,
            None => groups.push((code, 1)),
        }
    }
    let mut best: Option<(&str, usize)> = None;
    for (code, count) in groups {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((code, count));
        }
    }
    best.map(|(code, _)| code.to_string())
}
