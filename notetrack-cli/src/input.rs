//! # Pitch Track Input
//!
//! Reads observation streams written by an external pitch estimator.
//!
//! ## Formats
//! - **CSV**: a `time,frequency,confidence` header followed by one row per
//!   frame, as written next to the audio as `<name>.f0.csv`
//! - **JSON**: an array of `{ "time", "frequency", "confidence" }` objects

use anyhow::{Context, Result, bail};
use log::info;
use notetrack_core::Observation;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackFormat {
    Csv,
    Json,
}

impl TrackFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(TrackFormat::Csv),
            Some("json") => Ok(TrackFormat::Json),
            _ => bail!(
                "cannot tell the format of {}: expected a .csv or .json file",
                path.display()
            ),
        }
    }
}

/// Parses CSV rows into observations.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader
        .deserialize::<Observation>()
        .enumerate()
        .map(|(row, record)| record.with_context(|| format!("bad record on data row {}", row + 1)))
        .collect()
}

/// Parses a JSON array of observations.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let observations = serde_json::from_reader(reader)?;
    Ok(observations)
}

/// Loads a whole pitch track from disk.
pub fn load_track(path: &Path) -> Result<Vec<Observation>> {
    let format = TrackFormat::from_path(path)?;
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let observations = match format {
        TrackFormat::Csv => read_csv(reader),
        TrackFormat::Json => read_json(reader),
    }
    .with_context(|| format!("reading {}", path.display()))?;

    info!("[INPUT] {} observations from {}", observations.len(), path.display());
    Ok(observations)
}
