//! # Batch Analysis
//!
//! Runs one segmentation per input file on a small pool of worker threads.
//! Jobs go out and results come back over crossbeam channels; each analysis
//! is independent, so the workers share nothing but the read-only config.

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use notetrack_core::{Note, SegmenterConfig, segment};
use std::path::{Path, PathBuf};
use std::thread;

use crate::input;

/// The notes found in one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackReport {
    pub source: PathBuf,
    pub notes: Vec<Note>,
}

/// Loads and segments a single pitch track.
pub fn analyze_file(path: &Path, config: &SegmenterConfig) -> Result<Vec<Note>> {
    let track = input::load_track(path)?;
    let notes =
        segment(track, config).with_context(|| format!("segmenting {}", path.display()))?;
    info!("[BATCH] {} notes in {}", notes.len(), path.display());
    Ok(notes)
}

/// Analyzes every path with up to `jobs` worker threads.
///
/// Reports come back in input order. The first failing input (in input
/// order) fails the whole batch.
pub fn analyze_all(
    paths: &[PathBuf],
    config: &SegmenterConfig,
    jobs: usize,
) -> Result<Vec<TrackReport>> {
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, PathBuf)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Result<Vec<Note>>)>();

    for (index, path) in paths.iter().enumerate() {
        job_tx.send((index, path.clone()))?;
    }
    drop(job_tx);

    let workers = jobs.clamp(1, paths.len().max(1));
    debug!("[BATCH] {} inputs on {} workers", paths.len(), workers);

    thread::scope(|scope| {
        for worker in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                for (index, path) in job_rx.iter() {
                    debug!("[BATCH] worker {} picked up {}", worker, path.display());
                    let outcome = analyze_file(&path, config);
                    if result_tx.send((index, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(result_tx);

    let mut outcomes: Vec<Option<Result<Vec<Note>>>> = paths.iter().map(|_| None).collect();
    for (index, outcome) in result_rx.iter() {
        outcomes[index] = Some(outcome);
    }

    paths
        .iter()
        .zip(outcomes)
        .map(|(path, outcome)| -> Result<TrackReport> {
            let notes = outcome.ok_or_else(|| anyhow!("no result for {}", path.display()))??;
            Ok(TrackReport {
                source: path.clone(),
                notes,
            })
        })
        .collect()
}
