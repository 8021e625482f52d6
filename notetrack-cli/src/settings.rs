//! Loading, saving and overriding the segmentation config.

use anyhow::{Context, Result};
use notetrack_core::{OffsetCorrection, SegmenterConfig};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use crate::cli::{OffsetMode, SegmentCommand};

/// Saves a config to a JSON file.
pub fn save_config(config: &SegmenterConfig, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(config)?;
    let mut file =
        File::create(path).with_context(|| format!("creating config file {}", path.display()))?;
    file.write_all(json_string.as_bytes())
        .with_context(|| format!("writing config file {}", path.display()))?;
    Ok(())
}

/// Loads a config from a JSON file. Missing keys take their default values.
pub fn load_config(path: &Path) -> Result<SegmenterConfig> {
    let file =
        File::open(path).with_context(|| format!("opening config file {}", path.display()))?;
    let config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

/// Builds the config for a `segment` run: defaults, then the config file,
/// then individual flags.
pub fn resolve_config(cmd: &SegmentCommand) -> Result<SegmenterConfig> {
    let mut config = match &cmd.config {
        Some(path) => load_config(path)?,
        None => SegmenterConfig::default(),
    };

    if let Some(threshold) = cmd.confidence_threshold {
        config.confidence_threshold = threshold;
    }
    if let Some(gap) = cmd.max_gap {
        config.max_gap_seconds = gap;
    }
    if let Some(slope) = cmd.max_slope {
        config.max_slope_hz_per_sec = slope;
    }
    if let Some(duration) = cmd.min_duration {
        config.min_duration_seconds = duration;
    }
    match (cmd.offset_correction, cmd.offset_cents) {
        (_, Some(cents)) => config.offset_correction = OffsetCorrection::Fixed { cents },
        (Some(OffsetMode::None), None) => config.offset_correction = OffsetCorrection::None,
        (Some(OffsetMode::FirstSegment), None) => {
            config.offset_correction = OffsetCorrection::FromFirstSegment
        }
        (None, None) => {}
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    fn segment_command(args: &[&str]) -> SegmentCommand {
        let argv = ["notetrack", "segment", "track.csv"].iter().chain(args);
        match Cli::parse_from(argv).command {
            Commands::Segment(cmd) => cmd,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = SegmenterConfig {
            max_slope_hz_per_sec: 140.0,
            offset_correction: OffsetCorrection::Fixed { cents: 12.5 },
            ..Default::default()
        };
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn flags_override_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "maxGapSeconds": 0.3, "minDurationSeconds": 0.2 }"#).unwrap();

        let path_arg = path.to_string_lossy().into_owned();
        let cmd = segment_command(&[
            "--config",
            path_arg.as_str(),
            "--min-duration",
            "0.1",
            "--offset-correction",
            "first-segment",
        ]);
        let config = resolve_config(&cmd).unwrap();
        assert_eq!(config.max_gap_seconds, 0.3);
        assert_eq!(config.min_duration_seconds, 0.1);
        assert_eq!(config.confidence_threshold, SegmenterConfig::default().confidence_threshold);
        assert_eq!(config.offset_correction, OffsetCorrection::FromFirstSegment);
    }

    #[test]
    fn out_of_domain_flags_are_rejected() {
        let cmd = segment_command(&["--confidence-threshold", "1.5"]);
        let err = resolve_config(&cmd).unwrap_err();
        assert!(err.to_string().contains("confidenceThreshold"));
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let cmd = segment_command(&["--config", "/nonexistent/notetrack.json"]);
        let err = resolve_config(&cmd).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/notetrack.json"));
    }
}
