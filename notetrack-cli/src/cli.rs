//! Command line interface for the note tracker.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Turn pitch tracks into lists of notes
#[derive(Parser, Debug)]
#[command(name = "notetrack", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the notetrack CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Segment pitch tracks into notes
    Segment(SegmentCommand),

    /// Name the nearest equal-tempered note for each frequency
    Name(NameCommand),

    /// Print (or save) the default segmentation config
    Defaults(DefaultsCommand),
}

/// Segment pitch tracks into notes
#[derive(Parser, Debug)]
pub struct SegmentCommand {
    /// Pitch track files: CSV with a `time,frequency,confidence` header, or JSON
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// JSON config file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Drop observations with confidence at or below this value (0.0 to 1.0)
    #[arg(long)]
    pub confidence_threshold: Option<f64>,

    /// Largest time gap inside one note, in seconds
    #[arg(long)]
    pub max_gap: Option<f64>,

    /// Largest pitch slope inside one note, in Hz per second
    #[arg(long)]
    pub max_slope: Option<f64>,

    /// Notes must last longer than this, in seconds
    #[arg(long)]
    pub min_duration: Option<f64>,

    /// Tuning offset correction
    #[arg(long, value_enum)]
    pub offset_correction: Option<OffsetMode>,

    /// Remove a fixed tuning offset, in cents
    #[arg(long, allow_hyphen_values = true, conflicts_with = "offset_correction")]
    pub offset_cents: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of tracks analyzed in parallel
    #[arg(short, long, default_value_t = 4)]
    pub jobs: usize,
}

/// Name the nearest equal-tempered note for each frequency
#[derive(Parser, Debug)]
pub struct NameCommand {
    /// Frequencies in Hz
    #[arg(required = true, allow_hyphen_values = true)]
    pub frequencies: Vec<f64>,
}

/// Print (or save) the default segmentation config
#[derive(Parser, Debug)]
pub struct DefaultsCommand {
    /// Save to this file instead of printing
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetMode {
    /// Report frequencies as measured
    None,
    /// Measure the offset on the first note and remove it from every note
    FirstSegment,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Table,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_segment_flags() {
        let cli = Cli::try_parse_from([
            "notetrack",
            "segment",
            "a.csv",
            "b.json",
            "--max-gap",
            "0.2",
            "--offset-cents",
            "-15",
            "--format",
            "table",
        ])
        .unwrap();
        let Commands::Segment(cmd) = cli.command else {
            panic!("expected segment command");
        };
        assert_eq!(cmd.inputs, vec![PathBuf::from("a.csv"), PathBuf::from("b.json")]);
        assert_eq!(cmd.max_gap, Some(0.2));
        assert_eq!(cmd.offset_cents, Some(-15.0));
        assert_eq!(cmd.format, OutputFormat::Table);
        assert_eq!(cmd.jobs, 4);
    }

    #[test]
    fn offset_modes_conflict() {
        let result = Cli::try_parse_from([
            "notetrack",
            "segment",
            "a.csv",
            "--offset-correction",
            "first-segment",
            "--offset-cents",
            "10",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn segment_requires_an_input() {
        assert!(Cli::try_parse_from(["notetrack", "segment"]).is_err());
    }
}
