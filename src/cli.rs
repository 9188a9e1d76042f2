//! Command-line interface components.

use crate::config::{OutputFormat, ProcessorConfig};
use crate::error::Result;
use crate::models::{ParsedMeasurement, ProcessingStats, ReadingOutcome};
use crate::processor::{ReadingBatch, ReadingProcessor};
use clap::Parser;
use colored::*;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "balance-reading")]
#[command(about = "Parse precision balance readouts into sign, value, unit and settling state")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Capture files with one readout per line (reads stdin when omitted)
    #[arg(value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Parse lines starting with '#' instead of skipping them
    #[arg(long)]
    pub keep_comments: bool,

    /// Report blank lines as failed readings
    #[arg(long)]
    pub keep_blank: bool,

    /// Exit with an error if any reading fails to parse
    #[arg(long)]
    pub fail_on_unparsed: bool,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Log level implied by the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Build the processor configuration from CLI flags
    pub fn to_config(&self) -> ProcessorConfig {
        let mut config = ProcessorConfig::default().with_output_format(self.format);
        if self.keep_comments {
            config = config.with_comments();
        }
        if self.keep_blank {
            config = config.with_blank_lines();
        }
        if self.fail_on_unparsed {
            config = config.with_fail_on_unparsed();
        }
        config
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("balance_reading={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Run the CLI: process inputs, render results, apply the failure policy
pub fn run(args: &Args) -> Result<ProcessingStats> {
    let processor = ReadingProcessor::new(args.to_config())?;

    let batch = if args.inputs.is_empty() {
        info!("Reading readouts from stdin");
        processor.process_stdin()?
    } else {
        info!("Reading readouts from {} file(s)", args.inputs.len());
        processor.process_files(args.inputs.as_slice())?
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_batch(&mut out, &batch, processor.config().output_format)?;
    out.flush()?;

    processor.check_batch(&batch)?;
    Ok(batch.stats)
}

/// Write a batch in the requested format
pub fn render_batch<W: Write>(
    out: &mut W,
    batch: &ReadingBatch,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            writeln!(out, "{}", "Parsing Results:".bright_green().bold())?;
            for outcome in &batch.outcomes {
                writeln!(out, "{}", format_outcome(outcome))?;
            }
            writeln!(out)?;
            write_summary(out, &batch.stats)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, batch)?;
            writeln!(out)?;
        }
        OutputFormat::Jsonl => {
            for outcome in &batch.outcomes {
                serde_json::to_writer(&mut *out, outcome)?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Text line for one outcome
pub fn format_outcome(outcome: &ReadingOutcome) -> String {
    match &outcome.parsed {
        Some(reading) => format!(
            "Original: '{}' -> Parsed: {}",
            outcome.original,
            format_fields(reading)
        ),
        None => format!(
            "Original: '{}' -> {}",
            outcome.original,
            "FAILED TO PARSE".red().bold()
        ),
    }
}

fn format_fields(reading: &ParsedMeasurement) -> String {
    format!(
        "{{sign: '{}', numeric_part: {:?}, alpha_part: '{}', value_changing: {}}}",
        reading.sign, reading.numeric_part, reading.alpha_part, reading.value_changing
    )
}

fn write_summary<W: Write>(out: &mut W, stats: &ProcessingStats) -> Result<()> {
    writeln!(out, "{}", "Summary".bright_white().bold())?;
    writeln!(out, "  Sources:   {}", stats.sources_processed)?;
    writeln!(
        out,
        "  Lines:     {} read, {} skipped",
        stats.lines_read, stats.lines_skipped
    )?;
    writeln!(
        out,
        "  Parsed:    {}",
        stats.readings_parsed.to_string().bright_green()
    )?;

    let failed = stats.readings_failed.to_string();
    let failed = if stats.readings_failed > 0 {
        failed.bright_red()
    } else {
        failed.normal()
    };
    writeln!(out, "  Failed:    {}", failed)?;
    writeln!(
        out,
        "  Settling:  {} changing, {} settled",
        stats.readings_changing,
        stats.readings_settled()
    )?;

    if !stats.unit_counts.is_empty() {
        let units: Vec<String> = stats
            .unit_counts
            .iter()
            .map(|(unit, count)| format!("{}={}", unit, count))
            .collect();
        writeln!(out, "  Units:     {}", units.join(", "))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Sign, Unit};

    fn sample_batch() -> ReadingBatch {
        let parsed = ReadingOutcome {
            source: "test".to_string(),
            line_number: 1,
            original: "- 37.022gnM".to_string(),
            parsed: Some(ParsedMeasurement {
                sign: Sign::Minus,
                numeric_part: -37.022,
                alpha_part: Unit::Grain,
                value_changing: true,
            }),
        };
        let failed = ReadingOutcome {
            source: "test".to_string(),
            line_number: 2,
            original: "invalid_string_123".to_string(),
            parsed: None,
        };
        let mut stats = ProcessingStats {
            sources_processed: 1,
            lines_read: 2,
            ..Default::default()
        };
        stats.record(&parsed);
        stats.record(&failed);
        ReadingBatch {
            outcomes: vec![parsed, failed],
            stats,
        }
    }

    #[test]
    fn test_args_to_config() {
        let args = Args::parse_from([
            "balance-reading",
            "--format",
            "jsonl",
            "--keep-blank",
            "--fail-on-unparsed",
            "capture.txt",
        ]);
        let config = args.to_config();
        assert_eq!(config.output_format, OutputFormat::Jsonl);
        assert!(!config.skip_blank_lines);
        assert!(config.skip_comments);
        assert!(config.fail_on_unparsed);
        assert_eq!(args.inputs, vec![PathBuf::from("capture.txt")]);
        assert_eq!(args.get_log_level(), "info");
    }

    #[test]
    fn test_verbose_and_quiet_conflict() {
        let result = Args::try_parse_from(["balance-reading", "-v", "-q"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_outcome_text() {
        colored::control::set_override(false);
        let batch = sample_batch();
        assert_eq!(
            format_outcome(&batch.outcomes[0]),
            "Original: '- 37.022gnM' -> Parsed: {sign: '-', numeric_part: -37.022, alpha_part: 'gn', value_changing: true}"
        );
        assert_eq!(
            format_outcome(&batch.outcomes[1]),
            "Original: 'invalid_string_123' -> FAILED TO PARSE"
        );
    }

    #[test]
    fn test_render_jsonl() {
        let batch = sample_batch();
        let mut out = Vec::new();
        render_batch(&mut out, &batch, OutputFormat::Jsonl).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: ReadingOutcome = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first, batch.outcomes[0]);
        assert!(lines[1].contains("\"parsed\":null"));
    }

    #[test]
    fn test_render_json_document() {
        let batch = sample_batch();
        let mut out = Vec::new();
        render_batch(&mut out, &batch, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 2);
        assert_eq!(value["outcomes"][0]["parsed"]["alpha_part"], "gn");
        assert_eq!(value["outcomes"][0]["parsed"]["sign"], "-");
        assert!(value["outcomes"][1]["parsed"].is_null());
        assert_eq!(value["stats"]["readings_failed"], 1);
        assert_eq!(value["stats"]["unit_counts"]["gn"], 1);
    }

    #[test]
    fn test_render_text_summary() {
        colored::control::set_override(false);
        let batch = sample_batch();
        let mut out = Vec::new();
        render_batch(&mut out, &batch, OutputFormat::Text).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Parsing Results:"));
        assert!(text.contains("FAILED TO PARSE"));
        assert!(text.contains("Parsed:    1"));
        assert!(text.contains("Failed:    1"));
        assert!(text.contains("Units:     gn=1"));
    }
}
