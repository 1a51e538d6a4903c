//! Command line interface: argument definitions and the line based converter behind
//! `cartconv convert`.

use crate::conversion::{ConversionOptions, InputSystem, OutputFormat, convert, parse_input};
use crate::osgb36::Osgb36Precision;
use crate::swiss::SwissCoordType;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Convert coordinates between lat/long, UTM, geohash, BMN, OSGB36 and the Swiss grid
#[derive(Debug, Parser)]
#[command(name = "cartconv")]
#[command(author, version)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the REST server
    Serve {
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Convert one literal per line from stdin to stdout
    Convert {
        /// latlong, bmn, utm, osgb36, swiss or geohash
        #[arg(short, long)]
        from: InputSystem,

        /// deg, dms, utm, geohash, bmn, osgb36 or swiss
        #[arg(short, long, default_value = "deg")]
        to: OutputFormat,

        /// Geohash bits per axis
        #[arg(long)]
        bits: Option<u8>,

        /// OSGB36 precision: auto, leave or 0..5
        #[arg(long, default_value = "auto")]
        precision: Osgb36Precision,

        /// Use LV95 labels (E:/N:) for Swiss output
        #[arg(long)]
        lv95: bool,
    },
}

/// Outcome of a conversion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub converted: usize,
    pub failed: usize,
}

/// Convert every non-blank line of `input`. Results go to `output`, failures are reported
/// on `errors` with their (1-based) line number and do not stop the run.
pub fn convert_lines(
    input: impl BufRead,
    mut output: impl Write,
    mut errors: impl Write,
    from: InputSystem,
    to: OutputFormat,
    options: &ConversionOptions,
) -> Result<Summary> {
    let mut summary = Summary::default();
    for (number, line) in input.lines().enumerate() {
        let line = line?;
        let literal = line.trim();
        if literal.is_empty() {
            continue;
        }
        match parse_input(from, literal).and_then(|pc| convert(&pc, to, options)) {
            Ok(converted) => {
                writeln!(output, "{converted}")?;
                summary.converted += 1;
            }
            Err(err) => {
                writeln!(errors, "line {}: {literal}: {err}", number + 1)?;
                summary.failed += 1;
            }
        }
    }
    output.flush()?;
    Ok(summary)
}

pub fn conversion_options(bits: Option<u8>, precision: Osgb36Precision, lv95: bool) -> ConversionOptions {
    ConversionOptions {
        geohash_bits: bits,
        osgb36_precision: precision,
        swiss_type: if lv95 {
            SwissCoordType::LV95
        } else {
            SwissCoordType::LV03
        },
    }
}
