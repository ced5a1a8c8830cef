//! Reads raw modem output from a file or stdin, prints every `+CGPSINFO`
//! fix and the motion between consecutive valid fixes.
//!
//! Set `RUST_LOG=debug` to see why lines were rejected.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, WrapErr};
use log::{info, warn};

use gpsinfo::config::{GPS_REFRESH_PERIOD_DEFAULT_MS, GPS_REFRESH_PERIOD_SMALLEST_MS};
use gpsinfo::{CgpsParser, GeoPoint, MotionCalculator, RefreshConfig};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Opts {
    /// Longest recommended refresh period, also used when nothing moved
    #[arg(long, env = "GPSINFO_REFRESH_DEFAULT_MS", default_value_t = GPS_REFRESH_PERIOD_DEFAULT_MS)]
    default_ms: u32,
    /// Shortest recommended refresh period
    #[arg(long, env = "GPSINFO_REFRESH_SMALLEST_MS", default_value_t = GPS_REFRESH_PERIOD_SMALLEST_MS)]
    smallest_ms: u32,
    /// File with raw modem output, stdin if absent
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let opts = Opts::parse();
    let config = RefreshConfig::new(opts.default_ms, opts.smallest_ms)?;
    info!("Refresh period bounds: {:?}", config);

    let input: Box<dyn Read> = match &opts.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).wrap_err_with(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let calculator = MotionCalculator::new(config);
    let mut previous: Option<GeoPoint> = None;

    for result in CgpsParser::new(input)? {
        let point = match result {
            Ok(pt) => pt,
            Err(e) => {
                warn!("Skipping response: {}", e);
                continue;
            }
        };

        println!("{}", point);
        if !point.is_valid() {
            continue;
        }
        if let Some(ref prev) = previous {
            println!("  {}", calculator.calculate(prev, &point));
        }
        previous = Some(point);
    }

    Ok(())
}
