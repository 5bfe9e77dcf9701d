// Copyright (c) 2025 Ken Barker

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN
// THE SOFTWARE.

//! Locate a position from its distances to two known positions on the WGS-84
//! ellipsoid.

use std::fmt::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};
use wgs84_trilateration::{
    calculate_trilateration, Degrees, Dms, LatLong, Metres, Solution, TrilaterationInput,
};

/// Locate a position from its distances to two known positions
///
/// Angles may be given in decimal degrees (e.g. -37.95) or as degrees,
/// minutes and seconds (e.g. 39:17:53.4608 or 39°17'53.4608"), negative
/// South and West.
#[derive(Parser)]
#[command(name = "trilaterate", version, about)]
struct Cli {
    /// Latitude of the first known position
    #[clap(long, allow_hyphen_values = true)]
    lat_a: Dms,

    /// Longitude of the first known position
    #[clap(long, allow_hyphen_values = true)]
    lon_a: Dms,

    /// Latitude of the second known position
    #[clap(long, allow_hyphen_values = true)]
    lat_b: Dms,

    /// Longitude of the second known position
    #[clap(long, allow_hyphen_values = true)]
    lon_b: Dms,

    /// Distance to the first known position, in metres
    #[clap(long)]
    distance_a: f64,

    /// Distance to the second known position, in metres
    #[clap(long)]
    distance_b: f64,

    /// Configure diagnostic logging level
    #[clap(long, short = 'L', default_value_t = Level::WARN)]
    log_level: Level,
}

/// Format an angle as degrees, minutes and seconds with a hemisphere letter.
fn format_dms(value: Degrees, positive: char, negative: char) -> String {
    let hemisphere = if value.0 < 0.0 { negative } else { positive };
    format!("{}{hemisphere}", Dms::from(Degrees(value.0.abs())))
}

fn write_solution(report: &mut String, index: usize, solution: &Solution) -> Result<()> {
    let lat = solution.position.lat();
    let lon = solution.position.lon();
    writeln!(report, "Solution {index}:")?;
    writeln!(report, "  decimal:  {:.8}, {:.8}", lat.0, lon.0)?;
    writeln!(
        report,
        "  DMS:      {} {}",
        format_dms(lat, 'N', 'S'),
        format_dms(lon, 'E', 'W')
    )?;
    if let Some(verification) = &solution.verification {
        writeln!(
            report,
            "  verified: {:.3} m to A, {:.3} m to B",
            verification.distance_a.0, verification.distance_b.0
        )?;
    }
    Ok(())
}

/// Locate the position described by the arguments.
///
/// returns the report of both solutions.
fn run(args: &Cli) -> Result<String> {
    let a = LatLong::new(Degrees::from(args.lat_a), Degrees::from(args.lon_a));
    let b = LatLong::new(Degrees::from(args.lat_b), Degrees::from(args.lon_b));
    let input = TrilaterationInput::new(a, b, Metres(args.distance_a), Metres(args.distance_b))
        .context("Reading the known positions and distances")?;

    let solutions = calculate_trilateration(&input).context("Locating the position")?;

    let mut report = String::new();
    for (index, solution) in solutions.iter().enumerate() {
        write_solution(&mut report, index + 1, solution)?;
    }
    Ok(report)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    debug!("trilaterate {}", clap::crate_version!());

    let report = run(&args)?;
    print!("{report}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgs84_trilateration::dms::to_decimal;
    use wgs84_trilateration::TrilaterationError;

    fn parse_args(lat_b: &str, lon_b: &str) -> Cli {
        Cli::try_parse_from([
            "trilaterate",
            "--lat-a",
            "39:17:53.4608",
            "--lon-a",
            "105°29'52.3439\"",
            "--lat-b",
            lat_b,
            "--lon-b",
            lon_b,
            "--distance-a",
            "16.91",
            "--distance-b",
            "9.0",
        ])
        .unwrap()
    }

    #[test]
    fn test_cli_args() {
        let args = parse_args("39:17:53.9129", "105 29 52.3031");
        assert_eq!(Level::WARN, args.log_level);
        assert_eq!(39, args.lat_a.degrees());
        assert_eq!(29, args.lon_b.minutes());
        assert_eq!(9.0, args.distance_b);

        let args = Cli::try_parse_from([
            "trilaterate",
            "-L",
            "debug",
            "--lat-a",
            "-37.95",
            "--lon-a",
            "144.42",
            "--lat-b",
            "-37.9501",
            "--lon-b",
            "144.42",
            "--distance-a",
            "10",
            "--distance-b",
            "10",
        ])
        .unwrap();
        assert_eq!(Level::DEBUG, args.log_level);
        assert!(args.lat_a.is_negative());

        // Out of range angles are rejected when parsing
        assert!(Cli::try_parse_from([
            "trilaterate",
            "--lat-a",
            "39:75:00",
            "--lon-a",
            "105",
            "--lat-b",
            "39",
            "--lon-b",
            "200",
            "--distance-a",
            "1",
            "--distance-b",
            "1",
        ])
        .is_err());
    }

    #[test]
    fn test_format_dms() {
        assert_eq!(
            "39°17'53.46080\"N",
            format_dms(Degrees(to_decimal(39, 17, 53.4608)), 'N', 'S')
        );
        assert_eq!("37°30'00.00000\"W", format_dms(Degrees(-37.5), 'E', 'W'));
    }

    #[test]
    fn test_run_report() {
        let args = parse_args("39:17:53.9129", "105 29 52.3031");
        let report = run(&args).unwrap();

        assert!(report.starts_with("Solution 1:\n  decimal:  39.29"));
        assert!(report.contains("Solution 2:"));
        assert_eq!(2, report.matches("N 105°29'").count());
        assert_eq!(
            2,
            report
                .matches("  verified: 16.910 m to A, 9.000 m to B\n")
                .count()
        );
    }

    #[test]
    fn test_run_no_intersection() {
        // Less than a metre from the first position: the circles are nested.
        let args = parse_args("39.298175806", "105.497869194");
        let error = run(&args).unwrap_err();

        assert!(matches!(
            error.downcast_ref::<TrilaterationError>(),
            Some(TrilaterationError::NoIntersection { .. })
        ));
        assert!(error.to_string().starts_with("Locating the position"));
    }
}
