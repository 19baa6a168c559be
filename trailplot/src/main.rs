mod options;
mod svg;

use anyhow::Error as AnyError;
use clap::Parser;
use log::error;
use options::{Cli, Command as CliCmd};
use serde::Serialize;
use std::{io::Write, path::Path};
use textplots::{Chart, Plot, Shape};
use trailprof::{MapConfig, MapView, Profile, ProfileBuilder, ProfileError, TrackLog, Trail};

fn main() -> Result<(), AnyError> {
    let Cli {
        step,
        strict,
        map_config,
        gpx,
        cmd,
    } = Cli::parse();

    env_logger::init();

    let map_config = match map_config {
        Some(path) => MapConfig::load(path)?,
        None => MapConfig::default(),
    };

    let builder = Profile::builder().step(step);
    let trail = load_trail(&gpx, &builder, strict)?;

    let view = MapView::new(map_config, &trail.profile);

    match cmd {
        CliCmd::Csv => print_csv(std::io::stdout().lock(), &trail.profile)?,
        CliCmd::Json => print_json(std::io::stdout().lock(), &trail.profile)?,
        CliCmd::Plot => plot_ascii(&trail.profile),
        CliCmd::Svg { out, width, height } => svg::render(&trail, &view, &out, (width, height))?,
        CliCmd::Map => println!("{}", view.to_geojson()),
        CliCmd::Summary => print_summary(&trail, &view)?,
    };

    Ok(())
}

/// Loads `gpx`, degrading to an empty trail when the file can't be
/// read or parsed unless `strict` is set.
///
/// An invalid step is an error either way.
fn load_trail<P: AsRef<Path>>(
    gpx: P,
    builder: &ProfileBuilder,
    strict: bool,
) -> Result<Trail, AnyError> {
    match Trail::load(gpx, builder) {
        Ok(trail) => Ok(trail),
        Err(e @ ProfileError::Tracklog(_)) if !strict => {
            error!("{e}");
            Ok(Trail::from_track(TrackLog::default(), builder)?)
        }
        Err(e) => Err(e.into()),
    }
}

/// # Example with gnuplot
///
/// ```sh
/// cargo run -- data/gpx/kas.gpx csv | tr ',' ' ' > ~/.tmp/plot && gnuplot -p -e "plot '~/.tmp/plot' using 1:5 with lines"
/// ```
fn print_csv<W: Write>(mut out: W, profile: &Profile) -> Result<(), AnyError> {
    writeln!(out, "Distance,Label,Longitude,Latitude,Elevation,Elapsed")?;
    for point in &profile.points {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            point.distance_km,
            point.label,
            point.lon(),
            point.lat(),
            point.elevation_m,
            point.elapsed_min
        )?;
    }
    Ok(())
}

fn print_json<W: Write>(mut out: W, profile: &Profile) -> Result<(), AnyError> {
    #[derive(Serialize)]
    struct JsonEntry<'a> {
        label: &'a str,
        elevation: i32,
        elapsed: i32,
        location: [f64; 2],
        distance: f64,
    }

    let reshaped: Vec<JsonEntry> = profile
        .points
        .iter()
        .map(|point| JsonEntry {
            label: &point.label,
            elevation: point.elevation_m,
            elapsed: point.elapsed_min,
            location: [point.lon(), point.lat()],
            distance: point.distance_km,
        })
        .collect();
    serde_json::to_writer(&mut out, &reshaped)?;
    writeln!(out)?;
    Ok(())
}

#[allow(clippy::cast_possible_truncation)]
fn plot_ascii(profile: &Profile) {
    if profile.is_empty() {
        return;
    }
    let plot_data: Vec<(f32, f32)> = profile
        .points
        .iter()
        .map(|point| (point.distance_km as f32, point.elevation_m as f32))
        .collect();
    let x_max = plot_data
        .last()
        .map_or(0.0, |(km, _)| *km)
        .max(f32::EPSILON);
    Chart::new(300, 150, 0.0, x_max)
        .lineplot(&Shape::Lines(&plot_data))
        .display();
}

fn print_summary(trail: &Trail, view: &MapView) -> Result<(), AnyError> {
    let summary = &trail.summary;
    let meters = |m: Option<f64>| m.map_or_else(|| "-".to_string(), |m| format!("{m:.0} m"));
    let center = view.center();

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "name:      {}", trail.name.as_deref().unwrap_or("-"))?;
    writeln!(stdout, "distance:  {:.2} km", summary.distance_km)?;
    writeln!(stdout, "ascent:    {:.0} m", summary.ascent_m)?;
    writeln!(stdout, "descent:   {:.0} m", summary.descent_m)?;
    writeln!(stdout, "max:       {}", meters(summary.max_elevation_m))?;
    writeln!(stdout, "min:       {}", meters(summary.min_elevation_m))?;
    writeln!(stdout, "samples:   {}", summary.samples)?;
    writeln!(stdout, "points:    {}", trail.profile.len())?;
    writeln!(stdout, "center:    {:.5},{:.5}", center.y, center.x)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_trail, print_csv, print_json};
    use serde_json::json;
    use std::path::PathBuf;
    use trailprof::{Profile, Trail};

    fn kas_gpx() -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "..", "data", "gpx", "kas.gpx"]
            .iter()
            .collect()
    }

    fn kas_trail() -> Trail {
        load_trail(kas_gpx(), &Profile::builder(), true).unwrap()
    }

    #[test]
    fn test_missing_file_degrades_to_empty_trail() {
        let trail = load_trail("does/not/exist.gpx", &Profile::builder(), false).unwrap();
        assert!(trail.name.is_none());
        assert!(trail.profile.is_empty());
        assert_eq!(trail.summary.samples, 0);
    }

    #[test]
    fn test_missing_file_is_an_error_when_strict() {
        assert!(load_trail("does/not/exist.gpx", &Profile::builder(), true).is_err());
    }

    #[test]
    fn test_invalid_step_is_always_an_error() {
        let builder = Profile::builder().step(0.0);
        assert!(load_trail(kas_gpx(), &builder, false).is_err());
        assert!(load_trail("does/not/exist.gpx", &builder, false).is_err());
    }

    #[test]
    fn test_csv() {
        let mut out = Vec::new();
        print_csv(&mut out, &kas_trail().profile).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Distance,Label,Longitude,Latitude,Elevation,Elapsed\n\
             0,0.0km,29.64,36.2,2,0\n\
             0.1,0.1km,29.6408,36.201,12,0\n\
             0.3,0.3km,29.6416,36.202,25,0\n\
             0.3,0.3km,29.642,36.2025,22,0\n\
             0.5,0.5km,29.6428,36.2035,43,0\n"
        );
    }

    #[test]
    fn test_csv_empty_profile_is_header_only() {
        let mut out = Vec::new();
        print_csv(&mut out, &Profile::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Distance,Label,Longitude,Latitude,Elevation,Elapsed\n"
        );
    }

    #[test]
    fn test_json() {
        let mut out = Vec::new();
        print_json(&mut out, &kas_trail().profile).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            parsed,
            json!([
                {"label": "0.0km", "elevation": 2, "elapsed": 0, "location": [29.64, 36.2], "distance": 0.0},
                {"label": "0.1km", "elevation": 12, "elapsed": 0, "location": [29.6408, 36.201], "distance": 0.1},
                {"label": "0.3km", "elevation": 25, "elapsed": 0, "location": [29.6416, 36.202], "distance": 0.3},
                {"label": "0.3km", "elevation": 22, "elapsed": 0, "location": [29.642, 36.2025], "distance": 0.3},
                {"label": "0.5km", "elevation": 43, "elapsed": 0, "location": [29.6428, 36.2035], "distance": 0.5},
            ])
        );
    }
}
