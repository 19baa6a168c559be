use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trailprof::DEFAULT_STEP_KM;

/// Plot elevation profiles and map views of GPX track logs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Distance between profile points, in kilometers.
    #[arg(short, long, default_value_t = DEFAULT_STEP_KM)]
    pub step: f64,

    /// Exit with an error instead of rendering an empty view when the
    /// track log can't be read.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// JSON file with map settings (tiles, icons, line style, zoom).
    #[arg(short, long)]
    pub map_config: Option<PathBuf>,

    /// GPX track log.
    pub gpx: PathBuf,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print profile points as CSV.
    Csv,

    /// Print profile points as JSON.
    Json,

    /// Plot elevation over distance to the terminal.
    Plot,

    /// Export the profile chart and the track map to an SVG.
    Svg {
        /// SVG file path.
        out: PathBuf,

        #[arg(long, default_value_t = 1280)]
        width: u32,

        #[arg(long, default_value_t = 1200)]
        height: u32,
    },

    /// Print the map view as GeoJSON.
    Map,

    /// Print route facts.
    Summary,
}
