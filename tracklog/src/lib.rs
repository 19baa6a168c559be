//! GPX track log loading.
//!
//! Reads a single track out of a GPX document and flattens it into an
//! ordered list of `(longitude, latitude, elevation)` samples.
//!
//! # References
//!
//! 1. [GPX 1.1 Schema Documentation](https://www.topografix.com/GPX/1/1/)

mod error;

pub use crate::error::TracklogError;
use gpx::{Gpx, Waypoint};
use log::{debug, warn};
use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
    time::Instant,
};

/// Base floating point type used for all samples.
///
/// Note: this _could_ be a generic parameter, but the `gpx` crate only
/// hands out `f64` coordinates, so anything narrower would be a lossy
/// conversion made on the caller's behalf.
pub type C = f64;

/// One raw track log sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Degrees east.
    pub lon: C,

    /// Degrees north.
    pub lat: C,

    /// Meters above sea level, `NaN` when the track point has no
    /// `<ele>` element.
    pub ele: C,
}

impl Sample {
    pub const fn new(lon: C, lat: C, ele: C) -> Self {
        Self { lon, lat, ele }
    }
}

impl From<&Waypoint> for Sample {
    fn from(waypoint: &Waypoint) -> Self {
        let point = waypoint.point();
        Self {
            lon: point.x(),
            lat: point.y(),
            ele: waypoint.elevation.unwrap_or(C::NAN),
        }
    }
}

impl From<(C, C, C)> for Sample {
    fn from((lon, lat, ele): (C, C, C)) -> Self {
        Self { lon, lat, ele }
    }
}

/// An ordered sequence of samples read from a single GPX track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackLog {
    name: Option<String>,
    samples: Vec<Sample>,
}

impl TrackLog {
    /// Returns a `TrackLog` read from the GPX file at `path`.
    ///
    /// Reading the file and parsing it are logged as separate stages.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TracklogError> {
        let path = path.as_ref();

        let (raw, fetch_runtime) = {
            let now = Instant::now();
            let mut raw = Vec::new();
            File::open(path)
                .and_then(|file| BufReader::new(file).read_to_end(&mut raw))
                .map_err(|e| TracklogError::Open(e, path.to_path_buf()))?;
            (raw, now.elapsed())
        };
        debug!("fetch {path:?}; bytes: {}, fetch_exec: {fetch_runtime:?}", raw.len());

        let (log, parse_runtime) = {
            let now = Instant::now();
            let log = Self::from_reader(raw.as_slice())?;
            (log, now.elapsed())
        };
        debug!("parse {path:?}; samples: {}, parse_exec: {parse_runtime:?}", log.len());

        Ok(log)
    }

    /// Returns a `TrackLog` parsed from GPX text.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TracklogError> {
        let gpx = gpx::read(reader)?;
        Ok(Self::from_gpx(gpx))
    }

    /// Extracts the first track from `gpx`, falling back to the first
    /// route when the document has no tracks.
    ///
    /// All segments of the track are concatenated in document order.
    pub fn from_gpx(gpx: Gpx) -> Self {
        let doc_name = gpx.metadata.and_then(|meta| meta.name);

        if gpx.tracks.len() > 1 {
            debug!("ignoring {} additional tracks", gpx.tracks.len() - 1);
        }

        let (name, samples) = if let Some(track) = gpx.tracks.into_iter().next() {
            let samples: Vec<Sample> = track
                .segments
                .iter()
                .flat_map(|segment| segment.points.iter())
                .map(Sample::from)
                .collect();
            debug!(
                "track {:?}; segments: {}, samples: {}",
                track.name,
                track.segments.len(),
                samples.len()
            );
            (track.name, samples)
        } else if let Some(route) = gpx.routes.into_iter().next() {
            let samples: Vec<Sample> = route.points.iter().map(Sample::from).collect();
            debug!("route {:?}; samples: {}", route.name, samples.len());
            (route.name, samples)
        } else {
            warn!("GPX document has neither tracks nor routes");
            (None, Vec::new())
        };

        let missing_ele = samples.iter().filter(|s| s.ele.is_nan()).count();
        if missing_ele > 0 {
            warn!("{missing_ele} of {} samples have no elevation", samples.len());
        }

        Self {
            name: name.or(doc_name),
            samples,
        }
    }

    /// Returns the track's name, or the document's name if the track
    /// is unnamed.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
