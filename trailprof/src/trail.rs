use crate::{Profile, ProfileBuilder, ProfileError, Summary};
use log::debug;
use std::{path::Path, time::Instant};
use tracklog::TrackLog;

/// Everything derived from one track log load.
///
/// A `Trail` is built in one go and then only read. Loading another
/// file produces a new `Trail`; there is no incremental update.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trail {
    pub name: Option<String>,
    pub summary: Summary,
    pub profile: Profile,
}

impl Trail {
    /// Runs the load pipeline: read the file, parse the GPX, resample
    /// it, and return the result.
    ///
    /// Reading and parsing may fail; resampling can not.
    ///
    /// `TrackLog::load` logs the fetch and parse stages and
    /// `ProfileBuilder::build` logs the resample stage.
    pub fn load<P: AsRef<Path>>(path: P, builder: &ProfileBuilder) -> Result<Self, ProfileError> {
        let track = TrackLog::load(path)?;
        Self::from_track(track, builder)
    }

    /// Resamples and summarizes an already parsed track log.
    pub fn from_track(track: TrackLog, builder: &ProfileBuilder) -> Result<Self, ProfileError> {
        let name = track.name().map(str::to_owned);
        let samples = track.into_samples();
        let profile = builder.build(&samples)?;

        let (summary, summary_runtime) = {
            let now = Instant::now();
            let summary = Summary::new(&samples);
            (summary, now.elapsed())
        };
        debug!(
            "trail {name:?}; points: {}, summary_exec: {summary_runtime:?}",
            profile.len()
        );

        Ok(Self {
            name,
            summary,
            profile,
        })
    }
}
