use crate::{constants::DEFAULT_STEP_KM, math::haversine_km, ProfileError};
use geo::{
    algorithm::BoundingRect,
    geometry::{Coord, LineString, Rect},
};
use log::debug;
use tracklog::Sample;

/// One row of the elevation/distance profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePoint {
    /// Rounded cumulative distance with unit, e.g. `"3.4km"`.
    pub label: String,

    /// Elevation rounded to whole meters.
    pub elevation_m: i32,

    /// Minutes since the first sample.
    ///
    /// Track logs are read without timestamps, so this is always 0.
    pub elapsed_min: i32,

    /// Location of the original sample.
    pub coord: Coord<f64>,

    /// Cumulative distance from the first sample, rounded to 0.1 km.
    pub distance_km: f64,
}

impl ProfilePoint {
    #[allow(clippy::cast_possible_truncation)]
    fn new(coord: Coord<f64>, ele_m: f64, cumulative_km: f64, elapsed_s: f64) -> Self {
        let distance_km = round_tenth(cumulative_km);
        Self {
            label: format!("{distance_km:.1}km"),
            elevation_m: ele_m.round() as i32,
            elapsed_min: (elapsed_s / 60.0).round() as i32,
            coord,
            distance_km,
        }
    }

    pub fn lat(&self) -> f64 {
        self.coord.y
    }

    pub fn lon(&self) -> f64 {
        self.coord.x
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profile {
    /// Total (unrounded) length of the track in kilometers.
    pub distance_km: f64,

    /// Profile points, in track order.
    pub points: Vec<ProfilePoint>,
}

impl Profile {
    pub fn builder() -> ProfileBuilder {
        ProfileBuilder::default()
    }

    /// Returns a profile of `samples` with marks every 100 m.
    pub fn new(samples: &[Sample]) -> Self {
        resample(samples, DEFAULT_STEP_KM)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the smallest rectangle containing every profile point,
    /// or `None` for an empty profile.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.points
            .iter()
            .map(|point| point.coord)
            .collect::<LineString<f64>>()
            .bounding_rect()
    }

    /// Returns the center of [`Profile::bounds`].
    pub fn center(&self) -> Option<Coord<f64>> {
        self.bounds().map(|rect| rect.center())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBuilder {
    /// Distance between marks (km).
    step_km: f64,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self {
            step_km: DEFAULT_STEP_KM,
        }
    }
}

impl ProfileBuilder {
    pub fn step(mut self, km: f64) -> Self {
        self.step_km = km;
        self
    }

    pub fn step_km(&self) -> f64 {
        self.step_km
    }

    pub fn build(&self, samples: &[Sample]) -> Result<Profile, ProfileError> {
        if !(self.step_km.is_finite() && self.step_km > 0.0) {
            return Err(ProfileError::InvalidStep(self.step_km));
        }

        let now = std::time::Instant::now();
        let profile = resample(samples, self.step_km);
        debug!(
            "profile; samples: {}, points: {}, distance: {:.3} km, exec: {:?}",
            samples.len(),
            profile.len(),
            profile.distance_km,
            now.elapsed()
        );

        Ok(profile)
    }
}

/// Reduces `samples` to the first sample, the last sample, and every
/// sample where the cumulative distance reaches the next multiple of
/// `step_km`.
///
/// A segment spanning several marks emits a single point; the next
/// mark is then the first one beyond the cumulative distance.
fn resample(samples: &[Sample], step_km: f64) -> Profile {
    let last = samples.len().saturating_sub(1);
    let elapsed_s = 0.0;

    let mut points = Vec::new();
    let mut cumulative_km = 0.0;
    let mut next_mark: u64 = 1;
    let mut prev: Option<Coord<f64>> = None;

    for (idx, sample) in samples.iter().enumerate() {
        let coord = Coord {
            x: sample.lon,
            y: sample.lat,
        };

        if let Some(prev) = prev {
            cumulative_km += haversine_km(prev, coord);
        }
        prev = Some(coord);

        // Marks are multiples of an integer counter so they never
        // accumulate rounding error.
        let crossed = cumulative_km >= mark_km(next_mark, step_km);
        if crossed {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let reached = (cumulative_km / step_km) as u64;
            next_mark = next_mark.max(reached);
            while next_mark < u64::MAX && mark_km(next_mark, step_km) <= cumulative_km {
                next_mark += 1;
            }
        }

        if idx == 0 || idx == last || crossed {
            points.push(ProfilePoint::new(coord, sample.ele, cumulative_km, elapsed_s));
        }
    }

    Profile {
        distance_km: cumulative_km,
        points,
    }
}

#[allow(clippy::cast_precision_loss)]
fn mark_km(mark: u64, step_km: f64) -> f64 {
    mark as f64 * step_km
}

fn round_tenth(km: f64) -> f64 {
    (km * 10.0).round() / 10.0
}
