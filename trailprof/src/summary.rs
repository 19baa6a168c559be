use crate::math::haversine_km;
use geo::geometry::Coord;
use itertools::Itertools;
use tracklog::Sample;

/// Route facts computed over every raw sample.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    /// Number of raw samples.
    pub samples: usize,

    /// Total track length (km).
    pub distance_km: f64,

    /// Sum of all climbs between consecutive samples (m).
    pub ascent_m: f64,

    /// Sum of all descents between consecutive samples, as a positive
    /// number (m).
    pub descent_m: f64,

    pub min_elevation_m: Option<f64>,

    pub max_elevation_m: Option<f64>,
}

impl Summary {
    pub fn new(samples: &[Sample]) -> Self {
        let distance_km = samples
            .iter()
            .map(|s| Coord { x: s.lon, y: s.lat })
            .tuple_windows::<(_, _)>()
            .map(|(a, b)| haversine_km(a, b))
            .sum();

        let (ascent_m, descent_m) = samples
            .iter()
            .map(|s| s.ele)
            .tuple_windows::<(_, _)>()
            .map(|(a, b)| b - a)
            .filter(|delta| !delta.is_nan())
            .fold((0.0, 0.0), |(up, down), delta| {
                if delta > 0.0 {
                    (up + delta, down)
                } else {
                    (up, down - delta)
                }
            });

        let (min_elevation_m, max_elevation_m) = match samples
            .iter()
            .map(|s| s.ele)
            .filter(|ele| ele.is_finite())
            .minmax_by(f64::total_cmp)
        {
            itertools::MinMaxResult::NoElements => (None, None),
            itertools::MinMaxResult::OneElement(ele) => (Some(ele), Some(ele)),
            itertools::MinMaxResult::MinMax(min, max) => (Some(min), Some(max)),
        };

        Self {
            samples: samples.len(),
            distance_km,
            ascent_m,
            descent_m,
            min_elevation_m,
            max_elevation_m,
        }
    }
}
