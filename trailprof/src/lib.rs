mod constants;
mod error;
pub mod map;
mod math;
mod profile;
mod summary;
mod trail;

pub use crate::{
    constants::{DEFAULT_STEP_KM, EARTH_RADIUS_KM},
    error::ProfileError,
    map::{MapConfig, MapView},
    math::{haversine, haversine_km},
    profile::{Profile, ProfileBuilder, ProfilePoint},
    summary::Summary,
    trail::Trail,
};
pub use geo;
pub use tracklog::{Sample, TrackLog};
