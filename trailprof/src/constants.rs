/// Radius of the sphere track distances are measured on.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default distance between profile marks.
pub const DEFAULT_STEP_KM: f64 = 0.1;
