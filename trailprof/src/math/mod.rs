mod haversine;

pub use haversine::{haversine, haversine_km};
