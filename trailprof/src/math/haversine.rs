//! Great-circle distance on a spherical earth.
//!
//! [geo](https://github.com/georust/geo/blob/eb0cd98f3ccfa226631af23d94d66d214ea66488/geo/src/algorithm/haversine_distance.rs)
//! has the same routine, but with its own earth radius and in meters.
//! Track distances are defined against a 6371 km sphere, so we keep
//! our own copy with the radius as a parameter.

use crate::constants::EARTH_RADIUS_KM;
use geo::{Coord, CoordFloat};

/// Returns the great-circle distance from `start` to `end` on a
/// sphere of `radius`, in the units of `radius`.
///
/// Coordinates are in degrees, `x` being longitude and `y` latitude.
#[allow(clippy::many_single_char_names)]
pub fn haversine<T>(start: Coord<T>, end: Coord<T>, radius: T) -> T
where
    T: CoordFloat,
{
    let one = T::one();
    let two = one + one;

    let d_lat = (end.y - start.y).to_radians();
    let d_lon = (end.x - start.x).to_radians();

    let a = (d_lat / two).sin().powi(2)
        + start.y.to_radians().cos() * end.y.to_radians().cos() * (d_lon / two).sin().powi(2);
    let c = two * a.sqrt().atan2((one - a).sqrt());

    radius * c
}

/// Returns the great-circle distance in kilometers.
pub fn haversine_km(start: Coord<f64>, end: Coord<f64>) -> f64 {
    haversine(start, end, EARTH_RADIUS_KM)
}

#[cfg(test)]
mod tests {
    use super::{haversine, haversine_km};
    use approx::assert_relative_eq;
    use geo::{coord, point, HaversineDistance};

    #[test]
    fn test_one_degree_at_equator() {
        let d = haversine_km(coord!(x: 0.0, y: 0.0), coord!(x: 0.0, y: 1.0));
        assert_relative_eq!(d, 111.19, epsilon = 0.1);
        assert_relative_eq!(d, 111.194_926_644_558_73, epsilon = 1e-9);

        let d = haversine_km(coord!(x: 0.0, y: 0.0), coord!(x: 1.0, y: 0.0));
        assert_relative_eq!(d, 111.194_926_644_558_73, epsilon = 1e-9);
    }

    #[test]
    fn test_same_point_is_zero() {
        let c = coord!(x: 29.640_4, y: 36.200_5);
        assert_eq!(haversine_km(c, c), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let a = coord!(x: -71.308_307_164_413_69, y: 44.283_098_066_031_65);
        let b = coord!(x: -71.297_207_328_376_8, y: 44.256_280_984_242_78);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_matches_geo() {
        // geo uses a 6371008.8 m mean radius.
        let geo_radius_m = 6_371_008.8;
        let a = coord!(x: 29.64, y: 36.2);
        let b = coord!(x: 29.9, y: 36.4);
        let expected = point!(a).haversine_distance(&point!(b));
        assert_relative_eq!(
            haversine(a, b, geo_radius_m),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_f32() {
        let d = haversine(
            coord!(x: 0.0_f32, y: 0.0),
            coord!(x: 0.0, y: 1.0),
            6371.0,
        );
        assert_relative_eq!(d, 111.194_93, epsilon = 1e-3);
    }
}
