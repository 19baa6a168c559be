//! Map view of a profile.
//!
//! All renderer settings live in a [`MapConfig`] which is handed to
//! [`MapView::new`]; nothing is configured globally.

use crate::{Profile, ProfileError};
use geo::geometry::Coord;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, Value};
use log::warn;
use serde::Deserialize;
use serde_json::json;
use std::{fs::File, io::BufReader, path::Path};

/// Marker icon images.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub icon_url: String,
    pub icon_retina_url: String,
    pub shadow_url: String,
}

impl Default for IconConfig {
    fn default() -> Self {
        const BASE: &str = "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images";
        Self {
            icon_url: format!("{BASE}/marker-icon.png"),
            icon_retina_url: format!("{BASE}/marker-icon-2x.png"),
            shadow_url: format!("{BASE}/marker-shadow.png"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Slippy map tile URL template.
    pub tile_url: String,

    pub attribution: String,

    pub icons: IconConfig,

    /// Track polyline color.
    pub line_color: String,

    /// Track polyline width (px).
    pub line_weight: u32,

    /// Initial zoom level.
    pub zoom: u8,

    /// Map center used when there is no track to center on, as
    /// `[lat, lon]`.
    pub fallback_center: [f64; 2],
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            icons: IconConfig::default(),
            line_color: "#8884d8".to_string(),
            line_weight: 3,
            zoom: 12,
            fallback_center: [36.2, 29.6],
        }
    }
}

impl MapConfig {
    /// Reads a JSON config; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ProfileError::Io(e, path.to_path_buf()))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Initial map viewport plus the track polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    config: MapConfig,

    /// Viewport center (x: longitude, y: latitude).
    center: Coord<f64>,

    /// Track locations in profile order.
    polyline: Vec<Coord<f64>>,
}

impl MapView {
    /// Points with a non-finite coordinate are left off the map; they
    /// have no GeoJSON position.
    pub fn new(config: MapConfig, profile: &Profile) -> Self {
        let center = profile
            .center()
            .filter(is_finite)
            .unwrap_or(Coord {
                x: config.fallback_center[1],
                y: config.fallback_center[0],
            });
        let polyline: Vec<Coord<f64>> = profile
            .points
            .iter()
            .map(|point| point.coord)
            .filter(is_finite)
            .collect();
        if polyline.len() < profile.len() {
            warn!(
                "dropped {} non-finite points from the map",
                profile.len() - polyline.len()
            );
        }
        Self {
            config,
            center,
            polyline,
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn center(&self) -> Coord<f64> {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.config.zoom
    }

    /// Polyline positions as `[lat, lon]` pairs.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.polyline.iter().map(|c| [c.y, c.x]).collect()
    }

    /// Returns the view as a GeoJSON feature collection.
    ///
    /// The collection holds the track line string and a marker for
    /// each end of the track. Viewport and tile settings are carried
    /// as foreign members.
    pub fn to_geojson(&self) -> GeoJson {
        let mut features = Vec::with_capacity(3);

        if !self.polyline.is_empty() {
            let line = Value::LineString(self.polyline.iter().map(|c| vec![c.x, c.y]).collect());
            features.push(feature(
                line,
                json!({
                    "role": "track",
                    "stroke": self.config.line_color,
                    "stroke-width": self.config.line_weight,
                }),
            ));
        }

        let ends = [("start", self.polyline.first()), ("end", self.polyline.last())];
        for (role, coord) in ends {
            if let Some(coord) = coord {
                let icons = &self.config.icons;
                features.push(feature(
                    Value::Point(vec![coord.x, coord.y]),
                    json!({
                        "role": role,
                        "icon": icons.icon_url,
                        "icon_retina": icons.icon_retina_url,
                        "shadow": icons.shadow_url,
                    }),
                ));
            }
        }

        let foreign_members = to_object(json!({
            "center": [self.center.y, self.center.x],
            "zoom": self.config.zoom,
            "tiles": self.config.tile_url,
            "attribution": self.config.attribution,
        }));

        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features,
            foreign_members,
        })
    }
}

fn is_finite(coord: &Coord<f64>) -> bool {
    coord.x.is_finite() && coord.y.is_finite()
}

fn feature(value: Value, properties: serde_json::Value) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: to_object(properties),
        foreign_members: None,
    }
}

fn to_object(value: serde_json::Value) -> Option<JsonObject> {
    match value {
        serde_json::Value::Object(object) => Some(object),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{MapConfig, MapView};
    use crate::Profile;
    use geojson::{GeoJson, Value};
    use tracklog::Sample;

    fn profile() -> Profile {
        Profile::new(&[
            Sample::new(29.64, 36.2, 2.0),
            Sample::new(29.65, 36.21, 5.0),
            Sample::new(29.66, 36.22, 9.0),
        ])
    }

    #[test]
    fn test_partial_config() {
        let config: MapConfig = serde_json::from_str(r##"{"zoom": 14, "line_color": "#ff0000"}"##).unwrap();
        assert_eq!(config.zoom, 14);
        assert_eq!(config.line_color, "#ff0000");
        assert_eq!(config.line_weight, 3);
        assert_eq!(config.icons, MapConfig::default().icons);
    }

    #[test]
    fn test_empty_profile_uses_fallback() {
        let view = MapView::new(MapConfig::default(), &Profile::default());
        assert_eq!((view.center().y, view.center().x), (36.2, 29.6));
        assert!(view.positions().is_empty());
        match view.to_geojson() {
            GeoJson::FeatureCollection(fc) => assert!(fc.features.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_geojson() {
        let profile = profile();
        let view = MapView::new(MapConfig::default(), &profile);
        assert_eq!(view.positions().first(), Some(&[36.2, 29.64]));
        assert_eq!(view.zoom(), 12);

        let GeoJson::FeatureCollection(fc) = view.to_geojson() else {
            panic!("expected a feature collection");
        };
        assert_eq!(fc.features.len(), 3);

        let track = &fc.features[0];
        match &track.geometry.as_ref().unwrap().value {
            Value::LineString(line) => {
                assert_eq!(line.len(), profile.len());
                assert_eq!(line[0], vec![29.64, 36.2]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(track.property("stroke").unwrap(), "#8884d8");

        let end = &fc.features[2];
        assert_eq!(end.property("role").unwrap(), "end");
        assert_eq!(
            end.geometry.as_ref().unwrap().value,
            Value::Point(vec![29.66, 36.22])
        );

        let members = fc.foreign_members.unwrap();
        assert_eq!(members["zoom"], 12);
        let center = members["center"].as_array().unwrap();
        assert!((center[0].as_f64().unwrap() - 36.21).abs() < 1e-9);
        assert!((center[1].as_f64().unwrap() - 29.65).abs() < 1e-9);
    }

    #[test]
    fn test_non_finite_points_are_left_off() {
        let profile = Profile::new(&[
            Sample::new(29.64, 36.2, 2.0),
            Sample::new(29.65, 36.21, 5.0),
            Sample::new(f64::NAN, 36.22, 9.0),
        ]);
        assert_eq!(profile.len(), 3);

        let view = MapView::new(MapConfig::default(), &profile);
        assert_eq!(view.positions(), vec![[36.2, 29.64], [36.21, 29.65]]);
        assert!(view.center().x.is_finite() && view.center().y.is_finite());

        let geojson = view.to_geojson();
        assert!(!geojson.to_string().contains("null"));
        let GeoJson::FeatureCollection(fc) = geojson else {
            panic!("expected a feature collection");
        };
        assert_eq!(
            fc.features[2].geometry.as_ref().unwrap().value,
            Value::Point(vec![29.65, 36.21])
        );
    }
}
