//! Format of the answers returned by the SoilGrids `properties/query` endpoint.
//!
//! The answer is a GeoJSON `Feature`:
//!
//! ```json
//! {
//!   "type": "Feature",
//!   "geometry": { "type": "Point", "coordinates": [8.662215, 56.225297] },
//!   "properties": {
//!     "layers": [
//!       {
//!         "name": "clay",
//!         "unit_measure": { "d_factor": 10, "mapped_units": "g/kg", "target_units": "%" },
//!         "depths": [
//!           { "range": { "top_depth": 0, "bottom_depth": 5, "unit_depth": "cm" },
//!             "label": "0-5cm",
//!             "values": { "mean": 86 } }
//!         ]
//!       }
//!     ]
//!   },
//!   "query_time_s": 1.23
//! }
//! ```
//!
//! Only `properties.layers[].name` and `properties.layers[].depths[].values.mean` are
//! mandatory, everything else is kept when present.  `mean` is `null` for no-data pixels
//! (sea, lakes, urban areas).
//!

use serde::{Deserialize, Serialize};

use transect_common::Coordinate;

/// One answer for one point.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct PointRecord {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_time_s: Option<f64>,
}

impl PointRecord {
    /// Find a layer by its exact name.
    ///
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.properties.layers.iter().find(|l| l.name == name)
    }

    /// Location as returned by the API, if any.  GeoJSON has longitude first.
    ///
    pub fn coordinate(&self) -> Option<Coordinate> {
        match &self.geometry {
            Some(g) if g.coordinates.len() >= 2 => {
                Some(Coordinate::new(g.coordinates[1], g.coordinates[0]))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<f64>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Properties {
    pub layers: Vec<Layer>,
}

/// All the depth buckets for one property.
///
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Layer {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_measure: Option<UnitMeasure>,
    #[serde(default)]
    pub depths: Vec<Depth>,
}

impl Layer {
    /// All the non-null mean values, in depth order.
    ///
    pub fn means(&self) -> impl Iterator<Item = f64> + '_ {
        self.depths.iter().filter_map(|d| d.values.mean)
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct UnitMeasure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mapped_units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty_unit: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Depth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DepthRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub values: Values,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DepthRange {
    pub top_depth: f64,
    pub bottom_depth: f64,
    pub unit_depth: String,
}

/// We only ever ask for `mean`.
///
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Values {
    #[serde(default)]
    pub mean: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINT: &str = r##"
{
  "type": "Feature",
  "geometry": { "type": "Point", "coordinates": [8.662215, 56.225297] },
  "properties": {
    "layers": [
      {
        "name": "clay",
        "unit_measure": { "d_factor": 10, "mapped_units": "g/kg", "target_units": "%", "uncertainty_unit": "" },
        "depths": [
          { "range": { "top_depth": 0, "bottom_depth": 5, "unit_depth": "cm" }, "label": "0-5cm", "values": { "mean": 86 } },
          { "range": { "top_depth": 5, "bottom_depth": 15, "unit_depth": "cm" }, "label": "5-15cm", "values": { "mean": 70 } },
          { "range": { "top_depth": 15, "bottom_depth": 30, "unit_depth": "cm" }, "label": "15-30cm", "values": { "mean": null } }
        ]
      }
    ]
  },
  "query_time_s": 0.52
}
"##;

    #[test]
    fn test_point_record_deserialize() {
        let p: PointRecord = serde_json::from_str(POINT).unwrap();

        assert_eq!(Some("Feature".to_string()), p.kind);
        assert_eq!(1, p.properties.layers.len());
        assert_eq!(Some(Coordinate::new(56.225297, 8.662215)), p.coordinate());

        let clay = p.layer("clay").unwrap();
        assert_eq!(vec![86., 70.], clay.means().collect::<Vec<_>>());
        assert!(p.layer("sand").is_none());
    }

    #[test]
    fn test_point_record_minimal() {
        let p: PointRecord =
            serde_json::from_str(r#"{"properties":{"layers":[{"name":"ocs","depths":[]}]}}"#)
                .unwrap();

        assert!(p.geometry.is_none());
        assert!(p.coordinate().is_none());
        assert_eq!(0, p.layer("ocs").unwrap().means().count());
    }

    #[test]
    fn test_point_record_no_properties() {
        let p = serde_json::from_str::<PointRecord>(r#"{"mocked": "data"}"#);
        assert!(p.is_err());
    }
}
