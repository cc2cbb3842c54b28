//! Parameters sent to the `properties/query` endpoint.
//!
//! Every request asks for the same four properties over the same four depth buckets and
//! only the `mean` aggregate.  `property` and `depth` are repeated query parameters.
//!

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use transect_common::Coordinate;

/// Public SoilGrids v2.0 endpoint
pub const SOILGRIDS_URL: &str = "https://rest.isric.org/soilgrids/v2.0/properties/query";

/// Depth buckets requested, in this order.
pub const DEPTHS: [&str; 4] = ["0-30cm", "0-5cm", "5-15cm", "15-30cm"];

/// Only aggregate we request
pub const VALUE: &str = "mean";

/// The soil properties we know about, in table order.
///
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Property {
    /// Clay content (g/kg)
    Clay,
    /// Sand content (g/kg)
    Sand,
    /// Silt content (g/kg)
    Silt,
    /// Organic carbon stock (t/ha)
    Ocs,
}

impl Property {
    /// Fixed order used for requests and table columns
    pub const ALL: [Property; 4] = [Property::Clay, Property::Sand, Property::Silt, Property::Ocs];

    /// Layer name in the API answer
    ///
    #[inline]
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// Build the query string for one point, `lon` and `lat` first like the API documentation.
///
pub fn query_for(coord: &Coordinate) -> Vec<(&'static str, String)> {
    let mut q = vec![("lon", coord.lon().to_string()), ("lat", coord.lat().to_string())];
    q.extend(Property::ALL.iter().map(|p| ("property", p.name().to_string())));
    q.extend(DEPTHS.iter().map(|d| ("depth", d.to_string())));
    q.push(("value", VALUE.to_string()));
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_property_names() {
        let all: Vec<_> = Property::iter().map(|p| p.to_string()).collect();
        assert_eq!(vec!["clay", "sand", "silt", "ocs"], all);
        assert_eq!(Property::Ocs, Property::from_str("ocs").unwrap());
        assert_eq!("silt", Property::Silt.name());
    }

    #[test]
    fn test_query_for() {
        let c = Coordinate::new(56.225297, 8.662215);
        let q = query_for(&c);

        let get = |k: &str| -> Vec<String> {
            q.iter()
                .filter(|(n, _)| *n == k)
                .map(|(_, v)| v.clone())
                .collect()
        };
        assert_eq!(vec!["8.662215"], get("lon"));
        assert_eq!(vec!["56.225297"], get("lat"));
        assert_eq!(vec!["clay", "sand", "silt", "ocs"], get("property"));
        assert_eq!(vec!["0-30cm", "0-5cm", "5-15cm", "15-30cm"], get("depth"));
        assert_eq!(vec!["mean"], get("value"));
        assert_eq!(11, q.len());
    }
}
