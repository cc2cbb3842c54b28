//! Reduce one point to the maximum value of each property over all depths.
//!

use serde::{Deserialize, Serialize};
use tracing::trace;

use transect_sources::{PointRecord, Property};

/// Maximum of all the mean values of the layer called `name`.
///
/// A missing layer, a layer without depths or with only `null` means gives `None`.
///
pub fn max_value(point: &PointRecord, name: &str) -> Option<f64> {
    let layer = point.layer(name)?;
    layer.means().reduce(f64::max)
}

/// The four maxima for one point, `None` where the property is absent.
///
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ReducedRow {
    pub clay: Option<f64>,
    pub sand: Option<f64>,
    pub silt: Option<f64>,
    pub ocs: Option<f64>,
}

impl ReducedRow {
    #[inline]
    pub fn get(&self, p: Property) -> Option<f64> {
        match p {
            Property::Clay => self.clay,
            Property::Sand => self.sand,
            Property::Silt => self.silt,
            Property::Ocs => self.ocs,
        }
    }

    /// Values in column order.
    ///
    pub fn values(&self) -> [Option<f64>; 4] {
        [self.clay, self.sand, self.silt, self.ocs]
    }

    /// Every cell is present
    ///
    pub fn is_complete(&self) -> bool {
        self.values().iter().all(Option::is_some)
    }
}

impl From<[Option<f64>; 4]> for ReducedRow {
    fn from(v: [Option<f64>; 4]) -> Self {
        ReducedRow {
            clay: v[0],
            sand: v[1],
            silt: v[2],
            ocs: v[3],
        }
    }
}

/// Reduce every known property of one point, in the fixed clay, sand, silt, ocs order.
///
pub fn process_point(point: &PointRecord) -> ReducedRow {
    trace!("process_point");

    let v = Property::ALL.map(|p| max_value(point, p.name()));
    ReducedRow::from(v)
}
