//! Location related module
//!
//! A `Coordinate` is a (lat, lon) pair rounded to 6 decimal places, which is both what the
//! SoilGrids API accepts and enough to make runs reproducible.
//!
//! A `Transect` is the straight line sampling between two such points, both ends included.
//!
use std::fmt::{Display, Formatter};
use std::ops::Index;
use std::str::FromStr;

use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tracing::{debug, trace};

use crate::TransectError;

/// Number of decimal places kept for every coordinate
pub const PRECISION: usize = 6;

/// Round to `PRECISION` decimal places.
///
/// Rounding is done on the exact decimal value of `v`, never on `v * 10^6`.
///
#[inline]
pub fn round6(v: f64) -> f64 {
    format!("{:.*}", PRECISION, v).parse().unwrap_or(v)
}

/// Actual location, always rounded.
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Coordinate {
    /// Latitude
    lat: f64,
    /// Longitude
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Coordinate {
            lat: round6(lat),
            lon: round6(lon),
        }
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Coordinate::new(value.0, value.1)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

/// Parse "LAT,LON" as used on the command-line.
///
impl FromStr for Coordinate {
    type Err = TransectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || TransectError::InvalidArgument(format!("bad coordinate '{s}', use LAT,LON"));

        let (lat, lon) = s.split_once(',').ok_or_else(bad)?;
        let lat: f64 = lat.trim().parse().map_err(|_| bad())?;
        let lon: f64 = lon.trim().parse().map_err(|_| bad())?;

        if !(-90. ..=90.).contains(&lat) || !(-180. ..=180.).contains(&lon) {
            return Err(TransectError::InvalidArgument(format!(
                "coordinate '{s}' out of range"
            )));
        }
        Ok(Coordinate::new(lat, lon))
    }
}

/// Evenly spaced points between `start` and `end`, both included.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Transect {
    points: Vec<Coordinate>,
}

impl Transect {
    /// Interpolate `num_points` coordinates between `start` and `end`.
    ///
    /// Every point is `start + i * (end - start) / (num_points - 1)`, latitude and longitude
    /// separately, then rounded.  We need at least the two endpoints.
    ///
    #[tracing::instrument]
    pub fn new(start: (f64, f64), end: (f64, f64), num_points: usize) -> Result<Self, TransectError> {
        trace!("enter");

        if num_points < 2 {
            return Err(TransectError::InvalidArgument(format!(
                "num_points must be at least 2, got {num_points}"
            )));
        }
        let (start_lat, start_lon) = start;
        let (end_lat, end_lon) = end;
        if [start_lat, start_lon, end_lat, end_lon]
            .iter()
            .any(|v| !v.is_finite())
        {
            return Err(TransectError::InvalidArgument(
                "endpoints must be finite numbers".to_string(),
            ));
        }

        let div = (num_points - 1) as f64;
        let points: Vec<Coordinate> = (0..num_points)
            .map(|i| {
                let i = i as f64;
                Coordinate::new(
                    start_lat + i * (end_lat - start_lat) / div,
                    start_lon + i * (end_lon - start_lon) / div,
                )
            })
            .collect();
        debug!("{} points generated", points.len());

        Ok(Transect { points })
    }

    /// Same as `new()` from already built coordinates.
    ///
    pub fn between(start: Coordinate, end: Coordinate, num_points: usize) -> Result<Self, TransectError> {
        Self::new((start.lat, start.lon), (end.lat, end.lon), num_points)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.points.iter()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }
}

impl Index<usize> for Transect {
    type Output = Coordinate;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a Transect {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// List all points of a transect
///
#[tracing::instrument(skip(data))]
pub fn list_transect(data: &Transect) -> String {
    trace!("enter");
    let header = vec!["#", "Lat", "Lon"];

    let mut builder = Builder::default();
    builder.push_record(header);

    data.iter().enumerate().for_each(|(i, c)| {
        builder.push_record(vec![
            format!("{i}"),
            format!("{:.6}", c.lat),
            format!("{:.6}", c.lon),
        ]);
    });

    let allf = builder.build().with(Style::modern()).to_string();
    format!("Transect ({} points):\n{allf}", data.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tracing::info;

    const START: (f64, f64) = (56.225297, 8.662215);
    const END: (f64, f64) = (55.958103, 9.354390);

    #[inline]
    fn shorten(v: f64) -> String {
        format!("{:.6}", v)
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(50)]
    fn test_transect_count_and_ends(#[case] n: usize) {
        let t = Transect::new(START, END, n).unwrap();

        assert_eq!(n, t.len());
        assert_eq!(Some(&Coordinate::from(START)), t.first());
        assert_eq!(Some(&Coordinate::from(END)), t.last());
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn test_transect_too_few_points(#[case] n: usize) {
        let t = Transect::new(START, END, n);
        assert!(matches!(t, Err(TransectError::InvalidArgument(_))));
    }

    #[test_pretty_log::test]
    fn test_transect_three_points() {
        let t = Transect::new(START, END, 3).unwrap();
        info!("{t:?}");

        assert_eq!("56.225297", shorten(t[0].lat()));
        assert_eq!("8.662215", shorten(t[0].lon()));
        assert_eq!("56.091700", shorten(t[1].lat()));
        assert!((t[1].lon() - 9.008303).abs() < 2e-6);
        assert_eq!("55.958103", shorten(t[2].lat()));
        assert_eq!("9.354390", shorten(t[2].lon()));
    }

    #[test]
    fn test_transect_is_idempotent() {
        let a = Transect::new(START, END, 17).unwrap();
        let b = Transect::new(START, END, 17).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_transect_rounded() {
        let t = Transect::new((0., 0.), (1., 1.), 4).unwrap();
        assert_eq!(0.333333, t[1].lat());
        assert_eq!(0.666667, t[2].lon());
    }

    #[rstest]
    #[case((55.9581035, 9.3543905), (55.958103, 9.35439))]
    #[case((5e-7, 0.), (0., 0.))]
    #[case((-12.1234565, 0.0000015), (-12.123456, 0.000002))]
    fn test_coordinate_rounding_near_tie(#[case] inp: (f64, f64), #[case] out: (f64, f64)) {
        let c = Coordinate::from(inp);
        assert_eq!(out.0, c.lat());
        assert_eq!(out.1, c.lon());
    }

    #[test]
    fn test_transect_rounding_near_tie() {
        let t = Transect::new((5e-7, 0.), (1., 1.), 2).unwrap();
        assert_eq!(0., t[0].lat());

        let c: Coordinate = "55.9581035,9.3543905".parse().unwrap();
        assert_eq!(Coordinate::new(55.958103, 9.35439), c);
    }

    #[test]
    fn test_transect_not_finite() {
        let t = Transect::new((f64::NAN, 0.), (1., 1.), 4);
        assert!(t.is_err());
    }

    #[rstest]
    #[case("56.225297,8.662215", (56.225297, 8.662215))]
    #[case(" 55.958103 , 9.354390 ", (55.958103, 9.354390))]
    #[case("-12.1234567,170", (-12.123457, 170.))]
    fn test_coordinate_from_str(#[case] inp: &str, #[case] out: (f64, f64)) {
        let c: Coordinate = inp.parse().unwrap();
        assert_eq!(Coordinate::new(out.0, out.1), c);
    }

    #[rstest]
    #[case("56.2")]
    #[case("a,b")]
    #[case("91,0")]
    #[case("0,181")]
    fn test_coordinate_from_str_bad(#[case] inp: &str) {
        assert!(inp.parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_list_transect() {
        let t = Transect::new(START, END, 2).unwrap();
        let s = list_transect(&t);
        assert!(s.starts_with("Transect (2 points):"));
        assert!(s.contains("56.225297"));
        assert!(s.contains("9.354390"));
    }
}
